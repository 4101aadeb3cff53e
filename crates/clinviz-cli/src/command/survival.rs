use anyhow::Context;
use clap::Args;
use clinviz_analysis::chart::{Chart, ChartData};

use super::ChartArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct SurvivalArg {
    #[clap(flatten)]
    pub chart: ChartArg,

    /// Field holding the time to event or censoring
    #[arg(long)]
    pub time_field: String,

    /// Field that is truthy when the event was observed (falsy means censored)
    #[arg(long)]
    pub event_field: String,

    /// Field to stratify curves by
    #[arg(long)]
    pub group_field: Option<String>,
}

pub(crate) fn run(arg: &SurvivalArg) -> anyhow::Result<()> {
    let dataset = arg.chart.load_dataset()?;
    let options = arg.chart.load_options()?;

    tracing::info!("Estimating Kaplan-Meier curves...");
    let chart = Chart::survival(
        &dataset,
        &arg.time_field,
        &arg.event_field,
        arg.group_field.as_deref(),
        &options,
    )
    .with_context(|| {
        format!(
            "Failed to estimate survival curves from {}",
            arg.chart.dataset.display()
        )
    })?;

    if let ChartData::Survival(result) = &chart.data {
        for curve in &result.curves {
            match curve.median_survival {
                Some(median) => tracing::info!(
                    "{}: {} subjects, {} events, median survival {median:.1}",
                    curve.group,
                    curve.subjects,
                    curve.events
                ),
                None => tracing::info!(
                    "{}: {} subjects, {} events, median survival not reached",
                    curve.group,
                    curve.subjects,
                    curve.events
                ),
            }
        }
    }

    arg.chart.save(&chart)
}
