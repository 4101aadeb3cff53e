use anyhow::Context;
use clap::Args;
use clinviz_analysis::chart::Chart;

use super::ChartArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct BoxPlotArg {
    #[clap(flatten)]
    pub chart: ChartArg,

    /// Numeric fields to summarize, one box each (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub fields: Vec<String>,
}

pub(crate) fn run(arg: &BoxPlotArg) -> anyhow::Result<()> {
    let dataset = arg.chart.load_dataset()?;
    let options = arg.chart.load_options()?;

    tracing::info!("Computing box plots for {}...", arg.fields.join(", "));
    let chart = Chart::box_plot(&dataset, &arg.fields, &options).with_context(|| {
        format!(
            "Failed to compute box plots from {}",
            arg.chart.dataset.display()
        )
    })?;

    arg.chart.save(&chart)
}
