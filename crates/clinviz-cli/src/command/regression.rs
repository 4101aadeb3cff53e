use anyhow::Context;
use clap::Args;
use clinviz_analysis::chart::Chart;

use super::ChartArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct RegressionArg {
    #[clap(flatten)]
    pub chart: ChartArg,

    /// Field plotted on the x axis
    #[arg(long)]
    pub x_field: String,

    /// Field plotted on the y axis
    #[arg(long)]
    pub y_field: String,
}

pub(crate) fn run(arg: &RegressionArg) -> anyhow::Result<()> {
    let dataset = arg.chart.load_dataset()?;
    let options = arg.chart.load_options()?;

    tracing::info!("Fitting {} against {}...", arg.y_field, arg.x_field);
    let chart = Chart::regression(&dataset, &arg.x_field, &arg.y_field, &options)
        .with_context(|| {
            format!(
                "Failed to fit regression line from {}",
                arg.chart.dataset.display()
            )
        })?;

    arg.chart.save(&chart)
}
