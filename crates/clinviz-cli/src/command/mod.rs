use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clinviz_analysis::{
    chart::{Chart, ChartOptions},
    record::Dataset,
};
use tracing_subscriber::EnvFilter;

use self::{box_plot::BoxPlotArg, regression::RegressionArg, survival::SurvivalArg};
use crate::util::{self, Destination};

mod box_plot;
mod regression;
mod survival;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Which chart to compute
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Box-plot statistics and outliers for one or more numeric fields
    BoxPlot(#[clap(flatten)] BoxPlotArg),
    /// Scatter points with a least-squares regression line
    Regression(#[clap(flatten)] RegressionArg),
    /// Kaplan-Meier survival curves, optionally per group
    Survival(#[clap(flatten)] SurvivalArg),
}

/// Input, output and presentation arguments shared by every chart
#[derive(Debug, Clone, Args)]
pub(crate) struct ChartArg {
    /// Path to the dataset JSON file (array of objects)
    pub dataset: PathBuf,

    /// Path to a chart options JSON file
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Chart title (overrides the options file)
    #[arg(long)]
    pub title: Option<String>,

    /// Chart subtitle (overrides the options file)
    #[arg(long)]
    pub subtitle: Option<String>,

    /// Output file path (default: stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl ChartArg {
    pub(crate) fn load_dataset(&self) -> anyhow::Result<Dataset> {
        tracing::info!("Loading dataset from {}...", self.dataset.display());
        let dataset = util::read_dataset_file(&self.dataset)?;
        tracing::info!("Loaded {} records", dataset.len());
        Ok(dataset)
    }

    pub(crate) fn load_options(&self) -> anyhow::Result<ChartOptions> {
        let mut options = match &self.options {
            Some(path) => util::read_options_file(path)?,
            None => ChartOptions::default(),
        };
        if let Some(title) = &self.title {
            options.title = Some(title.clone());
        }
        if let Some(subtitle) = &self.subtitle {
            options.subtitle = Some(subtitle.clone());
        }
        Ok(options)
    }

    pub(crate) fn save(&self, chart: &Chart) -> anyhow::Result<()> {
        let dropped = chart.dropped();
        if dropped > 0 {
            tracing::warn!("{dropped} value(s) were missing or not numeric and were skipped");
        }
        Destination::from_arg(self.output.clone()).write_json(chart)
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "clinviz=debug,clinviz_analysis=debug"
    } else {
        "clinviz=info,clinviz_analysis=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::BoxPlot(arg) => box_plot::run(&arg)?,
        Mode::Regression(arg) => regression::run(&arg)?,
        Mode::Survival(arg) => survival::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_survival_args() {
        let args = CommandArgs::try_parse_from([
            "clinviz",
            "survival",
            "data.json",
            "--time-field",
            "months",
            "--event-field",
            "died",
            "--group-field",
            "arm",
            "--title",
            "Overall survival",
            "-v",
        ])
        .unwrap();
        assert!(args.verbose);
        let Mode::Survival(arg) = args.mode else {
            panic!("expected survival mode");
        };
        assert_eq!(arg.time_field, "months");
        assert_eq!(arg.event_field, "died");
        assert_eq!(arg.group_field.as_deref(), Some("arm"));
        assert_eq!(arg.chart.dataset, PathBuf::from("data.json"));
        assert_eq!(arg.chart.title.as_deref(), Some("Overall survival"));
    }

    #[test]
    fn test_parse_box_plot_fields() {
        let args =
            CommandArgs::try_parse_from(["clinviz", "box-plot", "d.json", "--fields", "a,b,c"])
                .unwrap();
        let Mode::BoxPlot(arg) = args.mode else {
            panic!("expected box-plot mode");
        };
        assert_eq!(arg.fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_box_plot_requires_fields() {
        assert!(CommandArgs::try_parse_from(["clinviz", "box-plot", "d.json"]).is_err());
    }

    #[test]
    fn test_title_flag_overrides_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"title": "From file", "subtitle": "kept"}"#).unwrap();

        let arg = ChartArg {
            dataset: PathBuf::from("unused.json"),
            options: Some(path),
            title: Some("From flag".into()),
            subtitle: None,
            output: None,
        };
        let options = arg.load_options().unwrap();
        assert_eq!(options.title.as_deref(), Some("From flag"));
        assert_eq!(options.subtitle.as_deref(), Some("kept"));
    }
}
