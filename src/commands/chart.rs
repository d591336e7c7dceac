use crate::commands::processed;
use std::error::Error;
use std::io;
use std::path::Path;
use tcxroute::ExtractOptions;
use tcxroute::export::{ChartSeries, write_chart_csv};

pub fn chart_command(
    path: Option<&Path>,
    options: &ExtractOptions,
    series: ChartSeries,
) -> Result<(), Box<dyn Error>> {
    let processed = processed(path, options)?;
    if processed.samples.is_empty() {
        return Err("No data available for chart.".into());
    }

    write_chart_csv(&processed.samples, series, io::stdout().lock())
}
