use crate::commands::processed;
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use tcxroute::ExtractOptions;
use tcxroute::export::map_feature_collection;

pub fn map_command(path: Option<&Path>, options: &ExtractOptions) -> Result<(), Box<dyn Error>> {
    let processed = processed(path, options)?;
    let geometry = processed.geometry?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &map_feature_collection(&geometry))?;
    writeln!(stdout)?;
    Ok(())
}
