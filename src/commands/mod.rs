pub mod chart;
pub mod map;
pub mod process;

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tcxroute::{ExtractOptions, Processed, ProcessingResult, process_with};

pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>, Box<dyn Error>> {
    match path {
        Some(path) => match fs::read(path) {
            Ok(input) => Ok(input),
            Err(e) => Err(format!("{}: {e}", path.display()).into()),
        },
        None => {
            let mut input = Vec::new();
            io::stdin().lock().read_to_end(&mut input)?;
            Ok(input)
        }
    }
}

/// Runs the pipeline and hands back the successful result, or the failure
/// message as an error.
pub fn processed(
    path: Option<&Path>,
    options: &ExtractOptions,
) -> Result<Processed, Box<dyn Error>> {
    let input = read_input(path)?;
    match process_with(&input, options) {
        ProcessingResult::Success(processed) => Ok(processed),
        ProcessingResult::Failure { message, .. } => Err(message.into()),
    }
}
