use crate::commands::read_input;
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use tcxroute::payload::Payload;
use tcxroute::{ExtractOptions, process_with};

pub fn process_command(
    path: Option<&Path>,
    options: &ExtractOptions,
    pretty: bool,
) -> Result<(), Box<dyn Error>> {
    let input = read_input(path)?;
    let result = process_with(&input, options);
    let payload = Payload::from(&result);

    let mut stdout = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, &payload)?;
    } else {
        serde_json::to_writer(&mut stdout, &payload)?;
    }
    writeln!(stdout)?;

    match payload {
        Payload::Error { message } => Err(message.into()),
        Payload::Success { .. } => Ok(()),
    }
}
