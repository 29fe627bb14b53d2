use std::fs::{self, File};
use std::io::{self, Write};

use anyhow::{Context, Error, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::settings::OutputTo;

pub fn check_writable(output: &OutputTo, overwrite: bool) -> Result<()> {
    if let OutputTo::File(path) = output {
        if !overwrite
            && path
                .try_exists()
                .context("output file path should be accessible")?
            && fs::metadata(path)
                .context("output file metadata should be readable")?
                .len()
                > 0
        {
            // File already exists and is nonempty: back it up before truncating.
            fs::copy(
                path,
                format!("{}-backup-{}", path.display(), Uuid::new_v4()),
            )
            .with_context(|| {
                format!(
                    "should be able to back up existing file at {}",
                    path.display()
                )
            })?;
        }
        File::create(path)
            .context("output file should be openable")?
            .write_all(b"")
            .context("output file should be writable")?;
    }
    Ok(())
}

fn write_fallback<T>(err: Error, data: &impl Serialize) -> Result<T> {
    eprintln!("Error writing JSON data to file; dumping to stderr.");
    let json_str =
        serde_json::to_string(data).context("fallback failed, data cannot be written")?;
    eprintln!("{}", json_str);
    Err(err)
}

/// Serializes `data` as JSON to the configured output location.
pub fn write_json(output: &OutputTo, data: &impl Serialize) -> Result<()> {
    let mut writer: Box<dyn Write> = match output {
        OutputTo::Stdout => Box::new(io::stdout()),
        OutputTo::File(filename) => {
            let file = File::create(filename)
                .or_else(|err| write_fallback(err.into(), data))
                .context("output file should be writable")?;
            Box::new(file)
        }
        OutputTo::Void => return Ok(()),
    };
    serde_json::to_writer(&mut writer, data)
        .or_else(|err| write_fallback(err.into(), data))
        .context("data should be writable as JSON")?;
    writer.write_all(b"\n")?;
    Ok(())
}
