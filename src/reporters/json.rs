use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::Report;

/// Writes `report` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(report: &Report, writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Outputs the report as JSON. Writes to a file if given, otherwise stdout.
pub fn report_json(report: &Report, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            write_json(report, File::create(path)?)?;
            log::info!("JSON report written to {}", path.display());
        }
        None => write_json(report, std::io::stdout().lock())?,
    }
    Ok(())
}
