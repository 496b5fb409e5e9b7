use crate::{error::Result, pipeline::Summary};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `<dir>/<stem>.json` next to the recording it summarises.
pub fn summary_path_for(input: &Path) -> PathBuf {
    input.with_extension("json")
}

/// Write the summary record as pretty-printed JSON.
pub fn write_summary(path: &Path, summary: &Summary) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_summary(path: &Path) -> Result<Summary> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
