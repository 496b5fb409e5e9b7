use crate::{
    config::HrmConfig,
    error::{HrmError, Result},
    observer::{PipelineObserver, Stage, WarningKind},
    signal::Trace,
};
use ::csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// How to read a two-column (time, voltage) table.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub has_headers: bool,
    pub delimiter: u8,
    /// Voltages strictly above this raise a single high-voltage warning.
    pub voltage_limit_mv: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_headers: false,
            delimiter: b',',
            voltage_limit_mv: HrmConfig::default().voltage_limit_mv,
        }
    }
}

impl LoadOptions {
    pub fn from_config(cfg: &HrmConfig, has_headers: bool) -> Self {
        Self {
            has_headers,
            voltage_limit_mv: cfg.voltage_limit_mv,
            ..Self::default()
        }
    }
}

/// Load a trace from a delimited file on disk.
pub fn read_trace_csv(
    path: &Path,
    opts: &LoadOptions,
    observer: &mut dyn PipelineObserver,
) -> Result<Trace> {
    let file = File::open(path)?;
    parse_trace(file, opts, observer)
}

/// Parse (time, voltage) rows, repairing bad rows by carrying the previous
/// row forward.
///
/// A row is bad when either cell is missing, empty, non-numeric or not finite.
/// A bad first row has nothing to carry forward and fails the load.
pub fn parse_trace<R: Read>(
    reader: R,
    opts: &LoadOptions,
    observer: &mut dyn PipelineObserver,
) -> Result<Trace> {
    let mut reader = ReaderBuilder::new()
        .delimiter(opts.delimiter)
        .has_headers(opts.has_headers)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut times = Vec::new();
    let mut voltages = Vec::new();
    let mut voltage_flagged = false;

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let (t, v) = match parse_row(&record) {
            Ok(pair) => pair,
            Err(detail) => match (times.last(), voltages.last()) {
                (Some(&t), Some(&v)) => {
                    observer.on_warning(
                        WarningKind::RowRepaired,
                        &format!("row {}: {}; reusing previous row", row, detail),
                    );
                    (t, v)
                }
                _ => return Err(HrmError::MalformedInput { row, detail }),
            },
        };
        if !voltage_flagged && v > opts.voltage_limit_mv {
            voltage_flagged = true;
            observer.on_warning(
                WarningKind::HighVoltage,
                &format!(
                    "row {}: {} mV exceeds {} mV",
                    row, v, opts.voltage_limit_mv
                ),
            );
        }
        times.push(t);
        voltages.push(v);
    }

    let trace = Trace::new(times, voltages)?;
    observer.on_info(Stage::Loaded);
    Ok(trace)
}

fn parse_row(record: &StringRecord) -> std::result::Result<(f64, f64), String> {
    let t = parse_cell(record, 0, "time")?;
    let v = parse_cell(record, 1, "voltage")?;
    Ok((t, v))
}

fn parse_cell(record: &StringRecord, idx: usize, name: &str) -> std::result::Result<f64, String> {
    let cell = record
        .get(idx)
        .ok_or_else(|| format!("missing {} cell", name))?;
    let value: f64 = cell
        .parse()
        .map_err(|_| format!("{} cell {:?} is not a number", name, cell))?;
    if !value.is_finite() {
        return Err(format!("{} cell {:?} is not finite", name, cell));
    }
    Ok(value)
}

/// Write a trace as headerless `time,voltage` rows.
pub fn write_trace_csv(path: &Path, trace: &Trace) -> Result<()> {
    let file = File::create(path)?;
    write_trace(file, trace)
}

pub fn write_trace<W: Write>(writer: W, trace: &Trace) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    for (t, v) in trace.times().iter().zip(trace.voltages()) {
        writer.write_record([t.to_string(), v.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
