use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use hrm_lib::{
    detectors::Polarity,
    io::{
        csv::{read_trace_csv, write_trace_csv, LoadOptions},
        json::{summary_path_for, write_summary},
    },
    plot::{figure_from_trace, Figure, PlotBackend, Series},
    synthetic::SyntheticEcg,
    analyze, HrmConfig, LogObserver, PipelineObserver, Stage, Summary, Trace,
};
use plotters::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "hrm",
    version,
    about = "HRM: heart rate and beat times from single-lead ECG traces"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct LoadArgs {
    /// Skip the first row of the input as a header
    #[arg(long)]
    has_header: bool,
    /// TOML file overriding detection parameters
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a (time, voltage) CSV and write the JSON record next to it or to --out
    Analyze {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Print detected beat times with their baseline-removed amplitudes
    Beats {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Summarise several recordings independently; one failure does not stop the rest
    Batch {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Render the trace with detected beats marked to a PNG via plotters
    Plot {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 4096)]
        max_points: usize,
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Write a synthetic ECG trace as headerless CSV
    Synth {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 360.0)]
        fs: f64,
        #[arg(long, default_value_t = 14.0)]
        duration_s: f64,
        #[arg(long, default_value_t = 0.05)]
        first_beat_s: f64,
        #[arg(long, default_value_t = 0.75)]
        rr_s: f64,
        #[arg(long, default_value_t = 1.0)]
        amplitude_mv: f64,
        #[arg(long, default_value_t = 0.0)]
        noise_mv: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { input, out, load } => cmd_analyze(&input, out.as_deref(), &load)?,
        Commands::Beats { input, load } => cmd_beats(&input, &load)?,
        Commands::Batch { inputs, load } => cmd_batch(&inputs, &load)?,
        Commands::Plot {
            input,
            out,
            max_points,
            load,
        } => cmd_plot(&input, &out, max_points, &load)?,
        Commands::Synth {
            out,
            fs,
            duration_s,
            first_beat_s,
            rr_s,
            amplitude_mv,
            noise_mv,
            seed,
        } => {
            let ecg = SyntheticEcg {
                fs,
                duration_s,
                first_beat_s,
                rr_s,
                amplitude_mv,
                noise_mv,
                seed,
                ..SyntheticEcg::default()
            };
            cmd_synth(&out, &ecg)?
        }
    }
    Ok(())
}

fn load_config(load: &LoadArgs) -> Result<HrmConfig> {
    match &load.config {
        Some(path) => HrmConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(HrmConfig::default()),
    }
}

fn load_trace(
    input: &Path,
    cfg: &HrmConfig,
    load: &LoadArgs,
    observer: &mut dyn PipelineObserver,
) -> Result<Trace> {
    let opts = LoadOptions::from_config(cfg, load.has_header);
    read_trace_csv(input, &opts, observer)
        .with_context(|| format!("failed to load {}", input.display()))
}

fn summarize_file(
    input: &Path,
    out: Option<&Path>,
    cfg: &HrmConfig,
    load: &LoadArgs,
) -> Result<(Summary, PathBuf)> {
    let mut observer = LogObserver;
    let trace = load_trace(input, cfg, load, &mut observer)?;
    let analysis = analyze(&trace, cfg, &mut observer)
        .with_context(|| format!("failed to analyse {}", input.display()))?;
    let out = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| summary_path_for(input));
    write_summary(&out, &analysis.summary)
        .with_context(|| format!("failed to write {}", out.display()))?;
    observer.on_info(Stage::SummaryWritten);
    log::info!("{} created", out.display());
    Ok((analysis.summary, out))
}

fn cmd_analyze(input: &Path, out: Option<&Path>, load: &LoadArgs) -> Result<()> {
    let cfg = load_config(load)?;
    let (summary, _) = summarize_file(input, out, &cfg, load)?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

#[derive(Serialize)]
struct BeatListing<'a> {
    polarity: Polarity,
    threshold: f64,
    times: &'a [f64],
    amplitudes: &'a [f64],
    intervals: Vec<f64>,
}

fn cmd_beats(input: &Path, load: &LoadArgs) -> Result<()> {
    let cfg = load_config(load)?;
    let mut observer = LogObserver;
    let trace = load_trace(input, &cfg, load, &mut observer)?;
    let analysis = analyze(&trace, &cfg, &mut observer)
        .with_context(|| format!("failed to analyse {}", input.display()))?;
    let listing = BeatListing {
        polarity: analysis.polarity,
        threshold: analysis.threshold,
        times: &analysis.beats.times,
        amplitudes: &analysis.beats.amplitudes,
        intervals: analysis.beats.intervals(),
    };
    println!("{}", serde_json::to_string(&listing)?);
    Ok(())
}

#[derive(Serialize)]
struct BatchEntry {
    input: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_beats: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn cmd_batch(inputs: &[PathBuf], load: &LoadArgs) -> Result<()> {
    let cfg = load_config(load)?;
    let mut failures = 0usize;
    for input in inputs {
        let entry = match summarize_file(input, None, &cfg, load) {
            Ok((summary, out)) => BatchEntry {
                input: input.clone(),
                output: Some(out),
                num_beats: Some(summary.num_beats),
                error: None,
            },
            Err(err) => {
                failures += 1;
                log::error!("{:#}", err);
                BatchEntry {
                    input: input.clone(),
                    output: None,
                    num_beats: None,
                    error: Some(format!("{:#}", err)),
                }
            }
        };
        println!("{}", serde_json::to_string(&entry)?);
    }
    if failures > 0 {
        bail!("{} of {} recordings failed", failures, inputs.len());
    }
    Ok(())
}

fn cmd_plot(input: &Path, out: &Path, max_points: usize, load: &LoadArgs) -> Result<()> {
    let cfg = load_config(load)?;
    let mut observer = LogObserver;
    let trace = load_trace(input, &cfg, load, &mut observer)?;
    let analysis = analyze(&trace, &cfg, &mut observer)
        .with_context(|| format!("failed to analyse {}", input.display()))?;
    let title = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("ECG");
    let fig = figure_from_trace(title, &trace, &analysis.beats, max_points.max(2));
    let mut backend = PngBackend {
        path: out,
        size: (1200, 480),
    };
    backend.draw(&fig)
}

fn cmd_synth(out: &Path, ecg: &SyntheticEcg) -> Result<()> {
    let trace = ecg.generate()?;
    write_trace_csv(out, &trace).with_context(|| format!("failed to write {}", out.display()))?;
    log::info!("wrote {} samples to {}", trace.len(), out.display());
    Ok(())
}

struct PngBackend<'a> {
    path: &'a Path,
    size: (u32, u32),
}

impl PlotBackend for PngBackend<'_> {
    fn draw(&mut self, fig: &Figure) -> Result<()> {
        let Some(((x_min, x_max), (y_min, y_max))) = fig.bounds() else {
            bail!("nothing to plot");
        };
        let (y_min, y_max) = if y_max > y_min {
            let pad = 0.05 * (y_max - y_min);
            (y_min - pad, y_max + pad)
        } else {
            (y_min - 1.0, y_max + 1.0)
        };
        let x_max = if x_max > x_min { x_max } else { x_min + 1.0 };

        let root = BitMapBackend::new(self.path, self.size).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(
                fig.title.clone().unwrap_or_else(|| "ECG".into()),
                ("sans-serif", 24),
            )
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
        let mut mesh = chart.configure_mesh();
        if let Some(label) = &fig.x.label {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &fig.y.label {
            mesh.y_desc(label.as_str());
        }
        mesh.draw()?;

        for series in &fig.series {
            match series {
                Series::Line(line) => {
                    let (r, g, b) = line.style.color.rgb();
                    chart.draw_series(LineSeries::new(
                        line.points.iter().map(|p| (p[0], p[1])),
                        RGBColor(r, g, b).stroke_width(line.style.width.round().max(1.0) as u32),
                    ))?;
                }
                Series::Markers(markers) => {
                    let (r, g, b) = markers.color.rgb();
                    let style = RGBColor(r, g, b).filled();
                    chart.draw_series(
                        markers
                            .points
                            .iter()
                            .map(|p| Circle::new((p[0], p[1]), markers.radius, style)),
                    )?;
                }
            }
        }
        root.present()?;
        Ok(())
    }
}
