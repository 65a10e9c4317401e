//! CLI binary for docthumb.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ThumbnailConfig`, writes thumbnails next to their documents (or into
//! `--out-dir`) and optionally emits a per-file JSON report.

use anyhow::{Context, Result};
use clap::Parser;
use docthumb::{
    check_corruption, classify, generate_with, render_placeholder, thumbnail_path, Style,
    ThumbnailConfig,
};
use image::DynamicImage;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Thumbnail next to the document (doc.pdf → doc.tn_64.png)
  docthumb doc.pdf

  # A whole directory of scans into one output directory
  docthumb scans/*.tif --out-dir thumbs/ --width 128

  # Uniform style with page-count badge
  docthumb report.pdf --style uniform

  # Never fail: render labelled placeholders for broken inputs
  docthumb inbox/*.pdf --placeholder --report report.json

SUPPORTED FORMATS:
  .pdf            all pages (composite) via pdfium
  .tif / .tiff    first frame only
  .jpg / .jpeg    single frame
  .png            single frame

ENVIRONMENT VARIABLES:
  PDFIUM_DYNAMIC_LIB_PATH  Path to an existing libpdfium shared library
  RUST_LOG                 Override the tracing filter (e.g. docthumb=debug)
"#;

/// Generate fixed-size raster thumbnails for documents and images.
#[derive(Parser, Debug)]
#[command(
    name = "docthumb",
    version,
    about = "Generate fixed-size raster thumbnails for PDF, TIFF, JPEG and PNG documents",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input document(s): .pdf, .tif, .tiff, .jpg, .jpeg or .png.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Thumbnail width in pixels.
    #[arg(short, long, env = "DOCTHUMB_WIDTH", default_value_t = 64)]
    width: u32,

    /// Rendering style.
    #[arg(long, value_enum, env = "DOCTHUMB_STYLE", default_value = "composite")]
    style: Style,

    /// Write thumbnails into this directory instead of next to each input.
    #[arg(short, long, env = "DOCTHUMB_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Render a labelled placeholder instead of failing on broken inputs.
    #[arg(long)]
    placeholder: bool,

    /// Write a JSON report with per-file status and corruption statistics.
    #[arg(long)]
    report: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "DOCTHUMB_PASSWORD")]
    password: Option<String>,

    /// Rendering DPI for PDF pages (72–400).
    #[arg(long, env = "DOCTHUMB_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

/// One row of the `--report` JSON output.
#[derive(Serialize)]
struct FileReport {
    file: String,
    /// "ok", "corrupt", "placeholder" or "error".
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    out_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    corrupt_row_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    non_opaque_row_pct: Option<f64>,
}

fn output_path_for(input: &Path, out_dir: Option<&Path>, width: u32) -> PathBuf {
    let conventional = thumbnail_path(input, width);
    match (out_dir, conventional.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => conventional,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut builder = ThumbnailConfig::builder()
        .width(cli.width)
        .style(cli.style)
        .dpi(cli.dpi);
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    let config = builder.build().context("invalid configuration")?;

    if let Some(ref dir) = cli.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    let bar = if cli.inputs.len() > 1 && !cli.quiet {
        let bar = ProgressBar::new(cli.inputs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let mut reports: Vec<FileReport> = Vec::with_capacity(cli.inputs.len());
    let mut failures = 0usize;

    for input in &cli.inputs {
        let out_path = output_path_for(input, cli.out_dir.as_deref(), cli.width);
        let start = Instant::now();
        let report = process_file(input, &out_path, &config, cli.placeholder, start);

        let line = match report.status {
            "ok" => format!(
                "{} {}  {}",
                green("✓"),
                input.display(),
                dim(&format!(
                    "{}x{}  {}ms",
                    report.width.unwrap_or(0),
                    report.height.unwrap_or(0),
                    report.elapsed_ms
                )),
            ),
            "corrupt" => format!(
                "{} {}  {}",
                yellow("⚠"),
                input.display(),
                dim(&format!(
                    "corrupt buffer ({:.1}% rows)",
                    report.corrupt_row_pct.unwrap_or(0.0)
                )),
            ),
            "placeholder" => format!(
                "{} {}  {}",
                yellow("▨"),
                input.display(),
                dim(report.error.as_deref().unwrap_or("placeholder")),
            ),
            _ => {
                failures += 1;
                format!(
                    "{} {}  {}",
                    red("✗"),
                    input.display(),
                    red(report.error.as_deref().unwrap_or("unknown error")),
                )
            }
        };

        if !cli.quiet {
            match &bar {
                Some(bar) => bar.println(line),
                None => eprintln!("{line}"),
            }
        }
        if let Some(bar) = &bar {
            bar.inc(1);
        }
        reports.push(report);
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let ok = reports.iter().filter(|r| r.status != "error").count();
    if !cli.quiet && cli.inputs.len() > 1 {
        eprintln!(
            "{} {}/{} thumbnails written",
            if failures == 0 { green("✔") } else { red("✘") },
            bold(&ok.to_string()),
            cli.inputs.len()
        );
    }

    if let Some(ref report_path) = cli.report {
        let json = serde_json::to_string_pretty(&reports).context("failed to serialize report")?;
        std::fs::write(report_path, json)
            .with_context(|| format!("failed to write report {}", report_path.display()))?;
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Generate and save one thumbnail, folding the outcome into a report row.
fn process_file(
    input: &Path,
    out_path: &Path,
    config: &ThumbnailConfig,
    use_placeholder: bool,
    start: Instant,
) -> FileReport {
    let file = input.display().to_string();

    let (thumbnail, status, error) = match generate_with(input, config) {
        Ok(thumb) => (thumb, "ok", None),
        Err(e) if use_placeholder => {
            let spec = classify(&e);
            let thumb = render_placeholder(&spec, config.width, config.style);
            (thumb, "placeholder", Some(e.to_string()))
        }
        Err(e) => {
            return FileReport {
                file,
                status: "error",
                error: Some(e.to_string()),
                width: None,
                height: None,
                elapsed_ms: start.elapsed().as_millis() as u64,
                out_path: None,
                corrupt_row_pct: None,
                non_opaque_row_pct: None,
            };
        }
    };

    let check = check_corruption(&DynamicImage::ImageRgba8(thumbnail.clone()));
    let status = if status == "ok" && check.corrupt {
        "corrupt"
    } else {
        status
    };

    let (w, h) = thumbnail.dimensions();
    let save_result = thumbnail
        .save_with_format(out_path, image::ImageFormat::Png)
        .map_err(|e| e.to_string());

    match save_result {
        Ok(()) => FileReport {
            file,
            status,
            error,
            width: Some(w),
            height: Some(h),
            elapsed_ms: start.elapsed().as_millis() as u64,
            out_path: Some(out_path.display().to_string()),
            corrupt_row_pct: Some(check.corrupt_row_fraction * 100.0),
            non_opaque_row_pct: Some(check.non_opaque_row_fraction * 100.0),
        },
        Err(e) => FileReport {
            file,
            status: "error",
            error: Some(format!("failed to write {}: {e}", out_path.display())),
            width: Some(w),
            height: Some(h),
            elapsed_ms: start.elapsed().as_millis() as u64,
            out_path: None,
            corrupt_row_pct: None,
            non_opaque_row_pct: None,
        },
    }
}
