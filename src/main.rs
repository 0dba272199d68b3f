use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use pdf_scroll::{FileSource, HtmlFileSurface, PdfiumBackend, Pipeline, RenderOptions};

/// Render a PDF into a single scrollable HTML page.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// PDF to render (path, file:// URL or percent-encoded path)
    input: String,

    /// Output HTML file [default: input name with .html]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pixels per PDF point (overrides PDF_SCROLL_SCALE)
    #[arg(short, long)]
    scale: Option<f32>,

    /// Rasterize pages concurrently when the backend allows it
    #[arg(long)]
    parallel: bool,

    /// Path to the PDFium shared library (overrides PDF_SCROLL_PDFIUM)
    #[arg(long)]
    pdfium: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: Args) -> Result<()> {
    let mut options = RenderOptions::from_env();
    if let Some(scale) = args.scale {
        options.scale = scale;
    }
    if args.parallel {
        options.parallel = true;
    }
    if args.pdfium.is_some() {
        options.pdfium_library = args.pdfium;
    }

    let source = FileSource::from_arg(&args.input)?;
    let output = args
        .output
        .unwrap_or_else(|| source.path().with_extension("html"));

    let backend = PdfiumBackend::bind(options.pdfium_library.as_deref())?;
    let pipeline = Pipeline::new(backend, options)?;
    let mut surface = HtmlFileSurface::new(&output);
    pipeline
        .present(&source, &mut surface)
        .with_context(|| format!("failed to render {}", args.input))?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
