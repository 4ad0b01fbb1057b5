use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use limitcheck_core::{
    CheckerConfig, DiagramChecker, LimitCheckError, LimitMapping, OcrConfig, PdfRasterizer, PrefixBinding,
    TesseractCli, consts::*, limits::extract_limits_from_docx, parse::annotate::Annotator,
};

#[derive(Parser)]
#[command(name = "limitcheck")]
#[command(about = "Check pressure and temperature callouts of a diagram against its limits document")]
struct Args {
    #[arg(help = "Diagram PDF file path")]
    diagram: PathBuf,

    #[arg(help = "Limits document (.docx) path")]
    limits: PathBuf,

    #[arg(short, long, default_value = ".", help = "Output root directory")]
    output: PathBuf,

    #[arg(
        long,
        default_value_t = HEADER_Y_CUTOFF,
        help = "Header band cutoff in scaled pixels"
    )]
    header_cutoff: i32,

    #[arg(long, default_value_t = SCALE_FACTOR, help = "Page upscale factor before OCR")]
    scale: f32,

    #[arg(
        long = "bind",
        value_parser = parse_binding,
        value_name = "PREFIX=ROW|NAME",
        help = "Bind a header prefix to a limits row index or entry name (repeatable)"
    )]
    bindings: Vec<PrefixBinding>,

    #[arg(long, help = "Font used to label annotations")]
    font: Option<PathBuf>,

    #[arg(long, default_value = "tesseract", help = "Tesseract executable")]
    tesseract: String,
}

fn parse_binding(binding: &str) -> Result<PrefixBinding, String> {
    binding.parse().map_err(|e: LimitCheckError| e.to_string())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    info!("Diagram: {}", args.diagram.display());
    info!("Limits: {}", args.limits.display());

    info!("Extracting limits from {}", args.limits.display());
    let limits = extract_limits_from_docx(&args.limits)?;
    info!("Limits:\n{}", serde_json::to_string_pretty(&limits)?);

    let bindings = if args.bindings.is_empty() {
        PrefixBinding::defaults()
    } else {
        args.bindings
    };
    let mapping = LimitMapping::from_bindings(&limits, &bindings)?;

    let annotator = match &args.font {
        Some(path) => Annotator::with_font_file(path)?,
        None => {
            warn!("no --font given, annotations are drawn without labels");
            Annotator::without_labels()
        }
    };

    let engine = TesseractCli::new(OcrConfig {
        program: args.tesseract,
        ..OcrConfig::default()
    });
    let config = CheckerConfig::default()
        .with_header_cutoff(args.header_cutoff)
        .with_scale(args.scale);
    let checker = DiagramChecker::new(engine, mapping, annotator, config);

    let rasterizer = PdfRasterizer::from_env()?;
    let pages = rasterizer
        .rasterize(&args.diagram, &args.output)
        .with_context(|| format!("rasterizing {}", args.diagram.display()))?;

    let (mut passed, mut failed) = (0, 0);
    for page in &pages {
        let report = checker.check_page(page)?;
        for verdict in &report.verdicts {
            println!("{verdict}");
        }
        println!("{}", report.annotated.display());

        passed += report.passed();
        failed += report.failed();
    }

    info!(
        "Checked {} pages: {} passed, {} failed",
        pages.len(),
        passed,
        failed
    );
    Ok(())
}
