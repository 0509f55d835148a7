use clap::Parser;
use penmark::{ExportFormat, PageSelection, PenmarkError, SessionBuilder};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Renders lightly marked-up text as handwriting on generated paper.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Page texts: a JSON array of strings, or plain text with form feeds between pages
    input: PathBuf,

    /// JSON engine config with settings, fonts and export defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Export format: pdf, png, jpg or zip
    #[arg(long, value_parser = ExportFormat::parse)]
    format: Option<ExportFormat>,

    /// Pages to export: "all", "current" or a range such as "1-3,5"
    #[arg(long)]
    pages: Option<String>,

    /// 1-based page that "current" refers to
    #[arg(long, default_value_t = 1)]
    current: usize,

    #[arg(long)]
    dpi: Option<u32>,

    /// JPEG quality between 0 and 1
    #[arg(long)]
    quality: Option<f32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Additional font files to register
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Leave the paper out of PNG and ZIP exports
    #[arg(long, default_value_t = false)]
    transparent: bool,

    /// Move text that overflows a page onto new pages before exporting
    #[arg(long, default_value_t = false)]
    reflow: bool,

    #[arg(long, default_value_t = false)]
    no_system_fonts: bool,

    /// Delay between written files, in milliseconds
    #[arg(long, default_value_t = 0)]
    pacing_ms: u64,

    #[arg(long, default_value = ".")]
    out: PathBuf,
}

fn main() -> Result<(), PenmarkError> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "penmark=info");
        }
    }
    env_logger::init();

    let args = Args::parse();

    let mut builder = SessionBuilder::new();
    if let Some(config) = &args.config {
        builder = builder.with_config_file(config)?;
    }
    if args.no_system_fonts {
        builder = builder.with_system_fonts(false);
    }
    if let Some(seed) = args.seed {
        builder = builder.with_seed(seed);
    }
    for font in &args.fonts {
        builder = builder.with_font_file(font);
    }
    builder = builder.with_text_file(&args.input)?;

    let mut request = builder.config().export.clone();
    if let Some(format) = args.format {
        request.format = format;
    }
    if let Some(pages) = args.pages {
        request.page_range = PageSelection::from(pages);
    }
    if let Some(dpi) = args.dpi {
        request.dpi = dpi;
    }
    if let Some(quality) = args.quality {
        request.quality = quality;
    }
    request.transparent |= args.transparent;

    let mut session = builder.build()?;
    if args.reflow {
        let added = session.reflow_all()?;
        if added > 0 {
            log::info!("Reflow added {} page(s)", added);
        }
    }
    session.set_current_page(args.current.saturating_sub(1))?;

    let output = session.export(&request)?;
    std::fs::create_dir_all(&args.out)?;
    let written = output.write_to_dir(&args.out, Duration::from_millis(args.pacing_ms))?;
    for path in &written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
