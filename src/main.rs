//! Namecards CLI
//!
//! Usage:
//!   namecards [OPTIONS] --template <PDF> <NAMES>
//!
//! Options:
//!   -t, --template <PDF>        One-page PDF template holding four cards
//!   -f, --font <FILE>           TrueType/OpenType font for the names
//!   -c, --config <FILE>         Layout, preview and color settings (TOML)
//!   -s, --stylesheet <FILE>     Color palette (TOML), overrides [colors]
//!   -e, --edits <FILE>          Edit script applied before output (TOML)
//!   -o, --output <FILE>         Output PDF (default: namecards.pdf)
//!   -p, --preview <PAGE>        Write an SVG preview of PAGE instead of a PDF
//!   -v, --verbose               More logging (repeat for debug)
//!   -h, --help                  Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use namecards::{
    compose_pdf, load_model, render_preview, Backdrop, EditScript, FontResource, InputError,
    NameFormat, NamecardConfig, NamecardError, Stylesheet,
};

#[derive(Parser)]
#[command(name = "namecards")]
#[command(about = "Lay out names on a four-up card template and print them to PDF")]
struct Cli {
    /// Names file (.csv with a header row, or one name per line); `-` reads stdin
    names: PathBuf,

    /// One-page PDF template
    #[arg(short, long, required_unless_present = "preview")]
    template: Option<PathBuf>,

    /// Custom font (.ttf, .otf, .woff, .woff2); Helvetica if omitted
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stylesheet file for the color palette (TOML)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Edit script applied to the layout (TOML)
    #[arg(short, long)]
    edits: Option<PathBuf>,

    /// Output PDF path
    #[arg(short, long, default_value = "namecards.pdf")]
    output: PathBuf,

    /// Write an SVG preview of this page (1-based) instead of the PDF
    #[arg(short, long)]
    preview: Option<usize>,

    /// Preview destination (stdout if omitted)
    #[arg(long, requires = "preview")]
    preview_output: Option<PathBuf>,

    /// PNG rendering of the template page, drawn behind the preview
    #[arg(long, requires = "preview")]
    backdrop: Option<PathBuf>,

    /// Highlight this entry (0-based) in the preview
    #[arg(long, requires = "preview")]
    select: Option<usize>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("namecards={}", default_level))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) => NamecardConfig::from_file(path)?,
        None => NamecardConfig::default(),
    };
    if let Some(path) = &cli.stylesheet {
        config = config.with_stylesheet(Stylesheet::from_file(path)?);
    }

    let (source, filename, format) = read_names(&cli.names)?;
    let mut model = match load_model(&source, format, &config) {
        Ok(model) => model,
        Err(NamecardError::Input(e)) => {
            return Err(CliError::Report(e.format(&source, &filename)));
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(path) = &cli.edits {
        let script = EditScript::from_file(path)?;
        script.apply(&mut model)?;
        info!(edits = script.len(), "applied edits");
    }

    let font_bytes = match &cli.font {
        Some(path) => {
            check_extension(path, "font", &["ttf", "otf", "woff", "woff2"])?;
            Some(read_bytes(path)?)
        }
        None => None,
    };

    if let Some(page) = cli.preview {
        if page == 0 {
            return Err(CliError::Message("preview pages are numbered from 1".to_string()));
        }
        if let Some(index) = cli.select {
            model.select(Some(index)).map_err(NamecardError::from)?;
        }
        let font = match &font_bytes {
            Some(bytes) => FontResource::from_bytes(bytes).unwrap_or_else(|e| {
                warn!(error = %e, "using Helvetica metrics for the preview");
                FontResource::helvetica()
            }),
            None => FontResource::helvetica(),
        };
        let backdrop = match &cli.backdrop {
            Some(path) => Some(Backdrop::from_png(read_bytes(path)?).map_err(NamecardError::from)?),
            None => None,
        };
        let svg = render_preview(&model, page - 1, &config, &font, backdrop.as_ref())?;
        match &cli.preview_output {
            Some(path) => write_bytes(path, svg.as_bytes())?,
            None => println!("{}", svg),
        }
        return Ok(());
    }

    let template_path = cli
        .template
        .as_deref()
        .ok_or_else(|| CliError::Message("a --template PDF is required".to_string()))?;
    check_extension(template_path, "template", &["pdf"])?;
    check_extension(&cli.output, "output", &["pdf"])?;
    let template = read_bytes(template_path)?;

    let output = compose_pdf(&model, &template, font_bytes.as_deref(), &config)?;
    for warning in &output.warnings {
        eprintln!("Warning: {}", warning);
    }
    write_bytes(&cli.output, &output.bytes)?;
    info!(
        path = %cli.output.display(),
        pages = output.page_count,
        font = %output.font,
        "wrote namecards"
    );
    Ok(())
}

/// Read the names source; `-` is stdin text
fn read_names(path: &Path) -> Result<(String, String, NameFormat), CliError> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| CliError::Message(format!("Error reading from stdin: {}", e)))?;
        return Ok((buffer, "<stdin>".to_string(), NameFormat::Text));
    }
    let source = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    Ok((
        source,
        path.display().to_string(),
        NameFormat::from_path(path),
    ))
}

fn check_extension(path: &Path, kind: &'static str, expected: &[&str]) -> Result<(), CliError> {
    let matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| expected.iter().any(|x| ext.eq_ignore_ascii_case(x)));
    if matches {
        Ok(())
    } else {
        let expected: Vec<String> = expected.iter().map(|x| format!(".{}", x)).collect();
        let expected: Vec<&str> = expected.iter().map(String::as_str).collect();
        Err(InputError::unsupported_file(kind, path.display().to_string(), &expected).into())
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|e| io_error(path, e))
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes)
        .map_err(|e| CliError::Message(format!("Error writing '{}': {}", path.display(), e)))
}

fn io_error(path: &Path, e: io::Error) -> CliError {
    CliError::Message(format!("Error reading file '{}': {}", path.display(), e))
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Namecard(#[from] NamecardError),

    /// Pre-rendered ariadne report
    #[error("{0}")]
    Report(String),

    #[error("{0}")]
    Message(String),
}

impl From<InputError> for CliError {
    fn from(e: InputError) -> Self {
        CliError::Namecard(e.into())
    }
}

impl From<namecards::ConfigError> for CliError {
    fn from(e: namecards::ConfigError) -> Self {
        CliError::Namecard(e.into())
    }
}

impl From<namecards::StylesheetError> for CliError {
    fn from(e: namecards::StylesheetError) -> Self {
        CliError::Namecard(e.into())
    }
}
