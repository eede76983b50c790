// Render a report to stdout or a file without starting the server.
//
// Usage: cargo run --bin render_report -- --mode all --format html --out report.html

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use strategy_reports::config;
use strategy_reports::logging;
use strategy_reports::report::formatters::{HtmlFormatter, JsonFormatter, MarkdownFormatter};
use strategy_reports::{ReportCatalog, ReportGenerator, ReportLocation, ViewMode};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Md,
    Json,
}

#[derive(Debug, Parser)]
#[command(about = "Render a strategy report")]
struct Args {
    /// Report id
    #[arg(long, default_value = "epsilon-growth")]
    report: String,

    /// `section` or `all`
    #[arg(long, default_value = "section")]
    mode: String,

    /// Chapter or subsection to open
    #[arg(long)]
    section: Option<String>,

    #[arg(long, value_enum, default_value = "html")]
    format: Format,

    /// Load reports from this directory instead of the built-in set
    #[arg(long)]
    reports_dir: Option<PathBuf>,

    /// Prefix for section links in HTML output
    #[arg(long, default_value = "")]
    link_base: String,

    /// Write here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    logging::init(logging::CLI_FILTER);
    let args = Args::parse();

    let catalog = match &args.reports_dir {
        Some(dir) => ReportCatalog::load_dir(dir)?,
        None => ReportCatalog::builtin()?,
    };
    let doc = catalog
        .get(&args.report)
        .ok_or_else(|| anyhow::anyhow!("unknown report '{}' (available: {})", args.report, catalog.ids().collect::<Vec<_>>().join(", ")))?;

    let mut location = ReportLocation::new(&args.report).with_mode(ViewMode::parse(&args.mode));
    if let Some(section) = &args.section {
        location = location.with_section(section);
    }

    let generator = ReportGenerator::with_link_base(args.link_base.clone());
    let rendered = generator.render(&doc, &location);

    let output = match args.format {
        Format::Html => HtmlFormatter::format(&rendered, generator.link_base()),
        Format::Md => MarkdownFormatter::format(&rendered),
        Format::Json => JsonFormatter::format(&rendered)?,
    };

    match &args.out {
        Some(path) => {
            std::fs::write(path, output)?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}
