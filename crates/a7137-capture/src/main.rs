use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use std::fmt::Write as _;
use std::path::Path;

use a7137_capture::{load_csv, summarize, Summary};
use a7137_hla::format::fmt_line;
use a7137_hla::{AnalyzerConfig, Annotation, Source};

#[derive(Parser, Debug)]
#[command(author, version, about = "A7137 SPI capture decoder", long_about=None)]
struct Cli {
    /// Saleae Logic SPI analyzer export (CSV)
    #[arg(value_name = "CAPTURE")]
    input: String,
    /// Data line(s) feeding the nibble stream: MOSI, MISO or Both
    #[arg(long, default_value_t = Source::Mosi)]
    source: Source,
    /// Accept data outside a chip-select window
    #[arg(long)]
    no_require_cs: bool,
    /// Emit one debug annotation per nibble
    #[arg(long)]
    debug: bool,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert the capture into a JSON bus event list
    Events {
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },
    /// Decode the capture into command annotations
    Decode {
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },
    /// Count transactions, strobes and register accesses
    Summary {
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

fn emit(buf: String, out: Option<String>) -> Result<()> {
    if let Some(path) = out { std::fs::write(path, buf)?; } else { print!("{}", buf); }
    Ok(())
}

fn render_text(annotations: &[Annotation]) -> String {
    let mut buf = String::new();
    for a in annotations {
        let _ = writeln!(buf, "{}", fmt_line(a));
    }
    buf
}

fn render_summary(s: &Summary) -> String {
    let mut buf = String::new();
    let _ = writeln!(buf, "Capture summary:");
    let _ = writeln!(buf, "  transactions : {}", s.transactions);
    let _ = writeln!(buf, "  strobes      : {}", s.strobes);
    let _ = writeln!(buf, "  writes       : {}", s.writes);
    let _ = writeln!(buf, "  reads        : {}", s.reads);
    let _ = writeln!(buf, "  unresolved   : {}", s.unresolved);
    if s.debug > 0 {
        let _ = writeln!(buf, "  debug        : {}", s.debug);
    }
    let _ = writeln!(buf, "Commands:");
    for (label, n) in &s.labels {
        let _ = writeln!(buf, "  {n:>6}  {label}");
    }
    buf
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let events = load_csv(Path::new(&cli.input))?;
    let cfg = AnalyzerConfig {
        source: cli.source,
        require_open: !cli.no_require_cs,
        emit_debug: cli.debug,
    };

    match cli.cmd {
        Command::Events { out } => {
            let json = serde_json::to_string_pretty(&events)?;
            emit(json + "\n", out)?;
        }
        Command::Decode { format, out } => {
            let (annotations, _) = summarize(&events, cfg);
            let buf = match format {
                OutputFormat::Text => render_text(&annotations),
                OutputFormat::Json => serde_json::to_string_pretty(&annotations)? + "\n",
            };
            emit(buf, out)?;
        }
        Command::Summary { format } => {
            let (_, summary) = summarize(&events, cfg);
            match format {
                OutputFormat::Text => print!("{}", render_summary(&summary)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
        }
    }

    Ok(())
}
