use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use a7137_hla::format::fmt_line;
use a7137_hla::{Analyzer, AnalyzerConfig, BusEvent, Source};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Decode A7137 SPI commands from a JSON bus event file"
)]
struct Opts {
    /// Data line(s) feeding the nibble stream: MOSI, MISO or Both
    #[arg(short, long, default_value_t = Source::Mosi)]
    source: Source,
    /// Accept data outside a chip-select window
    #[arg(long)]
    no_require_cs: bool,
    /// Emit one debug annotation per nibble
    #[arg(long)]
    debug: bool,
    /// Print annotations as JSON
    #[arg(long)]
    json: bool,
    #[arg(value_name = "EVENTS")]
    input: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let text = std::fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input))?;
    let events: Vec<BusEvent> =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", opts.input))?;

    let cfg = AnalyzerConfig {
        source: opts.source,
        require_open: !opts.no_require_cs,
        emit_debug: opts.debug,
    };
    let mut analyzer = Analyzer::new(cfg);
    let out = analyzer.run(&events);

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for a in &out {
            println!("{}", fmt_line(a));
        }
    }

    Ok(())
}
