// Command-line entry point for gategraph.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gategraph::application::CallGraphUsecase;
use gategraph::domain::parser::{LogParser, DEFAULT_COMPONENT};
use gategraph::infrastructure::{render_with_dot, OutputFormat};
use gategraph::ports::dot_exporter::DotExporter;
use gategraph::ports::json_exporter::JsonExporter;
use gategraph::ports::OutputExporter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input trace log file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Output format (pdf, png, jpeg, dot, json)
    #[arg(short = 'T', long, default_value = "pdf")]
    format: String,

    /// Highlight responses taking at least this many milliseconds
    #[arg(long, value_name = "MS")]
    slow: Option<u64>,

    /// Component tag marking relevant log lines
    #[arg(long, default_value = DEFAULT_COMPONENT)]
    component: String,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let format = match OutputFormat::from_str(&cli.format) {
        Some(format) => format,
        None => bail!("format \"{}\" not supported", cli.format),
    };

    let input = File::open(&cli.input)
        .with_context(|| format!("cannot open input file {}", cli.input.display()))?;
    let reader = BufReader::new(input);

    let parser = LogParser::with_component(&cli.component);
    let dot_exporter = match cli.slow {
        Some(threshold) => DotExporter::with_slow_threshold(threshold),
        None => DotExporter::new(),
    };
    let exporter: &dyn OutputExporter = match format {
        OutputFormat::Json => &JsonExporter,
        _ => &dot_exporter,
    };
    let usecase = CallGraphUsecase {
        parser: &parser,
        exporter,
    };

    if format.needs_renderer() {
        let mut dot_source = Vec::new();
        usecase.run(reader, &mut dot_source)?;
        render_with_dot(&dot_source, format, &cli.output)?;
    } else {
        let mut output = File::create(&cli.output)
            .with_context(|| format!("cannot create output file {}", cli.output.display()))?;
        usecase.run(reader, &mut output)?;
    }

    info!(output = %cli.output.display(), format = %format, "graph written");
    Ok(())
}
