use std::path::PathBuf;

use clap::Parser;
use schemagrid::files::{read_data, read_schema, write_output};
use schemagrid::{CliError, GridView, RenderRequest, render};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Render schema-described data as an HTML grid
#[derive(Parser, Debug)]
#[command(name = "schemagrid")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Schema document (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short, long)]
    schema: PathBuf,

    /// Data document keyed by section id
    #[arg(short, long)]
    data: PathBuf,

    /// Output file; standard output when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let schema = read_schema(&cli.schema)?;
    let data = read_data(&cli.data)?;

    let mut view = GridView::new();
    render(&mut view, RenderRequest::new(&schema, data));
    let html = view.to_html();

    match &cli.out {
        Some(path) => write_output(path, &html),
        None => {
            println!("{html}");
            Ok(())
        }
    }
}
