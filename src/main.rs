#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::style)]

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clashlink::cli::Args;
use clashlink::node::ProxyDocument;
use clashlink::parser::DecoderRegistry;
use clashlink::report::ReportLog;
use tracing::Level;

fn main() {
    let args = Args::parse();
    let is_verbose = args.verbose;
    tracing_subscriber::fmt()
        .with_max_level(if is_verbose {
            Level::TRACE
        } else {
            Level::INFO
        })
        .init();

    if let Err(e) = run(args) {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    tracing::info!("Reading link list from: {}", args.input);
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read link list from {}", args.input))?;

    let mut log = ReportLog::new(args.log_file.map(PathBuf::from), !args.quiet);

    let registry = DecoderRegistry::with_builtin_decoders();
    let nodes = registry.decode_batch(&content, &mut log);

    let document = ProxyDocument::new(nodes);
    let yaml =
        serde_yaml::to_string(&document).context("Failed to serialize proxies document")?;

    match args.output.as_deref() {
        Some(path) => {
            fs::write(path, &yaml)
                .with_context(|| format!("Failed to write proxies document to {}", path))?;
            tracing::info!("Wrote {} nodes to {}", document.proxies.len(), path);
        }
        None => print!("{}", yaml),
    }

    Ok(())
}
