use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use politigraph_votes::{run, PipelineConfig, Source, VERSION};

const USAGE: &str = "usage: politigraph-votes [fetch | replay <response.json>] [--config <file.json>]";

#[derive(Debug, PartialEq)]
struct Args {
    source: Source,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let mut source = Source::Remote;
    let mut config = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "fetch" => source = Source::Remote,
            "replay" => {
                i += 1;
                source = Source::File(PathBuf::from(args.get(i)?));
            }
            "--config" => {
                i += 1;
                config = Some(PathBuf::from(args.get(i)?));
            }
            _ => return None,
        }
        i += 1;
    }

    Some(Args { source, config })
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let raw: Vec<String> = env::args().skip(1).collect();
    let Some(args) = parse_args(&raw) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    println!("🗳️  Politigraph Votes v{}", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = PipelineConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;

    match &args.source {
        Source::Remote => println!("\n🌐 Fetching people from {}...", config.endpoint),
        Source::File(path) => println!("\n📂 Replaying saved response {:?}...", path),
    }

    let report = run(&config, &args.source)?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ {}", report.summary());
    for file in &report.files {
        println!("✓ {}", file.display());
    }

    Ok(())
}
