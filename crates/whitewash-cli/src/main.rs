//! whitewash: sanitize HTML from a file or stdin against a whitelist.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use whitewash::{
    load_whitelist_from_path, NormalizerBackend, UnknownTagPolicy, WhitelistFormat, Whitewash,
};

#[derive(Parser)]
#[command(name = "whitewash", version, about = "Whitelist-based HTML sanitizer")]
struct Args {
    /// HTML file to sanitize; reads stdin when absent or `-`.
    input: Option<PathBuf>,

    /// Whitelist file to use instead of searching for whitelist.yaml.
    #[arg(short, long)]
    whitelist: Option<PathBuf>,

    /// The whitelist file is JSON rather than YAML.
    #[arg(long, requires = "whitelist")]
    json: bool,

    /// Normalize through this HTML Tidy binary instead of html5ever.
    #[arg(long, value_name = "PATH")]
    tidy: Option<PathBuf>,

    /// Drop unknown elements with their content instead of unwrapping them.
    #[arg(long)]
    strict: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("whitewash: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut builder = Whitewash::builder();

    if let Some(path) = &args.whitelist {
        let format = if args.json {
            WhitelistFormat::Json
        } else {
            WhitelistFormat::Yaml
        };
        builder = builder.whitelist(load_whitelist_from_path(path, format)?);
    }
    if let Some(binary) = args.tidy {
        builder = builder.backend(NormalizerBackend::Tidy { binary });
    }
    if args.strict {
        builder = builder.unknown_tag_policy(UnknownTagPolicy::Remove);
    }

    let whitewash = builder.build()?;
    let html = read_input(args.input.as_deref())?;

    tracing::debug!(bytes = html.len(), "sanitizing");
    let output = whitewash.sanitize(&html)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

fn read_input(path: Option<&std::path::Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut html = String::new();
            io::stdin()
                .read_to_string(&mut html)
                .context("failed to read stdin")?;
            Ok(html)
        }
    }
}
