//! Resolve locale variants in a JSON manifest.
//!
//! Usage:
//!   multilang <manifest.json>               # Print the resolved manifest
//!   multilang <manifest.json> <out.json>    # Write it to a file
//!
//! Required environment variables:
//! - MULTILANG_DEFAULT_LOCALE
//! - MULTILANG_LOCALES (comma-separated)
//!
//! Optional:
//! - MULTILANG_ON_COLLISION (last-write-wins | error, defaults to last-write-wins)

use anyhow::{bail, Context, Result};
use multilang::{config::Config, manifest, Resolver};
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("multilang=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, output) = match args.as_slice() {
        [input] => (PathBuf::from(input), None),
        [input, output] => (PathBuf::from(input), Some(PathBuf::from(output))),
        _ => bail!("Usage: multilang <manifest.json> [output.json]"),
    };

    let config = Config::from_env()?;
    info!(
        "Resolving {} with locales {:?} (default '{}')",
        input.display(),
        config.locales,
        config.default_locale
    );

    let resolver = Resolver::new(config).context("Failed to build resolver")?;
    let mut files = manifest::load(&input)?;
    let index = resolver
        .resolve(&mut files)
        .context("Locale resolution failed")?;

    match output {
        Some(path) => {
            manifest::save(&path, &files, &index)?;
            info!("✓ Wrote {} files to {}", files.len(), path.display());
        }
        None => println!("{}", manifest::render(&files, &index)?),
    }

    Ok(())
}
