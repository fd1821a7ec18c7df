//! Subcommands and the helpers they share.

pub mod batch;
pub mod calc;
pub mod config;
pub mod extract;
pub mod parse;

use std::path::{Path, PathBuf};

use tracing::debug;

use termcalc_core::{DocumentExtractor, ExtractedText, TermcalcConfig};

/// Output format shared by the commands that print results.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("termcalc")
        .join("config.json")
}

/// The `-c` path, or the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration: an explicit path must exist, the default one may not.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<TermcalcConfig> {
    if let Some(path) = explicit {
        return Ok(TermcalcConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(TermcalcConfig::from_file(&path)?)
    } else {
        Ok(TermcalcConfig::default())
    }
}

/// Read a document from disk and extract its text.
pub async fn read_document(path: &Path, extractor: &DocumentExtractor) -> anyhow::Result<ExtractedText> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let data = tokio::fs::read(path).await?;
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    Ok(extractor.extract_document(&data, filename))
}

/// Write output to a file, or print it.
pub fn emit(output: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output)?;
            eprintln!(
                "{} Output written to {}",
                console::style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", output),
    }
    Ok(())
}
