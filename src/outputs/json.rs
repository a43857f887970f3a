//! JSON output for feeds and route listings.
//!
//! Feeds go to stdout by default so they can be piped into a renderer;
//! `--output` writes them to a file instead, creating parent directories.

use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, instrument};

/// Serialize `value` as compact or pretty JSON.
pub fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Write `value` as JSON to `output`, or to stdout when `output` is `None`.
#[instrument(level = "info", skip(value))]
pub async fn write<T: Serialize>(
    value: &T,
    output: Option<&str>,
    pretty: bool,
) -> Result<(), Box<dyn Error>> {
    let mut json = render(value, pretty)?;
    json.push('\n');

    let Some(path) = output else {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(json.as_bytes()).await?;
        stdout.flush().await?;
        return Ok(());
    };

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(path, "Wrote feed JSON");
    Ok(())
}
