use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use siterank_core::types::LocationDataset;

/// Read a JSON file and deserialize into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let contents = read_file(path)?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", path, e))?;
    Ok(value)
}

/// Read a preferences file; `.yaml`/`.yml` files go through serde_yaml,
/// everything else is treated as JSON.
pub fn read_preferences<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let contents = read_file(path)?;
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");
    let value: T = if matches!(extension, "yaml" | "yml") {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", path, e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", path, e))?
    };
    Ok(value)
}

/// Load the district list from `--locations` or, when absent, from piped
/// stdin. Interactive invocations without a path are an error.
pub fn read_locations(
    path: Option<&str>,
) -> Result<Vec<LocationDataset>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return read_json(path);
    }
    match read_stdin()? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Err("--locations <file> is required (or pipe a JSON array on stdin)".into()),
    }
}

/// Attempt to read JSON from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive).
fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)?;
    Ok(Some(value))
}

fn read_file(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    if !p.exists() {
        return Err(format!("File not found: {}", path).into());
    }
    if !p.is_file() {
        return Err(format!("Not a file: {}", path).into());
    }
    Ok(fs::read_to_string(p).map_err(|e| format!("Failed to read '{}': {}", path, e))?)
}
