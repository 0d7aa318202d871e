use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;

use mediaflow_core::Config;

/// Load the settings document from `path`, or from `MEDIAFLOW_CONFIG` when absent.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            Config::load(path).with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Config::from_env().context("Invalid config"),
    }
}

/// Read a notification payload saved as JSON.
pub fn read_event(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// What `check-config` prints.
pub fn config_summary(config: &Config) -> Value {
    json!({
        "valid": true,
        "bucket": config.target_bucket(),
        "resizes": config
            .resizes()
            .iter()
            .map(|r| format!("{}*.{} ({})", r.prefix, r.format.extension(), r.dimensions))
            .collect::<Vec<_>>(),
        "archivalDirectory": config.archival_directory(),
        "videoExtensions": config.stack.video_extensions,
        "preview": config.stack.backup.preview,
        "transcodeBackend": config.transcode.backend,
        "transcodeDestinationPrefix": config.transcode.destination_prefix,
    })
}

pub fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"{
        "stack": {
            "bucket": "out",
            "resizes": [{ "prefix": "thumb/", "format": "png", "dimensions": "64x64" }],
            "backup": { "directory": "videos/" }
        },
        "transcode": { "backend": "http", "endpoint": "http://localhost:9000/jobs", "destinationPrefix": "hls/" }
    }"#;

    #[test]
    fn test_config_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, CONFIG).unwrap();

        let config = load_config(Some(&path)).unwrap();
        let summary = config_summary(&config);

        assert_eq!(summary["bucket"], "out");
        assert_eq!(summary["resizes"][0], "thumb/*.png (64x64)");
        assert_eq!(summary["transcodeBackend"], "http");
        assert_eq!(summary["videoExtensions"], json!(["mp4", "mov"]));
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "stack": { "bucket": "" } }"#).unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("config.json"));
    }

    #[test]
    fn test_read_event() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("event.json");
        fs::write(&path, r#"{ "Records": [] }"#).unwrap();
        assert!(read_event(&path).unwrap()["Records"].is_array());

        fs::write(&path, "not json").unwrap();
        assert!(read_event(&path).is_err());
    }
}
