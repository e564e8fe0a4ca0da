//! JSON envelopes and asset/function lookups

use runtime_helpers_common::constants::STATUS_INTERNAL_ERROR;
use runtime_helpers_common::{Envelope, FunctionResponse, HelperError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A 200 JSON response `{ "success": true, ...data }`
pub fn success(data: Value) -> FunctionResponse {
    FunctionResponse::json(200, envelope_value(Envelope::success(data)))
}

/// A 500 JSON response `{ "success": false, "error": message }`
pub fn failure(message: impl Into<String>) -> FunctionResponse {
    FunctionResponse::json(STATUS_INTERNAL_ERROR, envelope_value(Envelope::failure(message)))
}

fn envelope_value(envelope: Envelope) -> Value {
    serde_json::to_value(envelope).unwrap_or_default()
}

/// A deployed asset file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub path: PathBuf,
}

/// A deployed Function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    pub path: PathBuf,
}

/// The deployment's asset and function registries
pub trait Runtime {
    /// Assets keyed by their public path, e.g. `/config.json`
    fn assets(&self) -> &HashMap<String, Asset>;

    /// Functions keyed by name
    fn functions(&self) -> &HashMap<String, FunctionEntry>;
}

/// A [`Runtime`] backed by fixed maps
#[derive(Debug, Clone, Default)]
pub struct StaticRuntime {
    assets: HashMap<String, Asset>,
    functions: HashMap<String, FunctionEntry>,
}

impl StaticRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.assets.insert(key.into(), Asset { path: path.into() });
        self
    }

    pub fn with_function(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.functions
            .insert(name.into(), FunctionEntry { path: path.into() });
        self
    }

    /// Register every file under `dir` as an asset keyed `/<relative path>`
    pub async fn from_asset_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let root = dir.as_ref();
        let mut runtime = Self::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(current) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&current).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                    continue;
                }

                let relative = path
                    .strip_prefix(root)
                    .map_err(|e| HelperError::InternalError(e.to_string()))?;
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                runtime = runtime.with_asset(format!("/{}", key), path);
            }
        }

        Ok(runtime)
    }
}

impl Runtime for StaticRuntime {
    fn assets(&self) -> &HashMap<String, Asset> {
        &self.assets
    }

    fn functions(&self) -> &HashMap<String, FunctionEntry> {
        &self.functions
    }
}

/// Look up an asset by its public path
pub fn require_asset<'a, R: Runtime + ?Sized>(runtime: &'a R, path: &str) -> Result<&'a Asset> {
    runtime
        .assets()
        .get(path)
        .ok_or_else(|| HelperError::AssetNotFound(path.to_string()))
}

/// Look up a Function by name
pub fn require_function<'a, R: Runtime + ?Sized>(
    runtime: &'a R,
    name: &str,
) -> Result<&'a FunctionEntry> {
    runtime
        .functions()
        .get(name)
        .ok_or_else(|| HelperError::FunctionNotFound(name.to_string()))
}

/// Load the contents of an asset
pub async fn read_asset<R: Runtime + ?Sized>(runtime: &R, path: &str) -> Result<Vec<u8>> {
    let asset = require_asset(runtime, path)?;
    Ok(tokio::fs::read(&asset.path).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_merges_object_fields() {
        let res = success(json!({"variable": "API_KEY", "success": false}));

        assert_eq!(res.status_code, 200);
        assert_eq!(res.header("Content-Type"), Some("application/json"));
        assert_eq!(res.body, Some(json!({"success": true, "variable": "API_KEY"})));
    }

    #[test]
    fn test_success_wraps_other_values() {
        assert_eq!(success(json!([1, 2])).body, Some(json!({"success": true, "data": [1, 2]})));
        assert_eq!(success(Value::Null).body, Some(json!({"success": true})));
    }

    #[test]
    fn test_failure() {
        let res = failure("Something went wrong");

        assert_eq!(res.status_code, 500);
        assert_eq!(
            res.body,
            Some(json!({"success": false, "error": "Something went wrong"}))
        );
    }

    #[test]
    fn test_require_lookups() {
        let runtime = StaticRuntime::new()
            .with_asset("/config.json", "/var/task/assets/config.json")
            .with_function("auth", "/var/task/functions/auth.js");

        let asset = require_asset(&runtime, "/config.json").unwrap();
        assert_eq!(asset.path, PathBuf::from("/var/task/assets/config.json"));
        assert!(require_function(&runtime, "auth").is_ok());

        assert!(matches!(
            require_asset(&runtime, "/missing.json"),
            Err(HelperError::AssetNotFound(ref p)) if p == "/missing.json"
        ));
        assert!(matches!(
            require_function(&runtime, "missing"),
            Err(HelperError::FunctionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_asset_dir_scan_and_read() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::create_dir_all(dir.path().join("nested")).await.unwrap();
        tokio::fs::write(dir.path().join("index.html"), b"<h1>hi</h1>").await.unwrap();
        tokio::fs::write(dir.path().join("nested").join("data.json"), b"{}").await.unwrap();

        let runtime = StaticRuntime::from_asset_dir(dir.path()).await.unwrap();
        assert_eq!(runtime.assets().len(), 2);

        let bytes = read_asset(&runtime, "/nested/data.json").await.unwrap();
        assert_eq!(bytes, b"{}");

        let dyn_runtime: &dyn Runtime = &runtime;
        assert!(read_asset(dyn_runtime, "/index.html").await.is_ok());
    }

    #[tokio::test]
    async fn test_read_asset_io_error() {
        let runtime = StaticRuntime::new().with_asset("/gone.txt", "/nonexistent/path/gone.txt");

        let err = read_asset(&runtime, "/gone.txt").await.unwrap_err();
        assert!(matches!(err, HelperError::IoError(_)));
    }
}
