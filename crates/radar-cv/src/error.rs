use std::path::PathBuf;

/// Errors returned by the minimap detection pipeline.
#[derive(thiserror::Error, Debug)]
pub enum RadarError {
    #[error("invalid configuration: {field} = {value} ({reason})")]
    Config {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to read icon catalog directory {path:?}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode icon {path:?}")]
    CatalogDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("duplicate icon label '{label}' from {path:?}")]
    DuplicateLabel { label: String, path: PathBuf },
    #[error("invalid frame: {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },
    #[error("catalog was built for icon size {catalog}, frame needs {frame}")]
    StaleCatalog { catalog: u32, frame: u32 },
    #[error("failed to read config file {path:?}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to export report to {path:?}")]
    Export {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RadarError {
    pub(crate) fn config(field: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        RadarError::Config {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
