//! Frame-level detection pipeline

pub mod blobs;
pub mod config;
pub mod detector;
pub mod minimap;
pub mod segment;

pub use blobs::BlobDetector;
pub use config::{
    BlobConfig, ColorClassConfig, DetectionConfig, MaskCleanupConfig, MorphologyStep, VisualizationConfig,
};
pub use detector::{ClassReport, FrameReport, MinimapDetector};
pub use minimap::{MinimapAnchor, MinimapExtractor, MinimapRegion};
pub use segment::{segment, MaskCleanup};
