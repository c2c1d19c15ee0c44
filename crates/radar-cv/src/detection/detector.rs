//! Frame-level minimap detector

use super::blobs::BlobDetector;
use super::config::{ColorClassConfig, DetectionConfig};
use super::minimap::{MinimapExtractor, MinimapRegion};
use super::segment::{segment, MaskCleanup};
use crate::annotate::Annotator;
use crate::bbox::{MatchCollection, MatchStats};
use crate::error::RadarError;
use crate::template::{IconCatalog, IconLoader, TemplateMatcher};
use crate::{Frame, Mask, Result};
use log::debug;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Pipeline output of one color class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub name: String,
    #[serde(skip)]
    pub mask: Mask,
    /// Minimap with every retained blob circled.
    #[serde(skip)]
    pub contour_frame: Frame,
    pub matches: MatchCollection,
    #[serde(skip)]
    pub annotated: Frame,
    pub stats: MatchStats,
}

/// Pipeline output of one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub minimap: MinimapRegion,
    pub classes: Vec<ClassReport>,
    pub processing_time_ms: u64,
}

impl FrameReport {
    pub fn class(&self, name: &str) -> Option<&ClassReport> {
        self.classes.iter().find(|c| c.name == name)
    }
}

/// Runs minimap extraction, segmentation, blob detection, matching and
/// annotation for every configured color class.
pub struct MinimapDetector {
    config: DetectionConfig,
    extractor: MinimapExtractor,
    blob_detector: BlobDetector,
    matcher: TemplateMatcher,
    cleanup: Option<MaskCleanup>,
    annotator: Annotator,
}

impl MinimapDetector {
    pub fn new(config: DetectionConfig) -> Result<Self> {
        config.validate()?;

        let extractor = MinimapExtractor::new(config.minimap_ratio, config.icon_ratio, config.anchor)?;
        let blob_detector = BlobDetector::new(&config.blobs);
        let matcher = TemplateMatcher::new(config.match_threshold);
        let cleanup = MaskCleanup::from_config(&config.cleanup);
        let annotator = Annotator::new(config.visualization.clone());

        Ok(Self {
            config,
            extractor,
            blob_detector,
            matcher,
            cleanup,
            annotator,
        })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Icon size a `width` x `height` frame needs its catalog built for.
    pub fn icon_size_for(&self, width: u32, height: u32) -> Result<u32> {
        self.extractor.layout(width, height).map(|(_, icon_size)| icon_size)
    }

    /// Build the icon catalog from the configured folder.
    pub fn build_catalog(&self, icon_size: u32) -> Result<IconCatalog> {
        IconLoader::new(&self.config.icons_folder)
            .with_extension(self.config.icon_extension.clone())
            .build(icon_size, self.config.icon_search_ratio)
    }

    /// Run the whole pipeline on one frame.
    ///
    /// Fails with `InvalidFrame` for empty frames and `StaleCatalog` when
    /// `catalog` was built for a different resolution.
    pub fn process_frame(&self, frame: &Frame, catalog: &IconCatalog) -> Result<FrameReport> {
        let start_time = Instant::now();

        let minimap = self.extractor.extract(frame)?;
        if minimap.icon_size != catalog.icon_size() {
            return Err(RadarError::StaleCatalog {
                catalog: catalog.icon_size(),
                frame: minimap.icon_size,
            });
        }

        #[cfg(feature = "parallel")]
        let classes: Vec<ClassReport> = {
            use rayon::prelude::*;
            self.config
                .color_classes
                .par_iter()
                .map(|class| self.process_class(&minimap.image, class, catalog))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let classes: Vec<ClassReport> = self
            .config
            .color_classes
            .iter()
            .map(|class| self.process_class(&minimap.image, class, catalog))
            .collect();

        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        debug!(
            "processed {}x{} frame in {} ms",
            frame.width(),
            frame.height(),
            processing_time_ms
        );

        Ok(FrameReport {
            minimap,
            classes,
            processing_time_ms,
        })
    }

    /// Segment, detect, match and annotate a single color class.
    pub fn process_class(&self, minimap: &Frame, class: &ColorClassConfig, catalog: &IconCatalog) -> ClassReport {
        let raw_mask = segment(minimap, &class.range);
        let mask = match &self.cleanup {
            Some(cleanup) => cleanup.apply(&raw_mask),
            None => raw_mask,
        };

        let blobs = self.blob_detector.detect(&mask);
        let matches: MatchCollection = blobs
            .iter()
            .map(|blob| self.matcher.match_blob(minimap, blob, catalog))
            .collect();
        let stats = matches.stats();

        debug!(
            "{}: {} blobs, {} labeled {:?}",
            class.name,
            stats.total_blobs,
            stats.labeled,
            matches.labels()
        );

        ClassReport {
            name: class.name.clone(),
            contour_frame: self.annotator.contours(minimap, &blobs),
            annotated: self.annotator.annotate(minimap, &matches, class.box_color),
            mask,
            matches,
            stats,
        }
    }

    /// Write the report's geometry, matches and statistics as JSON.
    pub fn export_json(&self, report: &FrameReport, output_path: &Path) -> Result<()> {
        let export_err = |source: Box<dyn std::error::Error + Send + Sync>| RadarError::Export {
            path: output_path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(report).map_err(|e| export_err(e.into()))?;
        std::fs::write(output_path, json).map_err(|e| export_err(e.into()))?;
        Ok(())
    }
}
