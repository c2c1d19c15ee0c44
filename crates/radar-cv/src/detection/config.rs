//! Detection configuration

use super::minimap::MinimapAnchor;
use crate::error::RadarError;
use crate::Result;
use radar_core::{ChannelRange, Rgb};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Main detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub icons_folder: PathBuf,
    /// Case-sensitive file suffix of catalog icons, including the dot.
    pub icon_extension: String,
    /// Minimap side as a fraction of the frame's shorter side.
    pub minimap_ratio: f64,
    /// Icon side as a fraction of the minimap side.
    pub icon_ratio: f64,
    /// Fraction of the icon trimmed away (half from each edge) before matching.
    pub icon_search_ratio: f64,
    pub match_threshold: f64,
    pub anchor: MinimapAnchor,
    pub blobs: BlobConfig,
    pub color_classes: Vec<ColorClassConfig>,
    pub cleanup: MaskCleanupConfig,
    pub visualization: VisualizationConfig,
}

/// Radius band a blob's enclosing circle must fall in (both bounds exclusive).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    pub min_radius: f64,
    pub max_radius: f64,
}

/// One team color signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorClassConfig {
    pub name: String,
    pub range: ChannelRange,
    pub box_color: Rgb,
}

/// Morphological post-processing of color masks. Off unless `enabled`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskCleanupConfig {
    pub enabled: bool,
    /// Side of the square structuring element; odd.
    pub kernel_size: u8,
    pub steps: Vec<MorphologyStep>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphologyStep {
    Erode,
    Dilate,
    Open,
    Close,
}

/// Visualization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub draw_labels: bool,
    pub draw_scores: bool,
    pub label_color: Rgb,
    pub contour_color: Rgb,
    pub contour_thickness: u32,
    pub box_thickness: u32,
    pub save_intermediate: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            icons_folder: "assets/icons".into(),
            icon_extension: ".png".to_string(),
            minimap_ratio: 280.0 / 1080.0,
            icon_ratio: 25.0 / 280.0,
            icon_search_ratio: 0.5,
            match_threshold: 0.6,
            anchor: MinimapAnchor::BottomRight,
            blobs: BlobConfig::default(),
            color_classes: vec![
                ColorClassConfig {
                    name: "hostile".to_string(),
                    range: ChannelRange {
                        lower: (100, 20, 20),
                        upper: (255, 100, 100),
                    },
                    box_color: (0, 255, 0),
                },
                ColorClassConfig {
                    name: "friendly".to_string(),
                    range: ChannelRange {
                        lower: (0, 20, 100),
                        upper: (30, 170, 255),
                    },
                    box_color: (0, 255, 0),
                },
            ],
            cleanup: MaskCleanupConfig::default(),
            visualization: VisualizationConfig::default(),
        }
    }
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            min_radius: 12.0,
            max_radius: 40.0,
        }
    }
}

impl Default for MaskCleanupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            kernel_size: 5,
            steps: vec![MorphologyStep::Erode, MorphologyStep::Dilate],
        }
    }
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            draw_labels: true,
            draw_scores: false,
            label_color: (255, 255, 255),
            contour_color: (0, 255, 0),
            contour_thickness: 2,
            box_thickness: 1,
            save_intermediate: true,
        }
    }
}

impl DetectionConfig {
    /// Load a configuration from JSON. Fields missing from the file keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RadarError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| RadarError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check every constraint; the error names the offending field.
    pub fn validate(&self) -> Result<()> {
        check_open_unit("minimap_ratio", self.minimap_ratio)?;
        check_open_unit("icon_ratio", self.icon_ratio)?;
        check_open_unit("icon_search_ratio", self.icon_search_ratio)?;

        if !self.match_threshold.is_finite() {
            return Err(RadarError::config(
                "match_threshold",
                self.match_threshold,
                "must be finite",
            ));
        }

        if self.icon_extension.len() < 2 || !self.icon_extension.starts_with('.') {
            return Err(RadarError::config(
                "icon_extension",
                &self.icon_extension,
                "expected a suffix such as \".png\"",
            ));
        }

        let BlobConfig {
            min_radius,
            max_radius,
        } = self.blobs;
        if !(min_radius.is_finite() && max_radius.is_finite()) || min_radius < 0.0 {
            return Err(RadarError::config(
                "blobs",
                format!("({min_radius}, {max_radius})"),
                "radii must be finite and non-negative",
            ));
        }
        if min_radius >= max_radius {
            return Err(RadarError::config(
                "blobs",
                format!("({min_radius}, {max_radius})"),
                "min_radius must be below max_radius",
            ));
        }

        if self.color_classes.is_empty() {
            return Err(RadarError::config(
                "color_classes",
                "[]",
                "at least one color class is required",
            ));
        }
        let mut names = HashSet::new();
        for class in &self.color_classes {
            if !names.insert(class.name.as_str()) {
                return Err(RadarError::config(
                    "color_classes",
                    &class.name,
                    "class names must be unique",
                ));
            }
            class.range.check().map_err(|e| {
                RadarError::config("color_classes", &class.name, e.to_string())
            })?;
        }

        if self.cleanup.kernel_size == 0 || self.cleanup.kernel_size % 2 == 0 {
            return Err(RadarError::config(
                "cleanup.kernel_size",
                self.cleanup.kernel_size,
                "must be odd",
            ));
        }

        let vis = &self.visualization;
        if vis.contour_thickness == 0 || vis.box_thickness == 0 {
            return Err(RadarError::config(
                "visualization",
                format!("({}, {})", vis.contour_thickness, vis.box_thickness),
                "line thickness must be at least 1",
            ));
        }

        Ok(())
    }
}

fn check_open_unit(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(RadarError::config(field, value, "must lie in the open interval (0, 1)"))
    }
}
