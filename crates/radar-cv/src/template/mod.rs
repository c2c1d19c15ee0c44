//! Icon catalog and template matching

pub mod loader;
pub mod matcher;

pub use loader::IconLoader;
pub use matcher::{best_correlation, Correlation, IconMatch, TemplateMatcher};

use crate::Frame;
use std::collections::btree_map::{BTreeMap, Values};
use std::path::PathBuf;

/// One reference icon, already resized and cropped for matching.
#[derive(Debug, Clone)]
pub struct IconEntry {
    pub label: String,
    pub image: Frame,
    pub source: PathBuf,
}

impl IconEntry {
    pub fn new(label: String, image: Frame, source: PathBuf) -> Self {
        Self {
            label,
            image,
            source,
        }
    }

    pub fn side(&self) -> u32 {
        self.image.width()
    }
}

/// Icons keyed by label, built for a single icon size. Read-only once built.
#[derive(Debug, Clone)]
pub struct IconCatalog {
    icon_size: u32,
    icons: BTreeMap<String, IconEntry>,
}

impl IconCatalog {
    pub fn new(icon_size: u32, icons: BTreeMap<String, IconEntry>) -> Self {
        Self { icon_size, icons }
    }

    /// Icon size (before cropping) this catalog was built for.
    pub fn icon_size(&self) -> u32 {
        self.icon_size
    }

    pub fn get(&self, label: &str) -> Option<&IconEntry> {
        self.icons.get(label)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Entries in label order.
    pub fn iter(&self) -> Values<'_, String, IconEntry> {
        self.icons.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.icons.keys().map(String::as_str)
    }
}

/// Tolerance for `1 - search_ratio` not being exactly representable.
const CROP_EPS: f64 = 1e-9;

/// Side of a stored icon: `floor(icon_size * (1 - search_ratio))`.
pub fn cropped_side(icon_size: u32, search_ratio: f64) -> u32 {
    (icon_size as f64 * (1.0 - search_ratio) + CROP_EPS).floor() as u32
}
