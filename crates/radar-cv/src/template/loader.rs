//! Icon catalog loading

use super::{cropped_side, IconCatalog, IconEntry};
use crate::error::RadarError;
use crate::utils::ImageUtils;
use crate::Result;
use log::{debug, info, trace};
use std::collections::btree_map::{BTreeMap, Entry};
use std::fs;
use std::path::{Path, PathBuf};

/// Builds icon catalogs from one or more directories of reference images.
pub struct IconLoader {
    icon_dirs: Vec<PathBuf>,
    extension: String,
}

impl IconLoader {
    /// Loader for `dir`, accepting `.png` files.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            icon_dirs: vec![dir.as_ref().to_path_buf()],
            extension: ".png".to_string(),
        }
    }

    /// Add another icon directory. Labels must stay unique across directories.
    pub fn add_icon_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.icon_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    /// Set the accepted file suffix, e.g. `".png"`. Matching is case-sensitive.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Label for a file name, or `None` when the name does not carry the
    /// configured suffix.
    pub fn label_for(&self, file_name: &str) -> Option<String> {
        file_name
            .strip_suffix(&self.extension)
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
    }

    /// Build a catalog for `icon_size`, trimming `search_ratio / 2` of the
    /// icon from each edge.
    pub fn build(&self, icon_size: u32, search_ratio: f64) -> Result<IconCatalog> {
        if !(search_ratio > 0.0 && search_ratio < 1.0) {
            return Err(RadarError::config(
                "icon_search_ratio",
                search_ratio,
                "must lie in the open interval (0, 1)",
            ));
        }
        if icon_size == 0 {
            return Err(RadarError::config("icon_size", icon_size, "must be positive"));
        }
        let side = cropped_side(icon_size, search_ratio);
        if side == 0 {
            return Err(RadarError::config(
                "icon_search_ratio",
                search_ratio,
                format!("leaves no pixels of a {icon_size}px icon"),
            ));
        }

        let mut icons = BTreeMap::new();
        for dir in &self.icon_dirs {
            for (label, path) in self.scan_dir(dir)? {
                let image = ImageUtils::load_rgb(&path).map_err(|source| {
                    RadarError::CatalogDecode {
                        path: path.clone(),
                        source,
                    }
                })?;
                let resized = ImageUtils::resize_square(&image, icon_size);
                let cropped = ImageUtils::crop_centered(&resized, side);

                match icons.entry(label) {
                    Entry::Vacant(slot) => {
                        let label = slot.key().clone();
                        slot.insert(IconEntry::new(label, cropped, path));
                    }
                    Entry::Occupied(slot) => {
                        return Err(RadarError::DuplicateLabel {
                            label: slot.key().clone(),
                            path,
                        });
                    }
                }
            }
        }

        info!(
            "icon catalog: {} icons, {}px cropped to {}px",
            icons.len(),
            icon_size,
            side
        );
        Ok(IconCatalog::new(icon_size, icons))
    }

    /// Accepted `(label, path)` pairs of `dir`, sorted by file name.
    fn scan_dir(&self, dir: &Path) -> Result<Vec<(String, PathBuf)>> {
        let io_err = |source| RadarError::CatalogIo {
            path: dir.to_path_buf(),
            source,
        };

        let mut accepted = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                trace!("skipping non UTF-8 entry {:?}", path);
                continue;
            };
            let Some(label) = self.label_for(file_name) else {
                trace!("skipping {:?}: not a {} file", path, self.extension);
                continue;
            };
            if !path.is_file() {
                trace!("skipping {:?}: not a regular file", path);
                continue;
            }
            accepted.push((label, path));
        }

        accepted.sort_by(|a, b| a.1.cmp(&b.1));
        debug!("{} icon files in {:?}", accepted.len(), dir);
        Ok(accepted)
    }
}
