//! Zero-mean normalized cross-correlation against the icon catalog

use super::{IconCatalog, IconEntry};
use crate::bbox::{CandidateBlob, MatchResult};
use crate::utils::ImageUtils;
use crate::Frame;
use log::trace;
use radar_core::Rectangle;

/// Below this, a window or icon is treated as flat.
const FLAT_EPS: f64 = 1e-6;

/// Best placement of one icon inside a patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub score: f64,
    /// Offset of the icon inside the patch.
    pub x: u32,
    pub y: u32,
}

/// Slide `icon` over every position inside `patch` and return the highest
/// correlation coefficient, first in raster order on ties.
///
/// All three channels share a single mean. Flat windows and flat icons score
/// 0. Returns `None` when the icon does not fit inside the patch.
pub fn best_correlation(patch: &Frame, icon: &Frame) -> Option<Correlation> {
    let (pw, ph) = patch.dimensions();
    let (iw, ih) = icon.dimensions();
    if iw == 0 || ih == 0 || iw > pw || ih > ph {
        return None;
    }

    let n = (iw * ih * 3) as f64;
    let icon_samples: Vec<f64> = icon.as_raw().iter().map(|&v| v as f64).collect();
    let icon_mean = icon_samples.iter().sum::<f64>() / n;
    let centered: Vec<f64> = icon_samples.iter().map(|v| v - icon_mean).collect();
    let icon_energy: f64 = centered.iter().map(|v| v * v).sum();
    let row_len = (iw * 3) as usize;

    let mut best: Option<Correlation> = None;
    for oy in 0..=(ph - ih) {
        for ox in 0..=(pw - iw) {
            let mut sum = 0.0;
            let mut sum_sq = 0.0;
            let mut cross = 0.0;
            for row in 0..ih {
                let start = ((oy + row) * pw + ox) as usize * 3;
                let window = &patch.as_raw()[start..start + row_len];
                let template = &centered[row as usize * row_len..(row as usize + 1) * row_len];
                for (&w, &t) in window.iter().zip(template) {
                    let w = w as f64;
                    sum += w;
                    sum_sq += w * w;
                    cross += w * t;
                }
            }

            let window_energy = sum_sq - sum * sum / n;
            let score = if icon_energy <= FLAT_EPS || window_energy <= FLAT_EPS {
                0.0
            } else {
                (cross / (icon_energy * window_energy).sqrt()).clamp(-1.0, 1.0)
            };

            if best.map_or(true, |b| score > b.score) {
                best = Some(Correlation { score, x: ox, y: oy });
            }
        }
    }
    best
}

/// Best catalog icon for one query box.
#[derive(Debug, Clone, PartialEq)]
pub struct IconMatch {
    pub label: String,
    pub score: f64,
    /// Icon placement in minimap coordinates.
    pub draw_box: Rectangle,
}

/// Classifies blobs by their best-correlating catalog icon.
#[derive(Debug, Clone, Copy)]
pub struct TemplateMatcher {
    threshold: f64,
}

impl TemplateMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Highest-scoring icon for the patch under `bbox`, regardless of the
    /// threshold. Icons larger than the patch are skipped. Ties keep the
    /// first label in catalog order.
    pub fn best_icon(&self, minimap: &Frame, bbox: &Rectangle, catalog: &IconCatalog) -> Option<IconMatch> {
        let (patch, px, py) = ImageUtils::crop_rect(minimap, bbox)?;

        let score_icon = |entry: &IconEntry| -> Option<Correlation> {
            let found = best_correlation(&patch, &entry.image);
            if let Some(c) = found {
                trace!("{}: {:.4} at ({}, {})", entry.label, c.score, c.x, c.y);
            }
            found
        };

        #[cfg(feature = "parallel")]
        let scored: Vec<Option<Correlation>> = {
            use rayon::prelude::*;
            let entries: Vec<&IconEntry> = catalog.iter().collect();
            entries.par_iter().map(|&entry| score_icon(entry)).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let scored: Vec<Option<Correlation>> = catalog.iter().map(score_icon).collect();

        let mut best: Option<(&IconEntry, Correlation)> = None;
        for (entry, corr) in catalog.iter().zip(scored) {
            let Some(corr) = corr else { continue };
            if best.map_or(true, |(_, b)| corr.score > b.score) {
                best = Some((entry, corr));
            }
        }

        best.map(|(entry, corr)| IconMatch {
            label: entry.label.clone(),
            score: corr.score,
            draw_box: Rectangle::new(
                (px + corr.x) as i32,
                (py + corr.y) as i32,
                entry.image.width() as i32,
                entry.image.height() as i32,
            ),
        })
    }

    /// Best icon for `bbox` if it reaches the threshold.
    pub fn match_best(&self, minimap: &Frame, bbox: &Rectangle, catalog: &IconCatalog) -> Option<IconMatch> {
        self.best_icon(minimap, bbox, catalog)
            .filter(|m| m.score >= self.threshold)
    }

    /// Classify one blob. Unlabeled results keep the best score seen.
    pub fn match_blob(&self, minimap: &Frame, blob: &CandidateBlob, catalog: &IconCatalog) -> MatchResult {
        match self.best_icon(minimap, &blob.bbox, catalog) {
            Some(m) if m.score >= self.threshold => MatchResult {
                blob: *blob,
                label: Some(m.label),
                score: m.score,
                draw_box: m.draw_box,
            },
            Some(m) => MatchResult {
                score: m.score,
                ..MatchResult::unmatched(*blob)
            },
            None => MatchResult::unmatched(*blob),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use radar_core::Circle;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn checker(w: u32, h: u32, seed: u32) -> Frame {
        Frame::from_fn(w, h, |x, y| {
            let v = ((x * 37 + y * 91 + seed * 13) % 251) as u8;
            Rgb([v, v.wrapping_mul(3), 255 - v])
        })
    }

    fn catalog(icons: Vec<(&str, Frame)>) -> IconCatalog {
        let icons = icons
            .into_iter()
            .map(|(label, image)| {
                (
                    label.to_string(),
                    IconEntry::new(label.to_string(), image, PathBuf::from(format!("{label}.png"))),
                )
            })
            .collect::<BTreeMap<_, _>>();
        IconCatalog::new(20, icons)
    }

    #[test]
    fn identical_patch_scores_one() {
        let icon = checker(10, 10, 1);
        let corr = best_correlation(&icon, &icon).unwrap();
        assert!((corr.score - 1.0).abs() < 1e-9);
        assert_eq!((corr.x, corr.y), (0, 0));
    }

    #[test]
    fn sliding_finds_embedded_icon() {
        let patch = checker(30, 30, 7);
        let icon = image::imageops::crop_imm(&patch, 12, 5, 8, 8).to_image();
        let corr = best_correlation(&patch, &icon).unwrap();
        assert!((corr.score - 1.0).abs() < 1e-9);
        assert_eq!((corr.x, corr.y), (12, 5));
    }

    #[test]
    fn oversized_icon_is_skipped() {
        assert!(best_correlation(&checker(8, 8, 0), &checker(9, 4, 0)).is_none());
    }

    #[test]
    fn flat_inputs_score_zero() {
        let flat = Frame::from_pixel(10, 10, Rgb([40, 40, 40]));
        let textured = checker(10, 10, 3);
        assert_eq!(best_correlation(&flat, &textured).unwrap().score, 0.0);
        assert_eq!(best_correlation(&textured, &flat).unwrap().score, 0.0);
    }

    #[test]
    fn scores_stay_in_unit_range() {
        for seed in 0..6 {
            let patch = checker(24, 24, seed);
            let icon = checker(10, 10, seed * 5 + 2);
            let corr = best_correlation(&patch, &icon).unwrap();
            assert!((-1.0..=1.0).contains(&corr.score), "score {}", corr.score);
        }
    }

    #[test]
    fn inverted_icon_scores_minus_one() {
        let icon = checker(6, 6, 4);
        let mut inverted = icon.clone();
        for p in inverted.pixels_mut() {
            p.0 = [255 - p.0[0], 255 - p.0[1], 255 - p.0[2]];
        }
        let corr = best_correlation(&inverted, &icon).unwrap();
        assert!((corr.score + 1.0).abs() < 1e-9);
    }

    #[test]
    fn blob_is_labeled_by_best_icon() {
        let mut minimap = Frame::new(80, 80);
        let art = checker(20, 20, 9);
        image::imageops::replace(&mut minimap, &art, 30, 30);

        let catalog = catalog(vec![("Ashe", art), ("Garen", checker(20, 20, 42))]);
        let blob = CandidateBlob::from_circle(Circle::new(40.0, 40.0, 15.0));
        let result = TemplateMatcher::new(0.6).match_blob(&minimap, &blob, &catalog);

        assert_eq!(result.label.as_deref(), Some("Ashe"));
        assert!((result.score - 1.0).abs() < 1e-9);
        assert_eq!(result.draw_box, Rectangle::new(30, 30, 20, 20));
    }

    #[test]
    fn threshold_gates_the_label() {
        let minimap = checker(60, 60, 1);
        let catalog = catalog(vec![("Ashe", checker(12, 12, 77))]);
        let blob = CandidateBlob::from_circle(Circle::new(30.0, 30.0, 14.0));
        let matcher = TemplateMatcher::new(1.1);

        let best = matcher.best_icon(&minimap, &blob.bbox, &catalog).unwrap();
        assert!(matcher.match_best(&minimap, &blob.bbox, &catalog).is_none());

        let result = matcher.match_blob(&minimap, &blob, &catalog);
        assert!(!result.is_labeled());
        assert_eq!(result.score, best.score);
        assert_eq!(result.draw_box, blob.bbox);
    }

    #[test]
    fn no_fitting_icon_leaves_blob_unscored() {
        let minimap = checker(60, 60, 1);
        let catalog = catalog(vec![("Big", checker(40, 40, 2))]);
        let blob = CandidateBlob::from_circle(Circle::new(30.0, 30.0, 13.0));
        let result = TemplateMatcher::new(0.0).match_blob(&minimap, &blob, &catalog);
        assert_eq!(result, MatchResult::unmatched(blob));
    }
}
