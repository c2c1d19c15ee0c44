//! Connected-region extraction and marker-size filtering.

use super::config::BlobConfig;
use crate::bbox::CandidateBlob;
use crate::Mask;
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::geometry::convex_hull;
use log::trace;
use radar_core::min_enclosing_circle;

/// Finds marker-sized circular regions in a binary mask.
#[derive(Debug, Clone, Copy)]
pub struct BlobDetector {
    min_radius: f64,
    max_radius: f64,
}

impl BlobDetector {
    pub fn new(config: &BlobConfig) -> Self {
        Self {
            min_radius: config.min_radius,
            max_radius: config.max_radius,
        }
    }

    /// Every outermost region of `mask`, before size filtering. Holes and
    /// regions nested inside holes are not reported.
    pub fn candidates(&self, mask: &Mask) -> Vec<CandidateBlob> {
        find_contours::<i32>(mask)
            .iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .filter_map(enclosing_blob)
            .collect()
    }

    /// Candidates whose radius lies strictly inside the configured band and
    /// whose bounding box fits inside the mask.
    pub fn detect(&self, mask: &Mask) -> Vec<CandidateBlob> {
        let (width, height) = mask.dimensions();
        self.candidates(mask)
            .into_iter()
            .filter(|blob| {
                let keep = self.accepts(blob, width, height);
                if !keep {
                    trace!(
                        "rejected blob at ({:.1}, {:.1}) r={:.1}",
                        blob.circle.x,
                        blob.circle.y,
                        blob.circle.radius
                    );
                }
                keep
            })
            .collect()
    }

    pub fn accepts(&self, blob: &CandidateBlob, width: u32, height: u32) -> bool {
        let radius = blob.radius();
        radius > self.min_radius && radius < self.max_radius && blob.bbox.lies_within(width, height)
    }
}

fn enclosing_blob(contour: &Contour<i32>) -> Option<CandidateBlob> {
    let points = if contour.points.len() < 3 {
        contour.points.clone()
    } else {
        convex_hull(contour.points.as_slice())
    };
    let points: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    min_enclosing_circle(&points).map(CandidateBlob::from_circle)
}
