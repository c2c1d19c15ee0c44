//! Color-band segmentation of the minimap.

use super::config::{MaskCleanupConfig, MorphologyStep};
use crate::{Frame, Mask};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use radar_core::ChannelRange;

pub const MARKER: u8 = 255;

/// Binary mask of the pixels whose every channel lies inside `range`.
pub fn segment(minimap: &Frame, range: &ChannelRange) -> Mask {
    Mask::from_fn(minimap.width(), minimap.height(), |x, y| {
        let pixel = minimap.get_pixel(x, y).0;
        image::Luma([if range.contains(pixel) { MARKER } else { 0 }])
    })
}

/// Optional morphological cleanup applied to a mask before blob extraction.
#[derive(Debug, Clone)]
pub struct MaskCleanup {
    steps: Vec<MorphologyStep>,
    radius: u8,
}

impl MaskCleanup {
    /// `None` when cleanup is disabled, which is the default.
    pub fn from_config(config: &MaskCleanupConfig) -> Option<Self> {
        if !config.enabled || config.steps.is_empty() {
            return None;
        }
        Some(Self {
            steps: config.steps.clone(),
            radius: config.kernel_size / 2,
        })
    }

    pub fn apply(&self, mask: &Mask) -> Mask {
        // LInf distance with radius k is a (2k+1)x(2k+1) square kernel.
        self.steps.iter().fold(mask.clone(), |current, step| match step {
            MorphologyStep::Erode => morphology::erode(&current, Norm::LInf, self.radius),
            MorphologyStep::Dilate => morphology::dilate(&current, Norm::LInf, self.radius),
            MorphologyStep::Open => morphology::open(&current, Norm::LInf, self.radius),
            MorphologyStep::Close => morphology::close(&current, Norm::LInf, self.radius),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn hostile() -> ChannelRange {
        ChannelRange {
            lower: (100, 20, 20),
            upper: (255, 100, 100),
        }
    }

    #[test]
    fn mask_keeps_dimensions_and_marks_band() {
        let mut minimap = Frame::new(6, 4);
        minimap.put_pixel(1, 1, Rgb([200, 50, 50]));
        minimap.put_pixel(2, 3, Rgb([20, 50, 200]));

        let mask = segment(&minimap, &hostile());
        assert_eq!(mask.dimensions(), (6, 4));
        assert_eq!(mask.get_pixel(1, 1).0, [MARKER]);
        assert_eq!(mask.get_pixel(2, 3).0, [0]);
        assert_eq!(mask.pixels().filter(|p| p.0[0] == MARKER).count(), 1);
    }

    #[test]
    fn black_minimap_gives_empty_mask() {
        let mask = segment(&Frame::new(32, 32), &hostile());
        assert!(mask.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn cleanup_is_off_by_default() {
        assert!(MaskCleanup::from_config(&MaskCleanupConfig::default()).is_none());
    }

    #[test]
    fn opening_removes_speckles() {
        let mut mask = Mask::new(20, 20);
        mask.put_pixel(3, 3, image::Luma([MARKER]));
        for y in 8..16 {
            for x in 8..16 {
                mask.put_pixel(x, y, image::Luma([MARKER]));
            }
        }
        let cleanup = MaskCleanup::from_config(&MaskCleanupConfig {
            enabled: true,
            kernel_size: 3,
            steps: vec![MorphologyStep::Open],
        })
        .unwrap();

        let cleaned = cleanup.apply(&mask);
        assert_eq!(cleaned.get_pixel(3, 3).0, [0]);
        assert_eq!(cleaned.get_pixel(12, 12).0, [MARKER]);
    }
}
