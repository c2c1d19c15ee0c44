//! Minimap geometry: where the minimap sits in a frame and how large its icons are.

use crate::error::RadarError;
use crate::{Frame, Result};
use image::imageops;
use radar_core::Rectangle;
use serde::{Deserialize, Serialize};

/// Frame corner the minimap is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimapAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

/// Square minimap cut out of a frame, plus the icon size it implies.
#[derive(Debug, Clone, Serialize)]
pub struct MinimapRegion {
    /// Placement of the minimap in frame coordinates.
    pub rect: Rectangle,
    pub icon_size: u32,
    #[serde(skip)]
    pub image: Frame,
}

impl MinimapRegion {
    pub fn side(&self) -> u32 {
        self.image.width()
    }
}

/// Derives the minimap region from frames of any resolution.
#[derive(Debug, Clone, Copy)]
pub struct MinimapExtractor {
    minimap_ratio: f64,
    icon_ratio: f64,
    anchor: MinimapAnchor,
}

impl MinimapExtractor {
    pub fn new(minimap_ratio: f64, icon_ratio: f64, anchor: MinimapAnchor) -> Result<Self> {
        for (field, value) in [("minimap_ratio", minimap_ratio), ("icon_ratio", icon_ratio)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(RadarError::config(
                    field,
                    value,
                    "must lie in the open interval (0, 1)",
                ));
            }
        }
        Ok(Self {
            minimap_ratio,
            icon_ratio,
            anchor,
        })
    }

    /// Minimap rectangle and icon size for a `width` x `height` frame.
    pub fn layout(&self, width: u32, height: u32) -> Result<(Rectangle, u32)> {
        if width == 0 || height == 0 {
            return Err(RadarError::InvalidFrame { width, height });
        }

        let side = (width.min(height) as f64 * self.minimap_ratio).floor() as u32;
        if side == 0 {
            return Err(RadarError::InvalidFrame { width, height });
        }
        let icon_size = (side as f64 * self.icon_ratio).floor() as u32;
        if icon_size == 0 {
            return Err(RadarError::InvalidFrame { width, height });
        }

        let (x, y) = match self.anchor {
            MinimapAnchor::TopLeft => (0, 0),
            MinimapAnchor::TopRight => (width - side, 0),
            MinimapAnchor::BottomLeft => (0, height - side),
            MinimapAnchor::BottomRight => (width - side, height - side),
        };
        let rect = Rectangle::new(x as i32, y as i32, side as i32, side as i32);
        Ok((rect, icon_size))
    }

    /// Crop the minimap out of `frame`. The frame itself is left untouched.
    pub fn extract(&self, frame: &Frame) -> Result<MinimapRegion> {
        let (rect, icon_size) = self.layout(frame.width(), frame.height())?;
        let image = imageops::crop_imm(
            frame,
            rect.x as u32,
            rect.y as u32,
            rect.width as u32,
            rect.height as u32,
        )
        .to_image();

        Ok(MinimapRegion {
            rect,
            icon_size,
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn bottom_right_of_full_hd() -> Result<()> {
        let extractor = MinimapExtractor::new(280.0 / 1080.0, 25.0 / 280.0, MinimapAnchor::BottomRight)?;
        let (rect, icon_size) = extractor.layout(1920, 1080)?;
        assert_eq!(rect, Rectangle::new(1920 - 280, 1080 - 280, 280, 280));
        assert_eq!(icon_size, 25);
        Ok(())
    }

    #[test]
    fn uses_shorter_side() -> Result<()> {
        let extractor = MinimapExtractor::new(0.5, 0.25, MinimapAnchor::TopLeft)?;
        let (rect, icon_size) = extractor.layout(300, 1000)?;
        assert_eq!(rect, Rectangle::new(0, 0, 150, 150));
        assert_eq!(icon_size, 37);
        Ok(())
    }

    #[test]
    fn crop_takes_the_anchored_corner() -> Result<()> {
        let frame = Frame::from_fn(40, 20, |x, y| {
            if x >= 30 && y >= 10 { Rgb([9, 9, 9]) } else { Rgb([0, 0, 0]) }
        });
        let extractor = MinimapExtractor::new(0.5, 0.5, MinimapAnchor::BottomRight)?;
        let region = extractor.extract(&frame)?;
        assert_eq!(region.side(), 10);
        assert_eq!(region.icon_size, 5);
        assert!(region.image.pixels().all(|p| p.0 == [9, 9, 9]));
        Ok(())
    }

    #[test]
    fn empty_frame_is_invalid() {
        let extractor = MinimapExtractor::new(0.5, 0.5, MinimapAnchor::BottomRight).unwrap();
        let frame = Frame::new(0, 10);
        assert!(matches!(
            extractor.extract(&frame),
            Err(RadarError::InvalidFrame { width: 0, height: 10 })
        ));
    }

    #[test]
    fn frame_too_small_for_an_icon_is_invalid() {
        let extractor = MinimapExtractor::new(280.0 / 1080.0, 25.0 / 280.0, MinimapAnchor::BottomRight).unwrap();
        assert!(matches!(
            extractor.layout(40, 40),
            Err(RadarError::InvalidFrame { width: 40, height: 40 })
        ));
    }

    #[test]
    fn ratio_outside_unit_interval_is_rejected() {
        assert!(MinimapExtractor::new(1.0, 0.5, MinimapAnchor::BottomRight).is_err());
        assert!(MinimapExtractor::new(0.5, 0.0, MinimapAnchor::BottomRight).is_err());
    }
}
