//! Image loading, resizing and cropping helpers

use crate::Frame;
use image::imageops::{self, FilterType};
use image::ImageResult;
use radar_core::Rectangle;
use std::path::Path;

/// Image utility functions shared by the catalog builder and the matcher
pub struct ImageUtils;

impl ImageUtils {
    /// Decode an image file into RGB channel order.
    ///
    /// This is the only place channel order is normalized; callers must not
    /// swap channels again.
    pub fn load_rgb<P: AsRef<Path>>(path: P) -> ImageResult<Frame> {
        Ok(image::open(path)?.to_rgb8())
    }

    /// Bicubic (Catmull-Rom) resize to a `size` x `size` square.
    pub fn resize_square(image: &Frame, size: u32) -> Frame {
        if image.dimensions() == (size, size) {
            return image.clone();
        }
        imageops::resize(image, size, size, FilterType::CatmullRom)
    }

    /// Centered `side` x `side` crop. `side` must not exceed either dimension.
    pub fn crop_centered(image: &Frame, side: u32) -> Frame {
        let x = (image.width() - side) / 2;
        let y = (image.height() - side) / 2;
        imageops::crop_imm(image, x, y, side, side).to_image()
    }

    /// Crop `rect` out of `image`, clamped to the image bounds.
    ///
    /// Returns the crop with the origin it was actually taken from, or `None`
    /// when nothing of `rect` overlaps the image.
    pub fn crop_rect(image: &Frame, rect: &Rectangle) -> Option<(Frame, u32, u32)> {
        let x0 = rect.x.max(0) as i64;
        let y0 = rect.y.max(0) as i64;
        let x1 = (rect.right() as i64).min(image.width() as i64);
        let y1 = (rect.bottom() as i64).min(image.height() as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        let (x, y) = (x0 as u32, y0 as u32);
        let crop = imageops::crop_imm(image, x, y, (x1 - x0) as u32, (y1 - y0) as u32).to_image();
        Some((crop, x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn resize_reaches_requested_side() {
        let img = Frame::from_pixel(40, 30, Rgb([10, 20, 30]));
        let resized = ImageUtils::resize_square(&img, 25);
        assert_eq!(resized.dimensions(), (25, 25));
    }

    #[test]
    fn centered_crop_takes_middle() {
        let img = Frame::from_fn(10, 10, |x, y| Rgb([x as u8, y as u8, 0]));
        let crop = ImageUtils::crop_centered(&img, 4);
        assert_eq!(crop.dimensions(), (4, 4));
        assert_eq!(crop.get_pixel(0, 0).0, [3, 3, 0]);
    }

    #[test]
    fn crop_rect_clamps_to_bounds() {
        let img = Frame::new(50, 50);
        let (crop, x, y) = ImageUtils::crop_rect(&img, &Rectangle::new(-5, 40, 20, 20)).unwrap();
        assert_eq!((x, y), (0, 40));
        assert_eq!(crop.dimensions(), (15, 10));
        assert!(ImageUtils::crop_rect(&img, &Rectangle::new(60, 0, 5, 5)).is_none());
    }

    #[test]
    fn load_reports_missing_file() {
        assert!(ImageUtils::load_rgb("definitely/not/here.png").is_err());
    }
}
