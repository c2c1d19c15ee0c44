//! Rendering of match results and diagnostic contour views

use crate::bbox::{CandidateBlob, MatchCollection};
use crate::detection::config::VisualizationConfig;
use crate::Frame;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point, Size};
use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::text::Text;
use embedded_graphics::{Drawable, Pixel};
use image::Rgb;
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use radar_core::{Rectangle, Rgb as Color};

/// Draws labels, boxes and blob circles onto copies of the minimap.
#[derive(Debug, Clone)]
pub struct Annotator {
    config: VisualizationConfig,
}

impl Annotator {
    pub fn new(config: VisualizationConfig) -> Self {
        Self { config }
    }

    /// Copy of `minimap` with a `box_color` rectangle and the label at the
    /// bounding box of every labeled match. Unlabeled matches are not drawn.
    pub fn annotate(&self, minimap: &Frame, matches: &MatchCollection, box_color: Color) -> Frame {
        let mut output = minimap.clone();

        for result in matches.labeled() {
            let bbox = result.blob.bbox;
            draw_thick_rect(&mut output, &bbox, self.config.box_thickness, rgb(box_color));

            if self.config.draw_labels {
                if let Some(label) = &result.label {
                    let text = if self.config.draw_scores {
                        format!("{} ({:.2})", label, result.score)
                    } else {
                        label.clone()
                    };
                    draw_text(&mut output, &text, (bbox.x, bbox.y), self.config.label_color);
                }
            }
        }

        output
    }

    /// Copy of `minimap` with a circle around every retained blob.
    pub fn contours(&self, minimap: &Frame, blobs: &[CandidateBlob]) -> Frame {
        let mut output = minimap.clone();
        let color = rgb(self.config.contour_color);
        let thickness = self.config.contour_thickness.max(1) as i32;

        for blob in blobs {
            let center = (blob.circle.x as i32, blob.circle.y as i32);
            let radius = blob.circle.radius as i32;
            for step in 0..thickness {
                let r = radius - thickness / 2 + step;
                if r > 0 {
                    draw_hollow_circle_mut(&mut output, center, r, color);
                }
            }
        }

        output
    }
}

fn rgb(color: Color) -> Rgb<u8> {
    Rgb([color.0, color.1, color.2])
}

/// Rectangle covering both corners inclusively, grown outward per extra
/// thickness step.
fn draw_thick_rect(frame: &mut Frame, bbox: &Rectangle, thickness: u32, color: Rgb<u8>) {
    for step in 0..thickness.max(1) as i32 {
        let width = (bbox.width + 1 + 2 * step).max(1) as u32;
        let height = (bbox.height + 1 + 2 * step).max(1) as u32;
        let rect = Rect::at(bbox.x - step, bbox.y - step).of_size(width, height);
        draw_hollow_rect_mut(frame, rect, color);
    }
}

/// Text with its baseline starting at `pos`.
fn draw_text(frame: &mut Frame, text: &str, pos: (i32, i32), color: Color) {
    let style = MonoTextStyle::new(&FONT_6X10, Rgb888::new(color.0, color.1, color.2));
    let mut target = FrameDrawTarget { frame };
    let _ = Text::new(text, Point::new(pos.0, pos.1), style).draw(&mut target);
}

struct FrameDrawTarget<'a> {
    frame: &'a mut Frame,
}

impl OriginDimensions for FrameDrawTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.frame.width(), self.frame.height())
    }
}

impl DrawTarget for FrameDrawTarget<'_> {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = (self.frame.width() as i32, self.frame.height() as i32);
        for Pixel(coord, color) in pixels {
            if coord.x < 0 || coord.y < 0 || coord.x >= width || coord.y >= height {
                continue;
            }
            self.frame
                .put_pixel(coord.x as u32, coord.y as u32, Rgb([color.r(), color.g(), color.b()]));
        }
        Ok(())
    }
}
