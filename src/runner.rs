//! Screenshot input, output directory writer and the frame loop

use anyhow::{Context, Result};
use image::ImageFormat;
use log::{debug, info, warn};
use radar_cv::traits::{FrameSink, FrameSource};
use radar_cv::utils::ImageUtils;
use radar_cv::{Frame, FrameReport, IconCatalog, MinimapDetector, RadarError};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// Screenshots read from disk in path order.
pub struct ScreenshotSource {
    pending: VecDeque<PathBuf>,
}

impl ScreenshotSource {
    /// Files are taken as given; directories contribute their image files,
    /// sorted and without recursion.
    pub fn from_inputs(inputs: &[PathBuf]) -> Result<Self> {
        let mut pending = VecDeque::new();
        for input in inputs {
            if input.is_dir() {
                let mut files = Vec::new();
                for entry in fs::read_dir(input).with_context(|| format!("failed to read {:?}", input))? {
                    let path = entry?.path();
                    if path.is_file() && ImageFormat::from_path(&path).is_ok() {
                        files.push(path);
                    }
                }
                files.sort();
                debug!("{} screenshots in {:?}", files.len(), input);
                pending.extend(files);
            } else {
                pending.push_back(input.clone());
            }
        }
        Ok(Self { pending })
    }
}

impl FrameSource for ScreenshotSource {
    type Error = anyhow::Error;

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };
        let frame = ImageUtils::load_rgb(&path).with_context(|| format!("failed to load screenshot {:?}", path))?;
        debug!("loaded {:?} ({}x{})", path, frame.width(), frame.height());
        Ok(Some(frame))
    }
}

/// Writes each frame's images (and optionally its JSON report) to a directory.
pub struct DirectorySink<'a> {
    detector: &'a MinimapDetector,
    output_dir: PathBuf,
    save_intermediate: bool,
    write_json: bool,
}

impl<'a> DirectorySink<'a> {
    pub fn create(
        detector: &'a MinimapDetector,
        output_dir: &Path,
        save_intermediate: bool,
        write_json: bool,
    ) -> Result<Self> {
        fs::create_dir_all(output_dir).with_context(|| format!("failed to create {:?}", output_dir))?;
        Ok(Self {
            detector,
            output_dir: output_dir.to_path_buf(),
            save_intermediate,
            write_json,
        })
    }

    fn save<C>(&self, image: &image::ImageBuffer<C, Vec<u8>>, name: &str) -> Result<()>
    where
        C: image::Pixel<Subpixel = u8> + image::PixelWithColorType,
        [C::Subpixel]: image::EncodableLayout,
    {
        let path = self.output_dir.join(name);
        image
            .save(&path)
            .with_context(|| format!("failed to write {:?}", path))
    }
}

impl FrameSink for DirectorySink<'_> {
    type Error = anyhow::Error;

    fn consume(&mut self, index: usize, report: &FrameReport) -> Result<()> {
        let stem = format!("frame_{index:04}");
        self.save(&report.minimap.image, &format!("{stem}_minimap.png"))?;

        for class in &report.classes {
            if self.save_intermediate {
                self.save(&class.mask, &format!("{stem}_{}_mask.png", class.name))?;
                self.save(&class.contour_frame, &format!("{stem}_{}_contours.png", class.name))?;
            }
            self.save(&class.annotated, &format!("{stem}_{}_detections.png", class.name))?;
        }

        if self.write_json {
            self.detector
                .export_json(report, &self.output_dir.join(format!("{stem}.json")))?;
        }
        Ok(())
    }
}

/// Pull frames until the source is exhausted, rebuilding the catalog whenever
/// the frame resolution calls for a different icon size. Frames with an
/// empty dimension, or a minimap too small to hold an icon, are skipped. Returns the number of processed frames.
pub fn run<S, K>(detector: &MinimapDetector, source: &mut S, sink: &mut K) -> Result<usize>
where
    S: FrameSource,
    S::Error: Into<anyhow::Error>,
    K: FrameSink,
    K::Error: Into<anyhow::Error>,
{
    let mut cached: Option<IconCatalog> = None;
    let mut index = 0;
    let mut processed = 0;

    while let Some(frame) = source.next_frame().map_err(Into::<anyhow::Error>::into)? {
        let icon_size = match detector.icon_size_for(frame.width(), frame.height()) {
            Ok(size) => size,
            Err(RadarError::InvalidFrame { width, height }) => {
                warn!("skipping frame {}: invalid size {}x{}", index, width, height);
                index += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let catalog = match cached.take() {
            Some(catalog) if catalog.icon_size() == icon_size => catalog,
            _ => {
                let catalog = detector.build_catalog(icon_size).with_context(|| {
                    format!("failed to build icon catalog from {:?}", detector.config().icons_folder)
                })?;
                if catalog.is_empty() {
                    warn!("icon catalog is empty, no blob will be labeled");
                }
                catalog
            }
        };

        let report = detector.process_frame(&frame, &catalog)?;
        for class in &report.classes {
            info!(
                "frame {} {}: {:?}",
                index,
                class.name,
                class.matches.labels()
            );
        }
        sink.consume(index, &report).map_err(Into::<anyhow::Error>::into)?;

        cached = Some(catalog);
        index += 1;
        processed += 1;
    }

    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use imageproc::drawing::draw_filled_circle_mut;
    use radar_cv::DetectionConfig;
    use std::convert::Infallible;
    use tempfile::TempDir;

    struct VecSource(VecDeque<Frame>);

    impl FrameSource for VecSource {
        type Error = Infallible;

        fn next_frame(&mut self) -> std::result::Result<Option<Frame>, Infallible> {
            Ok(self.0.pop_front())
        }
    }

    #[derive(Default)]
    struct Collect(Vec<(usize, usize, u32)>);

    impl FrameSink for Collect {
        type Error = Infallible;

        fn consume(&mut self, index: usize, report: &FrameReport) -> std::result::Result<(), Infallible> {
            let labeled = report.classes.iter().map(|c| c.stats.labeled).sum();
            self.0.push((index, labeled, report.minimap.icon_size));
            Ok(())
        }
    }

    fn detector(icons: &Path) -> MinimapDetector {
        MinimapDetector::new(DetectionConfig {
            icons_folder: icons.to_path_buf(),
            minimap_ratio: 0.5,
            icon_ratio: 0.2,
            ..DetectionConfig::default()
        })
        .unwrap()
    }

    fn frame_with_marker(side: u32) -> Frame {
        let mut frame = Frame::new(side, side);
        let c = (side * 3 / 4) as i32;
        draw_filled_circle_mut(&mut frame, (c, c), 20, Rgb([200, 30, 30]));
        frame
    }

    #[test]
    fn loop_rebuilds_catalog_and_skips_empty_frames() {
        let icons = TempDir::new().unwrap();
        Frame::from_pixel(40, 40, Rgb([255, 0, 0]))
            .save(icons.path().join("Ashe.png"))
            .unwrap();

        let detector = detector(icons.path());
        let mut source = VecSource(VecDeque::from(vec![
            frame_with_marker(400),
            Frame::new(0, 0),
            frame_with_marker(500),
        ]));
        let mut sink = Collect::default();

        let processed = run(&detector, &mut source, &mut sink).unwrap();
        assert_eq!(processed, 2);
        assert_eq!(sink.0, vec![(0, 1, 40), (2, 1, 50)]);
    }

    #[test]
    fn frames_too_small_for_an_icon_are_skipped() {
        let icons = TempDir::new().unwrap();
        Frame::from_pixel(40, 40, Rgb([255, 0, 0]))
            .save(icons.path().join("Ashe.png"))
            .unwrap();

        let detector = detector(icons.path());
        let mut source = VecSource(VecDeque::from(vec![Frame::new(8, 8), frame_with_marker(400)]));
        let mut sink = Collect::default();

        let processed = run(&detector, &mut source, &mut sink).unwrap();
        assert_eq!(processed, 1);
        assert_eq!(sink.0, vec![(1, 1, 40)]);
    }

    #[test]
    fn directory_sink_writes_every_view() {
        let icons = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let detector = detector(icons.path());
        let report = detector
            .process_frame(&Frame::new(400, 400), &IconCatalog::new(40, Default::default()))
            .unwrap();

        let mut sink = DirectorySink::create(&detector, out.path(), true, true).unwrap();
        sink.consume(3, &report).unwrap();

        for name in [
            "frame_0003_minimap.png",
            "frame_0003_hostile_mask.png",
            "frame_0003_hostile_contours.png",
            "frame_0003_friendly_detections.png",
            "frame_0003.json",
        ] {
            assert!(out.path().join(name).is_file(), "missing {name}");
        }
    }

    #[test]
    fn directories_expand_to_sorted_images() {
        let dir = TempDir::new().unwrap();
        for name in ["b.png", "a.png", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let source = ScreenshotSource::from_inputs(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(source.pending.len(), 2);
        assert_eq!(source.pending[0].file_name().unwrap(), "a.png");
    }
}
