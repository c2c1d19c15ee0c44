//! Radar Computer Vision Library
//!
//! Locates champion icons on a game minimap: color-band segmentation, blob
//! extraction and zero-mean normalized correlation against an icon catalog.

pub mod annotate;
pub mod bbox;
pub mod detection;
pub mod error;
pub mod template;
pub mod utils;

// Re-export commonly used types
pub use annotate::Annotator;
pub use bbox::{CandidateBlob, MatchCollection, MatchResult, MatchStats};
pub use detection::{ClassReport, DetectionConfig, FrameReport, MinimapDetector};
pub use error::RadarError;
pub use template::{IconCatalog, IconEntry, IconLoader, TemplateMatcher};

/// Three-channel 8-bit frame in RGB order.
pub type Frame = image::RgbImage;
/// Binary mask: 255 marks a pixel of the color class, 0 everything else.
pub type Mask = image::GrayImage;

// Error handling
pub type Result<T> = std::result::Result<T, RadarError>;

/// Seams to the capture and display collaborators around the pipeline
pub mod traits {
    use super::{Frame, FrameReport};

    /// Supplies frames one at a time; `None` ends the stream.
    pub trait FrameSource {
        type Error;
        fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error>;
    }

    /// Consumes the report of each processed frame.
    pub trait FrameSink {
        type Error;
        fn consume(&mut self, index: usize, report: &FrameReport) -> Result<(), Self::Error>;
    }
}
