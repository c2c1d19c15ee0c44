use serde::{Deserialize, Serialize};

/// RGB triple, channel order red, green, blue.
pub type Rgb = (u8, u8, u8);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("channel {channel}: lower bound {lower} exceeds upper bound {upper}")]
    Inverted { channel: usize, lower: u8, upper: u8 },
}

/// Inclusive per-channel band `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRange {
    pub lower: Rgb,
    pub upper: Rgb,
}

impl ChannelRange {
    pub fn new(lower: Rgb, upper: Rgb) -> Result<Self, RangeError> {
        let range = Self { lower, upper };
        range.check()?;
        Ok(range)
    }

    /// Ranges deserialized from configuration skip `new`; validate them here.
    pub fn check(&self) -> Result<(), RangeError> {
        let lower = [self.lower.0, self.lower.1, self.lower.2];
        let upper = [self.upper.0, self.upper.1, self.upper.2];
        for channel in 0..3 {
            if lower[channel] > upper[channel] {
                return Err(RangeError::Inverted {
                    channel,
                    lower: lower[channel],
                    upper: upper[channel],
                });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, pixel: [u8; 3]) -> bool {
        (self.lower.0..=self.upper.0).contains(&pixel[0])
            && (self.lower.1..=self.upper.1).contains(&pixel[1])
            && (self.lower.2..=self.upper.2).contains(&pixel[2])
    }
}
