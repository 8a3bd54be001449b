use crate::foundation::error::{KeeperError, KeeperResult};

/// Zero-based index of a frame within a video stream.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a validated frame rate.
    pub fn new(num: u32, den: u32) -> KeeperResult<Self> {
        if den == 0 {
            return Err(KeeperError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(KeeperError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Parse `ffprobe`-style rates such as `"30000/1001"` or `"25"`.
    pub fn parse_ratio(s: &str) -> KeeperResult<Self> {
        let s = s.trim();
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s, "1"),
        };
        let num = num
            .parse::<u32>()
            .map_err(|e| KeeperError::validation(format!("invalid fps numerator '{num}': {e}")))?;
        let den = den
            .parse::<u32>()
            .map_err(|e| KeeperError::validation(format!("invalid fps denominator '{den}': {e}")))?;
        Self::new(num, den)
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

/// Straight (non-premultiplied) RGB8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form, as used in SVG paint attributes.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Axis-aligned goal rectangle in frame pixels, `x2`/`y2` exclusive.
///
/// Always satisfies `x2 > x1 && y2 > y1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GoalBox {
    /// Left edge (inclusive).
    pub x1: u32,
    /// Top edge (inclusive).
    pub y1: u32,
    /// Right edge (exclusive).
    pub x2: u32,
    /// Bottom edge (exclusive).
    pub y2: u32,
}

impl GoalBox {
    /// Build a box, rejecting empty or inverted rectangles.
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> KeeperResult<Self> {
        if x2 <= x1 || y2 <= y1 {
            return Err(KeeperError::validation(format!(
                "goal box must satisfy x2 > x1 and y2 > y1, got ({x1}, {y1}, {x2}, {y2})"
            )));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Box width in pixels.
    pub fn width(self) -> u32 {
        self.x2 - self.x1
    }

    /// Box height in pixels.
    pub fn height(self) -> u32 {
        self.y2 - self.y1
    }

    /// Horizontal center, rounded down.
    pub fn center_x(self) -> u32 {
        (self.x1 + self.x2) / 2
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
