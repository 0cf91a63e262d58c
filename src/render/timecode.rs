use std::fmt;
use std::str::FromStr;

use crate::foundation::core::{Fps, TIME_EPSILON};
use crate::foundation::error::{ReelError, ReelResult};

/// Renderer timecode `HH:MM:SS:FF` at a fixed frame rate.
///
/// The frame field is `floor(fractional_seconds * fps)`, so a conversion loses at most one
/// frame of precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u32,
}

impl Timecode {
    pub fn from_seconds(secs: f64, fps: Fps) -> ReelResult<Self> {
        if !secs.is_finite() || secs < -TIME_EPSILON {
            return Err(ReelError::render_job(format!(
                "cannot express {secs}s as a timecode"
            )));
        }
        // absorb drift just below a frame boundary (43.999999 -> 44:00)
        let secs = secs.max(0.0) + TIME_EPSILON;
        let whole = secs.floor();
        let fps = Fps::new(fps.num, fps.den)?;
        let per_second = fps.frames_per_timecode_second();
        let frames = (((secs - whole) * fps.as_f64()).floor() as u32).min(per_second - 1);

        let whole = whole as u64;
        Ok(Self {
            hours: (whole / 3600) as u32,
            minutes: ((whole % 3600) / 60) as u8,
            seconds: (whole % 60) as u8,
            frames,
        })
    }

    pub fn to_seconds(self, fps: Fps) -> f64 {
        let whole = u64::from(self.hours) * 3600
            + u64::from(self.minutes) * 60
            + u64::from(self.seconds);
        whole as f64 + f64::from(self.frames) / fps.as_f64()
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

impl FromStr for Timecode {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ReelError::serde(format!("invalid timecode '{s}' (expected HH:MM:SS:FF)"));
        let mut parts = s.trim().split(':');
        let mut next = || -> ReelResult<u32> {
            let part = parts.next().ok_or_else(bad)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(bad());
            }
            part.parse().map_err(|_| bad())
        };
        let (hours, minutes, seconds, frames) = (next()?, next()?, next()?, next()?);
        if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
            return Err(bad());
        }
        Ok(Self {
            hours,
            minutes: minutes as u8,
            seconds: seconds as u8,
            frames,
        })
    }
}

impl serde::Serialize for Timecode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Timecode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/timecode.rs"]
mod tests;
