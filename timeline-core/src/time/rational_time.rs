use crate::error::{Error, Result};
use base::TimeF64;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::{Add, Sub};

/// A point in time, expressed as `value / rate` seconds.
///
/// Two `RationalTime`s at different rates compare equal when they denote the
/// same instant — comparison always happens by projecting the right-hand
/// side onto the left-hand side's rate (see [`RationalTime::partial_cmp`]).
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct RationalTime {
    pub value: f64,
    pub rate: f64,
}

impl RationalTime {
    pub const fn new(value: f64, rate: f64) -> Self {
        Self { value, rate }
    }

    pub fn zero(rate: f64) -> Self {
        Self::new(0.0, rate)
    }

    /// Rescales this time to `new_rate`, preserving the instant it denotes:
    /// `value * new_rate / rate`.
    pub fn rescale(&self, new_rate: f64) -> Result<Self> {
        if !(new_rate > 0.0) {
            return Err(Error::InvalidRate(new_rate));
        }
        if new_rate == self.rate {
            return Ok(*self);
        }
        Ok(Self::new(self.value * new_rate / self.rate, new_rate))
    }

    /// The value this time would have at `rate`, without changing `self`.
    pub fn value_rescaled_to(&self, rate: f64) -> Result<f64> {
        Ok(self.rescale(rate)?.value)
    }

    pub fn to_seconds(&self) -> f64 {
        self.value / self.rate
    }

    pub fn from_seconds(seconds: f64, rate: f64) -> Self {
        Self::new(seconds * rate, rate)
    }

    /// `RationalTime(frame, fps)` if `fps` is integral; `RationalTime(frame *
    /// 600 / fps, 600)` if `fps * 600` is integral; else `NonStandardFps`.
    pub fn from_frames(frame: f64, fps: f64) -> Result<Self> {
        if is_integral(fps) {
            return Ok(Self::new(frame, fps.round()));
        }
        let scaled = fps * 600.0;
        if is_integral(scaled) {
            return Ok(Self::new(frame * 600.0 / fps, 600.0));
        }
        Err(Error::NonStandardFps(fps))
    }

    pub fn to_frames(&self, fps: f64) -> Result<f64> {
        Ok(self.value_rescaled_to(fps)?.round())
    }

    fn compare_value_at(&self, other: &Self) -> Option<f64> {
        other.value_rescaled_to(self.rate).ok()
    }
}

/// Close enough to an integer to treat as one — accounts for the rounding
/// error introduced by decimal fps literals like `23.98` that have no exact
/// binary floating-point representation.
fn is_integral(x: f64) -> bool {
    (x - x.round()).abs() < 1e-6
}

impl PartialEq for RationalTime {
    fn eq(&self, other: &Self) -> bool {
        match self.compare_value_at(other) {
            Some(other_value) => TimeF64::new(self.value) == TimeF64::new(other_value),
            None => false,
        }
    }
}

impl PartialOrd for RationalTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let other_value = self.compare_value_at(other)?;
        if TimeF64::new(self.value) == TimeF64::new(other_value) {
            return Some(Ordering::Equal);
        }
        self.value.partial_cmp(&other_value)
    }
}

/// Addition preserves the left operand's rate (the result is value-equal
/// regardless of which rate it's represented at, but its *representation*
/// always takes the left-hand rate).
impl Add for RationalTime {
    type Output = RationalTime;

    fn add(self, rhs: RationalTime) -> RationalTime {
        let rhs_value = rhs.value_rescaled_to(self.rate).unwrap_or(rhs.value);
        RationalTime::new(self.value + rhs_value, self.rate)
    }
}

impl Sub for RationalTime {
    type Output = RationalTime;

    fn sub(self, rhs: RationalTime) -> RationalTime {
        let rhs_value = rhs.value_rescaled_to(self.rate).unwrap_or(rhs.value);
        RationalTime::new(self.value - rhs_value, self.rate)
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::zero(24.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_preserves_left_rate() {
        let a = RationalTime::new(10.0, 24.0);
        let b = RationalTime::new(1.0, 24.0);
        let sum = a + b;
        assert_eq!(sum.value, 11.0);
        assert_eq!(sum.rate, 24.0);
    }

    #[test]
    fn rescale_examples() {
        let sum = RationalTime::new(10.0, 24.0) + RationalTime::new(1.0, 24.0);
        let rescaled = sum.rescale(48.0).unwrap();
        assert_eq!(rescaled.value, 22.0);
        assert_eq!(rescaled.rate, 48.0);

        let r = RationalTime::new(10.0, 12.0).rescale(24.0).unwrap();
        assert_eq!(r.value, 20.0);
        assert_eq!(r.rate, 24.0);
    }

    #[test]
    fn rescale_round_trip() {
        let t = RationalTime::new(17.0, 30.0);
        let round_tripped = t.rescale(48.0).unwrap().rescale(30.0).unwrap();
        assert_eq!(t, round_tripped);
    }

    #[test]
    fn addition_subtraction_inverse() {
        let a = RationalTime::new(5.0, 48.0);
        let b = RationalTime::new(3.0, 24.0);
        assert_eq!((a + b) - b, a);
    }

    #[test]
    fn equality_across_rates() {
        let a = RationalTime::new(10.0, 24.0);
        let b = RationalTime::new(20.0, 48.0);
        assert_eq!(a, b);
    }

    #[test]
    fn rescale_rejects_nonpositive_rate() {
        let t = RationalTime::new(1.0, 24.0);
        assert!(matches!(t.rescale(0.0), Err(Error::InvalidRate(_))));
        assert!(matches!(t.rescale(-1.0), Err(Error::InvalidRate(_))));
    }

    #[test]
    fn from_frames_integer_fps() {
        let t = RationalTime::from_frames(48.0, 24.0).unwrap();
        assert_eq!(t, RationalTime::new(48.0, 24.0));
    }

    #[test]
    fn from_frames_ntsc_fps() {
        let t = RationalTime::from_frames(1.0, 23.98).unwrap();
        assert_eq!(t.rate, 600.0);
        let t = RationalTime::from_frames(1.0, 29.97).unwrap();
        assert_eq!(t.rate, 600.0);
    }

    #[test]
    fn from_frames_nonstandard_fps_fails() {
        assert!(matches!(
            RationalTime::from_frames(1.0, 17.3),
            Err(Error::NonStandardFps(_))
        ));
    }
}
