//! An affine transform (offset, linear scale, target rate) applied to time
//! values and ranges — used to map a clip's source-range time base onto its
//! parent track's time base.

use super::rational_time::RationalTime;
use super::time_range::TimeRange;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeTransform {
    pub offset: RationalTime,
    pub scale: f64,
    pub rate: f64,
}

impl TimeTransform {
    pub fn new(offset: RationalTime, scale: f64, rate: f64) -> Self {
        Self {
            offset,
            scale,
            rate,
        }
    }

    pub fn identity(rate: f64) -> Self {
        Self::new(RationalTime::zero(rate), 1.0, rate)
    }

    /// `(other_time + offset).rescale(rate) * scale`, scale applied last
    /// along the value axis (spec.md §4.1).
    pub fn applied_to_time(&self, other_time: RationalTime) -> RationalTime {
        let shifted = other_time + self.offset;
        let rescaled = shifted.rescale(self.rate).unwrap_or(shifted);
        RationalTime::new(rescaled.value * self.scale, rescaled.rate)
    }

    pub fn applied_to_range(&self, other_range: TimeRange) -> TimeRange {
        TimeRange::new(
            self.applied_to_time(other_range.start_time),
            RationalTime::new(other_range.duration.value * self.scale, self.rate),
        )
    }

    /// Composes `self` after `other`: `applied_to(other_applied_to(t))`.
    pub fn applied_to_transform(&self, other: Self) -> Self {
        Self::new(
            self.applied_to_time(other.offset),
            self.scale * other.scale,
            self.rate,
        )
    }
}

impl Default for TimeTransform {
    fn default() -> Self {
        Self::identity(24.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_leaves_time_unchanged() {
        let t = TimeTransform::identity(24.0);
        let rt = RationalTime::new(10.0, 24.0);
        assert_eq!(t.applied_to_time(rt), rt);
    }

    #[test]
    fn offset_is_added_before_scale_is_applied() {
        // offset is rescaled and added at the point's own rate, then the
        // whole thing is rescaled to the transform's rate, and only then
        // multiplied by scale — not the other way around.
        let t = TimeTransform::new(RationalTime::new(2.0, 12.0), 2.0, 24.0);
        let result = t.applied_to_time(RationalTime::new(10.0, 24.0));
        assert_eq!(result, RationalTime::new(28.0, 24.0));
    }

    #[test]
    fn scale_multiplies_value() {
        let t = TimeTransform::new(RationalTime::zero(24.0), 2.0, 24.0);
        let rt = RationalTime::new(10.0, 24.0);
        assert_eq!(t.applied_to_time(rt), RationalTime::new(20.0, 24.0));
    }

    #[test]
    fn offset_shifts_value() {
        let t = TimeTransform::new(RationalTime::new(5.0, 24.0), 1.0, 24.0);
        let rt = RationalTime::new(10.0, 24.0);
        assert_eq!(t.applied_to_time(rt), RationalTime::new(15.0, 24.0));
    }

    #[test]
    fn applied_to_range_scales_duration_too() {
        let t = TimeTransform::new(RationalTime::zero(24.0), 2.0, 24.0);
        let range = TimeRange::new(RationalTime::new(1.0, 24.0), RationalTime::new(5.0, 24.0));
        let result = t.applied_to_range(range);
        assert_eq!(result.start_time, RationalTime::new(2.0, 24.0));
        assert_eq!(result.duration, RationalTime::new(10.0, 24.0));
    }

    #[test]
    fn composition_applies_outer_after_inner() {
        let inner = TimeTransform::new(RationalTime::new(1.0, 24.0), 1.0, 24.0);
        let outer = TimeTransform::new(RationalTime::zero(24.0), 2.0, 24.0);
        let composed = outer.applied_to_transform(inner);
        assert_eq!(composed.offset, RationalTime::new(2.0, 24.0));
        assert_eq!(composed.scale, 2.0);
    }
}
