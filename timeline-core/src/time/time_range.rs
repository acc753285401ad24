//! A half-open span of time: `[start_time, start_time + duration)`.

use super::rational_time::RationalTime;
use serde::{Deserialize, Serialize};

/// Governs how [`TimeRange::clamp`] treats a bound that the caller left
/// unconstrained versus one it wants enforced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoundStrategy {
    Free,
    Clamp,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_time: RationalTime,
    pub duration: RationalTime,
}

impl TimeRange {
    pub fn new(start_time: RationalTime, duration: RationalTime) -> Self {
        Self {
            start_time,
            duration,
        }
    }

    /// The time of the first sample outside the range.
    pub fn end_time_exclusive(&self) -> RationalTime {
        self.start_time + self.duration
    }

    /// The time of the last sample inside the range, for a non-zero
    /// duration; equal to `start_time` when `duration` is zero.
    pub fn end_time_inclusive(&self) -> RationalTime {
        if self.duration.value == 0.0 {
            return self.start_time;
        }
        let one_sample = RationalTime::new(1.0, self.duration.rate);
        self.end_time_exclusive() - one_sample
    }

    /// The smallest range spanning both `self` and `other_point`.
    pub fn extended_by_point(&self, other_point: RationalTime) -> Self {
        let end = self.end_time_exclusive();
        let new_start = if other_point < self.start_time {
            other_point
        } else {
            self.start_time
        };
        let new_end = if other_point > end {
            other_point
        } else {
            end
        };
        Self::new(new_start, new_end - new_start)
    }

    /// The smallest range spanning both `self` and `other`.
    pub fn extended_by(&self, other: Self) -> Self {
        let new_start = if other.start_time < self.start_time {
            other.start_time
        } else {
            self.start_time
        };
        let self_end = self.end_time_exclusive();
        let other_end = other.end_time_exclusive();
        let new_end = if other_end > self_end {
            other_end
        } else {
            self_end
        };
        Self::new(new_start, new_end - new_start)
    }

    /// `start_time <= other < end_time_exclusive`.
    pub fn contains_time(&self, other: RationalTime) -> bool {
        other >= self.start_time && other < self.end_time_exclusive()
    }

    /// `other` lies entirely within `self` (an empty `other` counts as
    /// contained if it sits on or inside `self`'s bounds).
    pub fn contains_range(&self, other: Self) -> bool {
        other.start_time >= self.start_time && other.end_time_exclusive() <= self.end_time_exclusive()
    }

    /// `self` and `other` share at least one instant; inclusive on start,
    /// exclusive on end, matching [`TimeRange::contains_time`].
    pub fn overlaps(&self, other: Self) -> bool {
        self.start_time < other.end_time_exclusive() && other.start_time < self.end_time_exclusive()
    }

    /// Projects `point` onto `self`'s bounds according to `strategy`,
    /// independently per side.
    pub fn clamped_point(
        &self,
        point: RationalTime,
        start_strategy: BoundStrategy,
        end_strategy: BoundStrategy,
    ) -> RationalTime {
        let mut result = point;
        if start_strategy == BoundStrategy::Clamp && result < self.start_time {
            result = self.start_time;
        }
        let end = self.end_time_inclusive();
        if end_strategy == BoundStrategy::Clamp && result > end {
            result = end;
        }
        result
    }

    /// Projects `other`'s bounds onto `self`'s bounds, clamping both the
    /// start and end independently.
    pub fn clamped_range(&self, other: Self) -> Self {
        let start = self.clamped_point(other.start_time, BoundStrategy::Clamp, BoundStrategy::Clamp);
        let end = self.clamped_point(
            other.end_time_exclusive(),
            BoundStrategy::Clamp,
            BoundStrategy::Clamp,
        );
        Self::new(start, end - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rt(value: f64) -> RationalTime {
        RationalTime::new(value, 24.0)
    }

    #[test]
    fn end_time_exclusive_is_start_plus_duration() {
        let r = TimeRange::new(rt(10.0), rt(5.0));
        assert_eq!(r.end_time_exclusive(), rt(15.0));
    }

    #[test]
    fn end_time_inclusive_is_one_sample_before_exclusive_end() {
        let r = TimeRange::new(rt(10.0), rt(5.0));
        assert_eq!(r.end_time_inclusive(), rt(14.0));
    }

    #[test]
    fn end_time_inclusive_of_empty_range_is_start() {
        let r = TimeRange::new(rt(10.0), rt(0.0));
        assert_eq!(r.end_time_inclusive(), rt(10.0));
    }

    #[test]
    fn extended_by_point_grows_either_side() {
        let r = TimeRange::new(rt(10.0), rt(5.0));
        let grown = r.extended_by_point(rt(20.0));
        assert_eq!(grown.start_time, rt(10.0));
        assert_eq!(grown.end_time_exclusive(), rt(20.0));

        let grown = r.extended_by_point(rt(2.0));
        assert_eq!(grown.start_time, rt(2.0));
        assert_eq!(grown.end_time_exclusive(), rt(15.0));
    }

    #[test]
    fn extended_by_range_is_the_union_span() {
        let a = TimeRange::new(rt(0.0), rt(10.0));
        let b = TimeRange::new(rt(5.0), rt(20.0));
        let union = a.extended_by(b);
        assert_eq!(union.start_time, rt(0.0));
        assert_eq!(union.end_time_exclusive(), rt(25.0));
    }

    #[test]
    fn contains_time_is_half_open() {
        let r = TimeRange::new(rt(10.0), rt(5.0));
        assert!(r.contains_time(rt(10.0)));
        assert!(r.contains_time(rt(14.9)));
        assert!(!r.contains_time(rt(15.0)));
    }

    #[test]
    fn contains_range() {
        let outer = TimeRange::new(rt(0.0), rt(10.0));
        let inner = TimeRange::new(rt(2.0), rt(3.0));
        assert!(outer.contains_range(inner));
        assert!(!inner.contains_range(outer));
    }

    #[test]
    fn overlaps_is_inclusive_start_exclusive_end() {
        let a = TimeRange::new(rt(0.0), rt(10.0));
        let touching = TimeRange::new(rt(10.0), rt(5.0));
        assert!(!a.overlaps(touching));

        let overlapping = TimeRange::new(rt(9.0), rt(5.0));
        assert!(a.overlaps(overlapping));
    }

    #[test]
    fn clamped_point_respects_strategy() {
        let r = TimeRange::new(rt(10.0), rt(5.0));
        assert_eq!(
            r.clamped_point(rt(1.0), BoundStrategy::Clamp, BoundStrategy::Clamp),
            rt(10.0)
        );
        assert_eq!(
            r.clamped_point(rt(1.0), BoundStrategy::Free, BoundStrategy::Clamp),
            rt(1.0)
        );
    }

    #[test]
    fn clamped_range_bounds_both_ends() {
        let bounds = TimeRange::new(rt(0.0), rt(10.0));
        let wide = TimeRange::new(rt(-5.0), rt(30.0));
        let clamped = bounds.clamped_range(wide);
        assert_eq!(clamped.start_time, rt(0.0));
        assert_eq!(clamped.end_time_exclusive(), rt(10.0));
    }
}
