//! Rational time algebra: the numeric foundation everything else in the
//! object model and serialization engine is built on.

mod rational_time;
mod time_range;
mod time_transform;
mod timecode;

pub use rational_time::RationalTime;
pub use time_range::{BoundStrategy, TimeRange};
pub use time_transform::TimeTransform;
pub use timecode::{from_timecode, to_timecode};
