//! The two built-in geometric value shapes recognized by the serialization
//! engine: `V2d.1` and `Box2d.1`.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct V2d {
    pub x: f64,
    pub y: f64,
}

impl V2d {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Box2d {
    pub min: V2d,
    pub max: V2d,
}

impl Box2d {
    pub fn new(min: V2d, max: V2d) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: V2d) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn extended_by(&self, point: V2d) -> Self {
        Self::new(
            V2d::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            V2d::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box2d_contains_is_inclusive() {
        let b = Box2d::new(V2d::new(0.0, 0.0), V2d::new(10.0, 10.0));
        assert!(b.contains(V2d::new(10.0, 10.0)));
        assert!(!b.contains(V2d::new(10.1, 10.0)));
    }

    #[test]
    fn box2d_extended_by_grows_to_cover_point() {
        let b = Box2d::new(V2d::new(0.0, 0.0), V2d::new(1.0, 1.0));
        let grown = b.extended_by(V2d::new(5.0, -5.0));
        assert_eq!(grown.min, V2d::new(0.0, -5.0));
        assert_eq!(grown.max, V2d::new(5.0, 1.0));
    }
}
