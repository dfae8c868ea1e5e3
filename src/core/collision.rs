//! Collision tests used by the real-time games.

use glam::DVec2;

/// Circle–circle overlap, boundary inclusive: touching counts as a hit.
pub fn circles_overlap(a: DVec2, ra: f64, b: DVec2, rb: f64) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// Distance from `p` to the segment `a`–`b` (not the infinite line).
pub fn segment_point_distance(a: DVec2, b: DVec2, p: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// A swipe segment hits a circular target when it passes within
/// `radius * forgiveness` of the center.
pub fn segment_hits_circle(a: DVec2, b: DVec2, center: DVec2, radius: f64, forgiveness: f64) -> bool {
    segment_point_distance(a, b, center) <= radius * forgiveness
}

/// Axis-aligned rectangle given by its min corner and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            min: DVec2::new(x, y),
            size: DVec2::new(w, h),
        }
    }

    pub fn max(&self) -> DVec2 {
        self.min + self.size
    }

    /// Strict overlap: rectangles sharing only an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_exact_tangent_collide() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(3.0, 0.0);
        assert!(circles_overlap(a, 1.0, b, 2.0));
    }

    #[test]
    fn test_circles_tangent_3_4_5() {
        // d = 5 exactly
        let a = DVec2::new(1.0, 1.0);
        let b = DVec2::new(4.0, 5.0);
        assert!(circles_overlap(a, 2.0, b, 3.0));
        assert!(!circles_overlap(a, 2.0, b, 2.999));
    }

    #[test]
    fn test_circles_apart() {
        assert!(!circles_overlap(DVec2::ZERO, 1.0, DVec2::new(10.0, 0.0), 1.0));
    }

    #[test]
    fn test_point_on_segment_is_zero() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 0.0);
        assert_eq!(segment_point_distance(a, b, DVec2::new(4.0, 0.0)), 0.0);
        assert_eq!(segment_point_distance(a, b, a), 0.0);
        assert_eq!(segment_point_distance(a, b, b), 0.0);
    }

    #[test]
    fn test_point_beyond_endpoint_uses_endpoint() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 0.0);
        // Line distance would be 4, endpoint distance is 5
        let p = DVec2::new(13.0, 4.0);
        assert!((segment_point_distance(a, b, p) - 5.0).abs() < 1e-12);
        let p = DVec2::new(-3.0, -4.0);
        assert!((segment_point_distance(a, b, p) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_beside_segment_uses_perpendicular() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 0.0);
        assert!((segment_point_distance(a, b, DVec2::new(5.0, 3.0)) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_segment() {
        let a = DVec2::new(2.0, 2.0);
        assert!((segment_point_distance(a, a, DVec2::new(5.0, 6.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_slice_forgiveness() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(100.0, 0.0);
        let fruit = DVec2::new(50.0, 22.0);
        assert!(!segment_hits_circle(a, b, fruit, 20.0, 1.0));
        assert!(segment_hits_circle(a, b, fruit, 20.0, 1.15));
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 20.0, 5.0, 5.0)));
    }
}
