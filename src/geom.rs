//! Geometric primitives and closest-point queries used by the narrow phase.

use glam::Vec3;

/// A plane `normal · p + constant = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    pub fn new(normal: Vec3, constant: f32) -> Self {
        Self { normal, constant }
    }

    /// Plane through `point` with the given unit normal.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            constant: -normal.dot(point),
        }
    }

    /// Signed distance from the plane to `point`, positive on the side the normal points to.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }
}

/// A line segment between `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vec3,
    pub b: Vec3,
}

impl Segment {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { a, b }
    }
}

/// Closest point on `segment` to `point`.
pub fn closest_point_on_segment(segment: &Segment, point: Vec3) -> Vec3 {
    let direction = segment.b - segment.a;

    let projection = (point - segment.a).dot(direction);
    if projection <= 0.0 {
        return segment.a;
    }

    let sqr_length = direction.length_squared();
    if projection >= sqr_length {
        segment.b
    } else {
        segment.a + direction * (projection / sqr_length)
    }
}

/// Squared sine of the angle below which two segments count as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Closest points between two segments, returned as `(point on s1, point on s2)`.
///
/// See Ericson, *Real-Time Collision Detection* (2004), section 5.1.9.
pub fn closest_points_between_segments(s1: &Segment, s2: &Segment) -> (Vec3, Vec3) {
    let d1 = s1.b - s1.a;
    let d2 = s2.b - s2.a;
    let r = s1.a - s2.a;

    let sqr_length_1 = d1.length_squared();
    let sqr_length_2 = d2.length_squared();
    let d2_dot_r = d2.dot(r);

    if sqr_length_1 <= 0.0 {
        if sqr_length_2 <= 0.0 {
            // Both segments are points
            return (s1.a, s2.a);
        }
        // First segment is a point
        let t = (d2_dot_r / sqr_length_2).clamp(0.0, 1.0);
        return (s1.a, s2.a + d2 * t);
    }

    let d1_dot_r = d1.dot(r);

    if sqr_length_2 <= 0.0 {
        // Second segment is a point
        let s = (-d1_dot_r / sqr_length_1).clamp(0.0, 1.0);
        return (s1.a + d1 * s, s2.a);
    }

    let d1_dot_d2 = d1.dot(d2);
    let den = sqr_length_1 * sqr_length_2 - d1_dot_d2 * d1_dot_d2;

    if den <= PARALLEL_EPSILON * sqr_length_1 * sqr_length_2 {
        return closest_points_between_parallel_segments(s1, s2);
    }

    let s = ((d1_dot_d2 * d2_dot_r - d1_dot_r * sqr_length_2) / den).clamp(0.0, 1.0);
    let t = (d1_dot_d2 * s + d2_dot_r) / sqr_length_2;

    if t < 0.0 {
        let s = (-d1_dot_r / sqr_length_1).clamp(0.0, 1.0);
        (s1.a + d1 * s, s2.a)
    } else if t > 1.0 {
        let s = ((d1_dot_d2 - d1_dot_r) / sqr_length_1).clamp(0.0, 1.0);
        (s1.a + d1 * s, s2.b)
    } else {
        (s1.a + d1 * s, s2.a + d2 * t)
    }
}

/// Parallel segments have a whole range of closest pairs. Pick the middle of the overlap
/// along the shared axis, which is the same whichever segment comes first.
fn closest_points_between_parallel_segments(s1: &Segment, s2: &Segment) -> (Vec3, Vec3) {
    let d1 = s1.b - s1.a;
    let sqr_length_1 = d1.length_squared();

    // s2's endpoints as parameters along s1
    let u0 = (s2.a - s1.a).dot(d1) / sqr_length_1;
    let u1 = (s2.b - s1.a).dot(d1) / sqr_length_1;
    let low = u0.min(u1).max(0.0);
    let high = u0.max(u1).min(1.0);

    // Disjoint ranges collapse onto the nearest end
    let s = ((low + high) * 0.5).clamp(0.0, 1.0);
    let on_s1 = s1.a + d1 * s;
    let on_s2 = closest_point_on_segment(s2, on_s1);
    (closest_point_on_segment(s1, on_s2), on_s2)
}
