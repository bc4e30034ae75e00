use serde::{Deserialize, Serialize};

/// A 2D point or displacement in world units (pixels, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Symmetric expansion by `pad` on every side. A negative `pad` shrinks
    /// the rectangle; contact tests shrink hazard or player boxes first so
    /// near-miss grazes are forgiven.
    pub fn expanded(&self, pad: f32) -> Rect {
        Rect {
            x: self.x - pad,
            y: self.y - pad,
            w: self.w + pad * 2.0,
            h: self.h + pad * 2.0,
        }
    }
}

/// Strict-inequality AABB overlap. Rectangles sharing only a boundary edge
/// do not overlap.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Linear interpolation from `a` to `b` by `t`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Closest point to `p` on the segment `a`-`b`, with the clamp parameter
/// `t` in [0, 1]. A degenerate segment returns `a` with `t = 0`.
pub fn closest_point_on_segment(a: Vec2, b: Vec2, p: Vec2) -> (Vec2, f32) {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len2 = abx * abx + aby * aby;
    if len2 <= 1e-5 {
        return (a, 0.0);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0);
    (Vec2::new(a.x + abx * t, a.y + aby * t), t)
}

/// Squared distance from `p` to the nearest point of `r` (zero inside).
pub fn point_rect_distance_sq(p: Vec2, r: &Rect) -> f32 {
    let cx = p.x.clamp(r.x, r.x + r.w);
    let cy = p.y.clamp(r.y, r.y + r.h);
    let dx = p.x - cx;
    let dy = p.y - cy;
    dx * dx + dy * dy
}

/// Approximate minimum squared distance between the segment `a`-`b` and `r`.
///
/// Samples a fixed candidate set — the rectangle's corners and edge
/// midpoints against the segment, plus both segment endpoints against the
/// rectangle — and takes the minimum. Fast and conservative enough for
/// hazard contact; it can under-report grazing contact against an edge
/// interior far from the sampled points.
pub fn segment_rect_distance_sq(a: Vec2, b: Vec2, r: &Rect) -> f32 {
    let corners = [
        Vec2::new(r.x, r.y),
        Vec2::new(r.x + r.w, r.y),
        Vec2::new(r.x, r.y + r.h),
        Vec2::new(r.x + r.w, r.y + r.h),
    ];
    let midpoints = [
        Vec2::new(r.x + r.w * 0.5, r.y),
        Vec2::new(r.x + r.w * 0.5, r.y + r.h),
        Vec2::new(r.x, r.y + r.h * 0.5),
        Vec2::new(r.x + r.w, r.y + r.h * 0.5),
    ];

    let mut best = point_rect_distance_sq(a, r).min(point_rect_distance_sq(b, r));
    for c in corners.into_iter().chain(midpoints) {
        let (p, _) = closest_point_on_segment(a, b, c);
        let dx = c.x - p.x;
        let dy = c.y - p.y;
        best = best.min(dx * dx + dy * dy);
    }
    best
}

/// A thickened line segment, the hit volume of a rotating hazard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub a: Vec2,
    pub b: Vec2,
    pub r: f32,
}

impl Capsule {
    /// Whether the capsule touches the rectangle, per the sampled distance
    /// approximation above.
    pub fn hits_rect(&self, rect: &Rect) -> bool {
        segment_rect_distance_sq(self.a, self.b, rect) <= self.r * self.r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_detects_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &b));
        assert!(rects_overlap(&b, &a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!rects_overlap(&a, &right), "shared vertical edge is not overlap");
        assert!(!rects_overlap(&a, &below), "shared horizontal edge is not overlap");
    }

    #[test]
    fn disjoint_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(30.0, 30.0, 5.0, 5.0);
        assert!(!rects_overlap(&a, &b));
    }

    #[test]
    fn expanded_grows_symmetrically() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0).expanded(4.0);
        assert_eq!(r, Rect::new(6.0, 16.0, 38.0, 48.0));
    }

    #[test]
    fn negative_pad_shrinks() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0).expanded(-3.0);
        assert_eq!(r, Rect::new(13.0, 23.0, 24.0, 34.0));
    }

    #[test]
    fn closest_point_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);

        let (p, t) = closest_point_on_segment(a, b, Vec2::new(-5.0, 3.0));
        assert_eq!((p, t), (a, 0.0));

        let (p, t) = closest_point_on_segment(a, b, Vec2::new(25.0, -2.0));
        assert_eq!((p, t), (b, 1.0));
    }

    #[test]
    fn closest_point_projects_interior() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        let (p, t) = closest_point_on_segment(a, b, Vec2::new(4.0, 7.0));
        assert!((p.x - 4.0).abs() < 1e-6);
        assert!((p.y).abs() < 1e-6);
        assert!((t - 0.4).abs() < 1e-6);
    }

    #[test]
    fn degenerate_segment_returns_start() {
        let a = Vec2::new(3.0, 3.0);
        let (p, t) = closest_point_on_segment(a, a, Vec2::new(9.0, 9.0));
        assert_eq!((p, t), (a, 0.0));
    }

    #[test]
    fn point_inside_rect_has_zero_distance() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(point_rect_distance_sq(Vec2::new(5.0, 5.0), &r), 0.0);
    }

    #[test]
    fn point_outside_rect_distance() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        // 3 right of the right edge, 4 below the bottom edge.
        let d2 = point_rect_distance_sq(Vec2::new(13.0, 14.0), &r);
        assert!((d2 - 25.0).abs() < 1e-5);
    }

    #[test]
    fn segment_far_from_rect_reports_large_distance() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let d2 = segment_rect_distance_sq(Vec2::new(0.0, 110.0), Vec2::new(10.0, 110.0), &r);
        assert!(d2 >= 100.0 * 100.0 - 1e-3);
    }

    #[test]
    fn segment_endpoint_inside_rect_reports_zero() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let d2 = segment_rect_distance_sq(Vec2::new(5.0, 5.0), Vec2::new(40.0, 40.0), &r);
        assert_eq!(d2, 0.0);
    }

    #[test]
    fn capsule_hit_respects_radius() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Horizontal segment 5 above the rect top edge.
        let a = Vec2::new(-5.0, -5.0);
        let b = Vec2::new(15.0, -5.0);
        assert!(Capsule { a, b, r: 6.0 }.hits_rect(&r));
        assert!(!Capsule { a, b, r: 4.0 }.hits_rect(&r));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_rect() -> impl Strategy<Value = Rect> {
            (
                -1000.0f32..1000.0,
                -1000.0f32..1000.0,
                1.0f32..500.0,
                1.0f32..500.0,
            )
                .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
        }

        proptest! {
            #[test]
            fn overlap_is_symmetric(a in arb_rect(), b in arb_rect()) {
                prop_assert_eq!(rects_overlap(&a, &b), rects_overlap(&b, &a));
            }

            #[test]
            fn rect_never_overlaps_its_edge_neighbor(r in arb_rect()) {
                let neighbor = Rect::new(r.x + r.w, r.y, r.w, r.h);
                prop_assert!(!rects_overlap(&r, &neighbor));
            }

            #[test]
            fn expand_then_shrink_restores(r in arb_rect(), pad in 0.0f32..50.0) {
                let back = r.expanded(pad).expanded(-pad);
                prop_assert!((back.x - r.x).abs() < 1e-3);
                prop_assert!((back.y - r.y).abs() < 1e-3);
                prop_assert!((back.w - r.w).abs() < 1e-3);
                prop_assert!((back.h - r.h).abs() < 1e-3);
            }

            #[test]
            fn clamp_parameter_in_unit_range(
                ax in -100.0f32..100.0, ay in -100.0f32..100.0,
                bx in -100.0f32..100.0, by in -100.0f32..100.0,
                px in -100.0f32..100.0, py in -100.0f32..100.0,
            ) {
                let (_, t) = closest_point_on_segment(
                    Vec2::new(ax, ay),
                    Vec2::new(bx, by),
                    Vec2::new(px, py),
                );
                prop_assert!((0.0..=1.0).contains(&t));
            }
        }
    }
}
