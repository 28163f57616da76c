//! Triangular speech tails pointing at a speaker

use balloon_core::{BaseShape, Point};

/// Where the tail leaves the base shape along the ray from its centre
///
/// Circles attach on the rim. Rectangles attach at the first edge the ray
/// crosses; a zero direction falls back to `half_w` along the ray.
fn attach_distance(shape: &BaseShape, ux: f64, uy: f64) -> f64 {
    match *shape {
        BaseShape::Circle { radius, .. } => radius,
        BaseShape::Rect { half_w, half_h, .. } => {
            let mut hits = Vec::with_capacity(4);
            if ux != 0.0 {
                hits.extend([half_w / ux, -half_w / ux]);
            }
            if uy != 0.0 {
                hits.extend([half_h / uy, -half_h / uy]);
            }
            hits.into_iter()
                .filter(|t| *t > 0.0)
                .min_by(f64::total_cmp)
                .unwrap_or(half_w)
        },
    }
}

/// Base corners and tip of a tail from `shape` towards `target`
///
/// Returned as `[base_1, base_2, tip]`. Tail length and base width are
/// fractions of the radius (circle) or the larger half extent (rect).
/// A target on the centre yields a degenerate tail at the centre.
pub fn tail_points(
    shape: &BaseShape,
    target: Point,
    length_factor: f64,
    width_factor: f64,
) -> [Point; 3] {
    let c = shape.center();
    let (dx, dy) = (target.x - c.x, target.y - c.y);
    let dist = dx.hypot(dy);
    let dist = if dist == 0.0 { 1.0 } else { dist };
    let (ux, uy) = (dx / dist, dy / dist);

    let attach_t = attach_distance(shape, ux, uy);
    let attach = Point::new(c.x + ux * attach_t, c.y + uy * attach_t);

    let reference = match *shape {
        BaseShape::Circle { radius, .. } => radius,
        BaseShape::Rect { half_w, half_h, .. } => half_w.max(half_h),
    };
    let length = reference * length_factor;
    let half_width = reference * width_factor * 0.5;
    let (px, py) = (-uy, ux);

    [
        Point::new(attach.x + px * half_width, attach.y + py * half_width),
        Point::new(attach.x - px * half_width, attach.y - py * half_width),
        Point::new(attach.x + ux * length, attach.y + uy * length),
    ]
}
