//! Stage two: grid sampling of the uncovered interior
//!
//! An `N x N` grid is laid over the base shape's bounding extent. A point
//! is free when it lies inside the base shape and outside every oval. The
//! bounding box of the free points is the region text may use.
//!
//! Circles are sampled over a slightly inset square so the outermost ring
//! of grid points does not hug the rim.

use balloon_core::{point_in_any, BaseShape, FreeRegion, Oval, Point};

/// Inset of the circle sampling square relative to the radius
pub const CIRCLE_SAMPLE_INSET: f64 = 0.97;

/// Finds the free region of `shape` at an `samples x samples` grid
///
/// Returns [`FreeRegion::empty`] centred on the shape when no grid point
/// is free. Grids smaller than 2 are treated as 2.
pub fn find_free_region(shape: &BaseShape, ovals: &[Oval], samples: usize) -> FreeRegion {
    let center = shape.center();
    let (half_w, half_h) = match *shape {
        BaseShape::Circle { radius, .. } => {
            let r = radius * CIRCLE_SAMPLE_INSET;
            (r, r)
        },
        BaseShape::Rect { half_w, half_h, .. } => (half_w, half_h),
    };

    let n = samples.max(2);
    let step = 1.0 / (n - 1) as f64;
    let mut bounds: Option<(Point, Point)> = None;
    let mut free = 0usize;

    for i in 0..n {
        let x = center.x - half_w + 2.0 * half_w * (i as f64 * step);
        for j in 0..n {
            let y = center.y - half_h + 2.0 * half_h * (j as f64 * step);
            let p = Point::new(x, y);
            if !shape.contains(p) || point_in_any(ovals, p) {
                continue;
            }
            free += 1;
            bounds = Some(match bounds {
                None => (p, p),
                Some((lo, hi)) => (
                    Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Point::new(hi.x.max(p.x), hi.y.max(p.y)),
                ),
            });
        }
    }

    log::trace!("sampler: {free} of {} grid points free", n * n);

    match bounds {
        Some((lo, hi)) => FreeRegion {
            center: lo.midpoint(hi),
            width: hi.x - lo.x,
            height: hi.y - lo.y,
        },
        None => FreeRegion::empty(center),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balloon_core::OvalOrigin;

    fn oval(x: f64, y: f64, rx: f64, ry: f64) -> Oval {
        Oval::new(x, y, rx, ry, OvalOrigin::Radial { index: 0 })
    }

    #[test]
    fn uncovered_rect_is_fully_free() {
        let shape = BaseShape::rect(Point::new(50.0, 40.0), 20.0, 10.0);
        let free = find_free_region(&shape, &[], 11);
        assert_eq!(free.center, Point::new(50.0, 40.0));
        assert!((free.width - 40.0).abs() < 1e-9);
        assert!((free.height - 20.0).abs() < 1e-9);
    }

    #[test]
    fn circle_is_sampled_inside_the_inset() {
        let shape = BaseShape::circle(Point::new(0.0, 0.0), 100.0);
        let free = find_free_region(&shape, &[], 101);
        assert!((free.width - 194.0).abs() < 1e-9);
        assert!((free.height - 194.0).abs() < 1e-9);
    }

    #[test]
    fn covered_shape_yields_the_sentinel() {
        let shape = BaseShape::rect(Point::new(10.0, 10.0), 5.0, 5.0);
        let free = find_free_region(&shape, &[oval(10.0, 10.0, 50.0, 50.0)], 20);
        assert!(free.is_empty());
        assert_eq!(free.center, Point::new(10.0, 10.0));
    }

    #[test]
    fn ovals_trim_the_region() {
        let shape = BaseShape::rect(Point::new(0.0, 0.0), 100.0, 100.0);
        // Covers the whole left half
        let ovals = [oval(-100.0, 0.0, 100.0, 1000.0)];
        let free = find_free_region(&shape, &ovals, 201);
        assert!(free.center.x > 0.0);
        assert!(free.width < 100.0 + 1e-9);
        assert!((free.height - 200.0).abs() < 1e-9);
    }

    #[test]
    fn tiny_grids_are_clamped() {
        let shape = BaseShape::rect(Point::new(0.0, 0.0), 1.0, 1.0);
        let free = find_free_region(&shape, &[], 0);
        assert!((free.width - 2.0).abs() < 1e-9);
    }
}
