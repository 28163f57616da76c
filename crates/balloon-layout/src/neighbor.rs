//! Neighbor passes for ring layouts
//!
//! Neighbors are taken in angular order around the centroid of all oval
//! centers, wrapping from the last back to the first. The effective size
//! of an oval here is its smaller radius.

use balloon_core::{Oval, Point};

fn centroid(ovals: &[Oval]) -> Point {
    let n = ovals.len() as f64;
    let (sx, sy) = ovals
        .iter()
        .fold((0.0, 0.0), |(sx, sy), o| (sx + o.x, sy + o.y));
    Point::new(sx / n, sy / n)
}

/// Indices of `ovals` sorted by angle around their centroid
pub fn angular_order(ovals: &[Oval]) -> Vec<usize> {
    if ovals.is_empty() {
        return Vec::new();
    }
    let c = centroid(ovals);
    let angle = |o: &Oval| (o.y - c.y).atan2(o.x - c.x);
    let mut order: Vec<usize> = (0..ovals.len()).collect();
    order.sort_by(|&a, &b| angle(&ovals[a]).total_cmp(&angle(&ovals[b])));
    order
}

/// Moves neighbor centers toward each other until they at least touch
///
/// A pair farther apart than `ea + eb - frac * (ea + eb) / 2` is closed by
/// moving each center half the gap along the line between them. The order
/// is recomputed every pass; passes stop early once nothing moves.
pub fn ensure_min_touch(ovals: &mut [Oval], frac: f64, passes: usize) {
    if ovals.len() < 2 {
        return;
    }
    for pass in 0..passes {
        let order = angular_order(ovals);
        let n = order.len();
        let mut moved = false;
        for i in 0..n {
            let (a, b) = (order[i], order[(i + 1) % n]);
            let dx = ovals[b].x - ovals[a].x;
            let dy = ovals[b].y - ovals[a].y;
            let d = dx.hypot(dy);
            let ea = ovals[a].min_radius();
            let eb = ovals[b].min_radius();
            let desired = ea + eb - frac * 0.5 * (ea + eb);
            if d > desired && d > 1e-6 {
                let shift = (d - desired) * 0.5;
                let (ux, uy) = (dx / d, dy / d);
                ovals[a].x += ux * shift;
                ovals[a].y += uy * shift;
                ovals[b].x -= ux * shift;
                ovals[b].y -= uy * shift;
                moved = true;
            }
        }
        if !moved {
            log::trace!("min-touch settled after {pass} passes");
            break;
        }
    }
}

/// Scales the smaller of each neighbor pair until they overlap by `frac`
///
/// Required overlap is `frac * (ea + eb) / 2`; the smaller oval grows
/// uniformly by half the deficit in effective radius. A single pass over
/// one angular ordering.
pub fn ensure_neighbor_overlap(ovals: &mut [Oval], frac: f64) {
    if ovals.len() < 2 {
        return;
    }
    let order = angular_order(ovals);
    let n = order.len();
    for i in 0..n {
        let (a, b) = (order[i], order[(i + 1) % n]);
        let d = (ovals[b].x - ovals[a].x).hypot(ovals[b].y - ovals[a].y);
        let ea = ovals[a].min_radius();
        let eb = ovals[b].min_radius();
        let required = frac * 0.5 * (ea + eb);
        let current = ea + eb - d;
        if current < required {
            let deficit = required - current;
            let (target, eff) = if ea < eb { (a, ea) } else { (b, eb) };
            let scale = (eff + deficit / 2.0) / eff;
            ovals[target].rx *= scale;
            ovals[target].ry *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balloon_core::OvalOrigin;

    fn circle(x: f64, y: f64, r: f64, index: usize) -> Oval {
        Oval::new(x, y, r, r, OvalOrigin::Radial { index })
    }

    #[test]
    fn orders_by_angle_around_centroid() {
        let ovals = vec![
            circle(0.0, 10.0, 1.0, 0),
            circle(10.0, 0.0, 1.0, 1),
            circle(0.0, -10.0, 1.0, 2),
            circle(-10.0, 0.0, 1.0, 3),
        ];
        // y grows downwards, so this reads top, right, bottom, left
        assert_eq!(angular_order(&ovals), vec![2, 1, 0, 3]);
    }

    #[test]
    fn min_touch_closes_the_gap_symmetrically() {
        let mut ovals = vec![circle(0.0, 0.0, 10.0, 0), circle(50.0, 0.0, 10.0, 1)];
        ensure_min_touch(&mut ovals, 0.0, 3);
        assert!((ovals[0].x - 15.0).abs() < 1e-9);
        assert!((ovals[1].x - 35.0).abs() < 1e-9);
        assert_eq!(ovals[0].rx, 10.0);
    }

    #[test]
    fn min_touch_leaves_overlapping_pairs_alone() {
        let mut ovals = vec![circle(0.0, 0.0, 10.0, 0), circle(15.0, 0.0, 10.0, 1)];
        let before = ovals.clone();
        ensure_min_touch(&mut ovals, 0.02, 3);
        assert_eq!(ovals, before);
    }

    #[test]
    fn overlap_pass_grows_the_smaller_oval() {
        let mut ovals = vec![circle(0.0, 0.0, 10.0, 0), circle(20.0, 0.0, 5.0, 1)];
        ensure_neighbor_overlap(&mut ovals, 0.2);
        // Both ordered pairs of a two-oval ring are visited
        assert!((ovals[1].rx - 10.0375).abs() < 1e-9);
        assert!((ovals[1].ry - 10.0375).abs() < 1e-9);
        assert_eq!(ovals[0].rx, 10.0);
    }

    #[test]
    fn single_oval_is_untouched() {
        let mut ovals = vec![circle(3.0, 4.0, 2.0, 0)];
        ensure_min_touch(&mut ovals, 0.1, 3);
        ensure_neighbor_overlap(&mut ovals, 0.1);
        assert_eq!(ovals, vec![circle(3.0, 4.0, 2.0, 0)]);
    }
}
