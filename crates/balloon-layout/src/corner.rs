//! Corner crossings between perpendicular sides
//!
//! The side layout cannot promise that, say, the lone right oval reaches
//! the bottom-right oval. This pass picks the two ovals nearest each
//! corner and grows the smaller radius on any axis where their boxes fail
//! to overlap by `margin` pixels. Only radii change; centers stay put, so
//! growth at one corner never undoes another.

use balloon_core::{Oval, Side};

/// Indices of the ovals meeting at each corner, clockwise from top-left
///
/// `None` when some side has no ovals at all.
pub fn corner_pairs(ovals: &[Oval]) -> Option<[(usize, usize); 4]> {
    let on = move |side: Side| {
        ovals
            .iter()
            .enumerate()
            .filter(move |(_, o)| o.side() == Some(side))
    };
    let first_by = |side: Side, key: fn(&Oval) -> f64| {
        on(side)
            .min_by(|(_, a), (_, b)| key(a).total_cmp(&key(b)))
            .map(|(i, _)| i)
    };
    let last_by = |side: Side, key: fn(&Oval) -> f64| {
        on(side)
            .max_by(|(_, a), (_, b)| key(a).total_cmp(&key(b)))
            .map(|(i, _)| i)
    };
    let x = |o: &Oval| o.x;
    let y = |o: &Oval| o.y;

    Some([
        (first_by(Side::Top, x)?, first_by(Side::Left, y)?),
        (last_by(Side::Top, x)?, first_by(Side::Right, y)?),
        (last_by(Side::Bottom, x)?, last_by(Side::Right, y)?),
        (first_by(Side::Bottom, x)?, last_by(Side::Left, y)?),
    ])
}

/// Makes every corner pair overlap by at least `margin` on both axes
///
/// Returns how many radii were grown.
pub fn enforce_corner_overlaps(ovals: &mut [Oval], margin: f64) -> usize {
    let Some(pairs) = corner_pairs(ovals) else {
        log::debug!("corner pass skipped: a side has no ovals");
        return 0;
    };

    let mut grown = 0;
    for (a, b) in pairs {
        let dx = (ovals[a].x - ovals[b].x).abs();
        let sum_rx = ovals[a].rx + ovals[b].rx;
        if dx > sum_rx - margin {
            let needed = dx + margin - sum_rx;
            let smaller = if ovals[a].rx < ovals[b].rx { a } else { b };
            ovals[smaller].rx += needed;
            grown += 1;
        }

        let dy = (ovals[a].y - ovals[b].y).abs();
        let sum_ry = ovals[a].ry + ovals[b].ry;
        if dy > sum_ry - margin {
            let needed = dy + margin - sum_ry;
            let smaller = if ovals[a].ry < ovals[b].ry { a } else { b };
            ovals[smaller].ry += needed;
            grown += 1;
        }
    }
    grown
}
