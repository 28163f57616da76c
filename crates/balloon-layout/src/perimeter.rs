//! Ovals along the four sides of a rectangle
//!
//! Each side gets a count decided by its length, positions along the side
//! in `[0, 1]`, and radii shaped so that:
//!
//! - an oval only partly covers the rectangle
//! - ovals on the same side overlap each other
//! - ovals from opposite sides never meet across the middle
//!
//! Corner crossings between perpendicular sides are fixed up afterwards by
//! [`crate::corner::enforce_corner_overlaps`].

use balloon_core::{Oval, OvalOrigin, Point, Side, StyleConfig};
use rand::Rng;

use crate::uniform;

/// Distance between two same-side centers as a fraction of the side
const PAIR_CENTER_SEPARATION: f64 = 0.6;

/// Crowded sides spread from here to `1 - CROWD_EDGE`
const CROWD_EDGE: f64 = 0.16;

const CROWD_MARGIN: f64 = 0.06;

/// Start and end point of a side, walking clockwise from the top-left corner
pub fn side_segment(side: Side, center: Point, half_w: f64, half_h: f64) -> (Point, Point) {
    let (l, r) = (center.x - half_w, center.x + half_w);
    let (t, b) = (center.y - half_h, center.y + half_h);
    match side {
        Side::Top => (Point::new(l, t), Point::new(r, t)),
        Side::Right => (Point::new(r, t), Point::new(r, b)),
        Side::Bottom => (Point::new(r, b), Point::new(l, b)),
        Side::Left => (Point::new(l, b), Point::new(l, t)),
    }
}

/// How many ovals a side of the rectangle receives
pub fn ovals_for_side(side: Side, half_w: f64, half_h: f64, style: &StyleConfig) -> usize {
    let (along, across) = if side.is_horizontal() {
        (half_w, half_h)
    } else {
        (half_h, half_w)
    };
    let length = along * 2.0;

    let mut count = if along > across { 2 } else { 1 };
    if length < style.min_side_length_for_pair {
        count = 1;
    }

    let floor = if length > style.long_side_threshold {
        style.long_side_ovals.max(style.min_ovals_per_side)
    } else {
        style.min_ovals_per_side
    };
    count.max(floor).max(1)
}

/// Generates every side oval, ids assigned sequentially in side order
pub fn generate_side_ovals<R: Rng + ?Sized>(
    center: Point,
    half_w: f64,
    half_h: f64,
    style: &StyleConfig,
    rng: &mut R,
) -> Vec<Oval> {
    let mut ovals = Vec::new();
    for side in Side::ALL {
        let count = ovals_for_side(side, half_w, half_h, style);
        let (start, end) = side_segment(side, center, half_w, half_h);
        for i in 0..count {
            let t = position_along(i, count, style, rng);
            let on_side = start.lerp(end, t);
            let oval = side_oval(side, on_side, t, count, half_w, half_h, style, rng);
            ovals.push(oval.with_id(ovals.len()));
        }
    }
    log::trace!("generated {} side ovals", ovals.len());
    ovals
}

/// Parameter along the side for the `index`-th of `count` ovals
fn position_along<R: Rng + ?Sized>(
    index: usize,
    count: usize,
    style: &StyleConfig,
    rng: &mut R,
) -> f64 {
    let pj = style.position_jitter;
    match count {
        0 | 1 => {
            let j = style.single_position_jitter;
            0.5 + uniform(rng, -j, j)
        },
        2 => {
            let anchor = if index == 0 {
                style.pair_anchor
            } else {
                1.0 - style.pair_anchor
            };
            let margin = style.position_margin;
            (anchor + uniform(rng, -pj, pj)).clamp(margin, 1.0 - margin)
        },
        _ => {
            let step = (1.0 - 2.0 * CROWD_EDGE) / (count - 1) as f64;
            let mut base = CROWD_EDGE + step * index as f64;
            if index != 0 && index != count - 1 {
                base += uniform(rng, -pj, pj);
            }
            (base + uniform(rng, -pj, pj + 0.005)).clamp(CROWD_MARGIN, 1.0 - CROWD_MARGIN)
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn side_oval<R: Rng + ?Sized>(
    side: Side,
    on_side: Point,
    t: f64,
    count: usize,
    half_w: f64,
    half_h: f64,
    style: &StyleConfig,
    rng: &mut R,
) -> Oval {
    let horizontal = side.is_horizontal();
    let (half_along, half_across) = if horizontal {
        (half_w, half_h)
    } else {
        (half_h, half_w)
    };

    // Radii along and across the side; corner ovals slightly smaller
    let corner_bias = count >= 2 && (t < 0.3 || t > 0.7);
    let corner_shrink = if corner_bias { 0.9 } else { 1.0 };
    let span_base = if count == 1 {
        0.74
    } else {
        0.46 + uniform(rng, -0.025, 0.03)
    };
    let span = span_base * corner_shrink;
    let mut along = half_along * span * uniform(rng, 0.94, 1.05);
    let across_base = (0.28 + uniform(rng, -0.025, 0.035)) * corner_shrink;
    let mut across = half_across * across_base * uniform(rng, 0.92, 1.08);

    let scale = if count >= 3 {
        style.crowd_radius_scale
    } else {
        style.pair_radius_scale
    };
    let (wlo, whi) = style.scale_wobble;
    along *= scale * uniform(rng, wlo, whi);
    across *= scale * uniform(rng, wlo, whi);

    let bulge = style.bulge_probability.clamp(0.0, 1.0);
    if bulge > 0.0 && rng.random_bool(bulge) {
        across *= uniform(rng, 1.05, 1.18);
    }

    // Same-side neighbors must overlap by a fixed share of the side
    if count >= 2 {
        let full = half_along * 2.0;
        let separation = PAIR_CENTER_SEPARATION * full;
        let min_overlap = style.same_side_min_overlap_frac * full;
        if 2.0 * along - separation < min_overlap {
            along = (separation + min_overlap) / 2.0;
        }
    }

    if count >= 2 && (t < 0.25 || t > 0.75) {
        along *= 1.0 + uniform(rng, -0.01, 0.015);
    }

    let (rx, ry) = if horizontal {
        (along, across)
    } else {
        (across, along)
    };

    let mut penetration = if horizontal {
        ry * (style.penetration_horizontal + uniform(rng, -0.035, 0.04))
    } else {
        rx * (style.penetration_vertical + uniform(rng, -0.04, 0.05))
    };
    if corner_bias {
        penetration *= style.corner_penetration_scale;
    }
    penetration *= style.penetration_scale;

    let (nx, ny) = side.outward_normal();
    let cj = style.center_jitter;
    let x = on_side.x - nx * penetration + uniform(rng, -cj, cj);
    let y = on_side.y - ny * penetration + uniform(rng, -cj, cj);

    Oval::new(x, y, rx, ry, OvalOrigin::Side(side))
}

#[cfg(test)]
mod tests {
    use super::*;
    use balloon_core::StylePreset;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn standard() -> StyleConfig {
        StyleConfig::from_preset(StylePreset::Standard)
    }

    #[test]
    fn segments_walk_clockwise() {
        let c = Point::new(100.0, 100.0);
        assert_eq!(
            side_segment(Side::Top, c, 50.0, 20.0),
            (Point::new(50.0, 80.0), Point::new(150.0, 80.0))
        );
        assert_eq!(
            side_segment(Side::Left, c, 50.0, 20.0),
            (Point::new(50.0, 120.0), Point::new(50.0, 80.0))
        );
    }

    #[test]
    fn standard_counts_follow_the_long_dimension() {
        let style = standard();
        assert_eq!(ovals_for_side(Side::Top, 150.0, 60.0, &style), 2);
        assert_eq!(ovals_for_side(Side::Left, 150.0, 60.0, &style), 1);
        // Square: no side is longer
        assert_eq!(ovals_for_side(Side::Top, 100.0, 100.0, &style), 1);
        // Too short for a pair even though it is the long side
        assert_eq!(ovals_for_side(Side::Top, 35.0, 10.0, &style), 1);
    }

    #[test]
    fn energetic_counts_have_floors() {
        let style = StyleConfig::from_preset(StylePreset::Energetic);
        assert_eq!(ovals_for_side(Side::Top, 150.0, 60.0, &style), 3);
        assert_eq!(ovals_for_side(Side::Left, 150.0, 60.0, &style), 2);
        assert_eq!(ovals_for_side(Side::Top, 30.0, 20.0, &style), 2);
    }

    #[test]
    fn ids_are_sequential_and_sides_complete() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let ovals = generate_side_ovals(Point::new(0.0, 0.0), 120.0, 80.0, &standard(), &mut rng);
        for (i, oval) in ovals.iter().enumerate() {
            assert_eq!(oval.id, Some(i));
            assert!(oval.is_valid());
        }
        for side in Side::ALL {
            assert!(ovals.iter().any(|o| o.side() == Some(side)));
        }
    }

    #[test]
    fn ovals_straddle_their_side() {
        let c = Point::new(300.0, 300.0);
        for seed in 0..30 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let ovals = generate_side_ovals(c, 160.0, 100.0, &StyleConfig::default(), &mut rng);
            for oval in &ovals {
                match oval.side() {
                    Some(Side::Top) => assert!(oval.y + oval.ry > c.y - 100.0),
                    Some(Side::Bottom) => assert!(oval.y - oval.ry < c.y + 100.0),
                    Some(Side::Left) => assert!(oval.x + oval.rx > c.x - 160.0),
                    Some(Side::Right) => assert!(oval.x - oval.rx < c.x + 160.0),
                    None => unreachable!(),
                }
            }
        }
    }

    #[test]
    fn same_side_pairs_reach_minimum_along_radius() {
        let style = standard();
        for seed in 0..40 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let ovals = generate_side_ovals(Point::ZERO, 150.0, 60.0, &style, &mut rng);
            let full = 300.0;
            for oval in ovals.iter().filter(|o| o.side() == Some(Side::Top)) {
                // Corner jitter may shave at most one percent
                let floor = (0.6 + 0.14) * full / 2.0 * 0.99;
                assert!(oval.rx >= floor - 1e-9, "rx {} < {}", oval.rx, floor);
            }
        }
    }
}
