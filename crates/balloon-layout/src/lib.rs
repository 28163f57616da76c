//! Stage one: ovals that bite into a base shape
//!
//! Rectangles get one to three ovals per side, pushed slightly inwards,
//! with a final pass that makes sure the ovals meeting at each corner
//! actually overlap. Circles either reuse the side layout or place a
//! fixed ring of five, six or seven ovals and then pull neighbors
//! together until they touch.
//!
//! Every function takes the random source explicitly. Seed it once per
//! render and the layout is reproducible bit for bit.
//!
//! ```
//! use balloon_core::{BaseShape, Point, StyleConfig};
//! use balloon_layout::{layout_ovals, OvalLayout};
//! use rand::SeedableRng;
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//! let shape = BaseShape::rect(Point::new(300.0, 300.0), 150.0, 90.0);
//! let ovals = layout_ovals(&shape, &OvalLayout::Sides(StyleConfig::default()), &mut rng);
//! assert!(ovals.iter().all(|o| o.is_valid()));
//! ```

pub mod corner;
pub mod neighbor;
pub mod perimeter;
pub mod radial;

#[cfg(test)]
mod proptests;

use balloon_core::{BaseShape, Oval, Point, RadialVariant, StyleConfig, StylePreset};
use rand::Rng;

pub use corner::{corner_pairs, enforce_corner_overlaps};
pub use neighbor::{angular_order, ensure_min_touch, ensure_neighbor_overlap};
pub use perimeter::generate_side_ovals;
pub use radial::generate_radial_ovals;

/// How ovals are arranged around a base shape
#[derive(Debug, Clone, PartialEq)]
pub enum OvalLayout {
    /// Ovals along each side, followed by the corner-overlap pass
    Sides(StyleConfig),
    /// A fixed ring of ovals around the center
    Radial {
        variant: RadialVariant,
        preset: StylePreset,
    },
}

/// Lays out ovals for any base shape
///
/// A circle laid out by sides is treated as its bounding square; a
/// rectangle laid out radially uses its smaller half extent as radius.
pub fn layout_ovals<R: Rng + ?Sized>(
    shape: &BaseShape,
    layout: &OvalLayout,
    rng: &mut R,
) -> Vec<Oval> {
    let center = shape.center();
    match (layout, shape) {
        (OvalLayout::Sides(style), BaseShape::Circle { radius, .. }) => {
            layout_circle_sides(center, *radius, style, rng)
        },
        (OvalLayout::Sides(style), BaseShape::Rect { half_w, half_h, .. }) => {
            layout_rect(center, *half_w, *half_h, style, rng)
        },
        (OvalLayout::Radial { variant, preset }, _) => {
            let (half_w, half_h) = shape.half_extents();
            generate_radial_ovals(center, half_w.min(half_h), *variant, *preset, rng)
        },
    }
}

/// Side layout plus corner fix for a rectangle
pub fn layout_rect<R: Rng + ?Sized>(
    center: Point,
    half_w: f64,
    half_h: f64,
    style: &StyleConfig,
    rng: &mut R,
) -> Vec<Oval> {
    let mut ovals = generate_side_ovals(center, half_w, half_h, style, rng);
    let grown = enforce_corner_overlaps(&mut ovals, style.corner_margin);
    log::trace!(
        "layout_rect: {} ovals around {:.1}x{:.1}, {} corner radii grown",
        ovals.len(),
        half_w * 2.0,
        half_h * 2.0,
        grown
    );
    ovals
}

/// Side layout against a circle, using the radius as both half extents
pub fn layout_circle_sides<R: Rng + ?Sized>(
    center: Point,
    radius: f64,
    style: &StyleConfig,
    rng: &mut R,
) -> Vec<Oval> {
    layout_rect(center, radius, radius, style, rng)
}

/// `U(lo, hi)`, collapsing to `lo` for an empty range
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}
