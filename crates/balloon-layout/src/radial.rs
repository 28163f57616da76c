//! Fixed rings of ovals around a circular core

use std::f64::consts::TAU;

use balloon_core::{Oval, OvalOrigin, Point, RadialVariant, StylePreset, MIN_TOUCH_PASSES};
use rand::Rng;

use crate::neighbor::{ensure_min_touch, ensure_neighbor_overlap};
use crate::uniform;

/// Range of the random factor on the anisotropic stretch
const ANISOTROPY_SPREAD: (f64, f64) = (0.7, 1.05);

/// Places `variant.profile().count` ovals around a core of `radius`
///
/// Oval `i` sits near angle `2πi/count` on a ring, is pulled back towards
/// the center, and finally the neighbor passes make adjacent ovals touch
/// and then overlap.
pub fn generate_radial_ovals<R: Rng + ?Sized>(
    center: Point,
    radius: f64,
    variant: RadialVariant,
    preset: StylePreset,
    rng: &mut R,
) -> Vec<Oval> {
    let profile = variant.profile();
    let ring = radius * profile.ring;
    let mut ovals = Vec::with_capacity(profile.count);

    for i in 0..profile.count {
        let angle = TAU * i as f64 / profile.count as f64
            + uniform(rng, -profile.angle_jitter, profile.angle_jitter);
        let dist = ring + uniform(rng, -profile.radial_jitter, profile.radial_jitter);
        let (sa, ca) = angle.sin_cos();
        let mut x = center.x + ca * dist;
        let mut y = center.y + sa * dist;

        let mut base = radius * profile.base_radius;
        if preset.is_energetic() {
            let (lo, hi) = profile.energetic_scale;
            base *= uniform(rng, lo, hi);
        }

        let (mut rx, mut ry) = (base, base);
        if profile.anisotropy > 0.0 {
            let (lo, hi) = ANISOTROPY_SPREAD;
            rx = base * (1.0 + profile.anisotropy * ca.abs() * uniform(rng, lo, hi));
            ry = base * (1.0 + profile.anisotropy * sa.abs() * uniform(rng, lo, hi));
        }

        // Stretch along the ring: tall ovals at the sides, wide ones top and bottom
        if let Some((lo, hi)) = profile.elongation {
            if ca.abs() > sa.abs() {
                ry *= uniform(rng, lo, hi);
            } else {
                rx *= uniform(rng, lo, hi);
            }
        }
        if let Some((lo, hi)) = profile.elongation_boost {
            let boost = uniform(rng, lo, hi);
            rx *= boost;
            ry *= boost;
        }

        let pull = radius * profile.inward_pull;
        let (lo, hi) = profile.pull_range;
        x -= ca * pull * uniform(rng, lo, hi);
        y -= sa * pull * uniform(rng, lo, hi);

        ovals.push(Oval::new(x, y, rx, ry, OvalOrigin::Radial { index: i }).with_id(i));
    }

    ensure_min_touch(&mut ovals, profile.min_touch_frac, MIN_TOUCH_PASSES);
    ensure_neighbor_overlap(&mut ovals, profile.overlap_frac);
    log::trace!(
        "{variant}: {} ovals around r={radius:.1}",
        ovals.len()
    );
    ovals
}
