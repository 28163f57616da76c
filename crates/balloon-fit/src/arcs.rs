//! Oval borders left exposed by the other ovals
//!
//! The inked outline of a bubble is made of these arcs. Each oval border
//! is sampled densely; runs of samples not covered by any other oval
//! become polylines. Clipping to the base shape is left to the surface.

use std::f64::consts::TAU;

use balloon_core::{Oval, Point};

/// Border samples per pixel of the larger radius
pub const SAMPLES_PER_RADIUS: f64 = 10.0;

/// Runs shorter than this many samples are dropped as specks
pub const MIN_RUN: usize = 3;

/// Polylines along `ovals[index]` that no other oval covers
///
/// A run that spans the sample seam is joined into one polyline.
pub fn exposed_arcs(ovals: &[Oval], index: usize) -> Vec<Vec<Point>> {
    let Some(oval) = ovals.get(index) else {
        return Vec::new();
    };
    let count = ((oval.rx.max(oval.ry) * SAMPLES_PER_RADIUS) as usize).max(16);
    let exposed = |p: Point| {
        !ovals
            .iter()
            .enumerate()
            .any(|(j, other)| j != index && other.contains(p))
    };

    let mut runs: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut first_open = false;
    for i in 0..count {
        let p = oval.point_at(TAU * i as f64 / count as f64);
        if exposed(p) {
            if i == 0 {
                first_open = true;
            }
            current.push(p);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        if first_open && !runs.is_empty() {
            // The last run wraps around into the first
            current.append(&mut runs[0]);
            runs[0] = current;
        } else {
            // Either the whole border is exposed or the run ends at the seam
            if first_open && runs.is_empty() {
                current.push(current[0]);
            }
            runs.push(current);
        }
    }

    runs.retain(|run| run.len() >= MIN_RUN);
    runs
}
