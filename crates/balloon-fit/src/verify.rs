//! Checks that placed text stays inside the bubble
//!
//! Each line's ink box is sampled on a small grid. Every sample must be
//! inside the base shape and outside every oval; one miss fails the whole
//! block.

use balloon_core::{point_in_any, BaseShape, Oval, Point, TextLayout};

/// Where a line's ink box lands once the block is centred on `center`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedLine {
    /// Baseline origin as handed to the surface
    pub origin: Point,
    /// Ink box
    pub ink: kurbo::Rect,
}

/// Lays out the lines of `layout` top to bottom around `center`
///
/// The block starts `total_height / 2` above the centre; each baseline is
/// one line height below the cursor, and the cursor advances by the line
/// height times `line_spacing`.
pub fn place_lines(center: Point, layout: &TextLayout, line_spacing: f64) -> Vec<PlacedLine> {
    let mut cursor = center.y - layout.total_height / 2.0;
    layout
        .lines
        .iter()
        .map(|line| {
            let e = &line.extents;
            let baseline = cursor + e.height;
            let left = center.x - e.width / 2.0;
            let top = baseline + e.bearing_y;
            cursor += e.height * line_spacing;
            PlacedLine {
                origin: Point::new(left - e.bearing_x, baseline),
                ink: kurbo::Rect::new(left, top, left + e.width, top + e.height),
            }
        })
        .collect()
}

/// Grid samples over every placed ink box, `density` per axis
pub fn sample_points(placed: &[PlacedLine], density: usize) -> impl Iterator<Item = Point> + '_ {
    let n = density.max(2);
    let step = 1.0 / (n - 1) as f64;
    placed.iter().flat_map(move |line| {
        let ink = line.ink;
        (0..n).flat_map(move |sx| {
            (0..n).map(move |sy| {
                Point::new(
                    ink.x0 + ink.width() * (sx as f64 * step),
                    ink.y0 + ink.height() * (sy as f64 * step),
                )
            })
        })
    })
}

/// True when every sample of every line is inside `shape` and outside all ovals
///
/// An empty layout trivially passes.
pub fn verify_placement(
    shape: &BaseShape,
    ovals: &[Oval],
    center: Point,
    layout: &TextLayout,
    line_spacing: f64,
    density: usize,
) -> bool {
    let placed = place_lines(center, layout, line_spacing);
    let mut samples = sample_points(&placed, density);
    samples.all(|p| shape.contains(p) && !point_in_any(ovals, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use balloon_core::{LineLayout, OvalOrigin, TextExtents};

    fn line(text: &str, width: f64, height: f64) -> LineLayout {
        LineLayout {
            text: text.to_string(),
            extents: TextExtents {
                width,
                height,
                bearing_x: 1.0,
                bearing_y: -height,
                advance: width,
            },
        }
    }

    fn two_lines() -> TextLayout {
        TextLayout {
            font_size: 20.0,
            lines: vec![line("ONE", 40.0, 10.0), line("TWO", 30.0, 10.0)],
            total_height: 10.0 + 10.0 * 1.1,
            wrapped: true,
        }
    }

    #[test]
    fn lines_stack_around_the_center() {
        let placed = place_lines(Point::new(100.0, 100.0), &two_lines(), 1.1);
        assert_eq!(placed.len(), 2);
        // cursor starts at 100 - 10.5; first baseline 10 lower
        assert!((placed[0].origin.y - 99.5).abs() < 1e-9);
        assert!((placed[0].origin.x - 79.0).abs() < 1e-9);
        assert!((placed[0].ink.y0 - 89.5).abs() < 1e-9);
        assert!((placed[1].origin.y - 110.5).abs() < 1e-9);
        assert!((placed[1].ink.x0 - 85.0).abs() < 1e-9);
    }

    #[test]
    fn samples_cover_box_corners() {
        let placed = place_lines(Point::new(0.0, 0.0), &two_lines(), 1.1);
        let samples: Vec<Point> = sample_points(&placed, 6).collect();
        assert_eq!(samples.len(), 72);
        assert!(samples.contains(&Point::new(placed[0].ink.x0, placed[0].ink.y0)));
        assert!(samples.contains(&Point::new(placed[1].ink.x1, placed[1].ink.y1)));
    }

    #[test]
    fn placement_fails_on_oval_or_outside() {
        let layout = two_lines();
        let shape = BaseShape::rect(Point::new(0.0, 0.0), 100.0, 100.0);
        assert!(verify_placement(&shape, &[], Point::ZERO, &layout, 1.1, 6));

        let blocking = Oval::new(0.0, 0.0, 8.0, 8.0, OvalOrigin::Radial { index: 0 });
        assert!(!verify_placement(&shape, &[blocking], Point::ZERO, &layout, 1.1, 6));

        let small = BaseShape::rect(Point::new(0.0, 0.0), 15.0, 100.0);
        assert!(!verify_placement(&small, &[], Point::ZERO, &layout, 1.1, 6));
    }

    #[test]
    fn empty_layout_passes() {
        let layout = TextLayout {
            font_size: 12.0,
            lines: Vec::new(),
            total_height: 0.0,
            wrapped: false,
        };
        let shape = BaseShape::circle(Point::ZERO, 1.0);
        assert!(verify_placement(&shape, &[], Point::new(50.0, 50.0), &layout, 1.1, 6));
    }
}
