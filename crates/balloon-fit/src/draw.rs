//! Rendering a [`BubblePlan`] through the [`Surface`] contract
//!
//! Paint order, back to front:
//!
//! 1. the bubble body: either the full ovals with their gradients, or
//!    the base shape with every oval erased so only the gaps stay inked
//! 2. energy rays around energetic bubbles (optional)
//! 3. the exposed oval borders, clipped natively to the base shape
//! 4. the tail
//! 5. the text lines

use std::f64::consts::TAU;

use balloon_core::{
    BaseShape, Color, DrawOptions, GradientStop, Oval, Paint, Point, Result, Side, StrokeStyle,
    Surface,
};
use kurbo::{PathEl, Shape};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::arcs::exposed_arcs;
use crate::fitter::BubblePlan;

/// Flattening tolerance for kurbo shapes, in pixels
const PATH_TOLERANCE: f64 = 0.1;

const ARC_WIDTH: f64 = 4.0;
const ARC_ALPHA: f64 = 0.9;
const OVAL_OUTLINE_WIDTH: f64 = 2.0;
const OVAL_OUTLINE_ALPHA: f64 = 0.6;
const BASE_OUTLINE_WIDTH: f64 = 2.5;
const TAIL_OUTLINE_WIDTH: f64 = 2.2;
const TAIL_OUTLINE_ALPHA: f64 = 0.95;

const RAY_COUNT: usize = 18;
const RAY_OFFSET: f64 = 24.0;
const RAY_SKIP_PROBABILITY: f64 = 0.18;
const RAY_ALPHA: f64 = 0.65;
const RAY_WIDTH: f64 = 2.0;

/// Draws the whole bubble onto `surface`
pub fn draw_plan<S: Surface + ?Sized>(
    surface: &mut S,
    plan: &BubblePlan,
    options: &DrawOptions,
) -> Result<()> {
    if options.show_full_ovals {
        draw_full_ovals(surface, plan, options)?;
    } else if options.fill_gaps_only {
        fill_gaps(surface, plan, options)?;
    }

    if options.energy_lines && plan.style.is_energetic() {
        draw_energy_rays(surface, plan, options)?;
    }

    if options.emphasize_arcs {
        emphasize_arcs(surface, plan, options)?;
    }

    if let Some(tail) = plan.tail {
        draw_tail(surface, &tail, options)?;
    }

    if options.draw_text {
        draw_text(surface, plan, options)?;
    }
    Ok(())
}

/// Appends any kurbo shape to the current path
pub fn append_shape<S: Surface + ?Sized>(surface: &mut S, shape: &impl Shape) {
    let mut last = Point::ZERO;
    for el in shape.path_elements(PATH_TOLERANCE) {
        match el {
            PathEl::MoveTo(p) => {
                surface.move_to(p.x, p.y);
                last = p;
            },
            PathEl::LineTo(p) => {
                surface.line_to(p.x, p.y);
                last = p;
            },
            PathEl::QuadTo(q, p) => {
                // Degree elevation to a cubic
                let c1 = last + (q - last) * (2.0 / 3.0);
                let c2 = p + (q - p) * (2.0 / 3.0);
                surface.curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
                last = p;
            },
            PathEl::CurveTo(c1, c2, p) => {
                surface.curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
                last = p;
            },
            PathEl::ClosePath => surface.close_path(),
        }
    }
}

pub fn append_oval<S: Surface + ?Sized>(surface: &mut S, oval: &Oval) {
    append_shape(surface, &oval.to_ellipse());
}

/// Appends the outline of the base shape; circles use the native arc
pub fn append_base<S: Surface + ?Sized>(surface: &mut S, shape: &BaseShape) {
    match *shape {
        BaseShape::Circle { center, radius } => {
            surface.move_to(center.x + radius, center.y);
            surface.arc(center.x, center.y, radius, 0.0, TAU);
            surface.close_path();
        },
        BaseShape::Rect { .. } => append_shape(surface, &shape.bounds()),
    }
}

fn fill_gaps<S: Surface + ?Sized>(
    surface: &mut S,
    plan: &BubblePlan,
    options: &DrawOptions,
) -> Result<()> {
    surface.new_path();
    append_base(surface, &plan.shape);
    surface.fill(&Paint::Solid(options.paper))?;
    for oval in &plan.ovals {
        surface.new_path();
        append_oval(surface, oval);
        surface.fill(&Paint::Erase)?;
    }
    Ok(())
}

/// Side a radial oval faces, judged from its offset to the base centre
fn facing(oval: &Oval, center: Point) -> Side {
    oval.side().unwrap_or_else(|| {
        let (dx, dy) = (oval.x - center.x, oval.y - center.y);
        match (dx.abs() > dy.abs(), dx >= 0.0, dy >= 0.0) {
            (true, true, _) => Side::Right,
            (true, false, _) => Side::Left,
            (false, _, true) => Side::Bottom,
            (false, _, false) => Side::Top,
        }
    })
}

/// Soft two-stop tint per side
fn side_gradient(side: Side) -> [Color; 2] {
    let c = Color::from_unit;
    match side {
        Side::Top => [c(1.0, 0.95, 0.9, 1.0), c(0.9, 0.85, 0.75, 1.0)],
        Side::Right => [c(0.95, 1.0, 0.9, 1.0), c(0.85, 0.9, 0.75, 1.0)],
        Side::Bottom => [c(0.9, 0.95, 1.0, 1.0), c(0.75, 0.85, 0.9, 1.0)],
        Side::Left => [c(1.0, 0.9, 0.95, 1.0), c(0.9, 0.75, 0.85, 1.0)],
    }
}

fn draw_full_ovals<S: Surface + ?Sized>(
    surface: &mut S,
    plan: &BubblePlan,
    options: &DrawOptions,
) -> Result<()> {
    let center = plan.shape.center();

    surface.new_path();
    append_base(surface, &plan.shape);
    surface.stroke(&Paint::Solid(options.ink), &StrokeStyle::new(BASE_OUTLINE_WIDTH))?;

    // Farthest first so nearer ovals overlap them
    let mut order: Vec<&Oval> = plan.ovals.iter().collect();
    order.sort_by(|a, b| b.center().distance(center).total_cmp(&a.center().distance(center)));

    let outline = Paint::Solid(options.ink.with_alpha(OVAL_OUTLINE_ALPHA));
    for oval in order {
        let [inner, outer] = side_gradient(facing(oval, center));
        let gradient = Paint::RadialGradient {
            center: oval.center(),
            radius: oval.rx.max(oval.ry),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: inner,
                },
                GradientStop {
                    offset: 1.0,
                    color: outer,
                },
            ],
        };
        surface.new_path();
        append_oval(surface, oval);
        surface.fill(&gradient)?;
        surface.new_path();
        append_oval(surface, oval);
        surface.stroke(&outline, &StrokeStyle::new(OVAL_OUTLINE_WIDTH))?;
    }
    Ok(())
}

/// Short radiating ticks just outside the bubble
///
/// Uses its own generator seeded from the plan, so toggling the rays never
/// changes the layout.
fn draw_energy_rays<S: Surface + ?Sized>(
    surface: &mut S,
    plan: &BubblePlan,
    options: &DrawOptions,
) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(plan.metadata.seed);
    let center = plan.shape.center();
    let (half_w, half_h) = plan.shape.half_extents();
    let (outer_x, outer_y) = (half_w + RAY_OFFSET, half_h + RAY_OFFSET);

    surface.new_path();
    for i in 0..RAY_COUNT {
        let angle = TAU * i as f64 / RAY_COUNT as f64 + rng.random_range(-0.05..0.05);
        if rng.random_bool(RAY_SKIP_PROBABILITY) {
            continue;
        }
        let length = rng.random_range(10.0..24.0);
        let (sin, cos) = angle.sin_cos();
        let sx = center.x + cos * (outer_x + rng.random_range(-4.0..4.0));
        let sy = center.y + sin * (outer_y + rng.random_range(-4.0..4.0));
        surface.move_to(sx, sy);
        surface.line_to(sx + cos * length, sy + sin * length);
    }
    surface.stroke(
        &Paint::Solid(options.ink.with_alpha(RAY_ALPHA)),
        &StrokeStyle::new(RAY_WIDTH),
    )
}

fn emphasize_arcs<S: Surface + ?Sized>(
    surface: &mut S,
    plan: &BubblePlan,
    options: &DrawOptions,
) -> Result<()> {
    surface.new_path();
    append_base(surface, &plan.shape);
    surface.push_clip()?;
    let stroked = stroke_exposed_arcs(surface, plan, options);
    // Popped even when a stroke failed
    surface.pop_clip();
    stroked
}

fn stroke_exposed_arcs<S: Surface + ?Sized>(
    surface: &mut S,
    plan: &BubblePlan,
    options: &DrawOptions,
) -> Result<()> {
    let paint = Paint::Solid(options.ink.with_alpha(ARC_ALPHA));
    let style = StrokeStyle::round(ARC_WIDTH);
    for index in 0..plan.ovals.len() {
        for run in exposed_arcs(&plan.ovals, index) {
            let Some((first, rest)) = run.split_first() else {
                continue;
            };
            surface.new_path();
            surface.move_to(first.x, first.y);
            for p in rest {
                surface.line_to(p.x, p.y);
            }
            surface.stroke(&paint, &style)?;
        }
    }
    Ok(())
}

fn draw_tail<S: Surface + ?Sized>(
    surface: &mut S,
    tail: &[Point; 3],
    options: &DrawOptions,
) -> Result<()> {
    let trace = |surface: &mut S| {
        surface.new_path();
        surface.move_to(tail[0].x, tail[0].y);
        surface.line_to(tail[1].x, tail[1].y);
        surface.line_to(tail[2].x, tail[2].y);
        surface.close_path();
    };
    trace(&mut *surface);
    surface.fill(&Paint::Solid(options.paper))?;
    trace(&mut *surface);
    surface.stroke(
        &Paint::Solid(options.ink.with_alpha(TAIL_OUTLINE_ALPHA)),
        &StrokeStyle::new(TAIL_OUTLINE_WIDTH),
    )
}

fn draw_text<S: Surface + ?Sized>(
    surface: &mut S,
    plan: &BubblePlan,
    options: &DrawOptions,
) -> Result<()> {
    let paint = Paint::Solid(options.text_ink);
    for (line, placed) in plan.text.lines.iter().zip(plan.placed_lines()) {
        surface.draw_text(
            &line.text,
            placed.origin.x,
            placed.origin.y,
            &plan.font,
            plan.text.font_size,
            &paint,
        )?;
    }
    Ok(())
}
