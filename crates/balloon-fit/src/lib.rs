//! Balloon Fit: speech bubbles that grow around their text
//!
//! The two entry points, [`fit_circle_bubble`] and [`fit_rect_bubble`],
//! run the whole pipeline for one bubble:
//!
//! ```text
//! text ──▶ measure ──▶ grow/shrink base ──▶ final layout ──▶ fit text ──▶ verify ──▶ draw
//!                       │   ▲                (ovals +                     │   ▲
//!                       ▼   │                 sampler)                    ▼   │
//!                     layout + sample                                  shrink font
//! ```
//!
//! Geometry is decided first as a [`BubblePlan`]; only then is a surface
//! allocated and drawn on. Call [`plan_circle_bubble`] or
//! [`plan_rect_bubble`] directly when you want the geometry without pixels.
//!
//! ```
//! use balloon_core::{
//!     CircleFitParams, DrawOptions, FontSpec, RecordingProvider, Result, TextExtents,
//!     TextMeasurer,
//! };
//!
//! struct Mono;
//!
//! impl TextMeasurer for Mono {
//!     fn measure_text(&self, text: &str, _: &FontSpec, size: f64) -> Result<TextExtents> {
//!         let width = text.chars().count() as f64 * 0.6 * size;
//!         Ok(TextExtents {
//!             width,
//!             height: 0.72 * size,
//!             bearing_x: 0.0,
//!             bearing_y: -0.72 * size,
//!             advance: width,
//!         })
//!     }
//! }
//!
//! let (surface, meta) = balloon_fit::fit_circle_bubble(
//!     "POW",
//!     &CircleFitParams::default(),
//!     &DrawOptions::default(),
//!     &Mono,
//!     &RecordingProvider,
//! )?;
//! assert_eq!(meta.lines, vec!["POW"]);
//! assert!(!surface.ops().is_empty());
//! # Ok::<(), balloon_core::BalloonError>(())
//! ```

pub mod arcs;
pub mod draw;
pub mod fitter;
pub mod sampler;
pub mod tail;
pub mod text;
pub mod verify;

#[cfg(test)]
mod proptests;

use balloon_core::{
    CircleFitParams, DrawOptions, FitMetadata, RectFitParams, Result, SurfaceProvider,
    TextMeasurer,
};

pub use draw::draw_plan;
pub use fitter::{plan_circle_bubble, plan_rect_bubble, BubblePlan};
pub use sampler::find_free_region;
pub use tail::tail_points;
pub use text::{measure_text_block, TextBlock, TextFitter};
pub use verify::{place_lines, verify_placement, PlacedLine};

/// Fits `text` into a circular bubble and draws it on a fresh surface
pub fn fit_circle_bubble<M, P>(
    text: &str,
    params: &CircleFitParams,
    options: &DrawOptions,
    measurer: &M,
    provider: &P,
) -> Result<(P::Surface, FitMetadata)>
where
    M: TextMeasurer + ?Sized,
    P: SurfaceProvider + ?Sized,
{
    let plan = plan_circle_bubble(text, params, measurer)?;
    render(plan, params.base.canvas_size, options, provider)
}

/// Fits `text` into a rectangular bubble and draws it on a fresh surface
pub fn fit_rect_bubble<M, P>(
    text: &str,
    params: &RectFitParams,
    options: &DrawOptions,
    measurer: &M,
    provider: &P,
) -> Result<(P::Surface, FitMetadata)>
where
    M: TextMeasurer + ?Sized,
    P: SurfaceProvider + ?Sized,
{
    let plan = plan_rect_bubble(text, params, measurer)?;
    render(plan, params.base.canvas_size, options, provider)
}

fn render<P: SurfaceProvider + ?Sized>(
    plan: BubblePlan,
    (width, height): (u32, u32),
    options: &DrawOptions,
    provider: &P,
) -> Result<(P::Surface, FitMetadata)> {
    let background = (!options.transparent_canvas).then_some(options.paper);
    let mut surface = provider.create_surface(width, height, background)?;
    draw_plan(&mut surface, &plan, options)?;
    Ok((surface, plan.metadata))
}
