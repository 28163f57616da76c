//! Stage three: the adaptive size and text fitter
//!
//! One call runs, strictly in order:
//!
//! 1. **Measure** the text at a generous reference size to estimate the
//!    interior it needs (text box plus padding on every side)
//! 2. **Grow/shrink** the base shape: lay out ovals, sample the free
//!    region, scale by whatever factor would make the region match the
//!    requirement. Stop when the factor is close to one, when the panel
//!    fraction cap would be exceeded (recorded as `capped`), or when the
//!    iteration budget runs out
//! 3. **Fit** the text: lay out once more at the final resolution, then
//!    shrink (and optionally wrap) until the text box fits a margin of
//!    the free region
//! 4. **Verify** by sampling the text boxes; shrink and retry a bounded
//!    number of times
//!
//! Nothing here loops back to an earlier stage, and every stop condition
//! ends up as a flag in [`FitMetadata`] rather than an error.

use balloon_core::{
    BalloonError, BaseShape, CircleFitParams, FitMetadata, FitParams, FitTuning, FontSpec,
    FreeRegion, Oval, Point, RectFitParams, Result, StyleConfig, StylePreset, TextLayout,
    TextMeasurer,
};
use balloon_layout::{layout_ovals, OvalLayout};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::sampler::find_free_region;
use crate::tail::tail_points;
use crate::text::{measure_text_block, TextFitter};
use crate::verify::{place_lines, verify_placement, PlacedLine};

/// Everything decided about a bubble before any pixel is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct BubblePlan {
    pub shape: BaseShape,
    pub ovals: Vec<Oval>,
    pub free: FreeRegion,
    pub text: TextLayout,
    /// Line pitch used for both verification and drawing
    pub line_spacing: f64,
    pub tail: Option<[Point; 3]>,
    pub style: StylePreset,
    pub font: FontSpec,
    pub metadata: FitMetadata,
}

impl BubblePlan {
    /// Text lines positioned on the free region
    pub fn placed_lines(&self) -> Vec<PlacedLine> {
        place_lines(self.free.center, &self.text, self.line_spacing)
    }
}

/// Plans a bubble around a circular base with a radial oval ring
pub fn plan_circle_bubble<M: TextMeasurer + ?Sized>(
    text: &str,
    params: &CircleFitParams,
    measurer: &M,
) -> Result<BubblePlan> {
    let fit = Fit::new(
        text,
        &params.base,
        &params.tuning,
        OvalLayout::Radial {
            variant: params.variant,
            preset: params.base.style,
        },
        measurer,
    )?;
    let (req_w, req_h) = fit.required_size()?;
    let radius = req_w.max(req_h) * params.tuning.initial_scale;
    log::debug!(
        "circle fit '{}': {} layout, required {req_w:.1}x{req_h:.1}, initial radius {radius:.1}",
        text,
        params.variant
    );
    fit.run(BaseShape::circle(fit.canvas_center(), radius), (req_w, req_h))
}

/// Plans a bubble around a rectangular base with ovals along its sides
pub fn plan_rect_bubble<M: TextMeasurer + ?Sized>(
    text: &str,
    params: &RectFitParams,
    measurer: &M,
) -> Result<BubblePlan> {
    if !(params.aspect_ratio.is_finite() && params.aspect_ratio > 0.0) {
        return Err(BalloonError::invalid(format!(
            "aspect_ratio must be positive, got {}",
            params.aspect_ratio
        )));
    }
    let fit = Fit::new(
        text,
        &params.base,
        &params.tuning,
        OvalLayout::Sides(StyleConfig::from_preset(params.base.style)),
        measurer,
    )?;
    let (req_w, req_h) = fit.required_size()?;
    let half_w = req_w * params.tuning.initial_scale / 2.0;
    let half_h = req_h * params.tuning.initial_scale / params.aspect_ratio / 2.0;
    log::debug!(
        "rect fit '{}': required {req_w:.1}x{req_h:.1}, initial {:.1}x{:.1}",
        text,
        half_w * 2.0,
        half_h * 2.0
    );
    fit.run(
        BaseShape::rect(fit.canvas_center(), half_w, half_h),
        (req_w, req_h),
    )
}

/// Outcome of the grow/shrink loop
struct Grown {
    shape: BaseShape,
    capped: bool,
    passes: u32,
}

struct Fit<'a, M: ?Sized> {
    text: &'a str,
    params: &'a FitParams,
    tuning: &'a FitTuning,
    layout: OvalLayout,
    measurer: &'a M,
}

impl<'a, M: TextMeasurer + ?Sized> Fit<'a, M> {
    fn new(
        text: &'a str,
        params: &'a FitParams,
        tuning: &'a FitTuning,
        layout: OvalLayout,
        measurer: &'a M,
    ) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(BalloonError::invalid("text must not be empty"));
        }
        params.validate()?;
        tuning.validate()?;
        Ok(Self {
            text,
            params,
            tuning,
            layout,
            measurer,
        })
    }

    fn canvas_center(&self) -> Point {
        let (w, h) = self.params.canvas_size;
        Point::new(f64::from(w) / 2.0, f64::from(h) / 2.0)
    }

    /// Text box at the reference size plus padding on every side
    fn required_size(&self) -> Result<(f64, f64)> {
        let p = self.params;
        let block = measure_text_block(
            self.measurer,
            self.text,
            &p.font,
            p.reference_font_size,
            f64::from(p.canvas_size.0) * p.measure_width_fraction,
            self.tuning.measure_line_spacing,
        )?;
        log::trace!(
            "reference block: {} lines, {:.1}x{:.1}",
            block.lines.len(),
            block.width,
            block.height
        );
        // Degenerate measurers must not collapse the shape to nothing
        Ok((
            (block.width + 2.0 * p.padding).max(1.0),
            (block.height + 2.0 * p.padding).max(1.0),
        ))
    }

    fn run(&self, initial: BaseShape, required: (f64, f64)) -> Result<BubblePlan> {
        initial.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);

        let sized = self.grow(initial, required, &mut rng);
        let shape = sized.shape;

        let ovals = layout_ovals(&shape, &self.layout, &mut rng);
        let free = find_free_region(&shape, &ovals, self.params.final_sample_resolution);
        if free.is_empty() {
            log::warn!("final layout left no free space; text falls back to the base centre");
        }

        let tail = self
            .params
            .tail_target
            .map(|target| {
                tail_points(
                    &shape,
                    target,
                    self.params.tail_length_factor,
                    self.params.tail_width_factor,
                )
            });

        let fitted = self.fit_text(&shape, &ovals, &free)?;

        let metadata = FitMetadata {
            shape_size: shape.size(),
            free_box: free,
            capped: sized.capped,
            font_shrunk: fitted.font_shrunk,
            max_panel_fraction: self.params.max_panel_fraction,
            wrapped: fitted.layout.wrapped,
            lines: fitted.layout.line_texts(),
            font_size: fitted.layout.font_size,
            text_verified: fitted.verified,
            adjust_iterations: fitted.adjust_iterations,
            tail_points: tail,
            seed: self.params.seed,
            grow_iterations: sized.passes,
        };

        log::info!(
            "fitted '{}': {:?}, font {:.1}px, {} line(s), capped={}, verified={}",
            self.text,
            metadata.shape_size,
            metadata.font_size,
            metadata.lines.len(),
            metadata.capped,
            metadata.text_verified
        );

        Ok(BubblePlan {
            shape,
            ovals,
            free,
            text: fitted.layout,
            line_spacing: self.tuning.line_spacing,
            tail,
            style: self.params.style,
            font: self.params.font.clone(),
            metadata,
        })
    }

    /// Scales the base shape until its free region matches `required`
    fn grow(&self, initial: BaseShape, required: (f64, f64), rng: &mut ChaCha8Rng) -> Grown {
        let (canvas_w, canvas_h) = self.params.canvas_size;
        let max_w = f64::from(canvas_w) * self.params.max_panel_fraction;
        let max_h = f64::from(canvas_h) * self.params.max_panel_fraction;
        let (lo, hi) = self.tuning.accept_band;

        let mut shape = initial;
        let mut capped = false;
        let mut passes = 0;

        for _ in 0..self.params.max_iterations {
            passes += 1;
            let ovals = layout_ovals(&shape, &self.layout, rng);
            let free = find_free_region(&shape, &ovals, self.params.sample_resolution);
            if free.is_empty() {
                log::debug!(
                    "pass {passes}: no free space, growing by {}",
                    self.tuning.empty_growth
                );
                shape = shape.scaled(self.tuning.empty_growth);
                continue;
            }

            let needed = (required.0 / free.width).max(required.1 / free.height);
            let (half_w, half_h) = shape.half_extents();
            log::debug!(
                "pass {passes}: shape {:.1}x{:.1}, free {:.1}x{:.1}, needed x{needed:.3}",
                half_w * 2.0,
                half_h * 2.0,
                free.width,
                free.height
            );

            if 2.0 * half_w * needed > max_w || 2.0 * half_h * needed > max_h {
                let limit = (max_w / (2.0 * half_w)).min(max_h / (2.0 * half_h));
                shape = shape.scaled(limit);
                capped = true;
                log::warn!(
                    "bubble capped at {:.0}% of the canvas",
                    self.params.max_panel_fraction * 100.0
                );
                break;
            }
            if lo < needed && needed < hi {
                break;
            }
            shape = shape.scaled(needed);
        }

        Grown {
            shape,
            capped,
            passes,
        }
    }

    fn fit_text(&self, shape: &BaseShape, ovals: &[Oval], free: &FreeRegion) -> Result<FittedText> {
        let p = self.params;
        let t = self.tuning;
        let fitter = TextFitter::new(self.measurer, &p.font, p.min_font_size)
            .with_shrink(t.shrink_factor)
            .with_line_spacing(t.line_spacing);
        let wrap_width = free.width * t.margin_scale;
        let relayout = |size: f64| {
            if p.wraps() {
                fitter.wrap_two_lines(self.text, wrap_width, size)
            } else {
                fitter.single_line(self.text, size)
            }
        };
        let verify = |layout: &TextLayout| {
            verify_placement(shape, ovals, free.center, layout, t.line_spacing, t.verify_density)
        };

        let mut font_shrunk = false;
        let mut layout = if free.is_empty() {
            fitter.single_line(self.text, p.min_font_size.max(t.fallback_font_size))?
        } else {
            let max_attempt =
                (free.height * t.font_height_fraction).min(free.width * t.font_width_fraction);
            if p.wraps() {
                let layout = fitter.wrap_two_lines(self.text, wrap_width, max_attempt)?;
                font_shrunk = layout.font_size <= p.min_font_size
                    && layout.lines.len() == 1
                    && !layout.wrapped;
                layout
            } else {
                let layout = fitter.fit_in_box(
                    self.text,
                    free.width,
                    free.height,
                    max_attempt,
                    t.margin_scale,
                )?;
                font_shrunk = layout.font_size <= p.min_font_size;
                layout
            }
        };

        let mut adjust_iterations = 0;
        if p.ensure_inside && !free.is_empty() {
            while adjust_iterations < p.verify_attempts {
                if verify(&layout) {
                    break;
                }
                adjust_iterations += 1;
                let next = layout.font_size * t.shrink_factor;
                if next < p.min_font_size {
                    font_shrunk = true;
                    layout = relayout(p.min_font_size)?;
                    break;
                }
                layout = relayout(next)?;
            }
        }

        let verified = verify(&layout);
        if !verified {
            log::warn!(
                "text '{}' still touches the bubble edge at {:.1}px",
                self.text,
                layout.font_size
            );
        }
        if font_shrunk {
            log::warn!("font reached the {:.1}px floor", p.min_font_size);
        }

        Ok(FittedText {
            layout,
            font_shrunk,
            verified,
            adjust_iterations,
        })
    }
}

struct FittedText {
    layout: TextLayout,
    font_shrunk: bool,
    verified: bool,
    adjust_iterations: u32,
}
