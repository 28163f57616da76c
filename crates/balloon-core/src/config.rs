//! Configuration values passed explicitly into every entry point
//!
//! Nothing in the engine reads process-wide state. Style knobs, fit
//! parameters and drawing toggles are plain values, so two renders with
//! the same inputs can never interfere with each other.
//!
//! The numeric defaults are presets, not invariants: every knob that
//! varied between historical bubble styles is a public field here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BalloonError, Result};
use crate::geometry::Point;
use crate::types::{Color, FontSpec};

/// Named starting points for [`StyleConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylePreset {
    /// One or two calm ovals per side
    Standard,
    /// More, smaller, more perturbed ovals ("laugh" bubbles)
    #[default]
    Energetic,
}

impl StylePreset {
    pub fn name(self) -> &'static str {
        match self {
            StylePreset::Standard => "standard",
            StylePreset::Energetic => "energetic",
        }
    }

    pub fn is_energetic(self) -> bool {
        matches!(self, StylePreset::Energetic)
    }
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StylePreset {
    type Err = BalloonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "varied" | "organic" => Ok(StylePreset::Standard),
            "energetic" | "laugh" | "jagged" => Ok(StylePreset::Energetic),
            other => Err(BalloonError::invalid(format!("unknown style preset '{other}'"))),
        }
    }
}

/// Knobs of the perimeter (side) layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub preset: StylePreset,
    /// Lower bound on ovals per side
    pub min_ovals_per_side: usize,
    /// Ovals on sides longer than `long_side_threshold`
    pub long_side_ovals: usize,
    pub long_side_threshold: f64,
    /// Sides shorter than this always get a single oval
    pub min_side_length_for_pair: f64,
    /// Drift of a lone oval around the side midpoint, as a side fraction
    pub single_position_jitter: f64,
    /// Where the first of a pair sits along its side (mirrored for the second)
    pub pair_anchor: f64,
    pub position_jitter: f64,
    /// Ovals never sit closer than this fraction to a side's end
    pub position_margin: f64,
    /// Final center jitter in pixels
    pub center_jitter: f64,
    /// Inward penetration of top/bottom ovals as a fraction of `ry`
    pub penetration_horizontal: f64,
    /// Inward penetration of left/right ovals as a fraction of `rx`
    pub penetration_vertical: f64,
    pub penetration_scale: f64,
    pub corner_penetration_scale: f64,
    /// Radius multiplier when a side carries fewer than three ovals
    pub pair_radius_scale: f64,
    /// Radius multiplier when a side carries three or more ovals
    pub crowd_radius_scale: f64,
    /// Independent per-axis wobble on top of the pair/crowd scale
    pub scale_wobble: (f64, f64),
    /// Chance of stretching an oval across its side
    pub bulge_probability: f64,
    /// Required overlap of same-side neighbors as a side-length fraction
    pub same_side_min_overlap_frac: f64,
    /// Guaranteed per-axis overlap of corner neighbors, in pixels
    pub corner_margin: f64,
}

impl StyleConfig {
    pub fn from_preset(preset: StylePreset) -> Self {
        let standard = Self {
            preset,
            min_ovals_per_side: 1,
            long_side_ovals: 1,
            long_side_threshold: 140.0,
            min_side_length_for_pair: 80.0,
            single_position_jitter: 0.08,
            pair_anchor: 0.18,
            position_jitter: 0.05,
            position_margin: 0.08,
            center_jitter: 3.0,
            penetration_horizontal: 0.38,
            penetration_vertical: 0.48,
            penetration_scale: 1.0,
            corner_penetration_scale: 0.85,
            pair_radius_scale: 1.0,
            crowd_radius_scale: 1.0,
            scale_wobble: (1.0, 1.0),
            bulge_probability: 0.0,
            same_side_min_overlap_frac: 0.14,
            corner_margin: 2.0,
        };
        match preset {
            StylePreset::Standard => standard,
            StylePreset::Energetic => Self {
                min_ovals_per_side: 2,
                long_side_ovals: 3,
                pair_anchor: 0.22,
                position_jitter: 0.06,
                position_margin: 0.07,
                penetration_scale: 0.9,
                pair_radius_scale: 0.85,
                crowd_radius_scale: 0.78,
                bulge_probability: 0.4,
                ..standard
            },
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::from_preset(StylePreset::default())
    }
}

/// Radial layouts for circular bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadialVariant {
    /// Five true circles on a wide ring
    Radial5,
    /// Six ovals stretched along the ring
    Radial6,
    /// Seven mildly anisotropic ovals
    #[default]
    Radial7,
}

impl RadialVariant {
    pub const ALL: [RadialVariant; 3] = [
        RadialVariant::Radial5,
        RadialVariant::Radial6,
        RadialVariant::Radial7,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RadialVariant::Radial5 => "radial5",
            RadialVariant::Radial6 => "radial6",
            RadialVariant::Radial7 => "radial7",
        }
    }

    /// The numbers behind each variant
    pub fn profile(self) -> RadialProfile {
        match self {
            RadialVariant::Radial5 => RadialProfile {
                count: 5,
                ring: 1.70,
                angle_jitter: 0.05,
                radial_jitter: 5.0,
                base_radius: 0.46,
                energetic_scale: (0.82, 0.92),
                anisotropy: 0.0,
                elongation: None,
                elongation_boost: None,
                inward_pull: 0.10,
                pull_range: (0.75, 0.95),
                min_touch_frac: 0.003,
                overlap_frac: 0.045,
            },
            RadialVariant::Radial6 => RadialProfile {
                count: 6,
                ring: 1.46,
                angle_jitter: 0.05,
                radial_jitter: 5.0,
                base_radius: 0.58,
                energetic_scale: (0.80, 0.90),
                anisotropy: 0.20,
                elongation: Some((1.25, 1.42)),
                elongation_boost: Some((1.0, 1.08)),
                inward_pull: 0.22,
                pull_range: (0.75, 1.0),
                min_touch_frac: 0.015,
                overlap_frac: 0.09,
            },
            RadialVariant::Radial7 => RadialProfile {
                count: 7,
                ring: 1.42,
                angle_jitter: 0.06,
                radial_jitter: 4.0,
                base_radius: 0.55,
                energetic_scale: (0.80, 0.92),
                anisotropy: 0.22,
                elongation: None,
                elongation_boost: None,
                inward_pull: 0.28,
                pull_range: (0.80, 1.05),
                min_touch_frac: 0.02,
                overlap_frac: 0.12,
            },
        }
    }
}

impl fmt::Display for RadialVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RadialVariant {
    type Err = BalloonError;

    fn from_str(s: &str) -> Result<Self> {
        RadialVariant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| BalloonError::invalid(format!("unknown radial variant '{s}'")))
    }
}

/// Ring geometry of a radial variant; radii are fractions of the core radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialProfile {
    pub count: usize,
    /// Distance of oval centers from the core center
    pub ring: f64,
    /// Angular jitter in radians
    pub angle_jitter: f64,
    /// Radial jitter in pixels
    pub radial_jitter: f64,
    pub base_radius: f64,
    /// Extra shrink range applied in the energetic style
    pub energetic_scale: (f64, f64),
    /// Stretch along cos/sin of the placement angle
    pub anisotropy: f64,
    /// Stretch range for the axis tangent to the ring
    pub elongation: Option<(f64, f64)>,
    pub elongation_boost: Option<(f64, f64)>,
    pub inward_pull: f64,
    pub pull_range: (f64, f64),
    pub min_touch_frac: f64,
    pub overlap_frac: f64,
}

/// Passes of the min-touch neighbor fix
pub const MIN_TOUCH_PASSES: usize = 3;

/// Parameters shared by both fit entry points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitParams {
    /// Canvas width and height in pixels
    pub canvas_size: (u32, u32),
    /// Interior padding around the measured text
    pub padding: f64,
    /// Budget of the grow/shrink loop
    pub max_iterations: u32,
    pub seed: u64,
    /// Largest bubble extent as a fraction of each canvas dimension
    pub max_panel_fraction: f64,
    pub min_font_size: f64,
    pub wrap: bool,
    pub max_lines: usize,
    /// Verify the sampled text box and shrink the font until it passes
    pub ensure_inside: bool,
    pub verify_attempts: u32,
    pub tail_target: Option<Point>,
    pub tail_length_factor: f64,
    pub tail_width_factor: f64,
    pub style: StylePreset,
    pub font: FontSpec,
    /// Size used for the first, optimistic measurement
    pub reference_font_size: f64,
    /// Wrap width of the first measurement as a canvas-width fraction
    pub measure_width_fraction: f64,
    /// Sampler grid resolution inside the grow/shrink loop
    pub sample_resolution: usize,
    /// Sampler grid resolution of the final, authoritative pass
    pub final_sample_resolution: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            canvas_size: (600, 600),
            padding: 20.0,
            max_iterations: 5,
            seed: 1234,
            max_panel_fraction: 0.75,
            min_font_size: 12.0,
            wrap: false,
            max_lines: 2,
            ensure_inside: true,
            verify_attempts: 8,
            tail_target: None,
            tail_length_factor: 0.55,
            tail_width_factor: 0.28,
            style: StylePreset::Energetic,
            font: FontSpec::default(),
            reference_font_size: 64.0,
            measure_width_fraction: 0.55,
            sample_resolution: 120,
            final_sample_resolution: 140,
        }
    }
}

impl FitParams {
    /// Wrapping into two lines only happens when asked for and allowed
    pub fn wraps(&self) -> bool {
        self.wrap && self.max_lines >= 2
    }

    /// Fails fast on parameters no layout could honour
    pub fn validate(&self) -> Result<()> {
        let (w, h) = self.canvas_size;
        if w == 0 || h == 0 {
            return Err(BalloonError::invalid(format!(
                "canvas size must be positive, got {w}x{h}"
            )));
        }
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(BalloonError::invalid(format!("{name} must be positive, got {v}")))
            }
        };
        positive("max_panel_fraction", self.max_panel_fraction)?;
        positive("min_font_size", self.min_font_size)?;
        positive("reference_font_size", self.reference_font_size)?;
        positive("measure_width_fraction", self.measure_width_fraction)?;
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(BalloonError::invalid(format!(
                "padding must be finite and non-negative, got {}",
                self.padding
            )));
        }
        if self.max_lines == 0 {
            return Err(BalloonError::invalid("max_lines must be at least 1"));
        }
        if self.sample_resolution < 2 || self.final_sample_resolution < 2 {
            return Err(BalloonError::invalid("sample resolution must be at least 2"));
        }
        for (name, v) in [
            ("tail_length_factor", self.tail_length_factor),
            ("tail_width_factor", self.tail_width_factor),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(BalloonError::invalid(format!(
                    "{name} must be finite and non-negative, got {v}"
                )));
            }
        }
        if let Some(target) = self.tail_target {
            if !(target.x.is_finite() && target.y.is_finite()) {
                return Err(BalloonError::invalid("tail target must be finite"));
            }
        }
        Ok(())
    }
}

/// Constants of the adaptive loop that differ between circle and rect fits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitTuning {
    /// Initial base size as a fraction of the required box
    pub initial_scale: f64,
    /// Growth applied when an iteration found no free space
    pub empty_growth: f64,
    /// Needed-scale band accepted as converged (exclusive)
    pub accept_band: (f64, f64),
    /// First font guess as fractions of the free height and width
    pub font_height_fraction: f64,
    pub font_width_fraction: f64,
    /// Share of the free region the text box may use
    pub margin_scale: f64,
    /// Geometric step of every font shrink
    pub shrink_factor: f64,
    /// Line pitch of fitted text, in line heights
    pub line_spacing: f64,
    /// Line pitch of the first, optimistic measurement
    pub measure_line_spacing: f64,
    /// Sample points per axis per line during verification
    pub verify_density: usize,
    /// Font size used when the final pass found no free space
    pub fallback_font_size: f64,
}

impl FitTuning {
    pub fn circle() -> Self {
        Self {
            initial_scale: 0.55,
            empty_growth: 1.2,
            accept_band: (0.92, 1.08),
            font_height_fraction: 0.65,
            font_width_fraction: 0.40,
            margin_scale: 0.82,
            shrink_factor: 0.92,
            line_spacing: 1.1,
            measure_line_spacing: 1.15,
            verify_density: 6,
            fallback_font_size: 24.0,
        }
    }

    pub fn rect() -> Self {
        Self {
            font_height_fraction: 0.62,
            font_width_fraction: 0.38,
            margin_scale: 0.80,
            ..Self::circle()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.shrink_factor > 0.0 && self.shrink_factor < 1.0) {
            return Err(BalloonError::invalid("shrink_factor must be in (0, 1)"));
        }
        if !(self.empty_growth > 1.0 && self.empty_growth.is_finite()) {
            return Err(BalloonError::invalid("empty_growth must be greater than 1"));
        }
        if self.verify_density < 2 {
            return Err(BalloonError::invalid("verify_density must be at least 2"));
        }
        if !(self.margin_scale > 0.0 && self.initial_scale > 0.0 && self.line_spacing > 0.0) {
            return Err(BalloonError::invalid("fit tuning fractions must be positive"));
        }
        Ok(())
    }
}

impl Default for FitTuning {
    fn default() -> Self {
        Self::circle()
    }
}

/// Parameters of `balloon_fit::fit_circle_bubble`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleFitParams {
    #[serde(flatten)]
    pub base: FitParams,
    pub variant: RadialVariant,
    pub tuning: FitTuning,
}

impl Default for CircleFitParams {
    fn default() -> Self {
        Self {
            base: FitParams::default(),
            variant: RadialVariant::default(),
            tuning: FitTuning::circle(),
        }
    }
}

/// Parameters of `balloon_fit::fit_rect_bubble`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectFitParams {
    #[serde(flatten)]
    pub base: FitParams,
    /// Width over height of the initial base rectangle
    pub aspect_ratio: f64,
    pub tuning: FitTuning,
}

impl Default for RectFitParams {
    fn default() -> Self {
        Self {
            base: FitParams {
                max_iterations: 6,
                seed: 5678,
                final_sample_resolution: 150,
                ..FitParams::default()
            },
            aspect_ratio: 1.1,
            tuning: FitTuning::rect(),
        }
    }
}

/// Drawing toggles for the final render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    /// Leave the canvas transparent instead of painting `paper` first
    pub transparent_canvas: bool,
    /// Paint the base shape and erase every oval, leaving only the gaps
    pub fill_gaps_only: bool,
    pub draw_text: bool,
    /// Draw every oval with its gradient and outline
    pub show_full_ovals: bool,
    /// Ink the oval borders that fall inside the base shape
    pub emphasize_arcs: bool,
    /// Radiating ticks around energetic bubbles
    pub energy_lines: bool,
    pub ink: Color,
    pub text_ink: Color,
    pub paper: Color,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            transparent_canvas: true,
            fill_gaps_only: true,
            draw_text: true,
            show_full_ovals: false,
            emphasize_arcs: true,
            energy_lines: false,
            ink: Color::black(),
            text_ink: Color::black().with_alpha(0.95),
            paper: Color::white(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_aliases_parse() {
        assert_eq!("laugh".parse::<StylePreset>().unwrap(), StylePreset::Energetic);
        assert_eq!("Varied".parse::<StylePreset>().unwrap(), StylePreset::Standard);
        assert!("wobbly".parse::<StylePreset>().is_err());
        assert_eq!("radial6".parse::<RadialVariant>().unwrap(), RadialVariant::Radial6);
        assert!("radial9".parse::<RadialVariant>().is_err());
    }

    #[test]
    fn energetic_preset_crowds_sides() {
        let calm = StyleConfig::from_preset(StylePreset::Standard);
        let loud = StyleConfig::from_preset(StylePreset::Energetic);
        assert!(loud.min_ovals_per_side > calm.min_ovals_per_side);
        assert!(loud.long_side_ovals > calm.long_side_ovals);
        assert!(loud.penetration_scale < calm.penetration_scale);
        assert_eq!(loud.corner_margin, 2.0);
    }

    #[test]
    fn rect_defaults_differ_from_circle_defaults() {
        let rect = RectFitParams::default();
        let circle = CircleFitParams::default();
        assert_eq!(rect.base.max_iterations, 6);
        assert_eq!(circle.base.max_iterations, 5);
        assert_eq!(rect.base.final_sample_resolution, 150);
        assert_eq!(circle.base.final_sample_resolution, 140);
        assert!(rect.tuning.margin_scale < circle.tuning.margin_scale);
    }

    #[test]
    fn validation_catches_bad_params() {
        assert!(FitParams::default().validate().is_ok());

        let zero_canvas = FitParams {
            canvas_size: (0, 300),
            ..FitParams::default()
        };
        assert!(zero_canvas.validate().is_err());

        let no_lines = FitParams {
            max_lines: 0,
            ..FitParams::default()
        };
        assert!(no_lines.validate().is_err());

        let nan_font = FitParams {
            min_font_size: f64::NAN,
            ..FitParams::default()
        };
        assert!(nan_font.validate().is_err());

        let bad_tuning = FitTuning {
            shrink_factor: 1.0,
            ..FitTuning::circle()
        };
        assert!(bad_tuning.validate().is_err());
    }

    #[test]
    fn params_deserialize_partially() {
        let params: CircleFitParams =
            serde_json::from_str(r#"{"padding": 32.0, "wrap": true, "variant": "radial5"}"#)
                .unwrap();
        assert_eq!(params.base.padding, 32.0);
        assert!(params.base.wraps());
        assert_eq!(params.variant, RadialVariant::Radial5);
        assert_eq!(params.base.seed, 1234);
    }
}
