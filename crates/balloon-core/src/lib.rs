//! Balloon Core: the shared vocabulary of the speech-bubble engine
//!
//! A bubble is produced in three cooperating stages, each living in its
//! own crate but speaking the types defined here:
//!
//! 1. **Perimeter Oval Layout** - ovals bite into a base rectangle or circle
//! 2. **Free-Space Sampling** - a grid finds the interior nobody covered
//! 3. **Adaptive Fitting** - base size and font size converge on the text
//!
//! Drawing and text measurement are collaborators, described by the
//! traits in [`traits`]. The engine never needs pixels to decide a layout,
//! only extents; pixels appear once the plan is handed to a [`Surface`].
//!
//! ## What lives here
//!
//! - [`geometry`] - ovals, base shapes and the free region
//! - [`config`] - style presets, radial variants, fit parameters, draw options
//! - [`recording`] - an in-memory surface that remembers every draw call
//! - [`error`] - the error tree shared by every crate in the workspace

pub mod config;
pub mod error;
pub mod geometry;
pub mod recording;
pub mod traits;

pub use config::{
    CircleFitParams, DrawOptions, FitParams, FitTuning, RadialProfile, RadialVariant,
    RectFitParams, StyleConfig, StylePreset, MIN_TOUCH_PASSES,
};
pub use error::{BalloonError, Result};
pub use geometry::{point_in_any, BaseShape, FreeRegion, Oval, OvalOrigin, Point, Side};
pub use recording::{DrawOp, RecordingProvider, RecordingSurface};
pub use traits::{Exporter, FontProvider, FontRef, Surface, SurfaceProvider, TextMeasurer};
pub use types::*;

/// Plain data passed between the stages and out to callers
pub mod types {
    use serde::{Deserialize, Serialize};

    use crate::geometry::{FreeRegion, Point};
    use crate::recording::DrawOp;

    /// An RGBA color with straight (non-premultiplied) 8-bit channels
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Color {
        pub r: u8,
        pub g: u8,
        pub b: u8,
        pub a: u8,
    }

    impl Color {
        pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
            Self { r, g, b, a }
        }

        pub const fn black() -> Self {
            Self::rgba(0, 0, 0, 255)
        }

        pub const fn white() -> Self {
            Self::rgba(255, 255, 255, 255)
        }

        pub const fn transparent() -> Self {
            Self::rgba(0, 0, 0, 0)
        }

        /// Builds a color from unit-range components, clamping out-of-range input
        pub fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Self {
            let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            Self::rgba(q(r), q(g), q(b), q(a))
        }

        /// Same color with a new opacity in `0.0..=1.0`
        pub fn with_alpha(self, alpha: f64) -> Self {
            Self {
                a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
                ..self
            }
        }
    }

    /// Raster output of a surface: straight RGBA8, row-major, no padding
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BitmapData {
        pub width: u32,
        pub height: u32,
        pub data: Vec<u8>,
    }

    impl BitmapData {
        /// RGBA value at `(x, y)`, or `None` outside the bitmap
        pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
            if x >= self.width || y >= self.height {
                return None;
            }
            let i = ((y * self.width + x) * 4) as usize;
            self.data
                .get(i..i + 4)
                .map(|px| [px[0], px[1], px[2], px[3]])
        }
    }

    /// Font selection as the measurer and the surface understand it
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct FontSpec {
        pub family: String,
        pub bold: bool,
    }

    impl FontSpec {
        pub fn new(family: impl Into<String>, bold: bool) -> Self {
            Self {
                family: family.into(),
                bold,
            }
        }
    }

    impl Default for FontSpec {
        fn default() -> Self {
            Self::new("Sans", true)
        }
    }

    /// Ink box of a run of text, measured without rendering it
    ///
    /// Follows the y-down convention of raster surfaces: `bearing_y` is
    /// the offset from the baseline to the top of the ink and is negative
    /// for anything that rises above the baseline.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
    pub struct TextExtents {
        pub width: f64,
        pub height: f64,
        pub bearing_x: f64,
        pub bearing_y: f64,
        pub advance: f64,
    }

    /// One resolved line of text together with its measured extents
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct LineLayout {
        pub text: String,
        pub extents: TextExtents,
    }

    /// Font size plus the (one or two) lines chosen at that size
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TextLayout {
        pub font_size: f64,
        pub lines: Vec<LineLayout>,
        /// Height used to vertically centre the block on the free region
        pub total_height: f64,
        pub wrapped: bool,
    }

    impl TextLayout {
        pub fn line_texts(&self) -> Vec<String> {
            self.lines.iter().map(|l| l.text.clone()).collect()
        }
    }

    /// Final size of the base shape after fitting
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "lowercase")]
    pub enum ShapeSize {
        Circle { core_radius: f64 },
        Rect { half_w: f64, half_h: f64 },
    }

    /// Everything a caller needs to judge how well a bubble fit
    ///
    /// Degradations are flags, not errors: `capped` means the panel
    /// fraction clamped the base shape, `font_shrunk` means the floor font
    /// size was used, and `text_verified == false` means the sampled text
    /// box still touches an oval or leaves the base shape.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct FitMetadata {
        pub shape_size: ShapeSize,
        pub free_box: FreeRegion,
        pub capped: bool,
        pub font_shrunk: bool,
        pub max_panel_fraction: f64,
        pub wrapped: bool,
        pub lines: Vec<String>,
        pub font_size: f64,
        pub text_verified: bool,
        pub adjust_iterations: u32,
        pub tail_points: Option<[Point; 3]>,
        pub seed: u64,
        pub grow_iterations: u32,
    }

    /// Line ending style for strokes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub enum LineCap {
        #[default]
        Butt,
        Round,
        Square,
    }

    /// Corner style for strokes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub enum LineJoin {
        #[default]
        Miter,
        Round,
        Bevel,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct StrokeStyle {
        pub width: f64,
        pub cap: LineCap,
        pub join: LineJoin,
    }

    impl StrokeStyle {
        pub fn new(width: f64) -> Self {
            Self {
                width,
                cap: LineCap::default(),
                join: LineJoin::default(),
            }
        }

        pub fn round(width: f64) -> Self {
            Self {
                width,
                cap: LineCap::Round,
                join: LineJoin::Round,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct GradientStop {
        pub offset: f64,
        pub color: Color,
    }

    /// What a fill or stroke puts down
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub enum Paint {
        Solid(Color),
        RadialGradient {
            center: Point,
            radius: f64,
            stops: Vec<GradientStop>,
        },
        /// Clears covered pixels to transparent
        Erase,
    }

    /// Anything an [`Exporter`](crate::traits::Exporter) knows how to serialize
    #[derive(Debug, Clone)]
    pub enum RenderOutput {
        Bitmap(BitmapData),
        Metadata(FitMetadata),
        Commands(Vec<DrawOp>),
    }
}
