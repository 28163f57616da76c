//! Balloon - comic speech bubbles that grow around their text
//!
//! A bubble is built in three stages:
//! 1. Perimeter oval layout around a rectangle or circle
//! 2. Free-space sampling of what the ovals left uncovered
//! 3. Adaptive fitting of the base size and font until the text fits
//!
//! Then it is drawn through any [`Surface`](traits::Surface): the
//! recording surface for tests and vector export, or tiny-skia for pixels.
//!
//! # Example
//!
//! ```ignore
//! use balloon::prelude::*;
//!
//! let mut fonts = FontBook::new();
//! fonts.load_file("Sans", true, "DejaVuSans-Bold.ttf")?;
//! let fonts = Arc::new(fonts);
//!
//! let (surface, meta) = fit_circle_bubble(
//!     "KA-BOOM!",
//!     &CircleFitParams::default(),
//!     &DrawOptions::default(),
//!     fonts.as_ref(),
//!     &SkiaSurfaceProvider::with_fonts(fonts.clone()),
//! )?;
//! save_surface(&surface, "boom.png")?;
//! assert!(meta.text_verified);
//! ```
//!
//! # Feature Flags
//!
//! - `fontdb`: real font loading and measurement
//! - `render-skia`: tiny-skia raster surface
//! - `export`: PNG and JSON export
//! - `full`: all of the above

pub use balloon_core::{config, error, geometry, recording, traits, types};
pub use balloon_fit::{fit_circle_bubble, fit_rect_bubble, plan_circle_bubble, plan_rect_bubble};

pub use balloon_fit as fit;
pub use balloon_layout as layout;

#[cfg(feature = "fontdb")]
pub use balloon_fontdb as fontdb;

#[cfg(feature = "render-skia")]
pub use balloon_render_skia as render_skia;

#[cfg(feature = "export")]
pub use balloon_export as export;

/// Common imports for typical usage
pub mod prelude {
    pub use std::sync::Arc;

    pub use balloon_core::{
        error::{BalloonError, Result},
        traits::{Exporter, FontProvider, FontRef, Surface, SurfaceProvider, TextMeasurer},
        types::{Color, FitMetadata, FontSpec, RenderOutput, TextExtents},
        CircleFitParams, DrawOptions, FitParams, RadialVariant, RecordingProvider, RectFitParams,
        StylePreset,
    };
    pub use balloon_fit::{fit_circle_bubble, fit_rect_bubble, BubblePlan};

    #[cfg(feature = "export")]
    pub use balloon_export::{save_surface, JsonExporter, PngExporter};
    #[cfg(feature = "fontdb")]
    pub use balloon_fontdb::{Font, FontBook};
    #[cfg(feature = "render-skia")]
    pub use balloon_render_skia::SkiaSurfaceProvider;
}
