//! The contracts between the engine and its collaborators
//!
//! The layout engine decides geometry; it never rasterizes and never
//! parses fonts. Whatever does those jobs plugs in here.
//!
//! ## The Players
//!
//! - [`FontRef`] - raw face data and per-glyph metrics
//! - [`TextMeasurer`] - ink extents of a string without drawing it
//! - [`FontProvider`] - resolves a [`FontSpec`] to a face for drawing
//! - [`Surface`] - path construction, paint, native clipping, text
//! - [`SurfaceProvider`] - allocates blank surfaces per render
//! - [`Exporter`] - turns outputs into bytes

use std::sync::Arc;

use crate::error::Result;
use crate::types::*;

/// A loaded font face
///
/// ```ignore
/// struct MyFont {
///     data: Vec<u8>,
/// }
///
/// impl FontRef for MyFont {
///     fn data(&self) -> &[u8] {
///         &self.data
///     }
///
///     fn units_per_em(&self) -> u16 {
///         1000
///     }
///
///     fn glyph_id(&self, ch: char) -> Option<u32> {
///         Some(ch as u32)
///     }
///
///     fn advance_width(&self, _glyph_id: u32) -> f32 {
///         500.0
///     }
/// }
/// ```
pub trait FontRef: Send + Sync {
    /// The raw bytes of the font file
    fn data(&self) -> &[u8];

    /// Face to read inside a collection; 0 for plain font files
    fn face_index(&self) -> u32 {
        0
    }

    /// Design grid size, usually 1000 or 2048
    fn units_per_em(&self) -> u16;

    /// Glyph drawing `ch`, if the face has one
    fn glyph_id(&self, ch: char) -> Option<u32>;

    /// Advance of a glyph in font units
    fn advance_width(&self, glyph_id: u32) -> f32;
}

/// Measures text without rendering it
///
/// This is the only font knowledge the fitter needs: the returned ink box
/// decides font sizes, line breaks and the sampled verification points.
pub trait TextMeasurer {
    fn measure_text(&self, text: &str, font: &FontSpec, size: f64) -> Result<TextExtents>;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure_text(&self, text: &str, font: &FontSpec, size: f64) -> Result<TextExtents> {
        (**self).measure_text(text, font, size)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Arc<T> {
    fn measure_text(&self, text: &str, font: &FontSpec, size: f64) -> Result<TextExtents> {
        (**self).measure_text(text, font, size)
    }
}

/// Hands out faces for drawing text
pub trait FontProvider: Send + Sync {
    fn font(&self, spec: &FontSpec) -> Result<Arc<dyn FontRef>>;
}

/// A 2D drawing target
///
/// Path calls accumulate into a current path; `fill`, `stroke` and
/// `push_clip` consume it. Clipping is native: `push_clip` intersects the
/// active clip with the current path until the matching `pop_clip`.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Discards the current path
    fn new_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    /// Cubic Bézier segment
    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64);

    /// Circular arc, clockwise in y-down space from `start` to `end` radians
    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64);

    fn close_path(&mut self);

    fn fill(&mut self, paint: &Paint) -> Result<()>;

    fn stroke(&mut self, paint: &Paint, style: &StrokeStyle) -> Result<()>;

    fn push_clip(&mut self) -> Result<()>;

    fn pop_clip(&mut self);

    /// Draws `text` with its baseline origin at `(x, y)`
    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font: &FontSpec,
        size: f64,
        paint: &Paint,
    ) -> Result<()>;

    /// Copies the current pixels out as straight RGBA
    fn snapshot(&self) -> Result<BitmapData>;
}

/// Allocates the surface a single render draws on
pub trait SurfaceProvider {
    type Surface: Surface;

    /// A blank `width` x `height` surface, transparent when `background` is `None`
    fn create_surface(
        &self,
        width: u32,
        height: u32,
        background: Option<Color>,
    ) -> Result<Self::Surface>;
}

/// Turns outputs into bytes
pub trait Exporter: Send + Sync {
    /// Who are you?
    fn name(&self) -> &'static str;

    /// Encode the output as bytes
    fn export(&self, output: &RenderOutput) -> Result<Vec<u8>>;

    /// What file extension should be used?
    fn extension(&self) -> &'static str;

    /// What MIME type identifies your format?
    fn mime_type(&self) -> &'static str;
}
