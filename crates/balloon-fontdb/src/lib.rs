//! Where bubble lettering comes from: font loading and measurement
//!
//! The fitter only ever asks one question of a font: how big is this
//! string at this size? [`Font`] answers it from the real glyph outlines,
//! and [`FontBook`] picks the right face for a [`FontSpec`].
//!
//! ## Memory Management
//!
//! Fonts store their raw data and create a parser view on demand. Nothing
//! is leaked, and TTC collections work by keeping the face index around.

mod book;

pub use book::FontBook;

use std::fs;
use std::path::Path;

use kurbo::{BezPath, Rect, Shape, Vec2};
use read_fonts::TableProvider;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlineGlyphCollection, OutlinePen};
use skrifa::{GlyphId, MetadataProvider};

use balloon_core::{
    error::{FontLoadError, Result},
    traits::{FontRef, TextMeasurer},
    FontSpec, TextExtents,
};

/// A font brought into memory, ready to measure and draw text
pub struct Font {
    data: Vec<u8>,
    face_index: u32,
    units_per_em: u16,
}

impl Font {
    /// Opens a font file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_index(path, 0)
    }

    /// Opens a specific face from a font file (for TTC collections)
    pub fn from_file_index(path: impl AsRef<Path>, face_index: u32) -> Result<Self> {
        let data = fs::read(path.as_ref())
            .map_err(|_| FontLoadError::FileNotFound(path.as_ref().display().to_string()))?;
        Self::from_data_index(data, face_index)
    }

    /// Turns raw font bytes into a usable face
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_index(data, 0)
    }

    /// Turns raw font bytes into a specific face (for TTC collections)
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let font_ref = skrifa::FontRef::from_index(&data, face_index)
            .map_err(|_| FontLoadError::InvalidData)?;

        let units_per_em = font_ref
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or(1000);

        Ok(Font {
            data,
            face_index,
            units_per_em,
        })
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    fn font_ref(&self) -> Result<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(&self.data, self.face_index)
            .map_err(|_| FontLoadError::InvalidData.into())
    }

    /// Finds which glyph draws this character
    pub fn glyph_id(&self, ch: char) -> Option<u32> {
        let font = self.font_ref().ok()?;
        font.charmap().map(ch).map(|gid| gid.to_u32())
    }

    /// Advance of a glyph in font units
    pub fn advance_width(&self, glyph_id: u32) -> f32 {
        self.font_ref()
            .ok()
            .and_then(|font| {
                font.glyph_metrics(Size::unscaled(), LocationRef::default())
                    .advance_width(GlyphId::new(glyph_id))
            })
            .unwrap_or(0.0)
    }

    /// Ink box and advance of `text` laid out on one baseline at `size` px
    ///
    /// Characters without a glyph are measured as `.notdef`. Extents are
    /// y-down: `bearing_y` is negative when ink rises above the baseline.
    /// A run with no ink at all (spaces) has zero width and height but
    /// still reports its advance.
    pub fn measure(&self, text: &str, size: f64) -> Result<TextExtents> {
        let font = self.font_ref()?;
        let px = Size::new(size as f32);
        let charmap = font.charmap();
        let metrics = font.glyph_metrics(px, LocationRef::default());
        let outlines = font.outline_glyphs();

        let mut pen_x = 0.0;
        let mut ink: Option<Rect> = None;
        for ch in text.chars() {
            let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
            let bounds = metrics
                .bounds(gid)
                .map(|b| {
                    Rect::new(
                        f64::from(b.x_min),
                        -f64::from(b.y_max),
                        f64::from(b.x_max),
                        -f64::from(b.y_min),
                    )
                })
                .or_else(|| outline_bounds(&outlines, gid, px));
            if let Some(glyph_ink) = bounds.filter(|r| r.width() > 0.0 || r.height() > 0.0) {
                let placed = glyph_ink + Vec2::new(pen_x, 0.0);
                ink = Some(ink.map_or(placed, |acc| acc.union(placed)));
            }
            pen_x += f64::from(metrics.advance_width(gid).unwrap_or(0.0));
        }

        let extents = match ink {
            Some(r) => TextExtents {
                width: r.width(),
                height: r.height(),
                bearing_x: r.x0,
                bearing_y: r.y0,
                advance: pen_x,
            },
            None => TextExtents {
                advance: pen_x,
                ..TextExtents::default()
            },
        };
        log::trace!(
            "measured {:?} at {size:.1}px: {:.1}x{:.1}",
            text,
            extents.width,
            extents.height
        );
        Ok(extents)
    }

    /// Counts how many glyphs this font contains
    pub fn glyph_count(&self) -> Option<u32> {
        let font = self.font_ref().ok()?;
        font.maxp().ok().map(|maxp| u32::from(maxp.num_glyphs()))
    }
}

impl FontRef for Font {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_id(&self, ch: char) -> Option<u32> {
        self.glyph_id(ch)
    }

    fn advance_width(&self, glyph_id: u32) -> f32 {
        self.advance_width(glyph_id)
    }
}

/// A single face measures every spec the same way
impl TextMeasurer for Font {
    fn measure_text(&self, text: &str, _font: &FontSpec, size: f64) -> Result<TextExtents> {
        self.measure(text, size)
    }
}

/// Ink box from the drawn outline, for faces without stored glyph bounds (CFF)
fn outline_bounds(outlines: &OutlineGlyphCollection<'_>, gid: GlyphId, px: Size) -> Option<Rect> {
    let glyph = outlines.get(gid)?;
    let mut pen = BoundsPen(BezPath::new());
    glyph
        .draw(DrawSettings::unhinted(px, LocationRef::default()), &mut pen)
        .ok()?;
    if pen.0.elements().is_empty() {
        return None;
    }
    let up = pen.0.bounding_box();
    Some(Rect::new(up.x0, -up.y1, up.x1, -up.y0))
}

/// Collects an outline into a kurbo path in font (y-up) space
struct BoundsPen(BezPath);

impl OutlinePen for BoundsPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to((f64::from(x), f64::from(y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to((f64::from(x), f64::from(y)));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.0
            .quad_to((f64::from(cx0), f64::from(cy0)), (f64::from(x), f64::from(y)));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.0.curve_to(
            (f64::from(cx0), f64::from(cy0)),
            (f64::from(cx1), f64::from(cy1)),
            (f64::from(x), f64::from(y)),
        );
    }

    fn close(&mut self) {
        self.0.close_path();
    }
}
