//! Skia Surface - bubble rasterization via tiny-skia
//!
//! The fitter describes a bubble as paths, paints and clips; this backend
//! turns those calls into anti-aliased pixels on a [`Pixmap`].
//!
//! ## How the pieces map
//!
//! - The current path is a kurbo [`BezPath`], converted to a tiny-skia
//!   path only when something consumes it
//! - [`Paint::Erase`] becomes the `Clear` blend mode, so erased ovals are
//!   truly transparent rather than painted white
//! - Clips are a stack of coverage [`Mask`]s; each push intersects with
//!   the one below it
//! - Text is drawn from glyph outlines, flipped from the font's y-up
//!   space onto the canvas

use std::f64::consts::TAU;
use std::sync::Arc;

use kurbo::{BezPath, PathEl, Point, Vec2};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::MetadataProvider;
use tiny_skia::{FillRule, Mask, Pixmap, Transform};

use balloon_core::{
    error::{RenderError, Result},
    traits::{FontProvider, Surface, SurfaceProvider},
    BitmapData, Color, FontSpec, LineCap, LineJoin, Paint, StrokeStyle,
};

/// Flattening tolerance for arcs, in pixels
const ARC_TOLERANCE: f64 = 0.1;

/// A tiny-skia pixmap behind the [`Surface`] contract
pub struct SkiaSurface {
    pixmap: Pixmap,
    path: BezPath,
    clips: Vec<Mask>,
    fonts: Option<Arc<dyn FontProvider>>,
}

impl SkiaSurface {
    /// A blank surface, transparent unless `background` is given
    pub fn new(width: u32, height: u32, background: Option<Color>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapCreationFailed)?;
        if let Some(bg) = background {
            pixmap.fill(skia_color(bg));
        }
        Ok(Self {
            pixmap,
            path: BezPath::new(),
            clips: Vec::new(),
            fonts: None,
        })
    }

    /// Lets `draw_text` resolve faces through `fonts`
    pub fn with_fonts(mut self, fonts: Arc<dyn FontProvider>) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    fn has_current_point(&self) -> bool {
        !matches!(self.path.elements().last(), None | Some(PathEl::ClosePath))
    }

    /// Line and curve calls with no current point start a subpath first
    fn ensure_started(&mut self, x: f64, y: f64) {
        if !self.has_current_point() {
            self.path.move_to((x, y));
        }
    }

    /// Hands the current path over to a consumer, leaving it empty
    fn take_path(&mut self) -> Result<Option<tiny_skia::Path>> {
        let path = std::mem::take(&mut self.path);
        build_path(&path)
    }

    fn fill_skia_path(&mut self, path: &tiny_skia::Path, paint: &Paint) {
        let skia_paint = skia_paint(paint);
        self.pixmap.fill_path(
            path,
            &skia_paint,
            FillRule::Winding,
            Transform::identity(),
            self.clips.last(),
        );
    }
}

impl Surface for SkiaSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn new_path(&mut self) {
        self.path = BezPath::new();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.has_current_point() {
            self.path.line_to((x, y));
        } else {
            self.path.move_to((x, y));
        }
    }

    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.ensure_started(x1, y1);
        self.path.curve_to((x1, y1), (x2, y2), (x, y));
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        let mut sweep = end - start;
        if sweep < 0.0 {
            sweep = sweep.rem_euclid(TAU);
        }
        let arc = kurbo::Arc {
            center: Point::new(cx, cy),
            radii: Vec2::new(radius, radius),
            start_angle: start,
            sweep_angle: sweep,
            x_rotation: 0.0,
        };
        let from = Point::new(cx + radius * start.cos(), cy + radius * start.sin());
        if self.has_current_point() {
            self.path.line_to(from);
        } else {
            self.path.move_to(from);
        }
        arc.to_cubic_beziers(ARC_TOLERANCE, |p1, p2, p| {
            self.path.curve_to(p1, p2, p);
        });
    }

    fn close_path(&mut self) {
        if self.has_current_point() {
            self.path.close_path();
        }
    }

    fn fill(&mut self, paint: &Paint) -> Result<()> {
        if let Some(path) = self.take_path()? {
            self.fill_skia_path(&path, paint);
        }
        Ok(())
    }

    fn stroke(&mut self, paint: &Paint, style: &StrokeStyle) -> Result<()> {
        let Some(path) = self.take_path()? else {
            return Ok(());
        };
        let stroke = tiny_skia::Stroke {
            width: style.width as f32,
            line_cap: match style.cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match style.join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            ..Default::default()
        };
        self.pixmap.stroke_path(
            &path,
            &skia_paint(paint),
            &stroke,
            Transform::identity(),
            self.clips.last(),
        );
        Ok(())
    }

    fn push_clip(&mut self) -> Result<()> {
        let path = self.take_path()?;
        let mask = match (self.clips.last(), path) {
            (Some(outer), Some(path)) => {
                let mut mask = outer.clone();
                mask.intersect_path(&path, FillRule::Winding, true, Transform::identity());
                mask
            },
            (None, Some(path)) => {
                let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())
                    .ok_or(RenderError::MaskCreationFailed)?;
                mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
                mask
            },
            // an empty path clips everything away
            (_, None) => Mask::new(self.pixmap.width(), self.pixmap.height())
                .ok_or(RenderError::MaskCreationFailed)?,
        };
        self.clips.push(mask);
        Ok(())
    }

    fn pop_clip(&mut self) {
        if self.clips.pop().is_none() {
            log::warn!("pop_clip without a matching push_clip");
        }
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font: &FontSpec,
        size: f64,
        paint: &Paint,
    ) -> Result<()> {
        let provider = self.fonts.as_ref().ok_or(RenderError::FontUnavailable)?;
        let face = provider.font(font)?;
        let font_ref = skrifa::FontRef::from_index(face.data(), face.face_index())
            .map_err(|_| RenderError::InvalidFont)?;

        let px = Size::new(size as f32);
        let charmap = font_ref.charmap();
        let metrics = font_ref.glyph_metrics(px, LocationRef::default());
        let outlines = font_ref.outline_glyphs();

        let mut glyphs = BezPath::new();
        let mut pen_x = x;
        for ch in text.chars() {
            let gid = charmap.map(ch).unwrap_or(skrifa::GlyphId::NOTDEF);
            if let Some(glyph) = outlines.get(gid) {
                let mut pen = PathPen {
                    path: &mut glyphs,
                    origin: Point::new(pen_x, y),
                };
                if glyph
                    .draw(DrawSettings::unhinted(px, LocationRef::default()), &mut pen)
                    .is_err()
                {
                    log::warn!("Skia: outline of glyph {} could not be drawn", gid.to_u32());
                }
            }
            pen_x += f64::from(metrics.advance_width(gid).unwrap_or(0.0));
        }

        if let Some(path) = build_path(&glyphs)? {
            self.fill_skia_path(&path, paint);
        }
        Ok(())
    }

    fn snapshot(&self) -> Result<BitmapData> {
        let data = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Ok(BitmapData {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            data,
        })
    }
}

/// Hands out [`SkiaSurface`]s, optionally wired to a font source
#[derive(Clone, Default)]
pub struct SkiaSurfaceProvider {
    fonts: Option<Arc<dyn FontProvider>>,
}

impl SkiaSurfaceProvider {
    /// Largest accepted canvas side
    pub const MAX_SIZE: u32 = 65535;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fonts(fonts: Arc<dyn FontProvider>) -> Self {
        Self { fonts: Some(fonts) }
    }
}

impl SurfaceProvider for SkiaSurfaceProvider {
    type Surface = SkiaSurface;

    fn create_surface(
        &self,
        width: u32,
        height: u32,
        background: Option<Color>,
    ) -> Result<SkiaSurface> {
        if width > Self::MAX_SIZE || height > Self::MAX_SIZE {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }
        let surface = SkiaSurface::new(width, height, background)?;
        log::debug!("Skia: new {width}x{height} surface");
        Ok(match &self.fonts {
            Some(fonts) => surface.with_fonts(fonts.clone()),
            None => surface,
        })
    }
}

fn skia_color(c: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn skia_paint(paint: &Paint) -> tiny_skia::Paint<'static> {
    let mut out = tiny_skia::Paint {
        anti_alias: true,
        ..Default::default()
    };
    match paint {
        Paint::Solid(color) => out.set_color(skia_color(*color)),
        Paint::RadialGradient {
            center,
            radius,
            stops,
        } => {
            let c = tiny_skia::Point::from_xy(center.x as f32, center.y as f32);
            let skia_stops = stops
                .iter()
                .map(|s| tiny_skia::GradientStop::new(s.offset as f32, skia_color(s.color)))
                .collect();
            match tiny_skia::RadialGradient::new(
                c,
                c,
                *radius as f32,
                skia_stops,
                tiny_skia::SpreadMode::Pad,
                Transform::identity(),
            ) {
                Some(shader) => out.shader = shader,
                // degenerate gradients (one stop, zero radius) paint their last colour
                None => {
                    if let Some(last) = stops.last() {
                        out.set_color(skia_color(last.color));
                    }
                },
            }
        },
        Paint::Erase => {
            out.set_color(tiny_skia::Color::BLACK);
            out.blend_mode = tiny_skia::BlendMode::Clear;
        },
    }
    out
}

/// `None` for a path with nothing to draw, an error when the segments
/// cannot become a tiny-skia path (non-finite coordinates)
fn build_path(path: &BezPath) -> Result<Option<tiny_skia::Path>> {
    let has_segments = path
        .elements()
        .iter()
        .any(|el| !matches!(el, PathEl::MoveTo(_) | PathEl::ClosePath));
    if !has_segments {
        return Ok(None);
    }
    match to_skia_path(path) {
        Some(path) => Ok(Some(path)),
        None => Err(RenderError::PathBuildingFailed.into()),
    }
}

/// Converts a kurbo path into tiny-skia's native format
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = tiny_skia::PathBuilder::new();
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(ctrl, end) => {
                builder.quad_to(ctrl.x as f32, ctrl.y as f32, end.x as f32, end.y as f32)
            },
            PathEl::CurveTo(c1, c2, end) => builder.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                end.x as f32,
                end.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

/// Bridge between skrifa's outline commands and a canvas-space kurbo path
///
/// Fonts are y-up, canvases are y-down: every point is flipped around the
/// baseline and shifted to the glyph origin.
struct PathPen<'a> {
    path: &'a mut BezPath,
    origin: Point,
}

impl PathPen<'_> {
    fn map(&self, x: f32, y: f32) -> Point {
        Point::new(self.origin.x + f64::from(x), self.origin.y - f64::from(y))
    }
}

impl OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let (c, p) = (self.map(cx0, cy0), self.map(x, y));
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let (c0, c1, p) = (self.map(cx0, cy0), self.map(cx1, cy1), self.map(x, y));
        self.path.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balloon_core::{BalloonError, GradientStop};

    fn square(surface: &mut SkiaSurface, x0: f64, y0: f64, x1: f64, y1: f64) {
        surface.move_to(x0, y0);
        surface.line_to(x1, y0);
        surface.line_to(x1, y1);
        surface.line_to(x0, y1);
        surface.close_path();
    }

    fn alpha_at(surface: &SkiaSurface, x: u32, y: u32) -> u8 {
        surface.snapshot().unwrap().pixel(x, y).unwrap()[3]
    }

    #[test]
    fn test_zero_sized_surfaces_are_rejected() {
        assert!(matches!(
            SkiaSurface::new(0, 10, None),
            Err(BalloonError::Render(RenderError::InvalidDimensions { .. }))
        ));
        assert!(SkiaSurfaceProvider::new()
            .create_surface(SkiaSurfaceProvider::MAX_SIZE + 1, 4, None)
            .is_err());
    }

    #[test]
    fn test_background_is_painted() {
        let surface = SkiaSurface::new(4, 4, Some(Color::rgba(255, 242, 230, 255))).unwrap();
        let bitmap = surface.snapshot().unwrap();
        assert_eq!(bitmap.pixel(2, 2), Some([255, 242, 230, 255]));

        let clear = SkiaSurface::new(4, 4, None).unwrap();
        assert_eq!(alpha_at(&clear, 0, 0), 0);
    }

    #[test]
    fn test_fill_consumes_the_path() {
        let mut surface = SkiaSurface::new(20, 20, None).unwrap();
        square(&mut surface, 2.0, 2.0, 10.0, 10.0);
        surface.fill(&Paint::Solid(Color::black())).unwrap();
        assert_eq!(alpha_at(&surface, 5, 5), 255);
        assert_eq!(alpha_at(&surface, 15, 15), 0);
        assert!(surface.path.elements().is_empty());
    }

    #[test]
    fn test_erase_punches_a_transparent_hole() {
        let mut surface = SkiaSurface::new(20, 20, Some(Color::white())).unwrap();
        surface.move_to(14.0, 10.0);
        surface.arc(10.0, 10.0, 4.0, 0.0, TAU);
        surface.close_path();
        surface.fill(&Paint::Erase).unwrap();
        assert_eq!(alpha_at(&surface, 10, 10), 0);
        assert_eq!(alpha_at(&surface, 1, 1), 255);
    }

    #[test]
    fn test_clip_limits_fills_until_popped() {
        let mut surface = SkiaSurface::new(20, 20, None).unwrap();
        square(&mut surface, 0.0, 0.0, 10.0, 20.0);
        surface.push_clip().unwrap();

        square(&mut surface, 0.0, 0.0, 20.0, 20.0);
        surface.fill(&Paint::Solid(Color::black())).unwrap();
        assert_eq!(alpha_at(&surface, 5, 10), 255);
        assert_eq!(alpha_at(&surface, 15, 10), 0);

        surface.pop_clip();
        square(&mut surface, 0.0, 0.0, 20.0, 20.0);
        surface.fill(&Paint::Solid(Color::black())).unwrap();
        assert_eq!(alpha_at(&surface, 15, 10), 255);
    }

    #[test]
    fn test_nested_clips_intersect() {
        let mut surface = SkiaSurface::new(20, 20, None).unwrap();
        square(&mut surface, 0.0, 0.0, 12.0, 20.0);
        surface.push_clip().unwrap();
        square(&mut surface, 8.0, 0.0, 20.0, 20.0);
        surface.push_clip().unwrap();

        square(&mut surface, 0.0, 0.0, 20.0, 20.0);
        surface.fill(&Paint::Solid(Color::black())).unwrap();
        assert_eq!(alpha_at(&surface, 10, 10), 255);
        assert_eq!(alpha_at(&surface, 4, 10), 0);
        assert_eq!(alpha_at(&surface, 16, 10), 0);
    }

    #[test]
    fn test_stroke_follows_the_line() {
        let mut surface = SkiaSurface::new(20, 20, None).unwrap();
        surface.move_to(2.0, 10.5);
        surface.line_to(18.0, 10.5);
        let style = StrokeStyle {
            width: 3.0,
            cap: LineCap::Round,
            join: LineJoin::Round,
        };
        surface.stroke(&Paint::Solid(Color::black()), &style).unwrap();
        assert_eq!(alpha_at(&surface, 10, 10), 255);
        assert_eq!(alpha_at(&surface, 10, 3), 0);
    }

    #[test]
    fn test_radial_gradient_runs_from_centre_outwards() {
        let mut surface = SkiaSurface::new(40, 40, None).unwrap();
        square(&mut surface, 0.0, 0.0, 40.0, 40.0);
        let paint = Paint::RadialGradient {
            center: Point::new(20.0, 20.0),
            radius: 20.0,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: Color::white(),
                },
                GradientStop {
                    offset: 1.0,
                    color: Color::black(),
                },
            ],
        };
        surface.fill(&paint).unwrap();
        let bitmap = surface.snapshot().unwrap();
        let centre = bitmap.pixel(20, 20).unwrap();
        let corner = bitmap.pixel(0, 0).unwrap();
        assert!(centre[0] > 200);
        assert!(corner[0] < 30);
    }

    #[test]
    fn test_text_needs_a_font_provider() {
        let mut surface = SkiaSurface::new(10, 10, None).unwrap();
        let err = surface
            .draw_text("A", 0.0, 8.0, &FontSpec::default(), 8.0, &Paint::Solid(Color::black()))
            .unwrap_err();
        assert!(matches!(err, BalloonError::Render(RenderError::FontUnavailable)));
    }

    #[test]
    fn test_non_finite_paths_are_rejected() {
        let mut surface = SkiaSurface::new(10, 10, None).unwrap();
        surface.move_to(1.0, 1.0);
        surface.line_to(f64::NAN, 4.0);
        surface.line_to(4.0, 4.0);
        surface.close_path();
        let err = surface.fill(&Paint::Solid(Color::black())).unwrap_err();
        assert!(matches!(err, BalloonError::Render(RenderError::PathBuildingFailed)));

        surface.move_to(1.0, 1.0);
        surface.line_to(f64::INFINITY, 1.0);
        let err = surface.stroke(&Paint::Solid(Color::black()), &StrokeStyle::new(1.0));
        assert!(err.is_err());
    }

    #[test]
    fn test_lone_move_to_draws_nothing() {
        let mut surface = SkiaSurface::new(10, 10, None).unwrap();
        surface.move_to(5.0, 5.0);
        surface.close_path();
        surface.fill(&Paint::Solid(Color::black())).unwrap();
        assert_eq!(alpha_at(&surface, 5, 5), 0);
    }

    #[test]
    fn test_pen_flips_onto_the_baseline() {
        let mut path = BezPath::new();
        let pen = PathPen {
            path: &mut path,
            origin: Point::new(10.0, 50.0),
        };
        assert_eq!(pen.map(5.0, 20.0), Point::new(15.0, 30.0));
    }
}
