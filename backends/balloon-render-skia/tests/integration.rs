//! Integration tests for the Skia surface

use std::path::PathBuf;
use std::sync::Arc;

use balloon_core::{
    CircleFitParams, DrawOptions, FontSpec, RectFitParams, Result, Surface, SurfaceProvider,
    TextExtents, TextMeasurer,
};
use balloon_fit::{fit_circle_bubble, fit_rect_bubble};
use balloon_fontdb::FontBook;
use balloon_render_skia::SkiaSurfaceProvider;

/// Fixed-advance measurer, so layout does not depend on installed fonts
struct Mono;

impl TextMeasurer for Mono {
    fn measure_text(&self, text: &str, _font: &FontSpec, size: f64) -> Result<TextExtents> {
        let width = text.chars().count() as f64 * 0.6 * size;
        Ok(TextExtents {
            width,
            height: 0.72 * size,
            bearing_x: 0.0,
            bearing_y: -0.72 * size,
            advance: width,
        })
    }
}

fn system_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.exists())
}

#[test]
fn test_provider_honours_background() {
    let provider = SkiaSurfaceProvider::new();
    let surface = provider
        .create_surface(8, 6, Some(balloon_core::Color::white()))
        .unwrap();
    assert_eq!(surface.width(), 8);
    assert_eq!(surface.height(), 6);
    assert_eq!(surface.snapshot().unwrap().pixel(7, 5), Some([255, 255, 255, 255]));
}

#[test]
fn test_circle_bubble_rasterizes_without_text() {
    let mut params = CircleFitParams::default();
    params.base.canvas_size = (300, 300);
    let options = DrawOptions {
        draw_text: false,
        ..DrawOptions::default()
    };

    let (surface, meta) =
        fit_circle_bubble("BANG", &params, &options, &Mono, &SkiaSurfaceProvider::new()).unwrap();
    let bitmap = surface.snapshot().unwrap();

    assert_eq!(bitmap.data.len(), 300 * 300 * 4);
    assert_eq!(bitmap.pixel(0, 0).unwrap()[3], 0);
    let c = meta.free_box.center;
    assert_eq!(bitmap.pixel(c.x as u32, c.y as u32).unwrap()[3], 255);
}

#[test]
fn test_opaque_rect_bubble_covers_the_canvas() {
    let options = DrawOptions {
        transparent_canvas: false,
        draw_text: false,
        ..DrawOptions::default()
    };
    let (surface, _) = fit_rect_bubble(
        "WHAM",
        &RectFitParams::default(),
        &options,
        &Mono,
        &SkiaSurfaceProvider::new(),
    )
    .unwrap();
    let bitmap = surface.snapshot().unwrap();
    let paper = options.paper;
    assert_eq!(bitmap.pixel(1, 1), Some([paper.r, paper.g, paper.b, paper.a]));
}

#[test]
fn test_text_is_inked_with_a_real_font() {
    let Some(path) = system_font() else {
        eprintln!("no system font found, skipping");
        return;
    };
    let mut book = FontBook::new();
    book.load_file("Sans", true, &path).unwrap();
    let book = Arc::new(book);

    let mut params = CircleFitParams::default();
    params.base.canvas_size = (400, 400);
    let provider = SkiaSurfaceProvider::with_fonts(book.clone());
    let (surface, meta) = fit_circle_bubble(
        "HI",
        &params,
        &DrawOptions::default(),
        book.as_ref(),
        &provider,
    )
    .unwrap();
    let bitmap = surface.snapshot().unwrap();

    let free = meta.free_box.rect();
    let mut dark = 0;
    for y in free.y0.max(0.0) as u32..free.y1.min(399.0) as u32 {
        for x in free.x0.max(0.0) as u32..free.x1.min(399.0) as u32 {
            if let Some([r, _, _, 255]) = bitmap.pixel(x, y) {
                if r < 80 {
                    dark += 1;
                }
            }
        }
    }
    assert!(dark > 20, "expected inked glyphs, found {dark} dark pixels");
}
