//! A surface that remembers instead of rasterizing
//!
//! Every call becomes a [`DrawOp`]. Handy for asserting what a render
//! did without pixels, and for exporting a bubble as a vector command
//! list.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::traits::{Surface, SurfaceProvider};
use crate::types::{BitmapData, Color, FontSpec, Paint, StrokeStyle};

/// One recorded surface call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    NewPath,
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CurveTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
    },
    ClosePath,
    Fill {
        paint: Paint,
    },
    Stroke {
        paint: Paint,
        style: StrokeStyle,
    },
    PushClip,
    PopClip,
    Text {
        text: String,
        x: f64,
        y: f64,
        font: FontSpec,
        size: f64,
        paint: Paint,
    },
}

/// In-memory [`Surface`] that logs every call as a [`DrawOp`]
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    background: Option<Color>,
    ops: Vec<DrawOp>,
    clip_depth: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32, background: Option<Color>) -> Self {
        Self {
            width,
            height,
            background,
            ops: Vec::new(),
            clip_depth: 0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Text calls in the order they were made
    pub fn texts(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Text { .. }))
    }

    /// Number of clips pushed and not yet popped
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn new_path(&mut self) {
        self.ops.push(DrawOp::NewPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo { x, y });
    }

    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.ops.push(DrawOp::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        self.ops.push(DrawOp::Arc {
            cx,
            cy,
            radius,
            start,
            end,
        });
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn fill(&mut self, paint: &Paint) -> Result<()> {
        self.ops.push(DrawOp::Fill {
            paint: paint.clone(),
        });
        Ok(())
    }

    fn stroke(&mut self, paint: &Paint, style: &StrokeStyle) -> Result<()> {
        self.ops.push(DrawOp::Stroke {
            paint: paint.clone(),
            style: *style,
        });
        Ok(())
    }

    fn push_clip(&mut self) -> Result<()> {
        self.clip_depth += 1;
        self.ops.push(DrawOp::PushClip);
        Ok(())
    }

    fn pop_clip(&mut self) {
        self.clip_depth = self.clip_depth.saturating_sub(1);
        self.ops.push(DrawOp::PopClip);
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
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font: font.clone(),
            size,
            paint: paint.clone(),
        });
        Ok(())
    }

    /// The recorder never rasterizes; the snapshot is the blank background
    fn snapshot(&self) -> Result<BitmapData> {
        let fill = self.background.unwrap_or(Color::transparent());
        let pixels = (self.width as usize) * (self.height as usize);
        let data = [fill.r, fill.g, fill.b, fill.a].repeat(pixels);
        Ok(BitmapData {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

/// Hands out [`RecordingSurface`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingProvider;

impl SurfaceProvider for RecordingProvider {
    type Surface = RecordingSurface;

    fn create_surface(
        &self,
        width: u32,
        height: u32,
        background: Option<Color>,
    ) -> Result<RecordingSurface> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }
        Ok(RecordingSurface::new(width, height, background))
    }
}
