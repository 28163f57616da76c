//! Ovals, base shapes and free regions
//!
//! All coordinates are canvas pixels with y growing downwards.

use serde::{Deserialize, Serialize};

use crate::error::{BalloonError, Result};
use crate::types::ShapeSize;

pub use kurbo::Point;

/// One side of a rectangular base shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Clockwise from the top, the order sides are laid out in
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }

    /// Unit normal pointing away from the shape's interior
    pub fn outward_normal(self) -> (f64, f64) {
        match self {
            Side::Top => (0.0, -1.0),
            Side::Right => (1.0, 0.0),
            Side::Bottom => (0.0, 1.0),
            Side::Left => (-1.0, 0.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

/// What an oval was generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OvalOrigin {
    Side(Side),
    Radial { index: usize },
}

/// An axis-aligned ellipse biting into the base shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oval {
    pub x: f64,
    pub y: f64,
    pub rx: f64,
    pub ry: f64,
    pub origin: OvalOrigin,
    pub id: Option<usize>,
}

impl Oval {
    pub fn new(x: f64, y: f64, rx: f64, ry: f64, origin: OvalOrigin) -> Self {
        Self {
            x,
            y,
            rx,
            ry,
            origin,
            id: None,
        }
    }

    pub fn with_id(mut self, id: usize) -> Self {
        self.id = Some(id);
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The side this oval was generated for, if it came from a side layout
    pub fn side(&self) -> Option<Side> {
        match self.origin {
            OvalOrigin::Side(side) => Some(side),
            OvalOrigin::Radial { .. } => None,
        }
    }

    /// Ellipse membership: normalized squared distance at most one
    pub fn contains(&self, p: Point) -> bool {
        let dx = (p.x - self.x) / self.rx;
        let dy = (p.y - self.y) / self.ry;
        dx * dx + dy * dy <= 1.0
    }

    /// Both radii are finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.rx.is_finite() && self.ry.is_finite() && self.rx > 0.0 && self.ry > 0.0
    }

    /// Point on the border at parametric angle `theta`
    pub fn point_at(&self, theta: f64) -> Point {
        Point::new(
            self.x + self.rx * theta.cos(),
            self.y + self.ry * theta.sin(),
        )
    }

    /// The smaller radius, used as an effective size by the neighbor passes
    pub fn min_radius(&self) -> f64 {
        self.rx.min(self.ry)
    }

    pub fn to_ellipse(&self) -> kurbo::Ellipse {
        kurbo::Ellipse::new(self.center(), (self.rx, self.ry), 0.0)
    }
}

/// True when `p` is inside at least one oval
pub fn point_in_any(ovals: &[Oval], p: Point) -> bool {
    ovals.iter().any(|oval| oval.contains(p))
}

/// Silhouette the ovals are arranged around; also the sampling domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BaseShape {
    Rect {
        center: Point,
        half_w: f64,
        half_h: f64,
    },
    Circle {
        center: Point,
        radius: f64,
    },
}

impl BaseShape {
    pub fn rect(center: Point, half_w: f64, half_h: f64) -> Self {
        BaseShape::Rect {
            center,
            half_w,
            half_h,
        }
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        BaseShape::Circle { center, radius }
    }

    pub fn center(&self) -> Point {
        match *self {
            BaseShape::Rect { center, .. } | BaseShape::Circle { center, .. } => center,
        }
    }

    /// Half extents of the bounding box
    pub fn half_extents(&self) -> (f64, f64) {
        match *self {
            BaseShape::Rect { half_w, half_h, .. } => (half_w, half_h),
            BaseShape::Circle { radius, .. } => (radius, radius),
        }
    }

    pub fn bounds(&self) -> kurbo::Rect {
        let c = self.center();
        let (hw, hh) = self.half_extents();
        kurbo::Rect::new(c.x - hw, c.y - hh, c.x + hw, c.y + hh)
    }

    pub fn contains(&self, p: Point) -> bool {
        match *self {
            BaseShape::Rect {
                center,
                half_w,
                half_h,
            } => (p.x - center.x).abs() <= half_w && (p.y - center.y).abs() <= half_h,
            BaseShape::Circle { center, radius } => {
                let dx = p.x - center.x;
                let dy = p.y - center.y;
                dx * dx + dy * dy <= radius * radius
            }
        }
    }

    /// Same shape, same center, every dimension multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        match *self {
            BaseShape::Rect {
                center,
                half_w,
                half_h,
            } => BaseShape::rect(center, half_w * factor, half_h * factor),
            BaseShape::Circle { center, radius } => BaseShape::circle(center, radius * factor),
        }
    }

    pub fn size(&self) -> ShapeSize {
        match *self {
            BaseShape::Rect { half_w, half_h, .. } => ShapeSize::Rect { half_w, half_h },
            BaseShape::Circle { radius, .. } => ShapeSize::Circle {
                core_radius: radius,
            },
        }
    }

    /// Rejects non-finite or non-positive dimensions
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let ok = match *self {
            BaseShape::Rect { half_w, half_h, .. } => positive(half_w) && positive(half_h),
            BaseShape::Circle { radius, .. } => positive(radius),
        };
        let c = self.center();
        if ok && c.x.is_finite() && c.y.is_finite() {
            Ok(())
        } else {
            Err(BalloonError::invalid(format!(
                "base shape dimensions must be positive and finite: {self:?}"
            )))
        }
    }
}

/// Bounding box of the sampled interior nobody covered
///
/// A zero width or height is the "nothing free" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeRegion {
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

impl FreeRegion {
    /// The sentinel returned when no grid point was free
    pub fn empty(center: Point) -> Self {
        Self {
            center,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn rect(&self) -> kurbo::Rect {
        kurbo::Rect::from_center_size(self.center, (self.width, self.height))
    }
}
