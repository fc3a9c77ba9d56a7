//! Platform seams: styled elements, scroll surfaces and the provider that
//! binds a scroll context to its surface.

use std::fmt;
use std::rc::Rc;

/// Axis-aligned rectangle in viewport coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > x && bottom > y {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Fraction of `self` that lies inside `viewport`, 0 to 1
    pub fn intersection_ratio(&self, viewport: &Rect) -> f64 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        self.intersection(viewport)
            .map(|overlap| (overlap.area() / area).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    /// How far `self` has travelled through `viewport`: 0 when its top edge
    /// sits on the viewport's bottom edge, 1 when its bottom edge leaves the top
    pub fn travel_progress(&self, viewport: &Rect) -> f64 {
        let span = viewport.height + self.height;
        if span <= 0.0 {
            return 0.0;
        }
        ((viewport.bottom() - self.y) / span).clamp(0.0, 1.0)
    }
}

/// A rendered element whose style surface a driver writes to
pub trait Element {
    /// Write one style variable
    fn set_style_property(&self, name: &str, value: &str);

    /// Current bounds relative to the viewport of its scroll context
    ///
    /// For elements the driver's own tracker observes, this is also read from
    /// inside `on_scroll` and `on_resize` and must not call back into that driver.
    fn bounding_rect(&self) -> Rect {
        Rect::default()
    }
}

/// A scrollable context (the page or a container)
pub trait ScrollSurface {
    /// Current scroll offset along the block axis
    fn scroll_offset(&self) -> f64;
    /// Total scrollable content length
    fn scroll_height(&self) -> f64;
    /// Visible length of the context
    fn client_height(&self) -> f64;
    /// Visible region, in the same coordinates as `Element::bounding_rect`
    fn viewport(&self) -> Rect;
}

/// Opaque container identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u64);

/// The scroll surface a driver is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollContext {
    /// The page-level context
    #[default]
    Page,
    Container(ContainerId),
}

impl fmt::Display for ScrollContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollContext::Page => f.write_str("page"),
            ScrollContext::Container(id) => write!(f, "container#{}", id.0),
        }
    }
}

/// Resolves a scroll context to its surface
///
/// Returning `None` means there is no interactive surface (headless or
/// pre-render code paths); drivers built without a surface are inert.
pub trait SurfaceProvider {
    fn surface(&self, context: &ScrollContext) -> Option<Rc<dyn ScrollSurface>>;
}

/// Provider for environments without any scroll or paint surface
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl SurfaceProvider for Headless {
    fn surface(&self, _context: &ScrollContext) -> Option<Rc<dyn ScrollSurface>> {
        None
    }
}
