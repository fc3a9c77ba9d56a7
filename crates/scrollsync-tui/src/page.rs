//! Simulated scroll surface and elements for the preview
//!
//! Geometry is measured in terminal rows: the page is a column of equally
//! tall sections, and the panel the page is drawn into is its viewport.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use scrollsync_core::driver::{Element, Rect, ScrollContext, ScrollSurface, SurfaceProvider};

/// A scrollable page of fixed-height sections
#[derive(Debug)]
pub struct PageSurface {
    offset: Cell<f64>,
    width: Cell<f64>,
    height: Cell<f64>,
    section_height: f64,
    sections: usize,
}

impl PageSurface {
    pub fn new(sections: usize, section_height: f64) -> Self {
        Self {
            offset: Cell::new(0.0),
            width: Cell::new(80.0),
            height: Cell::new(24.0),
            section_height: section_height.max(1.0),
            sections,
        }
    }

    pub fn section_height(&self) -> f64 {
        self.section_height
    }

    pub fn sections(&self) -> usize {
        self.sections
    }

    pub fn max_offset(&self) -> f64 {
        (self.scroll_height() - self.client_height()).max(0.0)
    }

    /// Scroll by `delta` rows, clamped to the page. Returns whether the offset moved.
    pub fn scroll_by(&self, delta: f64) -> bool {
        self.scroll_to(self.offset.get() + delta)
    }

    pub fn scroll_to(&self, offset: f64) -> bool {
        let next = offset.clamp(0.0, self.max_offset());
        if next == self.offset.get() {
            return false;
        }
        self.offset.set(next);
        true
    }

    /// Resize the viewport. Returns whether anything changed.
    pub fn set_viewport(&self, width: f64, height: f64) -> bool {
        if width == self.width.get() && height == self.height.get() {
            return false;
        }
        self.width.set(width.max(1.0));
        self.height.set(height.max(1.0));
        // Keep the offset valid for the new range
        self.scroll_to(self.offset.get());
        true
    }

    /// Layout rect of section `index` relative to the viewport
    pub fn section_rect(&self, index: usize) -> Rect {
        Rect::new(
            0.0,
            index as f64 * self.section_height - self.offset.get(),
            self.width.get(),
            self.section_height,
        )
    }
}

impl ScrollSurface for PageSurface {
    fn scroll_offset(&self) -> f64 {
        self.offset.get()
    }

    fn scroll_height(&self) -> f64 {
        self.sections as f64 * self.section_height
    }

    fn client_height(&self) -> f64 {
        self.height.get()
    }

    fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width.get(), self.height.get())
    }
}

/// One page section; records the style variables written to it
#[derive(Debug)]
pub struct VirtualSection {
    index: usize,
    page: Rc<PageSurface>,
    styles: RefCell<BTreeMap<String, String>>,
    writes: Cell<u64>,
}

impl VirtualSection {
    pub fn new(index: usize, page: Rc<PageSurface>) -> Self {
        Self {
            index,
            page,
            styles: RefCell::new(BTreeMap::new()),
            writes: Cell::new(0),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn style(&self, name: &str) -> Option<String> {
        self.styles.borrow().get(name).cloned()
    }

    /// Numeric style value, if present and numeric
    pub fn number(&self, name: &str) -> Option<f64> {
        self.styles.borrow().get(name).and_then(|v| v.parse().ok())
    }

    pub fn styles(&self) -> Vec<(String, String)> {
        self.styles
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Total writes received
    pub fn writes(&self) -> u64 {
        self.writes.get()
    }
}

impl Element for VirtualSection {
    fn set_style_property(&self, name: &str, value: &str) {
        self.styles.borrow_mut().insert(name.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
    }

    fn bounding_rect(&self) -> Rect {
        self.page.section_rect(self.index)
    }
}

/// Resolves the page context to the simulated page; containers have no surface
pub struct PageProvider {
    page: Rc<PageSurface>,
}

impl PageProvider {
    pub fn new(page: Rc<PageSurface>) -> Self {
        Self { page }
    }
}

impl SurfaceProvider for PageProvider {
    fn surface(&self, context: &ScrollContext) -> Option<Rc<dyn ScrollSurface>> {
        match context {
            ScrollContext::Page => Some(self.page.clone() as Rc<dyn ScrollSurface>),
            ScrollContext::Container(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollsync_core::driver::ContainerId;

    #[test]
    fn test_scroll_clamps_to_page() {
        let page = PageSurface::new(4, 10.0);
        page.set_viewport(40.0, 20.0);
        assert_eq!(page.max_offset(), 20.0);

        assert!(page.scroll_by(15.0));
        assert!(page.scroll_by(100.0));
        assert_eq!(page.scroll_offset(), 20.0);
        assert!(!page.scroll_by(1.0));
        assert!(page.scroll_by(-100.0));
        assert_eq!(page.scroll_offset(), 0.0);
    }

    #[test]
    fn test_section_rect_follows_offset() {
        let page = Rc::new(PageSurface::new(4, 10.0));
        page.set_viewport(40.0, 20.0);
        let section = VirtualSection::new(2, page.clone());
        assert_eq!(section.bounding_rect().y, 20.0);

        page.scroll_to(5.0);
        assert_eq!(section.bounding_rect().y, 15.0);
        assert!((section.bounding_rect().intersection_ratio(&page.viewport()) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_shrinking_viewport_keeps_offset_valid() {
        let page = PageSurface::new(3, 10.0);
        page.set_viewport(40.0, 10.0);
        page.scroll_to(20.0);
        page.set_viewport(40.0, 25.0);
        assert_eq!(page.scroll_offset(), 5.0);
    }

    #[test]
    fn test_section_records_writes() {
        let page = Rc::new(PageSurface::new(1, 10.0));
        let section = VirtualSection::new(0, page);
        section.set_style_property("--opacity", "0.5");
        section.set_style_property("--opacity", "1");
        assert_eq!(section.number("--opacity"), Some(1.0));
        assert_eq!(section.writes(), 2);
    }

    #[test]
    fn test_provider_only_serves_page() {
        let provider = PageProvider::new(Rc::new(PageSurface::new(1, 10.0)));
        assert!(provider.surface(&ScrollContext::Page).is_some());
        assert!(provider.surface(&ScrollContext::Container(ContainerId(1))).is_none());
    }
}
