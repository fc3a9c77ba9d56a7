use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::element::{ScrollContext, SurfaceProvider};
use super::scroll::{FrameReport, ScrollDriver};
use crate::config::DriverConfig;

struct Entry {
    driver: ScrollDriver,
    ref_count: usize,
}

/// Reference-counted registry of scroll drivers, one per scroll context
///
/// Consumers acquire a driver with `get_driver` and hand it back with
/// `release_driver`; the driver is created on the first acquire and destroyed
/// on the last release, so two consumers of the same context always share
/// one scroll listener and one frame pass.
pub struct DriverFactory {
    provider: Rc<dyn SurfaceProvider>,
    motion: watch::Receiver<bool>,
    config: DriverConfig,
    drivers: RefCell<HashMap<ScrollContext, Entry>>,
}

impl DriverFactory {
    pub fn new(
        provider: Rc<dyn SurfaceProvider>,
        motion: watch::Receiver<bool>,
        config: DriverConfig,
    ) -> Self {
        Self {
            provider,
            motion,
            config,
            drivers: RefCell::new(HashMap::new()),
        }
    }

    /// Acquire the driver for `context`, creating it on first use
    pub fn get_driver(&self, context: ScrollContext) -> ScrollDriver {
        let mut drivers = self.drivers.borrow_mut();
        let entry = drivers.entry(context).or_insert_with(|| {
            debug!(context = %context, "Creating scroll driver");
            Entry {
                driver: ScrollDriver::new(
                    context,
                    self.provider.surface(&context),
                    self.motion.clone(),
                    self.config.clone(),
                ),
                ref_count: 0,
            }
        });
        entry.ref_count += 1;
        entry.driver.clone()
    }

    /// Release one reference; the last release destroys the driver
    pub fn release_driver(&self, context: ScrollContext) {
        let released = {
            let mut drivers = self.drivers.borrow_mut();
            let Some(entry) = drivers.get_mut(&context) else {
                warn!(context = %context, "Released a scroll driver that was never acquired");
                return;
            };
            entry.ref_count -= 1;
            if entry.ref_count > 0 {
                return;
            }
            drivers.remove(&context).map(|entry| entry.driver)
        };
        if let Some(driver) = released {
            driver.destroy();
            debug!(context = %context, "Released last reference to scroll driver");
        }
    }

    pub fn has_driver(&self, context: ScrollContext) -> bool {
        self.drivers.borrow().contains_key(&context)
    }

    /// Current reference count, 0 when no driver exists
    pub fn driver_ref_count(&self, context: ScrollContext) -> usize {
        self.drivers
            .borrow()
            .get(&context)
            .map(|entry| entry.ref_count)
            .unwrap_or(0)
    }

    /// Run one frame on every live driver
    pub fn frame(&self) -> FrameReport {
        // Snapshot so element writes can acquire or release drivers
        let drivers: Vec<ScrollDriver> = self
            .drivers
            .borrow()
            .values()
            .map(|entry| entry.driver.clone())
            .collect();
        drivers
            .iter()
            .fold(FrameReport::idle(), |report, driver| report.merge(driver.frame()))
    }

    pub fn len(&self) -> usize {
        self.drivers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.borrow().is_empty()
    }

    /// Destroy every driver regardless of reference counts
    pub fn shutdown(&self) {
        let drained: Vec<ScrollDriver> = self
            .drivers
            .borrow_mut()
            .drain()
            .map(|(_, entry)| entry.driver)
            .collect();
        for driver in drained {
            driver.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::element::{ContainerId, Headless, Rect, ScrollSurface};

    struct FixedSurface;

    impl ScrollSurface for FixedSurface {
        fn scroll_offset(&self) -> f64 {
            0.0
        }

        fn scroll_height(&self) -> f64 {
            1000.0
        }

        fn client_height(&self) -> f64 {
            100.0
        }

        fn viewport(&self) -> Rect {
            Rect::new(0.0, 0.0, 100.0, 100.0)
        }
    }

    struct Everywhere;

    impl SurfaceProvider for Everywhere {
        fn surface(&self, _context: &ScrollContext) -> Option<Rc<dyn ScrollSurface>> {
            Some(Rc::new(FixedSurface))
        }
    }

    fn factory() -> (DriverFactory, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        (
            DriverFactory::new(Rc::new(Everywhere), rx, DriverConfig::default()),
            tx,
        )
    }

    #[test]
    fn test_same_context_shares_driver() {
        let (factory, _tx) = factory();
        let a = factory.get_driver(ScrollContext::Page);
        let b = factory.get_driver(ScrollContext::Page);
        a.frame();
        assert!(!b.frame().applied);
        // Both handles see the same state
        a.set_extension("k", 1.0);
        assert!(b.frame().applied);
        assert_eq!(factory.len(), 1);
        assert_eq!(factory.driver_ref_count(ScrollContext::Page), 2);
    }

    #[test]
    fn test_contexts_are_isolated() {
        let (factory, _tx) = factory();
        let container = ScrollContext::Container(ContainerId(1));
        factory.get_driver(ScrollContext::Page);
        factory.get_driver(container);

        assert_eq!(factory.len(), 2);
        factory.release_driver(container);
        assert!(!factory.has_driver(container));
        assert!(factory.has_driver(ScrollContext::Page));
    }

    #[test]
    fn test_reference_counting_destroys_on_last_release() {
        let (factory, _tx) = factory();
        let context = ScrollContext::Container(ContainerId(9));
        let n = 4;
        let mut handles = Vec::new();
        for _ in 0..n {
            handles.push(factory.get_driver(context));
        }
        for _ in 0..n - 1 {
            factory.release_driver(context);
        }
        assert!(factory.has_driver(context));
        assert_eq!(factory.driver_ref_count(context), 1);

        factory.release_driver(context);
        assert!(!factory.has_driver(context));
        assert_eq!(factory.driver_ref_count(context), 0);
        assert!(handles.iter().all(ScrollDriver::is_destroyed));
    }

    #[test]
    fn test_reacquire_after_release_builds_fresh_driver() {
        let (factory, _tx) = factory();
        let first = factory.get_driver(ScrollContext::Page);
        factory.release_driver(ScrollContext::Page);
        let second = factory.get_driver(ScrollContext::Page);

        assert!(first.is_destroyed());
        assert!(!second.is_destroyed());
    }

    #[test]
    fn test_unbalanced_release_is_harmless() {
        let (factory, _tx) = factory();
        factory.release_driver(ScrollContext::Page);
        assert!(!factory.has_driver(ScrollContext::Page));
    }

    #[test]
    fn test_headless_provider_yields_inert_drivers() {
        let (_tx, rx) = watch::channel(false);
        let factory = DriverFactory::new(Rc::new(Headless), rx, DriverConfig::default());
        let driver = factory.get_driver(ScrollContext::Page);
        assert!(driver.is_inert());
        assert_eq!(factory.frame(), FrameReport::idle());
    }

    #[test]
    fn test_shutdown_destroys_all() {
        let (factory, _tx) = factory();
        let page = factory.get_driver(ScrollContext::Page);
        factory.get_driver(ScrollContext::Container(ContainerId(2)));
        factory.shutdown();
        assert!(factory.is_empty());
        assert!(page.is_destroyed());
    }
}
