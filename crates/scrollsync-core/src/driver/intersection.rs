use std::collections::HashMap;
use std::rc::Rc;

use super::element::{Element, Rect};

struct Observed {
    element: Rc<dyn Element>,
    ratio: f64,
    /// Threshold bucket of the last delivered ratio; `None` until the first delivery
    bucket: Option<usize>,
}

/// Viewport-intersection tracker owned by a scroll driver
///
/// Ratios are delivered the way a platform intersection observer delivers
/// them: a new value is recorded only when it crosses one of the threshold
/// buckets, so dense thresholds read smooth and sparse ones read stepped.
pub struct IntersectionTracker {
    thresholds: Vec<f64>,
    observed: HashMap<String, Observed>,
}

impl IntersectionTracker {
    pub fn new(mut thresholds: Vec<f64>) -> Self {
        thresholds.retain(|t| t.is_finite());
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();
        Self {
            thresholds,
            observed: HashMap::new(),
        }
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn observe(&mut self, id: &str, element: Rc<dyn Element>) {
        self.observed.insert(
            id.to_string(),
            Observed {
                element,
                ratio: 0.0,
                bucket: None,
            },
        );
    }

    pub fn unobserve(&mut self, id: &str) -> bool {
        self.observed.remove(id).is_some()
    }

    pub fn is_observing(&self, id: &str) -> bool {
        self.observed.contains_key(id)
    }

    /// Last delivered ratio
    pub fn ratio(&self, id: &str) -> Option<f64> {
        self.observed.get(id).map(|o| o.ratio)
    }

    /// Record a ratio reported by the host's own observer. Returns whether
    /// the stored value changed.
    pub fn record(&mut self, id: &str, ratio: f64) -> bool {
        let bucket = self.bucket_of(ratio);
        let Some(observed) = self.observed.get_mut(id) else {
            return false;
        };
        let ratio = ratio.clamp(0.0, 1.0);
        observed.bucket = Some(bucket);
        if observed.ratio == ratio {
            return false;
        }
        observed.ratio = ratio;
        true
    }

    /// Measure every observed element against `viewport` and deliver the
    /// ratios that crossed a threshold. Returns whether anything was delivered.
    pub fn sample(&mut self, viewport: &Rect) -> bool {
        let mut delivered = false;
        for observed in self.observed.values_mut() {
            delivered |= deliver(&self.thresholds, observed, viewport);
        }
        delivered
    }

    /// Measure a single observed element; used right after it starts being observed
    pub fn measure(&mut self, id: &str, viewport: &Rect) -> bool {
        match self.observed.get_mut(id) {
            Some(observed) => deliver(&self.thresholds, observed, viewport),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    pub fn clear(&mut self) {
        self.observed.clear();
    }

    fn bucket_of(&self, ratio: f64) -> usize {
        bucket_index(&self.thresholds, ratio)
    }
}

fn deliver(thresholds: &[f64], observed: &mut Observed, viewport: &Rect) -> bool {
    let ratio = observed.element.bounding_rect().intersection_ratio(viewport);
    let bucket = bucket_index(thresholds, ratio);
    if observed.bucket == Some(bucket) {
        return false;
    }
    observed.bucket = Some(bucket);
    if observed.ratio == ratio {
        return false;
    }
    observed.ratio = ratio;
    true
}

/// Number of thresholds at or below `ratio`
#[inline]
fn bucket_index(thresholds: &[f64], ratio: f64) -> usize {
    thresholds.partition_point(|t| *t <= ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Placed {
        rect: Cell<Rect>,
    }

    impl Element for Placed {
        fn set_style_property(&self, _name: &str, _value: &str) {}

        fn bounding_rect(&self) -> Rect {
            self.rect.get()
        }
    }

    fn tenths() -> Vec<f64> {
        (0..=10).map(|i| i as f64 / 10.0).collect()
    }

    #[test]
    fn test_thresholds_are_sorted_and_deduped() {
        let tracker = IntersectionTracker::new(vec![1.0, 0.5, 0.0, 0.5, f64::NAN]);
        assert_eq!(tracker.thresholds(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_sample_delivers_only_on_bucket_crossing() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        let element = Rc::new(Placed {
            rect: Cell::new(Rect::new(0.0, 45.0, 100.0, 100.0)),
        });
        let mut tracker = IntersectionTracker::new(tenths());
        tracker.observe("a", element.clone());

        // First measurement always delivers: 55% visible
        assert!(tracker.sample(&viewport));
        assert!((tracker.ratio("a").unwrap() - 0.55).abs() < 1e-9);

        // 58% stays in the same bucket
        element.rect.set(Rect::new(0.0, 42.0, 100.0, 100.0));
        assert!(!tracker.sample(&viewport));
        assert!((tracker.ratio("a").unwrap() - 0.55).abs() < 1e-9);

        // 70% crosses 0.6
        element.rect.set(Rect::new(0.0, 30.0, 100.0, 100.0));
        assert!(tracker.sample(&viewport));
        assert!((tracker.ratio("a").unwrap() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_record_and_unobserve() {
        let mut tracker = IntersectionTracker::new(tenths());
        let element = Rc::new(Placed {
            rect: Cell::new(Rect::default()),
        });
        assert!(!tracker.record("a", 0.5), "unobserved ids are ignored");

        tracker.observe("a", element);
        assert!(tracker.record("a", 0.5));
        assert!(!tracker.record("a", 0.5));
        assert!(tracker.record("a", 2.0));
        assert_eq!(tracker.ratio("a"), Some(1.0));

        assert!(tracker.unobserve("a"));
        assert!(tracker.is_empty());
        assert_eq!(tracker.ratio("a"), None);
    }
}
