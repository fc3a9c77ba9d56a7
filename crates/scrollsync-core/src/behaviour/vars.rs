use std::fmt;

/// A single style variable value
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            StyleValue::Text(_) => None,
        }
    }
}

/// Stringified form used both for diffing and for the element write.
/// Whole numbers print without a fractional part (`1`, not `1.0`).
impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // -0 and 0 must diff equal
            StyleValue::Number(n) if *n == 0.0 => f.write_str("0"),
            StyleValue::Number(n) if n.is_finite() => write!(f, "{}", n),
            // NaN and infinities never reach an element
            StyleValue::Number(_) => f.write_str("0"),
            StyleValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

/// Ordered set of named style variables returned by a behaviour
///
/// Setting a name that is already present replaces its value in place, so
/// iteration order is the order names were first set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleVars {
    entries: Vec<(String, StyleValue)>,
}

impl StyleVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a variable; returns the previous value when the name collided
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<StyleValue>) -> Option<StyleValue> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&StyleValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut StyleValue)> {
        self.entries.iter_mut().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold `other` into `self`, later values winning.
    /// Returns the names that were already present.
    pub fn merge(&mut self, other: StyleVars) -> Vec<String> {
        let mut collisions = Vec::new();
        for (name, value) in other.entries {
            if self.set(name.clone(), value).is_some() {
                collisions.push(name);
            }
        }
        collisions
    }
}

impl<N: Into<String>, V: Into<StyleValue>> FromIterator<(N, V)> for StyleVars {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut vars = StyleVars::new();
        for (name, value) in iter {
            vars.set(name, value);
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display_matches_css_text() {
        assert_eq!(StyleValue::Number(1.0).to_string(), "1");
        assert_eq!(StyleValue::Number(0.75).to_string(), "0.75");
        assert_eq!(StyleValue::Number(0.0).to_string(), "0");
        assert_eq!(StyleValue::Number(-12.5).to_string(), "-12.5");
        assert_eq!(StyleValue::Number(f64::NAN).to_string(), "0");
        assert_eq!(StyleValue::from("translateY(4px)").to_string(), "translateY(4px)");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut vars = StyleVars::new().with("--a", 1.0).with("--b", 2.0);
        let previous = vars.set("--a", 3.0);
        assert_eq!(previous, Some(StyleValue::Number(1.0)));
        let names: Vec<&str> = vars.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["--a", "--b"]);
        assert_eq!(vars.get("--a"), Some(&StyleValue::Number(3.0)));
    }

    #[test]
    fn test_merge_reports_collisions_and_last_wins() {
        let mut base = StyleVars::new().with("--opacity", 0.2).with("--x", 1.0);
        let collisions = base.merge(StyleVars::new().with("--opacity", 0.9).with("--y", 2.0));
        assert_eq!(collisions, vec!["--opacity".to_string()]);
        assert_eq!(base.get("--opacity"), Some(&StyleValue::Number(0.9)));
        assert_eq!(base.len(), 3);
    }
}
