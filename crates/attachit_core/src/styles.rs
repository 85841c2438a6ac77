//! Ordered style name to parameter mapping.

use crate::ORIGINAL_STYLE;
use attachit_error::{BuilderError, BuilderErrorKind};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Named style with its transform parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Style<S> {
    /// Style name, used in keys and filenames.
    name: String,
    /// Parameters handed to the transform.
    params: S,
}

impl<S> Style<S> {
    /// Create a named style.
    pub fn new(name: impl Into<String>, params: S) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Styles in the order they were declared.
///
/// Names are unique: inserting an existing name replaces its parameters
/// without moving it. The `original` name is reserved.
///
/// # Examples
///
/// ```
/// use attachit_core::Styles;
///
/// let mut styles = Styles::new();
/// styles.insert("thumb", "64x64>").unwrap();
/// styles.insert("large", "800x600").unwrap();
/// styles.insert("thumb", "32x32").unwrap();
///
/// let names: Vec<_> = styles.names().collect();
/// assert_eq!(names, ["thumb", "large"]);
/// assert_eq!(styles.get("thumb"), Some(&"32x32"));
/// assert!(styles.insert("original", "1x1").is_err());
/// ```
///
/// Deserialization goes through [`Styles::insert`], so a serialized list
/// obeys the same naming rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styles<S>(Vec<Style<S>>);

impl<S> Default for Styles<S> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<S> Styles<S> {
    /// Empty style set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a style.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is empty or the reserved `original` name.
    pub fn insert(&mut self, name: impl Into<String>, params: S) -> Result<(), BuilderError> {
        let name = name.into();
        if name.is_empty() || name == ORIGINAL_STYLE {
            return Err(BuilderError::new(BuilderErrorKind::InvalidStyleName(name)));
        }

        match self.0.iter_mut().find(|style| style.name == name) {
            Some(existing) => {
                tracing::debug!(style = %name, "Replacing style parameters");
                existing.params = params;
            }
            None => self.0.push(Style::new(name, params)),
        }
        Ok(())
    }

    /// Build from `(name, params)` pairs, validating each name.
    ///
    /// # Errors
    ///
    /// Returns the first naming error, see [`Styles::insert`].
    pub fn from_pairs<N: Into<String>>(
        pairs: impl IntoIterator<Item = (N, S)>,
    ) -> Result<Self, BuilderError> {
        let mut styles = Styles::new();
        for (name, params) in pairs {
            styles.insert(name, params)?;
        }
        Ok(styles)
    }

    /// Parameters of a style by name.
    pub fn get(&self, name: &str) -> Option<&S> {
        self.0
            .iter()
            .find(|style| style.name == name)
            .map(|style| &style.params)
    }

    /// Style names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|style| style.name.as_str())
    }

    /// Iterate styles in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Style<S>> {
        self.0.iter()
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no styles are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a, S> IntoIterator for &'a Styles<S> {
    type Item = &'a Style<S>;
    type IntoIter = std::slice::Iter<'a, Style<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: Serialize> Serialize for Styles<S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, S: Deserialize<'de>> Deserialize<'de> for Styles<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Style<S>>::deserialize(deserializer)?;
        Styles::from_pairs(entries.into_iter().map(|style| (style.name, style.params)))
            .map_err(serde::de::Error::custom)
    }
}
