use serde::{Deserialize, Serialize};

/// A single configuration field inside a monthly override.
///
/// Serialized as an optional value: an absent or null field is
/// [`FieldOverride::Default`], anything else is [`FieldOverride::Override`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<T>", into = "Option<T>")]
#[serde(bound(serialize = "T: Clone + Serialize", deserialize = "T: Deserialize<'de>"))]
pub enum FieldOverride<T> {
    /// Use the annual default for this field.
    #[default]
    Default,
    /// Replace the annual default with this value.
    Override(T),
}

impl<T> FieldOverride<T> {
    /// Picks the override value, or `default` when the field is not overridden.
    pub fn resolve(
        self,
        default: T,
    ) -> T {
        match self {
            Self::Default => default,
            Self::Override(value) => value,
        }
    }
}

impl<T> From<Option<T>> for FieldOverride<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Default, Self::Override)
    }
}

impl<T> From<FieldOverride<T>> for Option<T> {
    fn from(value: FieldOverride<T>) -> Self {
        match value {
            FieldOverride::Default => None,
            FieldOverride::Override(value) => Some(value),
        }
    }
}
