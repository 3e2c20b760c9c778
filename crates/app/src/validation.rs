//! Field-level validation errors shared by the form validators.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError<F> {
    /// The field the message belongs to.
    pub field: F,

    /// Human-readable reason the value was rejected.
    pub message: String,
}

/// Every field error collected while validating one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors<F> {
    errors: SmallVec<[FieldError<F>; 4]>,
}

impl<F> ValidationErrors<F> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            errors: SmallVec::new(),
        }
    }

    pub fn push(&mut self, field: F, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError<F>> {
        self.errors.iter()
    }

    /// Resolve to `value` when nothing was rejected.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field error was recorded.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl<F: PartialEq> ValidationErrors<F> {
    /// First message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &F) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == *field)
            .map(|error| error.message.as_str())
    }

    #[must_use]
    pub fn contains(&self, field: &F) -> bool {
        self.get(field).is_some()
    }
}

impl<F> Default for ValidationErrors<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Display> Display for ValidationErrors<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;

        for error in &self.errors {
            if !first {
                f.write_str("; ")?;
            }

            write!(f, "{}: {}", error.field, error.message)?;

            first = false;
        }

        Ok(())
    }
}

impl<F: Display + fmt::Debug> std::error::Error for ValidationErrors<F> {}

impl<F> IntoIterator for ValidationErrors<F> {
    type Item = FieldError<F>;
    type IntoIter = smallvec::IntoIter<[FieldError<F>; 4]>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<F> FromIterator<FieldError<F>> for ValidationErrors<F> {
    fn from_iter<I: IntoIterator<Item = FieldError<F>>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

/// Trim a free-text input, mapping blank values to `None`.
#[must_use]
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}
