//! Validators: decide whether data already stored at a path may be kept.
//!
//! The initializer consults a [`Validator`] only when a value is present.
//! A rejected value is replaced by the caller's default, which is how both
//! repair and forced clear are expressed.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Predicate type wrapped by [`Validator::Custom`].
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Acceptance rule for existing stored data.
#[derive(Clone, Default)]
pub enum Validator {
    /// Keep any present value. Only a missing value is initialized.
    #[default]
    AlwaysValid,
    /// Reject everything, forcing the default to be written (clear).
    NeverValid,
    /// Keep the value when the predicate returns true.
    Custom(Predicate),
}

impl Validator {
    /// Wrap a closure as a custom validator.
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Validator::Custom(Arc::new(predicate))
    }

    /// Accept only JSON objects.
    pub fn object() -> Self {
        Self::custom(Value::is_object)
    }

    /// Accept only JSON arrays.
    pub fn array() -> Self {
        Self::custom(Value::is_array)
    }

    /// Accept only JSON strings.
    pub fn string() -> Self {
        Self::custom(Value::is_string)
    }

    /// Run the rule against a present value.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Validator::AlwaysValid => true,
            Validator::NeverValid => false,
            Validator::Custom(predicate) => predicate(value),
        }
    }

    /// True for the rule that forces an overwrite.
    pub fn is_clear(&self) -> bool {
        matches!(self, Validator::NeverValid)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::AlwaysValid => f.write_str("AlwaysValid"),
            Validator::NeverValid => f.write_str("NeverValid"),
            Validator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
