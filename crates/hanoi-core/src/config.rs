//! Rotation configuration
//!
//! Threaded explicitly through the projector, the decision engine and the
//! orchestrators. There is no module-level state.

use crate::errors::{HanoiError, Result};
use crate::rotation::class_table::ClassTable;

pub const DEFAULT_PREFIX: &str = "hanoi";
pub const DEFAULT_CLASS_PROPERTY: &str = "backup:class";
pub const DEFAULT_CONTROL_PROPERTY: &str = "backup:cycle_nr";
pub const DEFAULT_CLASS_COUNT: usize = 5;

/// Settings for one rotation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    /// Tag prefix identifying snapshots owned by this scheme
    pub prefix: String,
    /// User property holding the class label
    pub class_property: String,
    /// User property holding the control number
    pub control_property: String,
    /// Number of retention classes (1..=26)
    pub class_count: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            class_property: DEFAULT_CLASS_PROPERTY.to_string(),
            control_property: DEFAULT_CONTROL_PROPERTY.to_string(),
            class_count: DEFAULT_CLASS_COUNT,
        }
    }
}

impl RotationConfig {
    pub fn new(class_count: usize) -> Self {
        Self {
            class_count,
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_class_property(mut self, name: impl Into<String>) -> Self {
        self.class_property = name.into();
        self
    }

    pub fn with_control_property(mut self, name: impl Into<String>) -> Self {
        self.control_property = name.into();
        self
    }

    /// Validate every field and build the class table
    ///
    /// Called by the orchestrators before any store access so that a bad
    /// configuration can never lead to a destroy.
    ///
    /// # Errors
    ///
    /// `InvalidClassCount` for a count outside 1..=26, `InvalidConfig` for an
    /// empty or malformed prefix or property name.
    pub fn validate(&self) -> Result<ClassTable> {
        if self.prefix.is_empty() || self.prefix.contains('@') || self.prefix.contains('/') {
            return Err(HanoiError::InvalidConfig {
                reason: format!(
                    "prefix {:?} must be non-empty and contain no '@' or '/'",
                    self.prefix
                ),
            });
        }
        for name in [&self.class_property, &self.control_property] {
            // zfs user properties need a ':' in the name
            if !name.contains(':') || name.contains('=') || name.chars().any(char::is_whitespace) {
                return Err(HanoiError::InvalidConfig {
                    reason: format!("property name {:?} is not a valid user property", name),
                });
            }
        }
        if self.class_property == self.control_property {
            return Err(HanoiError::InvalidConfig {
                reason: "class and control properties must differ".to_string(),
            });
        }
        ClassTable::new(self.class_count)
    }

    /// Property names requested from the store for each snapshot
    pub fn requested_properties(&self) -> [&str; 4] {
        [
            "name",
            "creation",
            self.class_property.as_str(),
            self.control_property.as_str(),
        ]
    }

    /// Whether a tag belongs to this scheme
    pub fn owns_tag(&self, tag: &str) -> bool {
        tag.starts_with(&self.prefix)
    }
}
