use crate::errors::{HanoiError, Result};
use crate::model::class::ALPHABET_LEN;
use crate::model::{ClassLabel, RetentionClass};

/// First `n` class labels in table order
///
/// # Errors
///
/// Returns `InvalidClassCount` unless `1 <= n <= 26`.
pub fn classes(n: usize) -> Result<Vec<ClassLabel>> {
    if n == 0 || n > ALPHABET_LEN {
        return Err(HanoiError::InvalidClassCount { count: n });
    }
    Ok((0..n).filter_map(ClassLabel::from_ordinal).collect())
}

/// Validated, ordered set of retention classes
///
/// Never empty. Class 0 is the first position scanned and is reused every
/// second rotation; the last two classes are reused least often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTable {
    classes: Vec<RetentionClass>,
}

impl ClassTable {
    /// # Errors
    ///
    /// Returns `InvalidClassCount` unless `1 <= n <= 26`.
    pub fn new(n: usize) -> Result<Self> {
        let classes = classes(n)?
            .into_iter()
            .enumerate()
            .map(|(ordinal, label)| RetentionClass { ordinal, label })
            .collect();
        Ok(Self { classes })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Always false; kept for the `len` convention
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, ptr: usize) -> Option<RetentionClass> {
        self.classes.get(ptr).copied()
    }

    pub fn label(&self, ptr: usize) -> Option<ClassLabel> {
        self.get(ptr).map(|c| c.label)
    }

    /// Last class of the table; an empty history starts here
    pub fn most_junior(&self) -> RetentionClass {
        self.classes[self.classes.len() - 1]
    }

    /// Modulus of the control-number cycle, `2^(len-1)`
    pub fn control_modulus(&self) -> u32 {
        1u32 << (self.classes.len() - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RetentionClass> {
        self.classes.iter()
    }
}
