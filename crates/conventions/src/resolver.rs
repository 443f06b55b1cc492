//! Validity resolution: which conventions apply on a given date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use investpro_core::{DomainError, DomainResult};

use crate::convention::Convention;

/// Every active convention whose validity window contains `date`.
///
/// Pure filter, O(n), no tie-break: overlapping active conventions are all
/// returned, and selection policy stays with the caller. Reducing the set
/// here would hide the data-integrity problem an overlap represents.
pub fn resolve_active<'a>(conventions: &'a [Convention], date: NaiveDate) -> Vec<&'a Convention> {
    conventions
        .iter()
        .filter(|convention| convention.is_valid_on(date))
        .collect()
}

/// In-memory convention directory.
///
/// Stands in for the storage boundary: it owns the code-uniqueness
/// constraint the engine itself does not enforce, and serves validity
/// queries over its contents.
#[derive(Debug, Default)]
pub struct ConventionDirectory {
    by_code: BTreeMap<String, Convention>,
}

impl ConventionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a convention; a second convention with the same code is a
    /// conflict.
    pub fn insert(&mut self, convention: Convention) -> DomainResult<()> {
        let code = convention.code().to_string();
        if self.by_code.contains_key(&code) {
            return Err(DomainError::conflict(format!(
                "a convention with code '{code}' already exists"
            )));
        }
        tracing::info!(%code, "convention registered in directory");
        self.by_code.insert(code, convention);
        Ok(())
    }

    pub fn by_code(&self, code: &str) -> Option<&Convention> {
        self.by_code.get(code)
    }

    pub fn by_code_mut(&mut self, code: &str) -> Option<&mut Convention> {
        self.by_code.get_mut(code)
    }

    /// Every active convention in the directory whose window contains
    /// `date`.
    pub fn resolve_active(&self, date: NaiveDate) -> Vec<&Convention> {
        self.by_code
            .values()
            .filter(|convention| convention.is_valid_on(date))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Convention> {
        self.by_code.values()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
