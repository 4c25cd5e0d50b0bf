//! Reconciliation update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciled_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    /// Replacement counts as `(item_id, counted)`. Items left out are
    /// dropped from the reconciliation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<Vec<(String, i64)>>,
}

impl ReconciliationUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.reconciled_by.is_none() && self.notes.is_none() && self.counts.is_none()
    }
}

pub struct ReconciliationUpdateBuilder(ReconciliationUpdate);

impl ReconciliationUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ReconciliationUpdate::default())
    }

    #[must_use]
    pub fn reconciled_by(mut self, reconciled_by: impl Into<String>) -> Self {
        self.0.reconciled_by = Some(reconciled_by.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.0.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn counts(mut self, counts: Vec<(String, i64)>) -> Self {
        self.0.counts = Some(counts);
        self
    }

    #[must_use]
    pub fn build(self) -> ReconciliationUpdate {
        self.0
    }
}

impl Default for ReconciliationUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
