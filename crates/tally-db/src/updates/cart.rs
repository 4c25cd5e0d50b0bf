//! Cart update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CartUpdate {
    /// Checkout carts only. The project must be active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    /// Replacement lines as `(item_id, quantity)`. Items left out are taken
    /// off the cart and their stock effect reversed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<(String, i64)>>,
}

impl CartUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.project_id.is_none() && self.notes.is_none() && self.lines.is_none()
    }
}

pub struct CartUpdateBuilder(CartUpdate);

impl CartUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CartUpdate::default())
    }

    #[must_use]
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.0.project_id = Some(project_id.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.0.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn lines(mut self, lines: Vec<(String, i64)>) -> Self {
        self.0.lines = Some(lines);
        self
    }

    #[must_use]
    pub fn build(self) -> CartUpdate {
        self.0
    }
}

impl Default for CartUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
