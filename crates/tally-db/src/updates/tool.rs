//! Tool update builder.
//!
//! Location changes go through `move_tool` so every move is recorded.

use serde::Serialize;
use tally_core::enums::ToolStatus;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ToolStatus>,
}

impl ToolUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.description.is_none()
            && self.tool_type.is_none()
            && self.status.is_none()
    }
}

pub struct ToolUpdateBuilder(ToolUpdate);

impl ToolUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ToolUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn sku(mut self, sku: Option<String>) -> Self {
        self.0.sku = Some(sku);
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn tool_type(mut self, tool_type: Option<String>) -> Self {
        self.0.tool_type = Some(tool_type);
        self
    }

    #[must_use]
    pub fn status(mut self, status: ToolStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn build(self) -> ToolUpdate {
        self.0
    }
}

impl Default for ToolUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
