//! Status enums, transaction kinds, entity types and actions for Tally.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ToolStatus
// ---------------------------------------------------------------------------

/// Availability of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Available,
    InUse,
    Maintenance,
}

impl ToolStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in_use",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

/// Status of a painting project.
///
/// ```text
/// active    → completed | archived
/// completed → active | archived
/// archived  → active
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
    Archived,
}

impl ProjectStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Completed, Self::Archived],
            Self::Completed => &[Self::Active, Self::Archived],
            Self::Archived => &[Self::Active],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Kind of inventory ledger entry.
///
/// `checkout` and `withdraw` consume stock, `restock` and `receive` add it.
/// `adjustment` records a reconciliation delta; its direction lives in the
/// audit detail, not in the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Checkout,
    Restock,
    Receive,
    Withdraw,
    Adjustment,
}

impl TransactionType {
    /// Sign applied to the quantity when replaying the ledger.
    ///
    /// Returns `None` for adjustments, which are not replayed.
    #[must_use]
    pub const fn stock_sign(self) -> Option<i64> {
        match self {
            Self::Restock | Self::Receive => Some(1),
            Self::Checkout | Self::Withdraw => Some(-1),
            Self::Adjustment => None,
        }
    }

    /// Whether this entry counts as project spend in expense reports.
    #[must_use]
    pub const fn is_consumption(self) -> bool {
        matches!(self, Self::Checkout | Self::Withdraw)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checkout => "checkout",
            Self::Restock => "restock",
            Self::Receive => "receive",
            Self::Withdraw => "withdraw",
            Self::Adjustment => "adjustment",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MovementType
// ---------------------------------------------------------------------------

/// Kind of tool movement between locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Checkout,
    Return,
    Transfer,
}

impl MovementType {
    /// Classify a move given the shop location name.
    #[must_use]
    pub fn classify(from: &str, to: &str, shop: &str) -> Self {
        if to == shop {
            Self::Return
        } else if from == shop {
            Self::Checkout
        } else {
            Self::Transfer
        }
    }

    /// Tool status implied by this movement.
    #[must_use]
    pub const fn resulting_status(self) -> ToolStatus {
        match self {
            Self::Return => ToolStatus::Available,
            Self::Checkout | Self::Transfer => ToolStatus::InUse,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checkout => "checkout",
            Self::Return => "return",
            Self::Transfer => "transfer",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
    StatusChanged,
    StockChanged,
    Moved,
    Reconciled,
    Voided,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::StatusChanged => "status_changed",
            Self::StockChanged => "stock_changed",
            Self::Moved => "moved",
            Self::Reconciled => "reconciled",
            Self::Voided => "voided",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CartKind
// ---------------------------------------------------------------------------

/// Direction of a cart: stock leaving for a project or arriving from a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CartKind {
    Checkout,
    Receive,
}

impl CartKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checkout => "checkout",
            Self::Receive => "receive",
        }
    }

    /// Ledger type written for each line of a cart of this kind.
    #[must_use]
    pub const fn transaction_type(self) -> TransactionType {
        match self {
            Self::Checkout => TransactionType::Checkout,
            Self::Receive => TransactionType::Restock,
        }
    }
}

impl fmt::Display for CartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity in the system, used in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Item,
    Tool,
    Project,
    Transaction,
    Movement,
    Reconciliation,
    Cart,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Tool => "tool",
            Self::Project => "project",
            Self::Transaction => "transaction",
            Self::Movement => "movement",
            Self::Reconciliation => "reconciliation",
            Self::Cart => "cart",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
