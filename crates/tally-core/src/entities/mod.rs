//! Entity structs for all Tally domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `tally-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON output and `tly schema`.

mod audit;
mod cart;
mod item;
mod movement;
mod project;
mod reconciliation;
mod tool;
mod transaction;

pub use audit::AuditEntry;
pub use cart::Cart;
pub use item::InventoryItem;
pub use movement::ToolMovement;
pub use project::Project;
pub use reconciliation::{Reconciliation, ReconciliationLine};
pub use tool::Tool;
pub use transaction::InventoryTransaction;
