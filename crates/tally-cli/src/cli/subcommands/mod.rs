pub mod cart;
pub mod item;
pub mod pricing;
pub mod project;
pub mod reconcile;
pub mod report;
pub mod tool;
pub mod txn;

pub use cart::CartCommands;
pub use item::ItemCommands;
pub use pricing::PricingCommands;
pub use project::ProjectCommands;
pub use reconcile::ReconcileCommands;
pub use report::{RangeArgs, ReportCommands};
pub use tool::ToolCommands;
pub use txn::TxnCommands;
