pub mod audit;
pub mod cart;
pub mod checkout;
pub mod dashboard;
pub mod dispatch;
pub mod init;
pub mod item;
pub mod pricing;
pub mod project;
pub mod receive;
pub mod reconcile;
pub mod reorder;
pub mod report;
pub mod schema;
pub mod shared;
pub mod sync;
pub mod tool;
pub mod txn;
