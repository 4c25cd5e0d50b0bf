//! ID prefix constants.
//!
//! Every entity ID is `{prefix}-{8 hex chars}`, generated in SQL by
//! `TallyDb::generate_id`.

pub const PREFIX_ITEM: &str = "itm";
pub const PREFIX_TOOL: &str = "tol";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_TRANSACTION: &str = "txn";
pub const PREFIX_MOVEMENT: &str = "mov";
pub const PREFIX_RECONCILIATION: &str = "rec";
pub const PREFIX_CART: &str = "crt";
pub const PREFIX_AUDIT: &str = "aud";

/// All prefixes, for exhaustive tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_ITEM,
    PREFIX_TOOL,
    PREFIX_PROJECT,
    PREFIX_TRANSACTION,
    PREFIX_MOVEMENT,
    PREFIX_RECONCILIATION,
    PREFIX_CART,
    PREFIX_AUDIT,
];
