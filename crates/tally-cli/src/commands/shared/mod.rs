pub mod actor;
pub mod limit;
pub mod lookup;
pub mod parse;
