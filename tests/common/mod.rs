#![allow(dead_code)] // Each test binary uses a different subset of the helpers

pub mod builders;
pub mod strategies;
pub mod test_db;

pub use builders::*;
pub use strategies::*;
pub use test_db::*;
