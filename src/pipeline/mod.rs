// src/pipeline/mod.rs

pub mod aggregate;
pub mod completeness;
pub mod driver;
pub mod ledger;
pub mod processed;
