//! Canned response bodies shaped like the live service.

pub mod catalogue;
pub mod datasets;
pub mod datatables;
pub mod errors;
pub mod metadata;
