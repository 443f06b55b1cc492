//! `investpro-suppliers` — supplier registry records.

pub mod supplier;

pub use supplier::{ContactInfo, Supplier, SupplierId, TaxIdentifiers};
