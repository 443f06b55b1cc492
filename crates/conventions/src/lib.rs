//! `investpro-conventions` — commission agreements and their validity rules.

pub mod convention;
pub mod resolver;

pub use convention::{CalcBase, Convention, ConventionId, ConventionStatus};
pub use resolver::{ConventionDirectory, resolve_active};
