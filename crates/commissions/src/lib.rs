//! `investpro-commissions` — intervention commission calculation.

pub mod commission;
pub mod register;

pub use commission::{Commission, CommissionCalculator, CommissionId};
pub use register::CommissionRegister;
