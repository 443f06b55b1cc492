//! `investpro-expenses` — investment expense records and amount derivation.

pub mod expense;

pub use expense::{Expense, ExpenseId, ExpenseKind, ExpenseStatus, PaymentInfo, Withholdings};
