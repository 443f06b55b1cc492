//! Commission register: the one-commission-per-expense boundary.

use std::collections::HashMap;

use investpro_core::{DomainError, DomainResult};
use investpro_expenses::ExpenseId;

use crate::commission::Commission;

/// In-memory commission register.
///
/// Stands in for the storage boundary's uniqueness constraint: an expense
/// has at most one commission. The calculator itself is stateless and has
/// no defense against being invoked twice; this register is where the
/// second invocation is rejected.
#[derive(Debug, Default)]
pub struct CommissionRegister {
    by_expense: HashMap<ExpenseId, Commission>,
}

impl CommissionRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a commission; a second commission for the same expense is a
    /// conflict.
    pub fn record(&mut self, commission: Commission) -> DomainResult<()> {
        let expense_id = commission.expense_id();
        if self.by_expense.contains_key(&expense_id) {
            return Err(DomainError::conflict(format!(
                "expense {expense_id} already has a commission"
            )));
        }
        tracing::info!(%expense_id, "commission recorded");
        self.by_expense.insert(expense_id, commission);
        Ok(())
    }

    pub fn by_expense(&self, expense_id: ExpenseId) -> Option<&Commission> {
        self.by_expense.get(&expense_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Commission> {
        self.by_expense.values()
    }

    pub fn len(&self) -> usize {
        self.by_expense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_expense.is_empty()
    }
}
