use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use investpro_conventions::{CalcBase, Convention, ConventionId};
use investpro_core::{
    Amount, Clock, DomainError, DomainResult, Entity, Rate, RecordId, RecordMeta,
};
use investpro_expenses::{Expense, ExpenseId};

/// Commission identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommissionId(pub RecordId);

impl CommissionId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CommissionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Record: commission owed for one expense under one convention.
///
/// Rates and base type are copied from the convention at calculation time;
/// the record never re-reads the convention, so later rate changes cannot
/// retroactively alter an existing commission. There are no mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    id: CommissionId,
    expense_id: ExpenseId,
    convention_id: ConventionId,
    calc_date: NaiveDate,
    base_type: CalcBase,
    base_amount: Amount,
    commission_rate: Rate,
    vat_rate: Rate,
    amount_ht: Amount,
    amount_vat: Amount,
    amount_ttc: Amount,
    remarks: Option<String>,
    meta: RecordMeta,
}

impl Commission {
    pub fn id_typed(&self) -> CommissionId {
        self.id
    }

    pub fn expense_id(&self) -> ExpenseId {
        self.expense_id
    }

    pub fn convention_id(&self) -> ConventionId {
        self.convention_id
    }

    pub fn calc_date(&self) -> NaiveDate {
        self.calc_date
    }

    pub fn base_type(&self) -> CalcBase {
        self.base_type
    }

    pub fn base_amount(&self) -> Amount {
        self.base_amount
    }

    pub fn commission_rate(&self) -> Rate {
        self.commission_rate
    }

    pub fn vat_rate(&self) -> Rate {
        self.vat_rate
    }

    pub fn amount_ht(&self) -> Amount {
        self.amount_ht
    }

    pub fn amount_vat(&self) -> Amount {
        self.amount_vat
    }

    pub fn amount_ttc(&self) -> Amount {
        self.amount_ttc
    }

    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    pub fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

impl Entity for Commission {
    type Id = CommissionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Commission calculator.
///
/// Stateless per call; holds only the injected clock used to default the
/// calculation date. Enforcing at-most-one commission per expense is the
/// register's job, not this component's.
pub struct CommissionCalculator {
    clock: Arc<dyn Clock>,
}

impl CommissionCalculator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Calculate the commission for `expense` under `convention`, dating it
    /// from the injected clock.
    pub fn calculate(
        &self,
        expense: &Expense,
        convention: &Convention,
    ) -> DomainResult<Commission> {
        self.calculate_on(expense, convention, self.clock.today())
    }

    /// Calculate the commission with an explicit calculation date.
    ///
    /// The expense's amounts must already be derived; a missing base amount
    /// is the only failure of this component.
    pub fn calculate_on(
        &self,
        expense: &Expense,
        convention: &Convention,
        calc_date: NaiveDate,
    ) -> DomainResult<Commission> {
        let base_type = convention.calc_base();
        let base_amount = match base_type {
            CalcBase::Ttc => expense.amount_ttc(),
            // `Other` has no distinct meaning in the rules; it selects the
            // HT amount, same as `Ht`.
            CalcBase::Ht | CalcBase::Other => expense.amount_ht(),
        }
        .ok_or_else(|| {
            DomainError::validation(format!(
                "expense {} has no derived amounts to base a commission on",
                expense.invoice_number()
            ))
        })?;

        let commission_rate = convention.commission_rate();
        let vat_rate = convention.vat_rate();

        let amount_ht = base_amount.apply_rate(commission_rate);
        let amount_vat = amount_ht.apply_rate(vat_rate);
        // Both addends are already at the fixed scale; the sum needs no
        // further rounding.
        let amount_ttc = amount_ht + amount_vat;

        tracing::info!(
            invoice_number = %expense.invoice_number(),
            convention = %convention.code(),
            base = %base_amount,
            commission_ht = %amount_ht,
            commission_ttc = %amount_ttc,
            "commission calculated"
        );

        Ok(Commission {
            id: CommissionId::new(RecordId::new()),
            expense_id: expense.id_typed(),
            convention_id: convention.id_typed(),
            calc_date,
            base_type,
            base_amount,
            commission_rate,
            vat_rate,
            amount_ht,
            amount_vat,
            amount_ttc,
            remarks: None,
            meta: RecordMeta::new(self.clock.now()),
        })
    }
}
