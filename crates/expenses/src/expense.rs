use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use investpro_conventions::ConventionId;
use investpro_core::{Amount, DomainError, DomainResult, Entity, Rate, RecordId, RecordMeta};
use investpro_suppliers::{Supplier, SupplierId};

/// Expense identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub RecordId);

impl ExpenseId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Expense kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    Standard,
    Framework,
    NonFramework,
    Specific,
    Amendment,
}

/// Expense status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    Validated,
    InProgress,
    Completed,
    Late,
    Cancelled,
}

/// Statutory and contractual retentions subtracted from the gross payable.
///
/// `None` means "never set"; an explicit zero is a deliberate choice and is
/// preserved across derivation passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withholdings {
    pub vat: Option<Amount>,
    pub third_party_tax: Option<Amount>,
    pub non_resident_tax: Option<Amount>,
    pub guarantee: Option<Amount>,
}

impl Withholdings {
    /// Sum of the four retentions, unset values counting as zero.
    pub fn total(&self) -> Amount {
        [self.vat, self.third_party_tax, self.non_resident_tax, self.guarantee]
            .into_iter()
            .flatten()
            .fold(Amount::ZERO, |acc, withholding| acc + withholding)
    }
}

/// Payment settlement fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub date: Option<NaiveDate>,
    pub reference: Option<String>,
    pub paid: bool,
}

/// Rate applied to the guarantee retention and to the third-party tax
/// retention for non-resident suppliers (10%).
fn statutory_withholding_rate() -> Rate {
    Rate::new(Decimal::new(1000, 2))
}

/// Record: investment expense (one supplier invoice).
///
/// `amount_ht` is the authoritative input; VAT, TTC and the default
/// retentions are derived from it by [`Expense::derive_amounts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    id: ExpenseId,
    invoice_number: String,
    invoice_date: NaiveDate,
    supplier_id: SupplierId,
    convention_id: Option<ConventionId>,
    amount_ht: Option<Amount>,
    vat_rate: Rate,
    amount_vat: Option<Amount>,
    amount_ttc: Option<Amount>,
    withholdings: Withholdings,
    payment: PaymentInfo,
    kind: ExpenseKind,
    status: ExpenseStatus,
    remarks: Option<String>,
    meta: RecordMeta,
}

impl Expense {
    /// Create an expense.
    ///
    /// `vat_rate` defaults to the standard 20.00% when not supplied. Amounts
    /// are not derived here; run [`Expense::derive_amounts`] once the
    /// supplier is at hand.
    pub fn new(
        id: ExpenseId,
        invoice_number: impl Into<String>,
        invoice_date: NaiveDate,
        supplier_id: SupplierId,
        amount_ht: Option<Amount>,
        vat_rate: Option<Rate>,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let invoice_number = invoice_number.into();
        let vat_rate = vat_rate.unwrap_or_else(Rate::standard_vat);

        if invoice_number.trim().is_empty() {
            return Err(DomainError::validation("invoice number cannot be empty"));
        }
        if let Some(amount) = amount_ht {
            amount.ensure_non_negative("amount HT")?;
        }
        vat_rate.ensure_non_negative("vat rate")?;

        tracing::debug!(%id, %invoice_number, "expense created");

        Ok(Self {
            id,
            invoice_number,
            invoice_date,
            supplier_id,
            convention_id: None,
            amount_ht,
            vat_rate,
            amount_vat: None,
            amount_ttc: None,
            withholdings: Withholdings::default(),
            payment: PaymentInfo::default(),
            kind: ExpenseKind::Standard,
            status: ExpenseStatus::InProgress,
            remarks: None,
            meta: RecordMeta::new(at),
        })
    }

    pub fn id_typed(&self) -> ExpenseId {
        self.id
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn invoice_date(&self) -> NaiveDate {
        self.invoice_date
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    pub fn convention_id(&self) -> Option<ConventionId> {
        self.convention_id
    }

    pub fn amount_ht(&self) -> Option<Amount> {
        self.amount_ht
    }

    pub fn vat_rate(&self) -> Rate {
        self.vat_rate
    }

    pub fn amount_vat(&self) -> Option<Amount> {
        self.amount_vat
    }

    pub fn amount_ttc(&self) -> Option<Amount> {
        self.amount_ttc
    }

    pub fn withholdings(&self) -> &Withholdings {
        &self.withholdings
    }

    pub fn payment(&self) -> &PaymentInfo {
        &self.payment
    }

    pub fn kind(&self) -> ExpenseKind {
        self.kind
    }

    pub fn status(&self) -> ExpenseStatus {
        self.status
    }

    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    pub fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    pub fn attach_convention(&mut self, convention_id: ConventionId, at: DateTime<Utc>) {
        self.convention_id = Some(convention_id);
        self.meta.touch(at);
    }

    pub fn set_kind(&mut self, kind: ExpenseKind, at: DateTime<Utc>) {
        self.kind = kind;
        self.meta.touch(at);
    }

    pub fn set_status(&mut self, status: ExpenseStatus, at: DateTime<Utc>) {
        self.status = status;
        self.meta.touch(at);
    }

    pub fn set_remarks(&mut self, remarks: impl Into<String>, at: DateTime<Utc>) {
        self.remarks = Some(remarks.into());
        self.meta.touch(at);
    }

    /// Replace the authoritative HT amount; rerun
    /// [`Expense::derive_amounts`] afterwards.
    pub fn set_amount_ht(&mut self, amount_ht: Amount, at: DateTime<Utc>) -> DomainResult<()> {
        amount_ht.ensure_non_negative("amount HT")?;
        self.amount_ht = Some(amount_ht);
        self.meta.touch(at);
        Ok(())
    }

    pub fn set_vat_rate(&mut self, vat_rate: Rate, at: DateTime<Utc>) -> DomainResult<()> {
        vat_rate.ensure_non_negative("vat rate")?;
        self.vat_rate = vat_rate;
        self.meta.touch(at);
        Ok(())
    }

    /// Explicitly set the VAT retention (zero included).
    pub fn set_withholding_vat(&mut self, amount: Amount, at: DateTime<Utc>) -> DomainResult<()> {
        amount.ensure_non_negative("vat withholding")?;
        self.withholdings.vat = Some(amount);
        self.meta.touch(at);
        Ok(())
    }

    /// Explicitly set the third-party tax retention (zero included).
    ///
    /// For a non-resident supplier the next derivation pass recomputes this
    /// field; the manual value does not survive.
    pub fn set_withholding_third_party_tax(
        &mut self,
        amount: Amount,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        amount.ensure_non_negative("third-party tax withholding")?;
        self.withholdings.third_party_tax = Some(amount);
        self.meta.touch(at);
        Ok(())
    }

    /// Explicitly set the non-resident corporate tax retention.
    pub fn set_withholding_non_resident_tax(
        &mut self,
        amount: Amount,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        amount.ensure_non_negative("non-resident tax withholding")?;
        self.withholdings.non_resident_tax = Some(amount);
        self.meta.touch(at);
        Ok(())
    }

    /// Explicitly set the guarantee retention (zero included).
    ///
    /// Once set, derivation passes never overwrite it.
    pub fn set_withholding_guarantee(
        &mut self,
        amount: Amount,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        amount.ensure_non_negative("guarantee withholding")?;
        self.withholdings.guarantee = Some(amount);
        self.meta.touch(at);
        Ok(())
    }

    /// Derivation pass, run on creation and on every update.
    ///
    /// Total over its input domain: with no HT amount there is nothing to
    /// derive and the dependent fields stay unset. Otherwise:
    ///
    /// - VAT and TTC are recomputed and overwritten every pass.
    /// - The guarantee retention is populated only when never set; an
    ///   explicit value, zero included, survives later passes.
    /// - For a non-resident supplier the third-party tax retention is
    ///   recomputed every pass, overwriting any prior value. This asymmetry
    ///   with the guarantee retention is part of the business rules and is
    ///   pinned by tests.
    pub fn derive_amounts(&mut self, supplier: &Supplier) {
        let Some(amount_ht) = self.amount_ht else {
            return;
        };

        let amount_vat = amount_ht.apply_rate(self.vat_rate);
        self.amount_vat = Some(amount_vat);
        self.amount_ttc = Some(amount_ht + amount_vat);

        if self.withholdings.guarantee.is_none() {
            self.withholdings.guarantee = Some(amount_ht.apply_rate(statutory_withholding_rate()));
        }

        if supplier.non_resident() {
            self.withholdings.third_party_tax =
                Some(amount_ht.apply_rate(statutory_withholding_rate()));
        }

        tracing::debug!(
            invoice_number = %self.invoice_number,
            amount_vat = %amount_vat,
            "expense amounts derived"
        );
    }

    /// TTC minus the four retentions, unset values counting as zero.
    ///
    /// Computed on demand, never stored, and deliberately not floored at
    /// zero: retentions larger than the TTC amount surface as a negative
    /// net.
    pub fn net_payable(&self) -> Amount {
        self.amount_ttc.unwrap_or(Amount::ZERO) - self.withholdings.total()
    }

    /// Settle the expense.
    pub fn record_payment(
        &mut self,
        date: NaiveDate,
        reference: impl Into<String>,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.payment.paid {
            return Err(DomainError::conflict(format!(
                "expense {} is already paid",
                self.invoice_number
            )));
        }
        self.payment = PaymentInfo {
            date: Some(date),
            reference: Some(reference.into()),
            paid: true,
        };
        self.meta.touch(at);
        tracing::info!(invoice_number = %self.invoice_number, "expense paid");
        Ok(())
    }
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
