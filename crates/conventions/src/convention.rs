use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use investpro_core::{DomainError, DomainResult, Entity, Rate, RecordId, RecordMeta};

/// Convention identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConventionId(pub RecordId);

impl ConventionId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ConventionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Base used for the commission formula.
///
/// `Other` selects the HT amount, same as `Ht`; the original rules never gave
/// it a distinct meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CalcBase {
    Ht,
    Ttc,
    Other,
}

/// Convention status lifecycle.
///
/// `Validated` and `Cancelled` lock the record against further field updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConventionStatus {
    Draft,
    Submitted,
    Validated,
    Cancelled,
}

/// Record: Convention — a dated, rate-bearing commission agreement.
///
/// The computation engine only reads conventions; creation, updates and the
/// status lifecycle belong to the owning boundary (`ConventionDirectory` and
/// the methods below).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Convention {
    id: ConventionId,
    code: String,
    label: String,
    commission_rate: Rate,
    calc_base: CalcBase,
    vat_rate: Rate,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    status: ConventionStatus,
    locked: bool,
    lock_reason: Option<String>,
    meta: RecordMeta,
}

fn ensure_window(start_date: NaiveDate, end_date: Option<NaiveDate>) -> DomainResult<()> {
    if let Some(end) = end_date {
        if end < start_date {
            return Err(DomainError::validation(format!(
                "end date {end} precedes start date {start_date}"
            )));
        }
    }
    Ok(())
}

impl Convention {
    /// Create a convention in `Draft` status.
    ///
    /// `vat_rate` defaults to the standard 20.00% when not supplied.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ConventionId,
        code: impl Into<String>,
        label: impl Into<String>,
        commission_rate: Rate,
        calc_base: CalcBase,
        vat_rate: Option<Rate>,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let code = code.into();
        let label = label.into();
        let vat_rate = vat_rate.unwrap_or_else(Rate::standard_vat);

        if code.trim().is_empty() {
            return Err(DomainError::validation("convention code cannot be empty"));
        }
        if label.trim().is_empty() {
            return Err(DomainError::validation("convention label cannot be empty"));
        }
        commission_rate.ensure_percentage("commission rate")?;
        vat_rate.ensure_non_negative("vat rate")?;
        ensure_window(start_date, end_date)?;

        tracing::debug!(%id, %code, "convention created");

        Ok(Self {
            id,
            code,
            label,
            commission_rate,
            calc_base,
            vat_rate,
            start_date,
            end_date,
            status: ConventionStatus::Draft,
            locked: false,
            lock_reason: None,
            meta: RecordMeta::new(at),
        })
    }

    pub fn id_typed(&self) -> ConventionId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn commission_rate(&self) -> Rate {
        self.commission_rate
    }

    pub fn calc_base(&self) -> CalcBase {
        self.calc_base
    }

    pub fn vat_rate(&self) -> Rate {
        self.vat_rate
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn status(&self) -> ConventionStatus {
        self.status
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock_reason(&self) -> Option<&str> {
        self.lock_reason.as_deref()
    }

    pub fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    /// Whether this convention applies on `date`: active, started, and not
    /// yet past its (inclusive) end date.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.meta.active
            && self.start_date <= date
            && self.end_date.is_none_or(|end| date <= end)
    }

    fn ensure_unlocked(&self) -> DomainResult<()> {
        if self.locked {
            return Err(DomainError::conflict(format!(
                "convention {} is locked: {}",
                self.code,
                self.lock_reason.as_deref().unwrap_or("validated")
            )));
        }
        Ok(())
    }

    /// Update the commission and VAT rates of an unlocked convention.
    pub fn update_rates(
        &mut self,
        commission_rate: Rate,
        vat_rate: Rate,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_unlocked()?;
        commission_rate.ensure_percentage("commission rate")?;
        vat_rate.ensure_non_negative("vat rate")?;
        self.commission_rate = commission_rate;
        self.vat_rate = vat_rate;
        self.meta.touch(at);
        Ok(())
    }

    /// Update the validity window of an unlocked convention.
    ///
    /// An end date before the start date is rejected, never silently
    /// corrected.
    pub fn update_window(
        &mut self,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_unlocked()?;
        ensure_window(start_date, end_date)?;
        self.start_date = start_date;
        self.end_date = end_date;
        self.meta.touch(at);
        Ok(())
    }

    /// Submit a draft for validation (Draft -> Submitted).
    pub fn submit(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        if self.status != ConventionStatus::Draft {
            return Err(DomainError::invariant(format!(
                "only draft conventions can be submitted (status: {:?})",
                self.status
            )));
        }
        self.ensure_unlocked()?;
        self.status = ConventionStatus::Submitted;
        self.meta.touch(at);
        tracing::info!(code = %self.code, "convention submitted for validation");
        Ok(())
    }

    /// Validate a submitted convention (Submitted -> Validated); locks the
    /// record against further field updates.
    pub fn validate(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        if self.status != ConventionStatus::Submitted {
            return Err(DomainError::invariant(format!(
                "only submitted conventions can be validated (status: {:?})",
                self.status
            )));
        }
        self.status = ConventionStatus::Validated;
        self.locked = true;
        self.lock_reason = Some(format!("validated on {}", at.date_naive()));
        self.meta.touch(at);
        tracing::info!(code = %self.code, "convention validated");
        Ok(())
    }

    /// Send a submitted convention back to draft (Submitted -> Draft).
    pub fn reject(&mut self, reason: impl Into<String>, at: DateTime<Utc>) -> DomainResult<()> {
        if self.status != ConventionStatus::Submitted {
            return Err(DomainError::invariant(format!(
                "only submitted conventions can be rejected (status: {:?})",
                self.status
            )));
        }
        self.status = ConventionStatus::Draft;
        self.lock_reason = Some(format!("rejected: {}", reason.into()));
        self.meta.touch(at);
        tracing::info!(code = %self.code, "convention rejected, back to draft");
        Ok(())
    }

    /// Cancel a convention; locks it and drops it out of validity
    /// resolution.
    pub fn cancel(&mut self, reason: impl Into<String>, at: DateTime<Utc>) -> DomainResult<()> {
        if self.status == ConventionStatus::Cancelled {
            return Err(DomainError::conflict("convention is already cancelled"));
        }
        self.status = ConventionStatus::Cancelled;
        self.locked = true;
        self.lock_reason = Some(format!("cancelled: {}", reason.into()));
        self.meta.deactivate(at);
        tracing::info!(code = %self.code, "convention cancelled");
        Ok(())
    }
}

impl Entity for Convention {
    type Id = ConventionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_convention_id() -> ConventionId {
        ConventionId::new(RecordId::new())
    }

    fn test_time() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft_convention(code: &str) -> Convention {
        Convention::new(
            test_convention_id(),
            code,
            "Convention cadre 2024",
            Rate::new(dec!(5.00)),
            CalcBase::Ht,
            None,
            date(2024, 1, 1),
            Some(date(2024, 12, 31)),
            test_time(),
        )
        .unwrap()
    }

    #[test]
    fn new_convention_defaults_vat_to_twenty_percent() {
        let convention = draft_convention("CONV-2024-001");
        assert_eq!(convention.vat_rate(), Rate::new(dec!(20.00)));
        assert_eq!(convention.status(), ConventionStatus::Draft);
        assert!(!convention.is_locked());
    }

    #[test]
    fn rejects_end_date_before_start_date() {
        let err = Convention::new(
            test_convention_id(),
            "CONV-2024-002",
            "Fenetre inversee",
            Rate::new(dec!(5.00)),
            CalcBase::Ht,
            None,
            date(2024, 6, 1),
            Some(date(2024, 1, 1)),
            test_time(),
        )
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for inverted window"),
        }
    }

    #[test]
    fn rejects_commission_rate_above_hundred() {
        let err = Convention::new(
            test_convention_id(),
            "CONV-2024-003",
            "Taux invalide",
            Rate::new(dec!(120.00)),
            CalcBase::Ht,
            None,
            date(2024, 1, 1),
            None,
            test_time(),
        )
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for out-of-range rate"),
        }
    }

    #[test]
    fn validity_window_is_inclusive_on_both_ends() {
        let convention = draft_convention("CONV-2024-004");
        assert!(convention.is_valid_on(date(2024, 1, 1)));
        assert!(convention.is_valid_on(date(2024, 12, 31)));
        assert!(!convention.is_valid_on(date(2023, 12, 31)));
        assert!(!convention.is_valid_on(date(2025, 1, 1)));
    }

    #[test]
    fn open_ended_convention_is_valid_for_any_later_date() {
        let convention = Convention::new(
            test_convention_id(),
            "CONV-2024-005",
            "Sans date de fin",
            Rate::new(dec!(2.50)),
            CalcBase::Ttc,
            None,
            date(2024, 1, 1),
            None,
            test_time(),
        )
        .unwrap();
        assert!(convention.is_valid_on(date(2030, 6, 15)));
    }

    #[test]
    fn lifecycle_submit_validate_locks_record() {
        let mut convention = draft_convention("CONV-2024-006");
        convention.submit(test_time()).unwrap();
        assert_eq!(convention.status(), ConventionStatus::Submitted);

        convention.validate(test_time()).unwrap();
        assert_eq!(convention.status(), ConventionStatus::Validated);
        assert!(convention.is_locked());

        let err = convention
            .update_rates(Rate::new(dec!(7.50)), Rate::standard_vat(), test_time())
            .unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("Expected Conflict error for locked update"),
        }
    }

    #[test]
    fn submit_requires_draft_status() {
        let mut convention = draft_convention("CONV-2024-007");
        convention.submit(test_time()).unwrap();
        let err = convention.submit(test_time()).unwrap_err();
        match err {
            DomainError::InvariantViolation(_) => {}
            _ => panic!("Expected InvariantViolation for double submit"),
        }
    }

    #[test]
    fn reject_returns_submitted_to_draft() {
        let mut convention = draft_convention("CONV-2024-008");
        convention.submit(test_time()).unwrap();
        convention.reject("missing partner annex", test_time()).unwrap();
        assert_eq!(convention.status(), ConventionStatus::Draft);
        assert!(!convention.is_locked());
        assert!(convention.lock_reason().unwrap().contains("missing partner annex"));
    }

    #[test]
    fn cancel_locks_and_deactivates() {
        let mut convention = draft_convention("CONV-2024-009");
        convention.cancel("budget withdrawn", test_time()).unwrap();
        assert_eq!(convention.status(), ConventionStatus::Cancelled);
        assert!(convention.is_locked());
        assert!(!convention.meta().active);
        assert!(!convention.is_valid_on(date(2024, 6, 1)));

        let err = convention.cancel("again", test_time()).unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("Expected Conflict error for double cancel"),
        }
    }

    #[test]
    fn calc_base_serializes_to_closed_uppercase_set() {
        assert_eq!(serde_json::to_string(&CalcBase::Ht).unwrap(), "\"HT\"");
        assert_eq!(serde_json::to_string(&CalcBase::Ttc).unwrap(), "\"TTC\"");
        assert_eq!(serde_json::to_string(&CalcBase::Other).unwrap(), "\"OTHER\"");
        let parsed: CalcBase = serde_json::from_str("\"TTC\"").unwrap();
        assert_eq!(parsed, CalcBase::Ttc);
    }
}
