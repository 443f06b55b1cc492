use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use investpro_core::{DomainError, DomainResult, Entity, RecordId, RecordMeta};

/// Supplier identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(pub RecordId);

impl SupplierId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for SupplierId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Statutory identifiers of a supplier.
///
/// `tax_id` is digits-only; `ice` (the common enterprise identifier) is
/// exactly 15 digits when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxIdentifiers {
    pub tax_id: Option<String>,
    pub ice: Option<String>,
}

impl TaxIdentifiers {
    fn validate(&self) -> DomainResult<()> {
        if let Some(tax_id) = &self.tax_id {
            if !tax_id.chars().all(|c| c.is_ascii_digit()) {
                return Err(DomainError::validation("tax_id must contain digits only"));
            }
        }
        if let Some(ice) = &self.ice {
            if ice.len() != 15 || !ice.chars().all(|c| c.is_ascii_digit()) {
                return Err(DomainError::validation("ice must be exactly 15 digits"));
            }
        }
        Ok(())
    }
}

/// Contact information for a supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

/// Record: Supplier.
///
/// The computation engine reads only the `non_resident` flag; everything else
/// is identifying data owned by the registry boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: SupplierId,
    code: String,
    legal_name: String,
    tax: TaxIdentifiers,
    contact: ContactInfo,
    non_resident: bool,
    meta: RecordMeta,
}

impl Supplier {
    /// Register a supplier, validating its identifying fields.
    pub fn new(
        id: SupplierId,
        code: impl Into<String>,
        legal_name: impl Into<String>,
        tax: TaxIdentifiers,
        contact: ContactInfo,
        non_resident: bool,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let code = code.into();
        let legal_name = legal_name.into();

        if code.trim().is_empty() {
            return Err(DomainError::validation("supplier code cannot be empty"));
        }
        if legal_name.trim().is_empty() {
            return Err(DomainError::validation("legal name cannot be empty"));
        }
        tax.validate()?;

        tracing::debug!(%id, %code, "supplier registered");

        Ok(Self {
            id,
            code,
            legal_name,
            tax,
            contact,
            non_resident,
            meta: RecordMeta::new(at),
        })
    }

    pub fn id_typed(&self) -> SupplierId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn legal_name(&self) -> &str {
        &self.legal_name
    }

    pub fn tax(&self) -> &TaxIdentifiers {
        &self.tax
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn non_resident(&self) -> bool {
        self.non_resident
    }

    pub fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    pub fn set_non_resident(&mut self, non_resident: bool, at: DateTime<Utc>) {
        self.non_resident = non_resident;
        self.meta.touch(at);
    }

    pub fn update_contact(&mut self, contact: ContactInfo, at: DateTime<Utc>) {
        self.contact = contact;
        self.meta.touch(at);
    }

    pub fn deactivate(&mut self, at: DateTime<Utc>) {
        self.meta.deactivate(at);
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
