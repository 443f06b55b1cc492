//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable domain values compared entirely by their
/// attributes: two `Amount`s of `100.00` are the same amount, while two
/// `Expense` records with the same fields are still distinct records. To
/// "modify" a value object, build a new one.
///
/// The bounds keep value objects cheap to copy, comparable, and debuggable:
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Window { start: NaiveDate, end: Option<NaiveDate> }
///
/// impl ValueObject for Window {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
