//! Sales record model
//!
//! A [`SalesRecord`] is the unit of transfer between the source and the
//! target. Every field is an `Option`: SQL NULL is carried as `None` from the
//! source decode through to the insert bind and is never replaced by a zero or
//! default value.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of columns moved per row
pub const COLUMN_COUNT: usize = 12;

/// Source columns in extraction order
///
/// Position `i` here feeds position `i` of [`TARGET_COLUMNS`].
pub const SOURCE_COLUMNS: [&str; COLUMN_COUNT] = [
    "fsno",
    "salestype",
    "attachmentno",
    "customer",
    "region",
    "date",
    "code",
    "name",
    "measurementunit",
    "unitprice",
    "soldquantity",
    "netpay",
];

/// Target columns in insert order
pub const TARGET_COLUMNS: [&str; COLUMN_COUNT] = [
    "fsno",
    "salestype",
    "attachmentno",
    "customer",
    "region",
    "sale_date",
    "code",
    "item_name",
    "measurement_unit",
    "unit_price",
    "sold_quantity",
    "net_pay",
];

/// Identity column, the conflict target of the insert and the sort key of
/// the extraction
pub const IDENTITY_COLUMN: &str = "fsno";

/// Placeholder used in logs and errors when a row has no identity value
const NULL_IDENTITY: &str = "<null>";

/// One sales row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// External business identifier (primary key in the target)
    pub fsno: Option<String>,

    /// Sale type
    pub sale_type: Option<String>,

    /// Attachment number
    pub attachment_no: Option<String>,

    /// Customer name
    pub customer: Option<String>,

    /// Sales region
    pub region: Option<String>,

    /// Sale date
    pub date: Option<NaiveDate>,

    /// Item code
    pub code: Option<String>,

    /// Item name
    pub name: Option<String>,

    /// Measurement unit
    pub measurement_unit: Option<String>,

    /// Unit price
    pub unit_price: Option<Decimal>,

    /// Quantity sold
    pub sold_quantity: Option<Decimal>,

    /// Net amount paid
    pub net_pay: Option<Decimal>,
}

impl SalesRecord {
    /// Creates a record with only the identity set
    ///
    /// # Examples
    ///
    /// ```
    /// use salesync::domain::SalesRecord;
    /// use rust_decimal::Decimal;
    ///
    /// let record = SalesRecord {
    ///     net_pay: Some(Decimal::new(10050, 2)),
    ///     ..SalesRecord::with_fsno("A1")
    /// };
    /// assert_eq!(record.identity(), "A1");
    /// assert!(record.customer.is_none());
    /// ```
    pub fn with_fsno(fsno: impl Into<String>) -> Self {
        Self {
            fsno: Some(fsno.into()),
            ..Self::default()
        }
    }

    /// Identity for logs and error context
    ///
    /// Returns `<null>` when the source row carried no identity.
    pub fn identity(&self) -> &str {
        self.fsno.as_deref().unwrap_or(NULL_IDENTITY)
    }

    /// Number of fields holding SQL NULL
    pub fn null_count(&self) -> usize {
        let text = [
            &self.fsno,
            &self.sale_type,
            &self.attachment_no,
            &self.customer,
            &self.region,
            &self.code,
            &self.name,
            &self.measurement_unit,
        ]
        .iter()
        .filter(|v| v.is_none())
        .count();
        let numeric = [&self.unit_price, &self.sold_quantity, &self.net_pay]
            .iter()
            .filter(|v| v.is_none())
            .count();

        text + numeric + usize::from(self.date.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_lists_align() {
        assert_eq!(SOURCE_COLUMNS.len(), TARGET_COLUMNS.len());
        assert_eq!(SOURCE_COLUMNS[0], IDENTITY_COLUMN);
        assert_eq!(TARGET_COLUMNS[0], IDENTITY_COLUMN);
        assert_eq!(SOURCE_COLUMNS[5], "date");
        assert_eq!(TARGET_COLUMNS[5], "sale_date");
        assert_eq!(SOURCE_COLUMNS[11], "netpay");
        assert_eq!(TARGET_COLUMNS[11], "net_pay");
    }

    #[test]
    fn test_default_record_is_all_null() {
        let record = SalesRecord::default();
        assert_eq!(record.null_count(), COLUMN_COUNT);
        assert_eq!(record.identity(), "<null>");
    }

    #[test]
    fn test_with_fsno() {
        let record = SalesRecord::with_fsno("A1");
        assert_eq!(record.identity(), "A1");
        assert_eq!(record.null_count(), COLUMN_COUNT - 1);
    }

    #[test]
    fn test_zero_is_not_null() {
        let record = SalesRecord {
            net_pay: Some(Decimal::ZERO),
            ..SalesRecord::with_fsno("A2")
        };
        assert_eq!(record.null_count(), COLUMN_COUNT - 2);
        assert_eq!(record.net_pay, Some(Decimal::ZERO));
    }

    #[test]
    fn test_empty_identity_passes_through() {
        let record = SalesRecord::with_fsno("");
        assert_eq!(record.identity(), "");
        assert_eq!(record.fsno.as_deref(), Some(""));
    }
}
