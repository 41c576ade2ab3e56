//! Parsed invoice data models shared by the vendor parsers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::VinvError;

/// Vendor whose invoice layout a parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    Amazon,
    Wayfair,
}

impl Vendor {
    /// Human-readable vendor name.
    pub fn label(&self) -> &'static str {
        match self {
            Vendor::Amazon => "Amazon",
            Vendor::Wayfair => "Wayfair",
        }
    }

    fn indefinite_article(&self) -> &'static str {
        match self {
            Vendor::Amazon => "an",
            Vendor::Wayfair => "a",
        }
    }
}

impl std::str::FromStr for Vendor {
    type Err = VinvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amazon" => Ok(Vendor::Amazon),
            "wayfair" => Ok(Vendor::Wayfair),
            other => Err(VinvError::UnknownVendor(other.to_string())),
        }
    }
}

/// Shipment grouping a line item belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSection {
    /// Listed under a "shipped on ..." marker.
    Shipped,
    /// Listed under a "to be shipped" marker.
    ToBeShipped,
    /// No shipment marker seen before this item.
    #[default]
    Unknown,
}

impl ItemSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemSection::Shipped => "shipped",
            ItemSection::ToBeShipped => "to_be_shipped",
            ItemSection::Unknown => "unknown",
        }
    }
}

/// A single purchase line item reconstructed from invoice text.
///
/// Money fields are two-decimal [`Decimal`] values; their string form is the
/// canonical normalized amount ("19.99", "-12.34").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedLineItem {
    /// Product description. Never empty; falls back to the SKU when the
    /// source rows carried no usable text.
    pub description: String,

    /// Purchase quantity (always > 0).
    pub quantity: u32,

    /// Per-unit price, first money column of the recognized row.
    pub unit_price: Decimal,

    /// Row subtotal, when the row carried a third money column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,

    /// Per-item shipping charge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Decimal>,

    /// Per-item discount or adjustment, stored as an absolute value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<Decimal>,

    /// Per-item tax, when the row carried enough money columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,

    /// Row total, last money column of the recognized row.
    pub total: Decimal,

    /// Product code (SKU/ASIN): alphanumeric, 6-20 chars, at least one
    /// letter and one digit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// Structured color attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Structured size attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Remaining free-text `Key: Value` attribute lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_lines: Vec<String>,

    /// Ship date of the section this item was listed under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipped_on: Option<NaiveDate>,

    /// Shipment grouping.
    #[serde(default)]
    pub section: ItemSection,
}

/// Invoice-level fields extracted from the header area.
///
/// Every field is optional; a missing field produces one warning on the
/// parse result and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Vendor whose parser produced this result.
    pub vendor: Vendor,

    /// Order/invoice number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,

    /// Date the order was placed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,

    /// Grand/order total as printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_total: Option<Decimal>,

    /// Order-level tax.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,

    /// Order-level shipping charge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Decimal>,

    /// Printed merchandise subtotal (Wayfair).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,

    /// Printed discounts/adjustments (Wayfair).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustments: Option<Decimal>,

    /// Merchandise subtotal recomputed from the parsed line items (Wayfair).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculated_subtotal: Option<Decimal>,
}

impl InvoiceHeader {
    /// Header with every field absent.
    pub fn empty(vendor: Vendor) -> Self {
        Self {
            vendor,
            order_number: None,
            order_date: None,
            order_total: None,
            tax: None,
            shipping: None,
            subtotal: None,
            adjustments: None,
            calculated_subtotal: None,
        }
    }
}

/// Result of one parse call: a best-effort draft plus warnings.
///
/// Produced once at the end of the scan and never mutated afterwards. The
/// consumer renders it as an editable draft, so warnings annotate rather
/// than abort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    /// Invoice-level header fields.
    pub header: InvoiceHeader,

    /// Line items in money-row recognition order.
    pub line_items: Vec<ParsedLineItem>,

    /// Warnings in the order they were produced.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ParseResult {
    /// Empty result used when the text is not this vendor's invoice.
    pub fn mismatch(vendor: Vendor) -> Self {
        Self {
            header: InvoiceHeader::empty(vendor),
            line_items: Vec::new(),
            warnings: vec![format!(
                "not {} {} invoice",
                vendor.indefinite_article(),
                vendor.label()
            )],
        }
    }
}
