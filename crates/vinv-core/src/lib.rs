//! Core library for vendor invoice parsing.
//!
//! This crate provides:
//! - line preprocessing and money/date normalization for raw PDF text
//! - per-vendor header field extraction via declarative rule tables
//! - heuristic line-item recognition with explicit recovery rules
//! - totals reconciliation with warnings, never hard failures
//!
//! Parsing is synchronous and purely functional: one opaque text string in,
//! one [`ParseResult`] out, identical input always yielding an identical
//! result. Malformed input degrades to a partial draft plus warnings; no
//! code path panics on bad text.

pub mod error;
pub mod models;
pub mod reconcile;
pub mod text;
pub mod vendor;

pub use error::{Result, VinvError};
pub use models::config::ParseConfig;
pub use models::invoice::{InvoiceHeader, ItemSection, ParseResult, ParsedLineItem, Vendor};
pub use vendor::{AmazonParser, VendorParser, WayfairParser, detect, parse_invoice, parse_invoice_with};
