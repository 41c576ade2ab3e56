//! Money normalization and per-line money token extraction.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

lazy_static! {
    /// Money-shaped substrings: `$12.34`, `-$12.34`, `(12.34)`, `($12.34)`,
    /// and bare two-decimal amounts like `49.99` or `1,234.56`.
    /// Parenthesized forms are negative.
    static ref MONEY_TOKEN: Regex = Regex::new(
        r#"\(\s*\$?\s*\d+(?:,\d{3})*\.\d{2}\b\s*\)|-\s*\$?\s*\d+(?:,\d{3})*\.\d{2}\b|\$\s*-?\s*\d+(?:,\d{3})*\.\d{2}\b|\b\d+(?:,\d{3})*\.\d{2}\b"#
    )
    .unwrap();
}

/// A normalized money amount found in a line, with its byte span.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyToken {
    /// Two-decimal, sign-preserving amount.
    pub value: Decimal,
    pub start: usize,
    pub end: usize,
}

/// Normalize arbitrary currency text into a canonical signed two-decimal
/// string. Idempotent over its own output; `None` when unparseable.
pub fn normalize(text: &str) -> Option<String> {
    to_decimal(text).map(|d| d.to_string())
}

/// Parse arbitrary currency text into a two-decimal [`Decimal`].
///
/// Everything except digits, `.`, `,`, `-`, parentheses and `$` is
/// stripped; a fully parenthesized value or a `-` makes it negative;
/// thousands separators are removed. Never panics.
pub fn to_decimal(text: &str) -> Option<Decimal> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '(' | ')' | '$'))
        .collect();
    if kept.is_empty() {
        return None;
    }

    let parenthesized = kept.starts_with('(') && kept.ends_with(')');
    let negative = parenthesized || kept.contains('-');

    let digits: String = kept
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let mut value = Decimal::from_str(&digits).ok()?.round_dp(2);
    value.rescale(2);

    Some(if negative { -value } else { value })
}

/// Parse arbitrary currency text into a plain float.
pub fn to_number(text: &str) -> Option<f64> {
    to_decimal(text).and_then(|d| d.to_f64())
}

/// Replace every money-shaped substring with a space.
pub fn strip_money(text: &str) -> String {
    MONEY_TOKEN.replace_all(text, " ").into_owned()
}

/// Scan one line for all money-shaped substrings, in document order.
pub fn money_tokens(line: &str) -> Vec<MoneyToken> {
    MONEY_TOKEN
        .find_iter(line)
        .filter_map(|m| {
            to_decimal(m.as_str()).map(|value| MoneyToken {
                value,
                start: m.start(),
                end: m.end(),
            })
        })
        .collect()
}
