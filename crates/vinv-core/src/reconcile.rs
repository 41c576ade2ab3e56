//! Totals reconciliation between emitted items and the printed order total.

use rust_decimal::Decimal;
use tracing::debug;

/// Compare summed line-item totals against the printed grand/order total.
///
/// A difference beyond the tolerance yields exactly one warning carrying
/// both values and the rounded delta; smaller differences are silent, and a
/// missing printed total never warns here (the header extractor already
/// did).
pub fn check(item_sum: Decimal, printed_total: Option<Decimal>, tolerance: Decimal) -> Option<String> {
    let printed = printed_total?;
    let delta = (item_sum - printed).abs();
    if delta <= tolerance {
        debug!(%item_sum, %printed, "totals reconcile");
        return None;
    }
    Some(format!(
        "line item totals (${}) differ from order total (${}) by ${}",
        two_decimal(item_sum),
        two_decimal(printed),
        two_decimal(delta),
    ))
}

fn two_decimal(value: Decimal) -> Decimal {
    let mut out = value.round_dp(2);
    out.rescale(2);
    out
}
