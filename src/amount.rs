// Integer amount arithmetic
// Base-unit parsing, slippage floors, and gas totals kept in fixed-width
// integers; anything that does not fit is rejected instead of widened
//
// Numan Thabit 2025 Nov

use crate::errors::AmountError;

const BPS_DENOM: u128 = 10_000;
pub const MAX_SLIPPAGE_PCT: f64 = 50.0;

/// Parse a decimal string of token base units (e.g. wei).
pub fn parse_base_units(raw: &str) -> Result<u128, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::NotAnInteger(trimmed.to_string()));
    }
    let value: u128 = trimmed
        .parse()
        .map_err(|_| AmountError::Overflow(trimmed.to_string()))?;
    if value == 0 {
        return Err(AmountError::Zero);
    }
    Ok(value)
}

pub fn validate_slippage(slippage_pct: f64) -> Result<f64, AmountError> {
    if slippage_pct.is_finite() && (0.0..=MAX_SLIPPAGE_PCT).contains(&slippage_pct) {
        Ok(slippage_pct)
    } else {
        Err(AmountError::Slippage(slippage_pct))
    }
}

/// Minimum acceptable output after `slippage_pct` percent, rounded down to
/// whole basis points of tolerance.
pub fn apply_slippage(amount: u128, slippage_pct: f64) -> Result<u128, AmountError> {
    let slippage_pct = validate_slippage(slippage_pct)?;
    let bps = (slippage_pct * 100.0).round() as u128;
    let keep = BPS_DENOM - bps;
    // split to avoid overflowing amount * keep
    let whole = (amount / BPS_DENOM) * keep;
    let rest = (amount % BPS_DENOM) * keep / BPS_DENOM;
    Ok(whole + rest)
}

/// Checked sum of per-leg gas estimates; `None` on overflow.
pub fn sum_gas<I>(estimates: I) -> Option<u64>
where
    I: IntoIterator<Item = u64>,
{
    estimates
        .into_iter()
        .try_fold(0u64, |acc, gas| acc.checked_add(gas))
}

/// Serde helper rendering `u128` amounts as decimal strings.
pub mod as_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim().parse().map_err(de::Error::custom)
    }
}
