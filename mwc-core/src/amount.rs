//! MWC amount parsing and formatting
//!
//! Amounts travel through the wallet as `u64` nano-MWC. Decimal strings only
//! exist at the edges (user input, display).

use crate::{Error, Result};
use mwc_params::{MWC_DECIMALS, NANO_PER_MWC};

/// Parse a decimal MWC string ("1", "0.5", "12.000000001") into nano-MWC.
///
/// Zero is rejected: no wallet operation accepts an empty transfer.
pub fn parse_amount(input: &str) -> Result<u64> {
    let text = input.trim();
    if text.is_empty() {
        return Err(Error::InvalidAmount("amount is empty".to_string()));
    }

    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(Error::InvalidAmount(format!("'{}' is not a number", input)));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidAmount(format!("'{}' is not a number", input)));
    }
    if fraction.len() > MWC_DECIMALS {
        return Err(Error::InvalidAmount(format!(
            "at most {} decimal places are allowed",
            MWC_DECIMALS
        )));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| Error::InvalidAmount(format!("'{}' is too large", input)))?
    };
    let mut fraction_nano: u64 = 0;
    for (i, digit) in fraction.bytes().enumerate() {
        let place = 10u64.pow((MWC_DECIMALS - 1 - i) as u32);
        fraction_nano += u64::from(digit - b'0') * place;
    }

    let nano = whole
        .checked_mul(NANO_PER_MWC)
        .and_then(|n| n.checked_add(fraction_nano))
        .ok_or_else(|| Error::InvalidAmount(format!("'{}' is too large", input)))?;

    if nano == 0 {
        return Err(Error::InvalidAmount("amount must be greater than zero".to_string()));
    }
    Ok(nano)
}

/// Render nano-MWC as a decimal MWC string with trailing zeros trimmed.
pub fn format_amount(nano: u64) -> String {
    let whole = nano / NANO_PER_MWC;
    let fraction = nano % NANO_PER_MWC;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", fraction, width = MWC_DECIMALS);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
