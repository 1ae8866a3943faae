//! Input checks shared by the wallet backends

use mwc_core::{Error, Result, CHANGE_OUTPUTS_RANGE, INPUT_CONFIRMATIONS_RANGE};

/// Check the arguments of an outgoing transaction before anything is created
pub fn validate_send(
    amount: u64,
    address: &str,
    input_confirmations: u32,
    change_outputs: u32,
) -> Result<()> {
    validate_amount(amount)?;
    validate_address(address)?;
    if !INPUT_CONFIRMATIONS_RANGE.contains(&input_confirmations) {
        return Err(Error::InvalidConfig(format!(
            "Number of input confirmations must be from {} to {}",
            INPUT_CONFIRMATIONS_RANGE.start(),
            INPUT_CONFIRMATIONS_RANGE.end()
        )));
    }
    if !CHANGE_OUTPUTS_RANGE.contains(&change_outputs) {
        return Err(Error::InvalidConfig(format!(
            "Number of change outputs must be from {} to {}",
            CHANGE_OUTPUTS_RANGE.start(),
            CHANGE_OUTPUTS_RANGE.end()
        )));
    }
    Ok(())
}

/// Amounts must be positive
pub fn validate_amount(amount: u64) -> Result<()> {
    if amount == 0 {
        return Err(Error::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Addresses are opaque but never empty and never contain whitespace
pub fn validate_address(address: &str) -> Result<()> {
    if address.is_empty() {
        return Err(Error::InvalidAddress(
            "Please specify the recipient address".to_string(),
        ));
    }
    if address.chars().any(char::is_whitespace) {
        return Err(Error::InvalidAddress(format!(
            "'{}' contains whitespace",
            address
        )));
    }
    Ok(())
}
