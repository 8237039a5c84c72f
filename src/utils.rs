use thiserror::Error;

use crate::calculator::{Operation, operation::exponent_iterations};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("input cannot be empty")]
    Empty,
    #[error("invalid number format: {0:?}")]
    InvalidNumber(String),
    #[error("exponent {exponent} exceeds the maximum of {max}")]
    ExponentTooLarge { exponent: f64, max: u64 },
}

pub fn validate_input(input: &str) -> Result<f64, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(InputError::Empty);
    }

    input
        .parse::<f64>()
        .map_err(|_| InputError::InvalidNumber(input.to_string()))
}

/// Rejects power requests whose truncated exponent runs more than `max`
/// iterations. Other operators always pass.
pub fn check_exponent(operator: &str, exponent: f64, max: u64) -> Result<(), InputError> {
    if Operation::from_identifier(operator) == Some(Operation::Power)
        && exponent_iterations(exponent) > max
    {
        return Err(InputError::ExponentTooLarge { exponent, max });
    }

    Ok(())
}

pub fn format_result(left: f64, operator: &str, right: f64, result: f64, precision: usize) -> String {
    format!(
        "{left:.p$} {operator} {right:.p$} = {result:.p$}",
        p = precision
    )
}
