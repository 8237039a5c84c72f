pub mod operation;

use thiserror::Error;
use tracing::debug;

pub use operation::Operation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("division by zero is not allowed")]
    DivisionByZero,
}

/// Stateless dispatcher over the fixed operation table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calculator;

impl Calculator {
    pub fn new() -> Self {
        Self
    }

    pub fn add(&self, left: f64, right: f64) -> f64 {
        operation::add(left, right)
    }

    pub fn subtract(&self, left: f64, right: f64) -> f64 {
        operation::subtract(left, right)
    }

    pub fn multiply(&self, left: f64, right: f64) -> f64 {
        operation::multiply(left, right)
    }

    pub fn divide(&self, left: f64, right: f64) -> Result<f64, CalculatorError> {
        operation::divide(left, right)
    }

    pub fn power(&self, base: f64, exponent: f64) -> f64 {
        operation::power(base, exponent)
    }

    /// Resolves `identifier` and runs the matching operation on both operands.
    pub fn perform(&self, left: f64, right: f64, identifier: &str) -> Result<f64, CalculatorError> {
        let operation: Operation = identifier.parse()?;
        let result = operation.apply(left, right);
        debug!(%left, %right, %operation, ?result, "dispatched");
        result
    }

    pub fn supported_operations(&self) -> Vec<&'static str> {
        Operation::ALL.iter().map(|op| op.to_symbol()).collect()
    }
}
