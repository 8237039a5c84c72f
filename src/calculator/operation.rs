use std::{fmt::Display, str::FromStr};

use crate::calculator::CalculatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Power,
    ];

    /// Resolves either the symbol or the word alias. Matching is case sensitive.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "+" | "add" => Some(Self::Add),
            "-" | "subtract" => Some(Self::Subtract),
            "*" | "multiply" => Some(Self::Multiply),
            "/" | "divide" => Some(Self::Divide),
            "^" | "power" => Some(Self::Power),
            _ => None,
        }
    }

    pub fn to_symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Power => "power",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Add => "Addition",
            Self::Subtract => "Subtraction",
            Self::Multiply => "Multiplication",
            Self::Divide => "Division",
            Self::Power => "Power (exponentiation)",
        }
    }

    pub fn apply(&self, left: f64, right: f64) -> Result<f64, CalculatorError> {
        Ok(match self {
            Self::Add => add(left, right),
            Self::Subtract => subtract(left, right),
            Self::Multiply => multiply(left, right),
            Self::Divide => divide(left, right)?,
            Self::Power => power(left, right),
        })
    }
}

impl FromStr for Operation {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_identifier(s)
            .ok_or_else(|| CalculatorError::UnsupportedOperation(s.to_string()))
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_symbol())
    }
}

pub(crate) fn add(left: f64, right: f64) -> f64 {
    left + right
}

pub(crate) fn subtract(left: f64, right: f64) -> f64 {
    left - right
}

pub(crate) fn multiply(left: f64, right: f64) -> f64 {
    left * right
}

pub(crate) fn divide(left: f64, right: f64) -> Result<f64, CalculatorError> {
    // -0.0 compares equal to 0.0, so both are rejected.
    if right == 0.0 {
        return Err(CalculatorError::DivisionByZero);
    }

    Ok(left / right)
}

/// Raises `base` by repeated multiplication. The exponent is truncated toward
/// zero to get the iteration count, so negative and NaN exponents run zero
/// times and give `1.0`.
pub(crate) fn power(base: f64, exponent: f64) -> f64 {
    let iterations = exponent.trunc() as i64;
    (0..iterations).fold(1.0, |acc, _| acc * base)
}

/// Iteration count `power` would run for `exponent`.
pub fn exponent_iterations(exponent: f64) -> u64 {
    (exponent.trunc() as i64).max(0) as u64
}
