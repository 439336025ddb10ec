//! Currency conversion over a rate table

use crate::core::rates::RateTable;
use std::fmt::Display;
use thiserror::Error;

/// User-input errors that block a conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("please enter a valid number (got {0:?})")]
    InputFormat(String),

    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    /// Parses the free-text amount; codes are normalised to uppercase.
    pub fn parse(amount: &str, from: &str, to: &str) -> Result<Self, ConversionError> {
        Ok(Self {
            amount: parse_amount(amount)?,
            from: from.trim().to_uppercase(),
            to: to.trim().to_uppercase(),
        })
    }
}

pub fn parse_amount(text: &str) -> Result<f64, ConversionError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConversionError::InputFormat(text.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub converted: f64,
}

impl Display for ConversionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.2} {} = {:.2} {}",
            self.amount, self.from, self.converted, self.to
        )
    }
}

/// `amount * table[to] / table[from]`, failing on codes the table lacks.
pub fn convert(
    table: &RateTable,
    request: &ConversionRequest,
) -> Result<ConversionResult, ConversionError> {
    let lookup = |code: &str| {
        table
            .get(code)
            .ok_or_else(|| ConversionError::UnknownCurrency(code.to_string()))
    };
    let from_rate = lookup(&request.from)?;
    let to_rate = lookup(&request.to)?;

    Ok(ConversionResult {
        amount: request.amount,
        from: request.from.clone(),
        to: request.to.clone(),
        converted: request.amount * (to_rate / from_rate),
    })
}
