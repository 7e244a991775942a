//! Validated inventory record
//!
//! Each field has exactly one validation function. Construction and every
//! setter go through it, so a `Record` can never hold an out-of-domain value.

use super::errors::{RecordResult, ValidationError};

/// One inventory entry: identifier, name, quantity and unit price.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: i64,
    name: String,
    quantity: i64,
    price: f64,
}

impl Record {
    /// Creates a validated record.
    ///
    /// The name is stored trimmed. Fails if `id <= 0`, the trimmed name is
    /// empty, `quantity < 0`, or `price` is negative or not finite.
    pub fn new(id: i64, name: &str, quantity: i64, price: f64) -> RecordResult<Self> {
        Ok(Self {
            id: validate_id(id)?,
            name: validate_name(name)?,
            quantity: validate_quantity(quantity)?,
            price: validate_price(price)?,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Case-folded name used as the name index key
    pub fn folded_name(&self) -> String {
        fold_name(&self.name)
    }

    /// Sets the quantity, leaving the old value in place on failure
    pub fn set_quantity(&mut self, quantity: i64) -> RecordResult<()> {
        self.quantity = validate_quantity(quantity)?;
        Ok(())
    }

    /// Sets the price, leaving the old value in place on failure
    pub fn set_price(&mut self, price: f64) -> RecordResult<()> {
        self.price = validate_price(price)?;
        Ok(())
    }

    /// Renames the record, leaving the old name in place on failure
    pub fn set_name(&mut self, name: &str) -> RecordResult<()> {
        self.name = validate_name(name)?;
        Ok(())
    }
}

/// Folds a name into its index key: trimmed and lowercased.
pub fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn validate_id(id: i64) -> RecordResult<i64> {
    if id <= 0 {
        return Err(ValidationError::NonPositiveId(id));
    }
    Ok(id)
}

fn validate_name(name: &str) -> RecordResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn validate_quantity(quantity: i64) -> RecordResult<i64> {
    if quantity < 0 {
        return Err(ValidationError::NegativeQuantity(quantity));
    }
    Ok(quantity)
}

fn validate_price(price: f64) -> RecordResult<f64> {
    if !price.is_finite() {
        return Err(ValidationError::NonNumericPrice);
    }
    if price < 0.0 {
        return Err(ValidationError::NegativePrice(price));
    }
    // -0.0 passes the check above; store it as plain zero
    Ok(price + 0.0)
}
