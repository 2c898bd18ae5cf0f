// src/common/validation.rs

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

use crate::common::error::AppError;

// Limite superior para qualquer quantidade em caixas (cabe em INTEGER)
pub const MAX_BOXES: i64 = 1_000_000;

// Maior custo que cabe em NUMERIC(12,4)
pub const MAX_UNIT_COST: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 4);

pub fn validate_unit_cost(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("Il valore non può essere negativo.".into());
        return Err(err);
    }
    if *val > MAX_UNIT_COST {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &MAX_UNIT_COST.to_string());
        err.message = Some("Costo troppo alto.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Il campo è obbligatorio.".into());
        return Err(err);
    }
    Ok(())
}

/// Acumula erros de campo no mesmo formato do `validator`.
#[derive(Default)]
pub struct FieldErrors(ValidationErrors);

impl FieldErrors {
    pub fn new() -> Self {
        Self(ValidationErrors::new())
    }

    pub fn check(&mut self, field: &'static str, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.0.add(field, e);
        }
    }

    pub fn require_non_negative(&mut self, field: &'static str, value: i64) {
        if value < 0 {
            let mut err = ValidationError::new("range");
            err.add_param("min".into(), &0);
            err.message = Some("Il valore non può essere negativo.".into());
            self.0.add(field, err);
        } else if value > MAX_BOXES {
            let mut err = ValidationError::new("range");
            err.add_param("max".into(), &MAX_BOXES);
            err.message = Some("Valore troppo grande.".into());
            self.0.add(field, err);
        }
    }

    pub fn require_positive(&mut self, field: &'static str, value: i64) {
        if value <= 0 {
            let mut err = ValidationError::new("range");
            err.add_param("min".into(), &1);
            err.message = Some("Il valore deve essere maggiore di zero.".into());
            self.0.add(field, err);
        } else {
            self.require_non_negative(field, value);
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(self.0))
        }
    }
}
