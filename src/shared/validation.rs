//! Validation Utilities

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use super::error::{AppError, FieldError};

/// Convert validation errors to AppError, keeping every field failure.
///
/// Nested structs and list items are flattened into dotted paths such as
/// `marks[1].marks`.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut field_errors = Vec::new();
    collect_field_errors("", &errors, &mut field_errors);
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));

    let message = field_errors
        .first()
        .map(|e| format!("{}: {}", e.field, e.message))
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation {
        message,
        errors: field_errors,
    }
}

fn collect_field_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| FieldError {
                    field: path.clone(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

/// Digits after the decimal point that `NUMERIC(p,2)` columns keep.
pub const AMOUNT_SCALE: u32 = 2;

/// Largest value of a `NUMERIC(12,2)` money column.
pub fn max_money() -> Decimal {
    Decimal::new(999_999_999_999, AMOUNT_SCALE)
}

/// Largest value of the `NUMERIC(6,2)` marks column.
pub fn max_mark() -> Decimal {
    Decimal::new(999_999, AMOUNT_SCALE)
}

/// Reject negative amounts.
pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Fee, concession and deposit amounts.
pub fn money_amount(value: &Decimal) -> Result<(), ValidationError> {
    bounded_amount(value, max_money(), "money_amount")
}

/// Obtained marks on a paper.
pub fn mark_score(value: &Decimal) -> Result<(), ValidationError> {
    bounded_amount(value, max_mark(), "mark_score")
}

fn bounded_amount(
    value: &Decimal,
    max: Decimal,
    code: &'static str,
) -> Result<(), ValidationError> {
    non_negative(value)?;

    let message = if *value > max {
        format!("must be at most {}", max)
    } else if value.normalize().scale() > AMOUNT_SCALE {
        format!("must have at most {} decimal places", AMOUNT_SCALE)
    } else {
        return Ok(());
    };

    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    Err(err)
}
