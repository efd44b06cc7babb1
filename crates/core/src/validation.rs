//! Helpers shared by request DTOs deriving [`validator::Validate`].

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::{ValidateUrl, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Flatten validation errors into one message, `", "`-joined.
///
/// Each entry reads `<path>: <message>`; nested fields use dotted paths
/// (`to.index`) and list items bracketed indices (`teamMembers[2]`).
/// Struct-level (`__all__`) errors carry no path. Entries
/// are sorted so the output is stable regardless of hash ordering.
pub fn flatten_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages.sort();
    messages.join(", ")
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let field = field.to_string();
        let path = if field == "__all__" {
            prefix.to_string()
        } else if prefix.is_empty() {
            field
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    if path.is_empty() {
                        out.push(describe(err));
                    } else {
                        out.push(format!("{path}: {}", describe(err)));
                    }
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

fn describe(err: &ValidationError) -> String {
    match &err.message {
        Some(message) => message.to_string(),
        None => format!("failed '{}' check", err.code),
    }
}

fn error_with(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Custom validator: the amount must be strictly positive.
pub fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_positive() && !value.is_zero() {
        Ok(())
    } else {
        Err(error_with("positive", "must be greater than zero"))
    }
}

/// Custom validator: the amount must be zero or more.
pub fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(error_with("non_negative", "must not be negative"))
    } else {
        Ok(())
    }
}

/// Public path prefix of files served from the uploads directory.
pub const UPLOADS_PATH: &str = "/uploads/";

/// Custom validator: an absolute URL, or a path under [`UPLOADS_PATH`]
/// as issued for stored attachments.
pub fn attachment_url(value: &str) -> Result<(), ValidationError> {
    let local = value.starts_with(UPLOADS_PATH)
        && value.len() > UPLOADS_PATH.len()
        && !value.split('/').any(|segment| segment == "..");
    if local || value.validate_url() {
        Ok(())
    } else {
        Err(error_with(
            "attachment_url",
            "url must be an absolute URL or an /uploads/ path",
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use validator::Validate;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Inner {
        #[validate(range(min = 0, message = "must be zero or greater"))]
        index: i32,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Outer {
        #[validate(length(min = 2, message = "must be at least 2 characters"))]
        name: String,
        #[validate(custom(function = "positive_amount"))]
        amount: Decimal,
        #[validate(nested)]
        to: Inner,
    }

    #[test]
    fn test_messages_are_sorted_and_joined() {
        let outer = Outer {
            name: "x".into(),
            amount: Decimal::ZERO,
            to: Inner { index: -1 },
        };
        let errors = outer.validate().unwrap_err();
        assert_eq!(
            flatten_errors(&errors),
            "amount: must be greater than zero, name: must be at least 2 characters, \
             to.index: must be zero or greater"
        );
    }

    #[test]
    fn test_amount_validators() {
        assert!(positive_amount(&Decimal::new(1, 2)).is_ok());
        assert!(positive_amount(&Decimal::ZERO).is_err());
        assert!(positive_amount(&Decimal::from(-3)).is_err());
        assert!(non_negative_amount(&Decimal::ZERO).is_ok());
        assert!(non_negative_amount(&Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_attachment_url_accepts_uploads_paths() {
        assert!(attachment_url("/uploads/bills/1700000000000-abc.pdf").is_ok());
        assert!(attachment_url("https://files.example.com/spec.pdf").is_ok());
        assert!(attachment_url("/uploads/").is_err());
        assert!(attachment_url("/uploads/../etc/passwd").is_err());
        assert!(attachment_url("/tmp/report.pdf").is_err());
        assert!(attachment_url("report.pdf").is_err());
    }
}
