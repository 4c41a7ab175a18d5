//! Request validation helpers.

use salvo::prelude::StatusError;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

pub(crate) trait ValidateExt: Sized {
    /// Validates the request, joining every failure into one 400 brief.
    fn validated(self) -> Result<Self, StatusError>;
}

impl<T: Validate> ValidateExt for T {
    fn validated(self) -> Result<Self, StatusError> {
        match self.validate() {
            Ok(()) => Ok(self),
            Err(errors) => Err(StatusError::bad_request().brief(joined_message(&errors))),
        }
    }
}

fn joined_message(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    collect_messages(errors, &mut messages);

    messages.sort();
    messages.dedup();

    messages.join(", ")
}

/// Walks nested structs and lists so an invalid line item still surfaces.
fn collect_messages(errors: &ValidationErrors, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errors) => {
                messages.extend(errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, messages),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, messages);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Debug, Validate)]
    struct Request {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,

        #[validate(range(min = 1, message = "Quantity must be at least 1"))]
        quantity: u64,

        #[validate(length(min = 1))]
        code: String,
    }

    #[test]
    fn valid_request_passes_through() {
        let request = Request {
            name: "Widget".to_string(),
            quantity: 1,
            code: "A".to_string(),
        };

        assert!(request.validated().is_ok());
    }

    #[test]
    fn failures_are_joined_into_one_brief() {
        let request = Request {
            name: String::new(),
            quantity: 0,
            code: String::new(),
        };

        let error = request.validated().err();

        assert_eq!(
            error.map(|error| error.brief),
            Some("Name is required, Quantity must be at least 1, code is invalid".to_string())
        );
    }

    #[derive(Debug, Validate, serde::Serialize)]
    struct Line {
        #[validate(range(min = 1, message = "Quantity must be at least 1"))]
        quantity: u64,
    }

    #[derive(Debug, Validate)]
    struct Order {
        #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
        items: Vec<Line>,
    }

    #[test]
    fn nested_failures_are_reported_once() {
        let order = Order {
            items: vec![Line { quantity: 0 }, Line { quantity: 0 }],
        };

        let error = order.validated().err();

        assert_eq!(
            error.map(|error| error.brief),
            Some("Quantity must be at least 1".to_string())
        );
    }
}
