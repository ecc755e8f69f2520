use validator::{ValidationErrors, ValidationErrorsKind};

/// Flattens `validator` errors into one `; `-separated message.
///
/// Nested structs and list items are included, prefixed with their path
/// (e.g. `records[2]: idempotencyKey is required`).
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages.join("; ")
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"));
                    if prefix.is_empty() {
                        out.push(message);
                    } else {
                        out.push(format!("{prefix}: {message}"));
                    }
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                collect(inner, &join(prefix, field), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{}[{index}]", join(prefix, field)), out);
                }
            }
        }
    }
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_owned()
    } else {
        format!("{prefix}.{field}")
    }
}
