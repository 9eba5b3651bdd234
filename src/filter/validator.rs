use super::error::UnknownFieldsError;
use super::parser::FilterExpression;
use std::collections::HashSet;

/// Fields referenced by the filter or the selection list that the header lacks.
///
/// Filter fields come first, then selection fields; each name is listed once.
pub fn unknown_fields(
    expr: &FilterExpression,
    selection: &[String],
    header: &[String],
) -> Vec<String> {
    let known: HashSet<&str> = header.iter().map(String::as_str).collect();
    let mut reported = HashSet::new();

    expr.referenced_fields()
        .chain(selection.iter().map(String::as_str))
        .filter(|field| !known.contains(field))
        .filter(|field| reported.insert(*field))
        .map(str::to_string)
        .collect()
}

/// Fail if any referenced field is missing from the header
pub fn validate_fields(
    expr: &FilterExpression,
    selection: &[String],
    header: &[String],
) -> Result<(), UnknownFieldsError> {
    let fields = unknown_fields(expr, selection, header);
    if fields.is_empty() {
        Ok(())
    } else {
        Err(UnknownFieldsError { fields })
    }
}
