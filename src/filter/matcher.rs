use super::parser::{DisjunctionGroup, FilterExpression};
use crate::source::Record;
use std::collections::BTreeMap;

/// Evaluate a conjunction set and an optional disjunction group against a record.
///
/// Every conjunction entry must equal the record's value (a missing field never
/// matches). When a non-empty group is present, at least one of its
/// alternatives must also match, whatever the conjunction result.
pub fn matches(
    record: &Record,
    conjunction: &BTreeMap<String, String>,
    disjunction: Option<&DisjunctionGroup>,
) -> bool {
    let conjunction_holds = conjunction
        .iter()
        .all(|(field, value)| record.get(field) == Some(value.as_str()));
    if !conjunction_holds {
        return false;
    }

    match disjunction {
        Some(group) if !group.is_empty() => group.alternatives().iter().any(|(field, values)| {
            record
                .get(field)
                .is_some_and(|actual| values.contains(actual))
        }),
        _ => true,
    }
}

impl FilterExpression {
    /// Check whether a record satisfies this expression
    pub fn matches(&self, record: &Record) -> bool {
        matches(record, &self.conjunction, self.disjunction.as_ref())
    }
}

/// Records satisfying the expression, in source order
pub fn filter_records<'a>(
    records: &'a [Record],
    expr: &'a FilterExpression,
) -> impl Iterator<Item = &'a Record> + 'a {
    records.iter().filter(move |record| expr.matches(record))
}
