use super::error::FilterParseError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const GROUP_OPEN: &str = "or(";
const GROUP_CLOSE: char = ')';

/// Surface syntax of a filter expression
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterSyntax {
    /// `field,value;field,value;or(field,value;field,value)`
    #[default]
    OrWrapped,
    /// `field,value field,'value with space' "field 3","value 3"`
    Quoted,
}

/// Field/value alternatives of which at least one must hold
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisjunctionGroup {
    alternatives: BTreeMap<String, BTreeSet<String>>,
}

impl DisjunctionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an acceptable value for a field
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.alternatives
            .entry(field.into())
            .or_default()
            .insert(value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Field names referenced by the group
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.alternatives.keys().map(String::as_str)
    }

    /// Acceptable values per field
    pub fn alternatives(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.alternatives
    }
}

impl<F, V> FromIterator<(F, V)> for DisjunctionGroup
where
    F: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, V)>>(iter: I) -> Self {
        let mut group = DisjunctionGroup::new();
        for (field, value) in iter {
            group.insert(field, value);
        }
        group
    }
}

/// A parsed filter: required equalities plus an optional disjunction group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpression {
    /// Field -> exact value; every entry must match
    pub conjunction: BTreeMap<String, String>,
    /// At least one alternative must match when present
    pub disjunction: Option<DisjunctionGroup>,
}

impl FilterExpression {
    /// Create a new empty filter expression (matches every record)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a filter expression in the given syntax
    pub fn parse(input: &str, syntax: FilterSyntax) -> Result<Self, FilterParseError> {
        match syntax {
            FilterSyntax::OrWrapped => Self::parse_or_wrapped(input),
            FilterSyntax::Quoted => Self::parse_quoted(input),
        }
    }

    /// Parse `field,value;...;or(field,value;...)`.
    ///
    /// Segments without a comma or with an empty field name are skipped.
    /// An unclosed or repeated `or(` group is an error.
    pub fn parse_or_wrapped(input: &str) -> Result<Self, FilterParseError> {
        let (remainder, group_body) = extract_or_group(input)?;

        let conjunction = lenient_pairs(&remainder).collect();
        let disjunction = group_body
            .map(|body| lenient_pairs(body).collect::<DisjunctionGroup>())
            .filter(|group| !group.is_empty());

        Ok(FilterExpression {
            conjunction,
            disjunction,
        })
    }

    /// Parse whitespace-separated `field,value` tokens with optional quoting.
    ///
    /// All pairs are conjunctive. Any token that is not a well-formed pair
    /// fails the whole expression.
    pub fn parse_quoted(input: &str) -> Result<Self, FilterParseError> {
        let conjunction = tokenize_quoted(input)?.into_iter().collect();
        Ok(FilterExpression {
            conjunction,
            disjunction: None,
        })
    }

    /// Check if this expression is empty (no filters)
    pub fn is_empty(&self) -> bool {
        self.conjunction.is_empty() && self.disjunction.as_ref().is_none_or(|g| g.is_empty())
    }

    /// Every field name the expression refers to, conjunction first
    pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
        self.conjunction
            .keys()
            .map(String::as_str)
            .chain(self.disjunction.iter().flat_map(|g| g.fields()))
    }
}

/// Position of an `or(` that starts a segment, if any
fn find_group_start(input: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(offset) = input[search_from..].find(GROUP_OPEN) {
        let start = search_from + offset;
        let before = input[..start].trim_end();
        if before.is_empty() || before.ends_with(';') {
            return Some(start);
        }
        search_from = start + GROUP_OPEN.len();
    }
    None
}

/// Split the input into the text outside the `or(...)` group and the group body
fn extract_or_group(input: &str) -> Result<(String, Option<&str>), FilterParseError> {
    let Some(start) = find_group_start(input) else {
        return Ok((input.to_string(), None));
    };

    let body_start = start + GROUP_OPEN.len();
    let body_len =
        input[body_start..]
            .find(GROUP_CLOSE)
            .ok_or_else(|| FilterParseError::UnclosedGroup {
                input: input.to_string(),
            })?;
    let body = &input[body_start..body_start + body_len];

    let after = &input[body_start + body_len + GROUP_CLOSE.len_utf8()..];
    let remainder = format!("{}{}", &input[..start], after);

    if find_group_start(&remainder).is_some() {
        return Err(FilterParseError::MultipleGroups {
            input: input.to_string(),
        });
    }

    Ok((remainder, Some(body)))
}

/// `;`-separated pairs, split on the first comma, malformed segments dropped
fn lenient_pairs(text: &str) -> impl Iterator<Item = (String, String)> + '_ {
    text.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            let pair = segment
                .split_once(',')
                .map(|(field, value)| (field.trim(), value.trim()))
                .filter(|(field, _)| !field.is_empty());
            if pair.is_none() {
                log::debug!("skipping malformed filter segment '{}'", segment);
            }
            pair.map(|(field, value)| (field.to_string(), value.to_string()))
        })
}

/// Scan quoted `field,value` tokens separated by unquoted whitespace
fn tokenize_quoted(input: &str) -> Result<Vec<(String, String)>, FilterParseError> {
    let mut pairs = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut token = String::new();
        let mut field = String::new();
        let mut value: Option<String> = None;
        let mut quote: Option<char> = None;

        while let Some(&c) = chars.peek() {
            if quote.is_none() && c.is_whitespace() {
                break;
            }
            chars.next();
            token.push(c);

            match (quote, c) {
                (Some(open), c) if c == open => quote = None,
                (None, '\'' | '"') => quote = Some(c),
                (None, ',') if value.is_none() => value = Some(String::new()),
                _ => match value.as_mut() {
                    Some(value) => value.push(c),
                    None => field.push(c),
                },
            }
        }

        if let Some(quote) = quote {
            return Err(FilterParseError::UnterminatedQuote {
                input: input.to_string(),
                quote,
            });
        }

        let Some(value) = value else {
            return Err(FilterParseError::MalformedPair {
                input: input.to_string(),
                token,
            });
        };

        let field = field.trim();
        if field.is_empty() {
            return Err(FilterParseError::EmptyField {
                input: input.to_string(),
                token,
            });
        }

        pairs.push((field.to_string(), value.trim().to_string()));
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conj(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(f, v)| (f.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_filter_is_empty_expression() {
        for syntax in [FilterSyntax::OrWrapped, FilterSyntax::Quoted] {
            let expr = FilterExpression::parse("", syntax).unwrap();
            assert!(expr.is_empty());
            assert!(expr.disjunction.is_none());

            let expr = FilterExpression::parse("   ", syntax).unwrap();
            assert!(expr.is_empty());
        }
    }

    #[test]
    fn test_or_wrapped_conjunction_only() {
        let expr = FilterExpression::parse_or_wrapped("Company,Kalle; City , Boras ").unwrap();
        assert_eq!(
            expr.conjunction,
            conj(&[("Company", "Kalle"), ("City", "Boras")])
        );
        assert!(expr.disjunction.is_none());
    }

    #[test]
    fn test_or_wrapped_splits_on_first_comma() {
        let expr = FilterExpression::parse_or_wrapped("Address,Main St, 12").unwrap();
        assert_eq!(expr.conjunction, conj(&[("Address", "Main St, 12")]));
    }

    #[test]
    fn test_or_wrapped_group_anywhere() {
        let leading = FilterExpression::parse_or_wrapped("or(City,Boras;City,Lund);Company,Kalle")
            .unwrap();
        let middle = FilterExpression::parse_or_wrapped("Company,Kalle;or(City,Boras;City,Lund)")
            .unwrap();
        assert_eq!(leading, middle);
        assert_eq!(leading.conjunction, conj(&[("Company", "Kalle")]));

        let group = leading.disjunction.expect("group present");
        let cities = &group.alternatives()["City"];
        assert!(cities.contains("Boras"));
        assert!(cities.contains("Lund"));
    }

    #[test]
    fn test_or_wrapped_skips_malformed_segments() {
        let expr = FilterExpression::parse_or_wrapped("Company;,x;;City,Boras").unwrap();
        assert_eq!(expr.conjunction, conj(&[("City", "Boras")]));
    }

    #[test]
    fn test_or_wrapped_empty_group_is_absent() {
        let expr = FilterExpression::parse_or_wrapped("Company,Kalle;or(nothing)").unwrap();
        assert!(expr.disjunction.is_none());
    }

    #[test]
    fn test_or_wrapped_value_containing_or_paren_is_not_a_group() {
        let expr = FilterExpression::parse_or_wrapped("Note,or(maybe").unwrap();
        assert_eq!(expr.conjunction, conj(&[("Note", "or(maybe")]));
    }

    #[test]
    fn test_or_wrapped_unclosed_group() {
        let err = FilterExpression::parse_or_wrapped("or(City,Boras").unwrap_err();
        assert!(matches!(err, FilterParseError::UnclosedGroup { .. }));
    }

    #[test]
    fn test_or_wrapped_multiple_groups() {
        let err = FilterExpression::parse_or_wrapped("or(City,Boras);or(City,Lund)").unwrap_err();
        assert!(matches!(err, FilterParseError::MultipleGroups { .. }));
    }

    #[test]
    fn test_quoted_pairs() {
        let expr = FilterExpression::parse_quoted(
            r#"name1,value1 name2,'value with space' 'name 3',"value 3""#,
        )
        .unwrap();
        assert_eq!(
            expr.conjunction,
            conj(&[
                ("name1", "value1"),
                ("name2", "value with space"),
                ("name 3", "value 3"),
            ])
        );
        assert!(expr.disjunction.is_none());
    }

    #[test]
    fn test_quoted_commas_inside_quotes_are_literal() {
        let expr = FilterExpression::parse_quoted(r#""a,b","c,d" x,1,2"#).unwrap();
        assert_eq!(expr.conjunction, conj(&[("a,b", "c,d"), ("x", "1,2")]));
    }

    #[test]
    fn test_quoted_mixed_quote_characters() {
        let expr = FilterExpression::parse_quoted(r#"title,"it's here""#).unwrap();
        assert_eq!(expr.conjunction, conj(&[("title", "it's here")]));
    }

    #[test]
    fn test_quoted_missing_comma_is_error() {
        let err = FilterExpression::parse_quoted("Company,Kalle City").unwrap_err();
        assert_eq!(
            err,
            FilterParseError::MalformedPair {
                input: "Company,Kalle City".to_string(),
                token: "City".to_string(),
            }
        );
    }

    #[test]
    fn test_quoted_unterminated_quote_is_error() {
        let err = FilterExpression::parse_quoted("City,'New York").unwrap_err();
        assert!(matches!(
            err,
            FilterParseError::UnterminatedQuote { quote: '\'', .. }
        ));
    }

    #[test]
    fn test_quoted_empty_field_is_error() {
        let err = FilterExpression::parse_quoted(",value").unwrap_err();
        assert!(matches!(err, FilterParseError::EmptyField { .. }));
    }

    #[test]
    fn test_referenced_fields() {
        let expr = FilterExpression::parse_or_wrapped("b,1;a,2;or(c,3;a,4)").unwrap();
        let fields: Vec<&str> = expr.referenced_fields().collect();
        assert_eq!(fields, vec!["a", "b", "a", "c"]);
    }
}
