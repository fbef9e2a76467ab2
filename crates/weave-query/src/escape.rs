//! Identifier quoting and reference helpers.
//!
//! Engine builders use these to turn user supplied names into clause fragments before
//! handing them to the [`crate::QueryBuilder`] setters. Only identifiers are quoted here;
//! values must already be escaped by the caller.

/// Quotes a single identifier with back-ticks, doubling embedded back-ticks.
pub fn quote_identifier(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quotes every segment of a dotted reference such as `db.table.col`.
///
/// `*` segments are left bare and empty segments are dropped, so `.col` yields `` `col` ``.
///
/// ```
/// use weave_query::escape::escape_location_reference;
///
/// assert_eq!(escape_location_reference("db.users.id"), "`db`.`users`.`id`");
/// assert_eq!(escape_location_reference("users.*"), "`users`.*");
/// ```
pub fn escape_location_reference(reference: &str) -> String {
    reference
        .split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if segment == "*" {
                segment.to_string()
            } else {
                quote_identifier(segment)
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// A column reference with an optional collation.
pub fn column(name: &str, collation: &str) -> String {
    let escaped = escape_location_reference(name);
    if collation.trim().is_empty() {
        escaped
    } else {
        format!("{} COLLATE {}", escaped, collation.trim())
    }
}

/// A select-list entry with an optional alias. Wildcards never get an alias.
pub fn result_column(col: &str, alias: &str) -> String {
    let escaped = escape_location_reference(col);
    if alias.trim().is_empty() || escaped.ends_with('*') {
        escaped
    } else {
        format!("{} AS {}", escaped, quote_identifier(alias.trim()))
    }
}

/// A table reference with an optional alias.
pub fn table(name: &str, alias: &str) -> String {
    let escaped = escape_location_reference(name);
    if alias.trim().is_empty() {
        escaped
    } else {
        format!("{} AS {}", escaped, quote_identifier(alias.trim()))
    }
}

/// Renders `(v1,v2,...)`, or an empty string when there is nothing to list.
pub fn list_value<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items = values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .collect::<Vec<_>>();
    if items.is_empty() {
        String::new()
    } else {
        format!("({})", items.join(","))
    }
}

/// Wraps a sub-query in parentheses, or returns an empty string for an empty expression.
pub fn query_value(expr: &str) -> String {
    let expr = expr.trim();
    if expr.is_empty() {
        String::new()
    } else {
        format!("({expr})")
    }
}

/// Reads the leading integer of `value`: optional whitespace, an optional sign, then digits.
///
/// Anything unparsable yields `0` and out of range values saturate.
pub fn intvalue(value: &str) -> i64 {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let mut result: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(digit - b'0');
        result = if negative {
            result.saturating_mul(10).saturating_sub(digit)
        } else {
            result.saturating_mul(10).saturating_add(digit)
        };
    }
    result
}
