//! Internal representation of query clauses.
//!
//! The builder keeps every clause in one of these typed buffers and renders them only when a
//! statement getter asks for them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Logical operator joining a condition to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Connector {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Connector::And),
            "OR" => Ok(Connector::Or),
            other => Err(QueryError::InvalidConnector(other.to_string())),
        }
    }
}

/// Clause a condition is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionBase {
    #[default]
    Where,
    Having,
    /// The `ON` clause of the most recent join.
    On,
}

/// Set operation combining a SELECT with another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundOp {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl CompoundOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompoundOp::Union => "UNION",
            CompoundOp::UnionAll => "UNION ALL",
            CompoundOp::Intersect => "INTERSECT",
            CompoundOp::Except => "EXCEPT",
        }
    }
}

impl fmt::Display for CompoundOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `left operator right` predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Condition {
    pub connector: Connector,
    pub left: String,
    pub operator: String,
    pub right: String,
}

impl Condition {
    pub fn render(&self) -> String {
        [&self.left, &self.operator, &self.right]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An ordered list of conditions. The connector of the first entry is never rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ConditionList(Vec<Condition>);

impl ConditionList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, condition: Condition) {
        self.0.push(condition);
    }

    /// Renders `KEYWORD c1 AND c2 OR c3`, or an empty string.
    pub fn render(&self, keyword: &str) -> String {
        let mut out = String::new();
        for (idx, condition) in self.0.iter().enumerate() {
            if idx == 0 {
                out.push_str(keyword);
            } else {
                out.push(' ');
                out.push_str(condition.connector.as_str());
            }
            out.push(' ');
            out.push_str(&condition.render());
        }
        out
    }
}

/// A table reference followed by its index hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableRef {
    pub table: String,
    pub hints: Vec<String>,
}

impl TableRef {
    pub fn new(table: impl Into<String>, hints: &[&str]) -> Self {
        let mut table_ref = Self {
            table: table.into(),
            hints: Vec::new(),
        };
        for hint in hints {
            table_ref.add_hint(hint);
        }
        table_ref
    }

    /// Appends a hint unless it is blank or already present.
    pub fn add_hint(&mut self, hint: &str) {
        let hint = hint.trim();
        if !hint.is_empty() && !self.hints.iter().any(|h| h == hint) {
            self.hints.push(hint.to_string());
        }
    }

    pub fn render(&self) -> String {
        if self.hints.is_empty() {
            self.table.clone()
        } else {
            format!("{} {}", self.table, self.hints.join(" "))
        }
    }
}

/// A JOIN with its own `ON` conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JoinClause {
    pub keyword: String,
    pub target: TableRef,
    pub on: ConditionList,
}

impl JoinClause {
    pub fn new(table: impl Into<String>, kind: &str, hints: &[&str]) -> Self {
        Self {
            keyword: join_keyword(kind),
            target: TableRef::new(table, hints),
            on: ConditionList::default(),
        }
    }

    /// Natural joins match on common column names and take no `ON`.
    pub fn is_natural(&self) -> bool {
        self.keyword.starts_with("NATURAL")
    }

    /// Outer joins are a syntax error without an `ON`.
    pub fn needs_on(&self) -> bool {
        self.keyword.starts_with("LEFT") || self.keyword.starts_with("RIGHT")
    }

    pub fn render(&self) -> String {
        let mut out = format!("{} {}", self.keyword, self.target.render());
        if !self.on.is_empty() {
            out.push(' ');
            out.push_str(&self.on.render("ON"));
        }
        out
    }
}

/// Normalizes a join type into its keyword: `left` becomes `LEFT JOIN`, `straight` becomes
/// `STRAIGHT_JOIN` and an empty type becomes a plain `JOIN`.
pub(crate) fn join_keyword(kind: &str) -> String {
    let kind = kind.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();
    let kind = kind.strip_suffix("JOIN").unwrap_or(&kind).trim_end();
    match kind {
        "" => "JOIN".to_string(),
        "STRAIGHT" | "STRAIGHT_" => "STRAIGHT_JOIN".to_string(),
        other => format!("{other} JOIN"),
    }
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderClause {
    pub expr: String,
    pub asc: bool,
}

impl OrderClause {
    pub fn render(&self) -> String {
        format!("{} {}", self.expr, if self.asc { "ASC" } else { "DESC" })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Limit {
    pub amount: u64,
    pub offset: Option<u64>,
}

impl Limit {
    pub fn render(&self) -> String {
        match self.offset {
            Some(offset) => format!("LIMIT {} OFFSET {}", self.amount, offset),
            None => format!("LIMIT {}", self.amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Compound {
    pub op: CompoundOp,
    pub query: String,
}

/// `column = value` pair of a SET clause. Both sides are used verbatim.
pub type Assignment = (String, String);

pub(crate) fn render_assignments(pairs: &[Assignment]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let body = pairs
        .iter()
        .map(|(column, value)| format!("{column} = {value}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SET {body}")
}

/// One or more rows of already escaped values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rows(pub Vec<Vec<String>>);

impl Rows {
    pub fn single<I, S>(row: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rows(vec![row.into_iter().map(Into::into).collect()])
    }

    pub fn many<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

impl From<Vec<String>> for Rows {
    fn from(row: Vec<String>) -> Self {
        Rows(vec![row])
    }
}

impl From<Vec<&str>> for Rows {
    fn from(row: Vec<&str>) -> Self {
        Rows::single(row)
    }
}

impl<const N: usize> From<[&str; N]> for Rows {
    fn from(row: [&str; N]) -> Self {
        Rows::single(row)
    }
}

impl From<Vec<Vec<String>>> for Rows {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Rows(rows)
    }
}

impl From<Vec<Vec<&str>>> for Rows {
    fn from(rows: Vec<Vec<&str>>) -> Self {
        Rows::many(rows)
    }
}

/// The body of an INSERT or REPLACE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertBody {
    /// `VALUES (..), (..)`
    Values(Vec<Vec<String>>),
    /// `SET a = 1, b = 2`
    Set(Vec<Assignment>),
    /// `INSERT .. SELECT ..`
    Select(String),
}

impl InsertBody {
    pub fn kind(&self) -> InsertBodyKind {
        match self {
            InsertBody::Values(_) => InsertBodyKind::Values,
            InsertBody::Set(_) => InsertBodyKind::Set,
            InsertBody::Select(_) => InsertBodyKind::Select,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertBodyKind {
    Values,
    Set,
    Select,
}

impl fmt::Display for InsertBodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InsertBodyKind::Values => "VALUES",
            InsertBodyKind::Set => "SET",
            InsertBodyKind::Select => "SELECT",
        };
        f.write_str(name)
    }
}

pub(crate) fn render_rows(rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let body = rows
        .iter()
        .map(|row| format!("({})", row.join(", ")))
        .collect::<Vec<_>>()
        .join(", ");
    format!("VALUES {body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_keyword() {
        assert_eq!(join_keyword("left"), "LEFT JOIN");
        assert_eq!(join_keyword("Left Outer"), "LEFT OUTER JOIN");
        assert_eq!(join_keyword("straight"), "STRAIGHT_JOIN");
        assert_eq!(join_keyword("STRAIGHT_JOIN"), "STRAIGHT_JOIN");
        assert_eq!(join_keyword("inner join"), "INNER JOIN");
        assert_eq!(join_keyword(""), "JOIN");
        assert_eq!(join_keyword("natural left"), "NATURAL LEFT JOIN");
    }

    #[test]
    fn test_table_ref_hints_are_deduplicated() {
        let table = TableRef::new("users", &["USE INDEX (a)", "", "USE INDEX (a)", " FORCE INDEX (b) "]);
        assert_eq!(table.render(), "users USE INDEX (a) FORCE INDEX (b)");
    }

    #[test]
    fn test_condition_list_render() {
        let mut list = ConditionList::default();
        assert_eq!(list.render("WHERE"), "");

        for (connector, left) in [(Connector::Or, "a"), (Connector::Or, "b"), (Connector::And, "c")] {
            list.push(Condition {
                connector,
                left: left.into(),
                operator: "=".into(),
                right: "1".into(),
            });
        }
        assert_eq!(list.render("WHERE"), "WHERE a = 1 OR b = 1 AND c = 1");
    }

    #[test]
    fn test_condition_without_right_side() {
        let condition = Condition {
            connector: Connector::And,
            left: "deleted_at".into(),
            operator: "IS NULL".into(),
            right: String::new(),
        };
        assert_eq!(condition.render(), "deleted_at IS NULL");
    }

    #[test]
    fn test_connector_from_str() {
        assert_eq!("or".parse::<Connector>().unwrap(), Connector::Or);
        assert_eq!(" AND ".parse::<Connector>().unwrap(), Connector::And);
        assert!("xor".parse::<Connector>().is_err());
    }

    #[test]
    fn test_rows_conversions() {
        assert_eq!(Rows::from(["a", "b"]).0, vec![vec!["a".to_string(), "b".to_string()]]);
        assert_eq!(Rows::from(vec![vec!["1"], vec!["2"]]).0.len(), 2);
        assert_eq!(render_rows(&Rows::from(vec![vec!["1", "2"], vec!["3", "4"]]).0), "VALUES (1, 2), (3, 4)");
    }
}
