//! MySQL statement builders.
//!
//! Each statement has its own builder with chainable methods that escape identifiers and
//! forward the resulting fragments to a [`QueryBuilder`]:
//!
//! - [`SelectQuery`] builds `SELECT` statements, including joins, grouping, locking and
//!   compound parts.
//! - [`InsertQuery`] builds `INSERT` and `REPLACE` statements. The body kind is tracked in
//!   the type, so a `VALUES` body and a `SET` body cannot be mixed.
//! - [`UpdateQuery`] builds single and multi-table `UPDATE` statements.
//! - [`DeleteQuery`] builds single and multi-table `DELETE` statements.
//!
//! Conditions and joins are shared through the [`Filterable`] and [`Joinable`] traits.
//! Values are never escaped here; pass them already quoted.
//!
//! # Example
//!
//! ```
//! use weave_query::mysql::{Filterable, JoinKind, Joinable, SelectQuery};
//!
//! let sql = SelectQuery::from("users", "u")
//!     .column("u.id", "")
//!     .join(JoinKind::Left, "posts", "p")
//!     .on("p.user_id", "=", "u.id")
//!     .filter("u.active", "=", "1")
//!     .order_by("u.id", false)
//!     .limit(10)
//!     .to_sql();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT `u`.`id` FROM `users` AS `u` LEFT JOIN `posts` AS `p` ON `p`.`user_id` = `u`.`id` \
//!      WHERE `u`.`active` = 1 ORDER BY `u`.`id` DESC LIMIT 10"
//! );
//! ```

use std::fmt;

use crate::{
    builder::QueryBuilder,
    clause::{ConditionBase, Connector},
    escape,
};

pub mod delete;
pub mod hint;
pub mod insert;
pub mod select;
pub mod state;
pub mod update;

pub use delete::DeleteQuery;
pub use hint::{HintAction, HintScope, IndexHint};
pub use insert::InsertQuery;
pub use select::SelectQuery;
pub use update::UpdateQuery;

/// Join types understood by MySQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
    Natural,
    NaturalLeft,
    NaturalRight,
    Straight,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Cross => "CROSS",
            JoinKind::Natural => "NATURAL",
            JoinKind::NaturalLeft => "NATURAL LEFT",
            JoinKind::NaturalRight => "NATURAL RIGHT",
            JoinKind::Straight => "STRAIGHT",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builders that accept `WHERE` conditions.
pub trait Filterable: Sized {
    #[doc(hidden)]
    fn builder_mut(&mut self) -> &mut QueryBuilder;

    /// Adds `column op value`. The column is escaped, the value is used verbatim.
    fn filter(mut self, column: &str, op: &str, value: impl Into<String>) -> Self {
        self.builder_mut().sql_condition(
            escape::escape_location_reference(column),
            value,
            op,
            ConditionBase::Where,
        );
        self
    }

    /// Adds `column IN (v1,v2,..)`. An empty list adds a condition that is always false.
    fn filter_in<I, S>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = escape::list_value(values);
        if list.is_empty() {
            self.filter_raw("0 = 1")
        } else {
            self.filter(column, "IN", list)
        }
    }

    fn filter_null(self, column: &str) -> Self {
        self.filter(column, "IS NULL", "")
    }

    fn filter_not_null(self, column: &str) -> Self {
        self.filter(column, "IS NOT NULL", "")
    }

    /// Adds `column op (sub-query)`.
    fn filter_sub(self, column: &str, op: &str, query: &SelectQuery) -> Self {
        self.filter(column, op, escape::query_value(&query.to_sql()))
    }

    /// Adds a condition written by hand.
    fn filter_raw(mut self, expr: impl Into<String>) -> Self {
        self.builder_mut()
            .sql_condition(expr, "", "", ConditionBase::Where);
        self
    }

    /// Joins the next condition with `AND`.
    fn and(mut self) -> Self {
        self.builder_mut().sql_connector(Connector::And);
        self
    }

    /// Joins the next condition with `OR`.
    fn or(mut self) -> Self {
        self.builder_mut().sql_connector(Connector::Or);
        self
    }
}

/// Builders that accept joins.
pub trait Joinable: Filterable {
    fn join(mut self, kind: JoinKind, table: &str, alias: &str) -> Self {
        self.builder_mut()
            .sql_join(escape::table(table, alias), kind.as_str(), &[]);
        self
    }

    /// Adds `left op right` to the latest join. Both sides are column references.
    fn on(mut self, left: &str, op: &str, right: &str) -> Self {
        self.builder_mut().sql_condition(
            escape::escape_location_reference(left),
            escape::escape_location_reference(right),
            op,
            ConditionBase::On,
        );
        self
    }

    /// Attaches an index hint to the latest joined table, or to the FROM table.
    fn index_hint(mut self, hint: IndexHint) -> Self {
        if !self.builder_mut().hint_latest_table(&hint.to_string()) {
            tracing::debug!("index hint `{}` has no table to attach to", hint);
        }
        self
    }
}
