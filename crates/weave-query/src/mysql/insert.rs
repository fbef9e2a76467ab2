//! The MySQL `INSERT` and `REPLACE` builder.

use std::marker::PhantomData;

use crate::{
    builder::QueryBuilder,
    clause::Rows,
    escape,
    lint::LintIssue,
    statement::StatementKind,
};

use super::{
    select::SelectQuery,
    state::{Assignments, ColumnList, Complete, Empty, FromSelect, Values},
};

/// Builds a MySQL `INSERT` or `REPLACE` statement.
///
/// # Type Parameters
///
/// - `S`: which body has been chosen ([`Empty`], [`Values`], [`Assignments`] or
///   [`FromSelect`]). The body methods move the builder from `Empty` into one of the others
///   and only `to_sql` on a complete state is available.
///
/// # Example
///
/// ```
/// use weave_query::mysql::InsertQuery;
///
/// let sql = InsertQuery::into("users")
///     .ignore()
///     .columns(["name", "age"])
///     .values(["'Bob'", "30"])
///     .values(["'Alice'", "31"])
///     .to_sql();
///
/// assert_eq!(
///     sql,
///     "INSERT IGNORE INTO `users` (`name`, `age`) VALUES ('Bob', 30), ('Alice', 31)"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct InsertQuery<S = Empty> {
    builder: QueryBuilder,
    kind: StatementKind,
    _state: PhantomData<S>,
}

impl InsertQuery<Empty> {
    /// Starts an `INSERT INTO table`.
    pub fn into(table: &str) -> Self {
        Self::start(StatementKind::Insert, table)
    }

    /// Starts a `REPLACE INTO table`.
    pub fn replace_into(table: &str) -> Self {
        Self::start(StatementKind::Replace, table)
    }

    fn start(kind: StatementKind, table: &str) -> Self {
        let mut builder = QueryBuilder::new();
        builder.sql_into(escape::escape_location_reference(table));
        Self {
            builder,
            kind,
            _state: PhantomData,
        }
    }

    /// Adds the first row of a `VALUES` body.
    pub fn values<I, V>(self, row: I) -> InsertQuery<Values>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.transition::<Values>().values(row)
    }

    /// Adds the first pair of a `SET` body.
    pub fn set(self, column: &str, value: impl Into<String>) -> InsertQuery<Assignments> {
        self.transition::<Assignments>().set(column, value)
    }

    /// Uses the rows of `query` as the body.
    pub fn select(mut self, query: &SelectQuery) -> InsertQuery<FromSelect> {
        self.builder.sql_select_statement(query.to_sql());
        self.transition()
    }
}

impl InsertQuery<Values> {
    /// Adds another row.
    pub fn values<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.builder.sql_values(Rows::single(row));
        self
    }
}

impl InsertQuery<Assignments> {
    pub fn set(mut self, column: &str, value: impl Into<String>) -> Self {
        self.builder
            .sql_insert_set([(escape::escape_location_reference(column), value.into())]);
        self
    }
}

impl<S: ColumnList> InsertQuery<S> {
    pub fn columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        self.builder.sql_column_names(
            columns
                .into_iter()
                .map(|c| escape::escape_location_reference(c.as_ref())),
        );
        self
    }
}

impl<S> InsertQuery<S> {
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.builder.sql_insert_mode(mode);
        self
    }

    pub fn ignore(self) -> Self {
        self.mode("IGNORE")
    }

    pub fn low_priority(self) -> Self {
        self.mode("LOW_PRIORITY")
    }

    pub fn high_priority(self) -> Self {
        self.mode("HIGH_PRIORITY")
    }

    pub fn delayed(self) -> Self {
        self.mode("DELAYED")
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn lint(&self) -> Vec<LintIssue> {
        self.builder.lint(self.kind)
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    fn transition<T>(self) -> InsertQuery<T> {
        InsertQuery {
            builder: self.builder,
            kind: self.kind,
            _state: PhantomData,
        }
    }
}

impl<S: Complete> InsertQuery<S> {
    pub fn to_sql(&self) -> String {
        self.builder.get_query(self.kind)
    }

    pub fn into_builder(self) -> QueryBuilder {
        self.builder
    }
}
