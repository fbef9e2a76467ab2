//! The MySQL `SELECT` builder.

use crate::{
    builder::QueryBuilder,
    clause::{CompoundOp, ConditionBase},
    escape,
    lint::LintIssue,
    statement::StatementKind,
};

use super::{Filterable, Joinable};

/// Largest row count MySQL accepts, used when only an offset is given.
const MAX_ROWS: u64 = u64::MAX;

/// Builds a MySQL `SELECT` statement.
///
/// Constructed via [`SelectQuery::from`], then chained with `.column()`, `.filter()`,
/// `.order_by()` and friends. Identifiers are escaped; values are used verbatim.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    builder: QueryBuilder,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQuery {
    /// Starts a new query on the given table, with an optional alias.
    pub fn from(table: &str, alias: &str) -> Self {
        let mut builder = QueryBuilder::new();
        builder.sql_from(escape::table(table, alias), &[]);
        Self {
            builder,
            limit: None,
            offset: None,
        }
    }

    /// Adds another table to FROM.
    pub fn also_from(mut self, table: &str, alias: &str) -> Self {
        self.builder.sql_from(escape::table(table, alias), &[]);
        self
    }

    /// Selects a column, optionally aliased.
    pub fn column(mut self, column: &str, alias: &str) -> Self {
        self.builder.sql_select(escape::result_column(column, alias));
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for column in columns {
            self.builder
                .sql_select(escape::result_column(column.as_ref(), ""));
        }
        self
    }

    /// Selects a raw expression such as `COUNT(*) AS total`.
    pub fn expr(mut self, expr: impl Into<String>) -> Self {
        self.builder.sql_select(expr);
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.builder.sql_select_mode(mode);
        self
    }

    pub fn distinct(self) -> Self {
        self.mode("DISTINCT")
    }

    pub fn high_priority(self) -> Self {
        self.mode("HIGH_PRIORITY")
    }

    pub fn straight_join(self) -> Self {
        self.mode("STRAIGHT_JOIN")
    }

    pub fn sql_no_cache(self) -> Self {
        self.mode("SQL_NO_CACHE")
    }

    pub fn sql_calc_found_rows(self) -> Self {
        self.mode("SQL_CALC_FOUND_ROWS")
    }

    /// Adds a HAVING condition. `expr` is used verbatim since it is usually an aggregate.
    pub fn having(mut self, expr: &str, op: &str, value: impl Into<String>) -> Self {
        self.builder
            .sql_condition(expr, value, op, ConditionBase::Having);
        self
    }

    pub fn group_by(mut self, column: &str) -> Self {
        self.builder
            .sql_group_by(escape::escape_location_reference(column));
        self
    }

    pub fn order_by(mut self, column: &str, asc: bool) -> Self {
        self.builder
            .sql_order_by(escape::escape_location_reference(column), asc);
        self
    }

    /// Limit the number of results
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self.apply_limit();
        self
    }

    /// Set query offset
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self.apply_limit();
        self
    }

    /// Set pagination params. Pages start at 1.
    pub fn page(mut self, page: u64, per_page: u64) -> Self {
        self.limit = Some(per_page);
        self.offset = Some(page.saturating_sub(1).saturating_mul(per_page));
        self.apply_limit();
        self
    }

    fn apply_limit(&mut self) {
        let amount = self.limit.unwrap_or(MAX_ROWS);
        self.builder.sql_limit(amount, self.offset);
    }

    pub fn for_update(mut self) -> Self {
        self.builder.sql_lock_mode("FOR UPDATE");
        self
    }

    pub fn lock_in_share_mode(mut self) -> Self {
        self.builder.sql_lock_mode("LOCK IN SHARE MODE");
        self
    }

    pub fn union(self, other: &SelectQuery) -> Self {
        self.compound(other, CompoundOp::Union)
    }

    pub fn union_all(self, other: &SelectQuery) -> Self {
        self.compound(other, CompoundOp::UnionAll)
    }

    pub fn intersect(self, other: &SelectQuery) -> Self {
        self.compound(other, CompoundOp::Intersect)
    }

    pub fn except(self, other: &SelectQuery) -> Self {
        self.compound(other, CompoundOp::Except)
    }

    fn compound(mut self, other: &SelectQuery, op: CompoundOp) -> Self {
        self.builder
            .sql_compound(escape::query_value(&other.to_sql()), op);
        self
    }

    pub fn to_sql(&self) -> String {
        self.builder.get_select_query()
    }

    pub fn lint(&self) -> Vec<LintIssue> {
        self.builder.lint(StatementKind::Select)
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    pub fn into_builder(self) -> QueryBuilder {
        self.builder
    }
}

impl Filterable for SelectQuery {
    fn builder_mut(&mut self) -> &mut QueryBuilder {
        &mut self.builder
    }
}

impl Joinable for SelectQuery {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mysql::JoinKind;

    #[test]
    fn test_select_all() {
        assert_eq!(SelectQuery::from("users", "").to_sql(), "SELECT * FROM `users`");
    }

    #[test]
    fn test_columns_and_aliases() {
        let sql = SelectQuery::from("app.users", "u")
            .column("u.id", "user_id")
            .columns(["u.name", "u.email"])
            .expr("COUNT(*) AS total")
            .to_sql();

        assert_eq!(
            sql,
            "SELECT `u`.`id` AS `user_id`, `u`.`name`, `u`.`email`, COUNT(*) AS total \
             FROM `app`.`users` AS `u`"
        );
    }

    #[test]
    fn test_modes_are_deduplicated() {
        let sql = SelectQuery::from("users", "")
            .distinct()
            .sql_no_cache()
            .mode("distinct")
            .to_sql();

        assert_eq!(sql, "SELECT DISTINCT SQL_NO_CACHE * FROM `users`");
    }

    #[test]
    fn test_group_having_order() {
        let sql = SelectQuery::from("posts", "")
            .column("user_id", "")
            .expr("COUNT(*) AS total")
            .group_by("user_id")
            .having("COUNT(*)", ">", "5")
            .order_by("total", false)
            .to_sql();

        assert_eq!(
            sql,
            "SELECT `user_id`, COUNT(*) AS total FROM `posts` GROUP BY `user_id` \
             HAVING COUNT(*) > 5 ORDER BY `total` DESC"
        );
    }

    #[test]
    fn test_limit_and_offset() {
        let query = SelectQuery::from("users", "").limit(10).offset(20);
        assert_eq!(query.to_sql(), "SELECT * FROM `users` LIMIT 10 OFFSET 20");

        let query = SelectQuery::from("users", "").offset(5);
        assert_eq!(
            query.to_sql(),
            "SELECT * FROM `users` LIMIT 18446744073709551615 OFFSET 5"
        );
    }

    #[test]
    fn test_page() {
        let sql = SelectQuery::from("users", "").page(3, 25).to_sql();
        assert_eq!(sql, "SELECT * FROM `users` LIMIT 25 OFFSET 50");

        let sql = SelectQuery::from("users", "").page(0, 25).to_sql();
        assert_eq!(sql, "SELECT * FROM `users` LIMIT 25 OFFSET 0");
    }

    #[test]
    fn test_locking() {
        let sql = SelectQuery::from("users", "")
            .filter("id", "=", "1")
            .for_update()
            .to_sql();
        assert_eq!(sql, "SELECT * FROM `users` WHERE `id` = 1 FOR UPDATE");

        let sql = SelectQuery::from("users", "").lock_in_share_mode().to_sql();
        assert_eq!(sql, "SELECT * FROM `users` LOCK IN SHARE MODE");
    }

    #[test]
    fn test_compound_queries() {
        let admins = SelectQuery::from("admins", "").column("id", "");
        let guests = SelectQuery::from("guests", "").column("id", "");

        let sql = SelectQuery::from("users", "")
            .column("id", "")
            .union(&admins)
            .except(&guests)
            .to_sql();

        assert_eq!(
            sql,
            "(SELECT `id` FROM `users`) UNION (SELECT `id` FROM `admins`) \
             EXCEPT (SELECT `id` FROM `guests`)"
        );
    }

    #[test]
    fn test_or_connector() {
        let sql = SelectQuery::from("users", "")
            .filter("role", "=", "'admin'")
            .or()
            .filter("role", "=", "'owner'")
            .and()
            .filter("active", "=", "1")
            .to_sql();

        assert_eq!(
            sql,
            "SELECT * FROM `users` WHERE `role` = 'admin' OR `role` = 'owner' AND `active` = 1"
        );
    }

    #[test]
    fn test_lint_reports_outer_join_without_on() {
        let query = SelectQuery::from("users", "").join(JoinKind::Left, "posts", "");
        assert_eq!(query.lint().len(), 1);
        assert!(query.lint()[0].is_error());
    }
}
