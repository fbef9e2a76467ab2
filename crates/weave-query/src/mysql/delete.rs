//! The MySQL `DELETE` builder.

use crate::{builder::QueryBuilder, escape, lint::LintIssue, statement::StatementKind};

use super::{Filterable, Joinable};

/// Builds a MySQL `DELETE` statement.
///
/// Naming explicit targets with [`DeleteQuery::target`], or adding a join, turns it into a
/// multi-table delete, which drops `order_by` and `limit`.
#[derive(Debug, Clone)]
pub struct DeleteQuery {
    builder: QueryBuilder,
}

impl DeleteQuery {
    pub fn from(table: &str) -> Self {
        let mut builder = QueryBuilder::new();
        builder.sql_from(escape::table(table, ""), &[]);
        Self { builder }
    }

    /// Adds a table rows are deleted from.
    pub fn target(mut self, table: &str) -> Self {
        self.builder
            .sql_delete(escape::escape_location_reference(table));
        self
    }

    pub fn order_by(mut self, column: &str, asc: bool) -> Self {
        self.builder
            .sql_order_by(escape::escape_location_reference(column), asc);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.builder.sql_limit(limit, None);
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.builder.sql_delete_mode(mode);
        self
    }

    pub fn quick(self) -> Self {
        self.mode("QUICK")
    }

    pub fn ignore(self) -> Self {
        self.mode("IGNORE")
    }

    pub fn low_priority(self) -> Self {
        self.mode("LOW_PRIORITY")
    }

    pub fn to_sql(&self) -> String {
        self.builder.get_delete_query()
    }

    pub fn lint(&self) -> Vec<LintIssue> {
        self.builder.lint(StatementKind::Delete)
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    pub fn into_builder(self) -> QueryBuilder {
        self.builder
    }
}

impl Filterable for DeleteQuery {
    fn builder_mut(&mut self) -> &mut QueryBuilder {
        &mut self.builder
    }
}

impl Joinable for DeleteQuery {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mysql::JoinKind;

    #[test]
    fn test_single_table_delete() {
        let sql = DeleteQuery::from("sessions")
            .low_priority()
            .quick()
            .filter("expires_at", "<", "NOW()")
            .order_by("expires_at", true)
            .limit(100)
            .to_sql();

        assert_eq!(
            sql,
            "DELETE LOW_PRIORITY QUICK FROM `sessions` WHERE `expires_at` < NOW() \
             ORDER BY `expires_at` ASC LIMIT 100"
        );
    }

    #[test]
    fn test_multi_table_delete() {
        let query = DeleteQuery::from("users")
            .target("users")
            .target("posts")
            .join(JoinKind::Inner, "posts", "")
            .on("posts.user_id", "=", "users.id")
            .filter("users.banned", "=", "1")
            .order_by("users.id", true);

        assert_eq!(
            query.to_sql(),
            "DELETE `users`, `posts` FROM `users` INNER JOIN `posts` ON `posts`.`user_id` = `users`.`id` \
             WHERE `users`.`banned` = 1"
        );
        assert_eq!(
            query.lint(),
            vec![LintIssue::IgnoredOrderLimit {
                kind: StatementKind::Delete
            }]
        );
    }
}
