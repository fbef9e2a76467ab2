//! The MySQL `UPDATE` builder.

use crate::{builder::QueryBuilder, escape, lint::LintIssue, statement::StatementKind};

use super::{Filterable, Joinable};

/// Builds a MySQL `UPDATE` statement.
///
/// With a single table and no join, `order_by` and `limit` are rendered; a multi-table
/// update drops them.
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    builder: QueryBuilder,
}

impl UpdateQuery {
    pub fn table(table: &str) -> Self {
        let mut builder = QueryBuilder::new();
        builder.sql_update(escape::table(table, ""));
        Self { builder }
    }

    /// Adds another target table, making this a multi-table update.
    pub fn also(mut self, table: &str) -> Self {
        self.builder.sql_update(escape::table(table, ""));
        self
    }

    pub fn set(mut self, column: &str, value: impl Into<String>) -> Self {
        self.builder
            .sql_set([(escape::escape_location_reference(column), value.into())]);
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
        self.builder.sql_update_mode(mode);
        self
    }

    pub fn ignore(self) -> Self {
        self.mode("IGNORE")
    }

    pub fn low_priority(self) -> Self {
        self.mode("LOW_PRIORITY")
    }

    pub fn to_sql(&self) -> String {
        self.builder.get_update_query()
    }

    pub fn lint(&self) -> Vec<LintIssue> {
        self.builder.lint(StatementKind::Update)
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    pub fn into_builder(self) -> QueryBuilder {
        self.builder
    }
}

impl Filterable for UpdateQuery {
    fn builder_mut(&mut self) -> &mut QueryBuilder {
        &mut self.builder
    }
}

impl Joinable for UpdateQuery {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mysql::JoinKind;

    #[test]
    fn test_single_table_update() {
        let sql = UpdateQuery::table("users")
            .low_priority()
            .set("name", "'Bob'")
            .set("updated_at", "NOW()")
            .filter("id", "=", "1")
            .order_by("id", true)
            .limit(1)
            .to_sql();

        assert_eq!(
            sql,
            "UPDATE LOW_PRIORITY `users` SET `name` = 'Bob', `updated_at` = NOW() \
             WHERE `id` = 1 ORDER BY `id` ASC LIMIT 1"
        );
    }

    #[test]
    fn test_multi_table_update() {
        let query = UpdateQuery::table("users")
            .also("teams")
            .set("users.team_name", "`teams`.`name`")
            .filter("users.team_id", "=", "`teams`.`id`")
            .limit(5);

        assert_eq!(
            query.to_sql(),
            "UPDATE `users`, `teams` SET `users`.`team_name` = `teams`.`name` \
             WHERE `users`.`team_id` = `teams`.`id`"
        );
        assert_eq!(query.lint().len(), 1);
    }

    #[test]
    fn test_joined_update() {
        let sql = UpdateQuery::table("users")
            .ignore()
            .join(JoinKind::Inner, "teams", "t")
            .on("t.id", "=", "users.team_id")
            .set("users.active", "0")
            .filter("t.disabled", "=", "1")
            .to_sql();

        assert_eq!(
            sql,
            "UPDATE IGNORE `users` INNER JOIN `teams` AS `t` ON `t`.`id` = `users`.`team_id` \
             SET `users`.`active` = 0 WHERE `t`.`disabled` = 1"
        );
    }

    #[test]
    fn test_update_without_set_is_linted() {
        let query = UpdateQuery::table("users").filter("id", "=", "1");
        assert!(query.lint().iter().any(LintIssue::is_error));
    }
}
