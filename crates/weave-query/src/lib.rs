pub mod builder;
pub mod clause;
pub mod error;
pub mod escape;
pub mod exec;
pub mod lint;
pub mod mysql;
pub mod statement;

pub use builder::QueryBuilder;
pub use clause::{Assignment, CompoundOp, ConditionBase, Connector, InsertBody, InsertBodyKind, Rows};
pub use error::{QueryError, Result};
pub use exec::{Driver, Executor, ResultSet};
pub use lint::LintIssue;
pub use statement::{Component, StatementKind};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mysql::{Filterable, InsertQuery, JoinKind, Joinable, SelectQuery};

    #[test]
    fn test_fluent_and_raw_builders_agree() {
        let fluent = SelectQuery::from("users", "")
            .column("id", "")
            .join(JoinKind::Left, "posts", "")
            .on("posts.user_id", "=", "users.id")
            .filter("users.active", "=", "1")
            .or()
            .filter("users.admin", "=", "1");

        let mut raw = QueryBuilder::new();
        raw.sql_select("`id`")
            .sql_from("`users`", &[])
            .sql_join("`posts`", "left", &[])
            .sql_condition("`posts`.`user_id`", "`users`.`id`", "=", ConditionBase::On)
            .sql_condition("`users`.`active`", "1", "=", ConditionBase::Where)
            .sql_connector(Connector::Or)
            .sql_condition("`users`.`admin`", "1", "=", ConditionBase::Where);

        assert_eq!(fluent.to_sql(), raw.get_select_query());
        assert!(fluent.lint().is_empty());
    }

    #[test]
    fn test_fluent_insert_into_raw_builder() {
        let builder = InsertQuery::into("users")
            .columns(["name"])
            .values(["'Bob'"])
            .into_builder();

        assert_eq!(builder.get_insert_query(), "INSERT INTO `users` (`name`) VALUES ('Bob')");
        assert_eq!(builder.get_replace_query(), "REPLACE INTO `users` (`name`) VALUES ('Bob')");
        assert!(matches!(builder.insert_body(), Some(InsertBody::Values(rows)) if rows.len() == 1));
    }
}
