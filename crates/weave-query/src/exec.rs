//! Handing assembled statements to a database driver.
//!
//! The builder only produces strings. [`Executor`] takes those strings to a [`Driver`] and
//! turns a failed result into a [`QueryError::Execution`].

use tracing::{debug, error};

use crate::{
    builder::QueryBuilder,
    error::{QueryError, Result},
    statement::StatementKind,
};

/// The result of one statement as reported by a driver.
pub trait ResultSet {
    fn has_failed(&self) -> bool;

    /// Driver message for a failed statement.
    fn error(&self) -> Option<String>;

    fn number_of_rows(&self) -> usize;

    /// A row as `(column, value)` pairs, `None` past the end.
    fn row(&self, index: usize) -> Option<Vec<(String, Option<String>)>>;

    /// Every value of one column.
    fn column(&self, name: &str) -> Vec<Option<String>> {
        (0..self.number_of_rows())
            .map(|idx| self.cell(idx, name))
            .collect()
    }

    fn cell(&self, index: usize, column: &str) -> Option<String> {
        self.row(index)?
            .into_iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value)
    }
}

/// Something that can run raw SQL.
pub trait Driver {
    type Output: ResultSet;

    fn execute(&mut self, sql: &str) -> Self::Output;
}

/// Runs statements assembled by a [`QueryBuilder`] through a [`Driver`].
pub struct Executor<D: Driver> {
    driver: D,
}

impl<D: Driver> Executor<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_inner(self) -> D {
        self.driver
    }

    /// Builds `kind` from `builder` and runs it.
    pub fn run(&mut self, kind: StatementKind, builder: &QueryBuilder) -> Result<D::Output> {
        let sql = builder.get_query(kind);
        if sql.is_empty() {
            return Err(QueryError::EmptyStatement(kind));
        }
        self.run_raw(&sql)
    }

    /// Runs an already assembled statement.
    pub fn run_raw(&mut self, sql: &str) -> Result<D::Output> {
        debug!("executing: {}", sql);
        let output = self.driver.execute(sql);
        if output.has_failed() {
            let message = output
                .error()
                .unwrap_or_else(|| "unknown driver error".to_string());
            error!("Query failed: {} ({})", message, sql);
            return Err(QueryError::Execution {
                sql: sql.to_string(),
                message,
            });
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::ConditionBase;

    #[derive(Debug)]
    struct FakeRows {
        failure: Option<String>,
        rows: Vec<Vec<(String, Option<String>)>>,
    }

    impl ResultSet for FakeRows {
        fn has_failed(&self) -> bool {
            self.failure.is_some()
        }

        fn error(&self) -> Option<String> {
            self.failure.clone()
        }

        fn number_of_rows(&self) -> usize {
            self.rows.len()
        }

        fn row(&self, index: usize) -> Option<Vec<(String, Option<String>)>> {
            self.rows.get(index).cloned()
        }
    }

    #[derive(Default)]
    struct FakeDriver {
        executed: Vec<String>,
        fail_with: Option<String>,
    }

    impl Driver for FakeDriver {
        type Output = FakeRows;

        fn execute(&mut self, sql: &str) -> FakeRows {
            self.executed.push(sql.to_string());
            FakeRows {
                failure: self.fail_with.clone(),
                rows: vec![
                    vec![("id".into(), Some("1".into())), ("name".into(), Some("Bob".into()))],
                    vec![("id".into(), Some("2".into())), ("name".into(), None)],
                ],
            }
        }
    }

    #[test]
    fn test_run_passes_assembled_sql() {
        let mut builder = QueryBuilder::new();
        builder
            .sql_from("users", &[])
            .sql_condition("id", "1", ">=", ConditionBase::Where);

        let mut executor = Executor::new(FakeDriver::default());
        let rows = executor.run(StatementKind::Select, &builder).unwrap();

        assert_eq!(executor.driver().executed, vec!["SELECT * FROM users WHERE id >= 1"]);
        assert_eq!(rows.number_of_rows(), 2);
        assert_eq!(rows.cell(0, "name"), Some("Bob".to_string()));
        assert_eq!(rows.column("name"), vec![Some("Bob".to_string()), None]);
        assert_eq!(rows.cell(5, "name"), None);
    }

    #[test]
    fn test_empty_statement_is_not_executed() {
        let builder = QueryBuilder::new();
        let mut executor = Executor::new(FakeDriver::default());

        let err = executor.run(StatementKind::Update, &builder).unwrap_err();
        assert!(matches!(err, QueryError::EmptyStatement(StatementKind::Update)));
        assert!(executor.into_inner().executed.is_empty());
    }

    #[test]
    fn test_driver_failure_becomes_execution_error() {
        let mut executor = Executor::new(FakeDriver {
            fail_with: Some("table missing".into()),
            ..Default::default()
        });

        match executor.run_raw("SELECT * FROM nope") {
            Err(QueryError::Execution { sql, message }) => {
                assert_eq!(sql, "SELECT * FROM nope");
                assert_eq!(message, "table missing");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
