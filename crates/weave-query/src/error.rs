//! Error types for weave-query.

use miette::Diagnostic;
use thiserror::Error;

use crate::statement::StatementKind;

/// Error type for weave-query operations.
///
/// Statement getters never fail; these errors come from parsing user supplied tokens and
/// from handing a statement to a driver.
#[derive(Error, Diagnostic, Debug)]
pub enum QueryError {
    #[error("{0} statement is empty")]
    #[diagnostic(
        code(weave_query::empty_statement),
        help("Set the anchor clause (FROM, INTO or the UPDATE target) before building")
    )]
    EmptyStatement(StatementKind),

    #[error("Query failed: {message}")]
    #[diagnostic(code(weave_query::execution))]
    Execution { sql: String, message: String },

    #[error("Invalid connector: {0}")]
    #[diagnostic(code(weave_query::connector), help("Use AND or OR"))]
    InvalidConnector(String),

    #[error("Invalid statement kind: {0}")]
    #[diagnostic(
        code(weave_query::statement_kind),
        help("Use one of select, insert, replace, update or delete")
    )]
    InvalidStatementKind(String),
}

/// Result type alias for weave-query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
