use miette::Diagnostic;
use thiserror::Error;
use weave_config::error::ConfigError;
use weave_query::{LintIssue, QueryError};

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error("Failed to read {path}: {source}")]
    #[diagnostic(code(weave::io))]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse query file {path}: {source}")]
    #[diagnostic(
        code(weave::parse),
        help("A query file is a list of [[statement]] tables")
    )]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Query file has {found} statements, the limit is {max}")]
    #[diagnostic(
        code(weave::too_many_statements),
        help("Raise max_statements in the configuration or split the file")
    )]
    TooManyStatements { found: usize, max: usize },

    #[error("Statement name `{0}` is used more than once")]
    #[diagnostic(code(weave::duplicate_statement))]
    DuplicateStatement(String),

    #[error("No statement named `{0}`")]
    #[diagnostic(code(weave::unknown_statement))]
    UnknownStatement(String),

    #[error("Statement `{name}` has lint errors")]
    #[diagnostic(
        code(weave::lint_denied),
        help("Fix the issues or set lint = \"warn\" in the configuration")
    )]
    LintDenied {
        name: String,
        #[related]
        issues: Vec<LintIssue>,
    },

    #[error("Found {0} lint error(s)")]
    #[diagnostic(code(weave::lint_failed))]
    LintFailed(usize),

    #[error("JSON serialization error: {0}")]
    #[diagnostic(code(weave::json))]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = std::result::Result<T, CliError>;
