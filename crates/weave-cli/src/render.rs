use miette::{Diagnostic, Severity};
use nu_ansi_term::Color::{Cyan, Green, Red, Yellow};
use serde::Serialize;
use tracing::{info, warn};
use weave_config::config::{Config, LintLevel};
use weave_query::{LintIssue, StatementKind};

use crate::{
    document::QueryFile,
    error::{CliError, CliResult},
    utils::{pluralize, Colored},
};

#[derive(Debug, Serialize)]
pub struct RenderedStatement {
    pub name: String,
    pub kind: StatementKind,
    pub sql: String,
}

#[derive(Debug, Serialize)]
pub struct LintEntry {
    pub statement: String,
    pub severity: &'static str,
    pub code: Option<String>,
    pub message: String,
}

impl LintEntry {
    fn new(statement: &str, issue: &LintIssue) -> Self {
        Self {
            statement: statement.to_string(),
            severity: if issue.is_error() { "error" } else { "warning" },
            code: issue.code().map(|code| code.to_string()),
            message: issue.to_string(),
        }
    }
}

/// Builds every statement of `file` (or only `only`), applying the configured lint level.
pub fn render_statements(
    file: &QueryFile,
    config: &Config,
    only: Option<&str>,
) -> CliResult<Vec<RenderedStatement>> {
    file.validate(config)?;

    let mut rendered = Vec::new();
    let mut matched = false;
    for (idx, statement) in file.statements.iter().enumerate() {
        let name = statement.display_name(idx);
        if only.is_some_and(|only| only != name) {
            continue;
        }
        matched = true;

        let kind = statement.statement_kind()?;
        let builder = statement.to_builder(config)?;

        match config.lint_level() {
            LintLevel::Off => {}
            LintLevel::Warn => {
                for issue in builder.lint(kind) {
                    warn!("{}: {}", name, issue);
                }
            }
            LintLevel::Deny => {
                let issues = builder.lint(kind);
                if issues.iter().any(LintIssue::is_error) {
                    return Err(CliError::LintDenied { name, issues });
                }
                for issue in issues {
                    warn!("{}: {}", name, issue);
                }
            }
        }

        let mut sql = builder.get_query(kind);
        if sql.is_empty() {
            warn!("{}: {} statement is empty, skipping", name, kind);
            continue;
        }
        if config.terminator() {
            sql.push(';');
        }

        rendered.push(RenderedStatement { name, kind, sql });
    }

    if let Some(only) = only {
        if !matched {
            return Err(CliError::UnknownStatement(only.to_string()));
        }
    }

    Ok(rendered)
}

pub fn render_file(path: &str, only: Option<&str>, config: &Config, json: bool) -> CliResult<()> {
    let file = QueryFile::load(path)?;
    let rendered = render_statements(&file, config, only)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }

    let output = config.output();
    for (idx, statement) in rendered.iter().enumerate() {
        if idx > 0 && output.blank_lines() {
            println!();
        }
        if output.comments() {
            println!("-- {}", statement.name);
        }
        println!("{}", statement.sql);
    }
    Ok(())
}

/// Lints every statement of `file`, returning `(statement name, issue)` pairs.
pub fn lint_statements(file: &QueryFile, config: &Config) -> CliResult<Vec<(String, LintIssue)>> {
    file.validate(config)?;

    let mut found = Vec::new();
    for (idx, statement) in file.statements.iter().enumerate() {
        let name = statement.display_name(idx);
        let kind = statement.statement_kind()?;
        let builder = statement.to_builder(config)?;
        found.extend(builder.lint(kind).into_iter().map(|issue| (name.clone(), issue)));
    }
    Ok(found)
}

pub fn lint_file(path: &str, config: &Config, json: bool) -> CliResult<()> {
    let file = QueryFile::load(path)?;
    let found = lint_statements(&file, config)?;
    let errors = found.iter().filter(|(_, issue)| issue.is_error()).count();

    if json {
        let entries = found
            .iter()
            .map(|(name, issue)| LintEntry::new(name, issue))
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (name, issue) in &found {
            let label = match issue.severity() {
                Some(Severity::Warning) | Some(Severity::Advice) => Colored(Yellow, "warning"),
                _ => Colored(Red, "error"),
            };
            eprintln!("{} in {}", label, Colored(Cyan, name));
            eprintln!("{:?}", miette::Report::new(issue.clone()));
        }

        let warnings = found.len() - errors;
        if found.is_empty() {
            info!(
                "{} {}",
                Colored(Green, "No problems found in"),
                pluralize(file.statements.len(), "statement")
            );
        } else {
            info!(
                "{}, {}",
                Colored(Red, pluralize(errors, "error")),
                Colored(Yellow, pluralize(warnings, "warning"))
            );
        }
    }

    if errors > 0 {
        return Err(CliError::LintFailed(errors));
    }
    Ok(())
}

pub fn print_config(config: &Config) -> CliResult<()> {
    let doc = config.to_annotated_document()?;
    println!("{doc}");
    Ok(())
}
