//! Validation of builder state.
//!
//! The statement getters tolerate every combination of setter calls. [`QueryBuilder::lint`]
//! reports the combinations whose output is wrong or drops something the caller asked for.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use crate::{
    builder::QueryBuilder,
    clause::{Connector, InsertBody, InsertBodyKind},
    statement::{Component, Shape, StatementKind},
};

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum LintIssue {
    #[error("{kind} statement has no {anchor} clause")]
    #[diagnostic(
        code(weave_query::lint::missing_anchor),
        help("The statement renders as an empty string")
    )]
    MissingAnchor {
        kind: StatementKind,
        anchor: Component,
    },

    #[error("{kind} statement has no VALUES, SET or sub-select body")]
    #[diagnostic(code(weave_query::lint::missing_body))]
    MissingInsertBody { kind: StatementKind },

    #[error("UPDATE statement has no SET clause")]
    #[diagnostic(code(weave_query::lint::missing_set))]
    MissingSet,

    #[error("Connector {0} was set but no condition followed it")]
    #[diagnostic(
        code(weave_query::lint::dangling_connector),
        severity(warning),
        help("Set the connector right before the condition it should join")
    )]
    DanglingConnector(Connector),

    #[error("{keyword} {table} has no ON condition")]
    #[diagnostic(code(weave_query::lint::join_without_on))]
    JoinWithoutOn { keyword: String, table: String },

    #[error("{keyword} {table} takes no ON condition")]
    #[diagnostic(
        code(weave_query::lint::on_for_natural_join),
        help("Natural joins match on common column names")
    )]
    OnForNaturalJoin { keyword: String, table: String },

    #[error("ON condition `{0}` was issued before any join")]
    #[diagnostic(
        code(weave_query::lint::stray_on),
        severity(warning),
        help("The condition is not rendered")
    )]
    StrayOn(String),

    #[error("ORDER BY and LIMIT are dropped from a multi-table {kind}")]
    #[diagnostic(code(weave_query::lint::ignored_order_limit), severity(warning))]
    IgnoredOrderLimit { kind: StatementKind },

    #[error("Modifier(s) {modes} are not valid for this {kind} and are dropped")]
    #[diagnostic(code(weave_query::lint::dropped_modes), severity(warning))]
    DroppedModes { kind: StatementKind, modes: String },

    #[error("Row {row} has {found} value(s) but {expected} were expected")]
    #[diagnostic(code(weave_query::lint::row_width))]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{from} insert body was replaced by a {to} body")]
    #[diagnostic(
        code(weave_query::lint::body_replaced),
        severity(warning),
        help("Only the last body kind is rendered")
    )]
    InsertBodyReplaced {
        from: InsertBodyKind,
        to: InsertBodyKind,
    },

    #[error("Compound parts are only rendered for SELECT, not {kind}")]
    #[diagnostic(code(weave_query::lint::compound_ignored), severity(warning))]
    CompoundIgnored { kind: StatementKind },
}

impl LintIssue {
    /// Whether the issue makes the rendered statement invalid, as opposed to surprising.
    pub fn is_error(&self) -> bool {
        self.severity().unwrap_or(Severity::Error) == Severity::Error
    }
}

impl QueryBuilder {
    /// Reports every problem with the current state when it is built as `kind`.
    pub fn lint(&self, kind: StatementKind) -> Vec<LintIssue> {
        let mut issues = Vec::new();

        if !self.has_anchor(kind) {
            issues.push(LintIssue::MissingAnchor {
                kind,
                anchor: kind.anchor(),
            });
        }

        if let Some(connector) = self.connector {
            issues.push(LintIssue::DanglingConnector(connector));
        }

        issues.extend(
            self.stray_on
                .iter()
                .map(|condition| LintIssue::StrayOn(condition.render())),
        );

        if matches!(kind, StatementKind::Select | StatementKind::Update | StatementKind::Delete) {
            for join in &self.joins {
                if join.on.is_empty() && join.needs_on() {
                    issues.push(LintIssue::JoinWithoutOn {
                        keyword: join.keyword.clone(),
                        table: join.target.table.clone(),
                    });
                }
                if !join.on.is_empty() && join.is_natural() {
                    issues.push(LintIssue::OnForNaturalJoin {
                        keyword: join.keyword.clone(),
                        table: join.target.table.clone(),
                    });
                }
            }
        }

        if matches!(kind, StatementKind::Update | StatementKind::Delete)
            && self.shape(kind) == Shape::MultiTable
            && (self.limit.is_some() || !self.order_by.is_empty())
        {
            issues.push(LintIssue::IgnoredOrderLimit { kind });
        }

        if kind == StatementKind::Update && self.set.is_empty() {
            issues.push(LintIssue::MissingSet);
        }

        if kind != StatementKind::Select && !self.compound.is_empty() {
            issues.push(LintIssue::CompoundIgnored { kind });
        }

        if let Some(dropped) = self.dropped_modes(kind) {
            issues.push(LintIssue::DroppedModes {
                kind,
                modes: dropped,
            });
        }

        if matches!(kind, StatementKind::Insert | StatementKind::Replace) {
            self.lint_insert_body(kind, &mut issues);
        }

        issues
    }

    fn lint_insert_body(&self, kind: StatementKind, issues: &mut Vec<LintIssue>) {
        if let Some((from, to)) = self.replaced_body {
            issues.push(LintIssue::InsertBodyReplaced { from, to });
        }

        match &self.insert_body {
            None => issues.push(LintIssue::MissingInsertBody { kind }),
            Some(InsertBody::Values(rows)) => {
                let expected = if self.column_names.is_empty() {
                    rows.first().map(Vec::len).unwrap_or_default()
                } else {
                    self.column_names.len()
                };
                issues.extend(
                    rows.iter()
                        .enumerate()
                        .filter(|(_, row)| row.len() != expected)
                        .map(|(idx, row)| LintIssue::RowWidthMismatch {
                            row: idx + 1,
                            expected,
                            found: row.len(),
                        }),
                );
            }
            Some(InsertBody::Set(_)) | Some(InsertBody::Select(_)) => {}
        }
    }

    fn dropped_modes(&self, kind: StatementKind) -> Option<String> {
        let requested = match kind {
            StatementKind::Select => &self.select_mode,
            StatementKind::Delete => &self.delete_mode,
            StatementKind::Insert | StatementKind::Replace => &self.insert_mode,
            StatementKind::Update => &self.update_mode,
        };
        let kept = self.effective_modes(kind);

        let mut dropped: Vec<&str> = Vec::new();
        for mode in requested.iter().map(|m| m.trim()).filter(|m| !m.is_empty()) {
            let is_kept = kept.iter().any(|k| k.eq_ignore_ascii_case(mode));
            if !is_kept && !dropped.iter().any(|d| d.eq_ignore_ascii_case(mode)) {
                dropped.push(mode);
            }
        }
        (!dropped.is_empty()).then(|| dropped.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::ConditionBase;

    #[test]
    fn test_clean_select_has_no_issues() {
        let mut builder = QueryBuilder::new();
        builder
            .sql_from("users", &[])
            .sql_join("posts", "left", &[])
            .sql_condition("posts.user_id", "users.id", "=", ConditionBase::On);

        assert!(builder.lint(StatementKind::Select).is_empty());
    }

    #[test]
    fn test_missing_anchor() {
        let builder = QueryBuilder::new();
        let issues = builder.lint(StatementKind::Update);

        assert!(issues.contains(&LintIssue::MissingAnchor {
            kind: StatementKind::Update,
            anchor: Component::Update,
        }));
        assert!(issues.iter().any(LintIssue::is_error));
    }

    #[test]
    fn test_dangling_connector_is_a_warning() {
        let mut builder = QueryBuilder::new();
        builder
            .sql_from("users", &[])
            .sql_condition("a", "1", "=", ConditionBase::Where)
            .sql_connector(Connector::Or);

        let issues = builder.lint(StatementKind::Select);
        assert_eq!(issues, vec![LintIssue::DanglingConnector(Connector::Or)]);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_join_issues() {
        let mut builder = QueryBuilder::new();
        builder
            .sql_from("users", &[])
            .sql_condition("x", "y", "=", ConditionBase::On)
            .sql_join("posts", "left", &[])
            .sql_join("profiles", "natural", &[])
            .sql_condition("a", "b", "=", ConditionBase::On)
            .sql_join("teams", "cross", &[]);

        let issues = builder.lint(StatementKind::Select);
        assert!(issues.contains(&LintIssue::StrayOn("x = y".into())));
        assert!(issues.contains(&LintIssue::JoinWithoutOn {
            keyword: "LEFT JOIN".into(),
            table: "posts".into(),
        }));
        assert!(issues.contains(&LintIssue::OnForNaturalJoin {
            keyword: "NATURAL JOIN".into(),
            table: "profiles".into(),
        }));
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn test_multi_table_delete_drops_limit() {
        let mut builder = QueryBuilder::new();
        builder
            .sql_from("users", &[])
            .sql_from("posts", &[])
            .sql_limit(10, None);

        assert_eq!(
            builder.lint(StatementKind::Delete),
            vec![LintIssue::IgnoredOrderLimit {
                kind: StatementKind::Delete
            }]
        );
    }

    #[test]
    fn test_dropped_modes() {
        let mut builder = QueryBuilder::new();
        builder
            .sql_into("users")
            .sql_insert_mode("IGNORE")
            .sql_insert_mode("BOGUS")
            .sql_insert_mode("bogus")
            .sql_select_statement("SELECT 1");

        assert_eq!(
            builder.lint(StatementKind::Insert),
            vec![LintIssue::DroppedModes {
                kind: StatementKind::Insert,
                modes: "BOGUS".into(),
            }]
        );
    }

    #[test]
    fn test_row_width_mismatch() {
        let mut builder = QueryBuilder::new();
        builder
            .sql_into("users")
            .sql_column_names(["name", "age"])
            .sql_values(vec![vec!["'a'", "1"], vec!["'b'"]]);

        assert_eq!(
            builder.lint(StatementKind::Insert),
            vec![LintIssue::RowWidthMismatch {
                row: 2,
                expected: 2,
                found: 1,
            }]
        );
    }

    #[test]
    fn test_replaced_and_missing_bodies() {
        let mut builder = QueryBuilder::new();
        builder.sql_into("users");
        assert_eq!(
            builder.lint(StatementKind::Replace),
            vec![LintIssue::MissingInsertBody {
                kind: StatementKind::Replace
            }]
        );

        builder
            .sql_values(["1"])
            .sql_insert_set([("a", "1")]);
        assert_eq!(
            builder.lint(StatementKind::Insert),
            vec![LintIssue::InsertBodyReplaced {
                from: InsertBodyKind::Values,
                to: InsertBodyKind::Set,
            }]
        );
    }

    #[test]
    fn test_update_without_set_and_compound_outside_select() {
        let mut builder = QueryBuilder::new();
        builder
            .sql_update("users")
            .sql_compound("(SELECT 1)", crate::clause::CompoundOp::Union);

        let issues = builder.lint(StatementKind::Update);
        assert!(issues.contains(&LintIssue::MissingSet));
        assert!(issues.contains(&LintIssue::CompoundIgnored {
            kind: StatementKind::Update
        }));
    }
}
