//! Query files.
//!
//! A query file is a TOML document with one `[[statement]]` table per statement. Every field
//! maps onto a [`QueryBuilder`] setter and is used verbatim, so identifiers and values must be
//! written the way they should appear in the SQL.
//!
//! ```toml
//! [[statement]]
//! name = "active_users"
//! kind = "select"
//! select = ["id", "name"]
//! from = ["users"]
//! where = [{ left = "active", right = "1" }]
//! order_by = [{ expr = "id", asc = false }]
//! limit = 10
//! ```

use std::{collections::HashSet, fs, io::Read};

use serde::Deserialize;
use tracing::debug;
use weave_config::config::Config;
use weave_query::{CompoundOp, ConditionBase, Connector, QueryBuilder, Rows, StatementKind};

use crate::error::{CliError, CliResult};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryFile {
    #[serde(default, rename = "statement")]
    pub statements: Vec<Statement>,
}

/// A table reference, either a bare string or a table with index hints.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TableSpec {
    Plain(String),
    Hinted {
        table: String,
        #[serde(default)]
        hints: Vec<String>,
    },
}

impl TableSpec {
    fn parts(&self) -> (&str, Vec<&str>) {
        match self {
            TableSpec::Plain(table) => (table, Vec::new()),
            TableSpec::Hinted { table, hints } => (table, hints.iter().map(String::as_str).collect()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionSpec {
    pub left: String,
    #[serde(default = "default_operator")]
    pub op: String,
    #[serde(default)]
    pub right: String,
    /// `and` or `or`, joining this condition to the previous one.
    pub connector: Option<String>,
}

fn default_operator() -> String {
    "=".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinSpec {
    #[serde(default)]
    pub kind: String,
    pub table: String,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub on: Vec<ConditionSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderSpec {
    pub expr: String,
    #[serde(default = "default_true")]
    pub asc: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentSpec {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompoundSpec {
    pub op: CompoundOp,
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Statement {
    pub name: Option<String>,
    pub kind: String,
    pub modes: Vec<String>,
    pub select: Vec<String>,
    pub from: Vec<TableSpec>,
    pub join: Vec<JoinSpec>,
    #[serde(rename = "where")]
    pub wheres: Vec<ConditionSpec>,
    pub having: Vec<ConditionSpec>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderSpec>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub lock: Option<String>,
    pub update: Vec<String>,
    pub delete: Vec<String>,
    pub into: Option<String>,
    pub set: Vec<AssignmentSpec>,
    pub columns: Vec<String>,
    pub values: Vec<Vec<String>>,
    pub insert_set: Vec<AssignmentSpec>,
    pub select_statement: Option<String>,
    pub compound: Vec<CompoundSpec>,
}

impl QueryFile {
    /// Reads a query file from `path`, or from stdin when `path` is `-`.
    pub fn load(path: &str) -> CliResult<Self> {
        let content = if path == "-" {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| CliError::Io {
                    path: "<stdin>".into(),
                    source,
                })?;
            buffer
        } else {
            fs::read_to_string(path).map_err(|source| CliError::Io {
                path: path.into(),
                source,
            })?
        };

        Self::parse(path, &content)
    }

    pub fn parse(path: &str, content: &str) -> CliResult<Self> {
        let file: QueryFile = toml::from_str(content).map_err(|source| CliError::Parse {
            path: path.into(),
            source,
        })?;
        debug!("loaded {} statement(s) from {}", file.statements.len(), path);
        Ok(file)
    }

    /// Checks the statement count against the configuration and that names are unique.
    pub fn validate(&self, config: &Config) -> CliResult<()> {
        let max = config.max_statements();
        if self.statements.len() > max {
            return Err(CliError::TooManyStatements {
                found: self.statements.len(),
                max,
            });
        }

        let mut seen = HashSet::new();
        for (idx, statement) in self.statements.iter().enumerate() {
            let name = statement.display_name(idx);
            if !seen.insert(name.clone()) {
                return Err(CliError::DuplicateStatement(name));
            }
        }
        Ok(())
    }
}

impl Statement {
    /// The statement's name, or `statement-N` for unnamed ones.
    pub fn display_name(&self, idx: usize) -> String {
        self.name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("statement-{}", idx + 1))
    }

    pub fn statement_kind(&self) -> CliResult<StatementKind> {
        Ok(self.kind.parse()?)
    }

    /// Replays the statement onto a fresh builder.
    pub fn to_builder(&self, config: &Config) -> CliResult<QueryBuilder> {
        let kind = self.statement_kind()?;
        let mut builder = QueryBuilder::new();

        for mode in &self.modes {
            let mode = if config.uppercase_modes() {
                mode.to_ascii_uppercase()
            } else {
                mode.clone()
            };
            match kind {
                StatementKind::Select => builder.sql_select_mode(mode),
                StatementKind::Delete => builder.sql_delete_mode(mode),
                StatementKind::Insert | StatementKind::Replace => builder.sql_insert_mode(mode),
                StatementKind::Update => builder.sql_update_mode(mode),
            };
        }

        for expr in &self.select {
            builder.sql_select(expr.as_str());
        }
        for table in &self.from {
            let (table, hints) = table.parts();
            builder.sql_from(table, &hints);
        }
        for table in &self.update {
            builder.sql_update(table.as_str());
        }
        for table in &self.delete {
            builder.sql_delete(table.as_str());
        }
        if let Some(into) = &self.into {
            builder.sql_into(into.as_str());
        }

        for join in &self.join {
            let hints = join.hints.iter().map(String::as_str).collect::<Vec<_>>();
            builder.sql_join(join.table.as_str(), &join.kind, &hints);
            apply_conditions(&mut builder, &join.on, ConditionBase::On)?;
        }
        apply_conditions(&mut builder, &self.wheres, ConditionBase::Where)?;
        apply_conditions(&mut builder, &self.having, ConditionBase::Having)?;

        for expr in &self.group_by {
            builder.sql_group_by(expr.as_str());
        }
        for order in &self.order_by {
            builder.sql_order_by(order.expr.as_str(), order.asc);
        }
        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                builder.sql_limit(limit, offset);
            }
            (None, Some(offset)) => {
                builder.sql_limit(u64::MAX, Some(offset));
            }
            (None, None) => {}
        }
        if let Some(lock) = &self.lock {
            builder.sql_lock_mode(lock.as_str());
        }

        builder.sql_set(
            self.set
                .iter()
                .map(|pair| (pair.column.as_str(), pair.value.as_str())),
        );
        builder.sql_column_names(self.columns.iter().map(String::as_str));
        if !self.values.is_empty() {
            builder.sql_values(Rows(self.values.clone()));
        }
        if !self.insert_set.is_empty() {
            builder.sql_insert_set(
                self.insert_set
                    .iter()
                    .map(|pair| (pair.column.as_str(), pair.value.as_str())),
            );
        }
        if let Some(query) = &self.select_statement {
            builder.sql_select_statement(query.as_str());
        }

        for compound in &self.compound {
            builder.sql_compound(compound.query.as_str(), compound.op);
        }

        Ok(builder)
    }
}

fn apply_conditions(
    builder: &mut QueryBuilder,
    conditions: &[ConditionSpec],
    base: ConditionBase,
) -> CliResult<()> {
    for condition in conditions {
        if let Some(connector) = &condition.connector {
            builder.sql_connector(connector.parse::<Connector>()?);
        }
        builder.sql_condition(
            condition.left.as_str(),
            condition.right.as_str(),
            &condition.op,
            base,
        );
    }
    Ok(())
}
