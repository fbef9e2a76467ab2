//! The clause-buffer query builder.
//!
//! [`QueryBuilder`] accumulates fragments through its `sql_*` setters and assembles them into
//! a statement on demand. Engine specific builders (see [`crate::mysql`]) wrap it and expose a
//! chainable API; the setters themselves do not escape anything.

use tracing::debug;

use crate::{
    clause::{
        render_assignments, render_rows, Compound, CompoundOp, Condition, ConditionBase,
        ConditionList, Connector, InsertBody, InsertBodyKind, JoinClause, Limit, OrderClause,
        Rows, TableRef,
    },
    statement::{Component, Shape, StatementKind},
};

/// Accumulates SQL fragments and assembles SELECT, INSERT, REPLACE, UPDATE and DELETE
/// statements from them.
///
/// One builder is meant to produce one statement. The getters are read-only, so calling them
/// repeatedly returns the same string.
///
/// # Example
///
/// ```
/// use weave_query::{ConditionBase, QueryBuilder};
///
/// let mut builder = QueryBuilder::new();
/// builder
///     .sql_select("id")
///     .sql_from("users", &[])
///     .sql_condition("id", "1", "=", ConditionBase::Where);
///
/// assert_eq!(builder.get_select_query(), "SELECT id FROM users WHERE id = 1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pub(crate) select_mode: Vec<String>,
    pub(crate) delete_mode: Vec<String>,
    pub(crate) insert_mode: Vec<String>,
    pub(crate) update_mode: Vec<String>,
    pub(crate) select: Vec<String>,
    pub(crate) from: Vec<TableRef>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) wheres: ConditionList,
    pub(crate) having: ConditionList,
    /// `ON` conditions issued before any join; never rendered.
    pub(crate) stray_on: Vec<Condition>,
    pub(crate) group_by: Vec<String>,
    pub(crate) order_by: Vec<OrderClause>,
    pub(crate) limit: Option<Limit>,
    pub(crate) lock_mode: Option<String>,
    pub(crate) update: Vec<String>,
    pub(crate) delete: Vec<String>,
    pub(crate) into: Option<String>,
    pub(crate) set: Vec<(String, String)>,
    pub(crate) column_names: Vec<String>,
    pub(crate) insert_body: Option<InsertBody>,
    /// Last body kind that was thrown away by a setter of a different kind.
    pub(crate) replaced_body: Option<(InsertBodyKind, InsertBodyKind)>,
    pub(crate) compound: Vec<Compound>,
    pub(crate) connector: Option<Connector>,
    pub(crate) is_join: bool,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the select list. Blank expressions are ignored.
    pub fn sql_select(&mut self, expr: impl Into<String>) -> &mut Self {
        let expr = expr.into();
        if !expr.trim().is_empty() {
            self.select.push(expr);
        }
        self
    }

    /// Adds a table reference to FROM. Hints are rendered after the table, de-duplicated.
    pub fn sql_from(&mut self, table: impl Into<String>, index_hints: &[&str]) -> &mut Self {
        self.from.push(TableRef::new(table, index_hints));
        self
    }

    /// Adds a join. The next condition call opens this join's `ON` clause.
    ///
    /// `kind` is upper-cased; `straight` becomes `STRAIGHT_JOIN` and anything else becomes
    /// `<KIND> JOIN`.
    pub fn sql_join(
        &mut self,
        table_ref: impl Into<String>,
        kind: &str,
        index_hints: &[&str],
    ) -> &mut Self {
        self.joins.push(JoinClause::new(table_ref, kind, index_hints));
        self.is_join = true;
        self
    }

    /// Appends `left operator right` to WHERE, HAVING or the latest join's ON.
    ///
    /// The first condition of a clause, and the first one after a join, starts the clause and
    /// discards any pending connector. Later conditions are joined with the connector set by
    /// [`Self::sql_connector`] right before, or with `AND`.
    pub fn sql_condition(
        &mut self,
        left: impl Into<String>,
        right: impl Into<String>,
        operator: &str,
        base: ConditionBase,
    ) -> &mut Self {
        let target_empty = match base {
            ConditionBase::Where => self.wheres.is_empty(),
            ConditionBase::Having => self.having.is_empty(),
            ConditionBase::On => self.joins.last().map_or(true, |join| join.on.is_empty()),
        };

        let connector = if target_empty || self.is_join {
            self.connector = None;
            Connector::And
        } else {
            self.connector.take().unwrap_or_default()
        };
        self.is_join = false;

        let condition = Condition {
            connector,
            left: left.into(),
            operator: operator.to_string(),
            right: right.into(),
        };

        match base {
            ConditionBase::Where => self.wheres.push(condition),
            ConditionBase::Having => self.having.push(condition),
            ConditionBase::On => match self.joins.last_mut() {
                Some(join) => join.on.push(condition),
                None => {
                    debug!("ON condition `{}` has no join to attach to", condition.render());
                    self.stray_on.push(condition);
                }
            },
        }
        self
    }

    /// Sets the connector used by the next condition only.
    pub fn sql_connector(&mut self, connector: Connector) -> &mut Self {
        self.connector = Some(connector);
        self
    }

    /// Appends `<op> <sub_query>` to the compound part of a SELECT.
    pub fn sql_compound(&mut self, sub_query: impl Into<String>, op: CompoundOp) -> &mut Self {
        self.compound.push(Compound {
            op,
            query: sub_query.into(),
        });
        self
    }

    pub fn sql_order_by(&mut self, expr: impl Into<String>, asc: bool) -> &mut Self {
        self.order_by.push(OrderClause {
            expr: expr.into(),
            asc,
        });
        self
    }

    pub fn sql_group_by(&mut self, expr: impl Into<String>) -> &mut Self {
        self.group_by.push(expr.into());
        self
    }

    /// Sets LIMIT, replacing an earlier one.
    pub fn sql_limit(&mut self, amount: u64, offset: Option<u64>) -> &mut Self {
        self.limit = Some(Limit { amount, offset });
        self
    }

    /// Sets the row locking clause, e.g. `FOR UPDATE`.
    pub fn sql_lock_mode(&mut self, mode: impl Into<String>) -> &mut Self {
        let mode = mode.into();
        self.lock_mode = (!mode.trim().is_empty()).then_some(mode);
        self
    }

    pub fn sql_select_mode(&mut self, mode: impl Into<String>) -> &mut Self {
        self.select_mode.push(mode.into());
        self
    }

    pub fn sql_delete_mode(&mut self, mode: impl Into<String>) -> &mut Self {
        self.delete_mode.push(mode.into());
        self
    }

    /// Adds an INSERT or REPLACE modifier.
    pub fn sql_insert_mode(&mut self, mode: impl Into<String>) -> &mut Self {
        self.insert_mode.push(mode.into());
        self
    }

    pub fn sql_update_mode(&mut self, mode: impl Into<String>) -> &mut Self {
        self.update_mode.push(mode.into());
        self
    }

    /// Adds a table to the UPDATE target list.
    pub fn sql_update(&mut self, table: impl Into<String>) -> &mut Self {
        self.update.push(table.into());
        self
    }

    /// Adds a table to the target list of a multi-table DELETE.
    pub fn sql_delete(&mut self, table: impl Into<String>) -> &mut Self {
        self.delete.push(table.into());
        self
    }

    /// Sets the INSERT/REPLACE target table.
    pub fn sql_into(&mut self, table: impl Into<String>) -> &mut Self {
        self.into = Some(table.into());
        self
    }

    /// Appends pairs to the SET clause of an UPDATE.
    pub fn sql_set<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.set
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn sql_column_names<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Appends rows to a VALUES body. Accepts one row or several.
    pub fn sql_values(&mut self, rows: impl Into<Rows>) -> &mut Self {
        let Rows(rows) = rows.into();
        match &mut self.insert_body {
            Some(InsertBody::Values(existing)) => existing.extend(rows),
            _ => self.replace_body(InsertBody::Values(rows)),
        }
        self
    }

    /// Appends pairs to a SET-style INSERT/REPLACE body.
    pub fn sql_insert_set<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs.into_iter().map(|(k, v)| (k.into(), v.into()));
        match &mut self.insert_body {
            Some(InsertBody::Set(existing)) => existing.extend(pairs),
            _ => self.replace_body(InsertBody::Set(pairs.collect())),
        }
        self
    }

    /// Sets the sub-select of an `INSERT .. SELECT`.
    pub fn sql_select_statement(&mut self, query: impl Into<String>) -> &mut Self {
        self.replace_body(InsertBody::Select(query.into()));
        self
    }

    fn replace_body(&mut self, body: InsertBody) {
        if let Some(previous) = self.insert_body.as_ref().map(InsertBody::kind) {
            if previous != body.kind() {
                debug!("replacing {} insert body with {}", previous, body.kind());
                self.replaced_body = Some((previous, body.kind()));
            }
        }
        self.insert_body = Some(body);
    }

    /// Adds an index hint to the latest join target, or to the latest FROM table.
    pub(crate) fn hint_latest_table(&mut self, hint: &str) -> bool {
        let target = match self.joins.last_mut() {
            Some(join) => Some(&mut join.target),
            None => self.from.last_mut(),
        };
        match target {
            Some(table) => {
                table.add_hint(hint);
                true
            }
            None => false,
        }
    }

    pub fn insert_body(&self) -> Option<&InsertBody> {
        self.insert_body.as_ref()
    }

    /// Assembles the SELECT statement, or an empty string without FROM.
    pub fn get_select_query(&self) -> String {
        let query = self.assemble(StatementKind::Select);
        if query.is_empty() || self.compound.is_empty() {
            return query;
        }

        let compound = self
            .compound
            .iter()
            .filter(|c| !c.query.trim().is_empty())
            .map(|c| format!("{} {}", c.op, c.query.trim()))
            .collect::<Vec<_>>();
        if compound.is_empty() {
            return query;
        }
        format!("({query}) {}", compound.join(" "))
    }

    /// Assembles the INSERT statement, or an empty string without INTO.
    pub fn get_insert_query(&self) -> String {
        self.assemble(StatementKind::Insert)
    }

    /// Assembles the REPLACE statement, or an empty string without INTO.
    pub fn get_replace_query(&self) -> String {
        self.assemble(StatementKind::Replace)
    }

    /// Assembles the UPDATE statement, or an empty string without a target table.
    pub fn get_update_query(&self) -> String {
        self.assemble(StatementKind::Update)
    }

    /// Assembles the DELETE statement, or an empty string without FROM.
    pub fn get_delete_query(&self) -> String {
        self.assemble(StatementKind::Delete)
    }

    pub fn get_query(&self, kind: StatementKind) -> String {
        match kind {
            StatementKind::Select => self.get_select_query(),
            StatementKind::Insert => self.get_insert_query(),
            StatementKind::Replace => self.get_replace_query(),
            StatementKind::Update => self.get_update_query(),
            StatementKind::Delete => self.get_delete_query(),
        }
    }

    /// Whether the anchor clause of `kind` is set.
    pub fn has_anchor(&self, kind: StatementKind) -> bool {
        self.render(kind.anchor(), kind).is_some()
    }

    pub(crate) fn shape(&self, kind: StatementKind) -> Shape {
        match kind {
            StatementKind::Select => Shape::Plain,
            StatementKind::Delete => {
                if self.delete.is_empty() && self.from.len() == 1 && self.joins.is_empty() {
                    Shape::SingleTable
                } else {
                    Shape::MultiTable
                }
            }
            StatementKind::Update => {
                if self.update.len() == 1 && self.joins.is_empty() {
                    Shape::SingleTable
                } else {
                    Shape::MultiTable
                }
            }
            StatementKind::Insert | StatementKind::Replace => {
                Shape::Body(self.insert_body.as_ref().map(InsertBody::kind))
            }
        }
    }

    fn assemble(&self, kind: StatementKind) -> String {
        if !self.has_anchor(kind) {
            return String::new();
        }

        let mut parts = vec![kind.verb().to_string()];
        parts.extend(
            kind.layout(self.shape(kind))
                .iter()
                .filter_map(|component| self.render(*component, kind)),
        );

        let query = parts.join(" ").trim().to_string();
        debug!("assembled {} statement: {}", kind, query);
        query
    }

    /// Mode keywords that survive filtering for `kind`, de-duplicated in insertion order.
    pub(crate) fn effective_modes(&self, kind: StatementKind) -> Vec<&str> {
        let modes = match kind {
            StatementKind::Select => &self.select_mode,
            StatementKind::Delete => &self.delete_mode,
            StatementKind::Insert | StatementKind::Replace => &self.insert_mode,
            StatementKind::Update => &self.update_mode,
        };
        let allowed = kind.allowed_modes(self.insert_body.as_ref().map(InsertBody::kind));

        let mut kept: Vec<&str> = Vec::new();
        for mode in modes.iter().map(|m| m.trim()).filter(|m| !m.is_empty()) {
            let permitted =
                allowed.map_or(true, |allowed| allowed.iter().any(|a| a.eq_ignore_ascii_case(mode)));
            if permitted && !kept.iter().any(|k| k.eq_ignore_ascii_case(mode)) {
                kept.push(mode);
            }
        }
        kept
    }

    /// Renders one component, `None` when it is empty.
    fn render(&self, component: Component, kind: StatementKind) -> Option<String> {
        let rendered = match component {
            Component::SelectMode
            | Component::DeleteMode
            | Component::InsertMode
            | Component::UpdateMode => self.effective_modes(kind).join(" "),
            Component::Select => {
                if self.select.is_empty() {
                    "*".to_string()
                } else {
                    self.select.join(", ")
                }
            }
            Component::From => {
                if self.from.is_empty() {
                    String::new()
                } else {
                    let tables = self
                        .from
                        .iter()
                        .map(TableRef::render)
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("FROM {tables}")
                }
            }
            Component::Join => self
                .joins
                .iter()
                .map(JoinClause::render)
                .collect::<Vec<_>>()
                .join(" "),
            Component::Where => self.wheres.render("WHERE"),
            Component::Having => self.having.render("HAVING"),
            Component::GroupBy => prefixed("GROUP BY", &self.group_by),
            Component::OrderBy => {
                let orders = self
                    .order_by
                    .iter()
                    .map(OrderClause::render)
                    .collect::<Vec<_>>();
                prefixed("ORDER BY", &orders)
            }
            Component::Limit => self.limit.map(|l| l.render()).unwrap_or_default(),
            Component::LockMode => self.lock_mode.clone().unwrap_or_default(),
            Component::Delete => self.delete.join(", "),
            Component::Update => self.update.join(", "),
            Component::Into => self
                .into
                .as_ref()
                .filter(|table| !table.trim().is_empty())
                .map(|table| format!("INTO {table}"))
                .unwrap_or_default(),
            Component::ColumnNames => {
                if self.column_names.is_empty() {
                    String::new()
                } else {
                    format!("({})", self.column_names.join(", "))
                }
            }
            Component::Values => match &self.insert_body {
                Some(InsertBody::Values(rows)) => render_rows(rows),
                _ => String::new(),
            },
            Component::InsertSet => match &self.insert_body {
                Some(InsertBody::Set(pairs)) => render_assignments(pairs),
                _ => String::new(),
            },
            Component::SelectStatement => match &self.insert_body {
                Some(InsertBody::Select(query)) => query.trim().to_string(),
                _ => String::new(),
            },
            Component::Set => render_assignments(&self.set),
        };

        let rendered = rendered.trim();
        (!rendered.is_empty()).then(|| rendered.to_string())
    }
}

fn prefixed(keyword: &str, items: &[String]) -> String {
    if items.is_empty() {
        String::new()
    } else {
        format!("{} {}", keyword, items.join(", "))
    }
}
