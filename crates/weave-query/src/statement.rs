//! Statement kinds and the order their clauses are assembled in.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{clause::InsertBodyKind, error::QueryError};

/// The five statements a [`crate::QueryBuilder`] can assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Select,
    Insert,
    Replace,
    Update,
    Delete,
}

impl StatementKind {
    pub const ALL: [StatementKind; 5] = [
        StatementKind::Select,
        StatementKind::Insert,
        StatementKind::Replace,
        StatementKind::Update,
        StatementKind::Delete,
    ];

    pub fn verb(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Replace => "REPLACE",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }

    /// The clause that must be present for the statement to be built at all.
    pub fn anchor(&self) -> Component {
        match self {
            StatementKind::Select | StatementKind::Delete => Component::From,
            StatementKind::Insert | StatementKind::Replace => Component::Into,
            StatementKind::Update => Component::Update,
        }
    }

    /// Modifier keywords that survive filtering, or `None` when modes are rendered verbatim.
    pub fn allowed_modes(&self, body: Option<InsertBodyKind>) -> Option<&'static [&'static str]> {
        match self {
            StatementKind::Select | StatementKind::Delete => None,
            StatementKind::Update => Some(&["LOW_PRIORITY", "IGNORE"]),
            StatementKind::Replace => Some(&["LOW_PRIORITY", "DELAYED"]),
            StatementKind::Insert => match body {
                Some(InsertBodyKind::Select) => Some(&["HIGH_PRIORITY", "LOW_PRIORITY", "IGNORE"]),
                _ => Some(&["LOW_PRIORITY", "DELAYED", "HIGH_PRIORITY", "IGNORE"]),
            },
        }
    }

    pub(crate) fn layout(&self, shape: Shape) -> &'static [Component] {
        use Component::*;

        match (self, shape) {
            (StatementKind::Select, _) => &[
                SelectMode, Select, From, Join, Where, GroupBy, Having, OrderBy, Limit, LockMode,
            ],
            (StatementKind::Delete, Shape::SingleTable) => {
                &[DeleteMode, Delete, From, Join, Where, OrderBy, Limit]
            }
            (StatementKind::Delete, _) => &[DeleteMode, Delete, From, Join, Where],
            (StatementKind::Update, Shape::SingleTable) => {
                &[UpdateMode, Update, Join, Set, Where, OrderBy, Limit]
            }
            (StatementKind::Update, _) => &[UpdateMode, Update, Join, Set, Where],
            (StatementKind::Insert | StatementKind::Replace, Shape::Body(Some(InsertBodyKind::Select))) => {
                &[InsertMode, Into, ColumnNames, SelectStatement]
            }
            (StatementKind::Insert | StatementKind::Replace, Shape::Body(Some(InsertBodyKind::Set))) => {
                &[InsertMode, Into, InsertSet]
            }
            (StatementKind::Insert | StatementKind::Replace, _) => {
                &[InsertMode, Into, ColumnNames, Values]
            }
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

impl FromStr for StatementKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatementKind::ALL
            .into_iter()
            .find(|kind| kind.verb().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::InvalidStatementKind(s.to_string()))
    }
}

/// Shape of the statement that decides which layout applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    /// Nothing shape dependent.
    Plain,
    /// One target table and no join: ORDER BY and LIMIT are allowed.
    SingleTable,
    /// Several target tables or a join.
    MultiTable,
    /// INSERT/REPLACE with the given body.
    Body(Option<InsertBodyKind>),
}

/// Every clause a statement can be assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    SelectMode,
    Select,
    From,
    Join,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    LockMode,
    DeleteMode,
    Delete,
    InsertMode,
    Into,
    ColumnNames,
    Values,
    InsertSet,
    SelectStatement,
    UpdateMode,
    Update,
    Set,
}

impl Component {
    pub fn name(&self) -> &'static str {
        match self {
            Component::SelectMode => "select mode",
            Component::Select => "SELECT list",
            Component::From => "FROM",
            Component::Join => "JOIN",
            Component::Where => "WHERE",
            Component::GroupBy => "GROUP BY",
            Component::Having => "HAVING",
            Component::OrderBy => "ORDER BY",
            Component::Limit => "LIMIT",
            Component::LockMode => "lock mode",
            Component::DeleteMode => "delete mode",
            Component::Delete => "DELETE targets",
            Component::InsertMode => "insert mode",
            Component::Into => "INTO",
            Component::ColumnNames => "column list",
            Component::Values => "VALUES",
            Component::InsertSet => "INSERT SET",
            Component::SelectStatement => "sub-select",
            Component::UpdateMode => "update mode",
            Component::Update => "UPDATE target",
            Component::Set => "SET",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor() {
        assert_eq!(StatementKind::Select.anchor(), Component::From);
        assert_eq!(StatementKind::Delete.anchor(), Component::From);
        assert_eq!(StatementKind::Insert.anchor(), Component::Into);
        assert_eq!(StatementKind::Replace.anchor(), Component::Into);
        assert_eq!(StatementKind::Update.anchor(), Component::Update);
    }

    #[test]
    fn test_every_layout_contains_its_anchor() {
        let shapes = [
            Shape::Plain,
            Shape::SingleTable,
            Shape::MultiTable,
            Shape::Body(None),
            Shape::Body(Some(InsertBodyKind::Values)),
            Shape::Body(Some(InsertBodyKind::Set)),
            Shape::Body(Some(InsertBodyKind::Select)),
        ];
        for kind in StatementKind::ALL {
            for shape in shapes {
                assert!(kind.layout(shape).contains(&kind.anchor()), "{kind} {shape:?}");
            }
        }
    }

    #[test]
    fn test_order_and_limit_only_for_single_table() {
        for kind in [StatementKind::Update, StatementKind::Delete] {
            assert!(kind.layout(Shape::SingleTable).contains(&Component::Limit));
            assert!(!kind.layout(Shape::MultiTable).contains(&Component::Limit));
            assert!(!kind.layout(Shape::MultiTable).contains(&Component::OrderBy));
        }
    }

    #[test]
    fn test_allowed_modes() {
        assert!(StatementKind::Select.allowed_modes(None).is_none());
        assert_eq!(
            StatementKind::Replace.allowed_modes(Some(InsertBodyKind::Values)),
            Some(&["LOW_PRIORITY", "DELAYED"][..])
        );
        assert!(!StatementKind::Insert
            .allowed_modes(Some(InsertBodyKind::Select))
            .unwrap()
            .contains(&"DELAYED"));
        assert!(StatementKind::Insert
            .allowed_modes(Some(InsertBodyKind::Values))
            .unwrap()
            .contains(&"DELAYED"));
    }

    #[test]
    fn test_statement_kind_from_str() {
        assert_eq!("select".parse::<StatementKind>().unwrap(), StatementKind::Select);
        assert_eq!(" Replace ".parse::<StatementKind>().unwrap(), StatementKind::Replace);
        assert!(matches!(
            "merge".parse::<StatementKind>(),
            Err(QueryError::InvalidStatementKind(_))
        ));
    }
}
