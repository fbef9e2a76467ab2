//! Index hints placed after a table reference.

use std::fmt;

use crate::escape::quote_identifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintAction {
    Use,
    Ignore,
    Force,
}

/// Part of the query an index hint is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintScope {
    Join,
    OrderBy,
    GroupBy,
}

/// `USE|IGNORE|FORCE {INDEX|KEY} [FOR ...] (idx, ...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHint {
    action: HintAction,
    key: bool,
    scope: Option<HintScope>,
    indexes: Vec<String>,
}

impl IndexHint {
    fn new<I, S>(action: HintAction, indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action,
            key: false,
            scope: None,
            indexes: indexes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn use_index<I, S>(indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HintAction::Use, indexes)
    }

    pub fn ignore_index<I, S>(indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HintAction::Ignore, indexes)
    }

    pub fn force_index<I, S>(indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HintAction::Force, indexes)
    }

    /// Renders `KEY` instead of its synonym `INDEX`.
    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }

    pub fn for_join(mut self) -> Self {
        self.scope = Some(HintScope::Join);
        self
    }

    pub fn for_order_by(mut self) -> Self {
        self.scope = Some(HintScope::OrderBy);
        self
    }

    pub fn for_group_by(mut self) -> Self {
        self.scope = Some(HintScope::GroupBy);
        self
    }
}

impl fmt::Display for IndexHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            HintAction::Use => "USE",
            HintAction::Ignore => "IGNORE",
            HintAction::Force => "FORCE",
        };
        write!(f, "{} {}", action, if self.key { "KEY" } else { "INDEX" })?;

        if let Some(scope) = self.scope {
            let scope = match scope {
                HintScope::Join => "JOIN",
                HintScope::OrderBy => "ORDER BY",
                HintScope::GroupBy => "GROUP BY",
            };
            write!(f, " FOR {scope}")?;
        }

        let indexes = self
            .indexes
            .iter()
            .map(|idx| quote_identifier(idx))
            .collect::<Vec<_>>();
        write!(f, " ({})", indexes.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_hint_display() {
        assert_eq!(IndexHint::use_index(["a", "b"]).to_string(), "USE INDEX (`a`, `b`)");
        assert_eq!(
            IndexHint::ignore_index(["a"]).key().for_order_by().to_string(),
            "IGNORE KEY FOR ORDER BY (`a`)"
        );
        assert_eq!(
            IndexHint::force_index(["a"]).for_group_by().to_string(),
            "FORCE INDEX FOR GROUP BY (`a`)"
        );
    }

    #[test]
    fn test_empty_use_index() {
        assert_eq!(IndexHint::use_index(Vec::<String>::new()).to_string(), "USE INDEX ()");
    }
}
