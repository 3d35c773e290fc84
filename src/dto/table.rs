//! Data-table configuration: pagination, sorting and filtering parameters plus the
//! per-entity column definitions they are checked against.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors};

/// Sort direction of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Column and direction a table is sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub order: SortOrder,
}

/// Pagination, sorting and filtering state of a data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    /// One-based page index.
    pub page: u32,
    pub page_size: u32,
    pub sort: Option<SortSpec>,
    /// Column filters. Query pairs and cache keys list them sorted by column whatever
    /// the insertion order.
    pub filters: IndexMap<String, String>,
}

impl TableQuery {
    /// First page, unsorted and unfiltered.
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            sort: None,
            filters: IndexMap::new(),
        }
    }

    /// Jump to `page` (clamped to 1).
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sort by `column`.
    pub fn sorted_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(SortSpec {
            column: column.into(),
            order,
        });
        self
    }

    /// Filter `column` by `value`; changing filters resets to the first page.
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(column.into(), value.into());
        self.filters.sort_keys();
        self.page = 1;
        self
    }

    /// Query-string pairs understood by the API's list routes.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.column.clone()));
            pairs.push(("order".to_string(), sort.order.as_str().to_string()));
        }
        let mut filters = self
            .filters
            .iter()
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect::<Vec<_>>();
        filters.sort();
        pairs.extend(filters);
        pairs
    }

    /// Cache-key parts identifying this exact page.
    pub fn key_parts(&self) -> Vec<String> {
        self.to_query_pairs()
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect()
    }

    /// Reject sort and filter columns the table does not declare.
    pub fn check(&self, config: &TableConfig) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(sort) = &self.sort {
            if !config.column(&sort.column).is_some_and(|column| column.sortable) {
                let mut err = ValidationError::new("unknown_sort_column");
                err.message = Some(
                    format!("`{}` cannot sort by `{}`", config.entity, sort.column).into(),
                );
                errors.add("sort", err);
            }
        }

        for column in self.filters.keys() {
            if !config.column(column).is_some_and(|def| def.filterable) {
                let mut err = ValidationError::new("unknown_filter_column");
                err.message =
                    Some(format!("`{}` cannot filter by `{column}`", config.entity).into());
                errors.add("filters", err);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// One page of rows returned by a list route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Number of pages needed to show `total` rows.
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    /// True when another page follows this one.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.page_count()
    }
}

/// Declarative description of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub id: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    pub filterable: bool,
}

const fn column(id: &'static str, label: &'static str, sortable: bool, filterable: bool) -> ColumnDef {
    ColumnDef {
        id,
        label,
        sortable,
        filterable,
    }
}

/// Column set of one entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub entity: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableConfig {
    /// Look a column up by id.
    pub fn column(&self, id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.id == id)
    }
}

pub const GAME_TABLE: TableConfig = TableConfig {
    entity: "games",
    columns: &[
        column("title", "Title", true, true),
        column("system", "System", true, true),
        column("gamemaster", "Gamemaster", true, true),
        column("day_of_week", "Day", true, true),
        column("next_session", "Next session", true, false),
        column("registered", "Registered", false, true),
    ],
};

pub const MEMBER_TABLE: TableConfig = TableConfig {
    entity: "members",
    columns: &[
        column("display_name", "Name", true, true),
        column("email", "Email", true, true),
        column("role", "Role", true, true),
        column("joined_at", "Joined", true, false),
    ],
};

pub const ANNOUNCEMENT_TABLE: TableConfig = TableConfig {
    entity: "announcements",
    columns: &[
        column("title", "Title", true, true),
        column("audience", "Audience", true, true),
        column("pinned", "Pinned", true, true),
        column("published_at", "Published", true, false),
    ],
};

pub const INVITE_TABLE: TableConfig = TableConfig {
    entity: "invites",
    columns: &[
        column("email", "Email", true, true),
        column("role", "Role", true, true),
        column("status", "Status", true, true),
        column("created_at", "Sent", true, false),
    ],
};

pub const MESSAGE_TABLE: TableConfig = TableConfig {
    entity: "messages",
    columns: &[
        column("subject", "Subject", true, true),
        column("sender", "From", true, true),
        column("read", "Read", false, true),
        column("sent_at", "Sent", true, false),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_order_does_not_change_the_key() {
        let left = TableQuery::new(20).filter("system", "D&D").filter("day_of_week", "friday");
        let right = TableQuery::new(20).filter("day_of_week", "friday").filter("system", "D&D");
        assert_eq!(left.key_parts(), right.key_parts());
    }

    #[test]
    fn unsorted_filters_still_share_a_key() {
        let mut pushed = TableQuery::new(20);
        pushed.filters.insert("system".into(), "D&D".into());
        pushed.filters.insert("day_of_week".into(), "friday".into());
        let decoded: TableQuery = serde_json::from_value(serde_json::json!({
            "page": 1,
            "page_size": 20,
            "filters": {"system": "D&D", "day_of_week": "friday"},
        }))
        .unwrap();
        let built = TableQuery::new(20).filter("system", "D&D").filter("day_of_week", "friday");

        assert_eq!(pushed.key_parts(), built.key_parts());
        assert_eq!(decoded.key_parts(), built.key_parts());
        assert_eq!(
            &pushed.to_query_pairs()[2..],
            &[
                ("day_of_week".to_string(), "friday".to_string()),
                ("system".to_string(), "D&D".to_string()),
            ]
        );
    }

    #[test]
    fn filtering_resets_page() {
        let query = TableQuery::new(10).with_page(4).filter("title", "dune");
        assert_eq!(query.page, 1);
    }

    #[test]
    fn query_pairs_include_sort() {
        let query = TableQuery::new(10)
            .with_page(2)
            .sorted_by("title", SortOrder::Desc);
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "10".to_string()),
                ("sort".to_string(), "title".to_string()),
                ("order".to_string(), "desc".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_undeclared_columns() {
        let query = TableQuery::new(10)
            .sorted_by("registered", SortOrder::Asc)
            .filter("password", "x");
        let errors = query.check(&GAME_TABLE).unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("sort"));
        assert!(fields.contains_key("filters"));

        assert!(TableQuery::new(10).filter("role", "admin").check(&MEMBER_TABLE).is_ok());
    }

    #[test]
    fn page_math() {
        let page = Page::<u8> {
            items: vec![],
            total: 41,
            page: 2,
            page_size: 20,
        };
        assert_eq!(page.page_count(), 3);
        assert!(page.has_next());
    }
}
