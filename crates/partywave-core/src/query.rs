// Sort and page state for list requests.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flip(self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    /// Wire name of the sort property (`id`, `name`, `createdAt`, ...).
    pub field: String,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            field: "id".to_string(),
            order: SortOrder::Asc,
        }
    }
}

impl SortState {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        SortState {
            field: field.into(),
            order,
        }
    }

    /// Header-click behavior: select `field` and flip the order. Clicking
    /// a different column also flips, so the sequence stays predictable.
    pub fn toggle(&mut self, field: &str) {
        self.order = self.order.flip();
        self.field = field.to_string();
    }

    /// `field,order` as sent in the `sort` query parameter.
    pub fn param(&self) -> String {
        format!("{},{}", self.field, self.order)
    }
}

/// Parameters of one list request. An empty query sends no parameters at
/// all and returns the backend's default listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<SortState>,
}

impl ListQuery {
    pub fn empty() -> Self {
        ListQuery::default()
    }

    pub fn sorted(sort: SortState) -> Self {
        ListQuery {
            page: None,
            size: None,
            sort: Some(sort),
        }
    }

    pub fn paged(page: u32, size: u32, sort: SortState) -> Self {
        ListQuery {
            page: Some(page),
            size: Some(size),
            sort: Some(sort),
        }
    }

    /// Query pairs in request order. Page and size are only sent alongside
    /// a sort, matching how the backend's list endpoints are called.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let Some(sort) = &self.sort else {
            return Vec::new();
        };
        let mut pairs = Vec::with_capacity(3);
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        pairs.push(("sort", sort.param()));
        pairs
    }
}
