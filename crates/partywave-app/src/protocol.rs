// Messages exchanged between the TUI and the application loop, plus the
// snapshot types the TUI renders from.

use partywave_core::model::{EntityId, EntityKind, FieldSpec, ListMode};
use partywave_core::query::SortState;

use crate::form::{FieldError, FormDraft};

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Screen the console is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    List(EntityKind),
    Detail(EntityKind, EntityId),
    Create(EntityKind),
    Edit(EntityKind, EntityId),
    Delete(EntityKind, EntityId),
}

impl Route {
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Route::Home => None,
            Route::List(kind)
            | Route::Detail(kind, _)
            | Route::Create(kind)
            | Route::Edit(kind, _)
            | Route::Delete(kind, _) => Some(*kind),
        }
    }

    /// Where `Back` leads from this route.
    pub fn parent(&self) -> Route {
        match self {
            Route::Home | Route::List(_) => Route::Home,
            Route::Detail(kind, _) | Route::Create(kind) | Route::Edit(kind, _) | Route::Delete(kind, _) => {
                Route::List(*kind)
            }
        }
    }

    /// Routes whose successful mutation returns to the entity list.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Route::Create(_) | Route::Edit(..) | Route::Delete(..))
    }
}

// ---------------------------------------------------------------------------
// TUI -> App
// ---------------------------------------------------------------------------

/// Commands sent from the TUI to the application loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Navigate(Route),
    /// Re-run the current route's fetches.
    Refresh,
    /// Toggle sorting on a field of the current list.
    SortBy(String),
    /// Zero-based page of a paginated list.
    GoToPage(u32),
    NextPage,
    PrevPage,
    /// Fetch the next page of an infinite-scroll list.
    LoadMore,
    /// Submit the form; `partial` sends only changed fields as a PATCH.
    Submit { draft: FormDraft, partial: bool },
    ConfirmDelete,
    Back,
    Quit,
}

// ---------------------------------------------------------------------------
// App -> TUI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Screen(Box<ScreenSnapshot>),
    Notice(Notice),
}

/// One-line message for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Everything the TUI needs to draw the current screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSnapshot {
    pub route: Route,
    pub status: StatusLine,
    pub body: ScreenBody,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusLine {
    pub base_url: String,
    pub loading: bool,
    pub updating: bool,
    /// Error message of the slice behind the current screen.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenBody {
    Home(HomeView),
    List(ListView),
    Detail(DetailView),
    Form(FormView),
    Delete(DeleteView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    pub entries: Vec<EntityKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Wire name, used as the sort field.
    pub field: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: Option<EntityId>,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationInfo {
    pub mode: ListMode,
    /// Zero-based current page (last loaded page for infinite scroll).
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub kind: EntityKind,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub sort: SortState,
    pub pagination: PaginationInfo,
    /// "No <Title> found" when the list is empty and nothing is loading.
    pub empty_banner: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub kind: EntityKind,
    pub id: EntityId,
    /// (label, rendered value) pairs, id first.
    pub fields: Vec<(String, String)>,
    /// Set when the record could not be loaded.
    pub not_found: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub kind: EntityKind,
    pub id: Option<EntityId>,
    pub fields: Vec<FieldSpec>,
    /// Per field: selectable `(value, label)` pairs for enums and relations.
    pub options: Vec<Vec<(String, String)>>,
    pub errors: Vec<FieldError>,
    /// Present once, when the form content should be (re)seeded.
    pub seed: Option<FormDraft>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteView {
    pub kind: EntityKind,
    pub id: EntityId,
    pub question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_routes() {
        let id = EntityId::Number(1);
        assert_eq!(Route::Home.parent(), Route::Home);
        assert_eq!(Route::List(EntityKind::Tag).parent(), Route::Home);
        assert_eq!(
            Route::Edit(EntityKind::Tag, id.clone()).parent(),
            Route::List(EntityKind::Tag)
        );
        assert!(Route::Delete(EntityKind::Tag, id).is_mutation());
        assert!(!Route::List(EntityKind::Tag).is_mutation());
    }
}
