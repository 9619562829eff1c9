// Application state and orchestration logic.
//
// The central event loop receives user commands from the TUI and action
// results from spawned request tasks, folds results into the store, and
// pushes screen snapshots back to the TUI render loop.

use std::collections::HashMap;

use chrono::Utc;
use partywave_core::config::Config;
use partywave_core::model::{EntityKind, ListMode};
use partywave_core::query::ListQuery;
use partywave_core::ApiClient;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::form::{build_payload, changed_fields, FieldError, FormDraft};
use crate::protocol::{Route, ScreenBody, ScreenSnapshot, StatusLine, UiUpdate, UserCommand};
use crate::store::{Action, Operation, Store};
use crate::view::{self, ListState};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub client: ApiClient,
    pub store: Store,
    pub route: Route,
    /// Sort/page position per entity list, kept across navigation.
    pub lists: HashMap<EntityKind, ListState>,
    /// Validation errors of the last rejected submit.
    pub form_errors: Vec<FieldError>,
    /// Draft the current form was seeded with; patch submits diff against it.
    pub form_baseline: Option<FormDraft>,
    /// Seed not yet delivered to the TUI.
    pending_seed: Option<FormDraft>,
    /// Edit route is waiting for its record before seeding the form.
    awaiting_edit_seed: bool,
    /// Sender handed to request tasks; results come back through `run`.
    pub api_tx: mpsc::Sender<Action>,
}

impl AppState {
    pub fn new(config: Config, client: ApiClient, api_tx: mpsc::Sender<Action>) -> Self {
        Self {
            config,
            client,
            store: Store::default(),
            route: Route::Home,
            lists: HashMap::new(),
            form_errors: Vec::new(),
            form_baseline: None,
            pending_seed: None,
            awaiting_edit_seed: false,
            api_tx,
        }
    }

    pub fn list_state(&mut self, kind: EntityKind) -> &mut ListState {
        let size = self.config.ui.items_per_page;
        self.lists
            .entry(kind)
            .or_insert_with(|| ListState::new(size))
    }

    fn dispatch(&mut self, kind: EntityKind, op: Operation) {
        self.store.dispatch(&self.client, kind, op, &self.api_tx);
    }

    /// Fetch the list for `kind` according to its list mode and position.
    fn fetch_list(&mut self, kind: EntityKind) {
        let list = self.list_state(kind).clone();
        let query = match kind.list_mode() {
            ListMode::Sorted => ListQuery::sorted(list.sort),
            ListMode::Paginated | ListMode::InfiniteScroll => {
                ListQuery::paged(list.page, list.size, list.sort)
            }
        };
        self.dispatch(kind, Operation::FetchList(query));
    }

    /// Load the records offered as options by `kind`'s relation fields.
    fn fetch_references(&mut self, kind: EntityKind) {
        for target in kind.relation_targets() {
            self.dispatch(target, Operation::FetchList(ListQuery::empty()));
        }
    }

    /// Switch to `route` and start the fetches it needs.
    pub fn navigate(&mut self, route: Route) {
        info!("Navigating to {:?}", route);
        self.route = route.clone();
        self.form_errors.clear();
        self.form_baseline = None;
        self.pending_seed = None;
        self.awaiting_edit_seed = false;

        match route {
            Route::Home => {}
            Route::List(kind) => {
                if kind.list_mode() == ListMode::InfiniteScroll {
                    self.store.reset(kind);
                    self.list_state(kind).page = 0;
                }
                self.fetch_list(kind);
            }
            Route::Detail(kind, id) | Route::Delete(kind, id) => {
                self.dispatch(kind, Operation::FetchOne(id));
            }
            Route::Create(kind) => {
                self.store.reset(kind);
                self.fetch_references(kind);
                let defaults = self.store.slice(kind).entity_json();
                let draft = FormDraft::new_record(kind, &defaults, Utc::now());
                self.form_baseline = Some(draft.clone());
                self.pending_seed = Some(draft);
            }
            Route::Edit(kind, id) => {
                self.dispatch(kind, Operation::FetchOne(id));
                self.fetch_references(kind);
                self.awaiting_edit_seed = true;
            }
        }
    }

    /// Validate the draft and dispatch the matching create/update/patch.
    fn submit(&mut self, draft: FormDraft, partial: bool) {
        let kind = match &self.route {
            Route::Create(kind) | Route::Edit(kind, _) if *kind == draft.kind => *kind,
            other => {
                warn!("Ignoring form submit for {} on route {:?}", draft.kind, other);
                return;
            }
        };

        let result = {
            let store = &self.store;
            let base = store.slice(kind).entity_json();
            let references = |target: EntityKind| store.slice(target).entities_json();
            build_payload(&draft, &base, &references)
        };

        let payload = match result {
            Ok(payload) => payload,
            Err(errors) => {
                info!("{} form rejected with {} error(s)", kind, errors.len());
                self.form_errors = errors;
                return;
            }
        };
        self.form_errors.clear();

        let op = match (draft.id.clone(), partial) {
            (None, _) => Operation::Create(payload),
            (Some(id), true) => {
                let fields = match &self.form_baseline {
                    Some(baseline) => changed_fields(baseline, &draft, &payload),
                    None => match payload {
                        Value::Object(map) => map,
                        _ => Map::new(),
                    },
                };
                Operation::Patch { id, fields }
            }
            (Some(_), false) => Operation::Update(payload),
        };
        info!("Submitting {} {}", kind, op.name());
        self.dispatch(kind, op);
    }

    fn change_page(&mut self, kind: EntityKind, page: u32) {
        let total_items = self.store.slice(kind).total_items();
        let list = self.list_state(kind);
        let pages = partywave_core::pagination::total_pages(total_items, list.size);
        let page = page.min(pages.saturating_sub(1));
        if page != list.page {
            list.page = page;
            self.fetch_list(kind);
        }
    }

    /// Snapshot of the current screen. Delivers a pending form seed once.
    pub fn build_snapshot(&mut self) -> ScreenSnapshot {
        let date_format = self.config.ui.date_format.clone();
        let status = match self.route.kind() {
            Some(kind) => {
                let slice = self.store.slice(kind);
                StatusLine {
                    base_url: self.client.base_url().to_string(),
                    loading: slice.loading(),
                    updating: slice.updating(),
                    error: slice.error_message().map(str::to_string),
                }
            }
            None => StatusLine {
                base_url: self.client.base_url().to_string(),
                ..Default::default()
            },
        };

        let body = match self.route.clone() {
            Route::Home => ScreenBody::Home(view::home_view()),
            Route::List(kind) => {
                let list = self.list_state(kind).clone();
                ScreenBody::List(view::list_view(self.store.slice(kind), &list, &date_format))
            }
            Route::Detail(kind, id) => {
                ScreenBody::Detail(view::detail_view(self.store.slice(kind), &id, &date_format))
            }
            Route::Create(kind) => ScreenBody::Form(view::form_view(
                &self.store,
                kind,
                None,
                self.form_errors.clone(),
                self.pending_seed.take(),
            )),
            Route::Edit(kind, id) => ScreenBody::Form(view::form_view(
                &self.store,
                kind,
                Some(id),
                self.form_errors.clone(),
                self.pending_seed.take(),
            )),
            Route::Delete(kind, id) => {
                ScreenBody::Delete(view::delete_view(self.store.slice(kind), &id))
            }
        };

        ScreenSnapshot {
            route: self.route.clone(),
            status,
            body,
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Results from request tasks
///
/// Pushes UI updates through `ui_tx` for the TUI render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut api_rx: mpsc::Receiver<Action>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    send_snapshot(&mut state, &ui_tx).await;

    loop {
        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Request results ---
            action = api_rx.recv() => {
                match action {
                    Some(action) => {
                        handle_api_action(&mut state, action, &ui_tx).await;
                    }
                    None => {
                        info!("Action channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

async fn send_snapshot(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    if ui_tx
        .send(UiUpdate::Screen(Box::new(snapshot)))
        .await
        .is_err()
    {
        debug!("UI channel closed, dropping snapshot");
    }
}

/// Handle a user command from the TUI.
pub async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Navigate(route) => state.navigate(route),
        UserCommand::Refresh => {
            let route = state.route.clone();
            state.navigate(route);
        }
        UserCommand::SortBy(field) => {
            if let Route::List(kind) = state.route {
                let infinite = kind.list_mode() == ListMode::InfiniteScroll;
                let list = state.list_state(kind);
                list.sort.toggle(&field);
                info!("Sorting {} by {}", kind, list.sort.param());
                if infinite {
                    list.page = 0;
                    state.store.reset(kind);
                }
                state.fetch_list(kind);
            }
        }
        UserCommand::GoToPage(page) => {
            if let Route::List(kind) = state.route {
                if kind.list_mode() == ListMode::Paginated {
                    state.change_page(kind, page);
                }
            }
        }
        UserCommand::NextPage => {
            if let Route::List(kind) = state.route {
                if kind.list_mode() == ListMode::Paginated {
                    let next = state.list_state(kind).page.saturating_add(1);
                    state.change_page(kind, next);
                }
            }
        }
        UserCommand::PrevPage => {
            if let Route::List(kind) = state.route {
                if kind.list_mode() == ListMode::Paginated {
                    let prev = state.list_state(kind).page.saturating_sub(1);
                    state.change_page(kind, prev);
                }
            }
        }
        UserCommand::LoadMore => {
            if let Route::List(kind) = state.route {
                let links = state.store.slice(kind).links();
                let loading = state.store.slice(kind).loading();
                if kind.list_mode() == ListMode::InfiniteScroll && !loading {
                    let list = state.list_state(kind);
                    if links.has_more(list.page) {
                        list.page += 1;
                        state.fetch_list(kind);
                    }
                }
            }
        }
        UserCommand::Submit { draft, partial } => state.submit(draft, partial),
        UserCommand::ConfirmDelete => {
            if let Route::Delete(kind, id) = state.route.clone() {
                info!("Deleting {} {}", kind, id);
                state.dispatch(kind, Operation::Delete(id));
            }
        }
        UserCommand::Back => {
            let parent = state.route.parent();
            state.navigate(parent);
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
    send_snapshot(state, ui_tx).await;
}

/// Fold a request result into the store and react to it.
pub async fn handle_api_action(
    state: &mut AppState,
    action: Action,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let kind = action.kind();
    if let Some(notice) = action.notice() {
        let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
    }
    state.store.apply(action);

    if state.awaiting_edit_seed {
        if let Route::Edit(route_kind, id) = &state.route {
            let slice = state.store.slice(kind);
            if *route_kind == kind && !slice.loading() {
                let record = slice.entity_json();
                if record["id"] == serde_json::to_value(id).unwrap_or(Value::Null) {
                    let draft = FormDraft::from_record(kind, &record);
                    state.form_baseline = Some(draft.clone());
                    state.pending_seed = Some(draft);
                    state.awaiting_edit_seed = false;
                }
            }
        }
    }

    if state.route.is_mutation()
        && state.route.kind() == Some(kind)
        && state.store.slice(kind).update_success()
    {
        state.navigate(Route::List(kind));
    }

    send_snapshot(state, ui_tx).await;
}
