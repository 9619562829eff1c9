// TUI console: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest screen snapshot pushed by the
// app orchestrator plus purely local state (cursor, form edits, dialogs). It
// applies `UiUpdate` messages from an mpsc channel and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use partywave_app::form::{FieldInput, FormDraft};
use partywave_app::protocol::{Notice, ScreenBody, ScreenSnapshot, UiUpdate, UserCommand};
use partywave_core::model::FieldSpec;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::debug;

use layout::build_layout;

// ---------------------------------------------------------------------------
// Local state
// ---------------------------------------------------------------------------

/// Selection and scroll position on the current screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Highlighted row of the home menu or an entity list.
    pub selected: usize,
    /// Focused list column, the target of `s` (sort).
    pub column: usize,
    /// First visible line of the detail view.
    pub scroll: usize,
}

/// Form being edited. Seeded from the snapshot, then edited locally until
/// it is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct FormEditor {
    pub draft: FormDraft,
    /// Index of the focused field.
    pub field: usize,
    /// Cursor inside the option list of a many-relation field.
    pub option: usize,
}

impl FormEditor {
    pub fn new(draft: FormDraft) -> Self {
        FormEditor {
            draft,
            field: 0,
            option: 0,
        }
    }

    pub fn current_spec(&self) -> Option<&'static FieldSpec> {
        self.draft.fields().get(self.field)
    }

    pub fn current_input_mut(&mut self) -> Option<&mut FieldInput> {
        self.draft.inputs.get_mut(self.field)
    }
}

/// TUI-local state that mirrors the application state for rendering.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Latest screen pushed by the app; `None` until the first snapshot.
    pub screen: Option<ScreenSnapshot>,
    /// Last notification (alert, error) shown in the status bar.
    pub notice: Option<Notice>,
    pub cursor: Cursor,
    pub form: Option<FormEditor>,
    /// Whether the quit dialog is open.
    pub confirm_quit: bool,
}

impl ViewState {
    /// Replace the current screen. Local cursor state is reset when the route
    /// changes, and the form editor is (re)seeded when the snapshot carries a
    /// seed.
    pub fn apply_snapshot(&mut self, snapshot: ScreenSnapshot) {
        let route_changed = self.screen.as_ref().map(|s| &s.route) != Some(&snapshot.route);
        if route_changed {
            self.cursor = Cursor::default();
        }

        match &snapshot.body {
            ScreenBody::Form(form) => {
                if let Some(seed) = &form.seed {
                    self.form = Some(FormEditor::new(seed.clone()));
                } else if route_changed {
                    self.form = None;
                }
            }
            _ => self.form = None,
        }

        let rows = match &snapshot.body {
            ScreenBody::Home(home) => home.entries.len(),
            ScreenBody::List(list) => list.rows.len(),
            _ => 0,
        };
        self.cursor.selected = self.cursor.selected.min(rows.saturating_sub(1));
        if let ScreenBody::List(list) = &snapshot.body {
            self.cursor.column = self.cursor.column.min(list.columns.len().saturating_sub(1));
        }

        self.screen = Some(snapshot);
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Screen(snapshot) => state.apply_snapshot(*snapshot),
        UiUpdate::Notice(notice) => state.notice = Some(notice),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete console frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());
    widgets::status_bar::render(frame, layout.status_bar, state);
    render_main_panel(frame, layout.main_panel, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

fn render_main_panel(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    let Some(screen) = &state.screen else {
        let paragraph = Paragraph::new("Connecting...")
            .block(Block::default().borders(Borders::ALL).title("PartyWave Admin"));
        frame.render_widget(paragraph, area);
        return;
    };

    match &screen.body {
        ScreenBody::Home(home) => widgets::entity_menu::render(frame, area, home, &state.cursor),
        ScreenBody::List(list) => {
            widgets::entity_table::render(frame, area, list, &state.cursor, screen.status.loading)
        }
        ScreenBody::Detail(detail) => {
            widgets::entity_detail::render(frame, area, detail, &state.cursor)
        }
        ScreenBody::Form(form) => {
            widgets::entity_form::render(frame, area, form, state.form.as_ref())
        }
        ScreenBody::Delete(delete) => widgets::delete_confirm::render(frame, area, delete),
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Set panic hook to restore terminal on crash.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Local view state and input stream
    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    // 4. Render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 5. Main loop
    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            if cmd_tx.send(cmd).await.is_err() {
                                debug!("command channel closed");
                                break Ok(());
                            }
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    // Mouse and resize events: the next tick redraws
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(e.into()),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    // 6. Restore terminal
    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
