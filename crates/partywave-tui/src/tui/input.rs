// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (cursor movement,
// form editing, dialogs).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use partywave_app::form::FieldInput;
use partywave_app::protocol::{
    DetailView, FormView, HomeView, ListView, Route, ScreenBody, UserCommand,
};
use partywave_core::model::{FieldKind, ListMode};

use super::{Cursor, FormEditor, ViewState};

/// Lines moved by PageUp/PageDown in the detail view.
const DETAIL_PAGE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when the key press was handled locally
/// by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    let ViewState {
        screen,
        cursor,
        form,
        confirm_quit,
        ..
    } = view_state;

    let Some(screen) = screen.as_ref() else {
        if key_event.code == KeyCode::Char('q') {
            *confirm_quit = true;
        }
        return None;
    };

    // Forms capture printable characters, so 'q' types instead of quitting.
    if let ScreenBody::Form(view) = &screen.body {
        return handle_form(key_event, view, form.as_mut());
    }

    match key_event.code {
        KeyCode::Char('q') => {
            *confirm_quit = true;
            return None;
        }
        KeyCode::Esc | KeyCode::Backspace => {
            return (screen.route != Route::Home).then_some(UserCommand::Back);
        }
        KeyCode::Char('r') => return Some(UserCommand::Refresh),
        _ => {}
    }

    match &screen.body {
        ScreenBody::Home(view) => handle_home(key_event, view, cursor),
        ScreenBody::List(view) => handle_list(key_event, view, cursor),
        ScreenBody::Detail(view) => handle_detail(key_event, view, cursor),
        ScreenBody::Delete(_) => match key_event.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                Some(UserCommand::ConfirmDelete)
            }
            KeyCode::Char('n') | KeyCode::Char('N') => Some(UserCommand::Back),
            _ => None,
        },
        ScreenBody::Form(_) => None,
    }
}

/// Handle key events while the quit dialog is open.
///
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels (returns to normal mode)
/// - All other keys are blocked (no-op)
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

fn move_up(cursor: &mut Cursor) {
    cursor.selected = cursor.selected.saturating_sub(1);
}

fn move_down(cursor: &mut Cursor, len: usize) {
    if cursor.selected + 1 < len {
        cursor.selected += 1;
    }
}

fn handle_home(key_event: KeyEvent, view: &HomeView, cursor: &mut Cursor) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            move_up(cursor);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_down(cursor, view.entries.len());
            None
        }
        KeyCode::Enter => view
            .entries
            .get(cursor.selected)
            .map(|kind| UserCommand::Navigate(Route::List(*kind))),
        _ => None,
    }
}

fn handle_list(key_event: KeyEvent, view: &ListView, cursor: &mut Cursor) -> Option<UserCommand> {
    let kind = view.kind;
    let selected_id = view
        .rows
        .get(cursor.selected)
        .and_then(|row| row.id.clone());
    let pagination = &view.pagination;

    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            move_up(cursor);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let at_bottom = cursor.selected + 1 >= view.rows.len();
            if at_bottom && pagination.mode == ListMode::InfiniteScroll && pagination.has_more {
                return Some(UserCommand::LoadMore);
            }
            move_down(cursor, view.rows.len());
            None
        }
        KeyCode::Left | KeyCode::Char('h') => {
            cursor.column = cursor.column.saturating_sub(1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if cursor.column + 1 < view.columns.len() {
                cursor.column += 1;
            }
            None
        }
        KeyCode::Char('s') => view
            .columns
            .get(cursor.column)
            .map(|column| UserCommand::SortBy(column.field.clone())),

        KeyCode::Char(']') | KeyCode::PageDown => match pagination.mode {
            ListMode::Paginated => Some(UserCommand::NextPage),
            ListMode::InfiniteScroll if pagination.has_more => Some(UserCommand::LoadMore),
            _ => None,
        },
        KeyCode::Char('[') | KeyCode::PageUp => {
            (pagination.mode == ListMode::Paginated).then_some(UserCommand::PrevPage)
        }
        KeyCode::Char(c @ '1'..='9') if pagination.mode == ListMode::Paginated => {
            let page = c.to_digit(10).map_or(0, |d| d - 1);
            (page < pagination.total_pages).then_some(UserCommand::GoToPage(page))
        }

        KeyCode::Enter => selected_id.map(|id| UserCommand::Navigate(Route::Detail(kind, id))),
        KeyCode::Char('n') => Some(UserCommand::Navigate(Route::Create(kind))),
        KeyCode::Char('e') => selected_id.map(|id| UserCommand::Navigate(Route::Edit(kind, id))),
        KeyCode::Char('d') => {
            selected_id.map(|id| UserCommand::Navigate(Route::Delete(kind, id)))
        }
        _ => None,
    }
}

fn handle_detail(
    key_event: KeyEvent,
    view: &DetailView,
    cursor: &mut Cursor,
) -> Option<UserCommand> {
    let last_line = view.fields.len().saturating_sub(1);
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            cursor.scroll = cursor.scroll.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            cursor.scroll = (cursor.scroll + 1).min(last_line);
            None
        }
        KeyCode::PageUp => {
            cursor.scroll = cursor.scroll.saturating_sub(DETAIL_PAGE);
            None
        }
        KeyCode::PageDown => {
            cursor.scroll = (cursor.scroll + DETAIL_PAGE).min(last_line);
            None
        }
        KeyCode::Char('e') => Some(UserCommand::Navigate(Route::Edit(
            view.kind,
            view.id.clone(),
        ))),
        KeyCode::Char('d') => Some(UserCommand::Navigate(Route::Delete(
            view.kind,
            view.id.clone(),
        ))),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Form editing
// ---------------------------------------------------------------------------

/// Handle key events on a create/edit form.
///
/// - Up/Down, Tab/BackTab move between fields
/// - Ctrl+S saves the whole record, Ctrl+P saves only changed fields
/// - Esc cancels back to the list
/// - Everything else edits the focused field
fn handle_form(
    key_event: KeyEvent,
    view: &FormView,
    editor: Option<&mut FormEditor>,
) -> Option<UserCommand> {
    if key_event.code == KeyCode::Esc {
        return Some(UserCommand::Back);
    }
    // Still waiting for the record to load.
    let editor = editor?;

    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return match key_event.code {
            KeyCode::Char('s') => Some(UserCommand::Submit {
                draft: editor.draft.clone(),
                partial: false,
            }),
            KeyCode::Char('p') => Some(UserCommand::Submit {
                draft: editor.draft.clone(),
                partial: true,
            }),
            _ => None,
        };
    }

    let field_count = editor.draft.inputs.len();
    match key_event.code {
        KeyCode::Up | KeyCode::BackTab => {
            editor.field = editor.field.saturating_sub(1);
            editor.option = 0;
            return None;
        }
        KeyCode::Down | KeyCode::Tab => {
            if editor.field + 1 < field_count {
                editor.field += 1;
            }
            editor.option = 0;
            return None;
        }
        _ => {}
    }

    let spec = editor.current_spec()?;
    let options = view.options.get(editor.field).map_or(&[][..], |o| o.as_slice());

    // Cursor moves that never touch the input itself.
    match (spec.kind, key_event.code) {
        (FieldKind::Text { .. } | FieldKind::Integer | FieldKind::Instant, KeyCode::Enter) => {
            if editor.field + 1 < field_count {
                editor.field += 1;
            }
            return None;
        }
        (FieldKind::ManyRelation { .. }, KeyCode::Left) => {
            editor.option = editor.option.saturating_sub(1);
            return None;
        }
        (FieldKind::ManyRelation { .. }, KeyCode::Right) => {
            if editor.option + 1 < options.len() {
                editor.option += 1;
            }
            return None;
        }
        _ => {}
    }

    let option_cursor = editor.option;
    match editor.current_input_mut()? {
        FieldInput::Text(text) => match key_event.code {
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            _ => {}
        },
        FieldInput::Flag(flag) => {
            if matches!(
                key_event.code,
                KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Left | KeyCode::Right
            ) {
                *flag = !*flag;
            }
        }
        FieldInput::Choice(choice) => match key_event.code {
            KeyCode::Left => *choice = cycle_choice(choice.as_deref(), options, spec.required, -1),
            KeyCode::Right | KeyCode::Char(' ') => {
                *choice = cycle_choice(choice.as_deref(), options, spec.required, 1)
            }
            KeyCode::Backspace if !spec.required => *choice = None,
            _ => {}
        },
        FieldInput::Many(selected) => {
            if matches!(key_event.code, KeyCode::Char(' ') | KeyCode::Enter) {
                if let Some((value, _)) = options.get(option_cursor) {
                    toggle_member(selected, value);
                }
            }
        }
    }
    None
}

/// Step through `options`, with an extra "nothing selected" slot for
/// optional fields.
fn cycle_choice(
    current: Option<&str>,
    options: &[(String, String)],
    required: bool,
    step: isize,
) -> Option<String> {
    let mut slots: Vec<Option<&str>> = Vec::with_capacity(options.len() + 1);
    if !required || options.is_empty() {
        slots.push(None);
    }
    slots.extend(options.iter().map(|(value, _)| Some(value.as_str())));

    let len = slots.len() as isize;
    let index = slots.iter().position(|slot| *slot == current).unwrap_or(0) as isize;
    let next = (index + step).rem_euclid(len) as usize;
    slots[next].map(str::to_string)
}

fn toggle_member(selected: &mut Vec<String>, value: &str) {
    if let Some(index) = selected.iter().position(|v| v == value) {
        selected.remove(index);
    } else {
        selected.push(value.to_string());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::{snapshot, tag_list};
    use partywave_app::form::FormDraft;
    use partywave_app::protocol::DeleteView;
    use partywave_core::model::{EntityId, EntityKind};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn list_state(names: &[&str]) -> ViewState {
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot(
            Route::List(EntityKind::Tag),
            ScreenBody::List(tag_list(names)),
        ));
        state
    }

    fn form_state(kind: EntityKind, options: Vec<Vec<(String, String)>>) -> ViewState {
        let draft = FormDraft {
            kind,
            id: None,
            inputs: kind
                .fields()
                .iter()
                .map(|spec| FieldInput::empty(spec.kind))
                .collect(),
        };
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot(
            Route::Create(kind),
            ScreenBody::Form(FormView {
                kind,
                id: None,
                fields: kind.fields().to_vec(),
                options,
                errors: Vec::new(),
                seed: Some(draft),
            }),
        ));
        state
    }

    fn editor(state: &ViewState) -> &FormEditor {
        state.form.as_ref().unwrap()
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = list_state(&["a"]);
        let mut event = key(KeyCode::Char('n'));
        event.kind = KeyEventKind::Release;
        assert_eq!(handle_key(event, &mut state), None);
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut state = form_state(EntityKind::Tag, vec![vec![]; 2]);
        assert_eq!(handle_key(ctrl('c'), &mut state), Some(UserCommand::Quit));
    }

    #[test]
    fn q_asks_for_confirmation_first() {
        let mut state = list_state(&["a"]);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), None);
        assert!(state.confirm_quit);
        // Other keys are blocked while the dialog is open.
        assert_eq!(handle_key(key(KeyCode::Char('n')), &mut state), None);
        assert!(!state.confirm_quit);

        handle_key(key(KeyCode::Char('q')), &mut state);
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn home_enter_opens_selected_list() {
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot(
            Route::Home,
            ScreenBody::Home(HomeView {
                entries: EntityKind::all().to_vec(),
            }),
        ));
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::Navigate(Route::List(EntityKind::all()[2])))
        );
        // Back is meaningless on the home screen.
        assert_eq!(handle_key(key(KeyCode::Esc), &mut state), None);
    }

    #[test]
    fn list_actions_target_selected_row() {
        let mut state = list_state(&["house", "jazz"]);
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.cursor.selected, 1);

        let id = EntityId::Number(2);
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::Navigate(Route::Detail(EntityKind::Tag, id.clone())))
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('e')), &mut state),
            Some(UserCommand::Navigate(Route::Edit(EntityKind::Tag, id.clone())))
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('d')), &mut state),
            Some(UserCommand::Navigate(Route::Delete(EntityKind::Tag, id)))
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('n')), &mut state),
            Some(UserCommand::Navigate(Route::Create(EntityKind::Tag)))
        );
        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut state),
            Some(UserCommand::Back)
        );
    }

    #[test]
    fn empty_list_has_no_row_actions() {
        let mut state = list_state(&[]);
        assert_eq!(handle_key(key(KeyCode::Enter), &mut state), None);
        assert_eq!(handle_key(key(KeyCode::Char('e')), &mut state), None);
    }

    #[test]
    fn sort_uses_focused_column() {
        let mut state = list_state(&["a"]);
        assert_eq!(
            handle_key(key(KeyCode::Char('s')), &mut state),
            Some(UserCommand::SortBy("id".into()))
        );
        handle_key(key(KeyCode::Right), &mut state);
        handle_key(key(KeyCode::Right), &mut state);
        assert_eq!(state.cursor.column, 1);
        assert_eq!(
            handle_key(key(KeyCode::Char('s')), &mut state),
            Some(UserCommand::SortBy("name".into()))
        );
    }

    #[test]
    fn page_keys_follow_list_mode() {
        let mut state = list_state(&["a"]);
        assert_eq!(handle_key(key(KeyCode::Char(']')), &mut state), None);

        let mut paged = tag_list(&["a", "b"]);
        paged.pagination.mode = ListMode::Paginated;
        paged.pagination.total_pages = 3;
        state.apply_snapshot(snapshot(Route::List(EntityKind::Tag), ScreenBody::List(paged)));
        assert_eq!(
            handle_key(key(KeyCode::Char(']')), &mut state),
            Some(UserCommand::NextPage)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('[')), &mut state),
            Some(UserCommand::PrevPage)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('3')), &mut state),
            Some(UserCommand::GoToPage(2))
        );
        assert_eq!(handle_key(key(KeyCode::Char('4')), &mut state), None);
    }

    #[test]
    fn scrolling_past_last_row_loads_more() {
        let mut view = tag_list(&["a", "b"]);
        view.pagination.mode = ListMode::InfiniteScroll;
        view.pagination.has_more = true;
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot(Route::List(EntityKind::Tag), ScreenBody::List(view)));

        assert_eq!(handle_key(key(KeyCode::Down), &mut state), None);
        assert_eq!(
            handle_key(key(KeyCode::Down), &mut state),
            Some(UserCommand::LoadMore)
        );
    }

    #[test]
    fn delete_screen_confirms_or_cancels() {
        let mut state = ViewState::default();
        let id = EntityId::Number(3);
        state.apply_snapshot(snapshot(
            Route::Delete(EntityKind::Tag, id.clone()),
            ScreenBody::Delete(DeleteView {
                kind: EntityKind::Tag,
                id,
                question: "Are you sure you want to delete Tag 3?".into(),
            }),
        ));
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::ConfirmDelete)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('n')), &mut state),
            Some(UserCommand::Back)
        );
    }

    #[test]
    fn typing_edits_focused_text_field() {
        let mut state = form_state(EntityKind::Tag, vec![vec![]; 2]);
        for c in "jaqz".chars() {
            assert_eq!(handle_key(key(KeyCode::Char(c)), &mut state), None);
        }
        handle_key(key(KeyCode::Backspace), &mut state);
        handle_key(key(KeyCode::Char('z')), &mut state);
        assert_eq!(
            editor(&state).draft.input("name"),
            Some(&FieldInput::Text("jaqz".into()))
        );
        assert!(!state.confirm_quit);
    }

    #[test]
    fn ctrl_s_and_ctrl_p_submit_the_draft() {
        let mut state = form_state(EntityKind::Tag, vec![vec![]; 2]);
        handle_key(key(KeyCode::Char('x')), &mut state);
        let draft = editor(&state).draft.clone();
        assert_eq!(
            handle_key(ctrl('s'), &mut state),
            Some(UserCommand::Submit {
                draft: draft.clone(),
                partial: false
            })
        );
        assert_eq!(
            handle_key(ctrl('p'), &mut state),
            Some(UserCommand::Submit {
                draft,
                partial: true
            })
        );
    }

    #[test]
    fn flags_toggle_with_space() {
        let mut state = form_state(EntityKind::Room, vec![vec![]; EntityKind::Room.fields().len()]);
        let is_public = EntityKind::Room
            .fields()
            .iter()
            .position(|f| f.name == "isPublic")
            .unwrap();
        for _ in 0..is_public {
            handle_key(key(KeyCode::Tab), &mut state);
        }
        handle_key(key(KeyCode::Char(' ')), &mut state);
        assert_eq!(
            editor(&state).draft.input("isPublic"),
            Some(&FieldInput::Flag(true))
        );
    }

    #[test]
    fn relation_choice_cycles_through_options() {
        let kind = EntityKind::ChatMessage;
        let room = kind.fields().iter().position(|f| f.name == "room").unwrap();
        let mut options = vec![Vec::new(); kind.fields().len()];
        options[room] = vec![("5".to_string(), "Lobby".to_string()), ("6".into(), "Den".into())];
        let mut state = form_state(kind, options);
        state.form.as_mut().unwrap().field = room;

        handle_key(key(KeyCode::Right), &mut state);
        assert_eq!(
            editor(&state).draft.input("room"),
            Some(&FieldInput::Choice(Some("5".into())))
        );
        handle_key(key(KeyCode::Right), &mut state);
        handle_key(key(KeyCode::Right), &mut state);
        // Optional relation: wraps through "none".
        assert_eq!(
            editor(&state).draft.input("room"),
            Some(&FieldInput::Choice(None))
        );
        handle_key(key(KeyCode::Left), &mut state);
        assert_eq!(
            editor(&state).draft.input("room"),
            Some(&FieldInput::Choice(Some("6".into())))
        );
    }

    #[test]
    fn many_relation_toggles_option_under_cursor() {
        let kind = EntityKind::Room;
        let tags = kind.fields().iter().position(|f| f.name == "tags").unwrap();
        let mut options = vec![Vec::new(); kind.fields().len()];
        options[tags] = vec![("1".to_string(), "house".to_string()), ("2".into(), "jazz".into())];
        let mut state = form_state(kind, options);
        state.form.as_mut().unwrap().field = tags;

        handle_key(key(KeyCode::Right), &mut state);
        handle_key(key(KeyCode::Char(' ')), &mut state);
        handle_key(key(KeyCode::Left), &mut state);
        handle_key(key(KeyCode::Char(' ')), &mut state);
        assert_eq!(
            editor(&state).draft.input("tags"),
            Some(&FieldInput::Many(vec!["2".into(), "1".into()]))
        );
        handle_key(key(KeyCode::Char(' ')), &mut state);
        assert_eq!(
            editor(&state).draft.input("tags"),
            Some(&FieldInput::Many(vec!["2".into()]))
        );
    }

    #[test]
    fn required_choice_never_clears() {
        let options = vec![("A".to_string(), "A".to_string()), ("B".into(), "B".into())];
        assert_eq!(cycle_choice(None, &options, true, 1), Some("B".into()));
        assert_eq!(cycle_choice(Some("B"), &options, true, 1), Some("A".into()));
        assert_eq!(cycle_choice(Some("A"), &options, false, -1), None);
    }

    #[test]
    fn form_without_seed_only_allows_cancel() {
        let mut state = form_state(EntityKind::Tag, vec![vec![]; 2]);
        state.form = None;
        assert_eq!(handle_key(key(KeyCode::Char('x')), &mut state), None);
        assert_eq!(handle_key(ctrl('s'), &mut state), None);
        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut state),
            Some(UserCommand::Back)
        );
    }
}
