// Status bar widget: backend, current screen, request activity, last notice.

use partywave_app::protocol::{Notice, Route, StatusLine};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [title] [screen] [backend] [activity] [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::styled(
        " PartyWave Admin ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(screen) = &state.screen {
        spans.push(Span::styled(
            format!(" {} ", route_label(&screen.route)),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            screen.status.base_url.clone(),
            Style::default().fg(Color::Gray),
        ));
        if let Some((label, color)) = activity_indicator(&screen.status) {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(label, Style::default().fg(color)));
        }
    }

    if let Some(notice) = &state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(notice_span(notice));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Breadcrumb for the current route, e.g. "Rooms > Edit 7".
pub fn route_label(route: &Route) -> String {
    match route {
        Route::Home => "Home".to_string(),
        Route::List(kind) => kind.title().to_string(),
        Route::Detail(kind, id) => format!("{} > {id}", kind.title()),
        Route::Create(kind) => format!("{} > New", kind.title()),
        Route::Edit(kind, id) => format!("{} > Edit {id}", kind.title()),
        Route::Delete(kind, id) => format!("{} > Delete {id}", kind.title()),
    }
}

/// Activity marker for in-flight requests; `None` when idle.
pub fn activity_indicator(status: &StatusLine) -> Option<(&'static str, Color)> {
    if status.updating {
        Some(("[saving]", Color::Yellow))
    } else if status.loading {
        Some(("[loading]", Color::Yellow))
    } else {
        None
    }
}

fn notice_span(notice: &Notice) -> Span<'static> {
    let color = if notice.is_error {
        Color::Red
    } else {
        Color::Green
    };
    Span::styled(notice.text.clone(), Style::default().fg(color))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::{buffer_text, snapshot};
    use partywave_app::protocol::{HomeView, ScreenBody};
    use partywave_core::model::{EntityId, EntityKind};

    #[test]
    fn route_labels() {
        let id = EntityId::Number(7);
        assert_eq!(route_label(&Route::Home), "Home");
        assert_eq!(route_label(&Route::List(EntityKind::RoomMember)), "Room Members");
        assert_eq!(
            route_label(&Route::Edit(EntityKind::Room, id.clone())),
            "Rooms > Edit 7"
        );
        assert_eq!(route_label(&Route::Create(EntityKind::Tag)), "Tags > New");
        assert_eq!(route_label(&Route::Detail(EntityKind::Vote, id)), "Votes > 7");
    }

    #[test]
    fn saving_wins_over_loading() {
        let status = StatusLine {
            loading: true,
            updating: true,
            ..Default::default()
        };
        assert_eq!(activity_indicator(&status), Some(("[saving]", Color::Yellow)));
        assert_eq!(activity_indicator(&StatusLine::default()), None);
    }

    #[test]
    fn render_shows_route_and_notice() {
        let backend = ratatui::backend::TestBackend::new(120, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot(
            Route::Home,
            ScreenBody::Home(HomeView { entries: Vec::new() }),
        ));
        state.notice = Some(Notice::error("500: Internal Server Error"));
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Home"));
        assert!(text.contains("http://localhost:8080/"));
        assert!(text.contains("500: Internal Server Error"));
    }
}
