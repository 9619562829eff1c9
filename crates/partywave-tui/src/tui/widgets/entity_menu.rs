// Home screen: menu of every entity collection.

use partywave_app::protocol::HomeView;
use partywave_core::model::ListMode;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::tui::Cursor;

pub fn render(frame: &mut Frame, area: Rect, view: &HomeView, cursor: &Cursor) {
    let items: Vec<ListItem> = view
        .entries
        .iter()
        .map(|kind| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<20}", kind.title()), Style::default().fg(Color::White)),
                Span::styled(
                    format!("/{}", kind.api_path()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("  {}", mode_label(kind.list_mode())),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Entities"))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut list_state = ListState::default().with_selected(Some(cursor.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn mode_label(mode: ListMode) -> &'static str {
    match mode {
        ListMode::Sorted => "",
        ListMode::Paginated => "(paged)",
        ListMode::InfiniteScroll => "(scroll)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::buffer_text;
    use partywave_core::model::EntityKind;

    #[test]
    fn lists_every_entity_with_selection_marker() {
        let backend = ratatui::backend::TestBackend::new(80, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let view = HomeView {
            entries: EntityKind::all().to_vec(),
        };
        let cursor = Cursor {
            selected: 3,
            ..Default::default()
        };
        terminal
            .draw(|frame| render(frame, frame.area(), &view, &cursor))
            .unwrap();
        let text = buffer_text(&terminal);
        for kind in EntityKind::all() {
            assert!(text.contains(kind.title()), "missing {}", kind.title());
        }
        assert!(text.contains(">> Rooms"));
        assert!(text.contains("(scroll)"));
    }
}
