// Detail widget: every field of one record, label then value.

use partywave_app::protocol::DetailView;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::Cursor;

pub fn render(frame: &mut Frame, area: Rect, view: &DetailView, cursor: &Cursor) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} {}", view.kind.singular(), view.id));

    let lines: Vec<Line> = if let Some(message) = &view.not_found {
        vec![Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Red),
        ))]
    } else if view.fields.is_empty() {
        vec![Line::from("Loading...")]
    } else {
        let width = view
            .fields
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        view.fields
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{label:<width$}  "),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(value.as_str()),
                ])
            })
            .collect()
    };

    let scroll = u16::try_from(cursor.scroll).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}
