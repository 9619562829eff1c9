// Delete confirmation dialog, centered in the main panel.

use partywave_app::protocol::DeleteView;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::centered_rect;

const DIALOG_WIDTH: u16 = 60;
const DIALOG_HEIGHT: u16 = 6;

pub fn render(frame: &mut Frame, area: Rect, view: &DeleteView) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(Span::styled(
            " Confirm delete operation ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));

    let lines = vec![
        Line::from(view.question.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(":Delete  "),
            Span::styled("n", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(":Cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, dialog_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::buffer_text;
    use partywave_core::model::{EntityId, EntityKind};

    #[test]
    fn shows_question_and_keys() {
        let backend = ratatui::backend::TestBackend::new(80, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let view = DeleteView {
            kind: EntityKind::Tag,
            id: EntityId::Number(3),
            question: "Are you sure you want to delete Tag 3 (house)?".into(),
        };
        terminal
            .draw(|frame| render(frame, frame.area(), &view))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Are you sure you want to delete Tag 3 (house)?"));
        assert!(text.contains("y:Delete  n:Cancel"));
    }
}
