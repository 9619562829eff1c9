// Create/edit form widget: one line per field, validation messages under
// the offending field, and the option list of a focused many-relation.

use partywave_app::form::FieldInput;
use partywave_app::protocol::FormView;
use partywave_core::model::{FieldKind, FieldSpec};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::FormEditor;

const DATETIME_HINT: &str = "YYYY-MM-DDTHH:MM";

pub fn render(frame: &mut Frame, area: Rect, view: &FormView, editor: Option<&FormEditor>) {
    let title = match &view.id {
        Some(id) => format!("Edit {} {id}", view.kind.singular()),
        None => format!("Create a new {}", view.kind.singular()),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let Some(editor) = editor else {
        frame.render_widget(Paragraph::new("Loading...").block(block), area);
        return;
    };

    let label_width = view
        .fields
        .iter()
        .map(|f| f.label.chars().count() + 1)
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    let mut focused_line = 0;
    for (index, (spec, input)) in view.fields.iter().zip(&editor.draft.inputs).enumerate() {
        let focused = index == editor.field;
        if focused {
            focused_line = lines.len();
        }
        let options = view.options.get(index).map_or(&[][..], |o| o.as_slice());
        lines.push(field_line(spec, input, options, focused, label_width));

        if focused {
            if let FieldInput::Many(selected) = input {
                lines.extend(option_lines(options, selected, editor.option, label_width));
            }
        }
        for error in view.errors.iter().filter(|e| e.field == spec.name) {
            lines.push(Line::from(Span::styled(
                format!("{:width$}    {}", "", error.message, width = label_width),
                Style::default().fg(Color::Red),
            )));
        }
    }

    // Keep the focused field visible on short terminals.
    let visible = usize::from(area.height.saturating_sub(2));
    let scroll = (focused_line + 1).saturating_sub(visible);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

fn field_line(
    spec: &FieldSpec,
    input: &FieldInput,
    options: &[(String, String)],
    focused: bool,
    label_width: usize,
) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let label = if spec.required {
        format!("{}*", spec.label)
    } else {
        spec.label.to_string()
    };
    let label_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut spans = vec![
        Span::raw(marker),
        Span::styled(format!("{label:<label_width$}  "), label_style),
    ];
    spans.extend(value_spans(spec, input, options, focused));
    Line::from(spans)
}

fn value_spans(
    spec: &FieldSpec,
    input: &FieldInput,
    options: &[(String, String)],
    focused: bool,
) -> Vec<Span<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    match input {
        FieldInput::Text(text) => {
            let mut spans = vec![Span::raw(text.clone())];
            if focused {
                spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
            }
            if text.is_empty() && spec.kind == FieldKind::Instant {
                spans.push(Span::styled(format!(" ({DATETIME_HINT})"), dim));
            }
            spans
        }
        FieldInput::Flag(flag) => vec![Span::raw(if *flag { "[x]" } else { "[ ]" })],
        FieldInput::Choice(choice) => {
            let text = match choice {
                Some(value) => option_label(options, value),
                None => "(none)".to_string(),
            };
            if focused {
                vec![Span::raw(format!("< {text} >"))]
            } else {
                vec![Span::raw(text)]
            }
        }
        FieldInput::Many(selected) => {
            if selected.is_empty() {
                vec![Span::styled("(none)", dim)]
            } else {
                let labels: Vec<String> = selected
                    .iter()
                    .map(|value| option_label(options, value))
                    .collect();
                vec![Span::raw(labels.join(", "))]
            }
        }
    }
}

fn option_lines(
    options: &[(String, String)],
    selected: &[String],
    cursor: usize,
    label_width: usize,
) -> Vec<Line<'static>> {
    if options.is_empty() {
        return vec![Line::from(Span::styled(
            format!("{:width$}    (nothing to choose from)", "", width = label_width),
            Style::default().fg(Color::DarkGray),
        ))];
    }
    options
        .iter()
        .enumerate()
        .map(|(i, (value, label))| {
            let check = if selected.contains(value) { "[x]" } else { "[ ]" };
            let style = if i == cursor {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("{:width$}    {check} {label}", "", width = label_width),
                style,
            ))
        })
        .collect()
}

/// Label of an option value; the raw value when it is not among the options.
fn option_label(options: &[(String, String)], value: &str) -> String {
    options
        .iter()
        .find(|(v, _)| v == value)
        .map_or_else(|| value.to_string(), |(_, label)| label.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::buffer_text;
    use partywave_app::form::{FieldError, FormDraft};
    use partywave_core::model::{EntityId, EntityKind};

    fn room_form(errors: Vec<FieldError>) -> (FormView, FormEditor) {
        let kind = EntityKind::Room;
        let tags = kind.fields().iter().position(|f| f.name == "tags").unwrap();
        let mut options = vec![Vec::new(); kind.fields().len()];
        options[tags] = vec![("1".to_string(), "house".to_string()), ("2".into(), "jazz".into())];
        let mut draft = FormDraft {
            kind,
            id: Some(EntityId::Number(7)),
            inputs: kind
                .fields()
                .iter()
                .map(|spec| FieldInput::empty(spec.kind))
                .collect(),
        };
        draft.set("name", FieldInput::Text("Lobby".into()));
        draft.set("tags", FieldInput::Many(vec!["2".into()]));
        let view = FormView {
            kind,
            id: Some(EntityId::Number(7)),
            fields: kind.fields().to_vec(),
            options,
            errors,
            seed: None,
        };
        (view, FormEditor::new(draft))
    }

    fn draw(view: &FormView, editor: Option<&FormEditor>) -> String {
        let backend = ratatui::backend::TestBackend::new(80, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), view, editor))
            .unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn renders_fields_with_required_marker() {
        let (view, editor) = room_form(Vec::new());
        let text = draw(&view, Some(&editor));
        assert!(text.contains("Edit Room 7"));
        assert!(text.contains("> Name*"));
        assert!(text.contains("Lobby_"));
        assert!(text.contains(DATETIME_HINT));
        assert!(text.contains("jazz"));
        assert!(!text.contains("house"));
    }

    #[test]
    fn focused_many_relation_lists_options() {
        let (view, mut editor) = room_form(Vec::new());
        editor.field = view.fields.iter().position(|f| f.name == "tags").unwrap();
        let text = draw(&view, Some(&editor));
        assert!(text.contains("[ ] house"));
        assert!(text.contains("[x] jazz"));
    }

    #[test]
    fn shows_validation_messages() {
        let errors = vec![FieldError {
            field: "name".into(),
            message: "This field is required.".into(),
        }];
        let (view, editor) = room_form(errors);
        assert!(draw(&view, Some(&editor)).contains("This field is required."));
    }

    #[test]
    fn waits_for_seed() {
        let (view, _) = room_form(Vec::new());
        assert!(draw(&view, None).contains("Loading..."));
    }
}
