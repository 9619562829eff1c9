// Help bar widget: key hints for the current screen.

use partywave_app::protocol::ScreenBody;
use partywave_core::model::ListMode;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        hints(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn hints(state: &ViewState) -> &'static str {
    if state.confirm_quit {
        return " y:Quit | n/Esc:Cancel";
    }
    let Some(screen) = &state.screen else {
        return " q:Quit";
    };
    match &screen.body {
        ScreenBody::Home(_) => " Enter:Open | j/k:Move | q:Quit",
        ScreenBody::List(list) => match list.pagination.mode {
            ListMode::Sorted => {
                " Enter:View | n:New | e:Edit | d:Delete | h/l:Column | s:Sort | r:Refresh | Esc:Back"
            }
            ListMode::Paginated => {
                " Enter:View | n:New | e:Edit | d:Delete | s:Sort | [/]:Page | 1-9:Go to | Esc:Back"
            }
            ListMode::InfiniteScroll => {
                " Enter:View | n:New | e:Edit | d:Delete | s:Sort | j past end:Load more | Esc:Back"
            }
        },
        ScreenBody::Detail(_) => " e:Edit | d:Delete | j/k:Scroll | r:Refresh | Esc:Back",
        ScreenBody::Form(_) => {
            " Tab:Next field | Space/Left/Right:Choose | Ctrl+S:Save | Ctrl+P:Save changes | Esc:Cancel"
        }
        ScreenBody::Delete(_) => " y:Delete | n/Esc:Cancel",
    }
}
