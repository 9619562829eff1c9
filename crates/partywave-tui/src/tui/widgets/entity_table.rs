// Entity list widget: sortable table with a paging summary in the title.
//
// The focused column is underlined; the sorted column carries an arrow.

use partywave_app::protocol::{ListView, PaginationInfo};
use partywave_core::model::ListMode;
use partywave_core::query::SortOrder;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::tui::Cursor;

pub fn render(frame: &mut Frame, area: Rect, view: &ListView, cursor: &Cursor, loading: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title(view));

    if view.rows.is_empty() {
        let message = match &view.empty_banner {
            Some(banner) => banner.as_str(),
            None if loading => "Loading...",
            None => "",
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(view.columns.iter().enumerate().map(|(i, column)| {
        let mut label = column.label.clone();
        if column.field == view.sort.field {
            label.push_str(sort_arrow(view.sort.order));
        }
        let mut style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        if i == cursor.column {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        Cell::from(label).style(style)
    }));

    let rows: Vec<Row> = view
        .rows
        .iter()
        .map(|row| Row::new(row.cells.iter().map(|c| Cell::from(c.as_str()))))
        .collect();

    let widths: Vec<Constraint> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i == 0 {
                Constraint::Length(8)
            } else {
                Constraint::Fill(1)
            }
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default().with_selected(Some(cursor.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn sort_arrow(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => " ^",
        SortOrder::Desc => " v",
    }
}

/// Block title, e.g. "Votes (45 total, page 2/3)".
pub fn title(view: &ListView) -> String {
    format!("{} ({})", view.kind.title(), page_summary(&view.pagination))
}

fn page_summary(p: &PaginationInfo) -> String {
    match p.mode {
        ListMode::Sorted => format!("{} total", p.total_items),
        ListMode::Paginated => format!(
            "{} total, page {}/{}",
            p.total_items,
            if p.total_pages == 0 { 0 } else { p.page + 1 },
            p.total_pages
        ),
        ListMode::InfiniteScroll => {
            let more = if p.has_more { ", more below" } else { "" };
            format!("{} total{more}", p.total_items)
        }
    }
}
