use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::routes::Route;

const NAV_WIDTH: u16 = 14;

/// Style of a navigation icon, highlighted when it points at the current page.
pub fn icon_style(icon: Route, active: Route) -> Style {
    if icon == active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// Draw the vertical navigation bar and return the area left for the page.
pub fn render_vertical_layout<B: Backend>(frame: &mut Frame<B>, area: Rect, active: Route) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(NAV_WIDTH), Constraint::Min(1)].as_ref())
        .split(area);

    let nav = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(Span::styled(" Billed ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))),
        Spans::from(""),
        Spans::from(Span::styled(" [=] Notes ", icon_style(Route::Bills, active))),
        Spans::from(""),
        Spans::from(Span::styled(" [+] Nouvelle ", icon_style(Route::NewBill, active))),
    ])
    .block(Block::default().borders(Borders::RIGHT));

    frame.render_widget(nav, chunks[0]);
    chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_current_page_icon_is_highlighted() {
        assert_eq!(icon_style(Route::Bills, Route::Bills).bg, Some(Color::Cyan));
        assert_eq!(icon_style(Route::NewBill, Route::Bills).bg, None);
        assert_eq!(icon_style(Route::NewBill, Route::NewBill).bg, Some(Color::Cyan));
    }
}
