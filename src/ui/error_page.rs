use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render_error_page<B: Backend>(frame: &mut Frame<B>, message: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Min(5), Constraint::Length(3)].as_ref())
        .split(frame.size());

    let body = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(Span::styled(
            "Erreur",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Spans::from(""),
        Spans::from(message.to_string()),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, chunks[0]);

    let help = Paragraph::new("<R> Réessayer | <Q> Quitter")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[1]);
}

pub fn render_loading_page<B: Backend>(frame: &mut Frame<B>) {
    let loading = Paragraph::new("Loading...")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(loading, frame.size());
}

pub enum ErrorAction {
    Retry,
    Quit,
}

pub fn handle_key(key: KeyCode) -> Option<ErrorAction> {
    match key {
        KeyCode::Char('r') | KeyCode::Enter => Some(ErrorAction::Retry),
        KeyCode::Char('q') | KeyCode::Esc => Some(ErrorAction::Quit),
        _ => None,
    }
}

pub fn handle_input() -> Result<Option<ErrorAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(key.code));
    }
    Ok(None)
}
