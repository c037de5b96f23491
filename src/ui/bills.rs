use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::containers::bills::{sort_anti_chrono, Bills, ReceiptPreview};
use crate::models::DisplayBill;
use crate::routes::Route;
use crate::ui::{centered_rect, layout::render_vertical_layout};

// Represents the state of the bills table screen
pub struct BillsState {
    bills: Vec<DisplayBill>,
    table_state: TableState,
    preview: Option<ReceiptPreview>,
}

impl BillsState {
    pub fn new(mut bills: Vec<DisplayBill>) -> Self {
        sort_anti_chrono(&mut bills);

        let mut table_state = TableState::default();
        if !bills.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            bills,
            table_state,
            preview: None,
        }
    }

    pub fn bills(&self) -> &[DisplayBill] {
        &self.bills
    }

    pub fn next(&mut self) {
        if self.bills.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) if i + 1 < self.bills.len() => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.bills.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(0) | None => self.bills.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_bill(&self) -> Option<&DisplayBill> {
        self.table_state.selected().and_then(|i| self.bills.get(i))
    }

    pub fn preview(&self) -> Option<&ReceiptPreview> {
        self.preview.as_ref()
    }

    pub fn open_preview(&mut self, preview: ReceiptPreview) {
        self.preview = Some(preview);
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }
}

pub enum BillsAction {
    Quit,
    Refresh,
    Navigate(Route),
}

/// Table cells for each bill: type, name, date, amount, status.
pub fn bill_rows(bills: &[DisplayBill]) -> Vec<[String; 5]> {
    bills
        .iter()
        .map(|b| {
            [
                b.bill.bill_type.clone(),
                b.bill.name.clone(),
                b.formatted_date.clone(),
                format!("{} €", b.bill.amount),
                b.status_label.clone(),
            ]
        })
        .collect()
}

pub fn render_bills<B: Backend>(frame: &mut Frame<B>, state: &mut BillsState) {
    let size = frame.size();
    let clear_block = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(clear_block, size);

    let content = render_vertical_layout(frame, size, Route::Bills);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(content);

    let header_cells = ["Type", "Nom", "Date", "Montant", "Statut", "Actions"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells)
        .style(Style::default())
        .height(1)
        .bottom_margin(1);

    let rows = bill_rows(state.bills()).into_iter().map(|cells| {
        let mut cells: Vec<Cell> = cells.into_iter().map(Cell::from).collect();
        cells.push(Cell::from("<V> Voir"));
        Row::new(cells).height(1)
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title(Route::Bills.title()).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&[
            Constraint::Percentage(22),
            Constraint::Percentage(18),
            Constraint::Percentage(14),
            Constraint::Percentage(12),
            Constraint::Percentage(14),
            Constraint::Percentage(20),
        ]);

    frame.render_stateful_widget(table, chunks[0], &mut state.table_state);

    let buttons_text = if state.selected_bill().is_some() {
        "<N> Nouvelle note de frais | <V> Voir le justificatif | <R> Actualiser | <Q> Quitter"
    } else {
        "<N> Nouvelle note de frais | <R> Actualiser | <Q> Quitter"
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[1]);

    if let Some(preview) = state.preview() {
        render_receipt_modal(frame, preview, size);
    }
}

fn render_receipt_modal<B: Backend>(frame: &mut Frame<B>, preview: &ReceiptPreview, size: Rect) {
    let popup_area = centered_rect(70, 40, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(preview.file_name.as_str()),
        Spans::from(""),
        Spans::from(preview.file_url.as_str()),
        Spans::from(""),
        Spans::from("<Esc> Fermer"),
    ])
    .wrap(Wrap { trim: false })
    .block(Block::default().title("Justificatif").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

/// Apply one key press to the bills screen.
pub fn handle_key(container: &Bills<'_>, state: &mut BillsState, key: KeyCode) -> Option<BillsAction> {
    if state.preview.is_some() {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
            state.close_preview();
        }
        return None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => Some(BillsAction::Quit),
        KeyCode::Char('n') => Some(BillsAction::Navigate(container.handle_click_new_bill())),
        KeyCode::Char('r') => Some(BillsAction::Refresh),
        KeyCode::Char('v') | KeyCode::Enter => {
            if let Some(bill) = state.selected_bill() {
                let preview = container.handle_click_icon_eye(bill);
                state.open_preview(preview);
            }
            None
        }
        KeyCode::Down => {
            state.next();
            None
        }
        KeyCode::Up => {
            state.previous();
            None
        }
        _ => None,
    }
}

pub fn handle_input(container: &Bills<'_>, state: &mut BillsState) -> Result<Option<BillsAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(container, state, key.code));
    }
    Ok(None)
}
