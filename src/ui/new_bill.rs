use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::containers::new_bill::NewBill;
use crate::routes::Route;
use crate::store::Store;
use crate::ui::{components::date_input::DateInputState, layout::render_vertical_layout};

pub enum NewBillAction {
    Cancel,
    ChangeFile(PathBuf),
    Submit,
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum NewBillField {
    ExpenseType,
    Name,
    Date,
    Amount,
    Vat,
    Pct,
    Commentary,
    File,
}

impl NewBillField {
    const ALL: [NewBillField; 8] = [
        NewBillField::ExpenseType,
        NewBillField::Name,
        NewBillField::Date,
        NewBillField::Amount,
        NewBillField::Vat,
        NewBillField::Pct,
        NewBillField::Commentary,
        NewBillField::File,
    ];

    fn label(&self) -> &'static str {
        match self {
            NewBillField::ExpenseType => "Type de dépense",
            NewBillField::Name => "Nom de la dépense",
            NewBillField::Date => "Date",
            NewBillField::Amount => "Montant TTC",
            NewBillField::Vat => "TVA",
            NewBillField::Pct => "%",
            NewBillField::Commentary => "Commentaire",
            NewBillField::File => "Justificatif",
        }
    }
}

pub struct NewBillState {
    pub container: NewBill,
    pub current_field: NewBillField,
    pub editing: bool,
    date_input: DateInputState,
    message: Option<String>,
}

impl NewBillState {
    pub fn new(container: NewBill) -> Self {
        Self {
            container,
            current_field: NewBillField::ExpenseType,
            editing: false,
            date_input: DateInputState::default(),
            message: None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn next_field(&mut self) {
        let i = NewBillField::ALL.iter().position(|f| *f == self.current_field).unwrap_or(0);
        self.current_field = NewBillField::ALL[(i + 1) % NewBillField::ALL.len()];
    }

    pub fn previous_field(&mut self) {
        let len = NewBillField::ALL.len();
        let i = NewBillField::ALL.iter().position(|f| *f == self.current_field).unwrap_or(0);
        self.current_field = NewBillField::ALL[(i + len - 1) % len];
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let form = &mut self.container.form;
        match self.current_field {
            NewBillField::ExpenseType => match key {
                KeyCode::Left => form.expense_type = form.expense_type.previous(),
                KeyCode::Right | KeyCode::Char(' ') => form.expense_type = form.expense_type.next(),
                _ => {}
            },
            NewBillField::Date => {
                self.date_input.handle_input(key);
                form.date = self.date_input.value();
            }
            field => {
                let value = match field {
                    NewBillField::Name => &mut form.name,
                    NewBillField::Amount => &mut form.amount,
                    NewBillField::Vat => &mut form.vat,
                    NewBillField::Pct => &mut form.pct,
                    NewBillField::Commentary => &mut form.commentary,
                    _ => &mut form.file_path,
                };
                match key {
                    KeyCode::Char(c) if accepts(field, c) => value.push(c),
                    KeyCode::Backspace => {
                        value.pop();
                    }
                    _ => {}
                }
            }
        }
    }

    fn field_value(&self, field: NewBillField) -> String {
        let form = &self.container.form;
        match field {
            NewBillField::ExpenseType => format!("< {} >", form.expense_type.as_str()),
            NewBillField::Name => form.name.clone(),
            NewBillField::Date => self
                .date_input
                .get_display_string(self.editing && self.current_field == NewBillField::Date),
            NewBillField::Amount => form.amount.clone(),
            NewBillField::Vat => form.vat.clone(),
            NewBillField::Pct => form.pct.clone(),
            NewBillField::Commentary => form.commentary.clone(),
            NewBillField::File => match self.container.receipt() {
                Some(receipt) if !self.editing => format!("{} (envoyé)", receipt.file_name),
                _ => form.file_path.clone(),
            },
        }
    }
}

fn accepts(field: NewBillField, c: char) -> bool {
    match field {
        NewBillField::Amount | NewBillField::Pct => c.is_ascii_digit(),
        NewBillField::Vat => c.is_ascii_digit() || c == '.',
        _ => true,
    }
}

pub fn render_new_bill<B: Backend>(f: &mut Frame<B>, state: &mut NewBillState) {
    let size = f.size();
    let content = render_vertical_layout(f, size, Route::NewBill);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(content);

    let title = Paragraph::new(Route::NewBill.title())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let status = match state.message() {
        Some(message) => Paragraph::new(message.to_string()).style(Style::default().fg(Color::Red)),
        None => {
            let missing = state.container.missing_fields();
            if missing.is_empty() {
                Paragraph::new("Formulaire complet").style(Style::default().fg(Color::Green))
            } else {
                Paragraph::new(format!("À compléter: {}", missing.join(", ")))
                    .style(Style::default().fg(Color::Yellow))
            }
        }
    };
    f.render_widget(status.block(Block::default().borders(Borders::ALL)), chunks[2]);

    let help_text = if state.editing {
        "Enter / Esc - Terminer la saisie"
    } else {
        "Enter - Modifier | Up/Down - Naviguer | S - Envoyer | Esc - Retour"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &mut NewBillState, area: Rect) {
    let mut items: Vec<ListItem> = NewBillField::ALL
        .iter()
        .map(|field| {
            let selected = *field == state.current_field;
            let value = state.field_value(*field);

            let content = if selected && state.editing {
                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label()), Style::default().fg(Color::Yellow)),
                    Span::styled(format!("{}|", value), Style::default().add_modifier(Modifier::BOLD)),
                ])
            } else {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label()), style),
                    Span::raw(value),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    items.push(ListItem::new(""));
    items.push(ListItem::new(Spans::from(Span::styled(
        "[ Envoyer ]",
        Style::default().fg(Color::Black).bg(Color::Cyan),
    ))));

    let form_list = List::new(items).block(Block::default().borders(Borders::ALL).title("Note de frais"));
    f.render_widget(form_list, area);
}

/// Apply one key press to the form.
pub fn handle_key(state: &mut NewBillState, key: KeyCode) -> Option<NewBillAction> {
    if state.editing {
        match key {
            KeyCode::Enter | KeyCode::Esc => {
                state.editing = false;
                if state.current_field == NewBillField::File && key == KeyCode::Enter {
                    let path = state.container.form.file_path.trim().to_string();
                    if !path.is_empty() {
                        return Some(NewBillAction::ChangeFile(PathBuf::from(path)));
                    }
                }
            }
            _ => state.edit_current_field(key),
        }
        return None;
    }

    match key {
        KeyCode::Esc => return Some(NewBillAction::Cancel),
        KeyCode::Enter => {
            state.message = None;
            state.editing = true;
        }
        KeyCode::Up => state.previous_field(),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Char('s') => return Some(NewBillAction::Submit),
        _ => {}
    }

    None
}

pub fn handle_input(state: &mut NewBillState) -> Result<Option<NewBillAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

/// Run a form action against the store. Returns the page to navigate to, if any.
pub async fn apply_action(store: &dyn Store, state: &mut NewBillState, action: NewBillAction) -> Result<Option<Route>> {
    match action {
        NewBillAction::Cancel => Ok(Some(Route::Bills)),
        NewBillAction::ChangeFile(path) => {
            if let Err(err) = state.container.handle_change_file(store, &path).await {
                state.message = Some(err.to_string());
            }
            Ok(None)
        }
        NewBillAction::Submit => match state.container.handle_submit(store).await? {
            Route::NewBill => {
                let missing = state.container.missing_fields();
                state.message = Some(format!("Champs requis: {}", missing.join(", ")));
                Ok(None)
            }
            route => Ok(Some(route)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseType, User};
    use crate::store::MemoryStore;
    use crate::ui::test_utils::{contains, render_lines};

    fn state() -> NewBillState {
        NewBillState::new(NewBill::new(User::employee("employee@test.tld")))
    }

    fn type_text(state: &mut NewBillState, text: &str) {
        handle_key(state, KeyCode::Enter);
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
        handle_key(state, KeyCode::Enter);
    }

    fn go_to(state: &mut NewBillState, field: NewBillField) {
        while state.current_field != field {
            handle_key(state, KeyCode::Down);
        }
    }

    #[test]
    fn page_shows_the_title_and_send_button() {
        let mut state = state();
        let lines = render_lines(100, 30, |f| render_new_bill(f, &mut state));

        assert!(contains(&lines, "Envoyer une note de frais"));
        assert!(contains(&lines, "[ Envoyer ]"));
    }

    #[test]
    fn typing_fills_the_form() {
        let mut state = state();

        go_to(&mut state, NewBillField::Name);
        type_text(&mut state, "Nouvelle facture");
        go_to(&mut state, NewBillField::Date);
        type_text(&mut state, "20201215");
        go_to(&mut state, NewBillField::Amount);
        type_text(&mut state, "300");
        go_to(&mut state, NewBillField::Vat);
        type_text(&mut state, "20");
        go_to(&mut state, NewBillField::Pct);
        type_text(&mut state, "5");
        go_to(&mut state, NewBillField::Commentary);
        type_text(&mut state, "this is a comment");

        let form = &state.container.form;
        assert_eq!(form.name, "Nouvelle facture");
        assert_eq!(form.date, "2020-12-15");
        assert_eq!(form.amount, "300");
        assert_eq!(form.vat, "20");
        assert_eq!(form.pct, "5");
        assert_eq!(form.commentary, "this is a comment");
    }

    #[test]
    fn numeric_fields_ignore_letters() {
        let mut state = state();
        go_to(&mut state, NewBillField::Amount);
        type_text(&mut state, "3a0b0");
        assert_eq!(state.container.form.amount, "300");
    }

    #[test]
    fn expense_type_cycles_through_the_options() {
        let mut state = state();
        handle_key(&mut state, KeyCode::Enter);
        for _ in 0..3 {
            handle_key(&mut state, KeyCode::Right);
        }
        handle_key(&mut state, KeyCode::Enter);

        assert_eq!(state.container.form.expense_type, ExpenseType::ServicesEnLigne);
    }

    #[test]
    fn finishing_the_file_field_requests_an_upload() {
        let mut state = state();
        go_to(&mut state, NewBillField::File);
        handle_key(&mut state, KeyCode::Enter);
        for c in "test.jpg".chars() {
            handle_key(&mut state, KeyCode::Char(c));
        }

        let action = handle_key(&mut state, KeyCode::Enter);
        assert!(matches!(action, Some(NewBillAction::ChangeFile(path)) if path == PathBuf::from("test.jpg")));
    }

    #[tokio::test]
    async fn rejected_file_shows_a_message() {
        let store = MemoryStore::new(Vec::new());
        let mut state = state();

        let next = apply_action(&store, &mut state, NewBillAction::ChangeFile(PathBuf::from("test.gif")))
            .await
            .unwrap();

        assert!(next.is_none());
        assert!(state.message().unwrap().contains("jpg"));
    }

    #[tokio::test]
    async fn incomplete_submit_stays_on_the_page() {
        let store = MemoryStore::new(Vec::new());
        let mut state = state();

        let next = apply_action(&store, &mut state, NewBillAction::Submit).await.unwrap();

        assert!(next.is_none());
        assert!(state.message().unwrap().contains("Justificatif"));
        let lines = render_lines(100, 30, |f| render_new_bill(f, &mut state));
        assert!(contains(&lines, "Envoyer une note de frais"));
    }

    #[tokio::test]
    async fn complete_submit_returns_to_bills() {
        let store = MemoryStore::new(Vec::new());
        let mut state = state();
        {
            let form = &mut state.container.form;
            form.date = "2020-12-15".to_string();
            form.amount = "300".to_string();
        }
        state
            .container
            .upload_receipt(&store, "test.jpg", Some("image/jpg"), b"test".to_vec())
            .await
            .unwrap();

        let next = apply_action(&store, &mut state, NewBillAction::Submit).await.unwrap();

        assert_eq!(next, Some(Route::Bills));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancel_goes_back_to_bills() {
        let store = MemoryStore::new(Vec::new());
        let mut state = state();
        let next = apply_action(&store, &mut state, NewBillAction::Cancel).await.unwrap();
        assert_eq!(next, Some(Route::Bills));
    }
}
