mod config;
mod containers;
mod db;
mod format;
mod models;
mod routes;
mod store;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::containers::{bills::Bills, new_bill::NewBill};
use crate::models::User;
use crate::routes::Route;
use crate::store::{MemoryStore, Store};
use crate::ui::{
    bills::{handle_input as handle_bills_input, render_bills, BillsAction, BillsState},
    error_page::{handle_input as handle_error_input, render_error_page, render_loading_page, ErrorAction},
    new_bill::{apply_action, handle_input as handle_new_bill_input, render_new_bill, NewBillState},
};

/// Employee expense reports in the terminal.
#[derive(Parser, Debug)]
#[command(name = "billed", version, about)]
struct Cli {
    /// Email of the connected employee, overrides USER_EMAIL
    #[arg(long)]
    email: Option<String>,

    /// Run on an in-memory store seeded with sample bills
    #[arg(long)]
    demo: bool,
}

// Represents the current screen in the app
enum AppScreen {
    Loading,
    Bills,
    NewBill,
    Error(String),
}

// Main application state
struct AppState {
    store: Box<dyn Store>,
    user: User,
    screen: AppScreen,
    bills_state: Option<BillsState>,
    new_bill_state: Option<NewBillState>,
}

impl AppState {
    fn new(store: Box<dyn Store>, user: User) -> Self {
        Self {
            store,
            user,
            screen: AppScreen::Loading,
            bills_state: None,
            new_bill_state: None,
        }
    }

    fn navigate(&mut self, route: Route) {
        info!(path = route.path(), "navigate");
        match route {
            Route::Bills => {
                self.new_bill_state = None;
                self.screen = AppScreen::Loading;
            }
            Route::NewBill => {
                self.new_bill_state = Some(NewBillState::new(NewBill::new(self.user.clone())));
                self.screen = AppScreen::NewBill;
            }
        }
    }
}

fn init_logging(path: &str) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;
    init_logging(&config.log_file)?;

    let user = User::employee(cli.email.unwrap_or_else(|| config.user_email.clone()));
    info!(email = %user.email, "connected");

    let store: Box<dyn Store> = if cli.demo {
        info!("using in-memory demo store");
        Box::new(MemoryStore::with_fixtures())
    } else {
        Box::new(db::Database::new(&config, &user.email).await?)
    };

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(store, user);

    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = %err, "application stopped");
        println!("Error: {}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| match &app_state.screen {
            AppScreen::Loading => render_loading_page(f),
            AppScreen::Bills => {
                if let Some(state) = &mut app_state.bills_state {
                    render_bills(f, state);
                }
            }
            AppScreen::NewBill => {
                if let Some(state) = &mut app_state.new_bill_state {
                    render_new_bill(f, state);
                }
            }
            AppScreen::Error(message) => render_error_page(f, message),
        })?;

        let should_quit = match app_state.screen {
            AppScreen::Loading => {
                load_bills_screen(app_state).await;
                false
            }
            AppScreen::Bills => handle_bills_screen(app_state)?,
            AppScreen::NewBill => handle_new_bill_screen(app_state).await?,
            AppScreen::Error(_) => handle_error_input()?.map_or(false, |action| match action {
                ErrorAction::Quit => true,
                ErrorAction::Retry => {
                    app_state.screen = AppScreen::Loading;
                    false
                }
            }),
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

/// Fetch bills; a store failure becomes the error page.
async fn load_bills_screen(app_state: &mut AppState) {
    match Bills::new(app_state.store.as_ref()).get_bills().await {
        Ok(bills) => {
            app_state.bills_state = Some(BillsState::new(bills));
            app_state.screen = AppScreen::Bills;
        }
        Err(err) => {
            error!(status = err.status(), error = %err, "could not load bills");
            app_state.bills_state = None;
            app_state.screen = AppScreen::Error(err.to_string());
        }
    }
}

fn handle_bills_screen(app_state: &mut AppState) -> Result<bool> {
    let container = Bills::new(app_state.store.as_ref());
    let action = match &mut app_state.bills_state {
        Some(state) => handle_bills_input(&container, state)?,
        None => None,
    };

    match action {
        Some(BillsAction::Quit) => return Ok(true),
        Some(BillsAction::Refresh) => app_state.screen = AppScreen::Loading,
        Some(BillsAction::Navigate(route)) => app_state.navigate(route),
        None => {}
    }

    Ok(false)
}

async fn handle_new_bill_screen(app_state: &mut AppState) -> Result<bool> {
    let Some(state) = &mut app_state.new_bill_state else {
        return Ok(false);
    };

    if let Some(action) = handle_new_bill_input(state)? {
        match apply_action(app_state.store.as_ref(), state, action).await {
            Ok(Some(route)) => app_state.navigate(route),
            Ok(None) => {}
            Err(err) => {
                error!(error = %err, "could not send bill");
                app_state.screen = AppScreen::Error(err.to_string());
            }
        }
    }

    Ok(false)
}
