use std::path::PathBuf;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::api::Api;
use crate::cli::crud_manager::{CrudManager, ManagerAction};
use crate::cli::files_manager::{FilesAction, FilesManager};
use crate::error::Result;
use crate::pages::{employees::Employees, expenses::Expenses, users::Users};
use crate::tui::{self, Screen, ScreenAction, FOOTER_STYLE};

const MENU_ITEMS: &[&str] = &["Users", "Employees", "Expenses", "Expense Files", "Quit"];

enum DashboardScreen {
    Home,
    Users(CrudManager<Users>),
    Employees(CrudManager<Employees>),
    Expenses(CrudManager<Expenses>),
    Files(FilesManager),
}

pub struct Dashboard {
    api: Box<dyn Api>,
    base_url: String,
    download_dir: PathBuf,
    screen: DashboardScreen,
    menu_selection: usize,
}

impl Dashboard {
    pub fn new(api: Box<dyn Api>, base_url: &str, download_dir: PathBuf) -> Self {
        Self {
            api,
            base_url: base_url.to_string(),
            download_dir,
            screen: DashboardScreen::Home,
            menu_selection: 0,
        }
    }

    fn draw_home(&self, frame: &mut Frame) {
        let content = tui::draw_chrome(frame, "Home", "Up/Down=navigate  Enter=select  q=quit");
        let [intro_area, menu_area] =
            Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).areas(content);

        let intro = vec![
            Line::from(""),
            Line::from(" Manage users, employees, expenses and uploaded statements."),
            Line::from(Span::styled(format!(" Backend: {}", self.base_url), FOOTER_STYLE)),
        ];
        frame.render_widget(Paragraph::new(intro), intro_area);

        let lines: Vec<Line> = MENU_ITEMS
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let marker = if i == self.menu_selection { ">" } else { " " };
                let style = if i == self.menu_selection {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(format!(" {marker} {item}"), style))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), menu_area);
    }

    fn handle_home_key(&mut self, code: KeyCode) -> ScreenAction {
        match code {
            KeyCode::Up => self.menu_selection = self.menu_selection.saturating_sub(1),
            KeyCode::Down => {
                self.menu_selection = (self.menu_selection + 1).min(MENU_ITEMS.len() - 1);
            }
            KeyCode::Char('q') | KeyCode::Esc => return ScreenAction::Close,
            KeyCode::Enter => match self.menu_selection {
                0 => self.screen = DashboardScreen::Users(CrudManager::new()),
                1 => self.screen = DashboardScreen::Employees(CrudManager::new()),
                2 => self.screen = DashboardScreen::Expenses(CrudManager::new()),
                3 => {
                    self.screen = DashboardScreen::Files(FilesManager::new(self.download_dir.clone()))
                }
                _ => return ScreenAction::Close,
            },
            _ => {}
        }
        ScreenAction::Continue
    }
}

impl Screen for Dashboard {
    fn draw(&mut self, frame: &mut Frame) {
        match &mut self.screen {
            DashboardScreen::Home => self.draw_home(frame),
            DashboardScreen::Users(m) => m.draw(frame),
            DashboardScreen::Employees(m) => m.draw(frame),
            DashboardScreen::Expenses(m) => m.draw(frame),
            DashboardScreen::Files(m) => m.draw(frame),
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> ScreenAction {
        let closed = match &mut self.screen {
            DashboardScreen::Home => return self.handle_home_key(code),
            DashboardScreen::Users(m) => matches!(m.handle_key(code), ManagerAction::Close),
            DashboardScreen::Employees(m) => matches!(m.handle_key(code), ManagerAction::Close),
            DashboardScreen::Expenses(m) => matches!(m.handle_key(code), ManagerAction::Close),
            DashboardScreen::Files(m) => matches!(m.handle_key(code), FilesAction::Close),
        };
        if closed {
            self.screen = DashboardScreen::Home;
        }
        ScreenAction::Continue
    }

    fn run_pending(&mut self) -> bool {
        let api = self.api.as_ref();
        match &mut self.screen {
            DashboardScreen::Home => false,
            DashboardScreen::Users(m) => m.run_pending(api),
            DashboardScreen::Employees(m) => m.run_pending(api),
            DashboardScreen::Expenses(m) => m.run_pending(api),
            DashboardScreen::Files(m) => m.run_pending(api),
        }
    }
}

pub fn run(api: Box<dyn Api>, base_url: &str, download_dir: PathBuf) -> Result<()> {
    tracing::info!("starting dashboard against {base_url}");
    let mut dashboard = Dashboard::new(api, base_url, download_dir);
    tui::run_screen(&mut dashboard)
}
