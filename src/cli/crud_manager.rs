use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Row, Table, TableState},
    Frame,
};

use crate::api::Api;
use crate::cli::form::{Form, FormEvent, FormField};
use crate::pages::crud::{capitalize, CrudPage, Resource};
use crate::tui::{self, HEADER_STYLE, NOTICE_TTL, PROMPT_STYLE, SELECTED_STYLE};

pub enum ManagerAction {
    Continue,
    Close,
}

enum Mode {
    List,
    Form(Form),
    ConfirmDelete,
}

enum Job {
    Load,
    Submit,
    Delete(bool),
}

/// List/add/edit/delete screen for one backend collection.
pub struct CrudManager<R: Resource> {
    page: CrudPage<R>,
    selection: usize,
    mode: Mode,
    job: Option<Job>,
    table_state: TableState,
    /// Remaining keypresses before the notice is cleared.
    notice_ttl: u8,
}

impl<R: Resource> CrudManager<R> {
    /// The first draw shows "Loading..." while the initial fetch is queued.
    pub fn new() -> Self {
        let mut page = CrudPage::new();
        page.loading = true;
        Self {
            page,
            selection: 0,
            mode: Mode::List,
            job: Some(Job::Load),
            table_state: TableState::default(),
            notice_ttl: 0,
        }
    }

    fn selected_id(&self) -> Option<i64> {
        self.page.items().get(self.selection).map(R::id)
    }

    fn clamp_selection(&mut self) {
        let len = self.page.items().len();
        self.selection = if len == 0 { 0 } else { self.selection.min(len - 1) };
    }

    fn open_form(&mut self) {
        let Some(state) = self.page.form() else {
            return;
        };
        let fields = R::FIELDS
            .iter()
            .zip(state.values.iter())
            .map(|(label, value)| FormField::text(label, value))
            .collect();
        self.mode = Mode::Form(Form::new(fields));
    }

    pub fn run_pending(&mut self, api: &dyn Api) -> bool {
        let Some(job) = self.job.take() else {
            return false;
        };
        match job {
            Job::Load => self.page.load(api),
            Job::Submit => {
                if self.page.submit(api) {
                    self.mode = Mode::List;
                }
            }
            Job::Delete(confirmed) => {
                self.page.confirm_delete(api, confirmed);
                self.mode = Mode::List;
            }
        }
        self.clamp_selection();
        if self.page.notice().is_some() {
            self.notice_ttl = NOTICE_TTL;
        }
        true
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let hints = match &self.mode {
            Mode::List => "a=add  e=edit  d=delete  r=reload  Esc=back",
            Mode::Form(_) => "Tab=next field  Enter=save  Esc=cancel",
            Mode::ConfirmDelete => "y=confirm  n=cancel",
        };
        let content = tui::draw_chrome(frame, &capitalize(R::PLURAL), hints);

        let notice_lines = self
            .page
            .notice()
            .map(|n| tui::notice_line(n, content.width))
            .unwrap_or_default();
        let [main_area, notice_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(notice_lines.len() as u16 + 1),
        ])
        .areas(content);
        frame.render_widget(Paragraph::new(notice_lines), notice_area);

        if let Mode::Form(form) = &self.mode {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(" {}", self.page.form_title()),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            lines.extend(form.lines());
            lines.push(Line::from(""));
            lines.push(Line::from(format!("   [{}]", self.page.submit_label())));
            frame.render_widget(Paragraph::new(lines), main_area);
            return;
        }

        if self.page.loading {
            frame.render_widget(
                Paragraph::new(format!("\n   Loading {}...", R::PLURAL)),
                main_area,
            );
            return;
        }

        let prompt_height = if matches!(self.mode, Mode::ConfirmDelete) { 2 } else { 0 };
        let [table_area, prompt_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(prompt_height),
        ])
        .areas(main_area);

        if self.page.items().is_empty() {
            frame.render_widget(
                Paragraph::new(format!("\n   {}", CrudPage::<R>::empty_message())),
                table_area,
            );
        } else {
            let rows: Vec<Row> = self.page.items().iter().map(|i| Row::new(R::row(i))).collect();
            let widths = vec![Constraint::Fill(1); R::HEADERS.len()];
            let table = Table::new(rows, widths)
                .header(Row::new(R::HEADERS.to_vec()).style(HEADER_STYLE).bottom_margin(1))
                .column_spacing(1)
                .row_highlight_style(SELECTED_STYLE);
            self.table_state.select(Some(self.selection));
            frame.render_stateful_widget(table, table_area, &mut self.table_state);
        }

        if let (Mode::ConfirmDelete, Some(prompt)) = (&self.mode, self.page.delete_prompt()) {
            let label = self
                .page
                .pending_delete()
                .and_then(|id| self.page.item(id))
                .map(R::label)
                .unwrap_or_default();
            frame.render_widget(
                Paragraph::new(format!("   {prompt} ({label}) (y/n)")).style(PROMPT_STYLE),
                prompt_area,
            );
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> ManagerAction {
        if self.notice_ttl > 0 {
            self.notice_ttl -= 1;
            if self.notice_ttl == 0 {
                self.page.clear_notice();
            }
        }
        if self.job.is_some() {
            return ManagerAction::Continue;
        }

        match &mut self.mode {
            Mode::List => return self.handle_list_key(code),
            Mode::Form(form) => match form.handle_key(code) {
                FormEvent::Cancel => {
                    self.page.close_form();
                    self.mode = Mode::List;
                }
                FormEvent::Submit => {
                    for (i, value) in form.values().iter().enumerate() {
                        self.page.set_value(i, value);
                    }
                    self.job = Some(Job::Submit);
                }
                FormEvent::Changed | FormEvent::None => {}
            },
            Mode::ConfirmDelete => match code {
                KeyCode::Char('y') => self.job = Some(Job::Delete(true)),
                KeyCode::Char('n') | KeyCode::Esc => self.job = Some(Job::Delete(false)),
                _ => {}
            },
        }
        ManagerAction::Continue
    }

    fn handle_list_key(&mut self, code: KeyCode) -> ManagerAction {
        match code {
            KeyCode::Up => self.selection = self.selection.saturating_sub(1),
            KeyCode::Down => {
                self.selection += 1;
                self.clamp_selection();
            }
            KeyCode::Char('a') => {
                self.page.open_create();
                self.open_form();
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    if self.page.open_edit(id) {
                        self.open_form();
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.page.request_delete(id);
                    self.mode = Mode::ConfirmDelete;
                }
            }
            KeyCode::Char('r') => {
                self.page.loading = true;
                self.job = Some(Job::Load);
            }
            KeyCode::Char('q') | KeyCode::Esc => return ManagerAction::Close,
            _ => {}
        }
        ManagerAction::Continue
    }
}
