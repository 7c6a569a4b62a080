use std::path::PathBuf;

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
use crate::models::{AccountType, Upload};
use crate::pages::expense_files::{DownloadOutcome, ExpenseFilesPage, EMPTY_MESSAGE};
use crate::tui::{self, HEADER_STYLE, NOTICE_TTL, PROMPT_STYLE, SELECTED_STYLE};

// Field order of the upload form
const USER_IDX: usize = 0;
const ACCOUNT_IDX: usize = 1;
const FILE_IDX: usize = 2;

// Field order of the account dialog
const NAME_IDX: usize = 0;
const TYPE_IDX: usize = 1;

pub enum FilesAction {
    Continue,
    Close,
}

enum Mode {
    Files,
    UploadForm,
    AccountDialog(Form),
    Confirm,
}

enum Job {
    Load,
    Upload(Upload),
    CreateAccount,
    Download(i64),
    Confirm(bool),
}

pub struct FilesManager {
    page: ExpenseFilesPage,
    form: Form,
    /// Path typed into the upload form, kept across form rebuilds.
    file_input: String,
    mode: Mode,
    job: Option<Job>,
    selection: usize,
    table_state: TableState,
    download_dir: PathBuf,
    notice_ttl: u8,
}

impl FilesManager {
    pub fn new(download_dir: PathBuf) -> Self {
        let mut page = ExpenseFilesPage::new();
        page.loading = true;
        let mut manager = Self {
            page,
            form: Form::new(Vec::new()),
            file_input: String::new(),
            mode: Mode::Files,
            job: Some(Job::Load),
            selection: 0,
            table_state: TableState::default(),
            download_dir,
            notice_ttl: 0,
        };
        manager.rebuild_form();
        manager
    }

    /// Re-create the upload form from page state so new users/accounts show up.
    fn rebuild_form(&mut self) {
        let focused = self.form.focused;

        let mut users = vec!["Select user".to_string()];
        let user_opts = self.page.user_options();
        let user_sel = self
            .page
            .selected_user()
            .and_then(|id| user_opts.iter().position(|(uid, _)| *uid == id))
            .map_or(0, |p| p + 1);
        users.extend(user_opts.into_iter().map(|(_, label)| label));

        let mut accounts = vec!["Select account".to_string()];
        let account_opts = self.page.account_options();
        let account_sel = self
            .page
            .selected_account()
            .and_then(|id| account_opts.iter().position(|(aid, _)| *aid == id))
            .map_or(0, |p| p + 1);
        accounts.extend(account_opts.into_iter().map(|(_, label)| label));

        let mut form = Form::new(vec![
            FormField::selector("User", users, user_sel),
            FormField::selector("Account", accounts, account_sel),
            FormField::text("File path", &self.file_input),
        ]);
        form.focused = focused.min(FILE_IDX);
        self.form = form;
    }

    /// Push the upload form's current values into the page.
    fn sync_selection(&mut self) {
        let user = self.form.fields[USER_IDX]
            .selected()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.page.user_options().get(i).map(|(id, _)| *id));
        self.page.select_user(user);

        let account = self.form.fields[ACCOUNT_IDX]
            .selected()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.page.account_options().get(i).map(|(id, _)| *id));
        self.page.select_account(account);

        self.file_input = self.form.fields[FILE_IDX].value.clone();
        let path = self.file_input.trim();
        if path.is_empty() {
            self.page.clear_file();
        } else {
            self.page.choose_file(PathBuf::from(crate::settings::shellexpand_path(path)));
        }
    }

    fn account_form(&self) -> Form {
        let dialog = self.page.account_dialog();
        let types = AccountType::ALL.iter().map(|t| t.label().to_string()).collect();
        let selected = AccountType::ALL
            .iter()
            .position(|t| *t == dialog.account_type)
            .unwrap_or(0);
        Form::new(vec![
            FormField::text("Account Name", &dialog.name),
            FormField::selector("Account Type", types, selected),
        ])
    }

    fn selected_id(&self) -> Option<i64> {
        self.page.files().get(self.selection).map(|f| f.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.page.files().len();
        self.selection = if len == 0 { 0 } else { self.selection.min(len - 1) };
    }

    pub fn run_pending(&mut self, api: &dyn Api) -> bool {
        let Some(job) = self.job.take() else {
            return false;
        };
        match job {
            Job::Load => {
                self.page.load(api);
                self.rebuild_form();
            }
            Job::Upload(upload) => {
                self.page.finish_upload(api, upload);
                if self.page.selected_file().is_none() {
                    self.file_input.clear();
                }
                self.rebuild_form();
            }
            Job::CreateAccount => {
                self.page.submit_account(api);
                if !self.page.account_dialog().open {
                    self.mode = Mode::UploadForm;
                    self.rebuild_form();
                }
            }
            Job::Download(id) => {
                if self.page.download(api, id, &self.download_dir) == DownloadOutcome::ConfirmRemoval {
                    self.mode = Mode::Confirm;
                }
            }
            Job::Confirm(confirmed) => {
                self.page.confirm(api, confirmed);
                self.mode = Mode::Files;
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
            Mode::Files => "u=upload form  g=download  d=delete  n=new account  r=reload  Esc=back",
            Mode::UploadForm => "Tab=next field  ←/→=choose  Enter=upload  n=new account (on Account)  Esc=back",
            Mode::AccountDialog(_) => "Tab=next field  Enter=create  Esc=cancel",
            Mode::Confirm => "y=confirm  n=cancel",
        };
        let content = tui::draw_chrome(frame, "Add Expense Files", hints);

        if self.page.loading {
            frame.render_widget(Paragraph::new("\n   Loading..."), content);
            return;
        }

        let notice_lines = self
            .page
            .notice()
            .map(|n| tui::notice_line(n, content.width))
            .unwrap_or_default();
        let [form_area, table_area, prompt_area, notice_area] = Layout::vertical([
            Constraint::Length(7),
            Constraint::Fill(1),
            Constraint::Length(2),
            Constraint::Length(notice_lines.len() as u16 + 1),
        ])
        .areas(content);
        frame.render_widget(Paragraph::new(notice_lines), notice_area);

        if let Mode::AccountDialog(dialog) = &self.mode {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    " Create New Account",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            lines.extend(dialog.lines());
            frame.render_widget(Paragraph::new(lines), form_area);
        } else {
            let mut lines = vec![Line::from("")];
            lines.extend(self.form.lines());
            lines.push(Line::from(""));
            lines.push(Line::from(format!("   [{}]", self.page.submit_label())));
            frame.render_widget(Paragraph::new(lines), form_area);
        }

        let [heading_area, list_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(table_area);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Uploaded Files",
                Style::default().add_modifier(Modifier::BOLD),
            ))),
            heading_area,
        );

        let rows = self.page.rows();
        if rows.is_empty() {
            frame.render_widget(Paragraph::new(format!("   {EMPTY_MESSAGE}")), list_area);
        } else {
            let table_rows: Vec<Row> = rows
                .into_iter()
                .map(|r| Row::new(vec![r.file_name, r.user, r.account, r.uploaded_at]))
                .collect();
            let widths = [
                Constraint::Fill(2),
                Constraint::Fill(1),
                Constraint::Fill(1),
                Constraint::Length(19),
            ];
            let highlight = if matches!(self.mode, Mode::Files | Mode::Confirm) {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            let table = Table::new(table_rows, widths)
                .header(
                    Row::new(vec!["File Name", "User", "Account", "Uploaded At"])
                        .style(HEADER_STYLE)
                        .bottom_margin(1),
                )
                .column_spacing(1)
                .row_highlight_style(highlight);
            self.table_state.select(Some(self.selection));
            frame.render_stateful_widget(table, list_area, &mut self.table_state);
        }

        if let (Mode::Confirm, Some(pending)) = (&self.mode, self.page.pending()) {
            frame.render_widget(
                Paragraph::new(format!("   {} (y/n)", pending.prompt())).style(PROMPT_STYLE),
                prompt_area,
            );
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> FilesAction {
        if self.notice_ttl > 0 {
            self.notice_ttl -= 1;
            if self.notice_ttl == 0 {
                self.page.clear_notice();
            }
        }
        if self.job.is_some() || self.page.loading {
            return FilesAction::Continue;
        }

        match &mut self.mode {
            Mode::Files => return self.handle_files_key(code),
            Mode::UploadForm => self.handle_form_key(code),
            Mode::AccountDialog(dialog) => match dialog.handle_key(code) {
                FormEvent::Cancel => {
                    self.page.close_account_dialog();
                    self.mode = Mode::UploadForm;
                }
                FormEvent::Submit => {
                    let name = dialog.fields[NAME_IDX].value.clone();
                    let kind = dialog.fields[TYPE_IDX]
                        .selected()
                        .and_then(|i| AccountType::ALL.get(i).copied())
                        .unwrap_or_default();
                    self.page.set_account_name(&name);
                    self.page.set_account_type(kind);
                    self.job = Some(Job::CreateAccount);
                }
                FormEvent::Changed | FormEvent::None => {}
            },
            Mode::Confirm => match code {
                KeyCode::Char('y') => self.job = Some(Job::Confirm(true)),
                KeyCode::Char('n') | KeyCode::Esc => self.job = Some(Job::Confirm(false)),
                _ => {}
            },
        }
        FilesAction::Continue
    }

    fn open_account_dialog(&mut self) {
        self.page.open_account_dialog();
        self.mode = Mode::AccountDialog(self.account_form());
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        if code == KeyCode::Char('n') && self.form.focused == ACCOUNT_IDX {
            self.open_account_dialog();
            return;
        }
        match self.form.handle_key(code) {
            FormEvent::Cancel => {
                self.sync_selection();
                self.mode = Mode::Files;
            }
            FormEvent::Submit => {
                self.sync_selection();
                if let Some(upload) = self.page.begin_upload() {
                    self.job = Some(Job::Upload(upload));
                } else {
                    self.notice_ttl = NOTICE_TTL;
                }
            }
            FormEvent::Changed => self.sync_selection(),
            FormEvent::None => {}
        }
    }

    fn handle_files_key(&mut self, code: KeyCode) -> FilesAction {
        match code {
            KeyCode::Up => self.selection = self.selection.saturating_sub(1),
            KeyCode::Down => {
                self.selection += 1;
                self.clamp_selection();
            }
            KeyCode::Char('u') | KeyCode::Tab => self.mode = Mode::UploadForm,
            KeyCode::Char('n') => self.open_account_dialog(),
            KeyCode::Char('g') => {
                if let Some(id) = self.selected_id() {
                    self.job = Some(Job::Download(id));
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.page.request_delete(id);
                    self.mode = Mode::Confirm;
                }
            }
            KeyCode::Char('r') => {
                self.page.loading = true;
                self.job = Some(Job::Load);
            }
            KeyCode::Char('q') | KeyCode::Esc => return FilesAction::Close,
            _ => {}
        }
        FilesAction::Continue
    }
}
