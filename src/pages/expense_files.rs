//! Upload, list, download and delete of expense statements, plus the
//! quick-create account dialog reachable from the upload form.

use std::path::{Path, PathBuf};
use std::thread::ScopedJoinHandle;

use crate::api::Api;
use crate::error::{AppError, Result};
use crate::fmt;
use crate::models::{Account, AccountType, ExpenseFile, NewAccount, Upload, User};
use crate::pages::Notice;

pub const ALLOWED_EXTENSIONS: &[&str] = &["csv", "xlsx"];
pub const EMPTY_MESSAGE: &str = "No files uploaded yet.";
pub const DEFAULT_DOWNLOAD_NAME: &str = "download";

const MSG_SELECT: &str = "Please select User and Account";
const MSG_NO_FILE: &str = "Please select a file (.csv or .xlsx)";
const MSG_BAD_EXTENSION: &str = "Only .csv and .xlsx files are allowed";

/// Case-insensitive check on the text after the last `.`, or on the whole
/// name when it has no `.`.
pub fn has_allowed_extension(file_name: &str) -> bool {
    let ext = file_name
        .rsplit_once('.')
        .map_or(file_name, |(_, ext)| ext)
        .to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str())
}

/// Only the final path component of a server-supplied name is used on disk.
fn safe_file_name(name: Option<&str>) -> String {
    name.and_then(|n| Path::new(n).file_name())
        .and_then(|n| n.to_str())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(DEFAULT_DOWNLOAD_NAME)
        .to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    DeleteFile { id: i64, name: String },
    RemoveMissingFile { id: i64, name: String },
}

impl Confirmation {
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::DeleteFile { .. } => "Are you sure you want to delete this file?",
            Self::RemoveMissingFile { .. } => {
                "File no longer exists on server. Do you want to remove this record?"
            }
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::DeleteFile { id, .. } | Self::RemoveMissingFile { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    /// The record exists but its content is gone; a removal prompt is pending.
    ConfirmRemoval,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountDialog {
    pub open: bool,
    pub name: String,
    pub account_type: AccountType,
}

/// Display form of one uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRow {
    pub id: i64,
    pub file_name: String,
    pub user: String,
    pub account: String,
    pub uploaded_at: String,
}

#[derive(Debug, Default)]
pub struct ExpenseFilesPage {
    users: Vec<User>,
    accounts: Vec<Account>,
    files: Vec<ExpenseFile>,
    selected_user: Option<i64>,
    selected_account: Option<i64>,
    file: Option<SelectedFile>,
    pub loading: bool,
    pub uploading: bool,
    notice: Option<Notice>,
    account_dialog: AccountDialog,
    pending: Option<Confirmation>,
}

fn settle<T>(handle: ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(AppError::Other("request thread panicked".into())))
}

impl ExpenseFilesPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn files(&self) -> &[ExpenseFile] {
        &self.files
    }

    pub fn selected_user(&self) -> Option<i64> {
        self.selected_user
    }

    pub fn selected_account(&self) -> Option<i64> {
        self.selected_account
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn pending(&self) -> Option<&Confirmation> {
        self.pending.as_ref()
    }

    pub fn account_dialog(&self) -> &AccountDialog {
        &self.account_dialog
    }

    pub fn submit_label(&self) -> &'static str {
        if self.uploading {
            "Uploading..."
        } else {
            "Upload"
        }
    }

    /// Fetch users, accounts and files at once. `loading` clears only after
    /// all three settle, whatever their outcome.
    pub fn load(&mut self, api: &dyn Api) {
        self.loading = true;
        let (users, accounts, files) = std::thread::scope(|s| {
            let users = s.spawn(move || api.list_users());
            let accounts = s.spawn(move || api.list_accounts());
            let files = s.spawn(move || api.list_expense_files());
            (settle(users), settle(accounts), settle(files))
        });

        match users {
            Ok(u) => self.users = u,
            Err(e) => self.load_failed("users", e),
        }
        match accounts {
            Ok(a) => self.accounts = a,
            Err(e) => self.load_failed("accounts", e),
        }
        match files {
            Ok(f) => self.files = f,
            Err(e) => self.load_failed("uploaded files", e),
        }
        self.loading = false;
    }

    fn load_failed(&mut self, what: &str, e: AppError) {
        tracing::warn!("loading {what} failed: {e}");
        self.notice = Some(Notice::Error(format!("Failed to load {what}")));
    }

    pub fn refresh_files(&mut self, api: &dyn Api) {
        match api.list_expense_files() {
            Ok(f) => self.files = f,
            Err(e) => self.load_failed("uploaded files", e),
        }
    }

    pub fn select_user(&mut self, id: Option<i64>) {
        self.selected_user = id;
    }

    pub fn select_account(&mut self, id: Option<i64>) {
        self.selected_account = id;
    }

    pub fn choose_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.file = Some(SelectedFile { name, path });
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    /// Client-side checks, in order: selections, file present, extension.
    pub fn validate(&self) -> Result<(i64, i64, &SelectedFile)> {
        let (Some(user_id), Some(account_id)) = (self.selected_user, self.selected_account) else {
            return Err(AppError::Validation(MSG_SELECT.into()));
        };
        let Some(file) = self.file.as_ref() else {
            return Err(AppError::Validation(MSG_NO_FILE.into()));
        };
        if !has_allowed_extension(&file.name) {
            return Err(AppError::Validation(MSG_BAD_EXTENSION.into()));
        }
        Ok((user_id, account_id, file))
    }

    /// Validate and read the file. On success the page is `uploading` and
    /// the returned request must be passed to `finish_upload`.
    pub fn begin_upload(&mut self) -> Option<Upload> {
        self.notice = None;
        let (user_id, account_id, file) = match self.validate() {
            Ok((user_id, account_id, file)) => (user_id, account_id, file.clone()),
            Err(e) => {
                self.notice = Some(Notice::Error(e.to_string()));
                return None;
            }
        };
        let bytes = match std::fs::read(&file.path) {
            Ok(b) => b,
            Err(e) => {
                let msg = format!("Could not read {}: {e}", file.path.display());
                self.notice = Some(Notice::Error(msg));
                return None;
            }
        };
        let upload = Upload {
            file_name: file.name,
            bytes,
            user_id,
            account_id,
        };
        self.uploading = true;
        Some(upload)
    }

    /// Send a prepared upload. A failed upload keeps the selected file.
    pub fn finish_upload(&mut self, api: &dyn Api, upload: Upload) -> bool {
        let ok = match api.upload_expense_file(&upload) {
            Ok(()) => {
                tracing::info!(
                    "uploaded {} for user {} account {}",
                    upload.file_name,
                    upload.user_id,
                    upload.account_id
                );
                self.notice = Some(Notice::Success(format!(
                    "File \"{}\" uploaded successfully.",
                    upload.file_name
                )));
                self.file = None;
                self.refresh_files(api);
                true
            }
            Err(e) => {
                tracing::warn!("upload of {} failed: {e}", upload.file_name);
                self.notice = Some(Notice::Error(e.notice_text("Upload failed")));
                false
            }
        };
        self.uploading = false;
        ok
    }

    pub fn upload(&mut self, api: &dyn Api) -> bool {
        match self.begin_upload() {
            Some(upload) => self.finish_upload(api, upload),
            None => false,
        }
    }

    fn file_name(&self, id: i64) -> Option<String> {
        self.files
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.file_name.clone().unwrap_or_default())
    }

    pub fn request_delete(&mut self, id: i64) {
        if let Some(name) = self.file_name(id) {
            self.pending = Some(Confirmation::DeleteFile { id, name });
        }
    }

    /// Resolve the pending prompt. Declining sends nothing and leaves no notice.
    pub fn confirm(&mut self, api: &dyn Api, confirmed: bool) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if confirmed {
            self.delete_file(api, pending.id());
        }
    }

    fn delete_file(&mut self, api: &dyn Api, id: i64) {
        match api.delete_expense_file(id) {
            Ok(()) => {
                tracing::info!("deleted expense file {id}");
                self.refresh_files(api);
            }
            Err(e) => {
                tracing::warn!("deleting expense file {id} failed: {e}");
                self.notice = Some(Notice::Error(e.notice_text("Failed to delete file")));
            }
        }
    }

    /// Fetch a file's content into `dest_dir`. A 404 carrying `FILE_MISSING`
    /// turns into a pending removal prompt instead of an error.
    pub fn download(&mut self, api: &dyn Api, id: i64, dest_dir: &Path) -> DownloadOutcome {
        self.notice = None;
        let recorded = self.file_name(id);
        match api.download_expense_file(id) {
            Ok(bytes) => {
                let name = safe_file_name(recorded.as_deref());
                let dest = dest_dir.join(&name);
                let written = std::fs::create_dir_all(dest_dir)
                    .and_then(|()| std::fs::write(&dest, &bytes));
                match written {
                    Ok(()) => {
                        tracing::info!("downloaded expense file {id} to {}", dest.display());
                        self.notice = Some(Notice::Success(format!(
                            "Saved \"{name}\" to {}",
                            dest.display()
                        )));
                        DownloadOutcome::Saved(dest)
                    }
                    Err(e) => {
                        self.notice = Some(Notice::Error(format!(
                            "Could not save {}: {e}",
                            dest.display()
                        )));
                        DownloadOutcome::Failed
                    }
                }
            }
            Err(e) if e.is_file_missing() => {
                tracing::warn!("expense file {id} has no stored content");
                self.pending = Some(Confirmation::RemoveMissingFile {
                    id,
                    name: recorded.unwrap_or_default(),
                });
                DownloadOutcome::ConfirmRemoval
            }
            Err(e) => {
                tracing::warn!("download of expense file {id} failed: {e}");
                self.notice = Some(Notice::Error(e.notice_text("Download failed")));
                DownloadOutcome::Failed
            }
        }
    }

    pub fn open_account_dialog(&mut self) {
        self.account_dialog.open = true;
    }

    /// Closing keeps whatever was typed; only a successful create resets it.
    pub fn close_account_dialog(&mut self) {
        self.account_dialog.open = false;
    }

    pub fn set_account_name(&mut self, name: &str) {
        self.account_dialog.name = name.to_string();
    }

    pub fn set_account_type(&mut self, account_type: AccountType) {
        self.account_dialog.account_type = account_type;
    }

    /// Blank names are ignored without a notice and the dialog stays open.
    pub fn submit_account(&mut self, api: &dyn Api) -> bool {
        let name = self.account_dialog.name.trim().to_string();
        if name.is_empty() {
            return false;
        }
        let request = NewAccount {
            account_name: name,
            account_type: self.account_dialog.account_type,
        };
        match api.create_account(&request) {
            Ok(account) => {
                tracing::info!("created account {} ({})", account.account_name, account.id);
                self.selected_account = Some(account.id);
                self.accounts.push(account);
                self.account_dialog = AccountDialog::default();
                true
            }
            Err(e) => {
                tracing::warn!("creating account failed: {e}");
                self.notice = Some(Notice::Error("Failed to create account".into()));
                false
            }
        }
    }

    pub fn rows(&self) -> Vec<FileRow> {
        self.files
            .iter()
            .map(|f| FileRow {
                id: f.id,
                file_name: f.file_name.clone().unwrap_or_default(),
                user: fmt::or_placeholder(f.user_name.as_deref()),
                account: fmt::or_placeholder(f.account_name.as_deref()),
                uploaded_at: fmt::timestamp(f.uploaded_at.as_deref()),
            })
            .collect()
    }

    pub fn user_options(&self) -> Vec<(i64, String)> {
        self.users
            .iter()
            .map(|u| (u.id, format!("{} ({})", u.name, u.email)))
            .collect()
    }

    pub fn account_options(&self) -> Vec<(i64, String)> {
        self.accounts
            .iter()
            .map(|a| (a.id, format!("{} ({})", a.account_name, a.account_type)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    fn api() -> FakeApi {
        FakeApi::new()
            .with_user(1, "Alice", "alice@example.com")
            .with_account(1, "HDFC Savings", "Bank Account")
            .with_file(10, "jan.csv", Some(b"date,amount\n"))
    }

    fn loaded(api: &FakeApi) -> ExpenseFilesPage {
        let mut page = ExpenseFilesPage::new();
        page.load(api);
        api.clear_calls();
        page
    }

    fn write_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, "date,amount\n2024-03-01,12.50\n").unwrap();
        path
    }

    #[test]
    fn test_extension_check() {
        assert!(has_allowed_extension("march.csv"));
        assert!(has_allowed_extension("Q1.XLSX"));
        assert!(has_allowed_extension("archive.tar.csv"));
        assert!(!has_allowed_extension("report.pdf"));
        assert!(!has_allowed_extension("old.xls"));
        assert!(!has_allowed_extension("march.csv.pdf"));
        assert!(!has_allowed_extension("statement"));
        assert!(!has_allowed_extension("march."));
    }

    #[test]
    fn test_name_without_dot_is_its_own_extension() {
        assert!(has_allowed_extension("csv"));
        assert!(has_allowed_extension("XLSX"));
    }

    #[test]
    fn test_load_fetches_all_three() {
        let api = api();
        let mut page = ExpenseFilesPage::new();
        page.load(&api);
        assert_eq!(api.count("list_users"), 1);
        assert_eq!(api.count("list_accounts"), 1);
        assert_eq!(api.count("list_expense_files"), 1);
        assert_eq!(page.users().len(), 1);
        assert_eq!(page.accounts().len(), 1);
        assert_eq!(page.files().len(), 1);
        assert!(!page.loading);
        assert!(page.notice().is_none());
    }

    #[test]
    fn test_load_partial_failure_still_settles() {
        let api = api();
        api.fail("list_accounts", 500, "{}");
        let mut page = ExpenseFilesPage::new();
        page.load(&api);
        assert!(!page.loading);
        assert_eq!(page.users().len(), 1);
        assert_eq!(page.files().len(), 1);
        assert_eq!(page.notice(), Some(&Notice::Error("Failed to load accounts".into())));
    }

    #[test]
    fn test_upload_requires_selections() {
        let api = api();
        let dir = tempfile::tempdir().unwrap();
        let mut page = loaded(&api);
        page.choose_file(write_file(&dir, "march.csv"));
        page.select_user(Some(1));
        assert!(!page.upload(&api));
        assert_eq!(page.notice(), Some(&Notice::Error(MSG_SELECT.into())));

        page.select_user(None);
        page.select_account(Some(1));
        assert!(!page.upload(&api));
        assert_eq!(page.notice(), Some(&Notice::Error(MSG_SELECT.into())));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_upload_requires_file() {
        let api = api();
        let mut page = loaded(&api);
        page.select_user(Some(1));
        page.select_account(Some(1));
        assert!(!page.upload(&api));
        assert_eq!(page.notice(), Some(&Notice::Error(MSG_NO_FILE.into())));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_upload_rejects_pdf_without_request() {
        let api = api();
        let dir = tempfile::tempdir().unwrap();
        let mut page = loaded(&api);
        page.select_user(Some(1));
        page.select_account(Some(1));
        page.choose_file(write_file(&dir, "report.pdf"));
        assert!(!page.upload(&api));
        assert_eq!(page.notice(), Some(&Notice::Error(MSG_BAD_EXTENSION.into())));
        assert!(api.calls().is_empty());
        assert!(!page.uploading);
    }

    #[test]
    fn test_upload_success_refetches() {
        let api = api();
        let dir = tempfile::tempdir().unwrap();
        let mut page = loaded(&api);
        page.select_user(Some(1));
        page.select_account(Some(1));
        page.choose_file(write_file(&dir, "march.csv"));
        assert!(page.upload(&api));

        assert_eq!(api.calls(), vec!["upload_expense_file", "list_expense_files"]);
        assert_eq!(
            page.notice(),
            Some(&Notice::Success("File \"march.csv\" uploaded successfully.".into()))
        );
        assert!(page.selected_file().is_none());
        assert!(!page.uploading);
        let names: Vec<_> = page.rows().into_iter().map(|r| r.file_name).collect();
        assert_eq!(names, vec!["jan.csv", "march.csv"]);

        let sent = &api.uploads()[0];
        assert_eq!(sent.user_id, 1);
        assert_eq!(sent.account_id, 1);
        assert_eq!(sent.bytes, b"date,amount\n2024-03-01,12.50\n");
    }

    #[test]
    fn test_upload_failure_keeps_file() {
        let api = api();
        let dir = tempfile::tempdir().unwrap();
        api.fail("upload_expense_file", 400, r#"{"message":"Account not found"}"#);
        let mut page = loaded(&api);
        page.select_user(Some(1));
        page.select_account(Some(1));
        page.choose_file(write_file(&dir, "march.csv"));
        assert!(!page.upload(&api));
        assert_eq!(page.notice(), Some(&Notice::Error("Account not found".into())));
        assert_eq!(page.selected_file().unwrap().name, "march.csv");
        assert_eq!(api.count("list_expense_files"), 0);

        api.fail("upload_expense_file", 500, "<html>oops</html>");
        page.upload(&api);
        assert_eq!(page.notice(), Some(&Notice::Error("Upload failed".into())));
    }

    #[test]
    fn test_begin_upload_sets_submitting_label() {
        let api = api();
        let dir = tempfile::tempdir().unwrap();
        let mut page = loaded(&api);
        page.select_user(Some(1));
        page.select_account(Some(1));
        page.choose_file(write_file(&dir, "q1.xlsx"));
        let upload = page.begin_upload().unwrap();
        assert_eq!(page.submit_label(), "Uploading...");
        page.finish_upload(&api, upload);
        assert_eq!(page.submit_label(), "Upload");
    }

    #[test]
    fn test_delete_confirmed_refetches() {
        let api = api();
        let mut page = loaded(&api);
        page.request_delete(10);
        assert_eq!(
            page.pending().unwrap().prompt(),
            "Are you sure you want to delete this file?"
        );
        page.confirm(&api, true);
        assert_eq!(api.calls(), vec!["delete_expense_file", "list_expense_files"]);
        assert!(page.rows().is_empty());
        assert!(page.pending().is_none());
    }

    #[test]
    fn test_delete_declined_sends_nothing() {
        let api = api();
        let mut page = loaded(&api);
        page.request_delete(10);
        page.confirm(&api, false);
        assert!(api.calls().is_empty());
        assert_eq!(page.rows().len(), 1);
    }

    #[test]
    fn test_list_matches_server_after_delete() {
        let api = api().with_file(11, "feb.csv", Some(b"x"));
        let mut page = loaded(&api);
        // Another client removed a record in the meantime.
        api.drop_file_server_side(11);
        page.request_delete(10);
        page.confirm(&api, true);
        assert!(page.files().is_empty());
    }

    #[test]
    fn test_delete_failure_uses_server_message() {
        let api = api();
        api.fail("delete_expense_file", 500, r#"{"message":"Storage offline"}"#);
        let mut page = loaded(&api);
        page.request_delete(10);
        page.confirm(&api, true);
        assert_eq!(page.notice(), Some(&Notice::Error("Storage offline".into())));
    }

    #[test]
    fn test_download_saves_under_recorded_name() {
        let api = api();
        let dir = tempfile::tempdir().unwrap();
        let mut page = loaded(&api);
        let outcome = page.download(&api, 10, dir.path());
        let expected = dir.path().join("jan.csv");
        assert_eq!(outcome, DownloadOutcome::Saved(expected.clone()));
        assert_eq!(std::fs::read(expected).unwrap(), b"date,amount\n");
    }

    #[test]
    fn test_download_creates_missing_directory() {
        let api = api();
        let dir = tempfile::tempdir().unwrap();
        let dest_dir = dir.path().join("Downloads").join("statements");
        let mut page = loaded(&api);
        let outcome = page.download(&api, 10, &dest_dir);
        assert_eq!(outcome, DownloadOutcome::Saved(dest_dir.join("jan.csv")));
        assert!(page.notice().is_some_and(|n| !n.is_error()));
        assert_eq!(std::fs::read(dest_dir.join("jan.csv")).unwrap(), b"date,amount\n");
    }

    #[test]
    fn test_download_name_fallback_and_sanitising() {
        assert_eq!(safe_file_name(None), "download");
        assert_eq!(safe_file_name(Some("")), "download");
        assert_eq!(safe_file_name(Some("../../etc/passwd")), "passwd");
        assert_eq!(safe_file_name(Some("march.csv")), "march.csv");
    }

    #[test]
    fn test_missing_file_confirmed_removes_record() {
        let api = FakeApi::new().with_file(12, "lost.csv", None);
        let dir = tempfile::tempdir().unwrap();
        let mut page = loaded(&api);
        assert_eq!(page.download(&api, 12, dir.path()), DownloadOutcome::ConfirmRemoval);
        assert!(page.notice().is_none());
        assert_eq!(
            page.pending().unwrap().prompt(),
            "File no longer exists on server. Do you want to remove this record?"
        );

        page.confirm(&api, true);
        assert_eq!(api.count("delete_expense_file"), 1);
        assert_eq!(api.count("list_expense_files"), 1);
        assert!(page.files().is_empty());
    }

    #[test]
    fn test_missing_file_declined_changes_nothing() {
        let api = FakeApi::new().with_file(12, "lost.csv", None);
        let dir = tempfile::tempdir().unwrap();
        let mut page = loaded(&api);
        page.download(&api, 12, dir.path());
        page.confirm(&api, false);
        assert_eq!(api.calls(), vec!["download_expense_file"]);
        assert!(page.notice().is_none());
        assert_eq!(page.files().len(), 1);
    }

    #[test]
    fn test_download_other_404_is_an_error() {
        let api = api();
        api.fail("download_expense_file", 404, r#"{"code":"NOT_FOUND","message":"No such file"}"#);
        let dir = tempfile::tempdir().unwrap();
        let mut page = loaded(&api);
        assert_eq!(page.download(&api, 10, dir.path()), DownloadOutcome::Failed);
        assert_eq!(page.notice(), Some(&Notice::Error("No such file".into())));
        assert!(page.pending().is_none());

        api.fail("download_expense_file", 404, "\u{0}\u{1}binary");
        page.download(&api, 10, dir.path());
        assert_eq!(page.notice(), Some(&Notice::Error("Download failed".into())));

        api.fail("download_expense_file", 500, r#"{"code":"FILE_MISSING"}"#);
        page.download(&api, 10, dir.path());
        assert!(page.pending().is_none());
        assert_eq!(page.notice(), Some(&Notice::Error("Download failed".into())));
    }

    #[test]
    fn test_quick_create_blank_name_is_silent() {
        let api = api();
        let mut page = loaded(&api);
        page.open_account_dialog();
        page.set_account_name("   ");
        assert!(!page.submit_account(&api));
        assert!(api.calls().is_empty());
        assert!(page.account_dialog().open);
        assert!(page.notice().is_none());
    }

    #[test]
    fn test_quick_create_selects_new_account() {
        let api = api();
        let mut page = loaded(&api);
        page.open_account_dialog();
        assert_eq!(page.account_dialog().account_type, AccountType::BankAccount);
        page.set_account_name("  ICICI Credit  ");
        page.set_account_type(AccountType::CreditCard);
        assert!(page.submit_account(&api));

        let created = page.accounts().last().unwrap();
        assert_eq!(created.account_name, "ICICI Credit");
        assert_eq!(created.account_type, "Credit Card");
        assert_eq!(page.selected_account(), Some(created.id));
        assert_eq!(page.account_dialog(), &AccountDialog::default());
        assert_eq!(api.calls(), vec!["create_account"]);
    }

    #[test]
    fn test_quick_create_failure_keeps_dialog() {
        let api = api();
        api.fail("create_account", 400, r#"{"message":"Account type is required"}"#);
        let mut page = loaded(&api);
        page.open_account_dialog();
        page.set_account_name("Amex");
        assert!(!page.submit_account(&api));
        assert_eq!(page.notice(), Some(&Notice::Error("Failed to create account".into())));
        assert!(page.account_dialog().open);
        assert_eq!(page.account_dialog().name, "Amex");
    }

    #[test]
    fn test_close_dialog_keeps_typed_name() {
        let mut page = ExpenseFilesPage::new();
        page.open_account_dialog();
        page.set_account_name("Draft");
        page.close_account_dialog();
        page.open_account_dialog();
        assert_eq!(page.account_dialog().name, "Draft");
    }

    #[test]
    fn test_rows_use_placeholder_for_orphans() {
        let api = FakeApi::new().with_file(10, "jan.csv", Some(b"x"));
        let mut page = loaded(&api);
        page.files[0].user_name = None;
        let row = &page.rows()[0];
        assert_eq!(row.user, "—");
        assert_eq!(row.account, "HDFC Savings");
        assert_eq!(row.uploaded_at, "2024-03-05 14:22:07");
    }

    #[test]
    fn test_option_labels() {
        let api = api();
        let page = loaded(&api);
        assert_eq!(page.user_options(), vec![(1, "Alice (alice@example.com)".to_string())]);
        assert_eq!(page.account_options(), vec![(1, "HDFC Savings (Bank Account)".to_string())]);
    }
}
