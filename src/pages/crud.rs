use std::sync::LazyLock;

use regex::Regex;

use crate::api::Api;
use crate::error::{AppError, Result};
use crate::pages::Notice;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// One backend collection with a list view and a modal form.
pub trait Resource {
    type Item: Clone;
    type Payload;

    const SINGULAR: &'static str;
    const PLURAL: &'static str;
    const HEADERS: &'static [&'static str];
    /// Form labels; form values are kept in this order.
    const FIELDS: &'static [&'static str];

    fn id(item: &Self::Item) -> i64;
    /// Table cells, one per header.
    fn row(item: &Self::Item) -> Vec<String>;
    /// Short label used in delete prompts.
    fn label(item: &Self::Item) -> String;
    fn form_values(item: &Self::Item) -> Vec<String>;
    fn payload(values: &[String]) -> Result<Self::Payload>;

    fn list(api: &dyn Api) -> Result<Vec<Self::Item>>;
    fn create(api: &dyn Api, payload: &Self::Payload) -> Result<()>;
    fn update(api: &dyn Api, id: i64, payload: &Self::Payload) -> Result<()>;
    fn delete(api: &dyn Api, id: i64) -> Result<()>;
}

/// Every field must be non-blank; values come back trimmed.
pub fn required<'a>(values: &'a [String], labels: &[&str]) -> Result<Vec<&'a str>> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let v = values.get(i).map(|s| s.trim()).unwrap_or("");
            if v.is_empty() {
                Err(AppError::Validation(format!("{label} is required")))
            } else {
                Ok(v)
            }
        })
        .collect()
}

pub fn check_email(email: &str) -> Result<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("'{email}' is not a valid email")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    /// `Some` when editing an existing record.
    pub id: Option<i64>,
    pub values: Vec<String>,
}

pub struct CrudPage<R: Resource> {
    items: Vec<R::Item>,
    pub loading: bool,
    pub submitting: bool,
    form: Option<FormState>,
    pending_delete: Option<i64>,
    notice: Option<Notice>,
}

impl<R: Resource> Default for CrudPage<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            submitting: false,
            form: None,
            pending_delete: None,
            notice: None,
        }
    }
}

impl<R: Resource> CrudPage<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[R::Item] {
        &self.items
    }

    pub fn item(&self, id: i64) -> Option<&R::Item> {
        self.items.iter().find(|i| R::id(i) == id)
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub fn empty_message() -> String {
        format!("No {} found.", R::PLURAL)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Saving..."
        } else {
            "Save"
        }
    }

    pub fn form_title(&self) -> String {
        let verb = match self.form.as_ref().and_then(|f| f.id) {
            Some(_) => "Edit",
            None => "Add",
        };
        format!("{verb} {}", capitalize(R::SINGULAR))
    }

    pub fn load(&mut self, api: &dyn Api) {
        self.loading = true;
        self.notice = None;
        match R::list(api) {
            Ok(items) => self.items = items,
            Err(e) => {
                tracing::warn!("loading {} failed: {e}", R::PLURAL);
                self.notice = Some(Notice::Error(format!("Failed to load {}", R::PLURAL)));
            }
        }
        self.loading = false;
    }

    pub fn open_create(&mut self) {
        self.form = Some(FormState {
            id: None,
            values: vec![String::new(); R::FIELDS.len()],
        });
    }

    /// Returns false when no item has that id.
    pub fn open_edit(&mut self, id: i64) -> bool {
        match self.item(id) {
            Some(item) => {
                self.form = Some(FormState {
                    id: Some(id),
                    values: R::form_values(item),
                });
                true
            }
            None => false,
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn set_value(&mut self, field: usize, value: &str) {
        if let Some(v) = self.form.as_mut().and_then(|f| f.values.get_mut(field)) {
            *v = value.to_string();
        }
    }

    /// Validate, save, refetch and close. Returns true when the record was saved.
    pub fn submit(&mut self, api: &dyn Api) -> bool {
        let Some(form) = self.form.clone() else {
            return false;
        };
        let payload = match R::payload(&form.values) {
            Ok(p) => p,
            Err(e) => {
                self.notice = Some(Notice::Error(e.to_string()));
                return false;
            }
        };

        self.submitting = true;
        let result = match form.id {
            Some(id) => R::update(api, id, &payload),
            None => R::create(api, &payload),
        };
        let saved = match result {
            Ok(()) => {
                tracing::info!("saved {} {:?}", R::SINGULAR, form.id);
                self.load(api);
                self.close_form();
                true
            }
            Err(e) => {
                tracing::warn!("saving {} failed: {e}", R::SINGULAR);
                self.notice = Some(Notice::Error(format!("Failed to save {}", R::SINGULAR)));
                false
            }
        };
        self.submitting = false;
        saved
    }

    pub fn request_delete(&mut self, id: i64) {
        if self.item(id).is_some() {
            self.pending_delete = Some(id);
        }
    }

    pub fn delete_prompt(&self) -> Option<String> {
        self.pending_delete
            .map(|_| format!("Are you sure you want to delete this {}?", R::SINGULAR))
    }

    /// Resolve a pending delete. Declining sends nothing.
    pub fn confirm_delete(&mut self, api: &dyn Api, confirmed: bool) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        if !confirmed {
            return;
        }
        match R::delete(api, id) {
            Ok(()) => {
                tracing::info!("deleted {} {id}", R::SINGULAR);
                self.items.retain(|i| R::id(i) != id);
            }
            Err(e) => {
                tracing::warn!("deleting {} {id} failed: {e}", R::SINGULAR);
                self.notice = Some(Notice::Error(format!("Failed to delete {}", R::SINGULAR)));
            }
        }
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
