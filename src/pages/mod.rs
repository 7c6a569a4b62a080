//! Page-scoped view-models. Each page owns its collections, form state,
//! pending confirmation and notice; the terminal screens and one-shot
//! commands only drive these and render what they expose.

pub mod crud;
pub mod employees;
pub mod expense_files;
pub mod expenses;
pub mod users;

/// Transient banner. Replaced or cleared by the next action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Error(msg) | Self::Success(msg) => msg,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
