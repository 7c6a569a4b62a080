use crossterm::event::KeyCode;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::FOCUS_STYLE;

pub enum FieldKind {
    Text,
    Selector { options: Vec<String>, selected: usize },
}

pub struct FormField {
    pub label: String,
    pub value: String,
    pub kind: FieldKind,
}

impl FormField {
    pub fn text(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            kind: FieldKind::Text,
        }
    }

    pub fn selector(label: &str, options: Vec<String>, selected: usize) -> Self {
        let selected = selected.min(options.len().saturating_sub(1));
        Self {
            label: label.to_string(),
            value: options.get(selected).cloned().unwrap_or_default(),
            kind: FieldKind::Selector { options, selected },
        }
    }

    /// Index of the chosen option, if this is a selector.
    pub fn selected(&self) -> Option<usize> {
        match &self.kind {
            FieldKind::Selector { selected, .. } => Some(*selected),
            FieldKind::Text => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum FormEvent {
    None,
    Changed,
    Submit,
    Cancel,
}

/// Tab-navigable field list shared by every modal form.
pub struct Form {
    pub fields: Vec<FormField>,
    pub focused: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focused: 0 }
    }

    pub fn values(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.value.clone()).collect()
    }

    pub fn handle_key(&mut self, code: KeyCode) -> FormEvent {
        if self.fields.is_empty() {
            return match code {
                KeyCode::Esc => FormEvent::Cancel,
                KeyCode::Enter => FormEvent::Submit,
                _ => FormEvent::None,
            };
        }
        let field = &mut self.fields[self.focused];
        match code {
            KeyCode::Esc => return FormEvent::Cancel,
            KeyCode::Enter => return FormEvent::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focused = (self.focused + 1) % self.fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = if self.focused == 0 {
                    self.fields.len() - 1
                } else {
                    self.focused - 1
                };
            }
            KeyCode::Left => {
                if let FieldKind::Selector { options, selected } = &mut field.kind {
                    if options.is_empty() {
                        return FormEvent::None;
                    }
                    *selected = if *selected == 0 {
                        options.len() - 1
                    } else {
                        *selected - 1
                    };
                    field.value = options[*selected].clone();
                    return FormEvent::Changed;
                }
            }
            KeyCode::Right => {
                if let FieldKind::Selector { options, selected } = &mut field.kind {
                    if options.is_empty() {
                        return FormEvent::None;
                    }
                    *selected = (*selected + 1) % options.len();
                    field.value = options[*selected].clone();
                    return FormEvent::Changed;
                }
            }
            KeyCode::Char(c) => {
                if let FieldKind::Text = field.kind {
                    field.value.push(c);
                    return FormEvent::Changed;
                }
            }
            KeyCode::Backspace => {
                if let FieldKind::Text = field.kind {
                    field.value.pop();
                    return FormEvent::Changed;
                }
            }
            _ => {}
        }
        FormEvent::None
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let is_focused = i == self.focused;
                let label_style = if is_focused {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let value_style = if is_focused { FOCUS_STYLE } else { Style::default() };
                let shown = match &field.kind {
                    FieldKind::Text => {
                        let cursor = if is_focused { "_" } else { "" };
                        format!("{}{cursor}", field.value)
                    }
                    FieldKind::Selector { .. } => {
                        let (l, r) = if is_focused { ("< ", " >") } else { ("  ", "  ") };
                        format!("{l}{}{r}", field.value)
                    }
                };
                Line::from(vec![
                    Span::styled(format!("   {:<14} ", field.label), label_style),
                    Span::styled(shown, value_style),
                ])
            })
            .collect()
    }
}
