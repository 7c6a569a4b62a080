use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::error::Result;
use crate::pages::Notice;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const ERROR_STYLE: Style = Style::new().fg(Color::Red);
pub const SUCCESS_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const PROMPT_STYLE: Style = Style::new().fg(Color::Yellow);
pub const FOCUS_STYLE: Style = Style::new().fg(Color::Cyan);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

/// Key presses a notice survives before it is cleared.
pub const NOTICE_TTL: u8 = 3;

pub fn notice_line(notice: &Notice, width: u16) -> Vec<Line<'static>> {
    let style = if notice.is_error() {
        ERROR_STYLE
    } else {
        SUCCESS_STYLE
    };
    let (wrapped, _) = wrap_text(notice.text(), width.saturating_sub(4) as usize);
    wrapped
        .lines()
        .map(|l| Line::from(Span::styled(format!("   {l}"), style)))
        .collect()
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

/// Header, separator and footer shared by every page. Returns the content area.
pub fn draw_chrome(frame: &mut Frame, title: &str, hints: &str) -> Rect {
    let area = frame.area();
    let [header_area, sep, content_area, hints_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(format!(" Expense Desk: {title}")).style(HEADER_STYLE),
        header_area,
    );
    let sep_line = "━".repeat(area.width as usize);
    frame.render_widget(
        Paragraph::new(sep_line.as_str()).style(Style::default().fg(Color::DarkGray)),
        sep,
    );
    frame.render_widget(Paragraph::new(format!(" {hints}")).style(FOOTER_STYLE), hints_area);
    content_area
}

pub enum ScreenAction {
    Continue,
    Close,
}

pub trait Screen {
    fn draw(&mut self, frame: &mut Frame);
    fn handle_key(&mut self, code: KeyCode) -> ScreenAction;
    /// Run queued network work. Called right after a draw so busy labels
    /// are on screen while the request is in flight. Returns true if
    /// anything ran.
    fn run_pending(&mut self) -> bool {
        false
    }
}

/// Run an interactive screen. Sets up the terminal, event loop and panic
/// hook, then restores the terminal on exit.
pub fn run_screen(screen: &mut dyn Screen) -> Result<()> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| screen.draw(frame)) {
            break Err(e.into());
        }
        if screen.run_pending() {
            continue;
        }

        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break Ok(());
                }
                match screen.handle_key(key.code) {
                    ScreenAction::Close => break Ok(()),
                    ScreenAction::Continue => {}
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}
