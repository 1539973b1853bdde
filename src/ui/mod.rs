pub mod components;
mod views;

use crate::app::{App, Mode};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  views::draw_roster_list(
    frame,
    chunks[0],
    app.students(),
    app.selected(),
    app.is_loading(),
  );

  if let Mode::Add = app.mode() {
    app.add_form().render(frame, chunks[0]);
  }

  draw_status_bar(frame, chunks[1], app);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = if let Some(error) = app.status() {
    (error.to_string(), Style::default().fg(Color::Red))
  } else {
    let hint = match app.mode() {
      Mode::Normal => " a:add  d:delete  r:reload  j/k:nav  q:quit",
      Mode::Add => " Tab:next field  Enter:submit  Esc:cancel",
    };
    (hint.to_string(), Style::default().fg(Color::DarkGray))
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}
