use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::roster::types::NewStudent;

/// Result of handling a key event in the add form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult {
  /// Key was handled, stay in the form
  Consumed,
  /// All required fields present, here's the student to add
  Submitted(NewStudent),
  /// Escape pressed, form dismissed
  Cancelled,
}

/// One labelled text field
#[derive(Debug, Clone)]
struct Field {
  label: &'static str,
  buffer: String,
}

impl Field {
  fn new(label: &'static str) -> Self {
    Self {
      label,
      buffer: String::new(),
    }
  }
}

/// Add-student form: last name, first name, middle name.
///
/// Tab/arrows move between fields, Enter submits, Esc cancels. Validation
/// runs on submit and keeps the form open with a message until the
/// required names are filled in.
#[derive(Debug, Clone)]
pub struct AddStudentForm {
  fields: [Field; 3],
  focus: usize,
  error: Option<String>,
}

impl Default for AddStudentForm {
  fn default() -> Self {
    Self::new()
  }
}

impl AddStudentForm {
  pub fn new() -> Self {
    Self {
      fields: [
        Field::new("Last name"),
        Field::new("First name"),
        Field::new("Middle name"),
      ],
      focus: 0,
      error: None,
    }
  }

  /// Reset all fields for a fresh entry
  pub fn clear(&mut self) {
    for field in &mut self.fields {
      field.buffer.clear();
    }
    self.focus = 0;
    self.error = None;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> FormResult {
    match key.code {
      KeyCode::Esc => FormResult::Cancelled,
      KeyCode::Tab | KeyCode::Down => {
        self.focus = (self.focus + 1) % self.fields.len();
        FormResult::Consumed
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        FormResult::Consumed
      }
      KeyCode::Enter => {
        let new = self.to_new_student();
        match new.validate() {
          Ok(()) => FormResult::Submitted(new),
          Err(e) => {
            self.error = Some(e.to_string());
            FormResult::Consumed
          }
        }
      }
      KeyCode::Backspace => {
        self.fields[self.focus].buffer.pop();
        FormResult::Consumed
      }
      KeyCode::Char(c) => {
        self.fields[self.focus].buffer.push(c);
        self.error = None;
        FormResult::Consumed
      }
      _ => FormResult::Consumed,
    }
  }

  fn to_new_student(&self) -> NewStudent {
    NewStudent {
      last_name: self.fields[0].buffer.trim().to_string(),
      first_name: self.fields[1].buffer.trim().to_string(),
      middle_name: self.fields[2].buffer.trim().to_string(),
      ..Default::default()
    }
  }

  /// Draw the form as a centered popup over the given area
  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(area, 44, 9);
    frame.render_widget(Clear, popup);

    let block = Block::default()
      .title(" Add student ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in self.fields.iter().enumerate() {
      let focused = i == self.focus;
      let label_style = if focused {
        Style::default().fg(Color::Yellow)
      } else {
        Style::default().fg(Color::DarkGray)
      };
      let mut spans = vec![
        Span::styled(format!("{:<12}", field.label), label_style),
        Span::raw(field.buffer.clone()),
      ];
      if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
      }
      lines.push(Line::from(spans));
      lines.push(Line::default());
    }

    if let Some(error) = &self.error {
      lines.push(Line::from(Span::styled(
        error.clone(),
        Style::default().fg(Color::Red),
      )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
  }
}

/// A `width` x `height` rect centered in `area`, clamped to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_text(form: &mut AddStudentForm, text: &str) {
    for c in text.chars() {
      form.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn test_typing_fills_focused_field() {
    let mut form = AddStudentForm::new();
    type_text(&mut form, "Petrov");
    assert_eq!(form.fields[0].buffer, "Petrov");
  }

  #[test]
  fn test_tab_cycles_fields() {
    let mut form = AddStudentForm::new();
    form.handle_key(key(KeyCode::Tab));
    type_text(&mut form, "Ivan");
    assert_eq!(form.fields[1].buffer, "Ivan");

    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Tab));
    // Wrapped back to the first field
    type_text(&mut form, "X");
    assert_eq!(form.fields[0].buffer, "X");
  }

  #[test]
  fn test_submit_with_all_names() {
    let mut form = AddStudentForm::new();
    type_text(&mut form, "Petrov");
    form.handle_key(key(KeyCode::Tab));
    type_text(&mut form, "Ivan");
    form.handle_key(key(KeyCode::Tab));
    type_text(&mut form, "Ivanovich");

    let result = form.handle_key(key(KeyCode::Enter));
    match result {
      FormResult::Submitted(new) => {
        assert_eq!(new.last_name, "Petrov");
        assert_eq!(new.first_name, "Ivan");
        assert_eq!(new.middle_name, "Ivanovich");
      }
      other => panic!("expected Submitted, got {other:?}"),
    }
  }

  #[test]
  fn test_submit_trims_whitespace() {
    let mut form = AddStudentForm::new();
    type_text(&mut form, "  Petrov ");
    form.handle_key(key(KeyCode::Tab));
    type_text(&mut form, "Ivan");
    form.handle_key(key(KeyCode::Tab));
    type_text(&mut form, "Ivanovich");

    match form.handle_key(key(KeyCode::Enter)) {
      FormResult::Submitted(new) => assert_eq!(new.last_name, "Petrov"),
      other => panic!("expected Submitted, got {other:?}"),
    }
  }

  #[test]
  fn test_submit_with_missing_name_keeps_form_open() {
    let mut form = AddStudentForm::new();
    type_text(&mut form, "Petrov");

    let result = form.handle_key(key(KeyCode::Enter));
    assert_eq!(result, FormResult::Consumed);
    assert!(form.error.is_some());

    // Typing again clears the message
    form.handle_key(key(KeyCode::Char('x')));
    assert!(form.error.is_none());
  }

  #[test]
  fn test_escape_cancels() {
    let mut form = AddStudentForm::new();
    assert_eq!(form.handle_key(key(KeyCode::Esc)), FormResult::Cancelled);
  }

  #[test]
  fn test_clear_resets_fields_and_focus() {
    let mut form = AddStudentForm::new();
    type_text(&mut form, "Petrov");
    form.handle_key(key(KeyCode::Tab));
    form.clear();

    assert_eq!(form.focus, 0);
    assert!(form.fields.iter().all(|f| f.buffer.is_empty()));
  }
}
