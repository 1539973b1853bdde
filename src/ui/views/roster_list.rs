use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::roster::types::Student;

/// Draw the student list.
///
/// `students` is `None` until the first load settles, which renders as a
/// loading state rather than an empty roster.
pub fn draw_roster_list(
  frame: &mut Frame,
  area: Rect,
  students: Option<&[Student]>,
  selected: usize,
  loading: bool,
) {
  let title = match students {
    None if loading => " Students (loading...) ".to_string(),
    None => " Students ".to_string(),
    Some(list) if loading => format!(" Students ({}) (refreshing...) ", list.len()),
    Some(list) => format!(" Students ({}) ", list.len()),
  };

  let block = Block::default()
    .title(title)
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let Some(students) = students else {
    let content = if loading {
      "Loading students..."
    } else {
      "Could not load students. Press 'r' to retry."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  };

  if students.is_empty() {
    let paragraph = Paragraph::new("No students. Press 'a' to add one.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = students.iter().map(row).collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected.min(students.len().saturating_sub(1))));

  frame.render_stateful_widget(list, area, &mut state);
}

fn row(student: &Student) -> ListItem<'_> {
  let mut style = Style::default();
  if student.is_deleted {
    style = style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
  } else if student.is_pending() {
    style = style.fg(Color::DarkGray);
  }

  let mut spans = vec![
    Span::styled(format!("{:<36}", student.full_name()), style),
    Span::styled(
      format!("group {}", student.group_id),
      Style::default().fg(Color::DarkGray),
    ),
  ];
  if student.is_pending() {
    spans.push(Span::styled(
      "  (saving...)",
      Style::default().fg(Color::DarkGray),
    ));
  }

  ListItem::new(Line::from(spans))
}
