use crate::config::Config;
use crate::event::{Event, EventHandler, RosterEvent};
use crate::roster::client::RosterClient;
use crate::roster::controller::RosterCache;
use crate::roster::types::{NewStudent, Student};
use crate::ui;
use crate::ui::components::{AddStudentForm, FormResult};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Add,
}

/// Main application state.
///
/// Owns the cache controller; every cache mutation happens here on the UI
/// task, inside `handle_event`. Network calls run in spawned tasks and
/// report back through the event channel with the reconciliation context
/// they were started with.
pub struct App {
  /// Optimistic cache controller over the student list
  roster: RosterCache,

  /// Remote access to the roster service
  client: RosterClient,

  /// Current input mode
  mode: Mode,

  /// Add-form state (active in Mode::Add)
  add_form: AddStudentForm,

  /// Selected row in the list
  selected: usize,

  /// Last error, shown in the status bar until the next action
  status: Option<String>,

  /// A full-list fetch is in flight
  loading: bool,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: &Config) -> Self {
    let client = RosterClient::new(config.server.url.clone());
    let (tx, _rx) = mpsc::unbounded_channel();

    Self {
      roster: RosterCache::new(),
      client,
      mode: Mode::Normal,
      add_form: AddStudentForm::new(),
      selected: 0,
      status: None,
      loading: false,
      event_tx: tx,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    // Initial data load
    self.request_list();

    // Main loop
    while !self.should_quit {
      // Draw UI
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Handle events
      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {} // UI refresh happens automatically
      Event::Roster(roster_event) => self.handle_roster_event(roster_event),
    }
  }

  fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Add => self.handle_add_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      // Quit
      KeyCode::Char('q') => {
        self.should_quit = true;
      }
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Navigation
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),

      // Actions
      KeyCode::Char('a') => {
        self.status = None;
        self.add_form.clear();
        self.mode = Mode::Add;
      }
      KeyCode::Char('d') => {
        self.status = None;
        self.request_delete_selected();
      }
      KeyCode::Char('r') => {
        self.status = None;
        self.roster.reset();
        self.request_list();
      }

      _ => {}
    }
  }

  fn handle_add_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match self.add_form.handle_key(key) {
      FormResult::Submitted(fields) => {
        self.mode = Mode::Normal;
        self.request_add(fields);
      }
      FormResult::Cancelled => {
        self.mode = Mode::Normal;
      }
      FormResult::Consumed => {}
    }
  }

  /// Fetch the full list. The result only lands if no mutation supersedes
  /// it in the meantime.
  fn request_list(&mut self) {
    self.loading = true;
    let ticket = self.roster.begin_refetch();
    let client = self.client.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let result = client.list_students().await;
      let _ = tx.send(Event::Roster(RosterEvent::ListLoaded { ticket, result }));
    });
  }

  /// Optimistically add, then confirm against the server.
  fn request_add(&mut self, fields: NewStudent) {
    let ctx = self.roster.begin_add(fields.clone());
    self.selected = 0; // the new entry is prepended
    let client = self.client.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let result = client.add_student(&fields).await;
      let _ = tx.send(Event::Roster(RosterEvent::AddSettled {
        ctx,
        fields,
        result,
      }));
    });
  }

  /// Optimistically delete the selected student.
  fn request_delete_selected(&mut self) {
    let Some(student) = self.selected_student() else {
      return;
    };

    if student.is_pending() {
      self.status = Some("Still saving, try again in a moment".to_string());
      return;
    }

    let id = student.id;
    let Some(ctx) = self.roster.begin_delete(id) else {
      // Already has a delete in flight
      return;
    };

    let client = self.client.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let result = client.delete_student(id).await;
      let _ = tx.send(Event::Roster(RosterEvent::DeleteSettled { ctx, result }));
    });
  }

  /// Reconcile a settled network call with the cache.
  fn handle_roster_event(&mut self, event: RosterEvent) {
    match event {
      RosterEvent::ListLoaded { ticket, result } => {
        self.loading = false;
        match result {
          Ok(students) => {
            self.roster.apply_refetch(ticket, students);
          }
          Err(e) => {
            warn!(error = %e, "failed to load students");
            self.status = Some(format!("Failed to load students: {e}"));
          }
        }
      }
      RosterEvent::AddSettled {
        ctx,
        fields,
        result,
      } => match result {
        Ok(created) => self.roster.complete_add(&ctx, created),
        Err(e) => {
          warn!(error = %e, "failed to add student");
          self.roster.fail_add(ctx);
          self.status = Some(format!("Failed to add {}: {e}", fields.last_name));
        }
      },
      RosterEvent::DeleteSettled { ctx, result } => match result {
        Ok(_) => self.roster.complete_delete(&ctx),
        Err(e) => {
          warn!(error = %e, id = ctx.id, "failed to delete student");
          let id = ctx.id;
          self.roster.fail_delete(ctx);
          self.status = Some(format!("Failed to delete student {id}: {e}"));
        }
      },
    }
    self.clamp_selection();
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.students().map(<[Student]>::len).unwrap_or(0);
    if len > 0 {
      self.selected = (self.selected as i32 + delta).rem_euclid(len as i32) as usize;
    }
  }

  /// Keep the selection inside the list after entries come and go
  fn clamp_selection(&mut self) {
    let len = self.students().map(<[Student]>::len).unwrap_or(0);
    if len == 0 {
      self.selected = 0;
    } else if self.selected >= len {
      self.selected = len - 1;
    }
  }

  fn selected_student(&self) -> Option<&Student> {
    self.students()?.get(self.selected)
  }

  // Accessors for UI rendering
  pub fn students(&self) -> Option<&[Student]> {
    self.roster.students()
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn add_form(&self) -> &AddStudentForm {
    &self.add_form
  }

  pub fn status(&self) -> Option<&str> {
    self.status.as_deref()
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }
}
