use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::roster::controller::{AddContext, DeleteContext, RefetchTicket};
use crate::roster::types::{NewStudent, Student};

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh
  Tick,
  /// A roster network call settled
  Roster(RosterEvent),
}

/// Outcomes of roster network calls, carrying the reconciliation context
/// captured when the operation started.
#[derive(Debug)]
pub enum RosterEvent {
  ListLoaded {
    ticket: RefetchTicket,
    result: Result<Vec<Student>, TransportError>,
  },
  AddSettled {
    ctx: AddContext,
    fields: NewStudent,
    result: Result<Student, TransportError>,
  },
  DeleteSettled {
    ctx: DeleteContext,
    result: Result<i64, TransportError>,
  },
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn terminal event reader
    let input_tx = tx.clone();
    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          if let Ok(CrosstermEvent::Key(key)) = event::read() {
            if input_tx.send(Event::Key(key)).is_err() {
              break;
            }
          }
        } else {
          // Tick
          if input_tx.send(Event::Tick).is_err() {
            break;
          }
        }
      }
    });

    Self { tx, rx }
  }

  /// Sender for async tasks to post completion events
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
