//! Optimistic cache controller for the student list.
//!
//! The controller mutates the cached list synchronously the moment the user
//! acts, hands the caller an explicit reconciliation context, and settles
//! the entry later when the network call resolves: a confirmed add swaps
//! the temporary entry for the server record, a confirmed delete drops the
//! entry, and a failure rolls back only what the operation touched.
//!
//! All mutation happens on the UI task; the async boundary is outside this
//! module, so every method here runs to completion atomically with respect
//! to other user-triggered mutations.

use tracing::debug;

use crate::cache::MemoryStore;
use crate::roster::types::{NewStudent, Student};

/// Cache key for the student list.
pub const STUDENTS_KEY: &str = "students";

/// Identifies one full-list fetch. A fetch result is installed only while
/// its ticket is still current; any mutation started after the fetch
/// supersedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefetchTicket {
  seq: u64,
}

/// Reconciliation context for one in-flight add: the pre-mutation snapshot
/// and the temporary id standing in for the record.
#[derive(Debug, Clone)]
pub struct AddContext {
  previous: Vec<Student>,
  pub temp_id: i64,
}

/// Reconciliation context for one in-flight delete.
#[derive(Debug, Clone)]
pub struct DeleteContext {
  previous: Vec<Student>,
  pub id: i64,
}

/// Client-side state manager for the cached student list.
///
/// The presentation layer reads the cache through [`students`] and never
/// mutates it; all writes go through the operations below.
///
/// [`students`]: RosterCache::students
#[derive(Debug)]
pub struct RosterCache {
  store: MemoryStore<Vec<Student>>,
  /// Next temporary id. Counts down from -1, so temp ids are negative,
  /// pairwise distinct, and can never collide with server-assigned ids.
  next_temp_id: i64,
  /// Bumped by every mutation; in-flight fetches carry the value they
  /// started with and are dropped if it moved on.
  refetch_seq: u64,
}

impl Default for RosterCache {
  fn default() -> Self {
    Self::new()
  }
}

impl RosterCache {
  pub fn new() -> Self {
    Self {
      store: MemoryStore::new(),
      next_temp_id: -1,
      refetch_seq: 0,
    }
  }

  /// The cached list. `None` until the first load settles, which is how
  /// the UI tells "loading" from "empty".
  pub fn students(&self) -> Option<&[Student]> {
    self.store.get(STUDENTS_KEY).map(Vec::as_slice)
  }

  /// Start a full-list fetch. The caller performs the network call and
  /// passes the ticket back into [`apply_refetch`].
  ///
  /// [`apply_refetch`]: RosterCache::apply_refetch
  pub fn begin_refetch(&self) -> RefetchTicket {
    RefetchTicket {
      seq: self.refetch_seq,
    }
  }

  /// Install a fetched list, unless a mutation superseded the fetch while
  /// it was in flight. Returns whether the list was installed.
  pub fn apply_refetch(&mut self, ticket: RefetchTicket, students: Vec<Student>) -> bool {
    if ticket.seq != self.refetch_seq {
      debug!(
        ticket = ticket.seq,
        current = self.refetch_seq,
        "dropping superseded list fetch"
      );
      return false;
    }
    self.store.set(STUDENTS_KEY, students);
    true
  }

  /// Drop the cached list and supersede any in-flight fetch. The next
  /// applied refetch repopulates it.
  pub fn reset(&mut self) {
    self.refetch_seq += 1;
    self.store.invalidate(STUDENTS_KEY);
  }

  /// Optimistically add a student: the temporary record is prepended and
  /// visible before any network call is made.
  pub fn begin_add(&mut self, fields: NewStudent) -> AddContext {
    // A stale full-list response must not overwrite the entry we are
    // about to create.
    self.refetch_seq += 1;

    let previous = self.store.get(STUDENTS_KEY).cloned().unwrap_or_default();

    let temp_id = self.next_temp_id;
    self.next_temp_id -= 1;

    let group_id = fields.group_id_or_default();
    let temp = Student {
      id: temp_id,
      first_name: fields.first_name,
      last_name: fields.last_name,
      middle_name: fields.middle_name,
      contacts: fields.contacts,
      group_id,
      is_deleted: false,
    };

    let mut entries = Vec::with_capacity(previous.len() + 1);
    entries.push(temp);
    entries.extend(previous.iter().cloned());
    self.store.set(STUDENTS_KEY, entries);

    AddContext { previous, temp_id }
  }

  /// The add was confirmed: swap the temporary entry for the server
  /// record, keeping its position. No-op if the entry is gone (the cache
  /// was reset while the request was in flight).
  pub fn complete_add(&mut self, ctx: &AddContext, created: Student) {
    if let Some(entries) = self.store.get_mut(STUDENTS_KEY) {
      if let Some(slot) = entries.iter_mut().find(|s| s.id == ctx.temp_id) {
        *slot = created;
      }
    }
  }

  /// The add failed: discard the temporary entry.
  pub fn fail_add(&mut self, ctx: AddContext) {
    debug!(temp_id = ctx.temp_id, "add failed, rolling back");
    self.rollback(ctx.previous, ctx.temp_id);
  }

  /// Optimistically delete: the entry is marked `is_deleted` in place for
  /// immediate feedback and removed once the server confirms.
  ///
  /// Returns `None` when the id is not in the cache or already has a
  /// delete in flight (two snapshots of one entry cannot reconcile
  /// independently). Deletes of different ids may overlap freely.
  pub fn begin_delete(&mut self, id: i64) -> Option<DeleteContext> {
    let entries = self.store.get(STUDENTS_KEY)?;
    if !entries.iter().any(|s| s.id == id && !s.is_deleted) {
      return None;
    }

    self.refetch_seq += 1;
    let previous = entries.clone();

    if let Some(slot) = self
      .store
      .get_mut(STUDENTS_KEY)
      .and_then(|e| e.iter_mut().find(|s| s.id == id))
    {
      slot.is_deleted = true;
    }

    Some(DeleteContext { previous, id })
  }

  /// The delete was confirmed: remove the entry for good.
  pub fn complete_delete(&mut self, ctx: &DeleteContext) {
    if let Some(entries) = self.store.get_mut(STUDENTS_KEY) {
      entries.retain(|s| s.id != ctx.id);
    }
  }

  /// The delete failed: restore the entry to its pre-mutation state.
  pub fn fail_delete(&mut self, ctx: DeleteContext) {
    debug!(id = ctx.id, "delete failed, rolling back");
    self.rollback(ctx.previous, ctx.id);
  }

  /// Roll back one operation, touching only the entry it owns.
  ///
  /// The snapshot is consulted for that entry alone: if it existed before
  /// the mutation its prior state is restored (in place, or reinserted at
  /// its old position), and if it did not, the optimistic entry is
  /// removed. Entries belonging to other in-flight operations stay as
  /// they are, so one rollback never undoes an unrelated mutation.
  fn rollback(&mut self, previous: Vec<Student>, key: i64) {
    let entries = match self.store.get_mut(STUDENTS_KEY) {
      Some(entries) => entries,
      None => return,
    };

    match previous.iter().position(|s| s.id == key) {
      Some(index) => {
        let prior = previous[index].clone();
        if let Some(slot) = entries.iter_mut().find(|s| s.id == key) {
          *slot = prior;
        } else {
          entries.insert(index.min(entries.len()), prior);
        }
      }
      None => entries.retain(|s| s.id != key),
    }
  }
}
