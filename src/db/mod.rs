//! SQLite persistence for the student roster.
//!
//! Every operation opens its own connection and drops it when done; the
//! adapter holds no cross-call state beyond the database path.

pub mod names;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use crate::error::StorageError;
use crate::roster::types::{NewStudent, Student};

/// Persistence adapter for the `student` table.
#[derive(Debug, Clone)]
pub struct StudentDb {
  path: PathBuf,
}

impl StudentDb {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Open a connection scoped to one operation, creating the database and
  /// its parent directory on first use.
  fn open(&self) -> Result<Connection, StorageError> {
    if let Some(parent) = self.path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::CreateDir {
          path: parent.to_path_buf(),
          source: e,
        })?;
      }
    }

    let conn = Connection::open(&self.path).map_err(|e| StorageError::Open {
      path: self.path.clone(),
      source: e,
    })?;

    conn.execute_batch(schema::SCHEMA)?;

    Ok(conn)
  }

  /// All students in id order.
  pub fn list_students(&self) -> Result<Vec<Student>, StorageError> {
    let conn = self.open()?;

    let mut stmt = conn
      .prepare("SELECT id, firstName, lastName, middleName, groupId FROM student ORDER BY id")?;

    let students = stmt
      .query_map([], |row| {
        Ok(Student {
          id: row.get(0)?,
          first_name: row.get(1)?,
          last_name: row.get(2)?,
          middle_name: row.get(3)?,
          contacts: None,
          group_id: row.get(4)?,
          is_deleted: false,
        })
      })?
      .collect::<Result<Vec<_>, _>>()?;

    Ok(students)
  }

  /// Insert one student and return the stored record with its assigned id.
  ///
  /// Field validation happens at the caller; the `contacts` field is not
  /// persisted because the table carries no column for it.
  pub fn insert_student(&self, new: &NewStudent) -> Result<Student, StorageError> {
    let conn = self.open()?;

    conn.execute(
      "INSERT INTO student (firstName, lastName, middleName, groupId) VALUES (?, ?, ?, ?)",
      params![
        new.first_name,
        new.last_name,
        new.middle_name,
        new.group_id_or_default()
      ],
    )?;

    Ok(Student {
      id: conn.last_insert_rowid(),
      first_name: new.first_name.clone(),
      last_name: new.last_name.clone(),
      middle_name: new.middle_name.clone(),
      contacts: None,
      group_id: new.group_id_or_default(),
      is_deleted: false,
    })
  }

  /// Delete the row with the given id. Deleting a missing row succeeds.
  pub fn delete_student(&self, id: i64) -> Result<(), StorageError> {
    let conn = self.open()?;
    conn.execute("DELETE FROM student WHERE id=?", params![id])?;
    Ok(())
  }

  /// Insert `amount` randomly named students in one transaction and return
  /// the generated names.
  pub fn insert_random_students(&self, amount: usize) -> Result<Vec<NewStudent>, StorageError> {
    let mut conn = self.open()?;
    let tx = conn.transaction()?;

    let mut generated = Vec::with_capacity(amount);
    {
      let mut stmt = tx.prepare(
        "INSERT INTO student (firstName, lastName, middleName, groupId) VALUES (?, ?, ?, ?)",
      )?;
      for _ in 0..amount {
        let name = names::random_name();
        stmt.execute(params![
          name.first_name,
          name.last_name,
          name.middle_name,
          name.group_id_or_default()
        ])?;
        generated.push(name);
      }
    }

    tx.commit()?;
    Ok(generated)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn test_db() -> (tempfile::TempDir, StudentDb) {
    let dir = tempfile::tempdir().unwrap();
    let db = StudentDb::new(dir.path().join("roster.db"));
    (dir, db)
  }

  fn new_student(first: &str) -> NewStudent {
    NewStudent {
      first_name: first.into(),
      last_name: "Petrov".into(),
      middle_name: "Ivanovich".into(),
      ..Default::default()
    }
  }

  #[test]
  fn test_insert_and_list_roundtrip() {
    let (_dir, db) = test_db();

    let created = db.insert_student(&new_student("Ivan")).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.group_id, 1);

    let students = db.list_students().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, created.id);
    assert_eq!(students[0].first_name, "Ivan");
  }

  #[test]
  fn test_insert_honors_group_id() {
    let (_dir, db) = test_db();

    let mut new = new_student("Ivan");
    new.group_id = Some(4);
    let created = db.insert_student(&new).unwrap();
    assert_eq!(created.group_id, 4);
    assert_eq!(db.list_students().unwrap()[0].group_id, 4);
  }

  #[test]
  fn test_contacts_is_not_persisted() {
    let (_dir, db) = test_db();

    let mut new = new_student("Ivan");
    new.contacts = Some("ivan@example.com".into());
    let created = db.insert_student(&new).unwrap();
    assert_eq!(created.contacts, None);
    assert_eq!(db.list_students().unwrap()[0].contacts, None);
  }

  #[test]
  fn test_ids_are_assigned_in_order() {
    let (_dir, db) = test_db();

    let a = db.insert_student(&new_student("A")).unwrap();
    let b = db.insert_student(&new_student("B")).unwrap();
    assert!(b.id > a.id);

    let ids: Vec<i64> = db.list_students().unwrap().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
  }

  #[test]
  fn test_delete_removes_row() {
    let (_dir, db) = test_db();

    let created = db.insert_student(&new_student("Ivan")).unwrap();
    db.delete_student(created.id).unwrap();
    assert!(db.list_students().unwrap().is_empty());
  }

  #[test]
  fn test_delete_of_missing_id_succeeds() {
    let (_dir, db) = test_db();
    db.delete_student(12345).unwrap();
  }

  #[test]
  fn test_insert_random_students() {
    let (_dir, db) = test_db();

    let generated = db.insert_random_students(5).unwrap();
    assert_eq!(generated.len(), 5);
    assert_eq!(db.list_students().unwrap().len(), 5);
  }
}
