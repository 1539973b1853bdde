/// Schema for the roster database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS student (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    firstName TEXT NOT NULL,
    lastName TEXT NOT NULL,
    middleName TEXT NOT NULL,
    groupId INTEGER NOT NULL DEFAULT 1
);
"#;
