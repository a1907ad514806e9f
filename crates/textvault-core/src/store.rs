//! SQLite-backed record storage.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};

use crate::{CoreError, Record, RecordId, RecordSummary, SourceType};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS records (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        source_name TEXT NOT NULL,
        source_type TEXT NOT NULL,
        extracted_text TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

const SUMMARY_COLUMNS: &str = "id, source_name, source_type, created_at";

impl ToSql for SourceType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for SourceType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Handle to the record table.
///
/// The single connection is shared behind a mutex, so writes from
/// concurrent callers are serialized. Ids come from `AUTOINCREMENT` and are
/// never reused.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        tracing::info!(path = %path.display(), "opened record store");
        Self::init(conn)
    }

    /// A fresh private database, gone when the store is dropped.
    pub fn open_in_memory() -> Result<Self, CoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, CoreError> {
        conn.execute_batch(SCHEMA)?;
        register_functions(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-statement leaves no transaction open, so the
        // connection stays usable.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a new record and return its id.
    pub fn create(
        &self,
        source_name: &str,
        source_type: SourceType,
        extracted_text: &str,
    ) -> Result<RecordId, CoreError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO records (source_name, source_type, extracted_text, created_at) \
             VALUES (?1, ?2, ?3, ?4)",
            params![source_name, source_type, extracted_text, Utc::now()],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(id, source_name, %source_type, chars = extracted_text.len(), "record created");
        Ok(id)
    }

    /// Every record, oldest first.
    pub fn list_all(&self) -> Result<Vec<RecordSummary>, CoreError> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {SUMMARY_COLUMNS} FROM records ORDER BY id"))?;
        let rows = stmt
            .query_map([], summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Records whose name or text contains `keyword`, ignoring case.
    ///
    /// The keyword is a literal substring; `%` and `_` carry no special
    /// meaning. An empty keyword matches everything.
    pub fn search(&self, keyword: &str) -> Result<Vec<RecordSummary>, CoreError> {
        if keyword.is_empty() {
            return self.list_all();
        }

        let needle = keyword.to_lowercase();
        let conn = self.conn();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM records \
             WHERE contains_ci(source_name, ?1) OR contains_ci(extracted_text, ?1) \
             ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![needle], summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// The full record with id `id`.
    pub fn get(&self, id: RecordId) -> Result<Record, CoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare_cached(
            "SELECT id, source_name, source_type, extracted_text, created_at \
             FROM records WHERE id = ?1",
        )?;
        stmt.query_row(params![id], |row| {
            Ok(Record {
                id: row.get(0)?,
                source_name: row.get(1)?,
                source_type: row.get(2)?,
                extracted_text: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?
        .ok_or(CoreError::NotFound(id))
    }
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<RecordSummary> {
    Ok(RecordSummary {
        id: row.get(0)?,
        source_name: row.get(1)?,
        source_type: row.get(2)?,
        created_at: row.get::<_, DateTime<Utc>>(3)?,
    })
}

/// `contains_ci(haystack, lowered_needle)`: Unicode case-insensitive
/// substring test. The needle must already be lower-cased.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "contains_ci",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack = ctx.get_raw(0).as_str().unwrap_or_default();
            let needle = ctx.get_raw(1).as_str().unwrap_or_default();
            Ok(haystack.to_lowercase().contains(needle))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(rows: &[(&str, SourceType, &str)]) -> Store {
        let store = Store::open_in_memory().unwrap();
        for (name, ty, text) in rows {
            store.create(name, *ty, text).unwrap();
        }
        store
    }

    fn ids(summaries: &[RecordSummary]) -> Vec<RecordId> {
        summaries.iter().map(|s| s.id).collect()
    }

    #[test]
    fn create_assigns_increasing_ids() {
        let store = Store::open_in_memory().unwrap();
        let a = store.create("a.pdf", SourceType::Pdf, "alpha").unwrap();
        let b = store.create("https://b.test", SourceType::Url, "beta").unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[test]
    fn list_all_in_insertion_order_without_text() {
        let store = store_with(&[
            ("first.pdf", SourceType::Pdf, "one"),
            ("https://second.test", SourceType::Url, "two"),
            ("third.pdf", SourceType::Pdf, "three"),
        ]);
        let all = store.list_all().unwrap();
        assert_eq!(ids(&all), vec![1, 2, 3]);
        assert_eq!(all[1].source_name, "https://second.test");
        assert_eq!(all[1].source_type, SourceType::Url);
    }

    #[test]
    fn get_returns_full_record() {
        let store = store_with(&[("a.pdf", SourceType::Pdf, "Hello\nWorld")]);
        let before = Utc::now();
        let id = store.create("b.pdf", SourceType::Pdf, "").unwrap();

        let a = store.get(1).unwrap();
        assert_eq!(a.source_name, "a.pdf");
        assert_eq!(a.extracted_text, "Hello\nWorld");

        let b = store.get(id).unwrap();
        assert_eq!(b.extracted_text, "");
        assert!(b.created_at >= before - chrono::Duration::seconds(1));
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let store = store_with(&[("a.pdf", SourceType::Pdf, "x")]);
        assert!(matches!(store.get(2), Err(CoreError::NotFound(2))));
        assert!(matches!(store.get(-1), Err(CoreError::NotFound(-1))));
    }

    #[test]
    fn empty_search_equals_list_all() {
        let store = store_with(&[
            ("a.pdf", SourceType::Pdf, "x"),
            ("https://b.test", SourceType::Url, "y"),
        ]);
        assert_eq!(store.search("").unwrap(), store.list_all().unwrap());
    }

    #[test]
    fn search_matches_name_or_text_case_insensitively() {
        let store = store_with(&[
            ("Annual-Report.pdf", SourceType::Pdf, "revenue grew"),
            ("https://acme.test", SourceType::Url, "Acme builds ANVILS"),
            ("notes.pdf", SourceType::Pdf, "nothing here"),
        ]);
        assert_eq!(ids(&store.search("report").unwrap()), vec![1]);
        assert_eq!(ids(&store.search("anvil").unwrap()), vec![2]);
        assert_eq!(ids(&store.search("ACME").unwrap()), vec![2]);
        assert_eq!(ids(&store.search(".pdf").unwrap()), vec![1, 3]);
        assert!(store.search("missing").unwrap().is_empty());
    }

    #[test]
    fn search_is_unicode_case_insensitive() {
        let store = store_with(&[("ünïcode.pdf", SourceType::Pdf, "STRASSE ÉCOLE")]);
        assert_eq!(ids(&store.search("ÜNÏ").unwrap()), vec![1]);
        assert_eq!(ids(&store.search("école").unwrap()), vec![1]);
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let store = store_with(&[
            ("a.pdf", SourceType::Pdf, "100% pure"),
            ("b.pdf", SourceType::Pdf, "1000 pure"),
            ("c_d.pdf", SourceType::Pdf, "x"),
        ]);
        assert_eq!(ids(&store.search("100%").unwrap()), vec![1]);
        assert_eq!(ids(&store.search("c_d").unwrap()), vec![3]);
        assert!(store.search("a_pdf").unwrap().is_empty());
    }

    #[test]
    fn search_results_are_subset_of_list_all() {
        let store = store_with(&[
            ("one.pdf", SourceType::Pdf, "apple banana"),
            ("two.pdf", SourceType::Pdf, "banana cherry"),
            ("https://three.test", SourceType::Url, "cherry"),
        ]);
        let all = store.list_all().unwrap();
        for keyword in ["banana", "cherry", "e", "three", "zzz"] {
            for hit in store.search(keyword).unwrap() {
                assert!(all.contains(&hit));
                let record = store.get(hit.id).unwrap();
                let k = keyword.to_lowercase();
                assert!(
                    record.source_name.to_lowercase().contains(&k)
                        || record.extracted_text.to_lowercase().contains(&k)
                );
            }
        }
    }

    #[test]
    fn on_disk_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("records.db");

        {
            let store = Store::open(&path).unwrap();
            store.create("a.pdf", SourceType::Pdf, "kept").unwrap();
        }

        let store = Store::open(&path).unwrap();
        let record = store.get(1).unwrap();
        assert_eq!(record.extracted_text, "kept");
        assert_eq!(store.create("b.pdf", SourceType::Pdf, "").unwrap(), 2);
    }

    #[test]
    fn ids_not_reused_after_external_delete() {
        let store = store_with(&[
            ("a.pdf", SourceType::Pdf, ""),
            ("b.pdf", SourceType::Pdf, ""),
        ]);
        store
            .conn()
            .execute("DELETE FROM records WHERE id = 2", [])
            .unwrap();
        assert_eq!(store.create("c.pdf", SourceType::Pdf, "").unwrap(), 3);
    }

    #[test]
    fn unknown_source_type_in_table_is_a_storage_error() {
        let store = Store::open_in_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO records (source_name, source_type, extracted_text) \
                 VALUES ('x', 'docx', '')",
                [],
            )
            .unwrap();
        assert!(matches!(store.list_all(), Err(CoreError::Storage(_))));
    }
}
