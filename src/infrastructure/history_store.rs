//! SQLite-backed request history.
//!
//! One `history` row per execution. Response headers are kept as a JSON
//! object string and the stored body is the formatted one. The connection
//! is opened by [`SqliteHistoryStore::open`] and closed when the store is
//! dropped.

use crate::application::services::HistoryStore;
use crate::domain::entities::{HistoryItem, Request, Response};

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS history (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  method TEXT NOT NULL,
  url TEXT NOT NULL,
  full_command TEXT NOT NULL,
  status_code INTEGER NOT NULL DEFAULT 0,
  response_body TEXT NOT NULL DEFAULT '',
  response_headers TEXT NOT NULL DEFAULT '{}',
  response_type TEXT NOT NULL DEFAULT 'raw',
  request_size INTEGER NOT NULL DEFAULT 0,
  response_size INTEGER NOT NULL DEFAULT 0,
  created_at_ms INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_history_created ON history(created_at_ms DESC);
"#;

const SELECT_COLUMNS: &str = "SELECT id, method, url, full_command, status_code, response_body, \
     response_headers, response_type, request_size, response_size, created_at_ms FROM history";

pub struct SqliteHistoryStore {
    conn: Mutex<Connection>,
}

impl SqliteHistoryStore {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let path = db_path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create data dir: {}", parent.display()))?;
        }
        let conn =
            Connection::open(path).with_context(|| format!("open db: {}", path.display()))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).context("create history schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("history connection lock poisoned"))
    }

    fn row_to_item(row: &Row<'_>) -> rusqlite::Result<HistoryItem> {
        let response_type: String = row.get(7)?;
        Ok(HistoryItem {
            id: row.get(0)?,
            method: row.get(1)?,
            url: row.get(2)?,
            full_command: row.get(3)?,
            status_code: row.get(4)?,
            response_body: row.get(5)?,
            response_headers: row.get(6)?,
            response_type: response_type.parse().unwrap_or_default(),
            request_size: row.get(8)?,
            response_size: row.get(9)?,
            created_at_ms: row.get(10)?,
        })
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn save(&self, request: &Request, response: &Response, command: &str) -> Result<i64> {
        let headers = serde_json::to_string(&response.headers).unwrap_or_else(|_| "{}".to_string());
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO history(method, url, full_command, status_code, response_body,
              response_headers, response_type, request_size, response_size, created_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                request.method,
                request.url,
                command,
                response.status_code,
                response.formatted_body,
                headers,
                response.response_type.as_str(),
                request.body.len() as i64,
                response.body.len() as i64,
                now_ms(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, url = %request.url, "history row inserted");
        Ok(id)
    }

    fn list(&self, limit: usize) -> Result<Vec<HistoryItem>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let limit = limit.min(10_000) as i64;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at_ms DESC, id DESC LIMIT ?1"
        ))?;
        let rows = stmt
            .query_map(params![limit], Self::row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn get(&self, id: i64) -> Result<Option<HistoryItem>> {
        let conn = self.conn()?;
        let item = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                Self::row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    fn ping(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM history", [], |r| r.get::<_, i64>(0))?;
        Ok(())
    }
}

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
