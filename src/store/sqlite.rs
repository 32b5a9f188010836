// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use serde_json::Value;
use tracing::debug;

use super::{EntityKind, Fields, RecordStore, merge, new_id};
use crate::db::init_schema;
use crate::error::{LedgerError, Result};

/// Persisted store. Every record is a JSON body in the `records` table,
/// so the schema never changes when entities gain fields.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        SqliteStore::from_connection(Connection::open_in_memory()?)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn body(&self, kind: EntityKind, id: &str) -> Result<Option<Fields>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM records WHERE id=?1 AND kind=?2",
                params![id, kind.as_str()],
                |r| r.get(0),
            )
            .optional()?;
        raw.map(|s| parse_body(&s)).transpose()
    }

    fn collect(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Fields>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(args)?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let body: String = r.get(0)?;
            out.push(parse_body(&body)?);
        }
        Ok(out)
    }
}

fn parse_body(s: &str) -> Result<Fields> {
    match serde_json::from_str::<Value>(s)? {
        Value::Object(map) => Ok(map),
        _ => Err(LedgerError::Corrupt(s.to_string())),
    }
}

// json_extract yields TEXT/INTEGER/REAL/NULL, booleans as 0/1.
fn sql_value(v: &Value) -> SqlValue {
    match v {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

impl RecordStore for SqliteStore {
    fn insert(&mut self, kind: EntityKind, mut fields: Fields) -> Result<Fields> {
        let id = new_id();
        fields.insert("id".into(), Value::String(id.clone()));
        let body = serde_json::to_string(&fields)?;
        match self.conn.execute(
            "INSERT INTO records(id, kind, body) VALUES (?1, ?2, ?3)",
            params![id, kind.as_str(), body],
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(LedgerError::DuplicateId(id));
            }
            Err(e) => return Err(e.into()),
        }
        debug!(%kind, %id, "inserted record");
        Ok(fields)
    }

    fn update(&mut self, kind: EntityKind, id: &str, patch: Fields) -> Result<bool> {
        let Some(mut record) = self.body(kind, id)? else {
            debug!(%kind, %id, "update skipped, record not found");
            return Ok(false);
        };
        merge(&mut record, patch);
        self.conn.execute(
            "UPDATE records SET body=?1 WHERE id=?2 AND kind=?3",
            params![serde_json::to_string(&record)?, id, kind.as_str()],
        )?;
        debug!(%kind, %id, "updated record");
        Ok(true)
    }

    fn delete(&mut self, kind: EntityKind, id: &str) -> Result<bool> {
        let n = self.conn.execute(
            "DELETE FROM records WHERE id=?1 AND kind=?2",
            params![id, kind.as_str()],
        )?;
        if n > 0 {
            debug!(%kind, %id, "deleted record");
        } else {
            debug!(%kind, %id, "delete skipped, record not found");
        }
        Ok(n > 0)
    }

    fn query_by_field(&self, kind: EntityKind, field: &str, value: &Value) -> Result<Vec<Fields>> {
        let path = format!("$.{}", field);
        let wanted = sql_value(value);
        self.collect(
            "SELECT body FROM records WHERE kind=?1 AND json_extract(body, ?2) IS ?3 ORDER BY rowid",
            &[&kind.as_str(), &path, &wanted],
        )
    }

    fn all(&self, kind: EntityKind) -> Result<Vec<Fields>> {
        self.collect(
            "SELECT body FROM records WHERE kind=?1 ORDER BY rowid",
            &[&kind.as_str()],
        )
    }
}
