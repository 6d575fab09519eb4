use std::fs;

use rusqlite::{
    params_from_iter,
    types::{ToSqlOutput, ValueRef},
    Connection, ToSql,
};

use crate::storage::{Connector, Row, SqlValue, StorageError};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY,
    amount REAL NOT NULL,
    description TEXT NOT NULL
)";

/// Embedded backend. The database is a single file; dropping it deletes
/// the file.
pub struct SqliteConnector {
    conn: Connection,
    path: String,
}

impl SqliteConnector {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(path)
        }
        .map_err(|e| StorageError::Other(e.to_string()))?;
        tracing::debug!(path, "opened SQLite database");
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    /// Opening the file implicitly creates it, so bootstrap reduces to
    /// open plus schema creation.
    pub fn prepare_database(path: &str) -> Result<Self, StorageError> {
        let mut db = Self::open(path)?;
        db.create_schema()?;
        Ok(db)
    }

    fn rewrite_placeholders(statement: &str) -> String {
        statement.replace("%s", "?")
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlValue::Null => Ok(ToSqlOutput::Borrowed(ValueRef::Null)),
            SqlValue::Integer(v) => v.to_sql(),
            SqlValue::Real(v) => v.to_sql(),
            SqlValue::Text(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
        }
    }
}

impl Connector for SqliteConnector {
    fn run(&mut self, statement: &str, params: &[SqlValue]) -> Result<Vec<Row>, StorageError> {
        let sql = Self::rewrite_placeholders(statement);
        tracing::debug!(sql = %sql, params = params.len(), "executing statement");
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| StorageError::Other(e.to_string()))?;
        let columns = stmt.column_count();
        if columns == 0 {
            stmt.execute(params_from_iter(params.iter()))
                .map_err(|e| StorageError::Other(e.to_string()))?;
            return Ok(Vec::new());
        }
        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(|e| StorageError::Other(e.to_string()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(|e| StorageError::Other(e.to_string()))? {
            let mut values = Vec::with_capacity(columns);
            for index in 0..columns {
                let value = match row
                    .get_ref(index)
                    .map_err(|e| StorageError::Other(e.to_string()))?
                {
                    ValueRef::Null => SqlValue::Null,
                    ValueRef::Integer(v) => SqlValue::Integer(v),
                    ValueRef::Real(v) => SqlValue::Real(v),
                    ValueRef::Text(v) => SqlValue::Text(String::from_utf8_lossy(v).into_owned()),
                    ValueRef::Blob(_) => {
                        return Err(StorageError::Other(format!(
                            "unexpected BLOB in column {index}"
                        )))
                    }
                };
                values.push(value);
            }
            out.push(values);
        }
        Ok(out)
    }

    fn begin(&mut self) -> Result<(), StorageError> {
        self.conn
            .execute_batch("BEGIN")
            .map_err(|e| StorageError::Other(e.to_string()))
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| StorageError::Other(e.to_string()))
    }

    fn create_schema(&mut self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(CREATE_TABLE)
            .map_err(|e| StorageError::Other(e.to_string()))
    }

    fn drop_database(self: Box<Self>) -> Result<(), StorageError> {
        let Self { conn, path } = *self;
        // The file handle must be released before unlinking.
        drop(conn);
        if path != ":memory:" {
            fs::remove_file(&path)?;
        }
        tracing::debug!(path = %path, "dropped SQLite database");
        Ok(())
    }
}
