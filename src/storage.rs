use thiserror::Error;

use crate::{
    config::{self, Backend, PostgresParams},
    error::Error,
    postgres_storage::PostgresConnector,
    sqlite_storage::SqliteConnector,
};

pub const SELECT_EXPENSES: &str = "SELECT id, amount, description FROM expenses";
pub const INSERT_EXPENSE: &str = "INSERT INTO expenses (amount, description) VALUES (%s, %s)";
pub const DELETE_EXPENSE: &str = "DELETE FROM expenses WHERE id = %s";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// One column value, as stored or as bound to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

pub type Row = Vec<SqlValue>;

/// A connection to one expense database.
///
/// Statements are written against `%s` placeholders; each implementation
/// rewrites them to its native syntax before execution. Statement text is
/// assumed to be well-formed SQL with no literal `%s` or `?` outside
/// placeholder position.
pub trait Connector {
    /// Binds `params` positionally, executes the statement, and returns
    /// every result row.
    fn run(&mut self, statement: &str, params: &[SqlValue]) -> Result<Vec<Row>, StorageError>;

    fn begin(&mut self) -> Result<(), StorageError>;

    fn commit(&mut self) -> Result<(), StorageError>;

    /// Ensures the expenses table exists. The embedded backend creates it
    /// if absent; the client/server backend issues a plain CREATE and fails
    /// if the table is already there.
    fn create_schema(&mut self) -> Result<(), StorageError>;

    /// Destroys the backing database and closes the connection. There is no
    /// way back to a usable connector; construct a new one.
    fn drop_database(self: Box<Self>) -> Result<(), StorageError>;

    /// Executes one statement. A statement with bound parameters is wrapped
    /// in a transaction and committed unconditionally, even when it only
    /// reads; a parameterless statement never commits.
    fn execute(&mut self, statement: &str, params: &[SqlValue]) -> Result<Vec<Row>, StorageError> {
        if params.is_empty() {
            return self.run(statement, &[]);
        }
        self.begin()?;
        let rows = self.run(statement, params)?;
        self.commit()?;
        Ok(rows)
    }
}

/// Builds a connector for the active backend. Connection parameters come
/// from the environment at call time and are never cached.
pub fn connect(backend: Backend) -> Result<Box<dyn Connector>, Error> {
    match backend {
        Backend::Sqlite => {
            let mut db = SqliteConnector::open(&config::sqlite_path()?)?;
            db.create_schema()?;
            Ok(Box::new(db))
        }
        Backend::Postgres => {
            let params = PostgresParams::from_env()?;
            Ok(Box::new(PostgresConnector::connect(&params)?))
        }
        Backend::Unset => Err(Error::MissingConfiguration),
    }
}
