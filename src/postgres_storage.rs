use postgres::{types::ToSql, Client, NoTls};

use crate::{
    config::PostgresParams,
    storage::{Connector, Row, SqlValue, StorageError},
};

const CREATE_TABLE: &str = "CREATE TABLE expenses (
    id BIGSERIAL PRIMARY KEY,
    amount DOUBLE PRECISION NOT NULL,
    description TEXT NOT NULL
)";

static NULL_PARAM: Option<String> = None;

/// Client/server backend. The connection is scoped to the configured
/// database; database creation and teardown go through a maintenance
/// connection because PostgreSQL cannot drop the database a session is
/// attached to.
pub struct PostgresConnector {
    client: Client,
    params: PostgresParams,
}

impl PostgresConnector {
    pub fn connect(params: &PostgresParams) -> Result<Self, StorageError> {
        let client = Client::connect(&connection_string(params, &params.database), NoTls)
            .map_err(|e| StorageError::Other(format!("PostgreSQL connection failed: {e}")))?;
        tracing::debug!(host = %params.host, database = %params.database, "connected to PostgreSQL");
        Ok(Self {
            client,
            params: params.clone(),
        })
    }

    /// Creates the configured database, then connects to it and creates the
    /// schema. Creation of an already existing database is a backend error
    /// and surfaces to the caller.
    pub fn prepare_database(params: &PostgresParams) -> Result<Self, StorageError> {
        let mut admin = maintenance_client(params)?;
        admin
            .batch_execute(&format!("CREATE DATABASE {}", params.database))
            .map_err(|e| StorageError::Other(e.to_string()))?;
        drop(admin);

        let mut db = Self::connect(params)?;
        db.create_schema()?;
        Ok(db)
    }
}

fn maintenance_client(params: &PostgresParams) -> Result<Client, StorageError> {
    Client::connect(&connection_string(params, "postgres"), NoTls)
        .map_err(|e| StorageError::Other(format!("PostgreSQL connection failed: {e}")))
}

fn connection_string(params: &PostgresParams, database: &str) -> String {
    format!(
        "host={} user={} password={} dbname={}",
        params.host, params.user, params.password, database
    )
}

/// Replaces each `%s` with the next `$n` placeholder.
fn rewrite_placeholders(statement: &str) -> String {
    let mut rewritten = String::with_capacity(statement.len());
    let mut rest = statement;
    let mut index = 0;
    while let Some(pos) = rest.find("%s") {
        index += 1;
        rewritten.push_str(&rest[..pos]);
        rewritten.push('$');
        rewritten.push_str(&index.to_string());
        rest = &rest[pos + 2..];
    }
    rewritten.push_str(rest);
    rewritten
}

fn row_values(row: &postgres::Row) -> Result<Row, StorageError> {
    let mut values = Vec::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let value = match column.type_().name() {
            "int2" => SqlValue::Integer(i64::from(try_get::<i16>(row, index)?)),
            "int4" => SqlValue::Integer(i64::from(try_get::<i32>(row, index)?)),
            "int8" => SqlValue::Integer(try_get::<i64>(row, index)?),
            "float4" => SqlValue::Real(f64::from(try_get::<f32>(row, index)?)),
            "float8" => SqlValue::Real(try_get::<f64>(row, index)?),
            _ => SqlValue::Text(try_get::<String>(row, index)?),
        };
        values.push(value);
    }
    Ok(values)
}

fn try_get<T>(row: &postgres::Row, index: usize) -> Result<T, StorageError>
where
    T: postgres::types::FromSqlOwned,
{
    row.try_get(index)
        .map_err(|e| StorageError::Other(e.to_string()))
}

impl Connector for PostgresConnector {
    fn run(&mut self, statement: &str, params: &[SqlValue]) -> Result<Vec<Row>, StorageError> {
        let sql = rewrite_placeholders(statement);
        tracing::debug!(sql = %sql, params = params.len(), "executing statement");
        let bound: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|value| match value {
                SqlValue::Null => &NULL_PARAM as &(dyn ToSql + Sync),
                SqlValue::Integer(v) => v as &(dyn ToSql + Sync),
                SqlValue::Real(v) => v as &(dyn ToSql + Sync),
                SqlValue::Text(v) => v as &(dyn ToSql + Sync),
            })
            .collect();
        let rows = self
            .client
            .query(sql.as_str(), &bound)
            .map_err(|e| StorageError::Other(e.to_string()))?;
        rows.iter().map(row_values).collect()
    }

    fn begin(&mut self) -> Result<(), StorageError> {
        self.client
            .batch_execute("BEGIN")
            .map_err(|e| StorageError::Other(e.to_string()))
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        self.client
            .batch_execute("COMMIT")
            .map_err(|e| StorageError::Other(e.to_string()))
    }

    fn create_schema(&mut self) -> Result<(), StorageError> {
        self.client
            .batch_execute(CREATE_TABLE)
            .map_err(|e| StorageError::Other(e.to_string()))
    }

    fn drop_database(self: Box<Self>) -> Result<(), StorageError> {
        let Self { client, params } = *self;
        // Our session must end before the database can be dropped.
        drop(client);
        let mut admin = maintenance_client(&params)?;
        admin
            .batch_execute(&format!("DROP DATABASE {}", params.database))
            .map_err(|e| StorageError::Other(e.to_string()))?;
        tracing::debug!(database = %params.database, "dropped database");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DELETE_EXPENSE, INSERT_EXPENSE, SELECT_EXPENSES};

    #[test]
    fn rewrites_placeholders_to_numbered_dollars() {
        assert_eq!(
            rewrite_placeholders(INSERT_EXPENSE),
            "INSERT INTO expenses (amount, description) VALUES ($1, $2)"
        );
        assert_eq!(
            rewrite_placeholders(DELETE_EXPENSE),
            "DELETE FROM expenses WHERE id = $1"
        );
    }

    #[test]
    fn leaves_placeholder_free_statements_alone() {
        assert_eq!(rewrite_placeholders(SELECT_EXPENSES), SELECT_EXPENSES);
    }

    #[test]
    fn builds_connection_strings_for_scoped_and_maintenance_sessions() {
        let params = PostgresParams {
            host: "localhost".into(),
            user: "root".into(),
            password: "secret".into(),
            database: "expenses".into(),
        };
        assert_eq!(
            connection_string(&params, &params.database),
            "host=localhost user=root password=secret dbname=expenses"
        );
        assert_eq!(
            connection_string(&params, "postgres"),
            "host=localhost user=root password=secret dbname=postgres"
        );
    }
}
