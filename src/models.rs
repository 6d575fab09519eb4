use crate::{
    error::Error,
    storage::{Connector, SqlValue, StorageError, INSERT_EXPENSE},
};

/// A single recorded expense.
///
/// `id` is `None` until the backend assigns one on insert; rows read back
/// always carry `Some`. Instances are transient: they exist to be validated
/// and written, or are rebuilt from rows on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Option<i64>,
    pub amount: f64,
    pub description: String,
}

impl Expense {
    pub fn new(
        id: Option<i64>,
        amount: f64,
        description: impl Into<String>,
    ) -> Result<Self, Error> {
        let description = description.into();
        if amount <= 0.0 {
            return Err(Error::NonPositiveAmount);
        }
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }
        Ok(Self {
            id,
            amount,
            description,
        })
    }

    /// Validates and inserts a new expense. The id assigned by the backend
    /// is not read back.
    pub fn save(db: &mut dyn Connector, amount: f64, description: &str) -> Result<(), Error> {
        let expense = Expense::new(None, amount, description)?;
        db.execute(
            INSERT_EXPENSE,
            &[
                SqlValue::Real(expense.amount),
                SqlValue::Text(expense.description),
            ],
        )?;
        Ok(())
    }

    /// Rebuilds an expense from a stored `(id, amount, description)` row,
    /// re-running validation on the stored values.
    pub fn from_row(row: &[SqlValue]) -> Result<Self, Error> {
        match row {
            [SqlValue::Integer(id), amount, SqlValue::Text(description)] => {
                let amount = match amount {
                    SqlValue::Real(v) => *v,
                    SqlValue::Integer(v) => *v as f64,
                    _ => return Err(malformed(row)),
                };
                Expense::new(Some(*id), amount, description.clone())
            }
            _ => Err(malformed(row)),
        }
    }
}

fn malformed(row: &[SqlValue]) -> Error {
    Error::Storage(StorageError::Other(format!(
        "malformed expense row: {row:?}"
    )))
}
