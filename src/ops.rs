use crate::{
    error::Error,
    models::Expense,
    storage::{Connector, SqlValue, DELETE_EXPENSE, SELECT_EXPENSES},
};

/// Reads every stored expense, in the backend's natural row order.
pub fn read_all(db: &mut dyn Connector) -> Result<Vec<Expense>, Error> {
    let rows = db.execute(SELECT_EXPENSES, &[])?;
    rows.iter().map(|row| Expense::from_row(row)).collect()
}

pub fn add_expense(db: &mut dyn Connector, amount: f64, description: &str) -> Result<(), Error> {
    Expense::save(db, amount, description)
}

/// Deletes by id. Deleting an id that does not exist is not an error.
pub fn delete_expense(db: &mut dyn Connector, id: i64) -> Result<(), Error> {
    db.execute(DELETE_EXPENSE, &[SqlValue::Integer(id)])?;
    Ok(())
}
