use std::path::Path;

use crate::{error::Error, models::Expense, storage::Connector};

/// Imports expenses from a header-led CSV file.
///
/// The header must contain `amount` and `description` columns; any other
/// columns are ignored. Rows that fail validation are skipped with a
/// diagnostic line and the import continues. Returns the number of rows
/// inserted.
pub fn import_csv(db: &mut dyn Connector, path: &str) -> Result<usize, Error> {
    if !Path::new(path).exists() {
        return Err(Error::FileNotFound(path.to_string()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let amount_column = column_index(&headers, "amount")?;
    let description_column = column_index(&headers, "description")?;

    let mut imported = 0;
    for record in reader.records() {
        let record = record?;
        let raw_amount = record.get(amount_column).unwrap_or("");
        let description = record.get(description_column).unwrap_or("");

        let saved = parse_amount(raw_amount)
            .and_then(|amount| Expense::save(db, amount, description));
        match saved {
            Ok(()) => imported += 1,
            Err(e) if e.is_validation() => {
                println!(
                    "Skipping row with invalid amount or description: {raw_amount:?} / {description:?}"
                );
            }
            Err(e) => return Err(e),
        }
    }
    tracing::info!(imported, path, "CSV import finished");
    Ok(imported)
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, Error> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or(Error::MissingColumn(name))
}

fn parse_amount(raw: &str) -> Result<f64, Error> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidAmount(raw.to_string()))
}
