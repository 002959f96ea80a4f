//! Parsing of uploaded transaction CSV files.

use csv::{ReaderBuilder, StringRecord};

use crate::{Error, classifier::Transaction};

/// The columns an upload must have, in the order they are checked.
pub(super) const REQUIRED_COLUMNS: [&str; 3] = ["amount", "merchant", "method"];

/// Parses the transactions in an uploaded CSV file.
///
/// Expects `text` to start with a header row naming at least the
/// [REQUIRED_COLUMNS], in any order. Extra columns are ignored. Rows shorter
/// than the header are padded with empty cells, and amounts that are not
/// numbers are read as zero.
///
/// Returns `Error::InvalidCSV` if the text has no header or a row has more
/// fields than the header, and `Error::MissingColumn` naming the first
/// required column that is not in the header.
pub(super) fn parse_transactions_csv(text: &str) -> Result<Vec<Transaction>, Error> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidCSV(error.to_string()))?
        .clone();

    if headers.iter().all(str::is_empty) {
        return Err(Error::InvalidCSV("No columns to parse from file".to_owned()));
    }

    let [amount, merchant, method] = column_positions(&headers)?;
    let mut transactions = Vec::new();

    for row in reader.records() {
        let row = row.map_err(|error| Error::InvalidCSV(error.to_string()))?;

        if row.len() > headers.len() {
            let line = row.position().map(|position| position.line()).unwrap_or(0);
            return Err(Error::InvalidCSV(format!(
                "Expected {} fields in line {line}, saw {}",
                headers.len(),
                row.len()
            )));
        }

        let cell = |index: usize| row.get(index).unwrap_or("");
        transactions.push(Transaction::from_raw(
            cell(amount),
            cell(merchant),
            cell(method),
        ));
    }

    tracing::debug!("Parsed {} transactions from upload", transactions.len());

    Ok(transactions)
}

/// Find the index of each of the [REQUIRED_COLUMNS] in `headers`.
fn column_positions(headers: &StringRecord) -> Result<[usize; 3], Error> {
    let mut positions = [0; 3];

    for (position, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *position = headers
            .iter()
            .position(|header| header == column)
            .ok_or(Error::MissingColumn(column))?;
    }

    Ok(positions)
}
