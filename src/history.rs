//! The history store: an append-only CSV log of every classified transaction.
//!
//! The file is the only persistent state of the app. Rows are appended and
//! never rewritten, and reports re-read the whole file every time.

use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    classifier::{FraudLabel, Transaction, classify, parse_amount_lenient},
    summary::{Summary, summarize},
};

/// The file name of the history store inside the data directory.
pub const HISTORY_FILE_NAME: &str = "history.csv";

/// The column order of the history file.
pub const HISTORY_HEADER: [&str; 5] = ["amount", "merchant", "method", "is_fraud", "source"];

/// Where a labeled record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// A row of an uploaded CSV file.
    Upload,
    /// A transaction entered by hand.
    Manual,
}

impl Source {
    /// Parse a `source` cell read back from the history file.
    ///
    /// Anything other than `manual` is treated as an upload.
    pub fn parse_lenient(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("manual") {
            Source::Manual
        } else {
            Source::Upload
        }
    }
}

/// A classified transaction, as stored in the history file.
///
/// The field order matches [HISTORY_HEADER].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledRecord {
    /// The amount of money that was paid.
    pub amount: f64,
    /// The name of the merchant that was paid.
    pub merchant: String,
    /// The payment method, as it was given.
    pub method: String,
    /// Whether the transaction was labeled as fraud.
    pub is_fraud: FraudLabel,
    /// Whether the transaction was uploaded or entered by hand.
    pub source: Source,
}

impl LabeledRecord {
    /// Classify `transaction` and attach the label and `source`.
    pub fn classify(transaction: Transaction, source: Source) -> Self {
        let is_fraud = classify(&transaction);

        Self {
            amount: transaction.amount,
            merchant: transaction.merchant,
            method: transaction.method,
            is_fraud,
            source,
        }
    }
}

/// The position of each history column in the header row.
///
/// Columns are looked up by name so a hand-edited file with reordered or
/// missing columns can still be read.
struct HistoryColumns {
    amount: Option<usize>,
    merchant: Option<usize>,
    method: Option<usize>,
    is_fraud: Option<usize>,
    source: Option<usize>,
}

impl HistoryColumns {
    fn from_headers(headers: &StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|header| header == name);

        Self {
            amount: position("amount"),
            merchant: position("merchant"),
            method: position("method"),
            is_fraud: position("is_fraud"),
            source: position("source"),
        }
    }

    fn read(&self, row: &StringRecord) -> LabeledRecord {
        let cell = |index: Option<usize>| index.and_then(|index| row.get(index)).unwrap_or("");

        LabeledRecord {
            amount: parse_amount_lenient(cell(self.amount)),
            merchant: cell(self.merchant).to_owned(),
            method: cell(self.method).to_owned(),
            is_fraud: FraudLabel::parse_lenient(cell(self.is_fraud)),
            source: Source::parse_lenient(cell(self.source)),
        }
    }
}

/// A handle to the history file.
///
/// Clones share the same write lock, so appends from concurrent requests in
/// this process never interleave. Other processes writing the same file are
/// not coordinated with.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl HistoryStore {
    /// Open the history file at `path`.
    ///
    /// If the file does not exist it is created with only the header row,
    /// along with any missing parent directories.
    ///
    /// # Errors
    /// Returns an [Error::Io] if the file or its directories cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();

        if !path.exists() {
            create_with_header(&path)?;
            tracing::info!("Created history file at {}", path.display());
        }

        Ok(Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// The location of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `records` to the end of the history file.
    ///
    /// Existing rows are never read or rewritten. If the file has been
    /// removed since the store was opened, it is recreated with a header.
    ///
    /// # Errors
    /// Returns an error if the lock is poisoned or the file cannot be written.
    pub fn append(&self, records: &[LabeledRecord]) -> Result<(), Error> {
        if records.is_empty() {
            return Ok(());
        }

        let _guard = self
            .write_lock
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire history lock: {error}"))
            .map_err(|_| Error::HistoryLockError)?;

        if !self.path.exists() {
            tracing::warn!(
                "History file {} went missing, recreating it",
                self.path.display()
            );
            create_with_header(&self.path)?;
        }

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;

        tracing::debug!(
            "Appended {} records to {}",
            records.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Read every record in the history file, oldest first.
    ///
    /// A missing or empty file yields no records.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read_all(&self) -> Result<Vec<LabeledRecord>, Error> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let columns = HistoryColumns::from_headers(reader.headers()?);

        reader
            .records()
            .map(|row| row.map(|row| columns.read(&row)).map_err(Error::from))
            .collect()
    }

    /// The last `count` records in the history file, oldest first.
    ///
    /// # Errors
    /// Returns an error if the history file cannot be read.
    pub fn recent(&self, count: usize) -> Result<Vec<LabeledRecord>, Error> {
        self.read_all()
            .map(|records| most_recent(&records, count).to_vec())
    }

    /// Re-read the history file and aggregate it.
    ///
    /// # Errors
    /// Returns an error if the history file cannot be read.
    pub fn summary(&self) -> Result<Summary, Error> {
        self.read_all().map(|records| summarize(&records))
    }
}

/// The last `count` of `records`, oldest first.
pub fn most_recent(records: &[LabeledRecord], count: usize) -> &[LabeledRecord] {
    &records[records.len().saturating_sub(count)..]
}

fn create_with_header(path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HISTORY_HEADER)?;
    writer.flush()?;

    Ok(())
}
