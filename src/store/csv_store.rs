use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{Record, StoreError};

/// Read policy for malformed rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadMode {
    /// Skip and log.
    BestEffort,
    /// Fail the whole read.
    Strict,
}

/// CSV-backed storage for one entity set.
///
/// A store is owned by exactly one actor, which makes it the only writer of its
/// file. Read-only consumers (reports) may open their own store over the same file;
/// full rewrites go through a rename so they never observe a half-written file.
#[derive(Debug, Clone)]
pub struct RecordStore<T: Record> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> RecordStore<T> {
    /// Store for `T` inside `data_dir` (`<data_dir>/<entity_set>.csv`).
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.csv", T::ENTITY_SET)),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with a header row when it does not exist yet.
    pub fn ensure_file(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        debug!(entity_set = T::ENTITY_SET, path = %self.path.display(), "Creating entity-set file");
        self.write_all(&[])
    }

    /// Loads every record, skipping (and logging) rows that fail to parse.
    ///
    /// A missing file is an empty set. I/O failures and a header without the
    /// declared columns are errors.
    pub fn read_all(&self) -> Result<Vec<T>, StoreError> {
        self.read(ReadMode::BestEffort)
    }

    /// Loads every record, failing on the first malformed row.
    ///
    /// Used before a full rewrite so rows that could not be parsed are never
    /// silently dropped from the file.
    pub fn read_all_strict(&self) -> Result<Vec<T>, StoreError> {
        self.read(ReadMode::Strict)
    }

    /// Replaces the file contents with `records` (header included).
    pub fn write_all(&self, records: &[T]) -> Result<(), StoreError> {
        self.ensure_parent()?;
        let staging = self.staging_path();
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&staging)?;
            writer.write_record(T::HEADERS)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        fs::rename(&staging, &self.path)?;
        debug!(entity_set = T::ENTITY_SET, rows = records.len(), "Entity set rewritten");
        Ok(())
    }

    /// Adds one record at the end of the file without reading the set.
    ///
    /// Rows are written in `T::HEADERS` order. When the existing header uses another
    /// column layout the set is rewritten instead, so the new row lands under the
    /// right columns.
    pub fn append(&self, record: &T) -> Result<(), StoreError> {
        self.ensure_parent()?;
        let len = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };
        if len > 0 && !self.header_in_order()? {
            warn!(entity_set = T::ENTITY_SET, "Column order differs, rewriting entity set");
            let mut records = self.read_all_strict()?;
            records.push(record.clone());
            return self.write_all(&records);
        }
        let needs_newline = len > 0 && !ends_with_newline(&self.path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if needs_newline {
            file.write_all(b"\n")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if len == 0 {
            writer.write_record(T::HEADERS)?;
        }
        writer.serialize(record)?;
        writer.flush()?;
        debug!(entity_set = T::ENTITY_SET, "Record appended");
        Ok(())
    }

    /// Whether the file's header lists exactly `T::HEADERS`, in that order.
    fn header_in_order(&self) -> Result<bool, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;
        let headers = reader.headers()?;
        Ok(headers.iter().eq(T::HEADERS.iter().copied()))
    }

    fn read(&self, mode: ReadMode) -> Result<Vec<T>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        let missing: Vec<&str> = T::HEADERS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(StoreError::Schema {
                entity_set: T::ENTITY_SET,
                missing: missing.join(", "),
            });
        }

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<T>().enumerate() {
            match row {
                Ok(record) => records.push(record),
                Err(e) => {
                    // header is line 1
                    let line = e
                        .position()
                        .map(|pos| pos.line())
                        .unwrap_or(index as u64 + 2);
                    if mode == ReadMode::Strict {
                        return Err(StoreError::Malformed {
                            entity_set: T::ENTITY_SET,
                            line,
                            reason: e.to_string(),
                        });
                    }
                    warn!(entity_set = T::ENTITY_SET, line, error = %e, "Skipping malformed row");
                }
            }
        }
        Ok(records)
    }

    fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn ends_with_newline(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
