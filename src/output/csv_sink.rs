//! CSV sink: one UTF-8 row per listing behind a byte-order mark

use crate::model::{House, HEADER};
use crate::output::RecordSink;
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// UTF-8 byte-order mark, so spreadsheet tools pick the right encoding
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

struct SinkState<W: Write> {
    writer: csv::Writer<W>,
    next_id: u64,
}

/// Single-writer CSV sink
///
/// The header is written on creation. Every `emit` assigns the next
/// sequential id and writes the row while holding the lock, so ids follow
/// file order and rows never interleave.
pub struct CsvSink<W: Write> {
    state: Mutex<SinkState<W>>,
}

impl CsvSink<File> {
    /// Creates (or truncates) the CSV file, creating parent directories
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or the header cannot be written.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        tracing::info!("Writing records to {}", path.display());
        Self::new(file)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps a writer, emitting the BOM and the header row
    pub fn new(mut inner: W) -> Result<Self> {
        inner.write_all(UTF8_BOM)?;

        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(HEADER)?;
        writer.flush()?;

        Ok(Self {
            state: Mutex::new(SinkState { writer, next_id: 0 }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, SinkState<W>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn emit(&self, mut house: House) -> Result<u64> {
        let mut state = self.lock();
        let id = state.next_id;
        house.id = id;
        state.writer.write_record(house.to_row())?;
        state.next_id += 1;
        Ok(id)
    }

    fn flush(&self) -> Result<()> {
        self.lock().writer.flush()?;
        Ok(())
    }
}
