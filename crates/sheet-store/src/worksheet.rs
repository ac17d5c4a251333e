use std::fs::OpenOptions;
use std::path::PathBuf;

use async_trait::async_trait;
use picker_core::{PersistOutcome, SinkError, SinkMode, TradeDecision, TradeSink};

use crate::rows::{decision_cells, HEADER};

/// CSV-file-backed worksheet: one file per worksheet name under a base
/// directory. No locking: a worksheet is exclusively owned by one run at a
/// time, and concurrent writers may interleave rows unpredictably.
pub struct CsvWorksheet {
    dir: PathBuf,
    name: String,
}

impl CsvWorksheet {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.csv", self.name))
    }

    /// Rows currently persisted, header included. 0 for a missing file.
    fn row_count(&self) -> Result<usize, SinkError> {
        let path = self.path();
        if !path.exists() {
            return Ok(0);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| SinkError::Csv(format!("{}: {e}", path.display())))?;

        let mut count = 0;
        for record in reader.records() {
            record.map_err(|e| SinkError::Csv(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }

    fn overwrite(&self, picks: &[TradeDecision], stamp: &str) -> Result<usize, SinkError> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path();
        let mut writer = csv::Writer::from_path(&path)
            .map_err(|e| SinkError::Csv(format!("{}: {e}", path.display())))?;

        writer
            .write_record(HEADER)
            .map_err(|e| SinkError::Csv(e.to_string()))?;
        for pick in picks {
            writer
                .write_record(decision_cells(pick, stamp))
                .map_err(|e| SinkError::Csv(e.to_string()))?;
        }
        writer.flush()?;
        Ok(picks.len())
    }

    fn append(&self, picks: &[TradeDecision], stamp: &str) -> Result<usize, SinkError> {
        let file = OpenOptions::new().append(true).open(self.path())?;
        let mut writer = csv::Writer::from_writer(file);

        for pick in picks {
            writer
                .write_record(decision_cells(pick, stamp))
                .map_err(|e| SinkError::Csv(e.to_string()))?;
        }
        writer.flush()?;
        Ok(picks.len())
    }

    /// Persisted rows, header excluded. Empty for a missing file.
    fn read_rows(&self) -> Result<Vec<Vec<String>>, SinkError> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| SinkError::Csv(format!("{}: {e}", path.display())))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| SinkError::Csv(e.to_string()))?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }
        Ok(rows)
    }
}

#[async_trait]
impl TradeSink for CsvWorksheet {
    async fn persist(
        &self,
        picks: &[TradeDecision],
        stamp: &str,
        mode: SinkMode,
    ) -> Result<PersistOutcome, SinkError> {
        match mode {
            SinkMode::Read => Ok(PersistOutcome {
                mode_applied: SinkMode::Read,
                rows_written: 0,
                rows: Some(self.read_rows()?),
            }),
            SinkMode::Overwrite => {
                let rows_written = self.overwrite(picks, stamp)?;
                tracing::info!(
                    "Overwrote worksheet {} with {rows_written} rows",
                    self.name
                );
                Ok(PersistOutcome {
                    mode_applied: SinkMode::Overwrite,
                    rows_written,
                    rows: None,
                })
            }
            SinkMode::Append => {
                // An empty or header-only worksheet gets a clean
                // header + rows layout instead of a headerless append.
                let existing = self.row_count()?;
                if existing < 2 {
                    let rows_written = self.overwrite(picks, stamp)?;
                    tracing::info!(
                        "Worksheet {} had {existing} rows; append resolved to overwrite ({rows_written} rows)",
                        self.name
                    );
                    return Ok(PersistOutcome {
                        mode_applied: SinkMode::Overwrite,
                        rows_written,
                        rows: None,
                    });
                }

                let rows_written = self.append(picks, stamp)?;
                tracing::info!(
                    "Appended {rows_written} rows to worksheet {} ({existing} existing)",
                    self.name
                );
                Ok(PersistOutcome {
                    mode_applied: SinkMode::Append,
                    rows_written,
                    rows: None,
                })
            }
        }
    }
}
