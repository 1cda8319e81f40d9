//! Where finished sessions go: the result recorder boundary and its
//! SQLite-backed history.

use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::engine::{EngineEvent, SessionSummary};
use crate::error::Result;
use crate::session::Mode;

/// Number of results kept; older rows are pruned on insert.
pub const HISTORY_LIMIT: usize = 100;

/// Receives each finished session's summary exactly once.
pub trait ResultRecorder {
    fn record(&mut self, summary: &SessionSummary) -> Result<()>;
}

/// Hands every `Finished` event in `events` to `recorder`.
///
/// Returns the number of summaries recorded.
pub fn record_finished(events: &[EngineEvent], recorder: &mut dyn ResultRecorder) -> Result<usize> {
    let mut recorded = 0;
    for event in events {
        if let EngineEvent::Finished(summary) = event {
            recorder.record(summary)?;
            recorded += 1;
        }
    }
    Ok(recorded)
}

/// Keeps summaries in memory; used headless and in tests.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    pub summaries: Vec<SessionSummary>,
}

impl ResultRecorder for MemoryRecorder {
    fn record(&mut self, summary: &SessionSummary) -> Result<()> {
        self.summaries.push(summary.clone());
        if self.summaries.len() > HISTORY_LIMIT {
            let excess = self.summaries.len() - HISTORY_LIMIT;
            self.summaries.drain(..excess);
        }
        Ok(())
    }
}

/// Aggregates shown on the account page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UserStats {
    pub average_wpm: f64,
    pub best_wpm: f64,
    pub average_accuracy: f64,
    pub total_tests: usize,
}

impl UserStats {
    pub fn from_history(history: &[SessionSummary]) -> Self {
        if history.is_empty() {
            return Self::default();
        }
        let n = history.len() as f64;

        Self {
            average_wpm: (history.iter().map(|s| s.wpm).sum::<f64>() / n).round(),
            best_wpm: history.iter().map(|s| s.wpm).fold(0.0, f64::max),
            average_accuracy: (history.iter().map(|s| s.accuracy).sum::<f64>() / n).round(),
            total_tests: history.len(),
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    mode: &'a str,
    target_value: u32,
    duration_secs: String,
    wpm: f64,
    raw_wpm: f64,
    accuracy: f64,
    consistency: f64,
    errors: usize,
}

/// Result history and mission progress in SQLite.
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Opens (creating if needed) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                wpm REAL NOT NULL,
                raw_wpm REAL NOT NULL,
                accuracy REAL NOT NULL,
                consistency REAL NOT NULL,
                mode TEXT NOT NULL,
                target_value INTEGER NOT NULL,
                duration_secs REAL NOT NULL,
                error_count INTEGER NOT NULL,
                finished_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS completed_missions (mission_id INTEGER PRIMARY KEY)",
            [],
        )?;

        Ok(Self { conn })
    }

    /// Most recent results, oldest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT wpm, raw_wpm, accuracy, consistency, mode, target_value,
                   duration_secs, error_count, finished_at
            FROM results
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let mode_str: String = row.get(4)?;
            let mode = mode_str.parse::<Mode>().map_err(|_| {
                rusqlite::Error::InvalidColumnType(4, "mode".to_string(), rusqlite::types::Type::Text)
            })?;
            let finished_str: String = row.get(8)?;
            let finished_at = DateTime::parse_from_rfc3339(&finished_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        8,
                        "finished_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(SessionSummary {
                wpm: row.get(0)?,
                raw_wpm: row.get(1)?,
                accuracy: row.get(2)?,
                consistency: row.get(3)?,
                mode,
                target_value: row.get(5)?,
                duration_secs: row.get(6)?,
                error_count: row.get::<_, i64>(7)? as usize,
                finished_at,
            })
        })?;

        let mut summaries = Vec::new();
        for summary in rows {
            summaries.push(summary?);
        }
        summaries.reverse();

        Ok(summaries)
    }

    pub fn all(&self) -> Result<Vec<SessionSummary>> {
        self.recent(HISTORY_LIMIT)
    }

    pub fn user_stats(&self) -> Result<UserStats> {
        Ok(UserStats::from_history(&self.all()?))
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM results", [])?;
        self.conn.execute("DELETE FROM completed_missions", [])?;
        Ok(())
    }

    pub fn mark_mission_completed(&self, mission_id: u32) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO completed_missions (mission_id) VALUES (?1)",
            params![mission_id],
        )?;
        Ok(())
    }

    pub fn completed_missions(&self) -> Result<Vec<u32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT mission_id FROM completed_missions ORDER BY mission_id")?;
        let ids = stmt.query_map([], |row| row.get(0))?;

        let mut completed = Vec::new();
        for id in ids {
            completed.push(id?);
        }
        Ok(completed)
    }

    /// Writes the stored history as CSV with a header row.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for summary in self.all()? {
            let mode = summary.mode.to_string();
            csv_writer.serialize(CsvRow {
                date: summary.finished_at.format("%c").to_string(),
                mode: &mode,
                target_value: summary.target_value,
                duration_secs: format!("{:.2}", summary.duration_secs),
                wpm: summary.wpm,
                raw_wpm: summary.raw_wpm,
                accuracy: summary.accuracy,
                consistency: summary.consistency,
                errors: summary.error_count,
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl ResultRecorder for HistoryDb {
    fn record(&mut self, summary: &SessionSummary) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO results
            (wpm, raw_wpm, accuracy, consistency, mode, target_value, duration_secs, error_count, finished_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                summary.wpm,
                summary.raw_wpm,
                summary.accuracy,
                summary.consistency,
                summary.mode.to_string(),
                summary.target_value,
                summary.duration_secs,
                summary.error_count as i64,
                summary.finished_at.to_rfc3339(),
            ],
        )?;

        let pruned = tx.execute(
            "DELETE FROM results WHERE id NOT IN (SELECT id FROM results ORDER BY id DESC LIMIT ?1)",
            params![HISTORY_LIMIT as i64],
        )?;
        tx.commit()?;

        if pruned > 0 {
            debug!(pruned, "history limit reached, dropped oldest results");
        }
        info!(wpm = summary.wpm, accuracy = summary.accuracy, mode = %summary.mode, "result recorded");
        Ok(())
    }
}
