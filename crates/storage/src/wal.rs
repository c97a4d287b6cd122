// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL write-ahead log for state transitions, with group commit.
//!
//! Each entry is a single line of JSON: `{"seq":N,"event":{...}}\n`. Writes
//! are buffered and flushed together, either when a threshold of buffered
//! entries is reached or when an interval has elapsed since the last flush.

use crate::error::StateStoreError;
use crate::event::StateEvent;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;

const FLUSH_INTERVAL: Duration = Duration::from_millis(10);
const FLUSH_THRESHOLD: usize = 100;

#[derive(Serialize)]
struct WalRecordRef<'a> {
    seq: u64,
    event: &'a StateEvent,
}

#[derive(Deserialize)]
struct WalRecord {
    seq: u64,
    event: StateEvent,
}

/// A single WAL entry with its assigned sequence number.
#[derive(Debug, Clone)]
pub struct WalEntry {
    pub seq: u64,
    pub event: StateEvent,
}

/// Append-only log of [`StateEvent`]s, batched for durability.
pub struct Wal {
    file: File,
    path: PathBuf,
    write_seq: u64,
    write_buffer: Vec<Vec<u8>>,
    last_flush: Instant,
}

impl Wal {
    /// Open or create a WAL at `path`. `after_seq` is the snapshot's
    /// recorded sequence number (0 if no snapshot exists yet); entries at
    /// or below it are skipped by the caller during replay, not by `open`
    /// itself, so `Wal` stays ignorant of snapshot state.
    pub fn open(path: &Path) -> Result<Self, StateStoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        let (write_seq, corrupt_at) = Self::scan(&file)?;

        if let Some(offset) = corrupt_at {
            let valid_lines = Self::read_valid_lines(&file)?;
            drop(file);

            let bak_path = crate::snapshot::rotate_bak_path(path);
            warn!(
                path = %path.display(),
                bak = %bak_path.display(),
                offset,
                valid_entries = valid_lines.len(),
                "corrupt WAL detected, rotating to .bak and keeping valid entries",
            );
            std::fs::rename(path, &bak_path)?;

            let mut new_file = File::create(path)?;
            for line in &valid_lines {
                new_file.write_all(line.as_bytes())?;
                new_file.write_all(b"\n")?;
            }
            new_file.sync_all()?;

            file = OpenOptions::new()
                .create(true)
                .read(true)
                .append(true)
                .open(path)?;
        }

        let write_seq = if corrupt_at.is_some() {
            Self::scan(&file)?.0
        } else {
            write_seq
        };

        Ok(Self {
            file,
            path: path.to_owned(),
            write_seq,
            write_buffer: Vec::new(),
            last_flush: Instant::now(),
        })
    }

    /// Scan the WAL for the highest sequence number. Returns the offset of
    /// the first unparseable line, if any.
    fn scan(file: &File) -> Result<(u64, Option<u64>), StateStoreError> {
        let mut reader = BufReader::new(file.try_clone()?);
        reader.seek(SeekFrom::Start(0))?;

        let mut max_seq = 0u64;
        let mut offset = 0u64;
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = match reader.read_line(&mut line) {
                Ok(0) => return Ok((max_seq, None)),
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    return Ok((max_seq, Some(offset)))
                }
                Err(e) => return Err(e.into()),
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                offset += bytes_read as u64;
                continue;
            }

            match serde_json::from_str::<WalRecord>(trimmed) {
                Ok(record) => max_seq = max_seq.max(record.seq),
                Err(_) => return Ok((max_seq, Some(offset))),
            }
            offset += bytes_read as u64;
        }
    }

    fn read_valid_lines(file: &File) -> Result<Vec<String>, StateStoreError> {
        let mut reader = BufReader::new(file.try_clone()?);
        reader.seek(SeekFrom::Start(0))?;

        let mut valid = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => break,
                Err(e) => return Err(e.into()),
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if serde_json::from_str::<WalRecord>(trimmed).is_err() {
                break;
            }
            valid.push(trimmed.to_string());
        }
        Ok(valid)
    }

    /// Buffer an append; not durable until [`Wal::flush`].
    pub fn append(&mut self, event: StateEvent) -> Result<u64, StateStoreError> {
        self.write_seq += 1;
        let seq = self.write_seq;
        let record = WalRecordRef { seq, event: &event };
        let mut bytes = serde_json::to_vec(&record)?;
        bytes.push(b'\n');
        self.write_buffer.push(bytes);
        Ok(seq)
    }

    pub fn needs_flush(&self) -> bool {
        !self.write_buffer.is_empty()
            && (self.last_flush.elapsed() >= FLUSH_INTERVAL
                || self.write_buffer.len() >= FLUSH_THRESHOLD)
    }

    /// Flush all buffered entries with a single fsync.
    pub fn flush(&mut self) -> Result<(), StateStoreError> {
        if self.write_buffer.is_empty() {
            return Ok(());
        }
        for bytes in self.write_buffer.drain(..) {
            self.file.write_all(&bytes)?;
        }
        self.file.sync_all()?;
        self.last_flush = Instant::now();
        Ok(())
    }

    /// Replay every entry with `seq` greater than `after_seq`.
    pub fn entries_after(&self, after_seq: u64) -> Result<Vec<WalEntry>, StateStoreError> {
        let mut reader = BufReader::new(self.file.try_clone()?);
        reader.seek(SeekFrom::Start(0))?;

        let mut entries = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => break,
                Err(e) => return Err(e.into()),
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record: WalRecord = match serde_json::from_str(trimmed) {
                Ok(r) => r,
                Err(_) => break,
            };
            if record.seq > after_seq {
                entries.push(WalEntry {
                    seq: record.seq,
                    event: record.event,
                });
            }
        }
        Ok(entries)
    }

    /// Replace the WAL file with only entries at or after `seq`, after a
    /// snapshot has durably recorded everything before it.
    pub fn truncate_before(&mut self, seq: u64) -> Result<(), StateStoreError> {
        self.flush()?;
        let kept = self.entries_after(seq.saturating_sub(1))?;

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut tmp_file = File::create(&tmp_path)?;
            for entry in &kept {
                let record = WalRecordRef {
                    seq: entry.seq,
                    event: &entry.event,
                };
                let mut bytes = serde_json::to_vec(&record)?;
                bytes.push(b'\n');
                tmp_file.write_all(&bytes)?;
            }
            tmp_file.sync_all()?;
        }
        std::fs::rename(&tmp_path, &self.path)?;

        self.file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        Ok(())
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
