use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::runtime::RuntimeRow;

/// Tab-separated runtime table, one row per sample size.
pub struct RuntimeWriter {
    writer: BufWriter<File>,
    rows_written: usize,
}

impl RuntimeWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| {
                format!("Failed to create output file: {}", path.as_ref().display())
            })?;

        Ok(Self {
            writer: BufWriter::new(file),
            rows_written: 0,
        })
    }

    pub fn write_row(&mut self, row: &RuntimeRow) -> Result<()> {
        writeln!(
            self.writer,
            "{}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}",
            row.size,
            row.derivative_parallel,
            row.derivative_sequential,
            row.integral_parallel,
            row.integral_sequential,
        )?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush runtime table")
    }
}

pub fn create_progress_bar(total_sizes: usize) -> ProgressBar {
    let pb = ProgressBar::new(total_sizes as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sizes ({msg})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
