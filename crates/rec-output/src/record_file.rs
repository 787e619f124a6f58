//! One open, buffered, tab-separated output file.
//!
//! # Format
//!
//! ```text
//! # sender<TAB>time(step)<TAB>offset<TAB>V_m ...      stepped devices
//! # sender<TAB>time(ms)<TAB>V_m ...                   continuous devices
//! 3<TAB>100<TAB>0.000<TAB>-70.000 ...
//! ```
//!
//! Floating-point fields are fixed-point with the precision captured when the
//! file was opened.  Integers are written as-is.

use std::fmt::{self, Write as _};
use std::fs::File;
use std::io;
use std::path::Path;

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use rec_core::{Event, TimeMode};

/// Buffered writer for one device's file.
///
/// A failed row write or flush is latched, like a stream's error state: every
/// later row is dropped and the error is reported once.  Row errors are handed
/// out by [`take_error`][Self::take_error], flush errors by the failing
/// [`flush`][Self::flush] call itself.
pub struct RecordFile<W: io::Write = File> {
    writer:    Writer<W>,
    precision: usize,
    /// Scratch buffer for formatting one field; reused across rows.
    field:     String,
    failed:    bool,
    error:     Option<csv::Error>,
}

impl RecordFile {
    /// Create or truncate `path`.
    pub fn create(path: &Path, precision: u32) -> io::Result<Self> {
        Ok(Self::from_writer(File::create(path)?, precision))
    }
}

impl<W: io::Write> RecordFile<W> {
    /// Wrap an already open sink.
    pub fn from_writer(sink: W, precision: u32) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .flexible(true)
            .from_writer(sink);
        Self {
            writer,
            precision: precision as usize,
            field:     String::new(),
            failed:    false,
            error:     None,
        }
    }

    /// Write the column header and push it through to the file.
    pub fn write_header(
        &mut self,
        mode:         TimeMode,
        double_names: &[&str],
        long_names:   &[&str],
    ) -> csv::Result<()> {
        let time_cols: &[&str] = match mode {
            TimeMode::Stepped    => &["time(step)", "offset"],
            TimeMode::Continuous => &["time(ms)"],
        };
        let header = std::iter::once("# sender")
            .chain(time_cols.iter().copied())
            .chain(double_names.iter().copied())
            .chain(long_names.iter().copied());
        self.writer.write_record(header)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Append one data row.  Errors are latched, never returned.
    pub fn write_row(
        &mut self,
        event:         &Event,
        mode:          TimeMode,
        double_values: &[f64],
        long_values:   &[i64],
    ) {
        if self.failed {
            return;
        }
        if let Err(e) = self.try_write_row(event, mode, double_values, long_values) {
            self.failed = true;
            self.error = Some(e);
        }
    }

    fn try_write_row(
        &mut self,
        event:         &Event,
        mode:          TimeMode,
        double_values: &[f64],
        long_values:   &[i64],
    ) -> csv::Result<()> {
        self.push_display(event.sender)?;
        match mode {
            TimeMode::Stepped => {
                self.push_display(event.stamp.steps())?;
                self.push_float(event.offset)?;
            }
            TimeMode::Continuous => {
                self.push_float(event.stamp.ms() - event.offset)?;
            }
        }
        for &v in double_values {
            self.push_float(v)?;
        }
        for &v in long_values {
            self.push_display(v)?;
        }
        // Empty record ends the row started by the write_field calls.
        self.writer.write_record(None::<&[u8]>)
    }

    fn push_float(&mut self, v: f64) -> csv::Result<()> {
        self.field.clear();
        // Formatting into a String cannot fail.
        let _ = write!(self.field, "{v:.prec$}", prec = self.precision);
        self.writer.write_field(&self.field)
    }

    fn push_display(&mut self, v: impl fmt::Display) -> csv::Result<()> {
        self.field.clear();
        let _ = write!(self.field, "{v}");
        self.writer.write_field(&self.field)
    }

    /// Hand out the latched row error, if any.  The file stays failed.
    pub fn take_error(&mut self) -> Option<csv::Error> {
        self.error.take()
    }

    /// Push buffered rows to the OS.  A no-op once the file has failed; a
    /// failing flush latches the file.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.failed {
            return Ok(());
        }
        let result = self.writer.flush();
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    /// Whether a row write or flush has failed on this file.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Flush and release the file handle.
    pub fn close(self) -> io::Result<()> {
        let sink = self.writer.into_inner().map_err(|e| e.into_error())?;
        drop(sink);
        Ok(())
    }
}
