//! A progress bar for reading input files, built on `indicatif`, see <https://docs.rs/indicatif>

use std::io::Read;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

/// Wraps a reader and advances a progress bar by every byte read through it.
///
/// The bar clears itself once `total` bytes have been read.
pub struct ProgressMonitor<R: Read> {
    /// Expected size of the input
    pub total: u64,
    /// Amount read so far
    pub read: u64,
    reader: R,
    progress_bar: ProgressBar,
}

impl<R: Read> ProgressMonitor<R> {
    pub fn new(reader: R, total: u64, label: &str) -> Self {
        // https://docs.rs/indicatif/latest/indicatif/index.html#templates
        let style = ProgressStyle::with_template(
            "{msg} {wide_bar} {binary_bytes}/{binary_total_bytes}  \n[est. {eta} remaining]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        let progress_bar = ProgressBar::new(total).with_style(style);
        progress_bar.set_message(label.to_string());
        // The default is 20hz, this reduces rendering overhead
        progress_bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(8));
        Self {
            total,
            read: 0,
            reader,
            progress_bar,
        }
    }

    fn update(&mut self, delta: u64) {
        self.progress_bar.inc(delta);
        if self.read >= self.total && !self.progress_bar.is_finished() {
            self.progress_bar.finish_and_clear();
            let elapsed = self.progress_bar.elapsed();
            debug!(
                "read {} in {} ({}/s avg)",
                fmt_size(self.read),
                fmt_duration(elapsed),
                fmt_size(throughput(self.read, elapsed))
            );
        }
    }
}

impl<R: Read> Read for ProgressMonitor<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let out = self.reader.read(buf)?;
        self.read += out as u64;
        self.update(out as u64);
        Ok(out)
    }
}

/// Bytes per second, zero if no measurable time passed
fn throughput(bytes: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        (bytes as f64 / secs) as u64
    } else {
        0
    }
}

/// Converts a quantity in bytes to a human readable size, "GiB, MiB, KiB, etc"
pub fn fmt_size(size_in_bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    let mut unit_index = 0;
    let mut value = size_in_bytes as f64;
    while value >= 1024.0 && unit_index < UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }
    // Only use a decimal if displaying a unit larger than a byte
    if unit_index > 0 {
        format!("{:.2}{}", value, UNITS[unit_index])
    } else {
        format!("{}{}", size_in_bytes, UNITS[0])
    }
}

/// Converts a [`Duration`] to a human readable format
pub fn fmt_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let secs = duration.as_secs_f64() % 60.0;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    // precision shrinks as the duration grows
    if total_secs >= 60 {
        if secs >= 1.0 {
            parts.push(format!("{:.0}s", secs.floor()));
        }
    } else if secs > 4.0 {
        parts.push(format!("{secs:.1}s"));
    } else if secs >= 1.0 {
        parts.push(format!("{secs:.2}s"));
    } else if secs > 0.0 {
        parts.push(format!("{:.2}ms", secs * 1000.0));
    }

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}
