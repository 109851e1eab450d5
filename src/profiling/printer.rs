//! Output sinks for rendered reports

use std::fmt;
use std::io::Write;
use std::sync::Arc;
use parking_lot::Mutex;

/// Reports captured by [`Printer::capture`], oldest first.
pub type CapturedReports = Arc<Mutex<Vec<String>>>;

/// Receives each rendered report and disposes of it.
pub struct Printer {
    sink: Box<dyn FnMut(&str) + Send>,
}

impl Printer {
    pub fn from_fn(sink: impl FnMut(&str) + Send + 'static) -> Self {
        Self { sink: Box::new(sink) }
    }

    /// Writes to standard output followed by a newline.
    pub fn stdout() -> Self {
        Self::from_fn(|text| {
            let mut out = std::io::stdout().lock();
            let _ = writeln!(out, "{}", text);
        })
    }

    pub fn stderr() -> Self {
        Self::from_fn(|text| {
            let mut err = std::io::stderr().lock();
            let _ = writeln!(err, "{}", text);
        })
    }

    /// Emits each report as an `info` event on the `section_profiler::report` target.
    pub fn tracing() -> Self {
        Self::from_fn(|text| {
            tracing::info!(target: "section_profiler::report", "\n{}", text);
        })
    }

    pub fn capture() -> (Self, CapturedReports) {
        let reports: CapturedReports = Arc::new(Mutex::new(Vec::new()));
        let handle = reports.clone();
        let printer = Self::from_fn(move |text| handle.lock().push(text.to_string()));
        (printer, reports)
    }

    pub fn print(&mut self, text: &str) {
        (self.sink)(text)
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Printer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Printer").finish_non_exhaustive()
    }
}
