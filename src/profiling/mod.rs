//! Section timing, statistics and reporting

pub mod clock;
pub mod format;
pub mod guard;
pub mod null;
pub mod printer;
pub mod profiler;
pub mod report;
pub mod stats;

pub use clock::*;
pub use guard::*;
pub use null::*;
pub use printer::*;
pub use profiler::*;
pub use report::*;
pub use stats::*;

use std::time::Duration;
use crate::error::ProfilerResult;

/// Operations shared by the real profiler and the no-op one, so call sites
/// stay the same whether profiling is on or off.
pub trait Profiler {
    /// Start measuring a section. Fails if `name` is blank or the section is
    /// already running.
    fn start_section(&mut self, name: &str) -> ProfilerResult<()>;

    /// End measuring a section.
    ///
    /// An empty `name` ends the innermost section that is still open.
    fn end_section(&mut self, name: &str) -> ProfilerResult<()>;

    /// Emit a report if at least `period` has passed since the last one.
    /// Returns whether a report was emitted.
    fn report(&mut self, period: Duration) -> bool;

    /// [`Profiler::report`] using the configured interval.
    fn periodic_report(&mut self) -> bool;

    /// Emit a report now, without touching the periodic gate.
    fn print_results(&mut self);

    /// Ends the innermost open section.
    fn end_current(&mut self) -> ProfilerResult<()> {
        self.end_section("")
    }

    /// Runs `f` inside section `name`.
    fn measure<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> ProfilerResult<T>
    where
        Self: Sized,
    {
        self.start_section(name)?;
        let value = f();
        self.end_section(name)?;
        Ok(value)
    }

    /// Starts `name` and ends it when the returned guard is dropped.
    fn section(&mut self, name: &str) -> ProfilerResult<SectionGuard<'_, Self>>
    where
        Self: Sized,
    {
        SectionGuard::new(self, name)
    }
}

impl<P: Profiler + ?Sized> Profiler for Box<P> {
    fn start_section(&mut self, name: &str) -> ProfilerResult<()> {
        (**self).start_section(name)
    }

    fn end_section(&mut self, name: &str) -> ProfilerResult<()> {
        (**self).end_section(name)
    }

    fn report(&mut self, period: Duration) -> bool {
        (**self).report(period)
    }

    fn periodic_report(&mut self) -> bool {
        (**self).periodic_report()
    }

    fn print_results(&mut self) {
        (**self).print_results()
    }
}

/// Picks the real or the no-op profiler once, at construction.
pub fn select(enabled: bool, config: crate::config::ProfilerConfig) -> ProfilerResult<Box<dyn Profiler + Send>> {
    if enabled {
        Ok(Box::new(SimpleProfiler::new(config)?))
    } else {
        Ok(Box::new(NullProfiler))
    }
}
