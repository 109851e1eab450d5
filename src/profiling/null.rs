use std::time::Duration;
use crate::error::ProfilerResult;
use super::Profiler;

/// A no-op profiler. Use it instead of `SimpleProfiler` to disable profiling
/// without touching call sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProfiler;

impl Profiler for NullProfiler {
    fn start_section(&mut self, _name: &str) -> ProfilerResult<()> {
        Ok(())
    }

    fn end_section(&mut self, _name: &str) -> ProfilerResult<()> {
        Ok(())
    }

    fn report(&mut self, _period: Duration) -> bool {
        false
    }

    fn periodic_report(&mut self) -> bool {
        false
    }

    fn print_results(&mut self) {}
}
