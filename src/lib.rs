//! Section Profiler - in-process, code-annotated timing of named sections
//!
//! Features:
//! - Start/end pairs around code regions, arbitrarily nested
//! - Cumulative and rolling batch-window statistics per section
//! - Percentage of an enclosing section's time
//! - Poll-driven periodic text reports through an injectable sink
//! - A no-op profiler to switch profiling off without touching call sites
//!
//! ```no_run
//! use section_profiler::{ConfigBuilder, Profiler, SimpleProfiler};
//!
//! # fn main() -> section_profiler::ProfilerResult<()> {
//! let config = ConfigBuilder::new()
//!     .enclosing_section("total")
//!     .reset_after_sample_count(500_000)
//!     .report_interval_secs(10)
//!     .build()?;
//! let mut profiler = SimpleProfiler::new(config)?;
//!
//! loop {
//!     profiler.start_section("total")?;
//!     let digest = profiler.measure("hashing", || 0xdead_beef_u64.rotate_left(7))?;
//!     profiler.end_section("total")?;
//!     profiler.periodic_report();
//!     # let _ = digest;
//!     # break;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod profiling;

pub use config::{ConfigBuilder, ProfilerConfig};
pub use error::{ErrorCode, ProfilerError, ProfilerResult};
pub use profiling::{
    select, Clock, ManualClock, NullProfiler, Printer, Profiler, SectionGuard, SectionStats,
    SimpleProfiler, SystemClock,
};

/// Install a `tracing` fmt subscriber filtered by `RUST_LOG`.
pub fn init() -> ProfilerResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .map_err(|e| ProfilerError::Configuration(e.to_string()))?;
    tracing::info!("Section profiler logging initialized");
    Ok(())
}

/// Get the current crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
