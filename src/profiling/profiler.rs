use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Duration;
use crate::config::ProfilerConfig;
use crate::error::{ProfilerError, ProfilerResult};
use super::clock::{Clock, SystemClock};
use super::printer::Printer;
use super::report::render_report;
use super::stats::SectionStats;
use super::Profiler;

/// Accumulates per-section timings and emits periodic text reports.
///
/// Not thread safe: one instance is driven by one thread. Give each thread
/// its own profiler when several need to record timings.
#[derive(Debug)]
pub struct SimpleProfiler<C: Clock = SystemClock> {
    config: ProfilerConfig,
    clock: C,
    printer: Printer,
    sections: HashMap<String, SectionStats>,
    /// Names of running sections, innermost last.
    open_sections: Vec<String>,
    last_started_section: String,
    last_report_time_millis: u64,
}

impl SimpleProfiler<SystemClock> {
    /// Profiler that prints its reports to stdout.
    pub fn new(config: ProfilerConfig) -> ProfilerResult<Self> {
        Self::with_printer(config, Printer::stdout())
    }

    /// Profiler that hands its reports to `printer`.
    pub fn with_printer(config: ProfilerConfig, printer: Printer) -> ProfilerResult<Self> {
        Self::with_clock(config, printer, SystemClock::new())
    }
}

impl<C: Clock> SimpleProfiler<C> {
    /// Profiler reading time from `clock`, for tests and custom time sources.
    pub fn with_clock(config: ProfilerConfig, printer: Printer, clock: C) -> ProfilerResult<Self> {
        config.validate()?;
        let last_report_time_millis = clock.now_millis();
        Ok(Self {
            config,
            clock,
            printer,
            sections: HashMap::new(),
            open_sections: Vec::new(),
            last_started_section: String::new(),
            last_report_time_millis,
        })
    }

    /// Configuration the profiler was built with.
    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Statistics recorded for `name`, if it was ever started.
    pub fn stats(&self, name: &str) -> Option<&SectionStats> {
        self.sections.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &SectionStats> {
        self.sections.values()
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.sections.get(name).map_or(false, SectionStats::is_running)
    }

    /// Name passed to the most recent `start_section`, whether or not it is
    /// still running.
    pub fn last_started_section(&self) -> Option<&str> {
        if self.last_started_section.is_empty() {
            None
        } else {
            Some(&self.last_started_section)
        }
    }

    pub fn open_sections(&self) -> &[String] {
        &self.open_sections
    }

    pub fn last_report_time_millis(&self) -> u64 {
        self.last_report_time_millis
    }

    /// Formats the current statistics without emitting them.
    pub fn render_report(&self) -> String {
        render_report(
            &self.sections,
            self.config.enclosing_section(),
            self.config.batch_rates_enabled(),
        )
    }

    /// Drops all statistics and running sections.
    pub fn reset(&mut self) {
        tracing::debug!(sections = self.sections.len(), "profiler reset");
        self.sections.clear();
        self.open_sections.clear();
        self.last_started_section.clear();
    }

    fn resolve_end_name<'a>(&self, name: &'a str) -> ProfilerResult<Cow<'a, str>> {
        if !name.is_empty() {
            return Ok(Cow::Borrowed(name));
        }
        self.open_sections
            .last()
            .map(|open| Cow::Owned(open.clone()))
            .ok_or_else(|| ProfilerError::invalid_argument("no section name given and no section is open"))
    }
}

impl<C: Clock> Profiler for SimpleProfiler<C> {
    fn start_section(&mut self, name: &str) -> ProfilerResult<()> {
        if name.trim().is_empty() {
            return Err(ProfilerError::invalid_argument("section name is blank"));
        }
        self.last_started_section.clear();
        self.last_started_section.push_str(name);

        if !self.sections.contains_key(name) {
            let nesting = if self.config.track_nesting { self.open_sections.len() } else { 0 };
            tracing::debug!(section = name, nesting, "new section");
            self.sections.insert(name.to_string(), SectionStats::new(name, nesting));
        }
        let section = self
            .sections
            .get_mut(name)
            .ok_or_else(|| ProfilerError::unknown_section(name))?;

        if section.is_running() {
            return Err(ProfilerError::already_started(name));
        }

        self.open_sections.push(name.to_string());
        section.start_time_nanos = Some(self.clock.now_nanos());
        tracing::trace!(section = name, "section started");
        Ok(())
    }

    fn end_section(&mut self, name: &str) -> ProfilerResult<()> {
        let now_nanos = self.clock.now_nanos();
        let name = self.resolve_end_name(name)?;

        let section = self
            .sections
            .get_mut(name.as_ref())
            .ok_or_else(|| ProfilerError::unknown_section(&name))?;

        let start_time_nanos = section
            .start_time_nanos
            .ok_or_else(|| ProfilerError::not_started(&name))?;

        let elapsed_nanos = now_nanos.saturating_sub(start_time_nanos);
        section.record(elapsed_nanos, self.config.reset_after_sample_count);

        if let Some(position) = self.open_sections.iter().rposition(|open| *open == *name) {
            self.open_sections.remove(position);
        }
        tracing::trace!(section = %name, elapsed_nanos, "section ended");
        Ok(())
    }

    fn report(&mut self, period: Duration) -> bool {
        let now_millis = self.clock.now_millis();
        let period_millis = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        if now_millis.saturating_sub(self.last_report_time_millis) < period_millis {
            return false;
        }

        self.print_results();
        self.last_report_time_millis = self.clock.now_millis();
        tracing::info!(sections = self.sections.len(), "profiler report emitted");
        true
    }

    fn periodic_report(&mut self) -> bool {
        let interval = self.config.report_interval();
        self.report(interval)
    }

    fn print_results(&mut self) {
        let text = self.render_report();
        self.printer.print(&text);
    }
}

impl Default for SimpleProfiler<SystemClock> {
    fn default() -> Self {
        let clock = SystemClock::new();
        let last_report_time_millis = clock.now_millis();
        Self {
            config: ProfilerConfig::default(),
            clock,
            printer: Printer::stdout(),
            sections: HashMap::new(),
            open_sections: Vec::new(),
            last_started_section: String::new(),
            last_report_time_millis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::profiling::clock::ManualClock;
    use crate::profiling::printer::CapturedReports;

    fn profiler_with(config: ProfilerConfig) -> (SimpleProfiler<ManualClock>, ManualClock, CapturedReports) {
        let clock = ManualClock::new();
        let (printer, reports) = Printer::capture();
        let profiler = SimpleProfiler::with_clock(config, printer, clock.clone()).unwrap();
        (profiler, clock, reports)
    }

    fn profiler() -> (SimpleProfiler<ManualClock>, ManualClock, CapturedReports) {
        profiler_with(ProfilerConfig::default())
    }

    fn timed(profiler: &mut SimpleProfiler<ManualClock>, clock: &ManualClock, name: &str, millis: u64) {
        profiler.start_section(name).unwrap();
        clock.advance(Duration::from_millis(millis));
        profiler.end_section(name).unwrap();
    }

    #[test]
    fn test_sample_count_matches_completed_pairs() {
        let (mut profiler, clock, _) = profiler();
        for _ in 0..7 {
            timed(&mut profiler, &clock, "hashing", 1);
        }
        timed(&mut profiler, &clock, "sqrt", 1);

        assert_eq!(profiler.stats("hashing").unwrap().sample_count, 7);
        assert_eq!(profiler.stats("sqrt").unwrap().sample_count, 1);
    }

    #[test]
    fn test_total_time_is_sum_of_deltas() {
        let (mut profiler, clock, _) = profiler();
        timed(&mut profiler, &clock, "io", 3);
        timed(&mut profiler, &clock, "io", 4);
        clock.advance(Duration::from_millis(100));
        timed(&mut profiler, &clock, "io", 5);

        assert_eq!(profiler.stats("io").unwrap().total_time_nanos, 12_000_000);
    }

    #[test]
    fn test_batch_window_scenario() {
        let config = ConfigBuilder::new().reset_after_sample_count(2).build().unwrap();
        let (mut profiler, clock, _) = profiler_with(config);
        timed(&mut profiler, &clock, "x", 10);
        timed(&mut profiler, &clock, "x", 20);
        timed(&mut profiler, &clock, "x", 30);

        let stats = profiler.stats("x").unwrap();
        assert_eq!(stats.sample_count, 3);
        assert_eq!(stats.total_time_nanos, 60_000_000);
        assert_eq!(stats.batch_sample_count, 1);
        assert_eq!(stats.batch_total_time_nanos, 30_000_000);
    }

    #[test]
    fn test_start_twice_fails() {
        let (mut profiler, _, _) = profiler();
        profiler.start_section("x").unwrap();
        assert_eq!(profiler.start_section("x"), Err(ProfilerError::already_started("x")));
        // the original measurement is still running
        assert!(profiler.is_running("x"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let (mut profiler, _, _) = profiler();
        assert!(matches!(profiler.start_section(""), Err(ProfilerError::InvalidArgument(_))));
        assert!(matches!(profiler.start_section(" \t"), Err(ProfilerError::InvalidArgument(_))));
        assert_eq!(profiler.sections().count(), 0);
    }

    #[test]
    fn test_end_unknown_section() {
        let (mut profiler, _, _) = profiler();
        assert_eq!(profiler.end_section("never"), Err(ProfilerError::unknown_section("never")));
    }

    #[test]
    fn test_end_twice_fails() {
        let (mut profiler, clock, _) = profiler();
        timed(&mut profiler, &clock, "x", 1);
        assert_eq!(profiler.end_section("x"), Err(ProfilerError::not_started("x")));
        assert_eq!(profiler.stats("x").unwrap().sample_count, 1);
    }

    #[test]
    fn test_unnamed_end_without_open_section() {
        let (mut profiler, clock, _) = profiler();
        assert!(matches!(profiler.end_current(), Err(ProfilerError::InvalidArgument(_))));

        timed(&mut profiler, &clock, "x", 1);
        assert!(matches!(profiler.end_current(), Err(ProfilerError::InvalidArgument(_))));
    }

    #[test]
    fn test_unnamed_end_closes_innermost_open_section() {
        let (mut profiler, clock, _) = profiler();
        profiler.start_section("outer").unwrap();
        clock.advance(Duration::from_millis(1));
        profiler.start_section("inner").unwrap();
        clock.advance(Duration::from_millis(2));
        profiler.end_current().unwrap();
        assert!(!profiler.is_running("inner"));
        assert!(profiler.is_running("outer"));

        clock.advance(Duration::from_millis(3));
        profiler.end_current().unwrap();
        assert!(!profiler.is_running("outer"));

        assert_eq!(profiler.stats("inner").unwrap().total_time_nanos, 2_000_000);
        assert_eq!(profiler.stats("outer").unwrap().total_time_nanos, 6_000_000);
        assert_eq!(profiler.last_started_section(), Some("inner"));
    }

    #[test]
    fn test_named_end_out_of_order_keeps_stack_consistent() {
        let (mut profiler, _, _) = profiler();
        profiler.start_section("a").unwrap();
        profiler.start_section("b").unwrap();
        profiler.start_section("c").unwrap();

        profiler.end_section("b").unwrap();
        assert_eq!(profiler.open_sections(), &["a".to_string(), "c".to_string()]);

        profiler.end_current().unwrap();
        assert!(!profiler.is_running("c"));
        profiler.end_current().unwrap();
        assert!(!profiler.is_running("a"));
        assert!(profiler.open_sections().is_empty());
    }

    #[test]
    fn test_nesting_recorded_on_first_start() {
        let (mut profiler, _, _) = profiler();
        profiler.start_section("total").unwrap();
        profiler.start_section("hashing").unwrap();
        profiler.start_section("md5").unwrap();
        profiler.end_current().unwrap();
        profiler.end_current().unwrap();
        profiler.end_current().unwrap();

        // a later start at a different depth keeps the first depth
        profiler.start_section("md5").unwrap();
        profiler.end_current().unwrap();

        assert_eq!(profiler.stats("total").unwrap().nesting, 0);
        assert_eq!(profiler.stats("hashing").unwrap().nesting, 1);
        assert_eq!(profiler.stats("md5").unwrap().nesting, 2);
    }

    #[test]
    fn test_nesting_disabled() {
        let config = ConfigBuilder::new().track_nesting(false).build().unwrap();
        let (mut profiler, _, _) = profiler_with(config);
        profiler.start_section("outer").unwrap();
        profiler.start_section("inner").unwrap();
        assert_eq!(profiler.stats("inner").unwrap().nesting, 0);
    }

    #[test]
    fn test_periodic_report_gate() {
        let config = ConfigBuilder::new().report_interval_secs(30).build().unwrap();
        let (mut profiler, clock, reports) = profiler_with(config);
        timed(&mut profiler, &clock, "x", 1);

        clock.advance(Duration::from_secs(28));
        assert!(!profiler.periodic_report());
        assert!(reports.lock().is_empty());
        let before = profiler.last_report_time_millis();

        clock.advance(Duration::from_secs(2));
        assert!(profiler.periodic_report());
        assert_eq!(reports.lock().len(), 1);
        assert!(profiler.last_report_time_millis() > before);

        assert!(!profiler.periodic_report());
        clock.advance(Duration::from_secs(29));
        assert!(!profiler.periodic_report());
        clock.advance(Duration::from_secs(1));
        assert!(profiler.periodic_report());
        assert_eq!(reports.lock().len(), 2);
    }

    #[test]
    fn test_report_with_explicit_period() {
        let (mut profiler, clock, reports) = profiler();
        clock.advance(Duration::from_secs(5));
        assert!(!profiler.report(Duration::from_secs(10)));
        assert!(profiler.report(Duration::from_secs(5)));
        assert!(profiler.report(Duration::ZERO));
        assert_eq!(reports.lock().len(), 2);
    }

    #[test]
    fn test_print_results_ignores_gate() {
        let (mut profiler, clock, reports) = profiler();
        timed(&mut profiler, &clock, "x", 1);
        let before = profiler.last_report_time_millis();

        profiler.print_results();
        assert_eq!(reports.lock().len(), 1);
        assert!(reports.lock()[0].starts_with("x "));
        assert_eq!(profiler.last_report_time_millis(), before);
    }

    #[test]
    fn test_report_includes_enclosing_percentage() {
        let config = ConfigBuilder::new().enclosing_section("total").build().unwrap();
        let (mut profiler, clock, reports) = profiler_with(config);
        profiler.start_section("total").unwrap();
        timed(&mut profiler, &clock, "work", 10);
        clock.advance(Duration::from_millis(30));
        profiler.end_section("total").unwrap();

        profiler.print_results();
        let report = reports.lock()[0].clone();
        let mut lines = report.lines();
        assert!(lines.next().unwrap().contains("(100.00%)"));
        assert!(lines.next().unwrap().contains("( 25.00%)"));
    }

    #[test]
    fn test_running_section_in_report() {
        let (mut profiler, _, _) = profiler();
        profiler.start_section("pending").unwrap();
        assert!(profiler.render_report().ends_with("no samples"));
    }

    #[test]
    fn test_reset() {
        let (mut profiler, clock, _) = profiler();
        timed(&mut profiler, &clock, "x", 1);
        profiler.start_section("y").unwrap();

        profiler.reset();
        assert_eq!(profiler.sections().count(), 0);
        assert!(profiler.open_sections().is_empty());
        assert_eq!(profiler.last_started_section(), None);
        profiler.start_section("y").unwrap();
    }

    #[test]
    fn test_huge_report_period_never_elapses() {
        let (mut profiler, clock, reports) = profiler();
        clock.advance(Duration::from_millis(400));
        assert!(!profiler.report(Duration::from_secs(18_446_744_073_709_552)));
        assert!(!profiler.report(Duration::from_secs(u64::MAX)));
        assert!(reports.lock().is_empty());
    }

    #[test]
    fn test_huge_configured_interval() {
        let config: ProfilerConfig = serde_json::from_str(r#"{"report_interval_secs": 18446744073709551615}"#).unwrap();
        let (mut profiler, clock, reports) = profiler_with(config);
        clock.advance(Duration::from_secs(3600));
        assert!(!profiler.periodic_report());
        assert!(reports.lock().is_empty());
    }

    struct StoppedClock;

    impl Clock for StoppedClock {
        fn now_nanos(&self) -> u64 {
            0
        }

        fn now_millis(&self) -> u64 {
            0
        }
    }

    #[test]
    fn test_clock_reading_zero_still_starts_section() {
        let (printer, _) = Printer::capture();
        let mut profiler = SimpleProfiler::with_clock(ProfilerConfig::default(), printer, StoppedClock).unwrap();

        profiler.start_section("a").unwrap();
        assert!(profiler.is_running("a"));
        assert_eq!(profiler.open_sections(), &["a".to_string()]);

        profiler.end_current().unwrap();
        assert!(!profiler.is_running("a"));
        assert!(profiler.open_sections().is_empty());
        let stats = profiler.stats("a").unwrap();
        assert_eq!(stats.sample_count, 1);
        assert_eq!(stats.total_time_nanos, 0);
    }

    #[test]
    fn test_exact_deltas_from_clock_starting_at_zero() {
        let (mut profiler, clock, _) = profiler();
        assert_eq!(clock.now_nanos(), 0);
        timed(&mut profiler, &clock, "x", 10);
        timed(&mut profiler, &clock, "x", 20);
        assert_eq!(profiler.stats("x").unwrap().total_time_nanos, 30_000_000);
    }

    #[test]
    fn test_measure_records_sample() {
        let (mut profiler, clock, _) = profiler();
        let value = profiler
            .measure("sqrt", || {
                clock.advance(Duration::from_millis(7));
                (2.0_f64).sqrt()
            })
            .unwrap();

        assert_eq!(value, 2.0_f64.sqrt());
        let stats = profiler.stats("sqrt").unwrap();
        assert_eq!(stats.sample_count, 1);
        assert_eq!(stats.total_time_nanos, 7_000_000);
        assert!(!stats.is_running());
    }

    #[test]
    fn test_measure_propagates_start_error() {
        let (mut profiler, _, _) = profiler();
        profiler.start_section("busy").unwrap();
        let mut ran = false;
        assert!(profiler.measure("busy", || ran = true).is_err());
        assert!(!ran);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ProfilerConfig {
            enclosing_section_name: " ".to_string(),
            ..ProfilerConfig::default()
        };
        assert!(SimpleProfiler::new(config).is_err());
    }
}
