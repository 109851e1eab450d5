/// Accumulated timings for one named section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionStats {
    pub name: String,
    /// Depth at which the section was first started.
    pub nesting: usize,
    /// Monotonic start timestamp while running, `None` while idle.
    pub start_time_nanos: Option<u64>,
    pub sample_count: u64,
    pub total_time_nanos: u64,
    pub batch_sample_count: u64,
    pub batch_total_time_nanos: u64,
}

impl SectionStats {
    pub fn new(name: impl Into<String>, nesting: usize) -> Self {
        Self {
            name: name.into(),
            nesting,
            start_time_nanos: None,
            sample_count: 0,
            total_time_nanos: 0,
            batch_sample_count: 0,
            batch_total_time_nanos: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.start_time_nanos.is_some()
    }

    /// Folds one completed measurement into the counters.
    ///
    /// The batch window restarts when the cumulative count, before this
    /// sample is added, equals `reset_after_sample_count`.
    pub(crate) fn record(&mut self, elapsed_nanos: u64, reset_after_sample_count: u64) {
        if reset_after_sample_count > 0 && self.sample_count == reset_after_sample_count {
            self.batch_sample_count = 0;
            self.batch_total_time_nanos = 0;
        }
        self.sample_count += 1;
        self.total_time_nanos += elapsed_nanos;
        self.batch_sample_count += 1;
        self.batch_total_time_nanos += elapsed_nanos;
        self.start_time_nanos = None;
    }

    pub fn total_secs(&self) -> f64 {
        self.total_time_nanos as f64 / 1e9
    }

    pub fn mean_nanos(&self) -> Option<f64> {
        mean(self.total_time_nanos, self.sample_count)
    }

    /// Mean duration of 1000 samples, in milliseconds.
    pub fn ms_per_thousand(&self) -> Option<f64> {
        ms_per_thousand(self.total_time_nanos, self.sample_count)
    }

    pub fn batch_ms_per_thousand(&self) -> Option<f64> {
        ms_per_thousand(self.batch_total_time_nanos, self.batch_sample_count)
    }

    /// Samples per second.
    pub fn rate_hz(&self) -> Option<f64> {
        rate_hz(self.sample_count, self.total_time_nanos)
    }

    pub fn batch_rate_hz(&self) -> Option<f64> {
        rate_hz(self.batch_sample_count, self.batch_total_time_nanos)
    }

    /// Share of `enclosing_nanos` spent in this section, in percent.
    pub fn percent_of(&self, enclosing_nanos: u64) -> Option<f64> {
        if enclosing_nanos == 0 {
            return None;
        }
        Some(100.0 * self.total_time_nanos as f64 / enclosing_nanos as f64)
    }
}

fn mean(total_nanos: u64, count: u64) -> Option<f64> {
    if count == 0 {
        return None;
    }
    Some(total_nanos as f64 / count as f64)
}

fn ms_per_thousand(total_nanos: u64, count: u64) -> Option<f64> {
    // nanos / count * 1000 samples / 1e6 ns-per-ms
    mean(total_nanos, count).map(|m| m / 1000.0)
}

fn rate_hz(count: u64, total_nanos: u64) -> Option<f64> {
    if total_nanos == 0 {
        return None;
    }
    Some(count as f64 / total_nanos as f64 * 1e9)
}
