use std::ops::{Deref, DerefMut};
use crate::error::ProfilerResult;
use super::Profiler;

/// Ends its section when dropped.
///
/// Dereferences to the profiler, so nested sections can be opened through
/// the guard.
pub struct SectionGuard<'a, P: Profiler + ?Sized> {
    profiler: &'a mut P,
    name: String,
    finished: bool,
}

impl<'a, P: Profiler + ?Sized> SectionGuard<'a, P> {
    pub fn new(profiler: &'a mut P, name: &str) -> ProfilerResult<Self> {
        profiler.start_section(name)?;
        Ok(Self {
            profiler,
            name: name.to_string(),
            finished: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ends the section now and returns the error a drop would only log.
    pub fn finish(mut self) -> ProfilerResult<()> {
        self.finished = true;
        self.profiler.end_section(&self.name)
    }
}

impl<P: Profiler + ?Sized> Deref for SectionGuard<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.profiler
    }
}

impl<P: Profiler + ?Sized> DerefMut for SectionGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.profiler
    }
}

impl<P: Profiler + ?Sized> Drop for SectionGuard<'_, P> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(err) = self.profiler.end_section(&self.name) {
            tracing::warn!(section = %self.name, error = %err, "failed to end section on drop");
        }
    }
}
