use std::time::{Duration, Instant};

use crate::pipeline::Phase;

/// Accumulated wall time per pipeline phase.
#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineProfiler {
    pub gravity_time: Duration,
    pub constraint_solve_time: Duration,
    pub accumulate_time: Duration,
    pub integrate_time: Duration,
    pub total_tick_time: Duration,

    pub tick_count: u64,
    pub particle_count: usize,
    pub constraint_count: usize,
}

impl PipelineProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Slot that accumulates time for `phase`. `Idle` stands for the whole tick.
    pub fn phase_time_mut(&mut self, phase: Phase) -> &mut Duration {
        match phase {
            Phase::Gravity => &mut self.gravity_time,
            Phase::ConstraintSolve => &mut self.constraint_solve_time,
            Phase::Accumulate => &mut self.accumulate_time,
            Phase::Integrate => &mut self.integrate_time,
            Phase::Idle => &mut self.total_tick_time,
        }
    }

    pub fn average_tick_time(&self) -> Duration {
        if self.tick_count == 0 {
            return Duration::ZERO;
        }
        self.total_tick_time / self.tick_count as u32
    }

    pub fn report(&self) {
        let total_us = self.total_tick_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        log::info!(
            "pipeline profile: {} ticks, {} particles, {} constraints, avg {:.3} ms/tick",
            self.tick_count,
            self.particle_count,
            self.constraint_count,
            self.average_tick_time().as_secs_f32() * 1000.0
        );
        for (label, time) in [
            ("gravity", self.gravity_time),
            ("constraint solve", self.constraint_solve_time),
            ("accumulate", self.accumulate_time),
            ("integrate", self.integrate_time),
        ] {
            log::info!(
                "  {label:<16} {:.2} ms ({:.1}%)",
                time.as_secs_f32() * 1000.0,
                (time.as_micros() as f32 / total_us) * 100.0
            );
        }
    }
}

/// Adds the elapsed time to `output` when dropped.
pub struct ScopedTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_divides_total_by_ticks() {
        let mut profiler = PipelineProfiler {
            total_tick_time: Duration::from_millis(10),
            tick_count: 4,
            ..Default::default()
        };
        assert_eq!(profiler.average_tick_time(), Duration::from_micros(2500));

        {
            let _timer = ScopedTimer::new(profiler.phase_time_mut(Phase::Gravity));
        }
        profiler.reset();
        assert_eq!(profiler.tick_count, 0);
        assert_eq!(profiler.average_tick_time(), Duration::ZERO);
    }
}
