//! Utility helpers: vector math, logging timers, and per-phase profiling.

pub mod logging;
pub mod math;
pub mod profiling;

pub use math::*;
pub use profiling::PipelineProfiler;
