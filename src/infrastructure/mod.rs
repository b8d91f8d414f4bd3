//! Infrastructure layer
//!
//! Virtual-time scheduler, clocks and random sources used by the controller.

pub mod runtime;

pub use runtime::{
    Clock, ManualClock, RandomSource, Scheduler, ScriptedRandom, StdRandom, SystemClock,
    TaskHandle,
};
