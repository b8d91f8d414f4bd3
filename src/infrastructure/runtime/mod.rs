//! Runtime infrastructure - virtual time, wall clock and randomness
//!
//! Everything the controller needs from "outside" that would make tests
//! nondeterministic sits behind a trait here.

mod clock;
mod random;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use random::{RandomSource, ScriptedRandom, StdRandom};
pub use scheduler::{Scheduler, TaskHandle};
