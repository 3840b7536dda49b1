//! # coursecraft-crew
//!
//! A small agent/task/crew layer over an `LlmProvider`:
//! 1. An `Agent` is a role with a goal and a backstory
//! 2. A `Task` is a piece of work assigned to one agent by role
//! 3. A `Crew` runs its tasks in order, feeding earlier outputs forward
//! 4. `kickoff` returns the free-text output of the last task
//!
//! Only the sequential process exists; the crew never parses what the
//! model says.

mod agent;
mod crew;
mod task;

pub use agent::{Agent, LlmSettings};
pub use crew::{Crew, CrewOutput, Process};
pub use task::{Task, TaskOutput};
