//! Actor-based job intake
//!
//! The checker actor is the seam between the job scheduler and the
//! engine: the scheduler sends `CheckQuery` commands over an mpsc
//! channel, the actor spawns one task per command so jobs for distinct
//! queries interleave freely.
//!
//! ## Design Principles
//!
//! 1. **Commands**: Request/response messages via mpsc + oneshot
//! 2. **Isolation**: A failed check job never takes the actor down
//! 3. **Per-alert serialization**: handled inside the engine, not here

pub mod checker;
pub mod messages;

pub use checker::CheckerHandle;
pub use messages::CheckCommand;
