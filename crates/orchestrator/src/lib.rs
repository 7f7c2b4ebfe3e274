//! The conversation orchestration loop — the heart of ScenePilot.
//!
//! One run drives a session through repeated model turns:
//!
//! 1. **Poll** the caller's cancel predicate at the iteration boundary
//! 2. **Project** the session history and registry tool definitions
//! 3. **Send** an encoded request and await the response (the only await)
//! 4. **Decode**, accumulate usage totals
//! 5. **If tool calls**: append the assistant turn, execute each call in
//!    order (checkpoint first), append the results, loop back
//! 6. **If text**: append the final assistant message and return
//!
//! The loop is bounded by an iteration cap and never rolls back: whatever was
//! appended before a failure, cancellation, or process restart stays, which
//! is exactly what makes a session resumable by calling `run` again.

pub mod run_loop;

pub use run_loop::{ChatOrchestrator, RunControls, RunOutcome};
