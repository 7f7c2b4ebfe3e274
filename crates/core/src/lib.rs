//! # ScenePilot Core
//!
//! Domain types, traits, and error definitions for the ScenePilot
//! conversation orchestrator. This crate has **zero framework dependencies**
//! — it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The seams are traits defined here: the `Tool` trait is what capability
//! implementations plug into, and the registry/session types are what the
//! orchestration loop consumes. Implementations live in their respective
//! crates, so every crate depends inward on core.

pub mod error;
pub mod message;
pub mod session;
pub mod tool;
pub mod usage;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProtocolError, Result, ToolError};
pub use message::{Message, Role, ToolCall};
pub use session::{Attachment, Session, SessionId};
pub use tool::{
    Diagnostic, DiagnosticLevel, DiagnosticSink, ParamType, Tool, ToolParam, ToolRegistry,
    ToolSpec,
};
pub use usage::UsageStats;
