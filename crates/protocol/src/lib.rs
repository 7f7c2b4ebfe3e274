//! Wire protocol layer for ScenePilot.
//!
//! Two halves, kept deliberately separate:
//! - [`codec`] — pure, side-effect-free translation between domain types and
//!   the JSON request/response shape of OpenAI-compatible chat endpoints.
//! - [`client`] — the [`ChatTransport`] seam plus the reqwest implementation
//!   that actually carries encoded requests over HTTP.
//!
//! The transport returns raw response bytes so the codec stays the single
//! place responses are interpreted.

pub mod client;
pub mod codec;

pub use client::{ChatTransport, HttpTransport};
pub use codec::{decode_response, encode_request, ChatRequest, ChatResponse, ModelParams};
