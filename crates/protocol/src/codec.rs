//! Pure translation between domain types and the chat-completions wire shape.
//!
//! Decoding is deliberately tolerant: cloud and local inference servers
//! disagree about which optional fields they send, so a missing numeric or
//! textual field is "no value", never a parse failure. The only structural
//! requirement is a non-empty `choices` array.

use serde::{Deserialize, Serialize};

use scenepilot_core::error::ProtocolError;
use scenepilot_core::message::{Message, Role, ToolCall};
use scenepilot_core::tool::ToolSpec;
use scenepilot_core::usage::UsageStats;

/// Model parameters carried on every request.
#[derive(Debug, Clone)]
pub struct ModelParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The outgoing request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<WireToolDefinition>>,
}

/// One message in wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    pub r#type: String,
    pub function: WireFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFunction {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireToolDefinition {
    pub r#type: String,
    pub function: WireToolFunction,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireToolFunction {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// The parsed response the orchestration loop consumes.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub id: String,
    pub model: String,
    pub finish_reason: Option<String>,
    pub content: Option<String>,
    pub reasoning: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    /// Zero-valued when the backend omitted usage or timing fields.
    pub usage: UsageStats,
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::System => "system",
        Role::Tool => "tool",
    }
}

/// Map the message history, tool definitions, and model parameters to the
/// wire request shape.
///
/// The `tools` array is emitted only when at least one spec is supplied —
/// the caller passes an empty slice when tool use is disabled.
pub fn encode_request(
    messages: &[Message],
    tools: &[ToolSpec],
    params: &ModelParams,
) -> ChatRequest {
    let wire_messages = messages
        .iter()
        .map(|m| WireMessage {
            role: role_name(m.role).to_string(),
            content: m.content.clone(),
            tool_calls: if m.tool_calls.is_empty() {
                None
            } else {
                Some(
                    m.tool_calls
                        .iter()
                        .map(|tc| WireToolCall {
                            id: tc.id.clone(),
                            r#type: tc.call_type.clone(),
                            function: WireFunction {
                                name: tc.name.clone(),
                                arguments: tc.arguments.clone(),
                            },
                        })
                        .collect(),
                )
            },
            tool_call_id: m.tool_call_id.clone(),
            name: m.name.clone(),
        })
        .collect();

    let wire_tools = if tools.is_empty() {
        None
    } else {
        Some(
            tools
                .iter()
                .map(|t| WireToolDefinition {
                    r#type: "function".into(),
                    function: WireToolFunction {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: t.parameters_schema(),
                    },
                })
                .collect(),
        )
    };

    ChatRequest {
        model: params.model.clone(),
        messages: wire_messages,
        temperature: params.temperature,
        max_tokens: params.max_tokens,
        tools: wire_tools,
    }
}

/// Parse raw response bytes into a [`ChatResponse`].
///
/// Fails with [`ProtocolError::Malformed`] on invalid JSON and
/// [`ProtocolError::EmptyChoices`] when the `choices` array is absent or
/// empty. All other fields default rather than fail.
pub fn decode_response(raw: &[u8]) -> Result<ChatResponse, ProtocolError> {
    let api: ApiResponse =
        serde_json::from_slice(raw).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

    let choice = api
        .choices
        .into_iter()
        .next()
        .ok_or(ProtocolError::EmptyChoices)?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCall {
            id: tc.id,
            call_type: tc.r#type,
            name: tc.function.name,
            arguments: tc.function.arguments,
        })
        .collect();

    let usage = {
        let u = api.usage.unwrap_or_default();
        let t = api.timings.unwrap_or_default();
        UsageStats {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
            predicted_ms: t.predicted_ms,
            predicted_tokens: t.predicted_n,
        }
    };

    Ok(ChatResponse {
        id: api.id,
        model: api.model,
        finish_reason: choice.finish_reason,
        content: choice.message.content,
        reasoning: choice.message.reasoning_content,
        tool_calls,
        usage,
    })
}

// --- Incoming API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
    #[serde(default)]
    timings: Option<ApiTimings>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

/// Throughput block emitted by llama.cpp-style local servers.
#[derive(Debug, Default, Deserialize)]
struct ApiTimings {
    #[serde(default)]
    predicted_ms: f64,
    #[serde(default)]
    predicted_n: u64,
}
