//! The bounded request/dispatch loop implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use scenepilot_config::AppConfig;
use scenepilot_core::error::{Error, Result};
use scenepilot_core::message::Message;
use scenepilot_core::session::Session;
use scenepilot_core::tool::ToolRegistry;
use scenepilot_core::usage::UsageStats;
use scenepilot_protocol::codec::{self, ModelParams};
use scenepilot_protocol::ChatTransport;

/// Finish reason signalling the model wants tool dispatch.
const FINISH_TOOL_CALLS: &str = "tool_calls";

/// Caller-supplied hooks for one run. Both are optional.
#[derive(Default)]
pub struct RunControls<'a> {
    /// Polled at each iteration boundary; `true` stops the run cleanly
    /// without appending a terminating message.
    pub cancel: Option<&'a (dyn Fn() -> bool + Send + Sync)>,

    /// Invoked with the 1-based iteration number before each tool execution,
    /// so the caller can durably record progress before risky work.
    pub checkpoint: Option<&'a (dyn Fn(u32) + Send + Sync)>,
}

/// Terminal state of a run. Cancellation is a clean outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The model produced a final text answer.
    Completed(UsageStats),
    /// The cancel predicate fired at an iteration boundary; the session is
    /// left exactly as it was and can be resumed with another `run`.
    Cancelled(UsageStats),
}

impl RunOutcome {
    pub fn usage(&self) -> &UsageStats {
        match self {
            RunOutcome::Completed(u) | RunOutcome::Cancelled(u) => u,
        }
    }
}

/// Drives one session at a time through model turns and tool dispatch.
///
/// Iterations are strictly sequential; the awaited network call is the single
/// suspension point. Independent sessions may be driven concurrently by
/// separate orchestrator instances sharing the registry.
pub struct ChatOrchestrator {
    transport: Arc<dyn ChatTransport>,
    registry: Arc<ToolRegistry>,
    params: ModelParams,
    tools_enabled: bool,
    max_iterations: u32,
}

impl ChatOrchestrator {
    /// Create an orchestrator from explicit configuration.
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        registry: Arc<ToolRegistry>,
        config: &AppConfig,
    ) -> Self {
        Self {
            transport,
            registry,
            params: ModelParams {
                model: config.model.clone(),
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            },
            tools_enabled: config.tools_enabled,
            max_iterations: config.max_iterations,
        }
    }

    /// Override the iteration cap.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Enable or disable sending tool definitions with requests.
    pub fn with_tools_enabled(mut self, enabled: bool) -> Self {
        self.tools_enabled = enabled;
        self
    }

    /// Run the loop until the model produces a final answer, the iteration
    /// cap is hit, or the caller cancels.
    ///
    /// Returns cumulative usage totals summed across all iterations. The
    /// session may already hold a partial tool transcript from an interrupted
    /// earlier run; nothing is re-executed — the loop simply requests the
    /// next model turn with the history as it stands.
    pub async fn run(
        &self,
        session: &mut Session,
        controls: RunControls<'_>,
    ) -> Result<RunOutcome> {
        info!(
            session_id = %session.id,
            messages = session.len(),
            "Starting conversation run"
        );

        let mut usage = UsageStats::default();

        for iteration in 1..=self.max_iterations {
            if controls.cancel.map(|c| c()).unwrap_or(false) {
                info!(session_id = %session.id, iteration, "Run cancelled");
                return Ok(RunOutcome::Cancelled(usage));
            }

            debug!(session_id = %session.id, iteration, "Loop iteration");

            let history = session.project_for_wire();
            let definitions = if self.tools_enabled {
                self.registry.definitions()
            } else {
                Vec::new()
            };

            let request = codec::encode_request(&history, &definitions, &self.params);
            let raw = self.transport.send(&request).await?;
            let response = codec::decode_response(&raw)?;

            usage.accumulate(&response.usage);

            let wants_tools = response.finish_reason.as_deref() == Some(FINISH_TOOL_CALLS)
                && !response.tool_calls.is_empty();

            if !wants_tools {
                session.append(Message::assistant(response.content, response.reasoning));
                info!(
                    session_id = %session.id,
                    iterations = iteration,
                    total_tokens = usage.total_tokens,
                    "Run completed"
                );
                return Ok(RunOutcome::Completed(usage));
            }

            debug!(
                session_id = %session.id,
                tool_count = response.tool_calls.len(),
                "Dispatching tool calls"
            );

            let tool_calls = response.tool_calls.clone();
            session.append(Message::assistant_tool_calls(
                response.content,
                response.reasoning,
                tool_calls.clone(),
            ));

            for call in &tool_calls {
                if let Some(checkpoint) = controls.checkpoint {
                    checkpoint(iteration);
                }

                let result_text = match self.registry.execute(&call.name, &call.arguments).await {
                    Ok(text) => text,
                    // Only lookup failures escape the registry; they become
                    // conversational content so the model can recover.
                    Err(e) => {
                        warn!(tool = %call.name, error = %e, "Tool dispatch failed");
                        format!("Error: {e}")
                    }
                };

                session.append(Message::tool_result(&call.id, &call.name, result_text));
            }
        }

        warn!(
            session_id = %session.id,
            max_iterations = self.max_iterations,
            "Iteration limit reached"
        );
        Err(Error::IterationLimit {
            max_iterations: self.max_iterations,
        })
    }
}
