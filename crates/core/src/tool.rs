//! Tool trait and registry — the abstraction over callable capabilities.
//!
//! Tools are what let the model act on the host environment: create scene
//! objects, modify them, read the console, etc. The registry is the
//! process-wide catalog the orchestration loop draws definitions from and
//! dispatches execution through.
//!
//! Containment contract: a failing tool never aborts a conversation. The
//! registry renders execution failures (and any diagnostics the tool emitted
//! along the way) as ordinary result text for the model to read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ToolError;

/// Primitive type tag for a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ParamType {
    fn as_wire(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
        }
    }
}

/// A single named tool parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParam {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
}

impl ToolParam {
    pub fn new(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
        }
    }
}

/// The machine-readable description of a tool, sent to the model so it knows
/// what it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique key within a registry; first registration wins.
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Ordered named parameters
    pub parameters: Vec<ToolParam>,

    /// Subset of parameter names the model must supply
    pub required: Vec<String>,
}

impl ToolSpec {
    /// Lower the parameter list to the JSON Schema object shape the wire
    /// protocol expects.
    pub fn parameters_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        for p in &self.parameters {
            properties.insert(
                p.name.clone(),
                serde_json::json!({
                    "type": p.param_type.as_wire(),
                    "description": p.description,
                }),
            );
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}

/// Severity of a diagnostic event captured during tool execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

impl DiagnosticLevel {
    fn label(&self) -> &'static str {
        match self {
            DiagnosticLevel::Info => "INFO",
            DiagnosticLevel::Warning => "WARN",
            DiagnosticLevel::Error => "ERROR",
        }
    }
}

/// A diagnostic event emitted by a tool while it runs.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub text: String,
}

/// Collects diagnostic events a tool emits during one execution. The registry
/// appends everything collected, clearly labeled, to the result text so
/// operators keep full context even on partial failure.
#[derive(Default)]
pub struct DiagnosticSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self, text: impl Into<String>) {
        self.record(DiagnosticLevel::Info, text);
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.record(DiagnosticLevel::Warning, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.record(DiagnosticLevel::Error, text);
    }

    pub fn record(&self, level: DiagnosticLevel, text: impl Into<String>) {
        self.entries
            .lock()
            .expect("diagnostic sink poisoned")
            .push(Diagnostic {
                level,
                text: text.into(),
            });
    }

    fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock().expect("diagnostic sink poisoned"))
    }
}

/// The core Tool trait.
///
/// Each capability implements this trait and is handed to
/// [`ToolRegistry::discover`] at startup — an explicit, statically auditable
/// list rather than any runtime scanning.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's machine-readable spec.
    fn spec(&self) -> ToolSpec;

    /// Execute with a raw argument payload (a JSON string the tool itself
    /// validates). Diagnostics written to `diagnostics` are surfaced in the
    /// result text by the registry.
    async fn execute(
        &self,
        arguments: &str,
        diagnostics: &DiagnosticSink,
    ) -> Result<String, ToolError>;
}

/// A process-wide catalog of tools.
///
/// Read-mostly after one discovery pass: `discover` is the single writer and
/// replaces the catalog wholesale; `definitions` and `execute` take read
/// locks only.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the catalog from an explicit list of implementations.
    ///
    /// Rejects (logs, does not fail) any tool whose spec name is empty or
    /// duplicates an already-registered name — first registration wins.
    /// Re-running replaces the prior catalog entirely.
    pub fn discover(&self, implementations: impl IntoIterator<Item = Arc<dyn Tool>>) {
        let mut catalog: HashMap<String, Arc<dyn Tool>> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for tool in implementations {
            let spec = tool.spec();
            if spec.name.is_empty() {
                warn!("Dropping tool with empty spec name");
                continue;
            }
            if catalog.contains_key(&spec.name) {
                warn!(tool = %spec.name, "Dropping duplicate tool registration");
                continue;
            }
            order.push(spec.name.clone());
            catalog.insert(spec.name, tool);
        }

        debug!(count = catalog.len(), tools = ?order, "Tool catalog discovered");
        *self.tools.write().expect("tool catalog poisoned") = catalog;
    }

    /// A snapshot of every registered tool's spec, for inclusion in outgoing
    /// requests.
    pub fn definitions(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self
            .tools
            .read()
            .expect("tool catalog poisoned")
            .values()
            .map(|t| t.spec())
            .collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.read().expect("tool catalog poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Execute a tool by name.
    ///
    /// Fails with `ToolError::NotFound` when the name is absent — the caller
    /// converts that into tool-result content rather than aborting the run.
    /// Every other failure mode is contained here: an `Err` from the tool
    /// becomes error-annotated text, and captured diagnostics are appended to
    /// whatever came back.
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<String, ToolError> {
        let tool = {
            let catalog = self.tools.read().expect("tool catalog poisoned");
            catalog
                .get(name)
                .cloned()
                .ok_or_else(|| ToolError::NotFound(name.to_string()))?
        };

        debug!(tool = %name, "Executing tool");
        let diagnostics = DiagnosticSink::new();
        let mut text = match tool.execute(arguments, &diagnostics).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool execution failed");
                format!("Error executing tool '{name}': {e}")
            }
        };

        let captured = diagnostics.drain();
        if !captured.is_empty() {
            text.push_str("\n\n[Tool Diagnostics]");
            for d in &captured {
                text.push_str(&format!("\n- {}: {}", d.level.label(), d.text));
            }
        }

        Ok(text)
    }
}
