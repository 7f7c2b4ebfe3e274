//! Tool that reads recent host console activity.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use scenepilot_core::error::ToolError;
use scenepilot_core::tool::{DiagnosticSink, ParamType, Tool, ToolParam, ToolSpec};

use crate::scene::SceneGraph;

const DEFAULT_LIMIT: usize = 20;

pub struct ReadConsoleTool {
    scene: Arc<SceneGraph>,
}

impl ReadConsoleTool {
    pub fn new(scene: Arc<SceneGraph>) -> Self {
        Self { scene }
    }
}

#[derive(Deserialize)]
struct Args {
    #[serde(default)]
    limit: Option<usize>,
}

#[async_trait]
impl Tool for ReadConsoleTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "read_console".into(),
            description: "Read the most recent host console lines, oldest first.".into(),
            parameters: vec![ToolParam::new(
                "limit",
                ParamType::Integer,
                "Maximum number of lines to return (default 20)",
            )],
            required: vec![],
        }
    }

    async fn execute(
        &self,
        arguments: &str,
        _diagnostics: &DiagnosticSink,
    ) -> Result<String, ToolError> {
        // An empty payload means "use defaults".
        let args: Args = if arguments.trim().is_empty() {
            Args { limit: None }
        } else {
            serde_json::from_str(arguments)
                .map_err(|e| ToolError::InvalidArguments(e.to_string()))?
        };

        let lines = self.scene.console_tail(args.limit.unwrap_or(DEFAULT_LIMIT));
        if lines.is_empty() {
            return Ok("The console is empty.".into());
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_console() {
        let tool = ReadConsoleTool::new(Arc::new(SceneGraph::new()));
        let sink = DiagnosticSink::new();
        let output = tool.execute("{}", &sink).await.unwrap();
        assert_eq!(output, "The console is empty.");
    }

    #[tokio::test]
    async fn returns_recent_lines_with_limit() {
        let scene = Arc::new(SceneGraph::new());
        for i in 0..30 {
            scene.log(format!("event {i}"));
        }

        let tool = ReadConsoleTool::new(scene);
        let sink = DiagnosticSink::new();

        let output = tool.execute(r#"{"limit":3}"#, &sink).await.unwrap();
        assert_eq!(output, "event 27\nevent 28\nevent 29");

        // Default limit caps at 20.
        let output = tool.execute("", &sink).await.unwrap();
        assert_eq!(output.lines().count(), 20);
    }
}
