//! Tool that removes an object from the scene.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use scenepilot_core::error::ToolError;
use scenepilot_core::tool::{DiagnosticSink, ParamType, Tool, ToolParam, ToolSpec};

use crate::scene::SceneGraph;

pub struct DeleteObjectTool {
    scene: Arc<SceneGraph>,
}

impl DeleteObjectTool {
    pub fn new(scene: Arc<SceneGraph>) -> Self {
        Self { scene }
    }
}

#[derive(Deserialize)]
struct Args {
    name: String,
}

#[async_trait]
impl Tool for DeleteObjectTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "delete_object".into(),
            description: "Remove an object from the scene by name.".into(),
            parameters: vec![ToolParam::new(
                "name",
                ParamType::String,
                "Name of the object to delete",
            )],
            required: vec!["name".into()],
        }
    }

    async fn execute(
        &self,
        arguments: &str,
        _diagnostics: &DiagnosticSink,
    ) -> Result<String, ToolError> {
        let args: Args = serde_json::from_str(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        debug!(name = %args.name, "Deleting scene object");

        self.scene
            .delete(&args.name)
            .map_err(|reason| ToolError::ExecutionFailed {
                tool_name: "delete_object".into(),
                reason,
            })?;

        Ok(format!("Deleted '{}'", args.name))
    }
}
