//! Tool that lists the current scene contents.

use std::sync::Arc;

use async_trait::async_trait;

use scenepilot_core::error::ToolError;
use scenepilot_core::tool::{DiagnosticSink, Tool, ToolSpec};

use crate::scene::SceneGraph;

pub struct ListObjectsTool {
    scene: Arc<SceneGraph>,
}

impl ListObjectsTool {
    pub fn new(scene: Arc<SceneGraph>) -> Self {
        Self { scene }
    }
}

#[async_trait]
impl Tool for ListObjectsTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "list_objects".into(),
            description: "List every object currently in the scene.".into(),
            parameters: vec![],
            required: vec![],
        }
    }

    async fn execute(
        &self,
        _arguments: &str,
        _diagnostics: &DiagnosticSink,
    ) -> Result<String, ToolError> {
        let objects = self.scene.list();
        if objects.is_empty() {
            return Ok("The scene is empty.".into());
        }

        let mut output = format!("{} object(s) in the scene:", objects.len());
        for obj in &objects {
            output.push_str(&format!("\n- {}", obj.describe()));
        }
        Ok(output)
    }
}
