//! Tool that applies partial changes to an existing scene object.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use scenepilot_core::error::ToolError;
use scenepilot_core::tool::{DiagnosticSink, ParamType, Tool, ToolParam, ToolSpec};

use crate::scene::SceneGraph;

pub struct ModifyObjectTool {
    scene: Arc<SceneGraph>,
}

impl ModifyObjectTool {
    pub fn new(scene: Arc<SceneGraph>) -> Self {
        Self { scene }
    }
}

#[derive(Deserialize)]
struct Args {
    name: String,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    z: Option<f64>,
    #[serde(default)]
    color: Option<String>,
}

#[async_trait]
impl Tool for ModifyObjectTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "modify_object".into(),
            description:
                "Change the position and/or color of an existing scene object. Omitted fields keep their current value."
                    .into(),
            parameters: vec![
                ToolParam::new("name", ParamType::String, "Name of the object to modify"),
                ToolParam::new("x", ParamType::Number, "New X coordinate"),
                ToolParam::new("y", ParamType::Number, "New Y coordinate"),
                ToolParam::new("z", ParamType::Number, "New Z coordinate"),
                ToolParam::new("color", ParamType::String, "New color name"),
            ],
            required: vec!["name".into()],
        }
    }

    async fn execute(
        &self,
        arguments: &str,
        diagnostics: &DiagnosticSink,
    ) -> Result<String, ToolError> {
        let args: Args = serde_json::from_str(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        debug!(name = %args.name, "Modifying scene object");

        let current = self
            .scene
            .get(&args.name)
            .ok_or_else(|| ToolError::ExecutionFailed {
                tool_name: "modify_object".into(),
                reason: format!("no object named '{}'", args.name),
            })?;

        // Position is all-or-current: any supplied axis overrides, the rest
        // carry over.
        let position = if args.x.is_some() || args.y.is_some() || args.z.is_some() {
            Some([
                args.x.unwrap_or(current.position[0]),
                args.y.unwrap_or(current.position[1]),
                args.z.unwrap_or(current.position[2]),
            ])
        } else {
            None
        };

        if position.is_none() && args.color.is_none() {
            diagnostics.info("no changes requested");
        }

        let updated = self
            .scene
            .modify(&args.name, position, args.color)
            .map_err(|reason| ToolError::ExecutionFailed {
                tool_name: "modify_object".into(),
                reason,
            })?;

        Ok(format!("Updated {}", updated.describe()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneObject;

    fn scene_with_cube() -> Arc<SceneGraph> {
        let scene = Arc::new(SceneGraph::new());
        scene
            .create(SceneObject {
                name: "Cube".into(),
                kind: "cube".into(),
                position: [1.0, 2.0, 3.0],
                color: Some("red".into()),
            })
            .unwrap();
        scene
    }

    #[tokio::test]
    async fn moves_object_preserving_unspecified_axes() {
        let scene = scene_with_cube();
        let tool = ModifyObjectTool::new(scene.clone());
        let sink = DiagnosticSink::new();

        let output = tool
            .execute(r#"{"name":"Cube","y":9.5}"#, &sink)
            .await
            .unwrap();
        assert!(output.contains("Updated"));
        assert_eq!(scene.get("Cube").unwrap().position, [1.0, 9.5, 3.0]);
    }

    #[tokio::test]
    async fn recolors_without_moving() {
        let scene = scene_with_cube();
        let tool = ModifyObjectTool::new(scene.clone());
        let sink = DiagnosticSink::new();

        tool.execute(r#"{"name":"Cube","color":"blue"}"#, &sink)
            .await
            .unwrap();
        let cube = scene.get("Cube").unwrap();
        assert_eq!(cube.color.as_deref(), Some("blue"));
        assert_eq!(cube.position, [1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn unknown_object_fails() {
        let tool = ModifyObjectTool::new(Arc::new(SceneGraph::new()));
        let sink = DiagnosticSink::new();
        let err = tool
            .execute(r#"{"name":"Ghost","x":1.0}"#, &sink)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no object named 'Ghost'"));
    }
}
