//! Tool that creates an object in the scene.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use scenepilot_core::error::ToolError;
use scenepilot_core::tool::{DiagnosticSink, ParamType, Tool, ToolParam, ToolSpec};

use crate::scene::{SceneGraph, SceneObject};

/// Kinds the host environment knows how to instantiate.
const KNOWN_KINDS: &[&str] = &["cube", "sphere", "cylinder", "plane", "light", "camera"];

pub struct CreateObjectTool {
    scene: Arc<SceneGraph>,
}

impl CreateObjectTool {
    pub fn new(scene: Arc<SceneGraph>) -> Self {
        Self { scene }
    }
}

#[derive(Deserialize)]
struct Args {
    name: String,
    kind: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    z: f64,
    #[serde(default)]
    color: Option<String>,
}

#[async_trait]
impl Tool for CreateObjectTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "create_object".into(),
            description: "Create a new object in the scene at the given position.".into(),
            parameters: vec![
                ToolParam::new("name", ParamType::String, "Unique name for the new object"),
                ToolParam::new(
                    "kind",
                    ParamType::String,
                    "Object kind: cube, sphere, cylinder, plane, light, or camera",
                ),
                ToolParam::new("x", ParamType::Number, "X coordinate (default 0)"),
                ToolParam::new("y", ParamType::Number, "Y coordinate (default 0)"),
                ToolParam::new("z", ParamType::Number, "Z coordinate (default 0)"),
                ToolParam::new("color", ParamType::String, "Optional color name, e.g. 'red'"),
            ],
            required: vec!["name".into(), "kind".into()],
        }
    }

    async fn execute(
        &self,
        arguments: &str,
        diagnostics: &DiagnosticSink,
    ) -> Result<String, ToolError> {
        let args: Args = serde_json::from_str(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        if args.name.is_empty() {
            return Err(ToolError::InvalidArguments("'name' must not be empty".into()));
        }

        debug!(name = %args.name, kind = %args.kind, "Creating scene object");

        if !KNOWN_KINDS.contains(&args.kind.as_str()) {
            diagnostics.warning(format!(
                "unknown kind '{}', instantiating as generic object",
                args.kind
            ));
        }

        let object = SceneObject {
            name: args.name.clone(),
            kind: args.kind,
            position: [args.x, args.y, args.z],
            color: args.color,
        };
        let description = object.describe();

        self.scene
            .create(object)
            .map_err(|reason| ToolError::ExecutionFailed {
                tool_name: "create_object".into(),
                reason,
            })?;

        Ok(format!("Successfully created {description}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenepilot_core::tool::ToolRegistry;

    fn tool_with_scene() -> (CreateObjectTool, Arc<SceneGraph>) {
        let scene = Arc::new(SceneGraph::new());
        (CreateObjectTool::new(scene.clone()), scene)
    }

    #[tokio::test]
    async fn creates_object_in_scene() {
        let (tool, scene) = tool_with_scene();
        let sink = DiagnosticSink::new();
        let output = tool
            .execute(
                r#"{"name":"Cube","kind":"cube","x":0,"y":0,"z":0,"color":"red"}"#,
                &sink,
            )
            .await
            .unwrap();

        assert!(output.contains("Successfully created"));
        let created = scene.get("Cube").unwrap();
        assert_eq!(created.kind, "cube");
        assert_eq!(created.color.as_deref(), Some("red"));
    }

    #[tokio::test]
    async fn missing_coordinates_default_to_origin() {
        let (tool, scene) = tool_with_scene();
        let sink = DiagnosticSink::new();
        tool.execute(r#"{"name":"Cube","kind":"cube"}"#, &sink)
            .await
            .unwrap();
        assert_eq!(scene.get("Cube").unwrap().position, [0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn invalid_payload_is_rejected() {
        let (tool, _) = tool_with_scene();
        let sink = DiagnosticSink::new();
        let err = tool.execute("not json", &sink).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn duplicate_name_fails_execution() {
        let (tool, _) = tool_with_scene();
        let sink = DiagnosticSink::new();
        tool.execute(r#"{"name":"Cube","kind":"cube"}"#, &sink)
            .await
            .unwrap();
        let err = tool
            .execute(r#"{"name":"Cube","kind":"sphere"}"#, &sink)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn unknown_kind_emits_diagnostic_through_registry() {
        let scene = Arc::new(SceneGraph::new());
        let registry = ToolRegistry::new();
        registry.discover([Arc::new(CreateObjectTool::new(scene)) as Arc<dyn Tool>]);

        let output = registry
            .execute("create_object", r#"{"name":"Blob","kind":"blob"}"#)
            .await
            .unwrap();
        assert!(output.contains("Successfully created"));
        assert!(output.contains("[Tool Diagnostics]"));
        assert!(output.contains("unknown kind 'blob'"));
    }
}
