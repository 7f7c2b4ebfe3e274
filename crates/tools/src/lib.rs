//! Built-in tool implementations for ScenePilot.
//!
//! Every tool operates on a shared in-memory [`SceneGraph`] — the stand-in
//! for a host environment's object model. Tools validate their own argument
//! payloads and report domain failures as errors the registry renders into
//! result text.

pub mod create_object;
pub mod delete_object;
pub mod list_objects;
pub mod modify_object;
pub mod read_console;
pub mod scene;

pub use create_object::CreateObjectTool;
pub use delete_object::DeleteObjectTool;
pub use list_objects::ListObjectsTool;
pub use modify_object::ModifyObjectTool;
pub use read_console::ReadConsoleTool;
pub use scene::{SceneGraph, SceneObject};

use std::sync::Arc;

use scenepilot_core::tool::Tool;

/// The full built-in capability set, in registration order.
///
/// This is the explicit list handed to `ToolRegistry::discover` at startup —
/// the catalog is statically auditable right here.
pub fn builtin_tools(scene: Arc<SceneGraph>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(CreateObjectTool::new(scene.clone())),
        Arc::new(ModifyObjectTool::new(scene.clone())),
        Arc::new(DeleteObjectTool::new(scene.clone())),
        Arc::new(ListObjectsTool::new(scene.clone())),
        Arc::new(ReadConsoleTool::new(scene)),
    ]
}
