//! `scenepilot tools` — list the registered tool catalog.

use std::sync::Arc;

use scenepilot_core::tool::ToolRegistry;
use scenepilot_tools::{builtin_tools, SceneGraph};

pub fn run() -> anyhow::Result<()> {
    let registry = ToolRegistry::new();
    registry.discover(builtin_tools(Arc::new(SceneGraph::new())));

    for spec in registry.definitions() {
        println!("{}", spec.name);
        println!("  {}", spec.description);
        for param in &spec.parameters {
            let required = if spec.required.contains(&param.name) {
                " (required)"
            } else {
                ""
            };
            println!("  - {}{}: {}", param.name, required, param.description);
        }
        println!();
    }

    Ok(())
}
