//! The in-memory scene graph the built-in tools operate on.
//!
//! Objects are keyed by name and kept in creation order. Every mutation is
//! also recorded on an internal console log so the `read_console` tool can
//! hand recent activity back to the model.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// A single object in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    /// Primitive kind, e.g. "cube", "sphere", "light"
    pub kind: String,
    pub position: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SceneObject {
    /// One-line description used in listings and attachment inlining.
    pub fn describe(&self) -> String {
        let color = self.color.as_deref().unwrap_or("default");
        format!(
            "{} (kind={}, position=({}, {}, {}), color={})",
            self.name, self.kind, self.position[0], self.position[1], self.position[2], color
        )
    }
}

/// The shared scene state. Interior locking keeps tool implementations free
/// of lock plumbing; no await crosses the lock.
#[derive(Default)]
pub struct SceneGraph {
    objects: RwLock<Vec<SceneObject>>,
    console: RwLock<Vec<String>>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object. Fails when the name is already taken.
    pub fn create(&self, object: SceneObject) -> Result<(), String> {
        let mut objects = self.objects.write().expect("scene graph poisoned");
        if objects.iter().any(|o| o.name == object.name) {
            return Err(format!("an object named '{}' already exists", object.name));
        }
        self.log(format!("Created {}", object.describe()));
        objects.push(object);
        Ok(())
    }

    /// Apply partial changes to an existing object.
    pub fn modify(
        &self,
        name: &str,
        position: Option<[f64; 3]>,
        color: Option<String>,
    ) -> Result<SceneObject, String> {
        let mut objects = self.objects.write().expect("scene graph poisoned");
        let object = objects
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| format!("no object named '{name}'"))?;

        if let Some(p) = position {
            object.position = p;
        }
        if let Some(c) = color {
            object.color = Some(c);
        }
        let snapshot = object.clone();
        drop(objects);
        self.log(format!("Modified {}", snapshot.describe()));
        Ok(snapshot)
    }

    /// Remove an object by name.
    pub fn delete(&self, name: &str) -> Result<(), String> {
        let mut objects = self.objects.write().expect("scene graph poisoned");
        let before = objects.len();
        objects.retain(|o| o.name != name);
        if objects.len() == before {
            return Err(format!("no object named '{name}'"));
        }
        self.log(format!("Deleted '{name}'"));
        Ok(())
    }

    /// Snapshot of all objects in creation order.
    pub fn list(&self) -> Vec<SceneObject> {
        self.objects.read().expect("scene graph poisoned").clone()
    }

    pub fn get(&self, name: &str) -> Option<SceneObject> {
        self.objects
            .read()
            .expect("scene graph poisoned")
            .iter()
            .find(|o| o.name == name)
            .cloned()
    }

    /// Record a console line.
    pub fn log(&self, line: impl Into<String>) {
        self.console
            .write()
            .expect("scene console poisoned")
            .push(line.into());
    }

    /// The most recent `limit` console lines, oldest first.
    pub fn console_tail(&self, limit: usize) -> Vec<String> {
        let console = self.console.read().expect("scene console poisoned");
        let start = console.len().saturating_sub(limit);
        console[start..].to_vec()
    }
}
