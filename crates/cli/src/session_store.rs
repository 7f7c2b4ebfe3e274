//! Session persistence: a JSON array of whole-session snapshots.
//!
//! The file format is shared with the UI layer, which reads and writes it
//! wholesale. Saving always rewrites the full array.

use std::path::Path;

use anyhow::Context;
use scenepilot_core::session::Session;

/// Load every session from a store file. A missing file is an empty store.
pub fn load(path: &Path) -> anyhow::Result<Vec<Session>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session store {}", path.display()))?;
    let sessions: Vec<Session> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse session store {}", path.display()))?;
    Ok(sessions)
}

/// Write the full session array back to disk.
pub fn save(path: &Path, sessions: &[Session]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(sessions)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write session store {}", path.display()))?;
    Ok(())
}

/// Replace the session with a matching id, or append it.
pub fn upsert(sessions: &mut Vec<Session>, session: Session) {
    match sessions.iter_mut().find(|s| s.id == session.id) {
        Some(existing) => *existing = session,
        None => sessions.push(session),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenepilot_core::message::Message;

    #[test]
    fn missing_file_is_empty_store() {
        let sessions = load(Path::new("/nonexistent/sessions.json")).unwrap();
        assert!(sessions.is_empty());
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        let mut session = Session::new("Scene edits");
        session.append(Message::user("create a cube"));
        save(&path, &[session.clone()]).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, session.id);
        assert_eq!(loaded[0].len(), 1);

        // On-disk shape uses the shared field names.
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("chatId"));
        assert!(raw.contains("chatName"));
        assert!(raw.contains("createdTime"));
    }

    #[test]
    fn upsert_replaces_by_id() {
        let mut sessions = Vec::new();
        let mut session = Session::new("first");
        upsert(&mut sessions, session.clone());
        session.append(Message::user("more"));
        upsert(&mut sessions, session);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].len(), 1);
    }
}
