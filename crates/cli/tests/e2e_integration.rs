//! End-to-end integration tests: orchestration loop + real scene tools +
//! session persistence, with a scripted transport in place of the network.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use scenepilot_config::AppConfig;
use scenepilot_core::error::ProtocolError;
use scenepilot_core::message::Message;
use scenepilot_core::session::{Attachment, Session};
use scenepilot_core::tool::ToolRegistry;
use scenepilot_orchestrator::{ChatOrchestrator, RunControls, RunOutcome};
use scenepilot_protocol::codec::ChatRequest;
use scenepilot_protocol::ChatTransport;
use scenepilot_tools::{builtin_tools, SceneGraph};

// ── Scripted transport ───────────────────────────────────────────────────

struct ScriptedTransport {
    responses: Mutex<Vec<String>>,
    requests: Mutex<Vec<serde_json::Value>>,
}

impl ScriptedTransport {
    fn new(mut bodies: Vec<String>) -> Self {
        bodies.reverse();
        Self {
            responses: Mutex::new(bodies),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request(&self, index: usize) -> serde_json::Value {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(&self, request: &ChatRequest) -> Result<Vec<u8>, ProtocolError> {
        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(request).unwrap());
        self.responses
            .lock()
            .unwrap()
            .pop()
            .map(String::into_bytes)
            .ok_or_else(|| ProtocolError::Network("script exhausted".into()))
    }
}

fn tool_call_body(call_id: &str, tool: &str, arguments: &str) -> String {
    let args = serde_json::to_string(arguments).unwrap();
    format!(
        r#"{{"id":"r","model":"m","choices":[{{"message":{{"content":null,"tool_calls":[{{"id":"{call_id}","type":"function","function":{{"name":"{tool}","arguments":{args}}}}}]}},"finish_reason":"tool_calls"}}],"usage":{{"prompt_tokens":20,"completion_tokens":10,"total_tokens":30}}}}"#
    )
}

fn stop_body(content: &str) -> String {
    format!(
        r#"{{"id":"r","model":"m","choices":[{{"message":{{"content":"{content}"}},"finish_reason":"stop"}}],"usage":{{"prompt_tokens":30,"completion_tokens":8,"total_tokens":38}}}}"#
    )
}

fn build(transport: Arc<ScriptedTransport>, scene: Arc<SceneGraph>) -> ChatOrchestrator {
    let registry = Arc::new(ToolRegistry::new());
    registry.discover(builtin_tools(scene));
    let config = AppConfig {
        api_key: Some("test".into()),
        ..AppConfig::default()
    };
    ChatOrchestrator::new(transport, registry, &config)
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn red_cube_round_trip_mutates_the_scene() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        tool_call_body(
            "call_1",
            "create_object",
            r#"{"name":"Cube","kind":"cube","x":0,"y":0,"z":0,"color":"red"}"#,
        ),
        stop_body("Done, I created a red cube."),
    ]));
    let scene = Arc::new(SceneGraph::new());
    let orchestrator = build(transport.clone(), scene.clone());

    let mut session = Session::new("scene chat");
    session.append(Message::user("create a red cube at origin"));

    let outcome = orchestrator
        .run(&mut session, RunControls::default())
        .await
        .unwrap();

    // The tool really ran: the scene holds the cube.
    let cube = scene.get("Cube").expect("cube should exist");
    assert_eq!(cube.color.as_deref(), Some("red"));
    assert_eq!(cube.position, [0.0, 0.0, 0.0]);

    // Transcript and totals per the two scripted responses.
    assert_eq!(session.len(), 4);
    assert_eq!(outcome.usage().total_tokens, 68);
    assert!(session.messages()[2].text().contains("Successfully created"));
}

#[tokio::test]
async fn failed_tool_keeps_the_conversation_alive() {
    // Deleting a missing object fails inside the tool; the model still gets
    // a result message and produces a final answer.
    let transport = Arc::new(ScriptedTransport::new(vec![
        tool_call_body("call_1", "delete_object", r#"{"name":"Ghost"}"#),
        stop_body("There is no object called Ghost."),
    ]));
    let scene = Arc::new(SceneGraph::new());
    let orchestrator = build(transport.clone(), scene);

    let mut session = Session::new("scene chat");
    session.append(Message::user("delete Ghost"));

    let outcome = orchestrator
        .run(&mut session, RunControls::default())
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Completed(_)));
    let tool_msg = &session.messages()[2];
    assert!(tool_msg.text().contains("Error executing tool 'delete_object'"));
    assert!(tool_msg.text().contains("no object named 'Ghost'"));
}

#[tokio::test]
async fn attachments_reach_the_wire_but_not_the_log() {
    let transport = Arc::new(ScriptedTransport::new(vec![stop_body("I can see it.")]));
    let scene = Arc::new(SceneGraph::new());
    let orchestrator = build(transport.clone(), scene);

    let mut session = Session::new("scene chat");
    session.append(Message::user("what is selected?"));
    session.attach(Attachment {
        name: "Cube".into(),
        description: "kind=cube position=(1, 2, 3) color=red".into(),
    });

    orchestrator
        .run(&mut session, RunControls::default())
        .await
        .unwrap();

    let sent = transport.request(0);
    let user_content = sent["messages"][0]["content"].as_str().unwrap();
    assert!(user_content.contains("[Attached Objects]"));
    assert!(user_content.contains("Cube"));

    // The stored message stays clean.
    assert_eq!(session.messages()[0].text(), "what is selected?");
}

#[tokio::test]
async fn interrupted_session_survives_persistence_and_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("sessions.json");

    // First run gets through one tool dispatch, then is cancelled before the
    // follow-up request — simulating an interruption mid-conversation.
    {
        let transport = Arc::new(ScriptedTransport::new(vec![tool_call_body(
            "call_1",
            "create_object",
            r#"{"name":"Cube","kind":"cube"}"#,
        )]));
        let scene = Arc::new(SceneGraph::new());
        let orchestrator = build(transport, scene);

        let mut session = Session::new("interrupted");
        session.append(Message::user("create a cube"));

        let polls = std::sync::atomic::AtomicUsize::new(0);
        let cancel = move || polls.fetch_add(1, std::sync::atomic::Ordering::SeqCst) > 0;

        let outcome = orchestrator
            .run(
                &mut session,
                RunControls {
                    cancel: Some(&cancel),
                    checkpoint: None,
                },
            )
            .await
            .unwrap();
        assert!(matches!(outcome, RunOutcome::Cancelled(_)));

        save_store(&store, &[session]);
    }

    // Second run loads the snapshot and finishes without re-executing tools.
    {
        let mut sessions = load_store(&store);
        let mut session = sessions.pop().unwrap();
        assert_eq!(session.len(), 3);

        let transport = Arc::new(ScriptedTransport::new(vec![stop_body("Cube is ready.")]));
        let scene = Arc::new(SceneGraph::new());
        let orchestrator = build(transport.clone(), scene.clone());

        let outcome = orchestrator
            .run(&mut session, RunControls::default())
            .await
            .unwrap();
        assert!(matches!(outcome, RunOutcome::Completed(_)));
        assert_eq!(session.len(), 4);

        // The transcript went out as-is; no tool executed on resume.
        let sent = transport.request(0);
        assert_eq!(sent["messages"].as_array().unwrap().len(), 3);
        assert!(scene.list().is_empty());
    }
}

fn save_store(path: &Path, sessions: &[Session]) {
    std::fs::write(path, serde_json::to_string_pretty(sessions).unwrap()).unwrap();
}

fn load_store(path: &Path) -> Vec<Session> {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
