use serde::{Deserialize, Serialize};

fn text_plain() -> String {
    "text/plain".into()
}

/// One piece of message content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePart {
    pub content: String,
    #[serde(default = "text_plain")]
    pub content_type: String,
}

/// Message exchanged with an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

impl Message {
    /// Single-part plain text message
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            parts: vec![MessagePart {
                content: content.into(),
                content_type: text_plain(),
            }],
        }
    }

    pub fn first_text(&self) -> Option<&str> {
        self.parts.first().map(|p| p.content.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Sync,
}

/// Body of `POST /runs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunCreateRequest {
    pub agent_name: String,
    pub input: Vec<Message>,
    #[serde(default)]
    pub mode: RunMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

/// Result of a synchronous run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub run_id: String,
    pub agent_name: String,
    pub status: RunStatus,
    #[serde(default)]
    pub output: Vec<Message>,
    #[serde(default)]
    pub error: Option<RunError>,
}

impl Run {
    /// First part of the first output message
    pub fn first_text(&self) -> Option<&str> {
        self.output.first().and_then(Message::first_text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `GET /agents`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentList {
    pub agents: Vec<AgentManifest>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_run_request_wire_format() {
        let request = RunCreateRequest {
            agent_name: "marketing_planner".into(),
            input: vec![Message::text("hello")],
            mode: RunMode::Sync,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "agent_name": "marketing_planner",
                "input": [{ "parts": [{ "content": "hello", "content_type": "text/plain" }] }],
                "mode": "sync"
            })
        );
    }

    #[test]
    fn test_run_request_mode_defaults_to_sync() {
        let request: RunCreateRequest = serde_json::from_value(json!({
            "agent_name": "blog_writer",
            "input": [{ "parts": [{ "content": "plan" }] }]
        }))
        .unwrap();

        assert_eq!(request.mode, RunMode::Sync);
        assert_eq!(request.input[0].parts[0].content_type, "text/plain");
    }

    #[test]
    fn test_run_first_text() {
        let run: Run = serde_json::from_value(json!({
            "run_id": "r1",
            "agent_name": "blog_writer",
            "status": "completed",
            "output": [{ "parts": [{ "content": "draft" }, { "content": "ignored" }] }]
        }))
        .unwrap();
        assert_eq!(run.first_text(), Some("draft"));
        assert!(run.error.is_none());

        let empty: Run = serde_json::from_value(json!({
            "run_id": "r2",
            "agent_name": "blog_writer",
            "status": "completed",
            "output": [{ "parts": [] }]
        }))
        .unwrap();
        assert_eq!(empty.first_text(), None);
    }

    #[test]
    fn test_failed_run_deserialization() {
        let run: Run = serde_json::from_value(json!({
            "run_id": "r3",
            "agent_name": "supervisor_agent",
            "status": "failed",
            "error": { "code": "agent_error", "message": "rate limit exceeded" }
        }))
        .unwrap();

        assert_eq!(run.status, RunStatus::Failed);
        assert!(run.output.is_empty());
        assert_eq!(run.error.unwrap().message, "rate limit exceeded");
    }
}
