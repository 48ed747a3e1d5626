//! Script Debugger API wire types.
//!
//! All payloads are snake_case JSON. Optional fields stay `Option` because
//! the server omits them rather than sending empty collections.

use serde::{Deserialize, Serialize};

/// Protocol version, used both in the base path and the `_v` payload field.
pub const PROTOCOL_VERSION: &str = "2_0";

/// Maximum displayed length of a variable value before truncation.
pub const VALUE_PREVIEW_LEN: usize = 50;

/// Marker appended to truncated variable values.
pub const TRUNCATION_MARKER: &str = "....";

/// A breakpoint to be created, as sent to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakpointRequest {
    /// Absolute, `/`-rooted script path on the server.
    pub script_path: String,
    /// 1-based line number.
    pub line_number: u32,
}

/// A breakpoint as reported by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BreakpointRecord {
    /// Server-assigned id. Absent in request echoes that failed to bind.
    pub id: Option<u64>,
    /// Absolute script path.
    pub script_path: String,
    /// 1-based line number.
    pub line_number: u32,
}

/// Body of `POST /breakpoints`.
#[derive(Debug, Clone, Serialize)]
pub struct SetBreakpointsPayload {
    /// Protocol version tag.
    #[serde(rename = "_v")]
    pub version: String,
    /// Breakpoints to create in one batch.
    pub breakpoints: Vec<BreakpointRequest>,
}

impl SetBreakpointsPayload {
    pub fn new(breakpoints: Vec<BreakpointRequest>) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            breakpoints,
        }
    }
}

/// Response body of breakpoint create/list calls.
///
/// The server omits `breakpoints` entirely when none are set.
#[derive(Debug, Clone, Deserialize)]
pub struct BreakpointsBody {
    pub breakpoints: Option<Vec<BreakpointRecord>>,
}

/// A script location within a stack frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptLocation {
    pub script_path: String,
    pub line_number: u32,
}

/// One stack frame of a halted thread.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StackFrame {
    pub location: ScriptLocation,
}

/// A script thread as reported by `GET /threads`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptThread {
    pub id: u64,
    /// `"halted"` or `"running"`.
    pub status: String,
    /// Innermost frame first. Absent for running threads.
    pub call_stack: Option<Vec<StackFrame>>,
}

/// Body of `GET /threads`.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadsBody {
    pub script_threads: Option<Vec<ScriptThread>>,
}

/// A member of a frame scope or of a named object path.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectMember {
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: String,
    pub value: Option<String>,
}

/// Body of the `variables` and `members` calls.
#[derive(Debug, Clone, Deserialize)]
pub struct MembersBody {
    pub object_members: Option<Vec<ObjectMember>>,
}

/// Body of the `eval` call.
#[derive(Debug, Clone, Deserialize)]
pub struct EvalBody {
    pub result: Option<String>,
}

/// A variable prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableEntry {
    pub name: String,
    pub var_type: String,
    /// Display-truncated value, never longer than
    /// [`VALUE_PREVIEW_LEN`] + marker.
    pub value: String,
}

impl VariableEntry {
    /// Build a display entry from a raw member, applying the truncation rule.
    pub fn from_member(member: &ObjectMember) -> Self {
        Self {
            name: member.name.clone(),
            var_type: member.member_type.clone(),
            value: truncate_value(member.value.as_deref().unwrap_or_default()),
        }
    }
}

/// Decode a JSON body into a typed protocol structure.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
) -> Result<T, crate::error::ClientError> {
    serde_json::from_value(value)
        .map_err(|e| crate::error::ClientError::MalformedResponse(e.to_string()))
}

/// Cut a value to [`VALUE_PREVIEW_LEN`] characters plus a trailing marker.
///
/// Display safety only: evaluation results are never passed through this.
pub fn truncate_value(value: &str) -> String {
    if value.chars().count() > VALUE_PREVIEW_LEN {
        let head: String = value.chars().take(VALUE_PREVIEW_LEN).collect();
        format!("{head}{TRUNCATION_MARKER}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_value_short_values_unchanged() {
        assert_eq!(truncate_value(""), "");
        assert_eq!(truncate_value("short"), "short");
        let exactly_fifty = "x".repeat(50);
        assert_eq!(truncate_value(&exactly_fifty), exactly_fifty);
    }

    #[test]
    fn truncate_value_long_values_cut_with_marker() {
        let long = "a".repeat(51);
        let truncated = truncate_value(&long);
        assert_eq!(truncated, format!("{}....", "a".repeat(50)));
    }

    #[test]
    fn truncate_value_counts_chars_not_bytes() {
        let long: String = "é".repeat(60);
        let truncated = truncate_value(&long);
        assert_eq!(truncated, format!("{}....", "é".repeat(50)));
    }

    #[test]
    fn variable_entry_from_member_applies_truncation() {
        let member = ObjectMember {
            name: "basket".into(),
            member_type: "dw.order.Basket".into(),
            value: Some("b".repeat(80)),
        };
        let entry = VariableEntry::from_member(&member);
        assert_eq!(entry.name, "basket");
        assert_eq!(entry.var_type, "dw.order.Basket");
        assert_eq!(entry.value.chars().count(), 54);
        assert!(entry.value.ends_with("...."));
    }

    #[test]
    fn variable_entry_tolerates_absent_value() {
        let member = ObjectMember {
            name: "maybe".into(),
            member_type: "Object".into(),
            value: None,
        };
        let entry = VariableEntry::from_member(&member);
        assert_eq!(entry.value, "");
    }

    #[test]
    fn set_breakpoints_payload_carries_version_tag() {
        let payload = SetBreakpointsPayload::new(vec![BreakpointRequest {
            script_path: "/app/cartridge/controllers/Home.js".into(),
            line_number: 12,
        }]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["_v"], PROTOCOL_VERSION);
        assert_eq!(json["breakpoints"][0]["line_number"], 12);
        assert_eq!(
            json["breakpoints"][0]["script_path"],
            "/app/cartridge/controllers/Home.js"
        );
    }

    #[test]
    fn threads_body_parses_halted_thread() {
        let json = r#"{
            "_v": "2.0",
            "script_threads": [
                {
                    "id": 3,
                    "status": "halted",
                    "call_stack": [
                        {"location": {"function_name": "show()", "line_number": 8, "script_path": "/a.js"}}
                    ]
                }
            ]
        }"#;
        let body: ThreadsBody = serde_json::from_str(json).unwrap();
        let threads = body.script_threads.unwrap();
        assert_eq!(threads[0].id, 3);
        assert_eq!(threads[0].status, "halted");
        let frames = threads[0].call_stack.as_ref().unwrap();
        assert_eq!(frames[0].location.line_number, 8);
        assert_eq!(frames[0].location.script_path, "/a.js");
    }

    #[test]
    fn threads_body_tolerates_missing_thread_list() {
        let body: ThreadsBody = serde_json::from_str(r#"{"_v": "2.0"}"#).unwrap();
        assert!(body.script_threads.is_none());
    }

    #[test]
    fn members_body_parses_typed_members() {
        let json = r#"{
            "object_members": [
                {"name": "render", "type": "Function", "value": "function render()"},
                {"name": "pid", "type": "String", "value": "SKU-1"}
            ]
        }"#;
        let body: MembersBody = serde_json::from_str(json).unwrap();
        let members = body.object_members.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].member_type, "Function");
        assert_eq!(members[1].value.as_deref(), Some("SKU-1"));
    }
}
