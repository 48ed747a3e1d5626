//! Halted-thread resolution.
//!
//! The server may halt or resume threads between any two calls (other
//! clients share the sandbox), so a thread id is never cached: every
//! operation that needs "the current position" resolves it fresh. The
//! selection itself is a pure function over the thread list, kept free of
//! I/O so it can be tested directly.

use crate::error::ClientError;
use crate::protocol::{decode, ScriptThread, ThreadsBody};
use crate::session::DebuggerClient;
use crate::transport::{ProtocolRequest, Verb};

/// Thread status string the server uses for paused threads.
const HALTED: &str = "halted";

/// The position of a halted thread: its id plus the frame-0 location.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadLocation {
    pub thread_id: u64,
    pub script_path: String,
    /// 1-based line number.
    pub line_number: u32,
}

/// Pick "the" halted thread from a server thread list.
///
/// Deterministic tie-break: the first thread in server response order whose
/// status is `halted`. The protocol does not guarantee single-thread halts,
/// so this is an explicit choice, not a smart one. A thread reported halted
/// without any call stack is skipped; there is no position to inspect on it.
pub fn select_halted_thread(threads: &[ScriptThread]) -> Option<ThreadLocation> {
    threads
        .iter()
        .filter(|t| t.status == HALTED)
        .find_map(|t| {
            let frame = t.call_stack.as_ref()?.first()?;
            Some(ThreadLocation {
                thread_id: t.id,
                script_path: frame.location.script_path.clone(),
                line_number: frame.location.line_number,
            })
        })
}

impl DebuggerClient {
    /// Query the full thread list and resolve the currently halted thread.
    ///
    /// `Ok(None)` means no thread is halted. The session's `halted` flag is
    /// recomputed from this resolution alone, never left sticky from an
    /// earlier one.
    pub async fn resolve_halted_thread(&mut self) -> Result<Option<ThreadLocation>, ClientError> {
        let body = self
            .request(ProtocolRequest::new(Verb::Get, "/threads"))
            .await?
            .ok_or_else(|| ClientError::MalformedResponse("empty threads response".into()))?;
        let body: ThreadsBody = decode(body)?;
        let selected = select_halted_thread(body.script_threads.as_deref().unwrap_or_default());
        self.set_halted(selected.is_some());
        Ok(selected)
    }

    /// Resolve the halted thread, failing with [`ClientError::NotHalted`]
    /// when there is none. Every inspection and execution-control operation
    /// starts here, so none of them can act on a stale thread id.
    pub(crate) async fn require_halted_thread(&mut self) -> Result<ThreadLocation, ClientError> {
        self.resolve_halted_thread()
            .await?
            .ok_or(ClientError::NotHalted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ScriptLocation, StackFrame};
    use crate::testutil;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn thread(id: u64, status: &str, frames: Option<Vec<(&str, u32)>>) -> ScriptThread {
        ScriptThread {
            id,
            status: status.to_string(),
            call_stack: frames.map(|fs| {
                fs.into_iter()
                    .map(|(script, line)| StackFrame {
                        location: ScriptLocation {
                            script_path: script.to_string(),
                            line_number: line,
                        },
                    })
                    .collect()
            }),
        }
    }

    #[test]
    fn select_returns_none_for_empty_list() {
        assert_eq!(select_halted_thread(&[]), None);
    }

    #[test]
    fn select_returns_none_when_all_running() {
        let threads = vec![thread(1, "running", None), thread(2, "running", None)];
        assert_eq!(select_halted_thread(&threads), None);
    }

    #[test]
    fn select_picks_first_halted_in_response_order() {
        let threads = vec![
            thread(7, "running", None),
            thread(3, "halted", Some(vec![("/first.js", 10), ("/caller.js", 2)])),
            thread(5, "halted", Some(vec![("/second.js", 99)])),
        ];
        let location = select_halted_thread(&threads).unwrap();
        assert_eq!(location.thread_id, 3);
        assert_eq!(location.script_path, "/first.js");
        assert_eq!(location.line_number, 10);
    }

    #[test]
    fn select_is_deterministic_across_calls() {
        let threads = vec![
            thread(4, "halted", Some(vec![("/a.js", 1)])),
            thread(2, "halted", Some(vec![("/b.js", 2)])),
        ];
        let first = select_halted_thread(&threads).unwrap();
        for _ in 0..10 {
            assert_eq!(select_halted_thread(&threads).unwrap(), first);
        }
    }

    #[test]
    fn select_skips_halted_thread_without_call_stack() {
        let threads = vec![
            thread(1, "halted", None),
            thread(2, "halted", Some(vec![("/real.js", 5)])),
        ];
        let location = select_halted_thread(&threads).unwrap();
        assert_eq!(location.thread_id, 2);
    }

    #[test]
    fn select_uses_frame_zero_only() {
        let threads = vec![thread(
            1,
            "halted",
            Some(vec![("/inner.js", 42), ("/outer.js", 7)]),
        )];
        let location = select_halted_thread(&threads).unwrap();
        assert_eq!(location.script_path, "/inner.js");
        assert_eq!(location.line_number, 42);
    }

    #[tokio::test]
    async fn resolve_sets_halted_from_latest_resolution_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "script_threads": [
                    {"id": 1, "status": "halted",
                     "call_stack": [{"location": {"script_path": "/a.js", "line_number": 3}}]}
                ]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let mut client = testutil::client_for(&server);
        client.mark_connected();
        let resolved = client.resolve_halted_thread().await.unwrap().unwrap();
        assert_eq!(resolved.thread_id, 1);
        assert!(client.is_halted());

        // The thread resumed in the meantime; the flag must not stay sticky.
        Mock::given(method("GET"))
            .and(path("/threads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "script_threads": [{"id": 1, "status": "running"}]
            })))
            .mount(&server)
            .await;
        let resolved = client.resolve_halted_thread().await.unwrap();
        assert!(resolved.is_none());
        assert!(!client.is_halted());
    }

    #[tokio::test]
    async fn resolve_treats_missing_thread_list_as_not_halted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/threads"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"_v": "2.0"})),
            )
            .mount(&server)
            .await;

        let mut client = testutil::client_for(&server);
        client.mark_connected();
        let resolved = client.resolve_halted_thread().await.unwrap();
        assert!(resolved.is_none());
        assert!(!client.is_halted());
    }

    #[tokio::test]
    async fn resolve_requires_connection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut client = testutil::client_for(&server);
        let err = client.resolve_halted_thread().await.unwrap_err();
        assert!(matches!(err, ClientError::NotConnected));
    }
}
