//! Frame-0 inspection: variables, object members, expression evaluation.
//!
//! Every operation here re-resolves the halted thread first and inspects
//! only the innermost stack frame of it.

use crate::error::ClientError;
use crate::protocol::{decode, EvalBody, MembersBody, VariableEntry};
use crate::session::DebuggerClient;
use crate::transport::{ProtocolRequest, Verb};

/// Member type denoting a callable; functions are not data and are
/// excluded from variable listings.
const FUNCTION_TYPE: &str = "Function";

impl DebuggerClient {
    /// Variables in scope of frame 0 of the halted thread.
    ///
    /// Function members are filtered out and values are display-truncated.
    pub async fn variables(&mut self) -> Result<Vec<VariableEntry>, ClientError> {
        let thread = self.require_halted_thread().await?;
        let path = format!("/threads/{}/frames/0/variables", thread.thread_id);
        self.fetch_members(ProtocolRequest::new(Verb::Get, path))
            .await
    }

    /// Members of a dotted/indexed object path in frame 0.
    ///
    /// When `max_count` is given the result list is cut to that many
    /// entries; otherwise the protocol's natural size applies.
    pub async fn members(
        &mut self,
        object_path: &str,
        max_count: Option<usize>,
    ) -> Result<Vec<VariableEntry>, ClientError> {
        let thread = self.require_halted_thread().await?;
        let path = format!("/threads/{}/frames/0/members", thread.thread_id);
        let mut entries = self
            .fetch_members(
                ProtocolRequest::new(Verb::Get, path).with_query("object_path", object_path),
            )
            .await?;
        if let Some(max) = max_count {
            entries.truncate(max);
        }
        Ok(entries)
    }

    /// Evaluate an expression in frame 0 of the halted thread.
    ///
    /// The expression travels percent-encoded in the query string, and the
    /// result is returned verbatim: evaluation output is shown in full,
    /// unlike variable listings.
    pub async fn evaluate(&mut self, expression: &str) -> Result<String, ClientError> {
        let thread = self.require_halted_thread().await?;
        let path = format!("/threads/{}/frames/0/eval", thread.thread_id);
        let response = self
            .request(ProtocolRequest::new(Verb::Get, path).with_query("expr", expression))
            .await?
            .ok_or_else(|| ClientError::MalformedResponse("empty eval response".into()))?;
        let body: EvalBody = decode(response)?;
        body.result
            .ok_or_else(|| ClientError::MalformedResponse("missing field `result`".into()))
    }

    async fn fetch_members(
        &self,
        request: ProtocolRequest<'_>,
    ) -> Result<Vec<VariableEntry>, ClientError> {
        let response = self
            .request(request)
            .await?
            .ok_or_else(|| ClientError::MalformedResponse("empty members response".into()))?;
        let body: MembersBody = decode(response)?;
        let members = body.object_members.ok_or_else(|| {
            ClientError::MalformedResponse("missing field `object_members`".into())
        })?;
        Ok(members
            .iter()
            .filter(|m| m.member_type != FUNCTION_TYPE)
            .map(VariableEntry::from_member)
            .collect())
    }
}
