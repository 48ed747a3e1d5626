//! Breakpoint operations.

use tracing::debug;

use crate::error::ClientError;
use crate::protocol::{
    decode, BreakpointRecord, BreakpointRequest, BreakpointsBody, SetBreakpointsPayload,
};
use crate::session::DebuggerClient;
use crate::transport::{ProtocolRequest, Verb};

impl DebuggerClient {
    /// Create breakpoints in one batch (`POST /breakpoints`).
    ///
    /// Returns the server-confirmed records, each carrying its assigned id.
    pub async fn set_breakpoints(
        &mut self,
        requests: &[BreakpointRequest],
    ) -> Result<Vec<BreakpointRecord>, ClientError> {
        let payload = SetBreakpointsPayload::new(requests.to_vec());
        let body = serde_json::to_value(&payload)
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let response = self
            .request(ProtocolRequest::new(Verb::Post, "/breakpoints").with_body(body))
            .await?
            .ok_or_else(|| ClientError::MalformedResponse("empty breakpoints response".into()))?;
        let parsed: BreakpointsBody = decode(response)?;
        let records = parsed.breakpoints.ok_or_else(|| {
            ClientError::MalformedResponse("missing field `breakpoints`".into())
        })?;
        debug!("set {} breakpoint(s)", records.len());
        Ok(records)
    }

    /// Fetch all breakpoints currently registered (`GET /breakpoints`).
    ///
    /// An absent `breakpoints` field means none are set, which is a valid
    /// state distinguishable from a transport failure: it yields an empty
    /// list, not an error.
    pub async fn breakpoints(&mut self) -> Result<Vec<BreakpointRecord>, ClientError> {
        let response = self
            .request(ProtocolRequest::new(Verb::Get, "/breakpoints"))
            .await?
            .ok_or_else(|| ClientError::MalformedResponse("empty breakpoints response".into()))?;
        let parsed: BreakpointsBody = decode(response)?;
        Ok(parsed.breakpoints.unwrap_or_default())
    }

    /// Delete one breakpoint by id, or all of them when `id` is `None`.
    pub async fn delete_breakpoints(&mut self, id: Option<&str>) -> Result<(), ClientError> {
        let path = match id {
            Some(id) => format!("/breakpoints/{id}"),
            None => "/breakpoints".to_string(),
        };
        self.request(ProtocolRequest::new(Verb::Delete, path))
            .await
            .map(|_| ())
    }
}
