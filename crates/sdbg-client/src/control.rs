//! Execution control: step over/into/out and resume.
//!
//! All four operations share one shape: resolve the halted thread, `POST`
//! the operation on it, and report where execution halted next (if
//! anywhere). A stepped thread may halt at a new location, run to
//! completion, or — for resume — immediately halt again on another
//! breakpoint; the next resolution decides, not this call.

use crate::error::ClientError;
use crate::protocol::{decode, ScriptThread};
use crate::session::DebuggerClient;
use crate::transport::{ProtocolRequest, Verb};

/// The four thread-scoped execution-control operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOperation {
    /// Step over the current line.
    Over,
    /// Step into the function at the current line.
    Into,
    /// Step out to the parent frame.
    Out,
    /// Resume until the next breakpoint (or completion).
    Resume,
}

impl StepOperation {
    /// The path segment of `POST /threads/{id}/{segment}`.
    fn path_segment(self) -> &'static str {
        match self {
            StepOperation::Over => "over",
            StepOperation::Into => "into",
            StepOperation::Out => "out",
            StepOperation::Resume => "resume",
        }
    }
}

/// Where execution halted after a control operation.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub script_path: String,
    /// 1-based line number.
    pub line_number: u32,
}

impl DebuggerClient {
    /// Step over the current line of the halted thread.
    pub async fn step_over(&mut self) -> Result<Option<StepOutcome>, ClientError> {
        self.execute_step(StepOperation::Over).await
    }

    /// Step into the function at the current line.
    pub async fn step_into(&mut self) -> Result<Option<StepOutcome>, ClientError> {
        self.execute_step(StepOperation::Into).await
    }

    /// Step out of the current frame.
    pub async fn step_out(&mut self) -> Result<Option<StepOutcome>, ClientError> {
        self.execute_step(StepOperation::Out).await
    }

    /// Resume the halted thread.
    ///
    /// Success means only that the resume request went through; the thread
    /// may immediately halt again on another breakpoint. Whatever operation
    /// next resolves the halted thread will observe that.
    pub async fn resume(&mut self) -> Result<Option<StepOutcome>, ClientError> {
        self.execute_step(StepOperation::Resume).await
    }

    async fn execute_step(
        &mut self,
        operation: StepOperation,
    ) -> Result<Option<StepOutcome>, ClientError> {
        let thread = self.require_halted_thread().await?;
        let path = format!("/threads/{}/{}", thread.thread_id, operation.path_segment());
        let response = self.request(ProtocolRequest::new(Verb::Post, path)).await?;

        // No body, or a body without frames: the call stack is exhausted
        // and there is no current position. That is not an error.
        let Some(response) = response else {
            return Ok(None);
        };
        let thread: ScriptThread = decode(response)?;
        Ok(thread
            .call_stack
            .as_ref()
            .and_then(|frames| frames.first())
            .map(|frame| StepOutcome {
                script_path: frame.location.script_path.clone(),
                line_number: frame.location.line_number,
            }))
    }
}
