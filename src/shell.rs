//! The interactive debugger shell.
//!
//! One command at a time: each input line is parsed, executed against the
//! session client, and answered before the next prompt. Execution is
//! separated from the read loop so tests can drive commands directly.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use sdbg_client::{BreakpointRecord, BreakpointRequest, DebuggerClient, StepOutcome, ThreadLocation};
use sdbg_workspace::{source_context, to_server_path, WorkspaceIndex, DEFAULT_RADIUS};

use crate::command::{parse_command, Command};
use crate::state;

/// What a command produced: lines to print, and whether to leave the shell.
#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Outcome {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }

    fn lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }
}

/// Shell state: the session client plus the local workspace view.
pub struct Shell {
    client: DebuggerClient,
    index: WorkspaceIndex,
    roots: Vec<PathBuf>,
    host: String,
}

impl Shell {
    pub fn new(
        client: DebuggerClient,
        index: WorkspaceIndex,
        roots: Vec<PathBuf>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            client,
            index,
            roots,
            host: host.into(),
        }
    }

    /// Read-execute-print loop over stdin. Exits on `quit` or end of input.
    pub async fn run(&mut self, connect_now: bool) -> Result<()> {
        if connect_now {
            match self.execute(Command::Connect).await {
                Ok(outcome) => print_lines(&outcome),
                Err(e) => println!("error: {e:#}"),
            }
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        prompt()?;
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                prompt()?;
                continue;
            }
            match parse_command(line) {
                Ok(command) => match self.execute(command).await {
                    Ok(outcome) => {
                        print_lines(&outcome);
                        if outcome.quit {
                            return Ok(());
                        }
                    }
                    Err(e) => println!("error: {e:#}"),
                },
                Err(e) => println!("error: {e}"),
            }
            prompt()?;
        }

        // End of input behaves like `quit`.
        self.detach_if_connected().await;
        Ok(())
    }

    /// Execute one command against the session.
    pub async fn execute(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Connect => {
                self.client.create().await?;
                Ok(Outcome::line(format!("attached to {}", self.host)))
            }
            Command::Disconnect => {
                self.client.delete().await?;
                Ok(Outcome::line("detached"))
            }
            Command::SetBreakpoint { line, script } => {
                let record = self.create_breakpoint(line, script).await?;
                Ok(Outcome::line(describe_breakpoint(&record)))
            }
            Command::BreakResume { line, script } => {
                let record = self.create_breakpoint(line, script).await?;
                let mut lines = vec![describe_breakpoint(&record)];
                lines.push(describe_step(self.client.resume().await?));
                Ok(Outcome::lines(lines))
            }
            Command::TempBreak { line, script } => self.temp_break(line, script).await,
            Command::ListBreakpoints => {
                let breakpoints = self.client.breakpoints().await?;
                if breakpoints.is_empty() {
                    return Ok(Outcome::line("no breakpoints set"));
                }
                Ok(Outcome::lines(
                    breakpoints
                        .iter()
                        .map(|bp| {
                            let id = bp
                                .id
                                .map(|id| id.to_string())
                                .unwrap_or_else(|| "-".to_string());
                            format!("{id:>4}  {}:{}", bp.script_path, bp.line_number)
                        })
                        .collect(),
                ))
            }
            Command::DeleteBreakpoint { id } => {
                self.client.delete_breakpoints(id.as_deref()).await?;
                Ok(Outcome::line(match id {
                    Some(id) => format!("deleted breakpoint {id}"),
                    None => "deleted all breakpoints".to_string(),
                }))
            }
            Command::CurrentThread => {
                Ok(Outcome::line(match self.client.resolve_halted_thread().await? {
                    Some(location) => describe_location(&location),
                    None => "no thread halted".to_string(),
                }))
            }
            Command::Variables => {
                let variables = self.client.variables().await?;
                if variables.is_empty() {
                    return Ok(Outcome::line("no variables in scope"));
                }
                Ok(Outcome::lines(
                    variables
                        .iter()
                        .map(|v| format!("{}: {} = {}", v.name, v.var_type, v.value))
                        .collect(),
                ))
            }
            Command::Members { object_path, max } => {
                let members = self.client.members(&object_path, max).await?;
                if members.is_empty() {
                    return Ok(Outcome::line(format!("{object_path} has no members")));
                }
                Ok(Outcome::lines(
                    members
                        .iter()
                        .map(|m| format!("{}: {} = {}", m.name, m.var_type, m.value))
                        .collect(),
                ))
            }
            Command::Eval { expression } => {
                Ok(Outcome::line(self.client.evaluate(&expression).await?))
            }
            Command::StepOver => Ok(Outcome::line(describe_step(self.client.step_over().await?))),
            Command::StepInto => Ok(Outcome::line(describe_step(self.client.step_into().await?))),
            Command::StepOut => Ok(Outcome::line(describe_step(self.client.step_out().await?))),
            Command::Resume => Ok(Outcome::line(describe_step(self.client.resume().await?))),
            Command::List { radius } => self.list_source(radius).await,
            Command::Save { path } => {
                let path = state_path(path);
                let breakpoints: Vec<BreakpointRequest> = self
                    .client
                    .breakpoints()
                    .await?
                    .into_iter()
                    .map(|bp| BreakpointRequest {
                        script_path: bp.script_path,
                        line_number: bp.line_number,
                    })
                    .collect();
                state::save_breakpoints(&path, &breakpoints)?;
                Ok(Outcome::line(format!(
                    "saved {} breakpoint(s) to {}",
                    breakpoints.len(),
                    path.display()
                )))
            }
            Command::Restore { path } => {
                let path = state_path(path);
                let breakpoints = state::load_breakpoints(&path)?;
                if breakpoints.is_empty() {
                    return Ok(Outcome::line(format!(
                        "{} holds no breakpoints",
                        path.display()
                    )));
                }
                let records = self.client.set_breakpoints(&breakpoints).await?;
                Ok(Outcome::line(format!(
                    "restored {} breakpoint(s) from {}",
                    records.len(),
                    path.display()
                )))
            }
            Command::Help => Ok(Outcome::lines(help_lines())),
            Command::Quit => {
                self.detach_if_connected().await;
                Ok(Outcome {
                    lines: vec!["bye".to_string()],
                    quit: true,
                })
            }
        }
    }

    /// Set one breakpoint, falling back to the current script when none is
    /// named, and return the server-confirmed record.
    async fn create_breakpoint(
        &mut self,
        line: u32,
        script: Option<String>,
    ) -> Result<BreakpointRecord> {
        let script_path = match script {
            Some(script) => self.resolve_script(&script)?,
            None => {
                let location = self
                    .client
                    .resolve_halted_thread()
                    .await?
                    .ok_or_else(|| anyhow!("no script named and no thread halted"))?;
                location.script_path
            }
        };
        let mut records = self
            .client
            .set_breakpoints(&[BreakpointRequest {
                script_path,
                line_number: line,
            }])
            .await?;
        if records.is_empty() {
            bail!("server confirmed no breakpoint");
        }
        Ok(records.remove(0))
    }

    /// One-shot breakpoint: set it, resume to it, then remove it without
    /// reporting the removal.
    async fn temp_break(&mut self, line: u32, script: Option<String>) -> Result<Outcome> {
        let record = self.create_breakpoint(line, script).await?;
        let halted = describe_step(self.client.resume().await?);
        if let Some(id) = record.id {
            // Cleanup stays silent; a failure here leaves a stray
            // breakpoint, which `list-breakpoints` will still show.
            if let Err(e) = self.client.delete_breakpoints(Some(&id.to_string())).await {
                debug!("silent delete of temp breakpoint {id} failed: {e}");
            }
        }
        Ok(Outcome::line(halted))
    }

    /// Print source lines around the halt position.
    async fn list_source(&mut self, radius: Option<u32>) -> Result<Outcome> {
        let location = self
            .client
            .resolve_halted_thread()
            .await?
            .ok_or_else(|| anyhow!("no thread halted"))?;
        let local = self
            .index
            .resolve(&location.script_path)
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                anyhow!("no workspace file matches '{}'", location.script_path)
            })?;
        let context = source_context(&local, location.line_number, radius.unwrap_or(DEFAULT_RADIUS))
            .with_context(|| format!("list {}", local.display()))?;
        let mut lines = vec![describe_location(&location)];
        lines.extend(context.lines.iter().map(|l| {
            let marker = if l.current { "-->" } else { "   " };
            format!("{marker} {:>4}  {}", l.number, l.text)
        }));
        Ok(Outcome::lines(lines))
    }

    /// Turn a user-supplied script argument into a server-absolute path.
    ///
    /// Workspace matches win, so a partial local name works; an unmatched
    /// `/`-rooted path is passed through for scripts not checked out
    /// locally.
    fn resolve_script(&self, script: &str) -> Result<String> {
        if let Some(local) = self.index.resolve(script) {
            let local = local.to_path_buf();
            let root = self
                .roots
                .iter()
                .find(|root| local.starts_with(root))
                .cloned()
                .unwrap_or_default();
            return Ok(to_server_path(&local, &root));
        }
        if script.starts_with('/') {
            return Ok(script.to_string());
        }
        bail!("no workspace file matches '{script}'");
    }

    async fn detach_if_connected(&mut self) {
        if self.client.is_connected() {
            if let Err(e) = self.client.delete().await {
                warn!("detach on exit failed: {e}");
            }
        }
    }
}

fn describe_breakpoint(record: &BreakpointRecord) -> String {
    let id = record
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "breakpoint {id} at {}:{}",
        record.script_path, record.line_number
    )
}

fn describe_location(location: &ThreadLocation) -> String {
    format!(
        "halted at {}:{} (thread {})",
        location.script_path, location.line_number, location.thread_id
    )
}

fn describe_step(outcome: Option<StepOutcome>) -> String {
    match outcome {
        Some(outcome) => format!("halted at {}:{}", outcome.script_path, outcome.line_number),
        None => "running".to_string(),
    }
}

fn state_path(path: Option<String>) -> PathBuf {
    path.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(state::DEFAULT_STATE_FILE))
}

fn help_lines() -> Vec<String> {
    [
        "connect                       attach a debugger client",
        "disconnect                    detach, releasing breakpoints",
        "sb LINE[,SCRIPT]              set a breakpoint",
        "br LINE[,SCRIPT]              set a breakpoint and resume to it",
        "tb LINE[,SCRIPT]              one-shot breakpoint",
        "lb                            list breakpoints",
        "db [ID]                       delete one breakpoint, or all",
        "ct                            show the halted position",
        "v                             list frame variables",
        "m OBJECT_PATH[,MAX]           list object members",
        "e EXPRESSION                  evaluate in the halted frame",
        "n / i / o                     step over / into / out",
        "r                             resume",
        "l [RADIUS]                    show source around the halt",
        "save [FILE]                   save breakpoints to JSON",
        "restore [FILE]                restore breakpoints from JSON",
        "q                             detach and quit",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn prompt() -> Result<()> {
    print!("sdbg> ");
    std::io::stdout().flush()?;
    Ok(())
}

fn print_lines(outcome: &Outcome) {
    for line in &outcome.lines {
        println!("{line}");
    }
}
