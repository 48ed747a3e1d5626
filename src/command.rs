//! Parsing of interactive shell input into commands.

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Attach a debugger client on the server.
    Connect,
    /// Detach the client, releasing breakpoints and resuming threads.
    Disconnect,
    /// Set a breakpoint; without a script it lands in the current one.
    SetBreakpoint { line: u32, script: Option<String> },
    /// Set a breakpoint and immediately resume to it.
    BreakResume { line: u32, script: Option<String> },
    /// One-shot breakpoint: set, resume to it, then remove it.
    TempBreak { line: u32, script: Option<String> },
    ListBreakpoints,
    /// Delete one breakpoint by id, or all without an id.
    DeleteBreakpoint { id: Option<String> },
    /// Show where execution is halted.
    CurrentThread,
    /// List frame-0 variables.
    Variables,
    /// List members of an object path, optionally capped.
    Members {
        object_path: String,
        max: Option<usize>,
    },
    /// Evaluate an expression in frame 0.
    Eval { expression: String },
    StepOver,
    StepInto,
    StepOut,
    Resume,
    /// Print source around the halt position, with an optional radius.
    List { radius: Option<u32> },
    /// Save the current breakpoints to a JSON file.
    Save { path: Option<String> },
    /// Restore breakpoints from a JSON file.
    Restore { path: Option<String> },
    Help,
    Quit,
}

/// Parse one input line. Empty input is the caller's problem; this expects
/// at least a command word.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.trim().splitn(2, char::is_whitespace);
    let word = parts.next().unwrap_or_default();
    let rest = parts.next().map(str::trim).unwrap_or_default();

    match word {
        "connect" => no_args(rest, Command::Connect),
        "disconnect" => no_args(rest, Command::Disconnect),
        "sb" | "set-breakpoint" => {
            let (line, script) = parse_breakpoint_arg(rest)?;
            Ok(Command::SetBreakpoint { line, script })
        }
        "br" | "break-resume" => {
            let (line, script) = parse_breakpoint_arg(rest)?;
            Ok(Command::BreakResume { line, script })
        }
        "tb" | "temp-break" => {
            let (line, script) = parse_breakpoint_arg(rest)?;
            Ok(Command::TempBreak { line, script })
        }
        "lb" | "list-breakpoints" => no_args(rest, Command::ListBreakpoints),
        "db" | "delete-breakpoint" => Ok(Command::DeleteBreakpoint {
            id: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "ct" | "current-thread" => no_args(rest, Command::CurrentThread),
        "v" | "variables" => no_args(rest, Command::Variables),
        "m" | "members" => {
            if rest.is_empty() {
                return Err("usage: members OBJECT_PATH[,MAX]".to_string());
            }
            let (object_path, max) = match rest.split_once(',') {
                Some((path, max)) => {
                    let max = max
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| format!("invalid member count: '{}'", max.trim()))?;
                    (path.trim().to_string(), Some(max))
                }
                None => (rest.to_string(), None),
            };
            Ok(Command::Members { object_path, max })
        }
        "e" | "eval" => {
            if rest.is_empty() {
                return Err("usage: eval EXPRESSION".to_string());
            }
            Ok(Command::Eval {
                expression: rest.to_string(),
            })
        }
        "n" | "over" | "step-over" => no_args(rest, Command::StepOver),
        "i" | "into" | "step-into" => no_args(rest, Command::StepInto),
        "o" | "out" | "step-out" => no_args(rest, Command::StepOut),
        "r" | "resume" => no_args(rest, Command::Resume),
        "l" | "list" => {
            let radius = if rest.is_empty() {
                None
            } else {
                Some(
                    rest.parse::<u32>()
                        .map_err(|_| format!("invalid line radius: '{rest}'"))?,
                )
            };
            Ok(Command::List { radius })
        }
        "save" => Ok(Command::Save {
            path: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "restore" => Ok(Command::Restore {
            path: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "h" | "help" | "?" => no_args(rest, Command::Help),
        "q" | "quit" | "exit" => no_args(rest, Command::Quit),
        other => Err(format!("unknown command: '{other}' (try 'help')")),
    }
}

fn no_args(rest: &str, command: Command) -> Result<Command, String> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(format!("unexpected argument: '{rest}'"))
    }
}

/// Parse `LINE[,SCRIPT]` for the breakpoint commands.
fn parse_breakpoint_arg(rest: &str) -> Result<(u32, Option<String>), String> {
    if rest.is_empty() {
        return Err("usage: set-breakpoint LINE[,SCRIPT]".to_string());
    }
    let (line, script) = match rest.split_once(',') {
        Some((line, script)) => (line.trim(), Some(script.trim().to_string())),
        None => (rest, None),
    };
    let line = line
        .parse::<u32>()
        .map_err(|_| format!("invalid line number: '{line}'"))?;
    if line == 0 {
        return Err("line numbers start at 1".to_string());
    }
    Ok((line, script.filter(|s| !s.is_empty())))
}
