//! # Command Execution Module / 命令执行模块
//!
//! Turns configured command lines into processes and captures their combined
//! output.
//!
//! 将配置的命令行转换为进程并捕获其合并输出。

use anyhow::{Result, anyhow};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::infra::t;

/// A command line split into program and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    /// The expanded line, for logs.
    pub display: String,
}

impl CommandLine {
    /// Builds a `tokio` command that is killed if its handle is dropped.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).kill_on_drop(true);
        cmd
    }
}

/// Expands `~` and `$VAR` references, then splits the line with shell quoting
/// rules.
///
/// Variables listed in `vars` take precedence over the process environment.
/// Unknown variables are left untouched so a shell invoked by the command can
/// still resolve them.
///
/// 展开 `~` 和 `$VAR` 引用，然后按 shell 引号规则拆分命令行。
/// `vars` 中的变量优先于进程环境变量；未知变量保持原样。
pub fn parse_command_line(line: &str, vars: &[(&str, &str)]) -> Result<CommandLine> {
    let tilde_expanded = shellexpand::tilde(line);
    let expanded = shellexpand::env_with_context_no_errors(tilde_expanded.as_ref(), |name: &str| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
            .or_else(|| std::env::var(name).ok())
    })
    .into_owned();

    let mut parts = shlex::split(&expanded)
        .ok_or_else(|| anyhow!(t!("command.parse_failed", command = &expanded).to_string()))?
        .into_iter();

    let program = parts
        .next()
        .ok_or_else(|| anyhow!(t!("command.empty").to_string()))?;

    Ok(CommandLine {
        program,
        args: parts.collect(),
        display: expanded,
    })
}

async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(line).is_err() {
            break;
        }
    }
}

/// Spawns a command and captures stdout and stderr as one string, with lines
/// in the order they arrived.
///
/// Returns the exit status (or the spawn error) together with whatever output
/// was captured.
///
/// 派生命令并以到达顺序捕获 stdout 和 stderr 为一个字符串。
pub async fn spawn_and_capture(cmd: Command) -> (std::io::Result<ExitStatus>, String) {
    let mut output = String::new();
    let status = spawn_into(cmd, &mut output).await;
    (status, output)
}

/// Like [`spawn_and_capture`], but appends each line to `output` as soon as it
/// arrives. If the future is dropped early (e.g. by a timeout) `output` keeps
/// everything received so far and the child is killed.
///
/// 与 [`spawn_and_capture`] 相同，但每行一到达就追加到 `output`。
/// 若 future 被提前丢弃（例如超时），`output` 保留已收到的内容，子进程被终止。
pub async fn spawn_into(mut cmd: Command, output: &mut String) -> std::io::Result<ExitStatus> {
    let mut child = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn()?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(std::io::Error::other(t!("command.capture_failed").to_string()));
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let stdout_task = tokio::spawn(forward_lines(stdout, tx.clone()));
    let stderr_task = tokio::spawn(forward_lines(stderr, tx));

    while let Some(line) = rx.recv().await {
        output.push_str(&line);
        output.push('\n');
    }

    let status = child.wait().await;
    let _ = tokio::join!(stdout_task, stderr_task);

    status
}
