//! Referee-side handle to one player program for the duration of one match.
//!
//! A [`PlayerSlot`] owns the spawned process and both ends of its pipes. It never returns
//! errors to the match: anything that goes wrong is recorded as a [`Failure`] on the slot,
//! and a failed slot stays failed until the match ends.
//!
//! Slots are released by [`PlayerSlot::shutdown`], which is also run on drop, so a match that
//! exits early (or panics) never leaves an orphaned player behind.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use tracing::{debug, instrument, trace, warn};

use crate::configuration::MessageSink;

/// Sent to the first mover before its first turn.
pub const START: &str = "Start";
/// Sent to both players once the game is over.
pub const QUIT: &str = "Quit";

/// Why a player was disqualified from choosing its own moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The program could not be resolved or started, or its pipes could not be created.
    Spawn(String),
    /// The pipe was closed or returned an error while waiting for a move.
    Read(String),
    /// The line sent by the player is not a move.
    Parse(String),
    /// The move is well-formed but the rules reject it.
    IllegalMove(String),
    /// The opponent's move could not be delivered to this player.
    Write(String),
}

impl Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Spawn(e) => write!(f, "could not run: {e}"),
            Failure::Read(e) => write!(f, "failed to read: {e}"),
            Failure::Parse(line) => write!(f, "could not parse move: {line}"),
            Failure::IllegalMove(line) => write!(f, "invalid move: {line}"),
            Failure::Write(e) => write!(f, "could not write: {e}"),
        }
    }
}

/// One side of a match.
pub struct PlayerSlot {
    command: String,
    process: Option<Child>,
    input: Option<Box<dyn Write>>,
    output: Option<Box<dyn BufRead>>,
    failure: Option<Failure>,
    elapsed: Duration,
    shut_down: bool,
}

impl std::fmt::Debug for PlayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerSlot")
            .field("command", &self.command)
            .field("pid", &self.process.as_ref().map(Child::id))
            .field("failure", &self.failure)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

impl PlayerSlot {
    /// Launch `command` with piped stdin/stdout and stderr sent to `messages`.
    ///
    /// Never fails: if the program cannot be started the slot is returned already failed.
    #[instrument(skip(messages))]
    pub fn spawn(command: &str, messages: MessageSink) -> PlayerSlot {
        match spawn_process(command, messages) {
            Ok(mut child) => {
                let input = child.stdin.take();
                let output = child.stdout.take();
                match (input, output) {
                    (Some(input), Some(output)) => {
                        debug!(pid = child.id(), "player started");
                        let mut slot = PlayerSlot::from_streams(
                            command,
                            BufReader::new(output),
                            input,
                        );
                        slot.process = Some(child);
                        slot
                    }
                    _ => {
                        let _ = child.kill();
                        let _ = child.wait();
                        PlayerSlot::failed(command, Failure::Spawn("missing pipe".to_owned()))
                    }
                }
            }
            Err(e) => PlayerSlot::failed(command, Failure::Spawn(format!("{e:#}"))),
        }
    }

    /// A slot talking over arbitrary streams instead of a child process.
    pub fn from_streams(
        command: &str,
        output: impl BufRead + 'static,
        input: impl Write + 'static,
    ) -> PlayerSlot {
        PlayerSlot {
            command: command.to_owned(),
            process: None,
            input: Some(Box::new(input)),
            output: Some(Box::new(output)),
            failure: None,
            elapsed: Duration::ZERO,
            shut_down: false,
        }
    }

    /// A slot whose program never ran.
    pub fn failed(command: &str, failure: Failure) -> PlayerSlot {
        warn!("Couldn't run '{command}': {failure}");
        PlayerSlot {
            command: command.to_owned(),
            process: None,
            input: None,
            output: None,
            failure: Some(failure),
            elapsed: Duration::ZERO,
            shut_down: true,
        }
    }

    /// Command line this slot was launched with.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// True once the slot has failed. Never reset during a match.
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// First failure recorded on this slot.
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// Wall-clock time spent waiting for this player's moves.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Record a failure. Only the first one is kept.
    pub fn mark_failed(&mut self, failure: Failure) {
        warn!(command = %self.command, "{failure}");
        if self.failure.is_none() {
            self.failure = Some(failure);
        }
    }

    /// Write one line to the player. On error this slot (the recipient) is marked failed.
    pub fn send(&mut self, line: &str) {
        trace!(command = %self.command, line, "send");
        if let Err(e) = self.write_line(line) {
            self.mark_failed(Failure::Write(format!("{e:#}")));
        }
    }

    /// Wait for one line from the player, without its terminator.
    ///
    /// The time spent blocked is added to [`elapsed`](Self::elapsed) whatever the outcome.
    /// Returns `None` and marks the slot failed if the pipe is closed or broken.
    pub fn receive(&mut self) -> Option<String> {
        let start = Instant::now();
        let res = self.read_line();
        self.elapsed += start.elapsed();
        match res {
            Ok(line) => {
                trace!(command = %self.command, %line, "receive");
                Some(line)
            }
            Err(e) => {
                self.mark_failed(Failure::Read(format!("{e:#}")));
                None
            }
        }
    }

    /// Send [`QUIT`], close the player's stdin and wait for it to exit.
    ///
    /// Write errors are ignored at this point: the match is over. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.close_input();
        self.wait();
    }

    /// First half of [`shutdown`](Self::shutdown), so both players of a match can be told to
    /// quit before either is awaited.
    pub(crate) fn close_input(&mut self) {
        if self.input.is_some() {
            if let Err(e) = self.write_line(QUIT) {
                debug!(command = %self.command, "could not send {QUIT}: {e:#}");
            }
            self.input = None;
        }
    }

    pub(crate) fn wait(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.output = None;
        if let Some(mut child) = self.process.take() {
            match child.wait() {
                Ok(status) => debug!(command = %self.command, %status, "player exited"),
                Err(e) => warn!(command = %self.command, "could not wait for player: {e}"),
            }
        }
    }

    fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        let input = self.input.as_mut().context("input already closed")?;
        let mut msg = String::with_capacity(line.len() + 1);
        msg.push_str(line);
        msg.push('\n');
        input
            .write_all(msg.as_bytes())
            .context("I/O error while sending line")?;
        input.flush().context("I/O error while flushing")?;
        Ok(())
    }

    fn read_line(&mut self) -> anyhow::Result<String> {
        let output = self.output.as_mut().context("output already closed")?;
        let mut line = String::new();
        output
            .read_line(&mut line)
            .context("error while reading stream")?;
        if line.is_empty() {
            return Err(anyhow!("connection closed by player"));
        }
        let Some(stripped) = line.strip_suffix('\n') else {
            return Err(anyhow!("unexpected end of stream after {line:?}"));
        };
        Ok(stripped.strip_suffix('\r').unwrap_or(stripped).to_owned())
    }
}

impl Drop for PlayerSlot {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_process(command: &str, messages: MessageSink) -> anyhow::Result<Child> {
    let mut argv = command.split_whitespace();
    let program = argv.next().context("empty command")?;

    let stderr = match messages {
        MessageSink::Discard => Stdio::null(),
        MessageSink::Inherit => Stdio::inherit(),
        MessageSink::File(path) => match File::create(&path) {
            Ok(file) => Stdio::from(file),
            Err(e) => {
                warn!("could not create '{}': {e}", path.display());
                Stdio::inherit()
            }
        },
    };

    Command::new(program)
        .args(argv)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(stderr)
        .spawn()
        .with_context(|| format!("command '{program}' not found"))
}

/// Creates the slots of a match.
///
/// [`ProcessLauncher`] starts real programs; other implementations may hand out slots built
/// with [`PlayerSlot::from_streams`].
pub trait Launcher {
    /// Create the slot for `command`. Failures are recorded on the returned slot.
    fn launch(&mut self, command: &str, messages: MessageSink) -> PlayerSlot;
}

/// Launches each player as a fresh child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, command: &str, messages: MessageSink) -> PlayerSlot {
        PlayerSlot::spawn(command, messages)
    }
}
