//! Audible feedback for a recognized scan.

use std::process::{Command, Stdio};

pub trait Cue {
    fn play(&self);
}

/// No feedback.
pub struct Silent;

impl Cue for Silent {
    fn play(&self) {}
}

/// Runs an external player, e.g. `play -q beep.wav`, and waits for it.
///
/// A failing player is logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct CommandCue {
    program: String,
    args: Vec<String>,
}

impl CommandCue {
    /// `None` for an empty command line.
    pub fn new(argv: Vec<String>) -> Option<Self> {
        let mut argv = argv.into_iter();
        let program = argv.next()?;
        Some(Self {
            program,
            args: argv.collect(),
        })
    }
}

impl Cue for CommandCue {
    fn play(&self) {
        // The player must not read from the scanner stream.
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => {}
            Ok(status) => log::warn!("{} exited with {status}", self.program),
            Err(e) => log::warn!("failed to run {}: {e}", self.program),
        }
    }
}
