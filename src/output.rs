//! Diagnostics sinks for user facing warnings and errors.

/// Receives non-fatal diagnostics meant for the user.
///
/// Functions borrow an `Output` only for the duration of a call.
pub trait Output {
    fn warn(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Writes diagnostics to stderr the way the CLI presents them.
#[derive(Debug, Default)]
pub struct StderrOutput;

impl Output for StderrOutput {
    fn warn(&mut self, message: &str) {
        eprintln!("WARN! {}", message);
    }

    fn error(&mut self, message: &str) {
        eprintln!("Error: {}", message);
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default)]
pub struct LogOutput;

impl Output for LogOutput {
    fn warn(&mut self, message: &str) {
        log::warn!("{}", message);
    }

    fn error(&mut self, message: &str) {
        log::error!("{}", message);
    }
}

/// A single recorded diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    Warn(String),
    Error(String),
}

/// Keeps every diagnostic in call order, for tests and for callers that
/// want to decide later how to present them.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    calls: Vec<Diagnostic>,
}

impl RecordingOutput {
    /// All diagnostics in the order they were emitted.
    pub fn calls(&self) -> &[Diagnostic] {
        &self.calls
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|d| match d {
                Diagnostic::Warn(m) => Some(m.as_str()),
                Diagnostic::Error(_) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|d| match d {
                Diagnostic::Error(m) => Some(m.as_str()),
                Diagnostic::Warn(_) => None,
            })
            .collect()
    }

    /// Replays the recorded diagnostics into another sink.
    pub fn replay(&self, output: &mut dyn Output) {
        for d in &self.calls {
            match d {
                Diagnostic::Warn(m) => output.warn(m),
                Diagnostic::Error(m) => output.error(m),
            }
        }
    }
}

impl Output for RecordingOutput {
    fn warn(&mut self, message: &str) {
        self.calls.push(Diagnostic::Warn(message.into()));
    }

    fn error(&mut self, message: &str) {
        self.calls.push(Diagnostic::Error(message.into()));
    }
}
