//! Human-readable transcript for dispatch runs
//!
//! The only output contract is a person reading stdout: a section rule, the
//! attempted provider label, then the reply text or the per-target errors.

use std::io::{self, Write};

use super::dispatch::{DispatchError, DispatchOutcome};

const SECTION_RULE: &str = "#############################################################";

/// Writes the per-section transcript to any `Write` sink
pub struct Transcript<W: Write> {
    out: W,
}

impl Transcript<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> Transcript<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Start a new section: rule line plus title
    pub fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "{SECTION_RULE}")?;
        writeln!(self.out, "{title}")
    }

    /// Print the winning target's label and reply text
    pub fn reply(&mut self, outcome: &DispatchOutcome) -> io::Result<()> {
        writeln!(
            self.out,
            "[{} / {}] answered after {} attempt(s)",
            outcome.provider, outcome.model, outcome.attempts
        )?;
        writeln!(self.out, "{}", outcome.response.text())
    }

    /// Print a dispatch failure, listing per-target errors in order
    pub fn failure(&mut self, error: &DispatchError) -> io::Result<()> {
        writeln!(self.out, "An error occurred: {error}")?;
        if let DispatchError::AllTargetsExhausted { errors } = error {
            for err in errors {
                writeln!(self.out, "  - {err}")?;
            }
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::model::types::{ModelError, ModelResponse};

    fn rendered(transcript: Transcript<Vec<u8>>) -> String {
        String::from_utf8(transcript.into_inner()).expect("utf8 transcript")
    }

    #[test]
    fn section_prints_rule_and_title() {
        let mut transcript = Transcript::new(Vec::new());
        transcript.section("Asking Mistral directly").expect("write");

        let output = rendered(transcript);
        assert!(output.starts_with(SECTION_RULE));
        assert!(output.contains("Asking Mistral directly"));
    }

    #[test]
    fn reply_prints_label_and_text() {
        let mut transcript = Transcript::new(Vec::new());
        let outcome = DispatchOutcome {
            provider: "mistral".to_string(),
            model: "mistral-tiny".to_string(),
            attempts: 2,
            response: ModelResponse::new("A spider has eight legs.".to_string()),
        };
        transcript.reply(&outcome).expect("write");

        let output = rendered(transcript);
        assert!(output.contains("[mistral / mistral-tiny] answered after 2 attempt(s)"));
        assert!(output.contains("A spider has eight legs."));
    }

    #[test]
    fn failure_lists_every_target_error() {
        let mut transcript = Transcript::new(Vec::new());
        let error = DispatchError::AllTargetsExhausted {
            errors: vec![
                crate::application::dispatch::AttemptError::TargetUnavailable {
                    provider: "gw-openai".to_string(),
                    source: ModelError::missing_api_key("gw-openai"),
                },
                crate::application::dispatch::AttemptError::MalformedResponse {
                    provider: "mistral".to_string(),
                    source: ModelError::invalid_response("mistral", "missing content"),
                },
            ],
        };
        transcript.failure(&error).expect("write");

        let output = rendered(transcript);
        assert!(output.contains("An error occurred: all targets failed after 2 attempts"));
        assert!(output.contains("target 'gw-openai' is unavailable"));
        assert!(output.contains("target 'mistral' returned a malformed response"));
    }
}
