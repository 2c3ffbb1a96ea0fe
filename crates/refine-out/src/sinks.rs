//! Output sinks: where finished reports go.
use std::cell::RefCell;
use std::io::Write;

use refine_core::{Mention, RefineError};

/// Receives one comment per flagged ticket
pub trait TrackerSink {
    fn post_comment(
        &self,
        ticket_id: &str,
        lines: &[String],
        mention: Option<&Mention>,
    ) -> Result<(), RefineError>;
}

/// Receives the single run-level chat message
pub trait ChatSink {
    fn post_message(&self, text: &str) -> Result<(), RefineError>;
}

impl<T: TrackerSink + ?Sized> TrackerSink for &T {
    fn post_comment(
        &self,
        ticket_id: &str,
        lines: &[String],
        mention: Option<&Mention>,
    ) -> Result<(), RefineError> {
        (**self).post_comment(ticket_id, lines, mention)
    }
}

impl<T: ChatSink + ?Sized> ChatSink for &T {
    fn post_message(&self, text: &str) -> Result<(), RefineError> {
        (**self).post_message(text)
    }
}

/// Prints everything instead of posting (`--dry-run`)
pub struct StdoutSink<W: Write> {
    out: RefCell<W>,
}

impl StdoutSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> StdoutSink<W> {
    pub fn new(out: W) -> Self {
        Self { out: RefCell::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write(&self, text: &str) -> Result<(), RefineError> {
        writeln!(self.out.borrow_mut(), "{}", text)
            .map_err(|e| RefineError::SinkError(format!("Failed to write output: {}", e)))
    }
}

impl<W: Write> TrackerSink for StdoutSink<W> {
    fn post_comment(
        &self,
        ticket_id: &str,
        lines: &[String],
        mention: Option<&Mention>,
    ) -> Result<(), RefineError> {
        let mut text = format!("=== tracker comment for {} ===\n", ticket_id);
        if let Some(mention) = mention {
            text.push_str(&format!("[mention {}]\n", mention.account_id));
        }
        text.push_str(&lines.join("\n"));
        self.write(&text)
    }
}

impl<W: Write> ChatSink for StdoutSink<W> {
    fn post_message(&self, text: &str) -> Result<(), RefineError> {
        self.write(&format!("=== chat message ===\n{}", text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_sink_writes_both_renderings() {
        let sink = StdoutSink::new(Vec::new());
        let mention = Mention {
            display_name: "Ada".to_string(),
            account_id: "acc-1".to_string(),
        };

        sink.post_comment("DEV-1", &["line one".to_string(), String::new()], Some(&mention))
            .unwrap();
        sink.post_message("all done").unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "=== tracker comment for DEV-1 ===\n[mention acc-1]\nline one\n\n=== chat message ===\nall done\n"
        );
    }
}
