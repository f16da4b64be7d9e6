//! Outbound side: where resolved instructions go

use std::io::Write;
use std::sync::Mutex;

use crate::core::error::{ActError, Result};
use crate::core::types::PublishInstruction;

/// Capability to put one instruction on the bus
pub trait Publisher {
    fn publish(&self, instruction: &PublishInstruction) -> Result<()>;
}

/// Output format for [`WriterPublisher`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Writes instructions to a stream instead of a broker, used for dry runs
pub struct WriterPublisher<W: Write> {
    out: Mutex<W>,
    format: OutputFormat,
}

impl<W: Write> WriterPublisher<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out: Mutex::new(out),
            format,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WriterPublisher<std::io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(std::io::stdout(), format)
    }
}

impl<W: Write> Publisher for WriterPublisher<W> {
    fn publish(&self, instruction: &PublishInstruction) -> Result<()> {
        let line = match self.format {
            OutputFormat::Text => instruction.to_string(),
            OutputFormat::Json => serde_json::to_string(instruction)?,
        };

        let mut out = self
            .out
            .lock()
            .map_err(|_| ActError::Publish("output lock poisoned".into()))?;
        writeln!(out, "{}", line).map_err(|e| ActError::Publish(e.to_string()))?;

        tracing::debug!(
            exchange = %instruction.exchange,
            topic = %instruction.topic,
            "published"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_output() {
        let publisher = WriterPublisher::new(Vec::new(), OutputFormat::Text);
        publisher
            .publish(&PublishInstruction::new("act_mpd", "subraum", "stop"))
            .unwrap();

        let written = String::from_utf8(publisher.into_inner()).unwrap();
        assert_eq!(written, "act_mpd [subraum] stop\n");
    }

    #[test]
    fn test_json_output() {
        let publisher = WriterPublisher::new(Vec::new(), OutputFormat::Json);
        publisher
            .publish(&PublishInstruction::new("act_dmx", "dmx.lamp.subraum.8", "red"))
            .unwrap();

        let written = String::from_utf8(publisher.into_inner()).unwrap();
        let parsed: PublishInstruction = serde_json::from_str(written.trim()).unwrap();
        assert_eq!(parsed.topic, "dmx.lamp.subraum.8");
        assert_eq!(parsed.payload, "red");
    }
}
