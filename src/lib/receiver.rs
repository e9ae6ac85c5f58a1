use std::path::Path;
use std::sync::mpsc::Receiver;

use anyhow::Context;
use log::{debug, info};

use crate::lib::{
    filter::{self, Line},
    input::InputEvent,
    utils::hex_to_bytes,
};

#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    EndOfInput,
    Interrupted,
}

/// State of one receive run: the hex accumulator plus what the device
/// announced about the transfer.
#[derive(Default)]
pub struct HexReceiver {
    pub hex_data: String,
    pub announced_size: Option<usize>,
    pub data_lines: usize,
    pub status_lines: usize,
}

impl HexReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        match filter::classify(line) {
            Line::Status(text) => {
                self.status_lines += 1;
                debug!("Skipping status line: {}", text.trim_end());
                if let Some(size) = filter::announced_size(text) {
                    info!("Device announced {} bytes", size);
                    self.set_announced_size(size);
                }
            }
            Line::Data(hex_line) => {
                self.data_lines += 1;
                self.hex_data.push_str(&hex_line);
            }
        }
    }

    pub fn set_announced_size(&mut self, size: usize) {
        self.announced_size = Some(size);
    }

    /// Accumulates lines until the stream ends or the user interrupts.
    /// A closed channel counts as end of input.
    pub fn consume(&mut self, events: &Receiver<InputEvent>) -> ReadOutcome {
        let outcome = loop {
            match events.recv() {
                Ok(InputEvent::Line(line)) => self.push_line(&line),
                Ok(InputEvent::Interrupted) => break ReadOutcome::Interrupted,
                Ok(InputEvent::End) | Err(_) => break ReadOutcome::EndOfInput,
            }
        };
        debug!(
            "Input finished ({:?}): {} data lines, {} status lines, {} hex digits",
            outcome,
            self.data_lines,
            self.status_lines,
            self.hex_data.len()
        );
        outcome
    }

    /// Decodes the accumulator and writes it to `output_file`, returning the
    /// number of bytes written. Nothing touches the filesystem unless the
    /// decode succeeded.
    pub fn save(&self, output_file: &Path) -> anyhow::Result<usize> {
        let binary_data = hex_to_bytes(&self.hex_data)?;
        std::fs::write(output_file, &binary_data)
            .with_context(|| format!("could not write {}", output_file.display()))?;
        Ok(binary_data.len())
    }

    /// Returns the announced size when it disagrees with what was received.
    pub fn size_mismatch(&self, received: usize) -> Option<usize> {
        self.announced_size.filter(|&expected| expected != received)
    }
}
