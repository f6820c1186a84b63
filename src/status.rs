//! Derive the node's live status from the SVXLink log tail.
//!
//! Every cycle folds a fresh tail window starting from the defaults. Nothing
//! is remembered between cycles, so a conference or speaker only shows while
//! its line is still inside the window.

use std::fmt;

use serde::Serialize;

use crate::logtail::TailError;

pub const CONFERENCE_MARKER: &str = "EchoLink chat message received from";
pub const CONFERENCE_DELIMITER: &str = "---";
pub const SPEAKER_SEPARATOR: &str = "->";
pub const TRANSMITTER_ON_MARKER: &str = "Turning the transmitter ON";
pub const TRANSMITTER_OFF_MARKER: &str = "Turning the transmitter OFF";

pub const UNKNOWN_CONFERENCE: &str = "N/A";
pub const IDLE_SPEAKER: &str = "FREE";
pub const CAPTURE_ERROR: &str = "capture error";
const READ_ERROR_PREFIX: &str = "log error: ";

/// Whether the transmitter is keyed or the channel is free to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioState {
    Transmitting,
    #[default]
    ReceivingFree,
}

impl RadioState {
    pub fn is_transmitting(self) -> bool {
        matches!(self, RadioState::Transmitting)
    }
}

impl fmt::Display for RadioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadioState::Transmitting => f.write_str("transmitting"),
            RadioState::ReceivingFree => f.write_str("free to receive"),
        }
    }
}

/// Conference, speaker and radio state as seen in one tail window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub conference: String,
    pub speaker: String,
    pub radio: RadioState,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            conference: UNKNOWN_CONFERENCE.to_string(),
            speaker: IDLE_SPEAKER.to_string(),
            radio: RadioState::ReceivingFree,
        }
    }
}

impl StatusSnapshot {
    /// Fold lines oldest to newest; later matches overwrite earlier ones per field.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines.into_iter().fold(Self::default(), |mut snapshot, line| {
            snapshot.observe(line.as_ref());
            snapshot
        })
    }

    /// Map a tail read onto a snapshot. A missing log means nothing was learned;
    /// any other read failure discards the window and marks the speaker.
    pub fn from_tail(tail: &Result<Vec<String>, TailError>) -> Self {
        match tail {
            Ok(lines) => Self::from_lines(lines),
            Err(TailError::NotFound(_)) => Self::default(),
            Err(TailError::Io(err)) => Self::read_failure(err),
        }
    }

    /// Defaults with the failure reason carried in `speaker` so it shows on the panel.
    pub fn read_failure(reason: impl fmt::Display) -> Self {
        Self {
            speaker: format!("{READ_ERROR_PREFIX}{reason}"),
            ..Self::default()
        }
    }

    fn observe(&mut self, line: &str) {
        if let Some(conference) = capture_conference(line) {
            self.conference = conference;
        }

        if let Some((_, speaker)) = line.split_once(SPEAKER_SEPARATOR) {
            self.speaker = speaker.trim().to_string();
        }

        if line.contains(TRANSMITTER_ON_MARKER) {
            self.radio = RadioState::Transmitting;
        } else if line.contains(TRANSMITTER_OFF_MARKER) {
            self.radio = RadioState::ReceivingFree;
        }
    }
}

/// `None` when the line is not a chat announcement; the capture-error
/// sentinel when the closing delimiter is missing.
fn capture_conference(line: &str) -> Option<String> {
    let (_, rest) = line.split_once(CONFERENCE_MARKER)?;
    let captured = match rest.split_once(CONFERENCE_DELIMITER) {
        Some((sender, _)) => sender.trim().to_string(),
        None => CAPTURE_ERROR.to_string(),
    };
    Some(captured)
}
