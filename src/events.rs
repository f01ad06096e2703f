//! Inbound draft events.
//!
//! The draft client reports two things: a pack being shown and a card
//! being picked. Events arrive as newline-delimited JSON tagged by `type`.

use serde::{Deserialize, Serialize};
use std::io::BufRead;

use crate::types::{DraftError, Pack};

/// One notification from the draft client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DraftEvent {
    PackShown {
        draft_id: String,
        pack_number: u32,
        pick_number: u32,
        card_ids: Vec<u32>,
    },
    CardPicked {
        pack_number: u32,
        pick_number: u32,
        card_id: u32,
    },
}

impl DraftEvent {
    /// The offered pack, for `PackShown` events.
    pub fn pack(&self) -> Option<Pack> {
        match self {
            DraftEvent::PackShown {
                pack_number,
                pick_number,
                card_ids,
                ..
            } => Some(Pack {
                pack_number: *pack_number,
                pick_number: *pick_number,
                card_ids: card_ids.clone(),
            }),
            DraftEvent::CardPicked { .. } => None,
        }
    }
}

/// Parse one line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<DraftEvent>, DraftError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| DraftError::Malformed {
            source_name: "event".to_string(),
            message: e.to_string(),
        })
}

/// Iterator over `(line number, parsed event)` for a JSON-lines stream.
/// Read errors end the stream; parse errors are yielded per line.
pub struct EventReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> EventReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = (usize, Result<DraftEvent, DraftError>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.line_no += 1;
                    let err = DraftError::Malformed {
                        source_name: "event stream".to_string(),
                        message: e.to_string(),
                    };
                    return Some((self.line_no, Err(err)));
                }
            };
            self.line_no += 1;
            match parse_line(&line) {
                Ok(None) => continue,
                Ok(Some(event)) => return Some((self.line_no, Ok(event))),
                Err(e) => return Some((self.line_no, Err(e))),
            }
        }
    }
}
