//! Composite actions and their packed / textual encodings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::error::DecodeError;

/// Sentinel for an absent cell in the packed form.
pub const PACKED_NONE: u32 = 0xFF;

/// Sentinel for an absent cell in the textual form.
pub const TEXT_NONE: i8 = -1;

/// One turn: a placement or a slide, plus the removal it forced (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Cell placed into or moved to.
    pub to: Position,
    /// Source cell; `None` for a placement.
    pub from: Option<Position>,
    /// Opponent piece taken after forming a mill.
    pub removed: Option<Position>,
}

impl Move {
    pub fn place(to: Position) -> Self {
        Self {
            to,
            from: None,
            removed: None,
        }
    }

    pub fn slide(from: Position, to: Position) -> Self {
        Self {
            to,
            from: Some(from),
            removed: None,
        }
    }

    pub fn with_removal(mut self, removed: Position) -> Self {
        self.removed = Some(removed);
        self
    }

    #[inline]
    pub fn is_placement(&self) -> bool {
        self.from.is_none()
    }

    /// `(to << 16) | (from << 8) | removed`, absent cells as `0xFF`.
    pub fn packed(&self) -> u32 {
        let field = |p: Option<Position>| p.map_or(PACKED_NONE, |p| p.index() as u32);
        ((self.to.index() as u32) << 16) | (field(self.from) << 8) | field(self.removed)
    }

    pub fn from_packed(packed: u32) -> Result<Self, DecodeError> {
        if packed >> 24 != 0 {
            return Err(DecodeError::InvalidPacked(packed, "high byte set".into()));
        }
        let field = |raw: u32| -> Result<Option<Position>, DecodeError> {
            if raw == PACKED_NONE {
                return Ok(None);
            }
            Position::from_index(raw as i32)
                .map(Some)
                .map_err(|e| DecodeError::InvalidPacked(packed, e.to_string()))
        };
        let to = field((packed >> 16) & 0xFF)?
            .ok_or_else(|| DecodeError::InvalidPacked(packed, "missing target cell".into()))?;
        Ok(Self {
            to,
            from: field((packed >> 8) & 0xFF)?,
            removed: field(packed & 0xFF)?,
        })
    }

    pub fn to_record(&self) -> MoveRecord {
        let field = |p: Option<Position>| p.map_or(TEXT_NONE, |p| p.index() as i8);
        MoveRecord {
            from: field(self.from),
            to: self.to.index() as i8,
            removed: field(self.removed),
        }
    }

    pub fn from_record(record: &MoveRecord) -> Result<Self, DecodeError> {
        let field = |raw: i8| -> Result<Option<Position>, DecodeError> {
            if raw == TEXT_NONE {
                Ok(None)
            } else {
                Ok(Some(Position::from_index(raw as i32)?))
            }
        };
        Ok(Self {
            to: Position::from_index(record.to as i32)?,
            from: field(record.from)?,
            removed: field(record.removed)?,
        })
    }

    /// Textual form: `{"POS_INIT": .., "NEXT_POS": .., "KILL": ..}`.
    pub fn to_json(&self) -> Result<String, DecodeError> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let record: MoveRecord = serde_json::from_str(text)?;
        Self::from_record(&record)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            None => write!(f, "place {}", self.to)?,
            Some(from) => write!(f, "move {} -> {}", from, self.to)?,
        }
        if let Some(removed) = self.removed {
            write!(f, " x {removed}")?;
        }
        Ok(())
    }
}

/// Wire shape of a move. Cells are compact indices, `-1` when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    #[serde(rename = "POS_INIT")]
    pub from: i8,
    #[serde(rename = "NEXT_POS")]
    pub to: i8,
    #[serde(rename = "KILL")]
    pub removed: i8,
}
