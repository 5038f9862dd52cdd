use serde::{Deserialize, Serialize};

use crate::types::{Direction, TrackEntry};

/// Position into the track sequence.
///
/// `Positioned(i)` always refers to an entry with `is_track == true`.
/// `Exhausted` means no track-typed entry is left; only a fresh [`init`] on a
/// newly fetched sequence leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cursor {
    Positioned(usize),
    Exhausted,
}

impl Cursor {
    /// Position of the current entry in the sequence, `None` once exhausted.
    pub fn index(&self) -> Option<usize> {
        match self {
            Cursor::Positioned(i) => Some(*i),
            Cursor::Exhausted => None,
        }
    }

    /// True when no track is left to show.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Cursor::Exhausted)
    }
}

/// Positions the cursor on the first track-typed entry.
pub fn init(sequence: &[TrackEntry]) -> Cursor {
    sequence
        .iter()
        .position(|entry| entry.is_track)
        .map_or(Cursor::Exhausted, Cursor::Positioned)
}

/// Moves one track-typed entry forward or backward, wrapping around and
/// skipping non-track entries.
///
/// With a single track left both directions land on it again.
pub fn step(cursor: Cursor, direction: Direction, sequence: &[TrackEntry]) -> Cursor {
    match cursor {
        Cursor::Positioned(i) => walk(i as isize, direction, sequence),
        Cursor::Exhausted => Cursor::Exhausted,
    }
}

/// Recomputes the cursor after the entry at `removed_index` was deleted from
/// `sequence`, shifting every later entry down by one.
///
/// Going forward, the entry that slid into the removed slot has not been
/// shown yet, so the walk starts one before the slot. Going backward the
/// shift only touches indices the walk does not revisit, so it starts from
/// the slot itself.
pub fn after_removal(sequence: &[TrackEntry], removed_index: usize, direction: Direction) -> Cursor {
    let start = match direction {
        Direction::Next => removed_index as isize - 1,
        Direction::Previous => removed_index as isize,
    };
    walk(start, direction, sequence)
}

/// Advances from `start` until a track-typed entry is hit. At most
/// `sequence.len()` moves are made, which is enough to come back to the
/// starting entry.
fn walk(start: isize, direction: Direction, sequence: &[TrackEntry]) -> Cursor {
    let len = sequence.len() as isize;
    if len == 0 {
        return Cursor::Exhausted;
    }

    let delta = match direction {
        Direction::Next => 1,
        Direction::Previous => -1,
    };

    let mut index = start;
    for _ in 0..len {
        index = (index + delta).rem_euclid(len);
        if sequence[index as usize].is_track {
            return Cursor::Positioned(index as usize);
        }
    }

    Cursor::Exhausted
}
