//! Sample-well addressing for the 24-position tube rack.
//!
//! Samples occupy rows C and D of the rack, six columns each, giving a
//! fixed capacity of twelve. [`sample_well`] turns a zero-based
//! [`SampleIndex`] into a concrete [`Well`]; [`SampleCount`] validates the
//! configured number of samples against the same capacity before a run is
//! allowed to plan anything.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Rows of the rack that hold samples, in fill order.
pub const SAMPLE_ROWS: [char; 2] = ['C', 'D'];

/// Columns per sample row.
pub const COLUMNS_PER_ROW: usize = 6;

/// Total addressable sample positions.
pub const SAMPLE_CAPACITY: usize = SAMPLE_ROWS.len() * COLUMNS_PER_ROW;

/// A single well position within a labware, e.g. `C4` or `A3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Well {
    pub row: char,
    pub col: u8,
}

impl Well {
    pub const fn new(row: char, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Well {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.col)
    }
}

/// Zero-based index of one physical sample tube.
///
/// Unsigned by construction, so negative indices cannot be expressed;
/// the upper bound is checked by [`sample_well`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleIndex(pub usize);

/// Number of samples in a run, validated to `1..=12` at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleCount(u32);

impl SampleCount {
    /// Validates the configured sample count against the rack capacity.
    ///
    /// Fails before any physical action: a count of zero has nothing to
    /// pipette, and a count above twelve would address wells that do not
    /// exist.
    pub fn new(count: u32) -> Result<Self, ProtocolError> {
        if (1..=SAMPLE_CAPACITY as u32).contains(&count) {
            Ok(Self(count))
        } else {
            Err(ProtocolError::Configuration(format!(
                "sample count must be between 1 and {SAMPLE_CAPACITY}, got {count}"
            )))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Iterates the sample indices of this run, in rack fill order.
    pub fn indices(&self) -> impl Iterator<Item = SampleIndex> {
        (0..self.0 as usize).map(SampleIndex)
    }
}

impl fmt::Display for SampleCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps a sample index to its well: indices 0–5 fill row C left to right,
/// 6–11 fill row D.
pub fn sample_well(index: SampleIndex) -> Result<Well, ProtocolError> {
    if index.0 >= SAMPLE_CAPACITY {
        return Err(ProtocolError::OutOfRange {
            index: index.0,
            capacity: SAMPLE_CAPACITY,
        });
    }
    let row = SAMPLE_ROWS[index.0 / COLUMNS_PER_ROW];
    let col = (index.0 % COLUMNS_PER_ROW) as u8 + 1;
    Ok(Well::new(row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_six_indices_fill_row_c() {
        for i in 0..6 {
            let well = sample_well(SampleIndex(i)).unwrap();
            assert_eq!(well.row, 'C');
            assert_eq!(well.col, i as u8 + 1);
        }
    }

    #[test]
    fn next_six_indices_fill_row_d() {
        for i in 6..12 {
            let well = sample_well(SampleIndex(i)).unwrap();
            assert_eq!(well.row, 'D');
            assert_eq!(well.col, (i - 6) as u8 + 1);
        }
    }

    #[test]
    fn index_twelve_is_out_of_range() {
        let err = sample_well(SampleIndex(12)).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::OutOfRange {
                index: 12,
                capacity: 12
            }
        ));
    }

    #[test]
    fn far_out_of_range_index_reports_itself() {
        let err = sample_well(SampleIndex(100)).unwrap_err();
        assert!(matches!(err, ProtocolError::OutOfRange { index: 100, .. }));
    }

    #[test]
    fn well_display_matches_rack_labels() {
        assert_eq!(sample_well(SampleIndex(0)).unwrap().to_string(), "C1");
        assert_eq!(sample_well(SampleIndex(5)).unwrap().to_string(), "C6");
        assert_eq!(sample_well(SampleIndex(6)).unwrap().to_string(), "D1");
        assert_eq!(sample_well(SampleIndex(11)).unwrap().to_string(), "D6");
    }

    #[test]
    fn sample_count_accepts_full_range() {
        for n in 1..=12 {
            assert!(SampleCount::new(n).is_ok());
        }
    }

    #[test]
    fn sample_count_rejects_zero_and_thirteen() {
        assert!(matches!(
            SampleCount::new(0),
            Err(ProtocolError::Configuration(_))
        ));
        assert!(matches!(
            SampleCount::new(13),
            Err(ProtocolError::Configuration(_))
        ));
    }

    #[test]
    fn indices_cover_every_well_once() {
        let count = SampleCount::new(12).unwrap();
        let wells: Vec<String> = count
            .indices()
            .map(|i| sample_well(i).unwrap().to_string())
            .collect();
        assert_eq!(wells.len(), 12);
        for row in SAMPLE_ROWS {
            for col in 1..=6 {
                let label = format!("{row}{col}");
                assert_eq!(wells.iter().filter(|w| **w == label).count(), 1);
            }
        }
    }
}
