//! Court identifiers

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of independently timed courts
pub const COURT_COUNT: usize = 4;

/// Validated index of a court, always in `0..COURT_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct CourtId(usize);

impl CourtId {
    /// Validate a raw court index
    pub fn new(index: usize) -> Result<Self, CoreError> {
        if index < COURT_COUNT {
            Ok(Self(index))
        } else {
            Err(CoreError::InvalidCourt(index))
        }
    }

    /// All courts in increasing index order
    pub fn all() -> impl Iterator<Item = CourtId> {
        (0..COURT_COUNT).map(CourtId)
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// 1-based number used in clip names and logs
    pub fn number(self) -> usize {
        self.0 + 1
    }
}

impl TryFrom<usize> for CourtId {
    type Error = CoreError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<CourtId> for usize {
    fn from(court: CourtId) -> Self {
        court.0
    }
}

impl fmt::Display for CourtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "court {}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_index() {
        assert!(CourtId::new(3).is_ok());
        assert!(matches!(CourtId::new(4), Err(CoreError::InvalidCourt(4))));
    }

    #[test]
    fn all_is_in_index_order() {
        let indices: Vec<usize> = CourtId::all().map(CourtId::index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }
}
