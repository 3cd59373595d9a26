//! Point-in-time view of a game shown to the operator between turns.

use crate::doors::DoorIndex;
use derive_getters::Getters;
use std::fmt;

/// Game status plus every door, numbered in collection order.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Snapshot {
    /// Game status as reported by the server.
    status: String,
    /// Doors as loaded just before the snapshot was taken.
    doors: DoorIndex,
}

impl Snapshot {
    /// Creates a snapshot.
    pub fn new(status: String, doors: DoorIndex) -> Self {
        Self { status, doors }
    }

    /// Consumes the snapshot, keeping the doors.
    pub fn into_doors(self) -> DoorIndex {
        self.doors
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Game Status:    {}", self.status)?;
        for (i, door) in self.doors.iter().enumerate() {
            writeln!(
                f,
                "Door {} Status:  {}/{}",
                i,
                door.status(),
                door.content().as_deref().unwrap_or("")
            )?;
        }
        Ok(())
    }
}
