//! Typed payloads exchanged with the game server.

use crate::links::{Hypermedia, Link};
use serde::{Deserialize, Serialize};

/// A game as served at its canonical URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResource {
    /// Server-owned game status, displayed verbatim.
    pub status: String,
    /// Relations such as `self`, `doors` and `history`.
    pub links: Vec<Link>,
}

impl Hypermedia for GameResource {
    fn links(&self) -> &[Link] {
        &self.links
    }
}

/// One door as embedded in the doors collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSummary {
    /// Server-owned door status (e.g. `CLOSED`, `SELECTED`, `OPEN`).
    pub status: String,
    /// Prize behind the door; hidden until opened.
    #[serde(default)]
    pub content: Option<String>,
    /// Must contain a `self` link.
    pub links: Vec<Link>,
}

impl Hypermedia for DoorSummary {
    fn links(&self) -> &[Link] {
        &self.links
    }
}

/// The doors collection of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorsResource {
    /// Doors in server order.
    pub doors: Vec<DoorSummary>,
    /// Collection links; usually just `self`.
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Hypermedia for DoorsResource {
    fn links(&self) -> &[Link] {
        &self.links
    }
}

/// Any resource, viewed only through its links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedResource {
    /// Relations of the resource.
    pub links: Vec<Link>,
}

impl Hypermedia for LinkedResource {
    fn links(&self) -> &[Link] {
        &self.links
    }
}

/// One recorded transition in a game's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryItem {
    /// The game moved to a new status.
    Game {
        /// Game URL.
        game: String,
        /// Status after the transition.
        status: String,
    },
    /// A door moved to a new status.
    Door {
        /// Door URL.
        door: String,
        /// Status after the transition.
        status: String,
    },
}

impl std::fmt::Display for HistoryItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryItem::Game { game, status } => write!(f, "game {} -> {}", game, status),
            HistoryItem::Door { door, status } => write!(f, "door {} -> {}", door, status),
        }
    }
}

/// Transition history of a game, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResource {
    /// Recorded transitions.
    pub history: Vec<HistoryItem>,
    /// History links; usually just `self`.
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Hypermedia for HistoryResource {
    fn links(&self) -> &[Link] {
        &self.links
    }
}

/// Door transitions the client can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum DoorAction {
    /// Make the door the player's pick.
    #[serde(rename = "SELECTED")]
    #[strum(serialize = "SELECTED")]
    Select,
    /// Reveal what is behind the door.
    #[serde(rename = "OPEN")]
    #[strum(serialize = "OPEN")]
    Open,
}

/// Body of a door update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorUpdate {
    /// Requested door status.
    pub status: DoorAction,
}
