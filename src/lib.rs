//! Let's Make a Deal - hypermedia game client
//!
//! Plays the three-door game against a server that exposes it as a
//! HATEOAS API. Only the game root URL is known up front; everything else
//! is discovered by following relation links in server responses.
//!
//! # Architecture
//!
//! - **Links**: relation lookup over any hypermedia payload
//! - **Fetcher**: one HTTP round trip per call, non-2xx is an error
//! - **Doors**: the doors collection as an ordered, bounds-checked index
//! - **Session**: create / inspect / act / destroy one game
//! - **Driver**: the two turns (select, then open) with cleanup on failure
//!
//! # Example
//!
//! ```no_run
//! use lets_make_a_deal::{ClientConfig, ScriptedOperator, TurnDriver};
//!
//! # async fn example() -> Result<(), lets_make_a_deal::DealError> {
//! let config = ClientConfig::default().with_root_url("http://localhost:8080/lets-make-a-deal/games");
//! let mut driver = TurnDriver::new(config, ScriptedOperator::new([1, 0]))?;
//! let outcome = driver.run().await?;
//! println!("{}", outcome);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod doors;
mod driver;
mod error;
mod fetcher;
mod links;
mod operator;
mod resources;
mod session;
mod snapshot;

// Crate-level exports - Configuration
pub use config::{ClientConfig, DEFAULT_ROOT_URL};

// Crate-level exports - Errors
pub use error::{DealError, DealErrorKind};

// Crate-level exports - Hypermedia plumbing
pub use fetcher::{Fetched, RawResponse, ResourceFetcher};
pub use links::{Hypermedia, Link, REL_DOORS, REL_HISTORY, REL_SELF, find_link, resolve_link};
pub use reqwest::Url;
pub use resources::{
    DoorAction, DoorSummary, DoorUpdate, DoorsResource, GameResource, HistoryItem,
    HistoryResource, LinkedResource,
};

// Crate-level exports - Game
pub use doors::{Door, DoorIndex, load_doors};
pub use session::GameSession;
pub use snapshot::Snapshot;

// Crate-level exports - Turns
pub use driver::TurnDriver;
pub use operator::{
    ConsoleOperator, Operator, ScriptedOperator, Selection, Turn, choices_label, parse_selection,
};
