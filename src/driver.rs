//! Plays one game from creation to deletion.

use crate::config::ClientConfig;
use crate::doors::{DoorIndex, load_doors};
use crate::error::{DealError, DealErrorKind};
use crate::fetcher::ResourceFetcher;
use crate::operator::{Operator, Selection, Turn};
use crate::session::{GameSession, optional};
use crate::snapshot::Snapshot;
use reqwest::Url;
use strum::IntoEnumIterator;
use tracing::{error, info, instrument, warn};

/// Sequences the selection and reveal turns against one game.
///
/// Every door index is rebuilt from the server before it is shown, and
/// the game is deleted on the way out whether or not the turns succeeded.
pub struct TurnDriver<O> {
    config: ClientConfig,
    fetcher: ResourceFetcher,
    operator: O,
}

impl<O: Operator> TurnDriver<O> {
    /// Creates a driver with its own HTTP client.
    pub fn new(config: ClientConfig, operator: O) -> Result<Self, DealError> {
        let fetcher = ResourceFetcher::new(&config)?;
        Ok(Self {
            config,
            fetcher,
            operator,
        })
    }

    /// The operator, e.g. to inspect what a scripted operator was shown.
    pub fn operator(&self) -> &O {
        &self.operator
    }

    /// Consumes the driver, returning the operator.
    pub fn into_operator(self) -> O {
        self.operator
    }

    /// Creates a game, plays both turns, shows the result and deletes the game.
    ///
    /// Returns the final snapshot.
    #[instrument(skip(self), fields(root = %self.config.root_url()))]
    pub async fn run(&mut self) -> Result<Snapshot, DealError> {
        let root = self.config.root()?;
        let session = GameSession::create(self.fetcher.clone(), &root).await?;

        match self.play(&session).await {
            Ok(snapshot) => {
                session.destroy().await?;
                info!(status = %snapshot.status(), "Game finished");
                Ok(snapshot)
            }
            Err(e) => {
                error!(error = %e, game = %session.url(), "Game aborted, cleaning up");
                if let Err(cleanup) = session.destroy().await {
                    warn!(error = %cleanup, game = %session.url(), "Failed to delete game");
                }
                Err(e)
            }
        }
    }

    async fn play(&mut self, session: &GameSession) -> Result<Snapshot, DealError> {
        let doors_url = session.doors_link().await?;

        for turn in Turn::iter() {
            let doors = self.show(session, &doors_url).await?;
            let index = self.choose(turn, &doors).await?;
            let door = doors.door(index)?;
            info!(%turn, index, door = %door.url(), "Playing turn");
            session.act(&doors, door.url(), turn.action()).await?;
        }

        let status = session.status().await?;
        let doors = load_doors(&self.fetcher, &doors_url).await?;
        let snapshot = Snapshot::new(status, doors);
        self.operator.show(&snapshot)?;

        if *self.config.show_history() {
            match optional(session.history().await)? {
                Some(history) => self.operator.show_history(&history)?,
                None => warn!(game = %session.url(), "Game has no history link"),
            }
        }

        Ok(snapshot)
    }

    /// Reloads doors and renders them with the current game status.
    async fn show(
        &mut self,
        session: &GameSession,
        doors_url: &Url,
    ) -> Result<DoorIndex, DealError> {
        let doors = load_doors(&self.fetcher, doors_url).await?;
        let status = session.status().await?;
        let snapshot = Snapshot::new(status, doors);
        self.operator.show(&snapshot)?;
        Ok(snapshot.into_doors())
    }

    /// Asks for an index until one is in range or attempts run out.
    #[instrument(skip(self, doors), fields(doors = doors.len()))]
    async fn choose(&mut self, turn: Turn, doors: &DoorIndex) -> Result<usize, DealError> {
        let attempts = (*self.config.max_selection_attempts()).max(1);
        let mut attempt = 1;
        loop {
            let index = match self.operator.choose_door(turn, doors).await? {
                Selection::Door(index) => index,
                Selection::Quit => {
                    return Err(DealError::new(DealErrorKind::Aborted {
                        turn: turn.to_string(),
                    }));
                }
            };

            match doors.door(index) {
                Ok(_) => return Ok(index),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    warn!(index, attempt, "Door index out of range");
                    self.operator.reject(&e)?;
                    attempt += 1;
                }
            }
        }
    }
}
