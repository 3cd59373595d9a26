//! Client handle on one server-side game.

use crate::doors::DoorIndex;
use crate::error::{DealError, DealErrorKind};
use crate::fetcher::ResourceFetcher;
use crate::links::{REL_DOORS, REL_HISTORY};
use crate::resources::{DoorAction, DoorUpdate, GameResource, HistoryItem, HistoryResource};
use reqwest::Url;
use tracing::{debug, info, instrument, warn};

/// A live game, addressed by the URL the server assigned at creation.
///
/// The client never interprets game or door statuses; legality of a
/// transition is decided by the server.
#[derive(Debug, Clone)]
pub struct GameSession {
    fetcher: ResourceFetcher,
    url: Url,
}

impl GameSession {
    /// Creates a game by POSTing to the game root.
    #[instrument(skip(fetcher, root), fields(root = %root))]
    pub async fn create(fetcher: ResourceFetcher, root: &Url) -> Result<Self, DealError> {
        info!("Creating game");
        let response = fetcher.post(root).await?;
        let url = response.location()?;
        info!(game = %url, status = response.status().as_u16(), "Game created");
        Ok(Self { fetcher, url })
    }

    /// Attaches to an existing game URL without creating anything.
    pub fn attach(fetcher: ResourceFetcher, url: Url) -> Self {
        Self { fetcher, url }
    }

    /// Canonical game URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetches the game resource fresh.
    #[instrument(skip(self), fields(game = %self.url))]
    pub async fn resource(&self) -> Result<GameResource, DealError> {
        Ok(self.fetcher.get::<GameResource>(&self.url).await?.into_body())
    }

    /// Resolves the doors collection URL from a fresh copy of the game.
    #[instrument(skip(self), fields(game = %self.url))]
    pub async fn doors_link(&self) -> Result<Url, DealError> {
        self.fetcher.resolve(&self.url, REL_DOORS).await
    }

    /// Server-reported game status, for display only.
    #[instrument(skip(self), fields(game = %self.url))]
    pub async fn status(&self) -> Result<String, DealError> {
        let status = self.resource().await?.status;
        debug!(status = %status, "Game status");
        Ok(status)
    }

    /// Requests a door transition.
    ///
    /// `door_url` must belong to `doors`, the index the operator chose
    /// from; anything else is refused before a request is made.
    #[instrument(
        skip(self, doors, door_url, action),
        fields(game = %self.url, door = %door_url, action = %action)
    )]
    pub async fn act(
        &self,
        doors: &DoorIndex,
        door_url: &Url,
        action: DoorAction,
    ) -> Result<(), DealError> {
        let door = doors.resolve(door_url)?;
        info!("Acting on door");
        self.fetcher
            .post_json(door.url(), &DoorUpdate { status: action })
            .await?;
        Ok(())
    }

    /// Follows the game's `history` link.
    #[instrument(skip(self), fields(game = %self.url))]
    pub async fn history(&self) -> Result<Vec<HistoryItem>, DealError> {
        let history_url = self.fetcher.resolve(&self.url, REL_HISTORY).await?;
        let history = self.fetcher.get::<HistoryResource>(&history_url).await?;
        Ok(history.into_body().history)
    }

    /// Deletes the game. A game that is already gone counts as deleted.
    #[instrument(skip(self), fields(game = %self.url))]
    pub async fn destroy(&self) -> Result<(), DealError> {
        match self.fetcher.delete(&self.url).await {
            Ok(_) => {
                info!("Game destroyed");
                Ok(())
            }
            // 404 Not Found, 410 Gone
            Err(e) if matches!(e.http_status(), Some(404 | 410)) => {
                warn!(error = %e, "Game already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Turns a missing-relation error on an optional relation into `None`.
pub(crate) fn optional<T>(result: Result<T, DealError>) -> Result<Option<T>, DealError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DealError {
            kind: DealErrorKind::LinkNotFound { .. },
            ..
        }) => Ok(None),
        Err(e) => Err(e),
    }
}
