//! Loading a game's doors into an ordered, index-addressable collection.

use crate::error::{DealError, DealErrorKind};
use crate::fetcher::ResourceFetcher;
use crate::links::{REL_SELF, resolve_link};
use crate::resources::DoorsResource;
use derive_getters::Getters;
use reqwest::Url;
use tracing::{debug, info, instrument};

/// Last-known state of one door.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Door {
    /// Canonical door URL, taken from its `self` link.
    url: Url,
    /// Server-owned status, displayed verbatim.
    status: String,
    /// Prize, once the server reveals it.
    content: Option<String>,
}

/// Doors of one game in collection order.
///
/// Position `i` is the door the operator calls "door i". Rebuilt from
/// scratch on every load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoorIndex {
    doors: Vec<Door>,
}

impl DoorIndex {
    /// Builds an index from a decoded collection.
    ///
    /// Fails as a whole if any door lacks a resolvable `self` link.
    #[instrument(skip(resource, base), fields(base = %base, doors = resource.doors.len()))]
    pub fn from_resource(resource: DoorsResource, base: &Url) -> Result<Self, DealError> {
        let doors = resource
            .doors
            .into_iter()
            .map(|summary| {
                let url = resolve_link(&summary, base, REL_SELF)?;
                Ok(Door {
                    url,
                    status: summary.status,
                    content: summary.content,
                })
            })
            .collect::<Result<Vec<_>, DealError>>()?;

        Ok(Self { doors })
    }

    /// Number of doors.
    pub fn len(&self) -> usize {
        self.doors.len()
    }

    /// True when the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    /// Bounds-checked access by operator index.
    pub fn door(&self, index: usize) -> Result<&Door, DealError> {
        self.doors.get(index).ok_or_else(|| {
            DealError::new(DealErrorKind::InvalidSelection {
                index,
                count: self.doors.len(),
            })
        })
    }

    /// Finds the door with the given canonical URL.
    pub fn resolve(&self, url: &Url) -> Result<&Door, DealError> {
        self.doors.iter().find(|door| &door.url == url).ok_or_else(|| {
            DealError::new(DealErrorKind::UnknownDoor {
                url: url.to_string(),
            })
        })
    }

    /// Doors in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &Door> {
        self.doors.iter()
    }

    /// Door statuses in collection order.
    pub fn statuses(&self) -> Vec<&str> {
        self.doors.iter().map(|door| door.status.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a DoorIndex {
    type Item = &'a Door;
    type IntoIter = std::slice::Iter<'a, Door>;

    fn into_iter(self) -> Self::IntoIter {
        self.doors.iter()
    }
}

/// Fetches a doors collection and builds a fresh [`DoorIndex`].
#[instrument(skip(fetcher, doors_url), fields(url = %doors_url))]
pub async fn load_doors(
    fetcher: &ResourceFetcher,
    doors_url: &Url,
) -> Result<DoorIndex, DealError> {
    debug!("Loading doors");
    let fetched = fetcher.get::<DoorsResource>(doors_url).await?;
    let base = fetched.url().clone();
    let index = DoorIndex::from_resource(fetched.into_body(), &base)?;
    info!(count = index.len(), statuses = ?index.statuses(), "Doors loaded");
    Ok(index)
}
