//! Relation link lookup over hypermedia resources.

use crate::error::{DealError, DealErrorKind};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Relation of a resource's canonical URL.
pub const REL_SELF: &str = "self";
/// Relation from a game to its doors collection.
pub const REL_DOORS: &str = "doors";
/// Relation from a game to its transition history.
pub const REL_HISTORY: &str = "history";

/// A typed relation link as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Role the link plays relative to its resource.
    pub rel: String,
    /// Target, absolute or relative to the resource URL.
    pub href: String,
}

impl Link {
    /// Creates a link.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }
}

/// A payload that carries relation links.
pub trait Hypermedia {
    /// Links in the order the server sent them.
    fn links(&self) -> &[Link];
}

/// Returns the first link with the given relation.
///
/// Relations are not unique within a resource; later duplicates are ignored.
pub fn find_link<'a>(links: &'a [Link], rel: &str) -> Option<&'a Link> {
    links.iter().find(|link| link.rel == rel)
}

/// Resolves a relation on an already-fetched resource to an absolute URL.
///
/// `base` is the URL the resource was fetched from; relative hrefs are
/// joined onto it.
#[instrument(skip(resource, base), fields(base = %base))]
pub fn resolve_link(resource: &impl Hypermedia, base: &Url, rel: &str) -> Result<Url, DealError> {
    let link = find_link(resource.links(), rel).ok_or_else(|| {
        DealError::new(DealErrorKind::LinkNotFound {
            rel: rel.to_string(),
            url: base.to_string(),
        })
    })?;

    let url = base.join(&link.href).map_err(|e| {
        DealError::new(DealErrorKind::Decode {
            url: base.to_string(),
            reason: format!("invalid href '{}' for relation '{}': {}", link.href, rel, e),
        })
    })?;

    debug!(rel, href = %url, "Resolved link");
    Ok(url)
}
