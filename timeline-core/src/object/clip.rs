//! An `Item` that owns (at most) one `MediaReference`, addressed through a
//! dedicated single-slot field rather than the children list (spec.md §3
//! invariants: "MediaReference is owned by Clip through a dedicated
//! single-slot field").

use super::base::ItemBase;
use super::media_reference::MediaReference;
use super::retainer::Retainer;

#[derive(Clone, Debug)]
pub struct Clip {
    pub item: ItemBase,
    pub media_reference: Option<Retainer<MediaReference>>,
    /// Mirrors the original's multi-reference `active_media_reference_key`:
    /// clips may carry several named media references (proxies, alternate
    /// takes) but only one is active at a time. The crate models a single
    /// slot, so this just records which logical key it corresponds to.
    pub active_media_reference_key: Option<String>,
}

impl Clip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            item: ItemBase::new(name),
            media_reference: None,
            active_media_reference_key: None,
        }
    }
}
