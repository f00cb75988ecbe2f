//! Store scope value.

use serde::{Deserialize, Serialize};

use crate::id::{StoreId, WebsiteId};

/// The active website/store pair every catalog query is scoped to.
///
/// Resolved once per batch of calls and treated as immutable for its
/// duration; operations receive it explicitly rather than looking it up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreScope {
    pub website_id: WebsiteId,
    pub store_id: StoreId,
}

impl StoreScope {
    pub fn new(website_id: impl Into<WebsiteId>, store_id: impl Into<StoreId>) -> Self {
        Self {
            website_id: website_id.into(),
            store_id: store_id.into(),
        }
    }
}
