//! # Sharing
//!
//! Publishing a single list to the remote sharing service and bringing
//! shared lists back in.
//!
//! ## Pieces
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `payload` | Projects one list into a create-list request ([`build_share_payload`]) |
//! | `links` | Web app publish/search URLs and return-query parsing |
//! | `api` | [`ShareApiClient`] over a pluggable [`Transport`] |
//!
//! A fetched [`SharedList`] is a regular backup: run
//! [`SharedList::document`] and merge it with
//! [`merge_imported_state`](crate::domain::merge_imported_state).

mod payload;
mod links;
mod api;

pub use payload::{
    build_share_payload, build_share_payload_at, shared_document, ShareError, ShareOptions,
    ShareRequest,
};
pub use links::{
    build_share_publish_url, build_share_search_url, resolve_imported_list_id,
    should_show_import_success, PublishLink,
};
pub use api::{
    Character, CreatedList, Game, HttpRequest, HttpResponse, HttpTransport, ImportAck,
    ListSummary, Method, SearchQuery, ShareApiClient, ShareApiError, SharedList, Transport,
    DEFAULT_SEARCH_SORT,
};
