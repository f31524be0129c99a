//! Synchronous typed client for an Elasticsearch-compatible REST API.
//!
//! # Overview
//! Every endpoint is a builder borrowing a shared [`Client`]. Setters fill in
//! path variables, query parameters and the JSON body; `build_request`
//! assembles an [`HttpRequest`] without touching the network, and `send`
//! pushes it through the client's [`Transport`] and decodes the reply.
//!
//! # Design
//! - `Client` is cheap to clone: a base URL, default headers and an
//!   `Arc<dyn Transport>`. The default transport is blocking `ureq`.
//! - Request assembly and response decoding are split through the
//!   [`Endpoint`] trait, so both halves are testable without a server.
//! - Delete-style endpoints return [`DeleteOutcome`], keeping the decoded
//!   body of a 404 alongside the not-found error.
//! - Scrolling and bulk batching are the only stateful helpers; the bulk
//!   processor owns worker threads and is shut down by `close` or drop.

pub mod error;
pub mod http;
#[macro_use]
pub mod params;
pub mod client;
pub mod config;
pub mod de;
pub mod query;
pub mod api;

#[cfg(test)]
mod testing;

pub use api::bulk::{BulkDeleteRequest, BulkIndexRequest, BulkResponse, BulkUpdateRequest, BulkableRequest};
pub use api::bulk_processor::{BulkProcessor, BulkProcessorStats, ExponentialBackoff};
pub use api::scroll::Scroll;
pub use api::search::{SearchHit, SearchRequest, SearchResult};
pub use client::{Client, Endpoint};
pub use config::ClientConfig;
pub use error::{ApiError, DeleteOutcome, ErrorDetails};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError, UreqTransport};
pub use query::{
    Aggregation, BoolQuery, MatchAllQuery, MatchQuery, Query, RangeQuery, SearchSource, SortInfo, TermQuery,
    TermsQuery,
};
