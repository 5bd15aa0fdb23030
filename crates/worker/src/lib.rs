//! grammly offline asset worker.
//!
//! A state-machine rendition of the browser service worker that serves the
//! application's static assets offline-first: install precaches a fixed
//! manifest into a version-named cache, activate deletes every cache that
//! doesn't match the current version tag, and intercepted fetches are
//! answered cache-first with a network fallback and a cached offline
//! document as the last resort.

pub mod error;
pub mod fetcher;
pub mod manifest;
pub mod worker;

pub use error::WorkerError;
pub use fetcher::{AssetFetcher, FetchFailure, FetchedAsset, HttpFetcher};
pub use manifest::AssetManifest;
pub use worker::{ServedFrom, ServedResponse, ServiceWorker, WorkerState};
