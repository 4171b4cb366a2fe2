//! Byte-bounded, time-indexed frame cache for the Vistra playback
//! engine.
//!
//! [`FrameCache`] holds a run of decoded frames in ascending
//! frame-number order under a configurable byte budget. Eviction is
//! oldest-first and never empties the cache entirely, so a consumer is
//! always guaranteed one frame at or beyond the most recent admitted
//! data. A frame once evicted is irrecoverable except by re-request
//! from the source.
//!
//! The cache has no interior locking: it relies on the playback
//! engine's single-threaded run-to-completion model, where exactly one
//! event-loop turn mutates it at a time.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cache;

pub use cache::{EvictionSweep, FrameCache, InsertOutcome, DEFAULT_CACHE_LIMIT_BYTES};
