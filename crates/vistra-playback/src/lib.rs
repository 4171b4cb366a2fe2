//! Playback controller and streaming session for the Vistra engine.
//!
//! [`Playback`] is the state machine over one trajectory session: it
//! validates incoming frames (dropping malformed, stale, or
//! out-of-seek-window arrivals), feeds the byte-bounded frame cache,
//! and exposes a cursor-based read API polled by the render loop.
//!
//! Everything here runs single-threaded and run-to-completion: frame
//! decoding, cache insertion, and cursor movement never suspend, so
//! the cache's ordering invariants are never observable mid-mutation.
//! The only cross-thread boundary is the [`Inbox`], which transports
//! push messages into from their own threads; the playback thread
//! drains it between render ticks.
//!
//! [`TrajectorySession`] sits above the controller and wires the
//! message [`Dispatcher`], the trajectory-info version adapter, and
//! the controller together for both streamed and file-based sources.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod inbox;
pub mod session;
pub mod sources;

pub use config::{ConfigError, PlaybackConfig};
pub use controller::{NetFrameData, Playback, PlaybackState};
pub use dispatch::{Dispatcher, InboundMessage};
pub use inbox::{inbox, Inbox, InboxSender};
pub use session::TrajectorySession;
pub use sources::{JsonTrajectoryFile, LocalFrame, RemoteSimulator, TrajectoryFile};
