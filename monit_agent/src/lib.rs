//! monit_agent: serves a live system dashboard to remote terminal clients.
//! Each admitted connection gets its own session, sampling pipeline run,
//! and view stream; sessions never share mutable state.

pub mod config;
pub mod format;
pub mod gatekeeper;
pub mod metrics;
pub mod normalize;
pub mod ranker;
pub mod sampler;
pub mod session;
pub mod state;
pub mod supervisor;
pub mod tls;
pub mod types;
pub mod view;
pub mod ws;
