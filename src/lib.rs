//! A connect engine: given a ranked list of resolved endpoints, races
//! non-blocking `connect()` attempts across address families (one in flight
//! per family at a time, Happy-Eyeballs style) and reports the first
//! successful socket while giving other in-flight attempts a short grace
//! window to also finish before the query settles.
//!
//! The engine does not own an event loop, a DNS resolver, or a thread pool.
//! It is driven entirely by its embedder: construct an [`Engine`], call
//! [`Engine::start`], and forward every readiness/timeout event the supplied
//! [`Poller`] was told to watch back into [`Engine::dispatch`].

mod bind;
mod callbacks;
mod config;
mod engine;
mod error;
mod launcher;
mod path;
mod poller;
mod resolver;

pub use bind::bind_path;
pub use callbacks::ConnectCallbacks;
pub use config::ConnectOptions;
pub use engine::{DispatchOutcome, Engine, OverallState};
pub use error::ConnectError;
pub use path::{AttemptState, Family, Path};
pub use poller::{Interest, Poller, Token};
pub use resolver::{DefaultPathResolver, PathResolver, ResolvedAddr};
