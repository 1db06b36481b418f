//! Multi-session host for chain reaction games.
//!
//! Keeps any number of independent [`GameSession`](chain_reaction_core::GameSession)s keyed
//! by id and answers [`ClientMessage`](chain_reaction_protocol::ClientMessage)s, either as
//! values or as JSON text.

pub use config::*;
pub use error::*;
pub use registry::*;
pub use view::*;

mod config;
mod error;
mod registry;
mod view;
