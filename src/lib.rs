//! NetChess - two-player networked chess
//!
//! - [`game`] - rule engine, turn/game state machine and participant session
//! - [`networking`] - replication protocol, transports and the room relay
//! - [`core`] - settings, logging and error plumbing shared by the binary

pub mod core;
pub mod game;
pub mod networking;
