//! xgedit: a Yamaha XG SysEx parameter engine.
//!
//! Decodes Parameter Change and Bulk Dump frames into a registry of every
//! XG parameter, and saves the registry back as a stream of Parameter
//! Change frames.

pub mod config;
pub mod param;
pub mod session;
pub mod sysex;
pub mod transport;
