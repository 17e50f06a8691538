//! Parser for the MTA:SA wiki dump: turns function and event pages into
//! structured signatures, OOP bindings and documentation.

pub mod config;
pub mod definitions;
pub mod dump;
pub mod oop;
pub mod page;
pub mod signature;
pub mod tokens;
pub mod wikitext;
