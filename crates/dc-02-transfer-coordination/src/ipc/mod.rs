//! Inter-party session messages

pub mod payloads;
