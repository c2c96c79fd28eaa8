//! Application services: the two protocol roles

pub mod initiator;
pub mod responder;
