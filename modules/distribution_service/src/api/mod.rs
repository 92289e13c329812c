//! API layer: REST endpoints and the in-process client

pub mod native;
pub mod rest;
