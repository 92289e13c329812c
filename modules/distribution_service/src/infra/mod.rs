//! Infrastructure: persistence and bearer token verification

pub mod auth;
pub mod storage;
