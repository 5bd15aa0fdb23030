//! Request handlers for the relay server.

pub mod questions;
