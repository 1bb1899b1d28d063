//! Route handlers for the Cambia server

pub mod convert;
pub mod health;
