//! Wire types for the TeamGames store API.

pub mod models;
