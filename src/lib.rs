//! Client core for the tabletop club app: game scheduling, a keyed query cache, and
//! mutations that keep the cache honest.

pub mod api;
pub mod cache;
pub mod config;
pub mod dto;
pub mod error;
pub mod mutation;
pub mod schedule;
pub mod services;
pub mod state;
