//! Kindred site configuration engine.
//!
//! Theme resolution and presentation, the maintenance gate, the settings
//! schema and its persistence, export/import, and the shared configuration
//! context. Nothing here talks to the network; the database store lives in
//! `kindred-db` and the HTTP surface in `kindred-api`.

pub mod context;
pub mod error;
pub mod export;
pub mod gate;
pub mod maintenance;
pub mod persistence;
pub mod presenter;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod theme;
pub mod types;
