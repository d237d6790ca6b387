//! Backing store adapter: read-only SQLite access for the grid.
//!
//! Layout:
//! - `actor.rs`: one connection lane per worker, with the BUSY/LOCKED retry loop
//! - `adapter.rs`: opens, routes to and closes the lanes
//! - `failure.rs`: contention vs. engine failure classification
//! - `row.rs`: parameterized queries and text rows
//! - `schema.rs`: statement text for the geometry and properties tables

pub mod actor;
pub mod adapter;
pub mod row;
pub mod schema;

mod failure;

pub use adapter::StoreAdapter;
pub use row::{Bind, StoreQuery, StoreRow};
pub use schema::GridStatements;
