//!  Chore persistence is organized through [chore_store::ChoreStore].
//!  The basic idea is:
//!   - The backend is a plain string-keyed key-value store ([backend::KeyValueStore]).
//!   - The whole chore list lives under one key as one JSON array.
//!   - Every mutation rewrites that array in full, so the stored list always matches
//!     memory after a successful operation.

pub mod backend;
pub mod chore_store;
pub mod entities;
