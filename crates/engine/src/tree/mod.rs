//! Nested-set tree algorithms
//!
//! Every function here takes a [`NodeStore`](arbor_storage::NodeStore)
//! borrowed from an open transaction and leaves transaction control to the
//! caller. Bounds only move through `open_gap` and `close_gap`.

pub(crate) mod reader;
pub(crate) mod remover;
pub(crate) mod verify;
pub(crate) mod writer;
