//! Kanban task board.
//!
//! Tasks carry two persisted flags, `completed` and `in_progress`, which
//! classify every task into exactly one of three columns. Dragging a card
//! between columns rewrites the flags optimistically and persists the change
//! through a [`ports::TaskStore`]; a failed write puts the card back. The
//! module follows hexagonal architecture:
//!
//! - Domain types, column classification and read models in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The board service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
