//! Taskov: a role-aware kanban task board.
//!
//! The crate models personal tasks arranged on a three-column board
//! ("To Do", "In Progress", "Completed"), the drag-and-drop rules that move
//! them between columns, and the role-based access checks that decide who
//! may see or change a task.
//!
//! # Architecture
//!
//! Taskov follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`access`]: Roles, capabilities and ownership checks
//! - [`config`]: JSON configuration for roles and dashboard limits
//! - [`task`]: Tasks, board columns, drag handling and persistence

pub mod access;
pub mod config;
pub mod task;
