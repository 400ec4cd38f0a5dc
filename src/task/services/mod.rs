//! Application services for the kanban board.

mod board;
mod optimistic;

pub use board::{
    BoardError, BoardResult, BoardService, CreateTaskRequest, DropOutcome, EditTaskRequest,
    TransitionOutcome,
};
pub use optimistic::{BeginMove, OptimisticBoard, PendingMove, Settlement};
