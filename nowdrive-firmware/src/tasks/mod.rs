//! Embassy async tasks
//!
//! The radio task runs on a high-priority interrupt executor, the drive
//! task on the thread executor. They share only the receive queue.

pub mod drive;
pub mod receive;

pub use drive::drive_task;
pub use receive::receive_task;
