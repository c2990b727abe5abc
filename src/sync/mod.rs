pub mod iter;
pub mod queue;
