pub mod pool;
pub mod relevance;

pub use pool::{build_tasks, EvalTask, Pool};
