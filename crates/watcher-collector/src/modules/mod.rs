//! 배치 작업 모듈.

pub mod batch;
pub mod seed;

pub use batch::{run_batch, run_batch_on, run_batch_with, update_stock};
pub use seed::{parse_watch_list, seed_watch_list};
