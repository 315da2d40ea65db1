pub mod category;
pub mod config;
pub mod note;
pub mod remind;
pub mod routine;
pub mod stats;
pub mod suggest;
pub mod task;
