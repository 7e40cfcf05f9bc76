pub mod common;
pub mod like;
pub mod list;
pub mod stats;
pub mod submit;
pub mod sync;
pub mod watch;
