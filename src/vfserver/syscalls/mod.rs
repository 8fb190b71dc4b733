//! POSIX entry points of the fd server, implemented as methods on
//! [`Task`](crate::vfserver::task::Task). They return a code or a negated
//! value from the `errno` enum.

pub mod fs_calls;
pub mod fs_constants;
pub use fs_calls::*;
pub use fs_constants::*;
