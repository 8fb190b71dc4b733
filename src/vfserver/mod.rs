//! The fd server: per-task POSIX descriptor layer, the vnode primitive
//! surface it delegates to, and the one-shot boot sequence that assembles a
//! root filesystem before any descriptor traffic exists.
//!
//! ## top-level pieces:
//!
//! - ### Task Objects:
//!     - Each task object owns a fixed-capacity File Descriptor Table and a
//!       Current Working Directory. Tasks are explicit context objects; every
//!       syscall is a method on the task that issued it.
//!
//! - ### File Descriptor Table:
//!     - An ordered array of `OPEN_MAX` slots, each empty or holding a shared
//!       reference to an open File Object. The slot index is the descriptor
//!       number; allocation always picks the lowest empty slot.
//!
//! - ### System Calls:
//!     - Public methods on the task corresponding to each POSIX entry point,
//!       implemented in `syscalls/fs_calls.rs`. They return a result code or
//!       a negated value from the `Errno` enum.
//!
//! - ### VFS Primitives:
//!     - The `sys_*` surface in `vfs.rs` (open/close/read/write/lseek/stat/
//!       mkdir/mknod/readdir/mount) together with the vnode tree, the mount
//!       table, and the filesystem driver registry (ramfs, devfs).
//!
//! - ### Boot:
//!     - `boot::boot` runs the strictly ordered bring-up: subsystem init,
//!       root and device mounts, bootfs unpack, console wiring. Any failure
//!       is surfaced as a `BootError`; the caller decides to halt.

pub mod boot;
pub mod bootfs;
pub mod devfs;
pub mod ramfs;
pub mod syscalls;
pub mod task;
pub mod vfs;
