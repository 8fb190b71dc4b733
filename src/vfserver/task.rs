//! The per-task context: descriptor table, open count, and current working
//! directory. Exactly one task exists in this design, but it is an explicit
//! object passed around rather than a global, so callers that grow more
//! tasks later only need more of these.

#![allow(dead_code)]

use crate::interface;
use crate::interface::errnos::Errno;

use super::syscalls::fs_constants::*;
use super::vfs::{FileObject, Vfs, Vnode};

pub struct Task {
    vfs: interface::RustRfc<Vfs>,
    // slot index is the descriptor number handed to callers
    pub(crate) filedescriptortable: interface::RustLock<Vec<Option<interface::RustRfc<FileObject>>>>,
    pub(crate) nopens: interface::RustAtomicUsize,
    pub(crate) cwd: interface::RustLock<String>,
    // handle to the directory object backing cwd, kept referenced while we
    // point at it
    cwdnode: interface::RustLock<Option<interface::RustRfc<Vnode>>>,
}

impl Task {
    pub fn new(vfs: interface::RustRfc<Vfs>) -> Task {
        let mut table = Vec::with_capacity(OPEN_MAX);
        table.resize_with(OPEN_MAX, || None);
        Task {
            vfs: vfs,
            filedescriptortable: interface::RustLock::new(table),
            nopens: interface::RustAtomicUsize::new(0),
            cwd: interface::RustLock::new("/".to_string()),
            cwdnode: interface::RustLock::new(None),
        }
    }

    pub fn vfs(&self) -> &interface::RustRfc<Vfs> {
        &self.vfs
    }

    /// Number of descriptors currently bound. Always equals the number of
    /// occupied table slots.
    pub fn open_count(&self) -> usize {
        self.nopens.load(interface::RustAtomicOrdering::Relaxed)
    }

    /// The standard says we need to return the lowest open fd number.
    /// Scans but does not reserve: a caller that fails before binding leaves
    /// the table exactly as it found it.
    pub(crate) fn newfd(&self, table: &[Option<interface::RustRfc<FileObject>>]) -> Option<usize> {
        for fd in 0..OPEN_MAX {
            if table[fd].is_none() {
                return Some(fd);
            }
        }
        None
    }

    /// Descriptor lookup: out-of-range or empty slots are both `EBADF`.
    pub(crate) fn getfp(&self, fd: i32) -> Result<interface::RustRfc<FileObject>, Errno> {
        if fd < 0 || fd >= OPEN_MAX as i32 {
            return Err(Errno::EBADF);
        }
        let table = self.filedescriptortable.read();
        table[fd as usize].clone().ok_or(Errno::EBADF)
    }

    /// Point the task at a new working directory, swapping the vnode handle
    /// that pins it.
    pub(crate) fn set_cwd(&self, path: &str) -> Result<(), Errno> {
        let vnode = self.vfs.namei(path)?;
        if !vnode.is_dir() {
            return Err(Errno::ENOTDIR);
        }
        vnode.vref();
        let mut cwdnode = self.cwdnode.write();
        if let Some(old) = cwdnode.take() {
            old.vrele();
        }
        *cwdnode = Some(vnode);
        *self.cwd.write() = path.to_string();
        Ok(())
    }

    /// The path/access translator: canonicalize a user path against the
    /// task's working directory into the absolute form the VFS consumes.
    /// The requested access right rides along for the VFS to judge; the
    /// translator itself has no side effects.
    pub(crate) fn resolve(&self, path: &str, _acc: i32) -> Result<String, Errno> {
        if path.is_empty() {
            return Err(Errno::ENOENT);
        }

        let mut stack: Vec<String> = Vec::new();
        if !path.starts_with('/') {
            //relative paths start from the current working directory
            let cwd = self.cwd.read().clone();
            for comp in cwd.split('/') {
                if !comp.is_empty() {
                    stack.push(comp.to_string());
                }
            }
        }
        for comp in path.split('/') {
            match comp {
                "" | "." => {}
                ".." => {
                    stack.pop();
                }
                c => stack.push(c.to_string()),
            }
        }

        let truepath = format!("/{}", stack.join("/"));
        // room for the terminating NUL a C caller would carry
        if truepath.len() + 1 > PATH_MAX {
            return Err(Errno::ENAMETOOLONG);
        }
        Ok(truepath)
    }
}
