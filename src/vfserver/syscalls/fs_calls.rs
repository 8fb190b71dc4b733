//! This module contains all filesystem-related system calls.
//!
//! Every entry point follows the same shape: validate the arguments,
//! translate the path or descriptor, delegate to the VFS primitive, and map
//! the outcome into the POSIX convention — a non-negative success value, or
//! the negated errno from [`syscall_error`].

#![allow(dead_code)]

// File system related system calls
use super::fs_constants::*;
use crate::interface;
use crate::interface::errnos::{syscall_error, Errno};
use crate::vfserver::task::Task;

impl Task {
    //------------------------------------OPEN SYSCALL------------------------------------
    /// Open (and possibly create) a file, binding the lowest free descriptor
    /// slot to the resulting file object.
    ///
    /// The slot is only scanned up front, never reserved: if path
    /// translation or the VFS open fails, the table is left untouched, so a
    /// failed open can never leak a descriptor.
    ///
    /// ### Errors
    /// * `EMFILE` - the descriptor table is full
    /// * `ENOENT` - empty path, or the file does not exist and `O_CREAT` was
    ///   not given
    /// * any other resolution or open error the VFS reports, verbatim
    pub fn open_syscall(&self, path: &str, flags: i32, mode: u32) -> i32 {
        if path.is_empty() {
            return syscall_error(Errno::ENOENT, "open", "given path was null");
        }

        let mut table = self.filedescriptortable.write();

        // Find empty slot for file descriptor.
        let fd = match self.newfd(&table) {
            Some(fd) => fd,
            None => {
                return syscall_error(
                    Errno::EMFILE,
                    "open",
                    "no available file descriptor number could be found",
                );
            }
        };

        let acc = match flags & O_ACCMODE {
            O_RDONLY => VREAD,
            O_WRONLY => VWRITE,
            O_RDWR => VREAD | VWRITE,
            _ => 0,
        };

        let truepath = match self.resolve(path, acc) {
            Ok(p) => p,
            Err(e) => return syscall_error(e, "open", "path translation failed"),
        };

        let fp = match self.vfs().sys_open(&truepath, flags, mode) {
            Ok(fp) => fp,
            Err(e) => return syscall_error(e, "open", "could not open file"),
        };

        table[fd] = Some(fp);
        self.nopens
            .fetch_add(1, interface::RustAtomicOrdering::Relaxed);
        fd as i32
    }

    //------------------------------------CREAT SYSCALL------------------------------------
    pub fn creat_syscall(&self, path: &str, mode: u32) -> i32 {
        self.open_syscall(path, O_CREAT | O_WRONLY | O_TRUNC, mode)
    }

    //------------------------------------CLOSE SYSCALL------------------------------------
    /// Release a descriptor. The slot is cleared only after the VFS accepts
    /// the close; on failure the binding stays so the caller can retry.
    pub fn close_syscall(&self, fd: i32) -> i32 {
        if fd < 0 || fd >= OPEN_MAX as i32 {
            return syscall_error(Errno::EBADF, "close", "invalid file descriptor");
        }
        let mut table = self.filedescriptortable.write();
        let fp = match &table[fd as usize] {
            Some(fp) => fp.clone(),
            None => return syscall_error(Errno::EBADF, "close", "invalid file descriptor"),
        };

        if let Err(e) = self.vfs().sys_close(&fp) {
            return syscall_error(e, "close", "could not close file");
        }

        table[fd as usize] = None;
        self.nopens
            .fetch_sub(1, interface::RustAtomicOrdering::Relaxed);
        0
    }

    //------------------------------------READ SYSCALL------------------------------------
    pub fn read_syscall(&self, fd: i32, buf: &mut [u8]) -> i32 {
        let fp = match self.getfp(fd) {
            Ok(fp) => fp,
            Err(e) => return syscall_error(e, "read", "invalid file descriptor"),
        };
        match self.vfs().sys_read(&fp, buf) {
            Ok(bytes) => bytes as i32,
            Err(e) => syscall_error(e, "read", "could not read from file"),
        }
    }

    //------------------------------------WRITE SYSCALL------------------------------------
    pub fn write_syscall(&self, fd: i32, buf: &[u8]) -> i32 {
        let fp = match self.getfp(fd) {
            Ok(fp) => fp,
            Err(e) => return syscall_error(e, "write", "invalid file descriptor"),
        };
        match self.vfs().sys_write(&fp, buf) {
            Ok(bytes) => bytes as i32,
            Err(e) => syscall_error(e, "write", "could not write to file"),
        }
    }

    //------------------------------------LSEEK SYSCALL------------------------------------
    pub fn lseek_syscall(&self, fd: i32, offset: isize, whence: i32) -> isize {
        let fp = match self.getfp(fd) {
            Ok(fp) => fp,
            Err(e) => return syscall_error(e, "lseek", "invalid file descriptor") as isize,
        };
        match self.vfs().sys_lseek(&fp, offset, whence) {
            Ok(newpos) => newpos,
            Err(e) => syscall_error(e, "lseek", "could not seek") as isize,
        }
    }

    //------------------------------------MKDIR SYSCALL------------------------------------
    pub fn mkdir_syscall(&self, path: &str, mode: u32) -> i32 {
        let truepath = match self.resolve(path, VWRITE) {
            Ok(p) => p,
            Err(e) => return syscall_error(e, "mkdir", "path translation failed"),
        };
        match self.vfs().sys_mkdir(&truepath, mode) {
            Ok(()) => 0,
            Err(e) => syscall_error(e, "mkdir", "could not create directory"),
        }
    }

    //------------------------------------MKNOD SYSCALL------------------------------------
    pub fn mknod_syscall(&self, path: &str, mode: u32, _dev: u64) -> i32 {
        let truepath = match self.resolve(path, VWRITE) {
            Ok(p) => p,
            Err(e) => return syscall_error(e, "mknod", "path translation failed"),
        };
        match self.vfs().sys_mknod(&truepath, mode) {
            Ok(()) => 0,
            Err(e) => syscall_error(e, "mknod", "could not create node"),
        }
    }

    //------------------------------------STAT SYSCALL------------------------------------
    /// The canonical path-stat implementation. Every ABI variant funnels
    /// here; only version [`STAT_VER`] is accepted, and a rejected version
    /// leaves `statbuf` untouched.
    pub fn stat_syscall(&self, ver: i32, path: &str, statbuf: &mut interface::StatData) -> i32 {
        if ver != STAT_VER {
            return syscall_error(Errno::ENOSYS, "stat", "unsupported stat ABI version");
        }
        let truepath = match self.resolve(path, 0) {
            Ok(p) => p,
            Err(e) => return syscall_error(e, "stat", "path translation failed"),
        };
        match self.vfs().sys_stat(&truepath, statbuf) {
            Ok(()) => 0,
            Err(e) => syscall_error(e, "stat", "could not stat file"),
        }
    }

    /// 64-bit stat variant. Same layout in this design, so it delegates to
    /// the canonical implementation.
    pub fn stat64_syscall(&self, ver: i32, path: &str, statbuf: &mut interface::StatData) -> i32 {
        self.stat_syscall(ver, path, statbuf)
    }

    //------------------------------------FSTAT SYSCALL------------------------------------
    pub fn fstat_syscall(&self, ver: i32, fd: i32, statbuf: &mut interface::StatData) -> i32 {
        if ver != STAT_VER {
            return syscall_error(Errno::ENOSYS, "fstat", "unsupported stat ABI version");
        }
        let fp = match self.getfp(fd) {
            Ok(fp) => fp,
            Err(e) => return syscall_error(e, "fstat", "invalid file descriptor"),
        };
        match self.vfs().sys_fstat(&fp, statbuf) {
            Ok(()) => 0,
            Err(e) => syscall_error(e, "fstat", "could not stat file"),
        }
    }

    /// 64-bit fstat variant, delegating like [`Task::stat64_syscall`].
    pub fn fstat64_syscall(&self, ver: i32, fd: i32, statbuf: &mut interface::StatData) -> i32 {
        self.fstat_syscall(ver, fd, statbuf)
    }

    //------------------------------------READDIR SYSCALL------------------------------------
    /// Fill `dent` with the next entry of the open directory, advancing the
    /// cursor held on the file object. Exhaustion reports `ENOENT`.
    pub fn readdir_syscall(&self, fd: i32, dent: &mut interface::DirEnt) -> i32 {
        let fp = match self.getfp(fd) {
            Ok(fp) => fp,
            Err(e) => return syscall_error(e, "readdir", "invalid file descriptor"),
        };
        match self.vfs().sys_readdir(&fp, dent) {
            Ok(()) => 0,
            Err(e) => syscall_error(e, "readdir", "could not read directory"),
        }
    }

    //------------------------------------GETCWD SYSCALL------------------------------------
    /// Copy the task's working directory, NUL-terminated, into `buf`.
    /// A buffer too small for the whole path is an error (`ERANGE`) rather
    /// than a silent truncation.
    pub fn getcwd_syscall(&self, buf: &mut [u8]) -> i32 {
        if buf.is_empty() {
            return syscall_error(Errno::EINVAL, "getcwd", "size of the specified buffer is 0");
        }
        let mut bytes: Vec<u8> = self.cwd.read().as_bytes().to_vec();
        bytes.push(0u8);
        if buf.len() < bytes.len() {
            return syscall_error(
                Errno::ERANGE,
                "getcwd",
                "the length of the working directory exceeds the given size",
            );
        }
        buf[..bytes.len()].copy_from_slice(&bytes);
        0
    }

    //------------------------------------DUP SYSCALL------------------------------------
    /// Duplicate a file descriptor into the lowest free slot. The new
    /// descriptor shares the file object — and therefore the file position —
    /// with the old one; the file and node reference counts both rise.
    pub fn dup_syscall(&self, fd: i32) -> i32 {
        if fd < 0 || fd >= OPEN_MAX as i32 {
            return syscall_error(Errno::EBADF, "dup", "invalid old file descriptor");
        }
        let mut table = self.filedescriptortable.write();
        let fp = match &table[fd as usize] {
            Some(fp) => fp.clone(),
            None => return syscall_error(Errno::EBADF, "dup", "invalid old file descriptor"),
        };

        // Find smallest empty slot as new fd.
        let newfd = match self.newfd(&table) {
            Some(newfd) => newfd,
            None => {
                return syscall_error(
                    Errno::EMFILE,
                    "dup",
                    "no available file descriptor number could be found",
                );
            }
        };

        // Increment file reference
        fp.acquire();
        table[newfd] = Some(fp);
        self.nopens
            .fetch_add(1, interface::RustAtomicOrdering::Relaxed);
        newfd as i32
    }

    //------------------------------------DUP2 SYSCALL------------------------------------
    /// Duplicate a file descriptor to a particular slot. Whatever was bound
    /// at `newfd` is closed first, exactly once. Duplicating a descriptor
    /// onto itself leaves the binding alone and returns it unchanged.
    pub fn dup2_syscall(&self, oldfd: i32, newfd: i32) -> i32 {
        if oldfd < 0 || oldfd >= OPEN_MAX as i32 || newfd < 0 || newfd >= OPEN_MAX as i32 {
            return syscall_error(Errno::EBADF, "dup2", "file descriptor is out of range");
        }
        let mut table = self.filedescriptortable.write();
        let fp = match &table[oldfd as usize] {
            Some(fp) => fp.clone(),
            None => return syscall_error(Errno::EBADF, "dup2", "invalid old file descriptor"),
        };

        if oldfd == newfd {
            return newfd;
        }

        if let Some(org) = table[newfd as usize].take() {
            // Close previous file if it's opened. Mirror the implementation
            // of Linux and ignore any error from this close.
            let _close_result = self.vfs().sys_close(&org);
            self.nopens
                .fetch_sub(1, interface::RustAtomicOrdering::Relaxed);
        }

        // Increment file reference
        fp.acquire();
        table[newfd as usize] = Some(fp);
        self.nopens
            .fetch_add(1, interface::RustAtomicOrdering::Relaxed);
        newfd
    }

    //------------------------------------ISATTY SYSCALL------------------------------------
    /// Return whether the descriptor refers to a terminal, judged by the
    /// node's flags.
    pub fn isatty_syscall(&self, fd: i32) -> i32 {
        let fp = match self.getfp(fd) {
            Ok(fp) => fp,
            Err(e) => return syscall_error(e, "isatty", "invalid file descriptor"),
        };
        match self.vfs().sys_isatty(&fp) {
            Ok(true) => 1,
            Ok(false) => 0,
            Err(e) => syscall_error(e, "isatty", "could not query terminal flag"),
        }
    }
}
