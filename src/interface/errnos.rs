// Errno values and the syscall error convention.
#![allow(dead_code)]

use crate::interface;

// Whether syscall_error chatter goes to the log. Off by default so the
// expected-failure paths exercised by tests stay quiet.
pub static VERBOSE: interface::RustAtomicBool = interface::RustAtomicBool::new(false);

/// The subset of POSIX errnos the fd server reports or propagates.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(i32)]
pub enum Errno {
    /// Operation not permitted
    EPERM = 1,
    /// No such file or directory
    ENOENT = 2,
    /// I/O error
    EIO = 5,
    /// Bad file number
    EBADF = 9,
    /// Permission denied
    EACCES = 13,
    /// File exists
    EEXIST = 17,
    /// No such device
    ENODEV = 19,
    /// Not a directory
    ENOTDIR = 20,
    /// Is a directory
    EISDIR = 21,
    /// Invalid argument
    EINVAL = 22,
    /// File table overflow
    ENFILE = 23,
    /// Too many open files
    EMFILE = 24,
    /// Not a typewriter
    ENOTTY = 25,
    /// No space left on device
    ENOSPC = 28,
    /// Math result not representable
    ERANGE = 34,
    /// File name too long
    ENAMETOOLONG = 36,
    /// Function not implemented
    ENOSYS = 38,
}

impl Errno {
    pub fn from_discriminant(discriminant: i32) -> Result<Errno, ()> {
        match discriminant {
            1 => Ok(Errno::EPERM),
            2 => Ok(Errno::ENOENT),
            5 => Ok(Errno::EIO),
            9 => Ok(Errno::EBADF),
            13 => Ok(Errno::EACCES),
            17 => Ok(Errno::EEXIST),
            19 => Ok(Errno::ENODEV),
            20 => Ok(Errno::ENOTDIR),
            21 => Ok(Errno::EISDIR),
            22 => Ok(Errno::EINVAL),
            23 => Ok(Errno::ENFILE),
            24 => Ok(Errno::EMFILE),
            25 => Ok(Errno::ENOTTY),
            28 => Ok(Errno::ENOSPC),
            34 => Ok(Errno::ERANGE),
            36 => Ok(Errno::ENAMETOOLONG),
            38 => Ok(Errno::ENOSYS),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Errno {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Report a syscall failure in the POSIX convention: the caller receives the
/// negated errno as its sentinel return value.
pub fn syscall_error(e: Errno, syscall: &str, message: &str) -> i32 {
    if VERBOSE.load(interface::RustAtomicOrdering::Relaxed) {
        log::debug!("Error in syscall: {} - {:?}: {}", syscall, e, message);
    }
    -(e as i32)
}
