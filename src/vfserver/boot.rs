//! The boot sequence controller: a strictly ordered, run-once procedure
//! that assembles a bootable root filesystem and wires the console before
//! any descriptor traffic exists.
//!
//! Any failure is surfaced as a [`BootError`] instead of halting in place;
//! without a working root filesystem no further forward progress is
//! meaningful, so the process entry point is expected to halt exactly once
//! on an `Err` and never continue.

use thiserror::Error;

use crate::interface;
use crate::interface::errnos::Errno;

use super::bootfs::{self, BootfsEntry};
use super::devfs::{Console, DevFs};
use super::ramfs::RamFs;
use super::syscalls::fs_constants::*;
use super::task::Task;
use super::vfs::{FilesystemDriver, Vfs};

/// A fatal boot-time failure. Every variant names the step that died.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("bad bootfs image: {0}")]
    BadImage(String),
    #[error("failed to mount {fstype} on {target}: {errno}")]
    Mount {
        fstype: String,
        target: String,
        errno: Errno,
    },
    #[error("failed to create directory {path}: {errno}")]
    CreateDir { path: String, errno: Errno },
    #[error("couldn't create {name}: {errno}")]
    CreateFile { name: String, errno: Errno },
    #[error("write of {name} returned {wrote}, expected {expected}")]
    ShortWrite {
        name: String,
        expected: u64,
        wrote: i64,
    },
    #[error("failed to set boot working directory: {errno}")]
    Cwd { errno: Errno },
    #[error("failed to open console: {errno}")]
    Console { errno: Errno },
    #[error("expected console at descriptor {expected}, got {got}")]
    ConsoleDescriptor { expected: i32, got: i32 },
}

/// The booted system: the VFS, the single task, and a handle to the console
/// device for the host to feed and drain.
pub struct FsServer {
    vfs: interface::RustRfc<Vfs>,
    task: Task,
    console: interface::RustRfc<Console>,
}

impl FsServer {
    pub fn vfs(&self) -> &interface::RustRfc<Vfs> {
        &self.vfs
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn console(&self) -> &interface::RustRfc<Console> {
        &self.console
    }
}

fn errno_of(rv: i32) -> Errno {
    Errno::from_discriminant(-rv).unwrap_or(Errno::EIO)
}

/// Bring the system up from an embedded boot image.
///
/// Ordered steps: initialize the node subsystem and allocate the task,
/// initialize the console, run each filesystem driver's initializer in
/// registration order, mount ramfs at `/`, create and mount `/dev`, unpack
/// the boot archive, then open the console so descriptors 0, 1 and 2 all
/// reference it.
pub fn boot(image: &[u8], dirs: &[&str]) -> Result<FsServer, BootError> {
    // Decode the metadata up front so a malformed image never leaves a
    // half-unpacked tree behind.
    let records = bootfs::parse(image)?;

    let console = interface::RustRfc::new(Console::new());
    let drivers: Vec<Box<dyn FilesystemDriver>> = vec![
        Box::new(RamFs::new()),
        Box::new(DevFs::new(console.clone())),
    ];
    let vfs = interface::RustRfc::new(Vfs::new(drivers));

    vfs.vnode_init();
    let task = Task::new(vfs.clone());
    console.init();
    vfs.init_filesystems();

    mount_rootfs(&vfs, &task)?;
    unpack_bootfs(&task, image, &records, dirs)?;
    open_console(&task)?;

    Ok(FsServer {
        vfs: vfs,
        task: task,
        console: console,
    })
}

/// Mount the in-memory root at `/`, then create `/dev` and mount the device
/// filesystem there.
fn mount_rootfs(vfs: &Vfs, task: &Task) -> Result<(), BootError> {
    vfs.sys_mount("", "/", "ramfs", 0, None)
        .map_err(|errno| BootError::Mount {
            fstype: "ramfs".to_string(),
            target: "/".to_string(),
            errno: errno,
        })?;
    log::info!("mounted rootfs");

    task.set_cwd("/").map_err(|errno| BootError::Cwd { errno: errno })?;

    let rv = task.mkdir_syscall("/dev", 0o755);
    if rv < 0 {
        return Err(BootError::CreateDir {
            path: "/dev".to_string(),
            errno: errno_of(rv),
        });
    }

    vfs.sys_mount("", "/dev", "devfs", 0, None)
        .map_err(|errno| BootError::Mount {
            fstype: "devfs".to_string(),
            target: "/dev".to_string(),
            errno: errno,
        })?;
    log::info!("mounted devfs");
    Ok(())
}

/// Unpack the boot archive: create the listed directories, then each
/// packed file. A transferred byte count that differs from the record's
/// size is fatal.
fn unpack_bootfs(
    task: &Task,
    image: &[u8],
    records: &[BootfsEntry],
    dirs: &[&str],
) -> Result<(), BootError> {
    for dir in dirs {
        log::info!("creating {}", dir);
        let rv = task.mkdir_syscall(dir, 0o666);
        if rv < 0 {
            return Err(BootError::CreateDir {
                path: dir.to_string(),
                errno: errno_of(rv),
            });
        }
    }

    for md in records {
        log::info!("unpacking {}", md.name);

        let fd = task.creat_syscall(&md.name, 0o666);
        if fd < 0 {
            return Err(BootError::CreateFile {
                name: md.name.clone(),
                errno: errno_of(fd),
            });
        }

        // extents were validated by the parser
        let contents = &image[md.offset as usize..(md.offset + md.size) as usize];
        let wrote = task.write_syscall(fd, contents);
        if wrote as i64 != md.size as i64 {
            return Err(BootError::ShortWrite {
                name: md.name.clone(),
                expected: md.size,
                wrote: wrote as i64,
            });
        }

        task.close_syscall(fd);
    }
    Ok(())
}

/// Open the console, which must land on descriptor 0, and duplicate it onto
/// 1 and 2.
fn open_console(task: &Task) -> Result<(), BootError> {
    let fd = task.open_syscall("/dev/console", O_RDWR, 0);
    if fd < 0 {
        return Err(BootError::Console { errno: errno_of(fd) });
    }
    if fd != 0 {
        return Err(BootError::ConsoleDescriptor {
            expected: 0,
            got: fd,
        });
    }
    for expected in [1, 2] {
        let got = task.dup_syscall(0);
        if got != expected {
            return Err(BootError::ConsoleDescriptor {
                expected: expected,
                got: got,
            });
        }
    }
    Ok(())
}
