//! The in-memory root filesystem driver.

use crate::interface;
use crate::interface::errnos::Errno;

use super::syscalls::fs_constants::*;
use super::vfs::{FilesystemDriver, Vfs, Vnode, VnodeFlags, VnodeKind};

/// ramfs keeps everything in vnode-attached memory, so the driver itself is
/// stateless: mounting produces a fresh empty root directory.
pub struct RamFs;

impl RamFs {
    pub fn new() -> RamFs {
        RamFs
    }
}

impl Default for RamFs {
    fn default() -> RamFs {
        RamFs::new()
    }
}

impl FilesystemDriver for RamFs {
    fn name(&self) -> &'static str {
        "ramfs"
    }

    fn init(&self) {}

    fn mount(
        &self,
        vfs: &Vfs,
        _source: &str,
        _flags: u64,
        _data: Option<&str>,
    ) -> Result<interface::RustRfc<Vnode>, Errno> {
        Ok(vfs.alloc_vnode(VnodeKind::Dir, S_IFDIR | S_IRWXA, VnodeFlags::empty()))
    }
}
