//! The device filesystem driver and the console device behind
//! `/dev/console`.

use std::collections::VecDeque;

use crate::interface;
use crate::interface::errnos::Errno;

use super::syscalls::fs_constants::*;
use super::vfs::{DevKind, FilesystemDriver, Vfs, Vnode, VnodeFlags, VnodeKind};

/// The console device. Writes land in an output buffer the host (or a test)
/// can drain; reads consume a queued input stream.
pub struct Console {
    initialized: interface::RustAtomicBool,
    output: interface::RustMutex<Vec<u8>>,
    input: interface::RustMutex<VecDeque<u8>>,
}

impl Console {
    pub fn new() -> Console {
        Console {
            initialized: interface::RustAtomicBool::new(false),
            output: interface::RustMutex::new(Vec::new()),
            input: interface::RustMutex::new(VecDeque::new()),
        }
    }

    pub fn init(&self) {
        self.initialized
            .store(true, interface::RustAtomicOrdering::Relaxed);
        log::debug!("console: initialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(interface::RustAtomicOrdering::Relaxed)
    }

    pub fn write(&self, buf: &[u8]) -> usize {
        self.output.lock().extend_from_slice(buf);
        buf.len()
    }

    pub fn read(&self, buf: &mut [u8]) -> usize {
        let mut input = self.input.lock();
        let mut n = 0;
        while n < buf.len() {
            match input.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    /// Drain everything written to the console so far.
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut *self.output.lock())
    }

    /// Queue bytes for subsequent console reads.
    pub fn push_input(&self, bytes: &[u8]) {
        self.input.lock().extend(bytes.iter().copied());
    }
}

impl Default for Console {
    fn default() -> Console {
        Console::new()
    }
}

pub struct DevFs {
    console: interface::RustRfc<Console>,
}

impl DevFs {
    pub fn new(console: interface::RustRfc<Console>) -> DevFs {
        DevFs { console: console }
    }
}

impl FilesystemDriver for DevFs {
    fn name(&self) -> &'static str {
        "devfs"
    }

    fn init(&self) {}

    /// Build the device tree: `console` (a terminal), plus the `null` and
    /// `zero` special files.
    fn mount(
        &self,
        vfs: &Vfs,
        _source: &str,
        _flags: u64,
        _data: Option<&str>,
    ) -> Result<interface::RustRfc<Vnode>, Errno> {
        let root = vfs.alloc_vnode(VnodeKind::Dir, S_IFDIR | S_IRWXA, VnodeFlags::empty());
        let devices: [(&str, DevKind, VnodeFlags); 3] = [
            (
                "console",
                DevKind::Console(self.console.clone()),
                VnodeFlags::VISTTY,
            ),
            ("null", DevKind::Null, VnodeFlags::empty()),
            ("zero", DevKind::Zero, VnodeFlags::empty()),
        ];
        for (name, dev, nodeflags) in devices {
            let vnode = vfs.alloc_vnode(VnodeKind::CharDev(dev), S_IFCHR | 0o666, nodeflags);
            root.attach(name, vnode)?;
        }
        Ok(root)
    }
}
