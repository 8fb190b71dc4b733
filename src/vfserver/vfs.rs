//! The vnode layer and the `sys_*` primitive surface the fd server delegates
//! to. Path resolution below the lexical translator, the mount table, and
//! the filesystem driver registry all live here; the descriptor table never
//! touches a vnode directly.

#![allow(dead_code)]

use crate::interface;
use crate::interface::errnos::Errno;
use crate::interface::{DirEnt, StatData};

use super::devfs::Console;
use super::syscalls::fs_constants::*;

bitflags::bitflags! {
    /// Vnode status flags exposed to the fd layer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VnodeFlags: u32 {
        /// The node is a terminal device.
        const VISTTY = 0o1;
    }
}

/// Behavior behind a character-device vnode.
#[derive(Clone)]
pub enum DevKind {
    Null,
    Zero,
    Console(interface::RustRfc<Console>),
}

pub enum VnodeKind {
    Reg,
    Dir,
    CharDev(DevKind),
}

/// A filesystem node owned by the VFS. Reference-counted independently of
/// the file objects that open it; dup increments both counts in lockstep.
pub struct Vnode {
    pub ino: usize,
    pub kind: VnodeKind,
    pub mode: u32,
    pub flags: VnodeFlags,
    refcount: interface::RustAtomicUsize,
    data: interface::RustLock<Vec<u8>>,
    entries: interface::RustHashMap<String, interface::RustRfc<Vnode>>,
}

impl Vnode {
    fn new(ino: usize, kind: VnodeKind, mode: u32, flags: VnodeFlags) -> Vnode {
        Vnode {
            ino: ino,
            kind: kind,
            mode: mode,
            flags: flags,
            refcount: interface::RustAtomicUsize::new(0),
            data: interface::RustLock::new(Vec::new()),
            entries: interface::RustHashMap::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, VnodeKind::Dir)
    }

    pub fn is_reg(&self) -> bool {
        matches!(self.kind, VnodeKind::Reg)
    }

    pub fn size(&self) -> usize {
        match self.kind {
            VnodeKind::Reg => self.data.read().len(),
            VnodeKind::Dir => self.entries.len(),
            VnodeKind::CharDev(_) => 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.refcount.load(interface::RustAtomicOrdering::Relaxed)
    }

    pub(crate) fn vref(&self) {
        self.refcount
            .fetch_add(1, interface::RustAtomicOrdering::Relaxed);
    }

    pub(crate) fn vrele(&self) {
        self.refcount
            .fetch_sub(1, interface::RustAtomicOrdering::Relaxed);
    }

    fn truncate(&self) {
        self.data.write().clear();
    }

    /// Install a child entry in a directory vnode. Drivers use this while
    /// assembling their trees at mount time.
    pub(crate) fn attach(&self, name: &str, vnode: interface::RustRfc<Vnode>) -> Result<(), Errno> {
        if !self.is_dir() {
            return Err(Errno::ENOTDIR);
        }
        if self.entries.contains_key(name) {
            return Err(Errno::EEXIST);
        }
        self.entries.insert(name.to_string(), vnode);
        Ok(())
    }

    fn lookup_child(&self, name: &str) -> Option<interface::RustRfc<Vnode>> {
        self.entries.get(name).map(|e| e.value().clone())
    }

    /// Directory entries in deterministic (name) order, for readdir.
    fn sorted_entries(&self) -> Vec<(String, interface::RustRfc<Vnode>)> {
        let mut v: Vec<(String, interface::RustRfc<Vnode>)> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        v.sort_by(|a, b| a.0.cmp(&b.0));
        v
    }
}

/// One open instance of a vnode. The read/write position lives here, not on
/// the descriptor, so descriptors produced by dup share it.
pub struct FileObject {
    vnode: interface::RustRfc<Vnode>,
    access: i32,
    flags: i32,
    count: interface::RustAtomicUsize,
    position: interface::RustLock<usize>,
}

impl FileObject {
    fn new(vnode: interface::RustRfc<Vnode>, access: i32, flags: i32, position: usize) -> FileObject {
        vnode.vref();
        FileObject {
            vnode: vnode,
            access: access,
            flags: flags,
            count: interface::RustAtomicUsize::new(1),
            position: interface::RustLock::new(position),
        }
    }

    pub fn vnode(&self) -> &interface::RustRfc<Vnode> {
        &self.vnode
    }

    pub fn share_count(&self) -> usize {
        self.count.load(interface::RustAtomicOrdering::Relaxed)
    }

    /// Add a sharer: the file share count and the vnode reference count move
    /// in lockstep on duplication.
    pub(crate) fn acquire(&self) {
        self.count
            .fetch_add(1, interface::RustAtomicOrdering::Relaxed);
        self.vnode.vref();
    }
}

/// A registered filesystem, `vfssw`-style. Drivers are initialized in
/// registration order during boot and produce a root directory on mount.
pub trait FilesystemDriver: Send + Sync {
    fn name(&self) -> &'static str;
    fn init(&self);
    fn mount(
        &self,
        vfs: &Vfs,
        source: &str,
        flags: u64,
        data: Option<&str>,
    ) -> Result<interface::RustRfc<Vnode>, Errno>;
}

struct MountRecord {
    fstype: String,
    target: String,
}

/// The VFS instance: vnode allocation, the mounted tree, and the driver
/// registry. Serializes its own state; callers hold no VFS locks.
pub struct Vfs {
    nextvnode: interface::RustAtomicUsize,
    root: interface::RustLock<Option<interface::RustRfc<Vnode>>>,
    mounts: interface::RustLock<Vec<MountRecord>>,
    drivers: Vec<Box<dyn FilesystemDriver>>,
    dev_id: u64,
}

impl Vfs {
    pub fn new(drivers: Vec<Box<dyn FilesystemDriver>>) -> Vfs {
        Vfs {
            nextvnode: interface::RustAtomicUsize::new(1),
            root: interface::RustLock::new(None),
            mounts: interface::RustLock::new(Vec::new()),
            drivers: drivers,
            dev_id: 20,
        }
    }

    /// Reset the node subsystem: no root, no mounts, vnode numbering starts
    /// over. Run before anything else during boot.
    pub fn vnode_init(&self) {
        *self.root.write() = None;
        self.mounts.write().clear();
        self.nextvnode
            .store(1, interface::RustAtomicOrdering::Relaxed);
    }

    /// Call each registered filesystem driver's initializer, in registration
    /// order.
    pub fn init_filesystems(&self) {
        for driver in &self.drivers {
            log::debug!("VFS: initializing {}", driver.name());
            driver.init();
        }
    }

    pub fn alloc_vnode(
        &self,
        kind: VnodeKind,
        mode: u32,
        flags: VnodeFlags,
    ) -> interface::RustRfc<Vnode> {
        let ino = self
            .nextvnode
            .fetch_add(1, interface::RustAtomicOrdering::Relaxed);
        interface::RustRfc::new(Vnode::new(ino, kind, mode, flags))
    }

    /// Walk an absolute, already-normalized path down the mounted tree.
    pub(crate) fn namei(&self, path: &str) -> Result<interface::RustRfc<Vnode>, Errno> {
        let mut cur = match &*self.root.read() {
            Some(root) => root.clone(),
            None => return Err(Errno::ENOENT),
        };
        for comp in path.split('/').filter(|c| !c.is_empty() && *c != ".") {
            if !cur.is_dir() {
                return Err(Errno::ENOTDIR);
            }
            cur = match cur.lookup_child(comp) {
                Some(child) => child,
                None => return Err(Errno::ENOENT),
            };
        }
        Ok(cur)
    }

    /// Split a path into its parent directory vnode and final component.
    fn lookup_parent<'a>(
        &self,
        path: &'a str,
    ) -> Result<(interface::RustRfc<Vnode>, &'a str), Errno> {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            // the root itself has no parent to create it in
            return Err(Errno::EEXIST);
        }
        let (dirname, name) = match trimmed.rfind('/') {
            Some(0) => ("/", &trimmed[1..]),
            Some(i) => (&trimmed[..i], &trimmed[i + 1..]),
            None => return Err(Errno::EINVAL),
        };
        let parent = self.namei(dirname)?;
        if !parent.is_dir() {
            return Err(Errno::ENOTDIR);
        }
        Ok((parent, name))
    }

    fn create_at(
        &self,
        parent: &Vnode,
        name: &str,
        kind: VnodeKind,
        mode: u32,
        flags: VnodeFlags,
    ) -> Result<interface::RustRfc<Vnode>, Errno> {
        if name.is_empty() {
            return Err(Errno::EINVAL);
        }
        if parent.entries.contains_key(name) {
            return Err(Errno::EEXIST);
        }
        let vnode = self.alloc_vnode(kind, mode, flags);
        parent.entries.insert(name.to_string(), vnode.clone());
        Ok(vnode)
    }

    fn access_check(&self, vnode: &Vnode, acc: i32) -> Result<(), Errno> {
        if 0 != acc & VREAD && 0 == vnode.mode & S_IRUSR {
            return Err(Errno::EACCES);
        }
        if 0 != acc & VWRITE && 0 == vnode.mode & S_IWUSR {
            return Err(Errno::EACCES);
        }
        Ok(())
    }

    //------------------------------------sys_* PRIMITIVE SURFACE------------------------------------
    // This is the whole of what the fd layer may call.

    pub fn sys_open(
        &self,
        path: &str,
        flags: i32,
        mode: u32,
    ) -> Result<interface::RustRfc<FileObject>, Errno> {
        let mut acc = 0;
        match flags & O_ACCMODE {
            O_RDONLY => acc = VREAD,
            O_WRONLY => acc = VWRITE,
            O_RDWR => acc = VREAD | VWRITE,
            _ => {}
        }

        let vnode = match self.namei(path) {
            Ok(vn) => {
                if (O_CREAT | O_EXCL) == (flags & (O_CREAT | O_EXCL)) {
                    return Err(Errno::EEXIST);
                }
                vn
            }
            Err(Errno::ENOENT) if 0 != flags & O_CREAT => {
                if mode & !(S_IRWXA | S_FILETYPEFLAGS) != 0 {
                    return Err(Errno::EPERM);
                }
                let (parent, name) = self.lookup_parent(path)?;
                self.create_at(
                    &parent,
                    name,
                    VnodeKind::Reg,
                    S_IFREG | (mode & S_IRWXA),
                    VnodeFlags::empty(),
                )?
            }
            Err(e) => return Err(e),
        };

        self.access_check(&vnode, acc)?;
        if vnode.is_dir() && 0 != acc & VWRITE {
            return Err(Errno::EISDIR);
        }
        if 0 != flags & O_TRUNC && vnode.is_reg() && 0 != acc & VWRITE {
            vnode.truncate();
        }

        let position = if 0 != flags & O_APPEND { vnode.size() } else { 0 };
        Ok(interface::RustRfc::new(FileObject::new(
            vnode, acc, flags, position,
        )))
    }

    /// Drop one share of an open file. The vnode reference taken at open or
    /// dup time is released with it; the object itself goes away when the
    /// last descriptor lets go.
    pub fn sys_close(&self, fp: &FileObject) -> Result<(), Errno> {
        fp.vnode.vrele();
        fp.count
            .fetch_sub(1, interface::RustAtomicOrdering::Relaxed);
        Ok(())
    }

    pub fn sys_read(&self, fp: &FileObject, buf: &mut [u8]) -> Result<usize, Errno> {
        if 0 == fp.access & VREAD {
            return Err(Errno::EBADF);
        }
        match &fp.vnode.kind {
            VnodeKind::Dir => Err(Errno::EISDIR),
            VnodeKind::CharDev(dev) => match dev {
                DevKind::Null => Ok(0),
                DevKind::Zero => {
                    buf.fill(0);
                    Ok(buf.len())
                }
                DevKind::Console(console) => Ok(console.read(buf)),
            },
            VnodeKind::Reg => {
                let mut pos = fp.position.write();
                let data = fp.vnode.data.read();
                if *pos >= data.len() {
                    return Ok(0);
                }
                let n = std::cmp::min(buf.len(), data.len() - *pos);
                buf[..n].copy_from_slice(&data[*pos..*pos + n]);
                *pos += n;
                Ok(n)
            }
        }
    }

    pub fn sys_write(&self, fp: &FileObject, buf: &[u8]) -> Result<usize, Errno> {
        if 0 == fp.access & VWRITE {
            return Err(Errno::EBADF);
        }
        match &fp.vnode.kind {
            VnodeKind::Dir => Err(Errno::EISDIR),
            VnodeKind::CharDev(dev) => match dev {
                DevKind::Null | DevKind::Zero => Ok(buf.len()),
                DevKind::Console(console) => Ok(console.write(buf)),
            },
            VnodeKind::Reg => {
                let mut pos = fp.position.write();
                let mut data = fp.vnode.data.write();
                let end = *pos + buf.len();
                // seeking past the end leaves a zero-filled gap
                if data.len() < end {
                    data.resize(end, 0);
                }
                data[*pos..end].copy_from_slice(buf);
                *pos = end;
                Ok(buf.len())
            }
        }
    }

    pub fn sys_lseek(&self, fp: &FileObject, offset: isize, whence: i32) -> Result<isize, Errno> {
        match &fp.vnode.kind {
            //for character files, rather than seeking, we transparently do nothing
            VnodeKind::CharDev(_) => Ok(0),

            VnodeKind::Reg => {
                let mut pos = fp.position.write();
                let eventualpos = match whence {
                    SEEK_SET => offset,
                    SEEK_CUR => *pos as isize + offset,
                    SEEK_END => fp.vnode.size() as isize + offset,
                    _ => return Err(Errno::EINVAL),
                };
                if eventualpos < 0 {
                    return Err(Errno::EINVAL);
                }
                *pos = eventualpos as usize;
                Ok(eventualpos)
            }

            //for directories we seek between entries, so the end position is
            //the total number of entries
            VnodeKind::Dir => {
                let mut pos = fp.position.write();
                let nentries = fp.vnode.entries.len() as isize;
                let eventualpos = match whence {
                    SEEK_SET => offset,
                    SEEK_CUR => *pos as isize + offset,
                    SEEK_END => nentries + offset,
                    _ => return Err(Errno::EINVAL),
                };
                if eventualpos < 0 || eventualpos > nentries {
                    return Err(Errno::EINVAL);
                }
                *pos = eventualpos as usize;
                Ok(eventualpos)
            }
        }
    }

    pub fn sys_stat(&self, path: &str, statbuf: &mut StatData) -> Result<(), Errno> {
        let vnode = self.namei(path)?;
        self.fill_stat(&vnode, statbuf);
        Ok(())
    }

    pub fn sys_fstat(&self, fp: &FileObject, statbuf: &mut StatData) -> Result<(), Errno> {
        self.fill_stat(&fp.vnode, statbuf);
        Ok(())
    }

    fn fill_stat(&self, vnode: &Vnode, statbuf: &mut StatData) {
        *statbuf = StatData {
            st_dev: self.dev_id,
            st_ino: vnode.ino,
            st_mode: vnode.mode,
            st_nlink: 1,
            st_uid: DEFAULT_UID,
            st_gid: DEFAULT_GID,
            st_rdev: 0,
            st_size: vnode.size(),
            st_blksize: 4096,
            st_blocks: (vnode.size() + 511) / 512,
            st_atim: (0, 0),
            st_mtim: (0, 0),
            st_ctim: (0, 0),
        };
    }

    pub fn sys_mkdir(&self, path: &str, mode: u32) -> Result<(), Errno> {
        let (parent, name) = self.lookup_parent(path)?;
        self.create_at(
            &parent,
            name,
            VnodeKind::Dir,
            S_IFDIR | (mode & S_IRWXA),
            VnodeFlags::empty(),
        )?;
        Ok(())
    }

    /// Create a filesystem node. Character devices made this way have no
    /// backing device and behave as the null device.
    pub fn sys_mknod(&self, path: &str, mode: u32) -> Result<(), Errno> {
        let kind = match mode & S_FILETYPEFLAGS {
            S_IFCHR => VnodeKind::CharDev(DevKind::Null),
            S_IFDIR => VnodeKind::Dir,
            0 | S_IFREG => VnodeKind::Reg,
            _ => return Err(Errno::EINVAL),
        };
        let typebits = if 0 == mode & S_FILETYPEFLAGS {
            S_IFREG
        } else {
            mode & S_FILETYPEFLAGS
        };
        let (parent, name) = self.lookup_parent(path)?;
        self.create_at(&parent, name, kind, typebits | (mode & S_IRWXA), VnodeFlags::empty())?;
        Ok(())
    }

    /// Read the next entry of an open directory, advancing its cursor.
    /// Reports `ENOENT` once the directory is exhausted.
    pub fn sys_readdir(&self, fp: &FileObject, dent: &mut DirEnt) -> Result<(), Errno> {
        if !fp.vnode.is_dir() {
            return Err(Errno::ENOTDIR);
        }
        let entries = fp.vnode.sorted_entries();
        let mut pos = fp.position.write();
        if *pos >= entries.len() {
            return Err(Errno::ENOENT);
        }
        let (name, child) = &entries[*pos];
        dent.d_ino = child.ino;
        dent.d_type = match child.kind {
            VnodeKind::Reg => DT_REG,
            VnodeKind::Dir => DT_DIR,
            VnodeKind::CharDev(_) => DT_CHR,
        };
        dent.d_name = name.clone();
        *pos += 1;
        Ok(())
    }

    pub fn sys_isatty(&self, fp: &FileObject) -> Result<bool, Errno> {
        Ok(fp.vnode.flags.contains(VnodeFlags::VISTTY))
    }

    /// Mount a registered filesystem at `target`. Mounting anywhere but `/`
    /// covers an existing directory with the new filesystem's root.
    pub fn sys_mount(
        &self,
        source: &str,
        target: &str,
        fstype: &str,
        flags: u64,
        data: Option<&str>,
    ) -> Result<(), Errno> {
        let driver = self
            .drivers
            .iter()
            .find(|d| d.name() == fstype)
            .ok_or(Errno::ENODEV)?;
        let fsroot = driver.mount(self, source, flags, data)?;
        if !fsroot.is_dir() {
            return Err(Errno::EINVAL);
        }

        if target == "/" {
            *self.root.write() = Some(fsroot);
        } else {
            let (parent, name) = self.lookup_parent(target)?;
            {
                let existing = parent.entries.get(name);
                match existing {
                    Some(e) if e.value().is_dir() => {}
                    Some(_) => return Err(Errno::ENOTDIR),
                    None => return Err(Errno::ENOENT),
                }
            }
            parent.entries.insert(name.to_string(), fsroot);
        }

        self.mounts.write().push(MountRecord {
            fstype: fstype.to_string(),
            target: target.to_string(),
        });
        log::info!("VFS: mounted {} on {}", fstype, target);
        Ok(())
    }
}
