// Data structures exchanged across the syscall surface.
#![allow(dead_code)]

/// stat/fstat output buffer.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct StatData {
    pub st_dev: u64,
    pub st_ino: usize,
    pub st_mode: u32,
    pub st_nlink: u32,
    pub st_uid: u32,
    pub st_gid: u32,
    pub st_rdev: u64,
    pub st_size: usize,
    pub st_blksize: isize,
    pub st_blocks: usize,
    //currently we don't populate or care about the time bits here
    pub st_atim: (u64, u64),
    pub st_mtim: (u64, u64),
    pub st_ctim: (u64, u64),
}

/// One directory entry, filled by readdir.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct DirEnt {
    pub d_ino: usize,
    pub d_type: u8,
    pub d_name: String,
}
