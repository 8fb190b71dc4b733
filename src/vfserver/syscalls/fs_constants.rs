// File system related constants
#![allow(dead_code)]

// Imported into the fs_calls file

/// Capacity of the per-task descriptor table.
pub const OPEN_MAX: usize = 256;
/// Longest path the translator will hand to the VFS, including the
/// terminating NUL a C caller would expect.
pub const PATH_MAX: usize = 1024;

/// stat/fstat ABI version this server accepts.
pub const STAT_VER: i32 = 1;

// Vnode access rights requested when opening.
pub const VREAD: i32 = 0o4;
pub const VWRITE: i32 = 0o2;

pub const O_RDONLY: i32 = 0o0;
pub const O_WRONLY: i32 = 0o1;
pub const O_RDWR: i32 = 0o2;
pub const O_ACCMODE: i32 = 0o3;

pub const O_CREAT: i32 = 0o100;
pub const O_EXCL: i32 = 0o200;
pub const O_TRUNC: i32 = 0o1000;
pub const O_APPEND: i32 = 0o2000;

pub const SEEK_SET: i32 = 0;
pub const SEEK_CUR: i32 = 1;
pub const SEEK_END: i32 = 2;

pub const DEFAULT_UID: u32 = 0;
pub const DEFAULT_GID: u32 = 0;

//Standard flag combinations
pub const S_IRWXA: u32 = 0o777;
pub const S_IRWXU: u32 = 0o700;
pub const S_IRUSR: u32 = 0o400;
pub const S_IWUSR: u32 = 0o200;
pub const S_IXUSR: u32 = 0o100;

//File types for open/stat etc.
pub const S_IFCHR: u32 = 0o20000;
pub const S_IFDIR: u32 = 0o40000;
pub const S_IFREG: u32 = 0o100000;
pub const S_FILETYPEFLAGS: u32 = 0o170000;

//Directory entry types reported by readdir.
pub const DT_UNKNOWN: u8 = 0;
pub const DT_CHR: u8 = 2;
pub const DT_DIR: u8 = 4;
pub const DT_REG: u8 = 8;
