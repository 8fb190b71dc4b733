#[cfg(test)]
mod boot_tests {
    use crate::interface;
    use crate::tests::*;
    use crate::vfserver::boot::{self, BootError};
    use crate::vfserver::bootfs::{self, BootfsImage, BOOTFS_RECSIZE};
    use crate::vfserver::syscalls::fs_constants::*;

    #[test]
    pub fn ut_bootfs_parse() {
        let image = BootfsImage::build(&[
            ("/a/one.bin", b"11111"),
            ("/a/two.bin", b"2"),
        ]);
        let entries = bootfs::parse(&image).unwrap();
        assert_eq!(entries.len(), 2);

        // records then terminator, payloads packed behind them in order
        let header = 3 * BOOTFS_RECSIZE;
        assert_eq!(entries[0].name, "/a/one.bin");
        assert_eq!(entries[0].size, 5);
        assert_eq!(entries[0].offset, header as u64);
        assert_eq!(entries[1].name, "/a/two.bin");
        assert_eq!(entries[1].offset, header as u64 + 5);

        // an image that is nothing but a terminator holds no files
        assert_eq!(bootfs::parse(&vec![0u8; BOOTFS_RECSIZE]).unwrap().len(), 0);
    }

    #[test]
    pub fn ut_bootfs_parse_rejects_bad_images() {
        // no terminator record at all
        let unterminated = vec![0x41u8; BOOTFS_RECSIZE - 1];
        assert!(matches!(
            bootfs::parse(&unterminated),
            Err(BootError::BadImage(_))
        ));

        // truncated mid-record
        let mut truncated = BootfsImage::build(&[("/a/file.bin", b"abcd")]);
        truncated.truncate(BOOTFS_RECSIZE + 10);
        assert!(matches!(
            bootfs::parse(&truncated),
            Err(BootError::BadImage(_))
        ));

        // a record whose extent runs past the end of the blob
        let mut overlong = BootfsImage::build(&[("/a/file.bin", b"abcd")]);
        overlong[0..8].copy_from_slice(&(1u64 << 20).to_le_bytes());
        assert!(matches!(
            bootfs::parse(&overlong),
            Err(BootError::BadImage(_))
        ));
    }

    #[test]
    pub fn ut_boot_unpacks_image() {
        let server = boot_test_server();
        let task = server.task();

        // the listed directory was created
        let mut st = interface::StatData::default();
        assert_eq!(task.stat_syscall(STAT_VER, "/a", &mut st), 0);
        assert_eq!(st.st_mode & S_FILETYPEFLAGS, S_IFDIR);

        // the packed file holds exactly the payload bytes
        let fd = task.open_syscall("/a/file.bin", O_RDONLY, 0);
        assert!(fd >= 0);
        let mut buf = [0u8; 16];
        assert_eq!(task.read_syscall(fd, &mut buf), TEST_PAYLOAD.len() as i32);
        assert_eq!(&buf[..TEST_PAYLOAD.len()], &TEST_PAYLOAD);
        assert_eq!(task.read_syscall(fd, &mut buf), 0);
    }

    #[test]
    pub fn ut_boot_wires_console_descriptors() {
        let server = boot_test_server();
        let task = server.task();

        // 0, 1 and 2 all reference the console node
        let fp0 = task.getfp(0).unwrap();
        for fd in [1, 2] {
            let fp = task.getfp(fd).unwrap();
            assert!(interface::RustRfc::ptr_eq(fp0.vnode(), fp.vnode()));
            assert_eq!(task.isatty_syscall(fd), 1);
        }
        assert_eq!(fp0.share_count(), 3);
        assert_eq!(fp0.vnode().node_count(), 3);

        let mut st = interface::StatData::default();
        assert_eq!(task.fstat_syscall(STAT_VER, 1, &mut st), 0);
        assert_eq!(st.st_mode & S_FILETYPEFLAGS, S_IFCHR);

        // stdout lands on the console device
        assert_eq!(task.write_syscall(1, b"hi"), 2);
        assert_eq!(server.console().take_output(), b"hi");

        // stdin drains queued console input
        server.console().push_input(b"ok\n");
        let mut buf = [0u8; 8];
        assert_eq!(task.read_syscall(0, &mut buf), 3);
        assert_eq!(&buf[..3], b"ok\n");
        assert_eq!(task.read_syscall(0, &mut buf), 0);

        assert!(server.console().is_initialized());
    }

    #[test]
    pub fn ut_boot_rejects_malformed_image() {
        let unterminated = vec![0x41u8; 2 * BOOTFS_RECSIZE];
        assert!(matches!(
            boot::boot(&unterminated, &[]),
            Err(BootError::BadImage(_))
        ));
    }

    #[test]
    pub fn ut_boot_fails_on_missing_parent_dir() {
        // the file's parent directory is not in the directory list
        let image = BootfsImage::build(&[("/a/file.bin", &TEST_PAYLOAD)]);
        match boot::boot(&image, &[]) {
            Err(BootError::CreateFile { name, .. }) => assert_eq!(name, "/a/file.bin"),
            other => panic!("expected CreateFile error, got {:?}", other.err()),
        }
    }

    #[test]
    pub fn ut_boot_fails_on_duplicate_dir() {
        let image = BootfsImage::build(&[("/a/file.bin", &TEST_PAYLOAD)]);
        match boot::boot(&image, &["/a", "/a"]) {
            Err(BootError::CreateDir { path, .. }) => assert_eq!(path, "/a"),
            other => panic!("expected CreateDir error, got {:?}", other.err()),
        }
    }

    #[test]
    pub fn ut_boot_cwd_is_root() {
        let server = boot_test_server();
        let mut buf = [0u8; 8];
        assert_eq!(server.task().getcwd_syscall(&mut buf), 0);
        assert_eq!(&buf[..2], b"/\0");
    }
}
