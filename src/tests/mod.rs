#![allow(dead_code)]

mod boot_tests;

use crate::vfserver::boot::{self, FsServer};
use crate::vfserver::bootfs::BootfsImage;

/// Payload of the file every test image carries at /a/file.bin.
pub const TEST_PAYLOAD: [u8; 4] = [0xde, 0xad, 0xbe, 0xef];

/// Boot a fresh server from a one-file image. Tasks are explicit context
/// objects, so each test gets an isolated system and no cross-test state.
pub fn boot_test_server() -> FsServer {
    let image = BootfsImage::build(&[("/a/file.bin", &TEST_PAYLOAD)]);
    boot::boot(&image, &["/a"]).expect("test boot failed")
}
