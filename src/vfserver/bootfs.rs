//! The embedded boot archive format.
//!
//! A boot image begins with a run of fixed 128-byte metadata records
//! `{u64 size, u64 offset, char name[112]}` (little endian, offset relative
//! to the start of the blob), terminated by a record whose name is empty.
//! The payload bytes follow. The parser turns that in-band-terminated prefix
//! into an explicit, length-known sequence before any unpacking starts.

use super::boot::BootError;

pub const BOOTFS_NAMELEN: usize = 112;
pub const BOOTFS_RECSIZE: usize = 128;

/// One file packed into the boot image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootfsEntry {
    pub name: String,
    pub offset: u64,
    pub size: u64,
}

/// Decode the metadata records at the head of a boot image.
///
/// Fails if the record run is not terminated, a name is not UTF-8, or an
/// entry's extent falls outside the blob — all of which would otherwise
/// surface later as a mid-unpack failure.
pub fn parse(image: &[u8]) -> Result<Vec<BootfsEntry>, BootError> {
    let mut entries = Vec::new();
    let mut off = 0usize;
    loop {
        if off + BOOTFS_RECSIZE > image.len() {
            return Err(BootError::BadImage(
                "metadata records are not terminated by an empty-name record".to_string(),
            ));
        }
        let rec = &image[off..off + BOOTFS_RECSIZE];
        let size = u64::from_le_bytes(rec[0..8].try_into().unwrap());
        let offset = u64::from_le_bytes(rec[8..16].try_into().unwrap());
        let name_field = &rec[16..BOOTFS_RECSIZE];
        let name_len = name_field
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(BOOTFS_NAMELEN);
        if name_len == 0 {
            return Ok(entries);
        }
        let name = match std::str::from_utf8(&name_field[..name_len]) {
            Ok(s) => s.to_string(),
            Err(_) => {
                return Err(BootError::BadImage(format!(
                    "record {} has a non-UTF-8 name",
                    entries.len()
                )));
            }
        };
        let end = match offset.checked_add(size) {
            Some(end) => end,
            None => {
                return Err(BootError::BadImage(format!(
                    "extent of {} overflows",
                    name
                )));
            }
        };
        if end > image.len() as u64 {
            return Err(BootError::BadImage(format!(
                "{} extends past the end of the image",
                name
            )));
        }
        entries.push(BootfsEntry {
            name: name,
            offset: offset,
            size: size,
        });
        off += BOOTFS_RECSIZE;
    }
}

/// Build-side packer, used by tests and the demo binary to produce images in
/// the same layout the build step emits.
pub struct BootfsImage;

impl BootfsImage {
    /// Pack `(name, contents)` pairs: metadata records first, then an
    /// empty-name terminator, then the payloads. Panics on a name that does
    /// not fit the fixed 112-byte field, which is a build-input error.
    pub fn build(files: &[(&str, &[u8])]) -> Vec<u8> {
        let header_len = (files.len() + 1) * BOOTFS_RECSIZE;
        let mut image = vec![0u8; header_len];
        let mut data_off = header_len as u64;
        for (i, (name, contents)) in files.iter().enumerate() {
            assert!(
                name.len() < BOOTFS_NAMELEN,
                "bootfs name too long: {}",
                name
            );
            let rec = &mut image[i * BOOTFS_RECSIZE..(i + 1) * BOOTFS_RECSIZE];
            rec[0..8].copy_from_slice(&(contents.len() as u64).to_le_bytes());
            rec[8..16].copy_from_slice(&data_off.to_le_bytes());
            rec[16..16 + name.len()].copy_from_slice(name.as_bytes());
            data_off += contents.len() as u64;
        }
        // the terminator record is already all zeroes
        for (_, contents) in files {
            image.extend_from_slice(contents);
        }
        image
    }
}
