//! Per-file metadata record stored in the archive's index.

use crate::error::PacError;

/// Size in bytes of the name field, including the NUL terminator budget.
pub const NAME_FIELD_LEN: usize = 0x40;

/// Fixed-size, no-padding record. `sizeof(PackageEntry) == 76` is a
/// compatibility invariant: changing this layout breaks every archive ever
/// written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageEntry {
    pub name: [u8; NAME_FIELD_LEN],
    pub position: u32,
    pub original_size: u32,
    pub compressed_size: u32,
}

pub const ENTRY_SIZE: usize = NAME_FIELD_LEN + 4 + 4 + 4;

impl PackageEntry {
    /// Build an entry from a raw filename, rejecting names that cannot fit
    /// in the 64-byte field with a NUL terminator (names of 63 bytes or
    /// fewer).
    pub fn new(raw_name: &[u8], position: u32, original_size: u32, compressed_size: u32) -> Result<Self, PacError> {
        if raw_name.len() >= NAME_FIELD_LEN {
            return Err(PacError::NameTooLong(String::from_utf8_lossy(raw_name).into_owned()));
        }
        let mut name = [0u8; NAME_FIELD_LEN];
        name[..raw_name.len()].copy_from_slice(raw_name);
        Ok(Self { name, position, original_size, compressed_size })
    }

    /// Raw name bytes up to (excluding) the first NUL.
    pub fn name_bytes(&self) -> &[u8] {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_FIELD_LEN);
        &self.name[..end]
    }

    pub fn to_bytes(&self) -> [u8; ENTRY_SIZE] {
        let mut out = [0u8; ENTRY_SIZE];
        out[..NAME_FIELD_LEN].copy_from_slice(&self.name);
        out[0x40..0x44].copy_from_slice(&self.position.to_le_bytes());
        out[0x44..0x48].copy_from_slice(&self.original_size.to_le_bytes());
        out[0x48..0x4C].copy_from_slice(&self.compressed_size.to_le_bytes());
        out
    }

    pub fn from_bytes(buf: &[u8]) -> Self {
        debug_assert_eq!(buf.len(), ENTRY_SIZE);
        let mut name = [0u8; NAME_FIELD_LEN];
        name.copy_from_slice(&buf[..NAME_FIELD_LEN]);
        let position = u32::from_le_bytes(buf[0x40..0x44].try_into().unwrap());
        let original_size = u32::from_le_bytes(buf[0x44..0x48].try_into().unwrap());
        let compressed_size = u32::from_le_bytes(buf[0x48..0x4C].try_into().unwrap());
        Self { name, position, original_size, compressed_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_76_bytes() {
        assert_eq!(ENTRY_SIZE, 76);
    }

    #[test]
    fn round_trip_bytes() {
        let e = PackageEntry::new(b"dir/file.txt", 12, 5, 5).unwrap();
        let bytes = e.to_bytes();
        assert_eq!(bytes.len(), 76);
        let back = PackageEntry::from_bytes(&bytes);
        assert_eq!(back, e);
        assert_eq!(back.name_bytes(), b"dir/file.txt");
    }

    #[test]
    fn name_of_63_bytes_fits() {
        let name = vec![b'x'; 63];
        assert!(PackageEntry::new(&name, 0, 0, 0).is_ok());
    }

    #[test]
    fn name_of_64_bytes_is_rejected() {
        // S6: a name exactly 64 bytes long has no room for the terminator.
        let name = vec![b'x'; 64];
        assert!(PackageEntry::new(&name, 0, 0, 0).is_err());
    }
}
