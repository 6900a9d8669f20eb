//! The blob capacity model of the blob codec.

use crate::{
    constants::{
        BLOB_METADATA_BYTES_SIZE, BYTES_PER_FIELD_ELEMENT, USABLE_BYTES_PER_FIELD_ELEMENT,
        ZSTD_COMPRESSION_LEVEL,
    },
    CodecError,
};

/// Returns the padded blob size of the provided data size: every 31 bytes of data take up a
/// full 32 bytes field element, the trailing partial element takes one extra byte.
pub const fn padded_blob_size(data_size: u64) -> u64 {
    let remainder = data_size % USABLE_BYTES_PER_FIELD_ELEMENT;
    let mut padded = data_size / USABLE_BYTES_PER_FIELD_ELEMENT * BYTES_PER_FIELD_ELEMENT;
    if remainder != 0 {
        padded += 1 + remainder;
    }
    padded
}

/// Returns the padded blob size of a chunk whose concatenated L2 transaction payloads are the
/// provided data. The data is zstd compressed first if `compression` is set.
pub fn blob_size(transactions_data: &[u8], compression: bool) -> Result<u64, CodecError> {
    let data_size = if compression {
        zstd::bulk::compress(transactions_data, ZSTD_COMPRESSION_LEVEL)?.len() as u64
    } else {
        transactions_data.len() as u64
    };
    Ok(padded_blob_size(BLOB_METADATA_BYTES_SIZE + data_size))
}

/// Returns an upper bound of [`blob_size`] with compression, for a payload of the provided size,
/// without compressing it.
pub fn compressed_blob_size_bound(data_size: u64) -> u64 {
    let bound = zstd::zstd_safe::compress_bound(data_size as usize) as u64;
    padded_blob_size(BLOB_METADATA_BYTES_SIZE + bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_BLOB_BYTES_SIZE;

    #[test]
    fn test_padded_blob_size() {
        assert_eq!(padded_blob_size(0), 0);
        assert_eq!(padded_blob_size(1), 2);
        assert_eq!(padded_blob_size(31), 32);
        assert_eq!(padded_blob_size(32), 34);
        assert_eq!(padded_blob_size(4096 * 31), MAX_BLOB_BYTES_SIZE);
    }

    #[test]
    fn test_blob_size_includes_metadata() -> Result<(), CodecError> {
        assert_eq!(blob_size(&[], false)?, padded_blob_size(62));
        assert_eq!(blob_size(&[0x02; 230], false)?, padded_blob_size(292));
        Ok(())
    }

    #[test]
    fn test_compression_bound_is_never_below_the_compressed_size() -> Result<(), CodecError> {
        let scattered = (0..4096u32)
            .flat_map(|i| i.wrapping_mul(2_654_435_761).to_le_bytes())
            .collect::<Vec<_>>();
        for data in [vec![], vec![0x02; 1000], scattered] {
            let bound = compressed_blob_size_bound(data.len() as u64);
            assert!(blob_size(&data, true)? <= bound);
            assert!(padded_blob_size(BLOB_METADATA_BYTES_SIZE + data.len() as u64) <= bound);
        }
        Ok(())
    }

    #[test]
    fn test_compression_shrinks_repetitive_payloads() -> Result<(), CodecError> {
        let data = vec![0x02; 64 * 1024];
        assert!(blob_size(&data, true)? < blob_size(&data, false)?);
        Ok(())
    }
}
