//! The font table checksum algorithm.

use crate::font_data::FontData;

/// Base constant for the whole-file checksum.
///
/// For a well-formed file, `head.checksum_adjustment` equals this value
/// minus the checksum of the entire file computed with the adjustment
/// field itself zeroed out.
pub const CHECKSUM_ADJUSTMENT_BASE: u32 = 0xB1B0_AFBA;

/// Compute the checksum of `length` bytes of `data`, starting at `offset`.
///
/// The sum covers big-endian u32 words, wrapping on overflow. When
/// `length` is not a multiple of four the summed range is rounded up to
/// the next word boundary, picking up whatever bytes actually follow in
/// the buffer; bytes past the end of the buffer are treated as zero.
pub fn checksum(data: FontData, length: u32, offset: u32) -> u32 {
    let start = offset as usize;
    let word_count = (length as usize).div_ceil(4);
    let mut sum = 0u32;
    for word in 0..word_count {
        sum = sum.wrapping_add(read_word_or_zero(data, start + word * 4));
    }
    sum
}

fn read_word_or_zero(data: FontData, pos: usize) -> u32 {
    match data.read_at::<u32>(pos) {
        Ok(word) => word,
        // the buffer ends inside this word; zero-fill the missing bytes
        Err(_) => {
            let mut raw = [0u8; 4];
            let bytes = data.as_bytes().get(pos..).unwrap_or_default();
            raw[..bytes.len()].copy_from_slice(bytes);
            u32::from_be_bytes(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_words() {
        let data = FontData::new(&[0, 0, 0, 1, 0, 0, 0, 2]);
        assert_eq!(checksum(data, 8, 0), 3);
        assert_eq!(checksum(data, 4, 4), 2);
        assert_eq!(checksum(data, 0, 0), 0);
    }

    #[test]
    fn padding_reads_following_bytes() {
        // a 5-byte "table" at offset 0; the pad word picks up the three
        // bytes that belong to whatever comes next in the file
        let data = FontData::new(&[0, 0, 0, 1, 9, 8, 7, 6]);
        assert_eq!(checksum(data, 5, 0), 1 + 0x09080706);
    }

    #[test]
    fn padding_past_end_of_buffer_is_zero() {
        let data = FontData::new(&[0, 0, 0, 1, 0xFF]);
        assert_eq!(checksum(data, 5, 0), 1 + 0xFF000000);
    }

    #[test]
    fn sum_wraps() {
        let data = FontData::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 3]);
        assert_eq!(checksum(data, 8, 0), 2);
    }
}
