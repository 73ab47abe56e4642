/// Return the number of data bits in an SSZ-encoded bitlist.
///
/// The highest set bit of the encoding is the length delimiter, so its position is the length of
/// the list. Returns `None` when no delimiter is present.
pub fn sentinel_bit_length(bytes: &[u8]) -> Option<usize> {
    let (last_index, &last_byte) = bytes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, byte)| **byte != 0)?;
    let highest_bit = 7 - last_byte.leading_zeros() as usize;
    Some(last_index * 8 + highest_bit)
}
