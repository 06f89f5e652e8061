//! Slice copy helpers used by the in-place update paths.
//!
//! All helpers operate on pre-sized storage and never allocate.

/// Copies `len` scalars from `src[src_offset..]` into `dst[dst_offset..]`.
///
/// # Panics
/// Panics if either range is out of bounds.
#[inline]
pub fn copy_into(src: &[f32], src_offset: usize, dst: &mut [f32], dst_offset: usize, len: usize) {
    dst[dst_offset..dst_offset + len].copy_from_slice(&src[src_offset..src_offset + len]);
}

/// Shifts the buffer contents `by` scalars towards the start.
///
/// The trailing `by` scalars keep their previous values; callers overwrite them.
#[inline]
pub fn shift_left(buf: &mut [f32], by: usize) {
    if by >= buf.len() {
        return;
    }
    buf.copy_within(by.., 0);
}

/// Writes `value` as item number `item` of `dst`, items being `value.len()` scalars wide.
#[inline]
pub fn write_item(dst: &mut [f32], item: usize, value: &[f32]) {
    let start = item * value.len();
    dst[start..start + value.len()].copy_from_slice(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_into_respects_offsets() {
        let src = [1.0, 2.0, 3.0, 4.0];
        let mut dst = [0.0; 5];
        copy_into(&src, 1, &mut dst, 2, 3);
        assert_eq!(dst, [0.0, 0.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn shift_left_keeps_tail() {
        let mut buf = [1.0, 2.0, 3.0, 4.0, 5.0];
        shift_left(&mut buf, 2);
        assert_eq!(buf, [3.0, 4.0, 5.0, 4.0, 5.0]);
    }

    #[test]
    fn shift_left_past_end_is_noop() {
        let mut buf = [1.0, 2.0];
        shift_left(&mut buf, 2);
        assert_eq!(buf, [1.0, 2.0]);
    }

    #[test]
    fn write_item_places_by_item_index() {
        let mut buf = [0.0; 6];
        write_item(&mut buf, 1, &[7.0, 8.0, 9.0]);
        assert_eq!(buf, [0.0, 0.0, 0.0, 7.0, 8.0, 9.0]);
    }
}
