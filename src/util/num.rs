/// Clamps a language-level `int` into the index range `[0, len]`.
///
/// Negative values clamp to `0`; values past the length clamp to `len`.
/// Slice bounds use this on both ends, which is what makes every slice
/// expression total.
///
/// ## Example
/// ```
/// use tox::util::num::clamp_index;
///
/// assert_eq!(clamp_index(-3, 5), 0);
/// assert_eq!(clamp_index(2, 5), 2);
/// assert_eq!(clamp_index(9, 5), 5);
/// ```
#[must_use]
pub fn clamp_index(value: i64, len: usize) -> usize {
    if value <= 0 {
        return 0;
    }
    usize::try_from(value).map_or(len, |index| index.min(len))
}

/// Converts a language-level `int` into a valid element index, if it is one.
///
/// ## Example
/// ```
/// use tox::util::num::checked_index;
///
/// assert_eq!(checked_index(2, 5), Some(2));
/// assert_eq!(checked_index(5, 5), None);
/// assert_eq!(checked_index(-1, 5), None);
/// ```
#[must_use]
pub fn checked_index(value: i64, len: usize) -> Option<usize> {
    usize::try_from(value).ok().filter(|index| *index < len)
}
