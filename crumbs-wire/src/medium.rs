/// Byte storage able to hold one complete
/// serialized value.
pub trait Medium: AsRef<[u8]> + AsMut<[u8]> {
    const SIZE: usize;

    fn zeroed() -> Self;
}

// Implement `Medium` for all byte arrays.
impl<const N: usize> Medium for [u8; N] {
    const SIZE: usize = N;

    #[inline]
    fn zeroed() -> Self {
        [0; N]
    }
}
