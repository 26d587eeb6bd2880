use core::mem::MaybeUninit;

use fill_array::fill;

use crate::{error, WireBuf, WireIter};

macro_rules! impl_number {
    ($TYPE:ty, $SIZE:expr) => {
        impl WireIter for $TYPE {
            const SIZE: usize = $SIZE;

            fn write_iter<'a>(
                &self,
                dst: impl IntoIterator<Item = &'a mut u8>,
            ) -> Result<(), error::EndOfInput> {
                let mut dst = dst.into_iter();

                // length constraint is on dest, not the type
                for byte in self.to_le_bytes() {
                    *dst.next().ok_or(error::EndOfInput)? = byte;
                }

                Ok(())
            }

            fn read_iter<'a>(
                src: impl IntoIterator<Item = &'a u8>,
            ) -> Result<Self, error::EndOfInput> {
                let mut src = src.into_iter();

                // all byte values are valid, even NaN payloads for floats
                let bytes = fill![*src.next().ok_or(error::EndOfInput)?; $SIZE];

                Ok(Self::from_le_bytes(bytes))
            }
        }

        // SAFETY: $SIZE must be correct as it is validated by its usage with `from_le_bytes`
        unsafe impl WireBuf for $TYPE {
            type Frame = [u8; $SIZE];
        }
    };
}

// isize/usize have platform specific size!
// NOTE: getting the "size" values wrong here
// will result in a compile-time error, not UB
impl_number!(u8, 1);
impl_number!(u16, 2);
impl_number!(u32, 4);
impl_number!(u64, 8);
impl_number!(i8, 1);
impl_number!(i16, 2);
impl_number!(i32, 4);
impl_number!(i64, 8);
impl_number!(f32, 4);
impl_number!(f64, 8);

// array impls

impl<T: WireIter, const N: usize> WireIter for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn write_iter<'a>(
        &self,
        dst: impl IntoIterator<Item = &'a mut u8>,
    ) -> Result<(), error::EndOfInput> {
        let mut dst = dst.into_iter();

        for item in self {
            item.write_iter(&mut dst)?;
        }

        Ok(())
    }

    fn read_iter<'a>(src: impl IntoIterator<Item = &'a u8>) -> Result<Self, error::EndOfInput> {
        let mut src = src.into_iter();

        // `MaybeUninit` is used to avoid a `Default` requirement
        // SAFETY: an array of `MaybeUninit` needs no initialization
        let mut result: [MaybeUninit<T>; N] = unsafe { MaybeUninit::uninit().assume_init() };

        for value in result.iter_mut() {
            value.write(T::read_iter(&mut src)?);
        }

        // SAFETY: by now all elements are initialized
        Ok(result.map(|e| unsafe { e.assume_init() }))
    }
}

// implementing `WireBuf` for generic arrays requires the "generic_const_exprs" feature

#[cfg(test)]
mod tests {
    use crate::{error, WireBuf, WireIter};

    macro_rules! iter_test {
        ($TYPE:ty) => {
            let mut buf = [0; 8];

            // introduce some basic value differences
            let test_num = <$TYPE>::MAX / (0xa as $TYPE);

            test_num.write_iter(buf.iter_mut()).unwrap();
            let read_num = <$TYPE>::read_iter(buf.iter()).unwrap();

            assert_eq!(test_num, read_num);
        };
    }

    macro_rules! buf_test {
        ($TYPE:ty) => {
            let test_num = <$TYPE>::MAX / (0xa as $TYPE);

            let frame = test_num.encode();
            assert_eq!(<$TYPE as WireIter>::SIZE, frame.len());

            assert_eq!(test_num, <$TYPE>::decode(&frame).unwrap());
        };
    }

    #[test]
    fn iter() {
        iter_test!(u8);
        iter_test!(u16);
        iter_test!(u32);
        iter_test!(u64);
        iter_test!(i8);
        iter_test!(i16);
        iter_test!(i32);
        iter_test!(i64);
        iter_test!(f32);
        iter_test!(f64);
    }

    #[test]
    fn buf() {
        buf_test!(u8);
        buf_test!(u16);
        buf_test!(u32);
        buf_test!(u64);
        buf_test!(i8);
        buf_test!(i16);
        buf_test!(i32);
        buf_test!(i64);
        buf_test!(f32);
        buf_test!(f64);
    }

    #[test]
    fn little_endian() {
        assert_eq!([0x00, 0x00, 0x96, 0x42], 75.0f32.encode());
        assert_eq!([0x34, 0x12], 0x1234u16.encode());
    }

    #[test]
    fn float_bit_patterns() {
        // NaN with payload, negative zero, subnormal
        for bits in [0x7fc0_1234u32, 0x8000_0000, 0x0000_0001] {
            let read = f32::decode(&bits.encode()).unwrap();

            assert_eq!(bits, read.to_bits());
        }
    }

    #[test]
    fn array() {
        let test_array = [1.5f32, -0.0, f32::MAX];

        let mut buf = [0; 12];
        test_array.write_iter(buf.iter_mut()).unwrap();

        let read_array = <[f32; 3]>::read_iter(buf.iter()).unwrap();

        assert_eq!(
            test_array.map(f32::to_bits),
            read_array.map(f32::to_bits)
        );

        // src is too small
        assert_eq!(
            Err(error::EndOfInput),
            <[f32; 3]>::read_iter(buf[..11].iter())
        );
    }
}
