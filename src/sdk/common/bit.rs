#[macro_export]
macro_rules! BIT {
    ( $x:expr ) => {
        1 << $x
    };
}

#[macro_export]
macro_rules! BIT_MASK_LEN {
    ( $x:expr ) => {
        $crate::BIT!($x) - 1
    };
}

#[macro_export]
macro_rules! BM_SET {
    ( $x:expr, $mask:expr ) => {
        $x |= $mask
    };
}

#[macro_export]
macro_rules! BM_CLR {
    ( $x:expr, $mask:expr ) => {
        $x &= !($mask)
    };
}

/// Replaces the `$width`-bit field at slot `$slot` of `$x` with `$v`.
///
/// `$mask` is the field mask before shifting (e.g. `0b11` for a two bit field).
/// Bits of `$v` outside `$mask` are dropped, so a too-wide value can never
/// reach the neighbouring slot.
#[macro_export]
macro_rules! FLD_PUT {
    ( $x:expr, $mask:expr, $width:expr, $slot:expr, $v:expr ) => {{
        let shift = ($slot) * ($width);
        $crate::BM_CLR!($x, ($mask) << shift);
        $crate::BM_SET!($x, (($v) & ($mask)) << shift);
    }};
}

/// Reads back the `$width`-bit field at slot `$slot` of `$x`.
#[macro_export]
macro_rules! FLD_GET {
    ( $x:expr, $mask:expr, $width:expr, $slot:expr ) => {
        (($x) >> (($slot) * ($width))) & ($mask)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_bit_macros() {
        assert_eq!(BIT!(3), 0x08);
        assert_eq!(BIT_MASK_LEN!(4), 0x0f);
        assert_eq!(BIT_MASK_LEN!(2), 0b11);
    }

    #[test]
    fn test_fld_put_keeps_neighbours() {
        let mut val: u32 = 0xffff_ffff;
        FLD_PUT!(val, 0b11u32, 2, 5, 0b01u32);
        assert_eq!(val, 0xffff_f7ff);
        assert_eq!(FLD_GET!(val, 0b11u32, 2, 5), 0b01);

        // A value wider than the field must not leak into slot 6
        let mut val: u32 = 0;
        FLD_PUT!(val, 0b1u32, 1, 5, 0b11u32);
        assert_eq!(val, 0x20);
    }
}
