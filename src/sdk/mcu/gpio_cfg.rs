//! Pin configuration tokens for STM32F3 GPIO ports.
//!
//! A configuration token is a plain `u32` carrying the values for all five
//! per-pin register fields, one nibble each:
//!
//! | bits  | field   | register |
//! |-------|---------|----------|
//! | 0-3   | mode    | MODER    |
//! | 4-7   | type    | OTYPER   |
//! | 8-11  | speed   | OSPEEDR  |
//! | 12-15 | pull    | PUPDR    |
//! | 16-19 | AF      | AFRL/H   |
//!
//! Tokens are meant to be taken from the `GPIO_*` presets below, which are all
//! built from a typed `PinConfig` and therefore only ever carry values the
//! hardware accepts. Hand-built tokens (`build_cfg`) are not checked.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use thiserror::Error;

pub const GPIO_MODER_SHIFT: u32 = 0;
pub const GPIO_OTYPER_SHIFT: u32 = 4;
pub const GPIO_OSPEEDR_SHIFT: u32 = 8;
pub const GPIO_PUPDR_SHIFT: u32 = 12;
pub const GPIO_AFR_SHIFT: u32 = 16;

pub const GPIO_CFG_SLOT_MASK: u32 = 0xF;
// Everything above the AF nibble is always zero
pub const GPIO_CFG_USED_BITS: u32 = 0x000F_FFFF;

/// Pin mode (MODER).
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Mode {
    Input = 0,
    Output = 1,
    Alternate = 2,
    Analog = 3,
}

/// Output driver type (OTYPER).
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum OutputType {
    PushPull = 0,
    OpenDrain = 1,
}

/// Output speed (OSPEEDR). `0b10` also selects low speed on this family; the
/// canonical encoding `0b00` is the only one produced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Speed {
    Low = 0,
    Medium = 1,
    High = 3,
}

/// Internal pull resistor (PUPDR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Pull {
    None = 0,
    Up = 1,
    Down = 2,
}

/// Alternate function selector (AFRL/AFRH).
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum AltFn {
    AF0 = 0,
    AF1 = 1,
    AF2 = 2,
    AF3 = 3,
    AF4 = 4,
    AF5 = 5,
    AF6 = 6,
    AF7 = 7,
    AF8 = 8,
    AF9 = 9,
    AF10 = 10,
    AF11 = 11,
    AF12 = 12,
    AF13 = 13,
    AF14 = 14,
    AF15 = 15,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GpioCfgError {
    #[error("invalid pin mode {0:#x}")]
    InvalidMode(u32),
    #[error("invalid output type {0:#x}")]
    InvalidOutputType(u32),
    #[error("invalid output speed {0:#x}")]
    InvalidSpeed(u32),
    #[error("invalid pull configuration {0:#x}")]
    InvalidPull(u32),
    #[error("invalid alternate function {0:#x}")]
    InvalidAltFn(u32),
    #[error("configuration {0:#010x} has bits set above the AF field")]
    ReservedBits(u32),
}

/// Typed form of a configuration token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinConfig {
    pub mode: Mode,
    pub otype: OutputType,
    pub speed: Speed,
    pub pull: Pull,
    pub af: AltFn,
}

impl PinConfig {
    pub const fn input(pull: Pull) -> Self {
        Self {
            mode: Mode::Input,
            otype: OutputType::PushPull,
            speed: Speed::Low,
            pull,
            af: AltFn::AF0,
        }
    }

    pub const fn output(otype: OutputType, speed: Speed, pull: Pull) -> Self {
        Self {
            mode: Mode::Output,
            otype,
            speed,
            pull,
            af: AltFn::AF0,
        }
    }

    pub const fn alternate(af: AltFn, otype: OutputType, speed: Speed, pull: Pull) -> Self {
        Self {
            mode: Mode::Alternate,
            otype,
            speed,
            pull,
            af,
        }
    }

    pub const fn analog() -> Self {
        Self {
            mode: Mode::Analog,
            otype: OutputType::PushPull,
            speed: Speed::Low,
            pull: Pull::None,
            af: AltFn::AF0,
        }
    }

    /// Packs the five fields into a configuration token.
    pub const fn encode(self) -> u32 {
        build_cfg(
            self.mode as u32,
            self.otype as u32,
            self.speed as u32,
            self.pull as u32,
            self.af as u32,
        )
    }

    /// Unpacks a configuration token.
    ///
    /// # Errors
    ///
    /// Fails if any bit above the AF field is set, or if a field holds a value
    /// that has no variant in the corresponding enum (e.g. pull `0b11`).
    pub fn decode(cfg: u32) -> Result<Self, GpioCfgError> {
        if cfg & !GPIO_CFG_USED_BITS != 0 {
            return Err(GpioCfgError::ReservedBits(cfg));
        }

        let mode = extract_mode(cfg);
        let otype = extract_output_type(cfg);
        let speed = extract_speed(cfg);
        let pull = extract_pull(cfg);
        let af = extract_af(cfg);

        Ok(Self {
            mode: Mode::from_u32(mode).ok_or(GpioCfgError::InvalidMode(mode))?,
            otype: OutputType::from_u32(otype).ok_or(GpioCfgError::InvalidOutputType(otype))?,
            speed: Speed::from_u32(speed).ok_or(GpioCfgError::InvalidSpeed(speed))?,
            pull: Pull::from_u32(pull).ok_or(GpioCfgError::InvalidPull(pull))?,
            af: AltFn::from_u32(af).ok_or(GpioCfgError::InvalidAltFn(af))?,
        })
    }
}

impl From<PinConfig> for u32 {
    fn from(cfg: PinConfig) -> u32 {
        cfg.encode()
    }
}

impl TryFrom<u32> for PinConfig {
    type Error = GpioCfgError;

    fn try_from(cfg: u32) -> Result<Self, Self::Error> {
        PinConfig::decode(cfg)
    }
}

/// Packs raw field values into a token. Each value is cut to its 4-bit slot,
/// nothing else is checked.
pub const fn build_cfg(mode: u32, otype: u32, speed: u32, pull: u32, af: u32) -> u32 {
    ((mode & GPIO_CFG_SLOT_MASK) << GPIO_MODER_SHIFT)
        | ((otype & GPIO_CFG_SLOT_MASK) << GPIO_OTYPER_SHIFT)
        | ((speed & GPIO_CFG_SLOT_MASK) << GPIO_OSPEEDR_SHIFT)
        | ((pull & GPIO_CFG_SLOT_MASK) << GPIO_PUPDR_SHIFT)
        | ((af & GPIO_CFG_SLOT_MASK) << GPIO_AFR_SHIFT)
}

#[inline(always)]
pub const fn extract_mode(cfg: u32) -> u32 {
    (cfg & (GPIO_CFG_SLOT_MASK << GPIO_MODER_SHIFT)) >> GPIO_MODER_SHIFT
}

#[inline(always)]
pub const fn extract_output_type(cfg: u32) -> u32 {
    (cfg & (GPIO_CFG_SLOT_MASK << GPIO_OTYPER_SHIFT)) >> GPIO_OTYPER_SHIFT
}

#[inline(always)]
pub const fn extract_speed(cfg: u32) -> u32 {
    (cfg & (GPIO_CFG_SLOT_MASK << GPIO_OSPEEDR_SHIFT)) >> GPIO_OSPEEDR_SHIFT
}

#[inline(always)]
pub const fn extract_pull(cfg: u32) -> u32 {
    (cfg & (GPIO_CFG_SLOT_MASK << GPIO_PUPDR_SHIFT)) >> GPIO_PUPDR_SHIFT
}

#[inline(always)]
pub const fn extract_af(cfg: u32) -> u32 {
    (cfg & (GPIO_CFG_SLOT_MASK << GPIO_AFR_SHIFT)) >> GPIO_AFR_SHIFT
}

/****************************************************
 presets
 *****************************************************/

pub const GPIO_IN_FLOATING: u32 = PinConfig::input(Pull::None).encode();
pub const GPIO_IN_PULL_UP: u32 = PinConfig::input(Pull::Up).encode();
pub const GPIO_IN_PULL_DOWN: u32 = PinConfig::input(Pull::Down).encode();

pub const GPIO_ANALOG: u32 = PinConfig::analog().encode();

// GPIO_OUT_{PP,OD}_{LS,MS,HS}[_PULL_UP|_PULL_DOWN]
macro_rules! gpio_out_presets {
    ( $( $ot:ident $sp:ident => $otype:expr, $speed:expr; )* ) => {
        paste::paste! {
            $(
                pub const [<GPIO_OUT_ $ot _ $sp>]: u32 =
                    PinConfig::output($otype, $speed, Pull::None).encode();
                pub const [<GPIO_OUT_ $ot _ $sp _PULL_UP>]: u32 =
                    PinConfig::output($otype, $speed, Pull::Up).encode();
                pub const [<GPIO_OUT_ $ot _ $sp _PULL_DOWN>]: u32 =
                    PinConfig::output($otype, $speed, Pull::Down).encode();
            )*
        }
    };
}

gpio_out_presets! {
    PP LS => OutputType::PushPull, Speed::Low;
    PP MS => OutputType::PushPull, Speed::Medium;
    PP HS => OutputType::PushPull, Speed::High;
    OD LS => OutputType::OpenDrain, Speed::Low;
    OD MS => OutputType::OpenDrain, Speed::Medium;
    OD HS => OutputType::OpenDrain, Speed::High;
}

// GPIO_AF{0..15}_{PP,OD}_{LS,MS,HS}[_PULL_UP|_PULL_DOWN]
macro_rules! gpio_af_presets {
    ( $( $af:ident ),* ) => {
        $(
            gpio_af_presets!(@pull $af, PP, LS, OutputType::PushPull, Speed::Low);
            gpio_af_presets!(@pull $af, PP, MS, OutputType::PushPull, Speed::Medium);
            gpio_af_presets!(@pull $af, PP, HS, OutputType::PushPull, Speed::High);
            gpio_af_presets!(@pull $af, OD, LS, OutputType::OpenDrain, Speed::Low);
            gpio_af_presets!(@pull $af, OD, MS, OutputType::OpenDrain, Speed::Medium);
            gpio_af_presets!(@pull $af, OD, HS, OutputType::OpenDrain, Speed::High);
        )*
    };

    ( @pull $af:ident, $ot:ident, $sp:ident, $otype:expr, $speed:expr ) => {
        paste::paste! {
            pub const [<GPIO_ $af _ $ot _ $sp>]: u32 =
                PinConfig::alternate(AltFn::$af, $otype, $speed, Pull::None).encode();
            pub const [<GPIO_ $af _ $ot _ $sp _PULL_UP>]: u32 =
                PinConfig::alternate(AltFn::$af, $otype, $speed, Pull::Up).encode();
            pub const [<GPIO_ $af _ $ot _ $sp _PULL_DOWN>]: u32 =
                PinConfig::alternate(AltFn::$af, $otype, $speed, Pull::Down).encode();
        }
    };
}

gpio_af_presets!(
    AF0, AF1, AF2, AF3, AF4, AF5, AF6, AF7, AF8, AF9, AF10, AF11, AF12, AF13, AF14, AF15
);

#[cfg(test)]
mod tests {
    use super::*;

    /// Each extractor must return exactly the value packed into its own slot,
    /// whatever the other slots hold.
    #[test]
    fn test_extract_round_trip() {
        for v in 0..=GPIO_CFG_SLOT_MASK {
            let noise = 0xF;
            assert_eq!(extract_mode(build_cfg(v, noise, noise, noise, noise)), v);
            assert_eq!(extract_output_type(build_cfg(noise, v, noise, noise, noise)), v);
            assert_eq!(extract_speed(build_cfg(noise, noise, v, noise, noise)), v);
            assert_eq!(extract_pull(build_cfg(noise, noise, noise, v, noise)), v);
            assert_eq!(extract_af(build_cfg(noise, noise, noise, noise, v)), v);
        }
    }

    #[test]
    fn test_build_cfg_cuts_wide_values() {
        // 0x12 would reach into the output type slot if left unmasked
        assert_eq!(build_cfg(0x12, 0, 0, 0, 0), 0x2);
        assert_eq!(build_cfg(0, 0, 0, 0, 0x1F) & !GPIO_CFG_USED_BITS, 0);
    }

    #[test]
    fn test_preset_values() {
        assert_eq!(GPIO_IN_FLOATING, 0x0000_0000);
        assert_eq!(GPIO_IN_PULL_UP, 0x0000_1000);
        assert_eq!(GPIO_IN_PULL_DOWN, 0x0000_2000);
        assert_eq!(GPIO_ANALOG, 0x0000_0003);

        assert_eq!(GPIO_OUT_PP_LS, 0x0000_0001);
        assert_eq!(GPIO_OUT_PP_HS, 0x0000_0301);
        assert_eq!(GPIO_OUT_OD_MS_PULL_DOWN, 0x0000_2111);

        assert_eq!(GPIO_AF0_PP_LS, 0x0000_0002);
        assert_eq!(GPIO_AF7_PP_HS_PULL_UP, 0x0007_1302);
        assert_eq!(GPIO_AF15_OD_HS_PULL_DOWN, 0x000F_2312);
    }

    #[test]
    fn test_presets_decode() {
        let presets = [
            (GPIO_IN_PULL_DOWN, PinConfig::input(Pull::Down)),
            (GPIO_ANALOG, PinConfig::analog()),
            (
                GPIO_OUT_OD_LS_PULL_UP,
                PinConfig::output(OutputType::OpenDrain, Speed::Low, Pull::Up),
            ),
            (
                GPIO_AF4_OD_MS,
                PinConfig::alternate(AltFn::AF4, OutputType::OpenDrain, Speed::Medium, Pull::None),
            ),
            (
                GPIO_AF12_PP_HS_PULL_DOWN,
                PinConfig::alternate(AltFn::AF12, OutputType::PushPull, Speed::High, Pull::Down),
            ),
        ];

        for (raw, typed) in presets {
            assert_eq!(PinConfig::decode(raw), Ok(typed));
            assert_eq!(u32::from(typed), raw);
        }
    }

    #[test]
    fn test_decode_rejects_invalid_fields() {
        assert_eq!(PinConfig::decode(0x4), Err(GpioCfgError::InvalidMode(0x4)));
        assert_eq!(
            PinConfig::decode(0x21),
            Err(GpioCfgError::InvalidOutputType(0x2))
        );
        assert_eq!(PinConfig::decode(0x201), Err(GpioCfgError::InvalidSpeed(0x2)));
        assert_eq!(PinConfig::decode(0x3000), Err(GpioCfgError::InvalidPull(0x3)));
        assert_eq!(
            PinConfig::try_from(0x0010_0000),
            Err(GpioCfgError::ReservedBits(0x0010_0000))
        );
    }
}
