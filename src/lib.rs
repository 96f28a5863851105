//! Pin configuration for STM32F3 GPIO ports.
//!
//! Five per-pin register fields (mode, output type, speed, pull and alternate
//! function) travel together as one `u32` configuration token. Tokens come
//! from the `GPIO_*` presets or from a typed `PinConfig`, and `gpio_pin_cfg`
//! writes one into a single pin of a port without touching the other pins.
//!
//! ```ignore
//! use stm32_pincfg::{gpio_init, gpio_pin_cfg, GPIOA, GPIO_AF7_PP_HS, GPIO_OUT_PP_LS};
//!
//! gpio_init();
//! gpio_pin_cfg(GPIOA, 5, GPIO_OUT_PP_LS);
//! gpio_pin_cfg(GPIOA, 9, GPIO_AF7_PP_HS); // USART1_TX
//! ```
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod sdk;

pub use sdk::mcu::gpio::{gpio_init, gpio_pin_cfg, gpio_pin_get_cfg};
pub use sdk::mcu::gpio_cfg::*;
pub use sdk::mcu::register::{GpioPort, GpioRegisterBlock, GPIOA, GPIOB, GPIOC, GPIOD, GPIOF};
