// Chip: STM32F334x8

// AHB2 GPIO ports, 1KB apart
pub const GPIOA_BASE: u32 = 0x4800_0000;
pub const GPIOB_BASE: u32 = 0x4800_0400;
pub const GPIOC_BASE: u32 = 0x4800_0800;
pub const GPIOD_BASE: u32 = 0x4800_0C00;
pub const GPIOF_BASE: u32 = 0x4800_1400;

pub const RCC_BASE: u32 = 0x4002_1000;
pub const RCC_AHBENR_OFFSET: u32 = 0x14;

pub const GPIO_PINS_PER_PORT: u32 = 16;

// Pins 0-7 live in AFRL, 8-15 in AFRH
pub const GPIO_AFR_PINS_PER_REG: u32 = 8;
