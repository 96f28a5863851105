pub mod gpio;
pub mod gpio_cfg;
pub mod register;
