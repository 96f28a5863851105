#![allow(non_camel_case_types)]

pub mod common;
pub mod mcu;
