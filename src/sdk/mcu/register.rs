use crate::config::{
    GPIOA_BASE, GPIOB_BASE, GPIOC_BASE, GPIOD_BASE, GPIOF_BASE, RCC_AHBENR_OFFSET, RCC_BASE,
};
use crate::{BIT, BIT_MASK_LEN};
use bitflags::bitflags;

/// Generates a volatile read/write accessor pair for a register at a fixed
/// absolute address.
///
/// `regrw!(reg_foo, 0x4000_0000, u32)` produces `read_reg_foo()` and
/// `write_reg_foo(value)`. In test builds both accessors are mockable with mry,
/// so code that touches fixed-address registers can run on the host.
#[macro_export]
macro_rules! regrw {
    ( $x:ident, $a:expr, $s:ty ) => {
        paste::paste! {
            #[cfg_attr(test, mry::mry)]
            pub fn [<read_ $x>]() -> $s {
                unsafe {
                    return core::ptr::read_volatile(($a) as *const $s)
                }
            }

            #[cfg_attr(test, mry::mry)]
            pub fn [<write_ $x>](value: $s) {
                unsafe {
                    core::ptr::write_volatile(($a) as *mut $s, value)
                }
            }
        }
    };
}

/// Same as `regrw!`, but for a register inside a `GpioRegisterBlock` reached
/// through a `GpioPort` handle. Expands to `read_<field>(&self)` and
/// `write_<field>(&self, value)` methods.
macro_rules! port_rw {
    ( $x:ident ) => {
        paste::paste! {
            #[inline(always)]
            pub fn [<read_ $x>](&self) -> u32 {
                unsafe {
                    core::ptr::read_volatile(core::ptr::addr_of!((*self.0).$x))
                }
            }

            #[inline(always)]
            pub fn [<write_ $x>](&self, value: u32) {
                unsafe {
                    core::ptr::write_volatile(core::ptr::addr_of_mut!((*self.0).$x), value)
                }
            }
        }
    };
}

/// Indexed flavour of `port_rw!` for register arrays (AFRL/AFRH).
macro_rules! port_rw_idx {
    ( $x:ident ) => {
        paste::paste! {
            #[inline(always)]
            pub fn [<read_ $x>](&self, i: usize) -> u32 {
                unsafe {
                    core::ptr::read_volatile(core::ptr::addr_of!((*self.0).$x[i]))
                }
            }

            #[inline(always)]
            pub fn [<write_ $x>](&self, value: u32, i: usize) {
                unsafe {
                    core::ptr::write_volatile(core::ptr::addr_of_mut!((*self.0).$x[i]), value)
                }
            }
        }
    };
}

/****************************************************
 rcc regs struct: begin  addr : 0x40021000
 *****************************************************/
regrw!(reg_rcc_ahbenr, RCC_BASE + RCC_AHBENR_OFFSET, u32);

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FLD_RCC_AHBENR: u32 {
        const DMA1_EN =         BIT!(0);
        const DMA2_EN =         BIT!(1);
        const SRAM_EN =         BIT!(2);
        const FLITF_EN =        BIT!(4);
        const CRC_EN =          BIT!(6);
        const IOPA_EN =         BIT!(17);
        const IOPB_EN =         BIT!(18);
        const IOPC_EN =         BIT!(19);
        const IOPD_EN =         BIT!(20);
        const IOPF_EN =         BIT!(22);
        const TSC_EN =          BIT!(24);
        const ADC12_EN =        BIT!(28);
    }
}

/****************************************************
 gpio regs struct: one block per port, 0x400 apart
 *****************************************************/

/// Memory layout of one GPIO port.
///
/// Only ever accessed through a `GpioPort` handle, which performs volatile
/// accesses. A plain value of this type is useful as a register file stand-in
/// on the host.
#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GpioRegisterBlock {
    pub moder: u32,    // 0x00
    pub otyper: u32,   // 0x04
    pub ospeedr: u32,  // 0x08
    pub pupdr: u32,    // 0x0C
    pub idr: u32,      // 0x10
    pub odr: u32,      // 0x14
    pub bsrr: u32,     // 0x18
    pub lckr: u32,     // 0x1C
    pub afr: [u32; 2], // 0x20 AFRL, 0x24 AFRH
    pub brr: u32,      // 0x28
}

pub const GPIO_MODER_WIDTH: u32 = 2;
pub const GPIO_OTYPER_WIDTH: u32 = 1;
pub const GPIO_OSPEEDR_WIDTH: u32 = 2;
pub const GPIO_PUPDR_WIDTH: u32 = 2;
pub const GPIO_AFRX_WIDTH: u32 = 4;

pub const GPIO_MODER_MASK: u32 = BIT_MASK_LEN!(GPIO_MODER_WIDTH);
pub const GPIO_OTYPER_MASK: u32 = BIT_MASK_LEN!(GPIO_OTYPER_WIDTH);
pub const GPIO_OSPEEDR_MASK: u32 = BIT_MASK_LEN!(GPIO_OSPEEDR_WIDTH);
pub const GPIO_PUPDR_MASK: u32 = BIT_MASK_LEN!(GPIO_PUPDR_WIDTH);
pub const GPIO_AFRX_MASK: u32 = BIT_MASK_LEN!(GPIO_AFRX_WIDTH);

pub const GPIO_AFRL: usize = 0;
pub const GPIO_AFRH: usize = 1;

/// Handle to the register block of one GPIO port.
///
/// The handle is just an address: it owns nothing and does not stop two
/// handles (or an interrupt handler) from touching the same port at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioPort(*mut GpioRegisterBlock);

// The block is memory-mapped hardware, not thread-local data.
unsafe impl Send for GpioPort {}

pub const GPIOA: GpioPort = GpioPort::at(GPIOA_BASE);
pub const GPIOB: GpioPort = GpioPort::at(GPIOB_BASE);
pub const GPIOC: GpioPort = GpioPort::at(GPIOC_BASE);
pub const GPIOD: GpioPort = GpioPort::at(GPIOD_BASE);
pub const GPIOF: GpioPort = GpioPort::at(GPIOF_BASE);

impl GpioPort {
    const fn at(base: u32) -> Self {
        Self(base as usize as *mut GpioRegisterBlock)
    }

    /// Wraps an arbitrary register block.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live, properly aligned `GpioRegisterBlock` (a real
    /// port or a host-side stand-in) for as long as the handle is used, and no
    /// Rust reference to that block may be held across calls that go through
    /// the handle.
    pub const unsafe fn from_ptr(ptr: *mut GpioRegisterBlock) -> Self {
        Self(ptr)
    }

    pub fn as_ptr(&self) -> *mut GpioRegisterBlock {
        self.0
    }

    port_rw!(moder);
    port_rw!(otyper);
    port_rw!(ospeedr);
    port_rw!(pupdr);
    port_rw_idx!(afr);
}
