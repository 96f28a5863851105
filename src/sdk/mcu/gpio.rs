use crate::config::{GPIO_AFR_PINS_PER_REG, GPIO_PINS_PER_PORT};
use crate::sdk::mcu::gpio_cfg::{
    build_cfg, extract_af, extract_mode, extract_output_type, extract_pull, extract_speed,
};
use crate::sdk::mcu::register::{
    read_reg_rcc_ahbenr, write_reg_rcc_ahbenr, GpioPort, FLD_RCC_AHBENR, GPIO_AFRH, GPIO_AFRL,
    GPIO_AFRX_MASK, GPIO_AFRX_WIDTH, GPIO_MODER_MASK, GPIO_MODER_WIDTH, GPIO_OSPEEDR_MASK,
    GPIO_OSPEEDR_WIDTH, GPIO_OTYPER_MASK, GPIO_OTYPER_WIDTH, GPIO_PUPDR_MASK, GPIO_PUPDR_WIDTH,
};
use crate::{BM_SET, FLD_GET, FLD_PUT};

/// Clock enable bits of every GPIO port present on the chip.
pub const GPIO_PORTS_CLK_EN: FLD_RCC_AHBENR = FLD_RCC_AHBENR::IOPA_EN
    .union(FLD_RCC_AHBENR::IOPB_EN)
    .union(FLD_RCC_AHBENR::IOPC_EN)
    .union(FLD_RCC_AHBENR::IOPD_EN)
    .union(FLD_RCC_AHBENR::IOPF_EN);

/// Enables the AHB clock of all GPIO ports.
///
/// Must run before any pin is configured; register writes to an unclocked port
/// are silently dropped by the hardware.
///
/// # Notes
///
/// * Only the port enable bits are set, every other bit of RCC_AHBENR keeps its value
/// * The read-modify-write runs in a critical section since RCC_AHBENR is shared
///   with every other AHB peripheral driver
pub fn gpio_init() {
    critical_section::with(|_| {
        let mut val = read_reg_rcc_ahbenr();
        BM_SET!(val, GPIO_PORTS_CLK_EN.bits());
        write_reg_rcc_ahbenr(val);
    });

    log::debug!("gpio: port clocks enabled ({:?})", GPIO_PORTS_CLK_EN);
}

/// Selects the AFR register holding `pin` and the pin's slot within it.
#[inline(always)]
fn afr_slot(pin: u32) -> (usize, u32) {
    if pin < GPIO_AFR_PINS_PER_REG {
        (GPIO_AFRL, pin)
    } else {
        (GPIO_AFRH, pin - GPIO_AFR_PINS_PER_REG)
    }
}

/// Configures one pin of one port.
///
/// # Parameters
///
/// * `port` - port whose registers are modified, its clock must be enabled
/// * `pin` - pin number, [0; 15]
/// * `configuration` - combined MODER, OTYPER, OSPEEDR, PUPDR and AFRx value,
///   one of `GPIO_IN_{FLOATING, PULL_UP, PULL_DOWN}`,
///   `GPIO_OUT_{PP, OD}_{LS, MS, HS}[_{PULL_UP, PULL_DOWN}]`,
///   `GPIO_AF{0..15}_{PP, OD}_{LS, MS, HS}[_{PULL_UP, PULL_DOWN}]`, `GPIO_ANALOG`
///   or `PinConfig::encode()`
///
/// # Algorithm
///
/// For MODER, OTYPER, OSPEEDR, PUPDR and then the AFR register owning the pin:
/// 1. Read the register
/// 2. Clear the pin's field
/// 3. Or in the field value taken from `configuration`
/// 4. Write the register back
///
/// # Notes
///
/// * Fields of the other 15 pins are never modified
/// * Pins 0-7 use AFRL, pins 8-15 use AFRH at slot `pin - 8`
/// * Neither the read-modify-write sequences nor the call as a whole are
///   atomic. Callers that reconfigure pins of the same port from several
///   contexts have to serialize those calls themselves
/// * `pin` is only range checked in debug builds; an out of range pin or an
///   invalid `configuration` is a caller bug with unspecified hardware effect
pub fn gpio_pin_cfg(port: GpioPort, pin: u32, configuration: u32) {
    debug_assert!(pin < GPIO_PINS_PER_PORT, "gpio pin {} out of range", pin);

    log::trace!(
        "gpio: cfg port {:p} pin {} <- {:#07x}",
        port.as_ptr(),
        pin,
        configuration
    );

    let mut moder = port.read_moder(); // localize
    FLD_PUT!(moder, GPIO_MODER_MASK, GPIO_MODER_WIDTH, pin, extract_mode(configuration));
    port.write_moder(moder); // save back

    let mut otyper = port.read_otyper();
    FLD_PUT!(otyper, GPIO_OTYPER_MASK, GPIO_OTYPER_WIDTH, pin, extract_output_type(configuration));
    port.write_otyper(otyper);

    let mut ospeedr = port.read_ospeedr();
    FLD_PUT!(ospeedr, GPIO_OSPEEDR_MASK, GPIO_OSPEEDR_WIDTH, pin, extract_speed(configuration));
    port.write_ospeedr(ospeedr);

    let mut pupdr = port.read_pupdr();
    FLD_PUT!(pupdr, GPIO_PUPDR_MASK, GPIO_PUPDR_WIDTH, pin, extract_pull(configuration));
    port.write_pupdr(pupdr);

    // Register choice depends on the unadjusted pin number
    let (afrx, afr_pin) = afr_slot(pin);

    let mut afr = port.read_afr(afrx);
    FLD_PUT!(afr, GPIO_AFRX_MASK, GPIO_AFRX_WIDTH, afr_pin, extract_af(configuration));
    port.write_afr(afr, afrx);
}

/// Reads back the current configuration of one pin as a configuration token.
///
/// For any token written with `gpio_pin_cfg` from the presets this returns the
/// same token. Pass the result to `PinConfig::decode` for a typed view; it
/// fails when the hardware holds a non-canonical value such as speed `0b10`.
pub fn gpio_pin_get_cfg(port: GpioPort, pin: u32) -> u32 {
    debug_assert!(pin < GPIO_PINS_PER_PORT, "gpio pin {} out of range", pin);

    let (afrx, afr_pin) = afr_slot(pin);

    build_cfg(
        FLD_GET!(port.read_moder(), GPIO_MODER_MASK, GPIO_MODER_WIDTH, pin),
        FLD_GET!(port.read_otyper(), GPIO_OTYPER_MASK, GPIO_OTYPER_WIDTH, pin),
        FLD_GET!(port.read_ospeedr(), GPIO_OSPEEDR_MASK, GPIO_OSPEEDR_WIDTH, pin),
        FLD_GET!(port.read_pupdr(), GPIO_PUPDR_MASK, GPIO_PUPDR_WIDTH, pin),
        FLD_GET!(port.read_afr(afrx), GPIO_AFRX_MASK, GPIO_AFRX_WIDTH, afr_pin),
    )
}
