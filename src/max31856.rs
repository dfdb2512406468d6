//! High-level MAX31856 thermocouple driver implementation.
//!
//! The driver keeps no device state of its own: conversion mode, one-shot status and
//! thermocouple type live in the chip registers and are read back on every call. Every
//! update is a read-modify-write over the bus, so callers sharing one chip across contexts
//! must serialize whole operations.
//!
//! A one-shot conversion cycle looks like this:
//!
//! ```text
//! Idle --prepare_read()--> Converting (CR0.1SHOT set)
//!      <--read_c()-------- Ready      (hardware cleared CR0.1SHOT)
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::interface::spi::SpiInterface;
use crate::interface::Max31856Interface;
use crate::params::{Averaging, ConversionMode, NoiseFilter, ThermocoupleType};
use crate::registers::{
    cold_junction_temperature_c,
    linearized_temperature_c,
    Config0,
    Config1,
    FaultStatusRegister,
    REG_CJTH,
    REG_CR0,
    REG_CR1,
    REG_LTCBH,
    REG_SR,
};
use embedded_hal::spi::SpiDevice;

/// Decoded view of the `SR` fault status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultStatus {
    /// SR[7] cold-junction out of range.
    pub cj_range: bool,
    /// SR[6] thermocouple out of range.
    pub tc_range: bool,
    /// SR[5] cold-junction high fault.
    pub cj_high: bool,
    /// SR[4] cold-junction low fault.
    pub cj_low: bool,
    /// SR[3] thermocouple high fault.
    pub tc_high: bool,
    /// SR[2] thermocouple low fault.
    pub tc_low: bool,
    /// SR[1] over- or under-voltage input fault.
    pub ovuv: bool,
    /// SR[0] thermocouple open circuit.
    pub open: bool,
}

impl FaultStatus {
    /// Builds a snapshot from the raw `SR` bitfield.
    pub fn from_register(sr: FaultStatusRegister) -> Self {
        Self {
            cj_range: sr.cj_range(),
            tc_range: sr.tc_range(),
            cj_high: sr.cj_high(),
            cj_low: sr.cj_low(),
            tc_high: sr.tc_high(),
            tc_low: sr.tc_low(),
            ovuv: sr.ovuv(),
            open: sr.open(),
        }
    }

    /// Returns `true` when any fault flag is set.
    pub fn has_fault(&self) -> bool {
        self.cj_range
            || self.tc_range
            || self.cj_high
            || self.cj_low
            || self.tc_high
            || self.tc_low
            || self.ovuv
            || self.open
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FaultStatus {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "FaultStatus {{ CJ_RANGE: {}, TC_RANGE: {}, CJHIGH: {}, CJLOW: {}, TCHIGH: {}, TCLOW: {}, OVUV: {}, OPEN: {} }}",
            self.cj_range,
            self.tc_range,
            self.cj_high,
            self.cj_low,
            self.tc_high,
            self.tc_low,
            self.ovuv,
            self.open
        );
    }
}

/// High-level synchronous driver for the MAX31856 converter.
pub struct Max31856<IFACE> {
    interface: IFACE,
}

impl<IFACE> Max31856<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub const fn new(interface: IFACE) -> Self {
        Self { interface }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> IFACE {
        self.interface
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }
}

impl<SPI> Max31856<SpiInterface<SPI>>
where
    SPI: SpiDevice,
{
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI) -> Self {
        Self::new(SpiInterface::new(spi))
    }

    /// Releases the driver, returning the SPI device.
    pub fn release_spi(self) -> SPI {
        self.release().release()
    }
}

impl<IFACE, CommE> Max31856<IFACE>
where
    IFACE: Max31856Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Configuration ================================
    // ==================================================================
    /// Applies `config`, clearing any latched faults first.
    pub fn init(&mut self, config: &Config) -> Result<(), CommE> {
        self.clear_faults()?;
        self.configure(config)
    }

    /// Applies a configuration to the device.
    ///
    /// Filter and type settings are programmed with automatic conversions stopped; the
    /// requested conversion mode is selected last.
    pub fn configure(&mut self, config: &Config) -> Result<(), CommE> {
        self.update_config0(|cr0| {
            cr0.set_continuous(false);
            cr0.set_one_shot(false);
            cr0.set_noise_filter(config.noise_filter);
            cr0.set_open_circuit(config.open_circuit);
        })?;

        self.update_config1(|cr1| {
            cr1.set_thermocouple_type(config.thermocouple_type);
            cr1.set_averaging(config.averaging);
        })?;

        if config.conversion_mode == ConversionMode::Continuous {
            self.set_continuous(true)?;
        }

        debug!("max31856 configured");
        Ok(())
    }

    // ==================================================================
    // == Conversion Control ============================================
    // ==================================================================
    /// Enables automatic conversions, or returns to one-shot mode and requests a conversion.
    pub fn set_continuous(&mut self, enabled: bool) -> Result<(), CommE> {
        self.update_config0(|cr0| {
            cr0.set_continuous(enabled);
            cr0.set_one_shot(!enabled);
        })?;
        Ok(())
    }

    /// Returns `true` when automatic conversions are enabled.
    pub fn is_continuous(&mut self) -> Result<bool, CommE> {
        Ok(self.read_config0()?.continuous())
    }

    /// Stops automatic conversions and triggers a single conversion.
    pub fn prepare_read(&mut self) -> Result<(), CommE> {
        self.update_config0(|cr0| {
            cr0.set_continuous(false);
            cr0.set_one_shot(true);
        })?;
        Ok(())
    }

    /// Returns `true` once the hardware has cleared the one-shot request.
    pub fn read_ready(&mut self) -> Result<bool, CommE> {
        Ok(!self.read_config0()?.one_shot())
    }

    /// Selects the mains noise rejection filter.
    ///
    /// The datasheet forbids changing the filter during automatic conversions.
    pub fn set_noise_filter(&mut self, filter: NoiseFilter) -> Result<(), CommE> {
        self.update_config0(|cr0| cr0.set_noise_filter(filter))?;
        Ok(())
    }

    // ==================================================================
    // == Thermocouple Selection ========================================
    // ==================================================================
    /// Selects a K-type thermocouple.
    pub fn set_thermocouple_type_k(&mut self) -> Result<(), CommE> {
        self.set_thermocouple_type(ThermocoupleType::K)
    }

    /// Selects the thermocouple type, preserving the rest of `CR1`.
    pub fn set_thermocouple_type(&mut self, tc_type: ThermocoupleType) -> Result<(), CommE> {
        self.update_config1(|cr1| cr1.set_thermocouple_type(tc_type))
    }

    /// Reads back the thermocouple type; `None` for codes the datasheet leaves unassigned.
    pub fn thermocouple_type(&mut self) -> Result<Option<ThermocoupleType>, CommE> {
        let cr1 = Config1::from(self.interface.read_register_u8(REG_CR1)?);
        Ok(cr1.thermocouple_type())
    }

    /// Selects how many samples are averaged per conversion.
    pub fn set_averaging(&mut self, averaging: Averaging) -> Result<(), CommE> {
        self.update_config1(|cr1| cr1.set_averaging(averaging))
    }

    // ==================================================================
    // == Data Acquisition & Faults =====================================
    // ==================================================================
    /// Reads the linearized thermocouple temperature in °C.
    ///
    /// Returns NaN while a one-shot conversion is still pending; poll [`Self::read_ready`]
    /// or enable continuous mode and retry.
    pub fn read_c(&mut self) -> Result<f32, CommE> {
        if !self.read_ready()? {
            trace!("max31856 conversion pending");
            return Ok(f32::NAN);
        }

        let raw = self.interface.read_register_u24(REG_LTCBH)?;
        trace!("max31856 LTCB {=u32:#x}", raw);
        Ok(linearized_temperature_c(raw))
    }

    /// Reads the cold-junction temperature in °C.
    pub fn read_cold_junction_c(&mut self) -> Result<f32, CommE> {
        let raw = self.interface.read_register_u16(REG_CJTH)?;
        Ok(cold_junction_temperature_c(raw))
    }

    /// Returns a snapshot of the `SR` fault status register.
    pub fn read_fault_status(&mut self) -> Result<FaultStatus, CommE> {
        let sr = FaultStatusRegister::from(self.interface.read_register_u8(REG_SR)?);
        let status = FaultStatus::from_register(sr);
        if status.has_fault() {
            warn!("max31856 fault status {=u8:#x}", u8::from(sr));
        }

        Ok(status)
    }

    /// Requests that latched fault flags be cleared; the hardware resets `FAULTCLR` itself.
    pub fn clear_faults(&mut self) -> Result<(), CommE> {
        self.update_config0(|cr0| {
            cr0.set_fault_clear(true);
            cr0.set_one_shot(false);
        })?;
        Ok(())
    }

    // ==================================================================
    // == Internal Register Helpers =====================================
    // ==================================================================
    fn read_config0(&mut self) -> Result<Config0, CommE> {
        Ok(Config0::from(self.interface.read_register_u8(REG_CR0)?))
    }

    // CR0 is always rewritten: writing 1SHOT is what starts a conversion.
    fn update_config0<F>(&mut self, mutate: F) -> Result<Config0, CommE>
    where
        F: FnOnce(&mut Config0),
    {
        let mut cr0 = self.read_config0()?;
        mutate(&mut cr0);
        self.interface.write_register(REG_CR0, u8::from(cr0))?;
        Ok(cr0)
    }

    fn update_config1<F>(&mut self, mutate: F) -> Result<(), CommE>
    where
        F: FnOnce(&mut Config1),
    {
        let current = self.interface.read_register_u8(REG_CR1)?;

        let mut cr1 = Config1::from(current);
        mutate(&mut cr1);

        let updated = u8::from(cr1);
        if updated != current {
            self.interface.write_register(REG_CR1, updated)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::OpenCircuitDetection;
    use core::convert::Infallible;

    /// In-memory register file that echoes writes back on reads, with address auto-increment.
    struct FakeChip {
        regs: [u8; 16],
        writes: usize,
        reads: usize,
    }

    impl FakeChip {
        fn new() -> Self {
            let mut regs = [0u8; 16];
            regs[REG_CR1 as usize] = 0x03;
            Self { regs, writes: 0, reads: 0 }
        }

        fn with_temperature(mut self, raw: u32) -> Self {
            let [_, h, m, l] = raw.to_be_bytes();
            self.regs[REG_LTCBH as usize..REG_LTCBH as usize + 3].copy_from_slice(&[h, m, l]);
            self
        }
    }

    impl Max31856Interface for FakeChip {
        type Error = Infallible;

        fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> core::result::Result<(), Self::Error> {
            let Some((&command, payload)) = write.split_first() else {
                return Ok(());
            };
            let start = usize::from(command & 0x7F);

            if command & 0x80 != 0 {
                self.writes += 1;
                for (offset, byte) in payload.iter().enumerate() {
                    self.regs[(start + offset) % 16] = *byte;
                }
            } else {
                self.reads += 1;
                for (offset, byte) in read.iter_mut().enumerate() {
                    *byte = self.regs[(start + offset) % 16];
                }
            }

            Ok(())
        }
    }

    #[test]
    fn continuous_then_one_shot_leaves_one_shot_requested() {
        let mut chip = FakeChip::new();
        let mut driver = Max31856::new(&mut chip);

        driver.set_continuous(true).unwrap();
        assert!(driver.is_continuous().unwrap());
        driver.set_continuous(false).unwrap();
        assert!(!driver.is_continuous().unwrap());

        let cr0 = chip.regs[REG_CR0 as usize];
        assert_eq!(cr0 & 0x40, 0x40);
        assert_eq!(cr0 & 0x80, 0x00);
    }

    #[test]
    fn continuous_clears_one_shot() {
        let mut chip = FakeChip::new();
        chip.regs[REG_CR0 as usize] = 0x41;
        let mut driver = Max31856::new(&mut chip);

        driver.set_continuous(true).unwrap();
        assert_eq!(chip.regs[REG_CR0 as usize], 0x81);
    }

    #[test]
    fn prepare_read_requests_one_shot() {
        let mut chip = FakeChip::new();
        chip.regs[REG_CR0 as usize] = 0x81;
        let mut driver = Max31856::new(&mut chip);

        driver.prepare_read().unwrap();
        assert!(!driver.read_ready().unwrap());
        assert_eq!(chip.regs[REG_CR0 as usize], 0x41);
    }

    #[test]
    fn read_c_is_nan_while_conversion_pending() {
        let mut chip = FakeChip::new().with_temperature(0x01_9000);
        chip.regs[REG_CR0 as usize] = 0x40;
        let mut driver = Max31856::new(&mut chip);

        assert!(driver.read_c().unwrap().is_nan());
        // Only CR0 was polled.
        assert_eq!(chip.reads, 1);
    }

    #[test]
    fn one_shot_cycle() {
        let mut chip = FakeChip::new().with_temperature(0x01_9000);
        let mut driver = Max31856::new(&mut chip);

        driver.prepare_read().unwrap();
        assert!(driver.read_c().unwrap().is_nan());

        // Hardware clears 1SHOT when the conversion completes.
        driver.interface_mut().regs[REG_CR0 as usize] &= !0x40;
        assert!(driver.read_ready().unwrap());
        assert_eq!(driver.read_c().unwrap(), 25.0);
    }

    #[test]
    fn read_c_positive_full_scale_without_sign_fill() {
        let mut chip = FakeChip::new().with_temperature(0x7F_FFE0);
        let mut driver = Max31856::new(&mut chip);

        let expected = (0x7F_FFE0_i32 >> 5) as f32 * (1.0 / 128.0);
        assert_eq!(driver.read_c().unwrap(), expected);
        assert_eq!(expected, 2047.9921875);
    }

    #[test]
    fn read_c_negative_after_sign_fill() {
        let mut chip = FakeChip::new().with_temperature(0xFF_FFE0);
        let mut driver = Max31856::new(&mut chip);

        let temp = driver.read_c().unwrap();
        assert!(temp < 0.0);
        assert_eq!(temp, -0.0078125);
    }

    #[test]
    fn set_type_k_preserves_upper_nibble() {
        let mut chip = FakeChip::new();
        chip.regs[REG_CR1 as usize] = 0x47;
        let mut driver = Max31856::new(&mut chip);

        driver.set_thermocouple_type_k().unwrap();
        assert_eq!(driver.thermocouple_type().unwrap(), Some(ThermocoupleType::K));
        assert_eq!(chip.regs[REG_CR1 as usize], 0x43);
    }

    #[test]
    fn set_type_skips_redundant_write() {
        let mut chip = FakeChip::new();
        let mut driver = Max31856::new(&mut chip);

        driver.set_thermocouple_type_k().unwrap();
        assert_eq!(chip.writes, 0);
    }

    #[test]
    fn averaging_and_filter() {
        let mut chip = FakeChip::new();
        let mut driver = Max31856::new(&mut chip);

        driver.set_averaging(Averaging::Samples16).unwrap();
        driver.set_noise_filter(NoiseFilter::Hz50).unwrap();
        assert_eq!(chip.regs[REG_CR1 as usize], 0x43);
        assert_eq!(chip.regs[REG_CR0 as usize], 0x01);
    }

    #[test]
    fn configure_programs_registers_and_mode() {
        let mut chip = FakeChip::new();
        chip.regs[REG_CR0 as usize] = 0x80;
        let mut driver = Max31856::new(&mut chip);

        let config = Config::new()
            .thermocouple_type(ThermocoupleType::T)
            .averaging(Averaging::Samples2)
            .noise_filter(NoiseFilter::Hz50)
            .open_circuit(OpenCircuitDetection::Enabled1)
            .conversion_mode(ConversionMode::Continuous)
            .build();
        driver.configure(&config).unwrap();

        assert_eq!(chip.regs[REG_CR0 as usize], 0x91);
        assert_eq!(chip.regs[REG_CR1 as usize], 0x17);
    }

    #[test]
    fn configure_one_shot_leaves_conversions_off() {
        let mut chip = FakeChip::new();
        chip.regs[REG_CR0 as usize] = 0x80;
        let mut driver = Max31856::new(&mut chip);

        driver.configure(&Config::default()).unwrap();
        assert!(!driver.is_continuous().unwrap());
        assert!(driver.read_ready().unwrap());
    }

    #[test]
    fn init_requests_fault_clear() {
        let mut chip = FakeChip::new();
        let mut driver = Max31856::new(&mut chip);

        driver.init(&Config::default()).unwrap();
        // The fake does not self-clear FAULTCLR.
        assert_eq!(chip.regs[REG_CR0 as usize] & 0x02, 0x02);
    }

    #[test]
    fn fault_status_snapshot() {
        let mut chip = FakeChip::new();
        chip.regs[REG_SR as usize] = 0b0100_0001;
        let mut driver = Max31856::new(&mut chip);

        let status = driver.read_fault_status().unwrap();
        assert!(status.has_fault());
        assert!(status.open);
        assert!(status.tc_range);
        assert!(!status.ovuv);

        driver.interface_mut().regs[REG_SR as usize] = 0;
        assert!(!driver.read_fault_status().unwrap().has_fault());
    }

    #[test]
    fn cold_junction_reads_two_registers() {
        let mut chip = FakeChip::new();
        chip.regs[REG_CJTH as usize] = 0x19;
        chip.regs[REG_CJTH as usize + 1] = 0x00;
        let mut driver = Max31856::new(&mut chip);

        assert_eq!(driver.read_cold_junction_c().unwrap(), 25.0);
    }
}
