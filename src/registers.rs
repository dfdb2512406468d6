//! Register map definitions for the MAX31856 thermocouple converter.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{Averaging, NoiseFilter, OpenCircuitDetection, ThermocoupleType};

/// Set on the address byte to select a register write.
pub const WRITE_BIT: u8 = 0x80;
/// Mask leaving the 7-bit register address of a read.
pub const ADDRESS_MASK: u8 = 0x7F;

/// Register address of `CR0`.
pub const REG_CR0: u8 = 0x00;
/// Register address of `CR1`.
pub const REG_CR1: u8 = 0x01;
/// Register address of `MASK`.
pub const REG_MASK: u8 = 0x02;
/// Register address of `CJHF`.
pub const REG_CJHF: u8 = 0x03;
/// Register address of `CJLF`.
pub const REG_CJLF: u8 = 0x04;
/// Register address of `LTHFTH`.
pub const REG_LTHFTH: u8 = 0x05;
/// Register address of `LTHFTL`.
pub const REG_LTHFTL: u8 = 0x06;
/// Register address of `LTLFTH`.
pub const REG_LTLFTH: u8 = 0x07;
/// Register address of `LTLFTL`.
pub const REG_LTLFTL: u8 = 0x08;
/// Register address of `CJTO`.
pub const REG_CJTO: u8 = 0x09;
/// Register address of `CJTH`.
pub const REG_CJTH: u8 = 0x0A;
/// Register address of `CJTL`.
pub const REG_CJTL: u8 = 0x0B;
/// Register address of `LTCBH`.
pub const REG_LTCBH: u8 = 0x0C;
/// Register address of `LTCBM`.
pub const REG_LTCBM: u8 = 0x0D;
/// Register address of `LTCBL`.
pub const REG_LTCBL: u8 = 0x0E;
/// Register address of `SR`.
pub const REG_SR: u8 = 0x0F;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Optional reset/default value defined by the datasheet.
    const RESET_VALUE: Option<Self::Raw>;
}

/// Bitfield representation of the `CR0` register (address `0x00`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config0 {
    // 50/60 Hz noise rejection selection (bit 0).
    pub noise_filter: NoiseFilter,
    // Fault status clear request (bit 1).
    pub fault_clear: bool,
    // Interrupt (1) or comparator (0) fault mode (bit 2).
    pub fault_interrupt: bool,
    // Cold-junction sensor disable (bit 3).
    pub cj_disable: bool,
    // Open-circuit fault detection (bits 5:4).
    pub open_circuit: OpenCircuitDetection,
    // One-shot conversion request; cleared by hardware when done (bit 6).
    pub one_shot: bool,
    // Automatic conversion mode (bit 7).
    pub continuous: bool,
}

impl From<u8> for Config0 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Config0> for u8 {
    fn from(value: Config0) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CR1` register (address `0x01`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config1 {
    // Thermocouple type code (bits 3:0).
    pub tc_type_bits: B4,
    // Averaging mode selection (bits 6:4).
    pub averaging_bits: B3,
    #[skip]
    __: B1,
}

impl Config1 {
    /// Returns the configured thermocouple type, if the code is assigned.
    pub fn thermocouple_type(&self) -> Option<ThermocoupleType> {
        ThermocoupleType::from_bits(self.tc_type_bits())
    }

    /// Replaces the thermocouple type code, leaving the upper nibble untouched.
    pub fn set_thermocouple_type(&mut self, tc_type: ThermocoupleType) {
        self.set_tc_type_bits(tc_type.bits() & 0x0F);
    }

    /// Returns the configured averaging mode.
    pub fn averaging(&self) -> Averaging {
        Averaging::from_bits(self.averaging_bits())
    }

    /// Replaces the averaging mode.
    pub fn set_averaging(&mut self, averaging: Averaging) {
        self.set_averaging_bits(averaging.bits() & 0b111);
    }
}

impl From<u8> for Config1 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Config1> for u8 {
    fn from(value: Config1) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `SR` fault status register (address `0x0F`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultStatusRegister {
    // Thermocouple open circuit (bit 0).
    pub open: bool,
    // Over- or under-voltage on the inputs (bit 1).
    pub ovuv: bool,
    // Thermocouple below the low threshold (bit 2).
    pub tc_low: bool,
    // Thermocouple above the high threshold (bit 3).
    pub tc_high: bool,
    // Cold junction below the low threshold (bit 4).
    pub cj_low: bool,
    // Cold junction above the high threshold (bit 5).
    pub cj_high: bool,
    // Thermocouple out of its type's range (bit 6).
    pub tc_range: bool,
    // Cold junction out of range (bit 7).
    pub cj_range: bool,
}

impl From<u8> for FaultStatusRegister {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<FaultStatusRegister> for u8 {
    fn from(value: FaultStatusRegister) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for Config0 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CR0;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for Config1 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CR1;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x03);
}

impl Register for FaultStatusRegister {
    type Raw = u8;
    const ADDRESS: u8 = REG_SR;
    const ACCESS: RegisterAccess = RegisterAccess::ReadOnly;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

/// Decodes the 24-bit `LTCBH:LTCBM:LTCBL` value into °C.
///
/// Bit 23 is the sign, bits 4:0 are unused, one LSB of the remaining 19 bits is 1/128 °C.
pub fn linearized_temperature_c(raw: u32) -> f32 {
    let mut temp128 = (raw & 0x00FF_FFFF) as i32;
    if temp128 & 0x0080_0000 != 0 {
        temp128 |= 0xFF00_0000_u32 as i32;
    }
    temp128 >>= 5;

    temp128 as f32 * (1.0 / 128.0)
}

/// Decodes the 16-bit `CJTH:CJTL` value into °C.
///
/// The value is a left-justified signed 14-bit number, one LSB is 1/64 °C.
pub fn cold_junction_temperature_c(raw: u16) -> f32 {
    ((raw as i16) >> 2) as f32 * (1.0 / 64.0)
}
