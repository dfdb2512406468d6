//! Strongly typed parameter enumerations for the MAX31856 driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs.
//!
//! # Examples
//!
//! ```rust
//! use max3185x::params::{Averaging, NoiseFilter, ThermocoupleType};
//!
//! let tc = ThermocoupleType::K;
//! assert_eq!(tc.bits(), 0b0011);
//! assert_eq!(ThermocoupleType::from_bits(0b0011), Some(tc));
//! let _ = (Averaging::Samples4, NoiseFilter::Hz50);
//! ```

use modular_bitfield::prelude::Specifier;

/// Thermocouple type selection (`CR1.TC_TYPE`, bits 3:0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ThermocoupleType {
    /// B-type thermocouple.
    B = 0b0000,
    /// E-type thermocouple.
    E = 0b0001,
    /// J-type thermocouple.
    J = 0b0010,
    /// K-type thermocouple (power-on default).
    K = 0b0011,
    /// N-type thermocouple.
    N = 0b0100,
    /// R-type thermocouple.
    R = 0b0101,
    /// S-type thermocouple.
    S = 0b0110,
    /// T-type thermocouple.
    T = 0b0111,
    /// Voltage mode, gain 8.
    VoltageGain8 = 0b1000,
    /// Voltage mode, gain 32.
    VoltageGain32 = 0b1100,
}

impl ThermocoupleType {
    /// Returns the 4-bit field encoding.
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes a 4-bit field. Codes the datasheet leaves unassigned return `None`.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x0F {
            0b0000 => Some(Self::B),
            0b0001 => Some(Self::E),
            0b0010 => Some(Self::J),
            0b0011 => Some(Self::K),
            0b0100 => Some(Self::N),
            0b0101 => Some(Self::R),
            0b0110 => Some(Self::S),
            0b0111 => Some(Self::T),
            0b1000 => Some(Self::VoltageGain8),
            0b1100 => Some(Self::VoltageGain32),
            _ => None,
        }
    }
}

/// Samples averaged per conversion (`CR1.AVGSEL`, bits 6:4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Averaging {
    /// 1 sample (power-on default).
    Samples1 = 0b000,
    /// 2 samples.
    Samples2 = 0b001,
    /// 4 samples.
    Samples4 = 0b010,
    /// 8 samples.
    Samples8 = 0b011,
    /// 16 samples.
    Samples16 = 0b100,
}

impl Averaging {
    /// Returns the 3-bit field encoding.
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes a 3-bit field; every `1xx` pattern selects 16 samples.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Self::Samples1,
            0b001 => Self::Samples2,
            0b010 => Self::Samples4,
            0b011 => Self::Samples8,
            _ => Self::Samples16,
        }
    }

    /// Returns the number of samples averaged.
    pub const fn samples(self) -> u8 {
        1 << (self as u8)
    }
}

/// Mains noise rejection filter (`CR0.50/60Hz`, bit 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum NoiseFilter {
    /// Reject 60 Hz and its harmonics (power-on default).
    Hz60 = 0,
    /// Reject 50 Hz and its harmonics.
    Hz50 = 1,
}

/// Open-circuit fault detection mode (`CR0.OCFAULT`, bits 5:4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum OpenCircuitDetection {
    /// Detection disabled (power-on default).
    Disabled = 0b00,
    /// Enabled for source resistance below 5 kΩ.
    Enabled1 = 0b01,
    /// Enabled for 5 kΩ to 40 kΩ source resistance, time constant below 2 ms.
    Enabled2 = 0b10,
    /// Enabled for 5 kΩ to 40 kΩ source resistance, time constant above 2 ms.
    Enabled3 = 0b11,
}

/// Conversion scheduling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionMode {
    /// Normally off; each conversion is triggered with a one-shot request.
    OneShot,
    /// Automatic conversions roughly every 100 ms.
    Continuous,
}
