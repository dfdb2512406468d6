//! MAX31855 cold-junction compensated thermocouple-to-digital converter.
//!
//! The chip is read-only: every SPI read clocks out one 32-bit big-endian word holding the
//! thermocouple temperature, the internal (cold-junction) temperature and the fault bits.
//!
//! ```rust
//! use max3185x::max31855::{decode, FaultCode};
//!
//! let (reading, code) = decode(0x0190_1900);
//! assert_eq!(code, FaultCode::Ok);
//! assert_eq!(reading.degrees_c(), 25.0);
//! assert_eq!(reading.internal_degrees_c(), 25.0);
//! ```

use embedded_hal::spi::{Mode, SpiDevice, MODE_0};

use crate::error::{Error, Result};

/// SPI mode expected by the MAX31855 (CPOL = 0, CPHA = 0).
pub const SPI_MODE: Mode = MODE_0;

// D0: thermocouple open circuit.
const ERR_OC_BIT: u32 = 1 << 0;
// D1: thermocouple shorted to GND.
const ERR_SCG_BIT: u32 = 1 << 1;
// D2: thermocouple shorted to VCC.
const ERR_SCV_BIT: u32 = 1 << 2;
const RESERVED3_BIT: u32 = 1 << 3;
const INTERNAL_SHIFT: u32 = 4;
const INTERNAL_MASK: u32 = 0x0FFF;
// D16: set when any of D0..D2 is set.
const FAULT_BIT: u32 = 1 << 16;
const RESERVED17_BIT: u32 = 1 << 17;
const THERMOCOUPLE_SHIFT: u32 = 18;
const THERMOCOUPLE_MASK: u32 = 0x3FFF;

/// Fault classification reported by [`error_code`].
///
/// Discriminants match the numeric codes historically returned by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FaultCode {
    /// No fault.
    Ok = 0,
    /// Thermocouple is not connected.
    OpenCircuit = 1,
    /// Thermocouple is shorted to GND.
    ShortToGround = 2,
    /// Thermocouple is shorted to VCC.
    ShortToVcc = 3,
    /// The fault flag is set without any specific cause bit.
    GenericFault = 4,
}

impl FaultCode {
    /// Returns the numeric fault code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns `true` for [`FaultCode::Ok`].
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Decoded view of one 32-bit MAX31855 sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reading {
    /// D0: open circuit.
    pub err_oc: bool,
    /// D1: shorted to GND.
    pub err_scg: bool,
    /// D2: shorted to VCC.
    pub err_scv: bool,
    /// D3: reserved.
    pub reserved3: bool,
    /// D4-D15: internal temperature in 1/16 °C, sign-extended from 12 bits.
    pub internal_sixteenths: i16,
    /// D16: aggregate fault flag.
    pub fault: bool,
    /// D17: reserved.
    pub reserved17: bool,
    /// D18-D31: thermocouple temperature in 1/4 °C, sign-extended from 14 bits.
    pub quarter_degrees: i16,
}

impl Reading {
    /// Decodes a raw word as clocked out by the chip (MSB first).
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            err_oc: raw & ERR_OC_BIT != 0,
            err_scg: raw & ERR_SCG_BIT != 0,
            err_scv: raw & ERR_SCV_BIT != 0,
            reserved3: raw & RESERVED3_BIT != 0,
            // Move D15 up to bit 31 so the arithmetic shift fills the sign.
            internal_sixteenths: (((raw << 16) as i32) >> 20) as i16,
            fault: raw & FAULT_BIT != 0,
            reserved17: raw & RESERVED17_BIT != 0,
            quarter_degrees: ((raw as i32) >> THERMOCOUPLE_SHIFT) as i16,
        }
    }

    /// Re-encodes every field, reserved bits included, into the raw word layout.
    pub const fn to_raw(self) -> u32 {
        let thermocouple = (self.quarter_degrees as u16 as u32) & THERMOCOUPLE_MASK;
        let internal = (self.internal_sixteenths as u16 as u32) & INTERNAL_MASK;

        (thermocouple << THERMOCOUPLE_SHIFT)
            | ((self.reserved17 as u32) << 17)
            | ((self.fault as u32) << 16)
            | (internal << INTERNAL_SHIFT)
            | ((self.reserved3 as u32) << 3)
            | ((self.err_scv as u32) << 2)
            | ((self.err_scg as u32) << 1)
            | (self.err_oc as u32)
    }

    /// Highest-priority fault; see [`error_code`].
    pub const fn fault_code(&self) -> FaultCode {
        if self.err_oc {
            FaultCode::OpenCircuit
        } else if self.err_scg {
            FaultCode::ShortToGround
        } else if self.err_scv {
            FaultCode::ShortToVcc
        } else if self.fault {
            FaultCode::GenericFault
        } else {
            FaultCode::Ok
        }
    }

    /// Every specific fault bit that is set, in priority order.
    pub fn faults(&self) -> impl Iterator<Item = FaultCode> {
        let flags = [
            (self.err_oc, FaultCode::OpenCircuit),
            (self.err_scg, FaultCode::ShortToGround),
            (self.err_scv, FaultCode::ShortToVcc),
        ];
        flags.into_iter().filter_map(|(set, code)| set.then_some(code))
    }

    /// Thermocouple temperature in °C.
    pub fn degrees_c(&self) -> f64 {
        f64::from(self.quarter_degrees) / 4.0
    }

    /// Internal (cold-junction) temperature in °C.
    pub fn internal_degrees_c(&self) -> f64 {
        f64::from(self.internal_sixteenths) / 16.0
    }
}

impl From<u32> for Reading {
    fn from(raw: u32) -> Self {
        Self::from_raw(raw)
    }
}

impl From<Reading> for u32 {
    fn from(reading: Reading) -> Self {
        reading.to_raw()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Reading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Reading {{ quarter_degrees: {} ({} C), fault: {}, internal_sixteenths: {} ({} C), err_scv: {}, err_scg: {}, err_oc: {} }}",
            self.quarter_degrees,
            self.degrees_c(),
            self.fault,
            self.internal_sixteenths,
            self.internal_degrees_c(),
            self.err_scv,
            self.err_scg,
            self.err_oc
        );
    }
}

/// Decodes a raw sample and classifies its fault bits.
pub fn decode(raw: u32) -> (Reading, FaultCode) {
    let reading = Reading::from_raw(raw);
    (reading, reading.fault_code())
}

/// Reports the first matching fault in the order open circuit, short to GND, short to VCC,
/// generic fault. Use [`Reading::faults`] when several bits may be set at once.
pub fn error_code(reading: &Reading) -> FaultCode {
    reading.fault_code()
}

/// Thermocouple temperature in °C, or NaN when no reading is available.
pub fn degrees_c(reading: Option<&Reading>) -> f64 {
    reading.map_or(f64::NAN, Reading::degrees_c)
}

/// Internal temperature in °C, or NaN when no reading is available.
pub fn internal_degrees_c(reading: Option<&Reading>) -> f64 {
    reading.map_or(f64::NAN, Reading::internal_degrees_c)
}

/// Converts °C to °F.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    (celsius * 9.0 / 5.0) + 32.0
}

/// Converts °C to K.
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.15
}

/// Converts °C to °R.
pub fn celsius_to_rankine(celsius: f64) -> f64 {
    (celsius + 273.15) * 9.0 / 5.0
}

/// Blocking MAX31855 reader over an `embedded-hal` SPI device.
pub struct Max31855<SPI> {
    spi: SPI,
}

impl<SPI> Max31855<SPI> {
    /// Creates a reader from the provided SPI device.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the reader and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Max31855<SPI>
where
    SPI: SpiDevice,
{
    /// Clocks in one 32-bit sample.
    pub fn read_raw(&mut self) -> Result<u32, SPI::Error> {
        let mut buf = [0u8; 4];
        self.spi.read(&mut buf)?;

        let raw = u32::from_be_bytes(buf);
        trace!("max31855 raw {=u32:#x}", raw);
        Ok(raw)
    }

    /// Reads and decodes one sample without interpreting the fault bits.
    pub fn read(&mut self) -> Result<Reading, SPI::Error> {
        self.read_raw().map(Reading::from_raw)
    }

    /// Reads one sample, turning any flagged fault into [`Error::Fault`].
    pub fn read_checked(&mut self) -> Result<Reading, SPI::Error> {
        let (reading, code) = decode(self.read_raw()?);
        if !code.is_ok() {
            debug!("max31855 fault {}", code.code());
            return Err(Error::Fault(code));
        }

        Ok(reading)
    }
}
