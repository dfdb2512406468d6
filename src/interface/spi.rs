//! SPI interface implementation built on top of `embedded-hal` `SpiDevice`.

use embedded_hal::spi::{Mode, Operation, SpiDevice, MODE_1};

use super::Max31856Interface;

/// SPI-based interface implementation for the MAX31856 driver.
///
/// Chip select framing is delegated to the wrapped [`SpiDevice`].
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// SPI mode expected by the MAX31856 (CPOL = 0, CPHA = 1), MSB first.
    pub const MODE: Mode = MODE_1;
    /// Highest SCLK frequency supported by the MAX31856.
    pub const MAX_FREQUENCY_HZ: u32 = 5_000_000;

    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Max31856Interface for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> core::result::Result<(), Self::Error> {
        match (write.is_empty(), read.is_empty()) {
            (true, true) => Ok(()),
            (false, true) => self.spi.transaction(&mut [Operation::Write(write)]),
            (true, false) => self.spi.transaction(&mut [Operation::TransferInPlace(read)]),
            (false, false) => self
                .spi
                .transaction(&mut [Operation::Write(write), Operation::TransferInPlace(read)]),
        }
    }
}
