//! Bus interface abstraction for the MAX31856 driver.
//!
//! An implementation only supplies [`Max31856Interface::transfer`]; the byte-level and
//! register-level helpers are provided on top of it, so the same register logic runs over
//! real SPI ([`spi::SpiInterface`]) or an in-memory fake.

pub mod spi;

use crate::registers::{ADDRESS_MASK, WRITE_BIT};

/// Sentinel clocked out while reading; a floating MISO line also reads back as `0xFF`.
pub const READ_SENTINEL: u8 = 0xFF;

/// Abstraction over the low-level bus access required by the driver.
pub trait Max31856Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Performs one chip-select framed transaction.
    ///
    /// Clocks out `write`, then exchanges `read` in place: its current contents are shifted
    /// out while the incoming bytes replace them. An empty `read` makes the transaction
    /// write-only.
    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Write-only transaction.
    fn write(&mut self, buf: &[u8]) -> core::result::Result<(), Self::Error> {
        self.transfer(buf, &mut [])
    }

    /// Read-only transaction; `buf` is pre-filled with [`READ_SENTINEL`].
    fn read(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        buf.fill(READ_SENTINEL);
        self.transfer(&[], buf)
    }

    /// Combined transaction; `read` is pre-filled with [`READ_SENTINEL`].
    fn write_and_read(
        &mut self,
        write: &[u8],
        read: &mut [u8],
    ) -> core::result::Result<(), Self::Error> {
        read.fill(READ_SENTINEL);
        self.transfer(write, read)
    }

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.write(&[register | WRITE_BIT, value])
    }

    /// Reads `buf.len()` consecutive registers starting at `register`.
    fn read_register(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        self.write_and_read(&[register & ADDRESS_MASK], buf)
    }

    /// Reads an 8-bit register.
    fn read_register_u8(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.read_register(register, &mut buf)?;
        Ok(buf[0])
    }

    /// Reads a 16-bit value from two consecutive registers, MSB first.
    fn read_register_u16(&mut self, register: u8) -> core::result::Result<u16, Self::Error> {
        let mut buf = [0u8; 2];
        self.read_register(register, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Reads a 24-bit value from three consecutive registers, MSB first.
    fn read_register_u24(&mut self, register: u8) -> core::result::Result<u32, Self::Error> {
        let mut buf = [0u8; 3];
        self.read_register(register, &mut buf)?;
        Ok(u32::from_be_bytes([0, buf[0], buf[1], buf[2]]))
    }
}

impl<T> Max31856Interface for &mut T
where
    T: Max31856Interface + ?Sized,
{
    type Error = T::Error;

    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> core::result::Result<(), Self::Error> {
        (**self).transfer(write, read)
    }
}
