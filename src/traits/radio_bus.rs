//! Minimal abstraction for the register-addressed transceiver bus. Allows the
//! driver to plug into various implementations (SPI HAL, simulator, etc.).
use futures_util::Future;

/// Contract to access transceiver registers and FIFO asynchronously.
///
/// Every call is one complete bus transaction: implementations select the
/// device on entry and release it on every exit path, errors included.
pub trait RadioBus {
    type Error: core::fmt::Debug;

    /// Read a single register.
    fn read_register<'a>(
        &'a mut self,
        addr: u8,
    ) -> impl Future<Output = Result<u8, Self::Error>> + 'a;

    /// Write a single register.
    fn write_register<'a>(
        &'a mut self,
        addr: u8,
        value: u8,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;

    /// Burst-read `buffer.len()` bytes out of the FIFO.
    fn read_fifo<'a>(
        &'a mut self,
        buffer: &'a mut [u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;

    /// Burst-write `data` into the FIFO.
    fn write_fifo<'a>(
        &'a mut self,
        data: &'a [u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;

    /// Drive the reset line to its active level.
    fn assert_reset(&mut self) -> Result<(), Self::Error>;

    /// Return the reset line to its inactive level.
    fn release_reset(&mut self) -> Result<(), Self::Error>;
}
