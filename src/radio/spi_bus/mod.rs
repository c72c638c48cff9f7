//! [`RadioBus`] over an `embedded-hal-async` SPI bus with discrete
//! chip-select and reset lines.
//!
//! Register access follows the RFM69 convention: the address byte carries
//! the direction in its MSB (set for writes, cleared for reads), and the FIFO
//! is register `0x00` accessed in bursts.
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use crate::error::SpiBusError;
use crate::radio::registers::REG_FIFO;
use crate::traits::radio_bus::RadioBus;

const WRITE_FLAG: u8 = 0x80;
const ADDRESS_MASK: u8 = 0x7F;

/// Selects the transceiver for the lifetime of the guard. Deselects on drop,
/// including early returns on SPI errors and cancelled futures.
struct ChipSelect<'a, CS: OutputPin> {
    pin: &'a mut CS,
}

impl<'a, CS: OutputPin> ChipSelect<'a, CS> {
    fn select(pin: &'a mut CS) -> Result<Self, CS::Error> {
        pin.set_low()?;
        Ok(Self { pin })
    }
}

impl<CS: OutputPin> Drop for ChipSelect<'_, CS> {
    fn drop(&mut self) {
        // Nothing left to report to once the transaction is over.
        let _ = self.pin.set_high();
    }
}

/// SPI transport for the radio driver.
pub struct SpiRadioBus<SPI, CS, RST> {
    spi: SPI,
    /// Active-low chip select.
    cs: CS,
    /// Active-high reset line.
    reset: RST,
}

impl<SPI, CS, RST> SpiRadioBus<SPI, CS, RST>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    RST: OutputPin,
{
    /// Wrap the peripherals. Chip select and reset are driven inactive right
    /// away, so the transceiver is never held in reset before `initialize`.
    pub fn new(spi: SPI, mut cs: CS, mut reset: RST) -> Result<Self, SpiBusError<SPI::Error>> {
        cs.set_high().map_err(|_| SpiBusError::Pin)?;
        reset.set_low().map_err(|_| SpiBusError::Pin)?;
        Ok(Self { spi, cs, reset })
    }

    /// Give the peripherals back.
    pub fn release(self) -> (SPI, CS, RST) {
        (self.spi, self.cs, self.reset)
    }
}

impl<SPI, CS, RST> RadioBus for SpiRadioBus<SPI, CS, RST>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    RST: OutputPin,
{
    type Error = SpiBusError<SPI::Error>;

    async fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error> {
        let _cs = ChipSelect::select(&mut self.cs).map_err(|_| SpiBusError::Pin)?;
        let mut frame = [addr & ADDRESS_MASK, 0];
        self.spi
            .transfer_in_place(&mut frame)
            .await
            .map_err(SpiBusError::Spi)?;
        self.spi.flush().await.map_err(SpiBusError::Spi)?;
        Ok(frame[1])
    }

    async fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Self::Error> {
        let _cs = ChipSelect::select(&mut self.cs).map_err(|_| SpiBusError::Pin)?;
        self.spi
            .write(&[addr | WRITE_FLAG, value])
            .await
            .map_err(SpiBusError::Spi)?;
        self.spi.flush().await.map_err(SpiBusError::Spi)
    }

    async fn read_fifo<'a>(&'a mut self, buffer: &'a mut [u8]) -> Result<(), Self::Error> {
        let _cs = ChipSelect::select(&mut self.cs).map_err(|_| SpiBusError::Pin)?;
        self.spi
            .write(&[REG_FIFO & ADDRESS_MASK])
            .await
            .map_err(SpiBusError::Spi)?;
        self.spi.read(buffer).await.map_err(SpiBusError::Spi)?;
        self.spi.flush().await.map_err(SpiBusError::Spi)
    }

    async fn write_fifo<'a>(&'a mut self, data: &'a [u8]) -> Result<(), Self::Error> {
        let _cs = ChipSelect::select(&mut self.cs).map_err(|_| SpiBusError::Pin)?;
        self.spi
            .write(&[REG_FIFO | WRITE_FLAG])
            .await
            .map_err(SpiBusError::Spi)?;
        self.spi.write(data).await.map_err(SpiBusError::Spi)?;
        self.spi.flush().await.map_err(SpiBusError::Spi)
    }

    fn assert_reset(&mut self) -> Result<(), Self::Error> {
        self.reset.set_high().map_err(|_| SpiBusError::Pin)
    }

    fn release_reset(&mut self) -> Result<(), Self::Error> {
        self.reset.set_low().map_err(|_| SpiBusError::Pin)
    }
}
