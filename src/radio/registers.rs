//! RFM69 register map and bit fields used by the driver.

//==================================================================================ADDRESSES
pub const REG_FIFO: u8 = 0x00;
pub const REG_OPMODE: u8 = 0x01;
pub const REG_DATAMODUL: u8 = 0x02;
pub const REG_BITRATE_MSB: u8 = 0x03;
pub const REG_BITRATE_LSB: u8 = 0x04;
pub const REG_FDEV_MSB: u8 = 0x05;
pub const REG_FDEV_LSB: u8 = 0x06;
pub const REG_FRF_MSB: u8 = 0x07;
pub const REG_FRF_MID: u8 = 0x08;
pub const REG_FRF_LSB: u8 = 0x09;
pub const REG_VERSION: u8 = 0x10;
pub const REG_PALEVEL: u8 = 0x11;
pub const REG_RXBW: u8 = 0x19;
pub const REG_AFCBW: u8 = 0x1A;
pub const REG_IRQFLAGS1: u8 = 0x27;
pub const REG_IRQFLAGS2: u8 = 0x28;
pub const REG_PREAMBLE_MSB: u8 = 0x2C;
pub const REG_PREAMBLE_LSB: u8 = 0x2D;
pub const REG_SYNCCONFIG: u8 = 0x2E;
pub const REG_SYNCVALUE1: u8 = 0x2F;
pub const REG_PACKETCONFIG1: u8 = 0x37;
pub const REG_PAYLOAD_LENGTH: u8 = 0x38;
pub const REG_FIFOTHRESH: u8 = 0x3C;
pub const REG_PACKETCONFIG2: u8 = 0x3D;
pub const REG_TESTPA1: u8 = 0x5A;
pub const REG_TESTPA2: u8 = 0x5C;
pub const REG_TESTDAGC: u8 = 0x6F;

//==================================================================================VALUES
/// Silicon revision reported by `REG_VERSION`.
pub const CHIP_VERSION: u8 = 0x24;

/// Mode bits of `REG_OPMODE`.
pub const OPMODE_MODE_MASK: u8 = 0x1C;
pub const OPMODE_MODE_STANDBY: u8 = 0x04;
pub const OPMODE_MODE_TX: u8 = 0x0C;
pub const OPMODE_MODE_RX: u8 = 0x10;

pub const DATAMODUL_PACKET_MODE: u8 = 0x00;
pub const DATAMODUL_FSK: u8 = 0x00;
pub const DATAMODUL_SHAPING_BT1_0: u8 = 0x01;

pub const PALEVEL_PA0_ON: u8 = 0x80;
pub const PALEVEL_OUTPUT_POWER: u8 = 0x1F;

/// Channel filter setting used for both RX and AFC bandwidth.
pub const RXBW_DEFAULT: u8 = 0xF4;

pub const IRQFLAGS1_MODE_READY: u8 = 0x80;
pub const IRQFLAGS2_PAYLOAD_READY: u8 = 0x04;
pub const IRQFLAGS2_PACKET_SENT: u8 = 0x08;

pub const SYNCCONFIG_SYNC_ON: u8 = 0x80;
pub const SYNCCONFIG_SYNC_SIZE: u8 = 0x38;

pub const PACKETCONFIG1_VARIABLE_LENGTH: u8 = 0x80;
pub const PACKETCONFIG1_DCFREE_WHITENING: u8 = 0x40;
pub const PACKETCONFIG1_CRC_ON: u8 = 0x10;
pub const PACKETCONFIG1_NO_ADDRESS_FILTER: u8 = 0x00;

pub const PACKETCONFIG2_AES_ON: u8 = 0x01;

/// Start transmitting as soon as the FIFO is not empty, threshold 15.
pub const FIFOTHRESH_DEFAULT: u8 = 0x8F;
pub const TESTDAGC_IMPROVED_LOW_BETA_OFF: u8 = 0x30;
pub const TESTPA1_NORMAL: u8 = 0x55;
pub const TESTPA2_NORMAL: u8 = 0x70;
