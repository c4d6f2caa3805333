//! Platform-agnostic driver for the DS1307 real-time clock.
//!
//! The driver owns any [`embedded_hal::i2c::I2c`] transport and exposes the
//! chip's calendar registers as typed fields, the clock-halt flag, the
//! square-wave output configuration and a few RAM locations used to store a
//! UTC offset, the century and one free-form byte.
//!
//! ```no_run
//! # fn demo<I2C: embedded_hal::i2c::I2c>(i2c: I2C) -> Result<(), ds1307::Error<I2C::Error>> {
//! use ds1307::{Ds1307, SqwRate, SquareWave};
//!
//! let mut rtc = Ds1307::init(i2c)?;
//! rtc.set_year(2024)?;
//! rtc.set_square_wave_rate(SqwRate::_1Hz)?;
//! rtc.set_square_wave(SquareWave::Enabled)?;
//! let year = rtc.year()?;
//! # let _ = year;
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]
#![no_std]

use core::fmt;

pub use rtcc::{
    DateTimeAccess, Datelike, Hours, NaiveDate, NaiveDateTime, NaiveTime, Rtcc, Timelike,
};

/// All possible errors in this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// I²C bus error
    Comm(E),
    /// Invalid input data provided
    InvalidInputData,
    /// Internal device state is invalid.
    ///
    /// It was not possible to read a valid date and/or time.
    /// The device is probably missing initialization.
    InvalidDeviceState,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Comm(e) => write!(f, "DS1307 bus error: {:?}", e),
            Error::InvalidInputData => f.write_str("value out of range for DS1307 register"),
            Error::InvalidDeviceState => f.write_str("DS1307 holds an invalid date/time"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}

/// Square-wave output frequency (RS1..RS0 of the control register)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqwRate {
    /// 1 Hz
    _1Hz,
    /// 4.096 kHz
    _4_096kHz,
    /// 8.192 kHz
    _8_192kHz,
    /// 32.768 kHz
    _32_768kHz,
}

impl SqwRate {
    pub(crate) const fn bits(self) -> u8 {
        match self {
            SqwRate::_1Hz => 0b00,
            SqwRate::_4_096kHz => 0b01,
            SqwRate::_8_192kHz => 0b10,
            SqwRate::_32_768kHz => 0b11,
        }
    }

    pub(crate) const fn from_bits(bits: u8) -> Self {
        match bits & BitFlags::RS {
            0b00 => SqwRate::_1Hz,
            0b01 => SqwRate::_4_096kHz,
            0b10 => SqwRate::_8_192kHz,
            _ => SqwRate::_32_768kHz,
        }
    }

    /// Output frequency in hertz.
    pub const fn hz(self) -> u32 {
        match self {
            SqwRate::_1Hz => 1,
            SqwRate::_4_096kHz => 4_096,
            SqwRate::_8_192kHz => 8_192,
            SqwRate::_32_768kHz => 32_768,
        }
    }

    /// Rate for an exact frequency in hertz, if the chip supports it.
    pub const fn from_hz(hz: u32) -> Option<Self> {
        match hz {
            1 => Some(SqwRate::_1Hz),
            4_096 => Some(SqwRate::_4_096kHz),
            8_192 => Some(SqwRate::_8_192kHz),
            32_768 => Some(SqwRate::_32_768kHz),
            _ => None,
        }
    }
}

/// Square-wave output enable (SQWE bit of the control register)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareWave {
    /// SQW/OUT pin follows the OUT bit (default)
    Disabled,
    /// SQW/OUT pin outputs the selected rate
    Enabled,
}

struct Register;

impl Register {
    const SECONDS: u8 = 0x00;
    const MINUTES: u8 = 0x01;
    const HOURS: u8 = 0x02;
    const DOW: u8 = 0x03;
    const DATE: u8 = 0x04;
    const MONTH: u8 = 0x05;
    const YEAR: u8 = 0x06;
    const CONTROL: u8 = 0x07;
    // The following live in battery-backed RAM; the chip itself ignores them.
    const UTC_HOUR: u8 = 0x08;
    const UTC_MINUTE: u8 = 0x09;
    const CENTURY: u8 = 0x10;
    const RAM: u8 = 0x11;
    const LAST: u8 = 0x3F;
}

struct BitFlags;

impl BitFlags {
    const CH: u8 = 0b1000_0000;
    const H24_H12: u8 = 0b0100_0000;
    const AM_PM: u8 = 0b0010_0000;
    const HOURS_24: u8 = 0b0011_1111;
    const HOURS_12: u8 = 0b0001_1111;
    const OUT: u8 = 0b1000_0000;
    const SQWE: u8 = 0b0001_0000;
    const RS: u8 = 0b0000_0011;
}

/// 7-bit I²C address of the DS1307.
pub const DEVICE_ADDRESS: u8 = 0b110_1000;

/// DS1307 RTC driver
#[derive(Debug, Default)]
pub struct Ds1307<I2C> {
    i2c: I2C,
}

pub mod bcd;
pub use crate::bcd::{decode as decode_bcd, encode as encode_bcd};
mod registers;
pub use crate::registers::{ControlRegister, SecondsRegister};
mod interface;
mod ds1307;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
