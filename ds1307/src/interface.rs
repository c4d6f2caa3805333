//! Construction and single-register bus transactions

use crate::{Ds1307, Error, Register, DEVICE_ADDRESS};
use log::trace;

impl<I2C> Ds1307<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Create a new instance without touching the device.
    pub fn new(i2c: I2C) -> Self {
        Ds1307 { i2c }
    }

    /// Create a new instance and start the oscillator.
    ///
    /// The stored time is kept, only the clock-halt bit is cleared.
    pub fn init(i2c: I2C) -> Result<Self, Error<I2C::Error>> {
        let mut rtc = Ds1307::new(i2c);
        rtc.set_clock_halt(false)?;
        Ok(rtc)
    }

    /// Destroy driver instance, return I²C bus instance.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Read the raw byte at any address of the chip (0x00..=0x3F).
    pub fn register(&mut self, address: u8) -> Result<u8, Error<I2C::Error>> {
        check_address(address)?;
        self.read_register(address)
    }

    /// Write a raw byte at any address of the chip (0x00..=0x3F).
    ///
    /// No encoding is applied; see [`encode_bcd`](crate::encode_bcd).
    pub fn set_register(&mut self, address: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        check_address(address)?;
        self.write_register(address, value)
    }

    pub(crate) fn write_register(&mut self, register: u8, data: u8) -> Result<(), Error<I2C::Error>> {
        trace!("ds1307 write {:#04x} <- {:#04x}", register, data);
        let payload: [u8; 2] = [register, data];
        self.i2c
            .write(DEVICE_ADDRESS, &payload)
            .map_err(Error::Comm)
    }

    pub(crate) fn read_register(&mut self, register: u8) -> Result<u8, Error<I2C::Error>> {
        let mut data = [0];
        self.i2c
            .write_read(DEVICE_ADDRESS, &[register], &mut data)
            .map_err(Error::Comm)?;
        trace!("ds1307 read {:#04x} -> {:#04x}", register, data[0]);
        Ok(data[0])
    }

    /// Write consecutive registers; `payload[0]` is the first register address.
    pub(crate) fn write_data(&mut self, payload: &[u8]) -> Result<(), Error<I2C::Error>> {
        trace!("ds1307 write {:02x?}", payload);
        self.i2c
            .write(DEVICE_ADDRESS, payload)
            .map_err(Error::Comm)
    }

    /// Read consecutive registers starting at `register`.
    pub(crate) fn read_data(&mut self, register: u8, data: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write_read(DEVICE_ADDRESS, &[register], data)
            .map_err(Error::Comm)?;
        trace!("ds1307 read {:#04x}.. -> {:02x?}", register, data);
        Ok(())
    }
}

fn check_address<E>(address: u8) -> Result<(), Error<E>> {
    if address > Register::LAST {
        return Err(Error::InvalidInputData);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::mock::FakeDs1307;
    use crate::{Ds1307, Error};

    #[test]
    fn init_starts_oscillator_and_keeps_seconds() {
        let mut chip = FakeDs1307::new();
        chip.set_raw(0x00, 0x80 | 0x42);
        let rtc = Ds1307::init(chip).unwrap();
        let chip = rtc.destroy();
        assert_eq!(chip.raw(0x00), 0x42);
    }

    #[test]
    fn write_register_sends_address_then_value() {
        let mut rtc = Ds1307::new(FakeDs1307::new());
        rtc.set_register(0x11, 0xAB).unwrap();
        let chip = rtc.destroy();
        assert_eq!(chip.raw(0x11), 0xAB);
        assert_eq!(chip.writes(), &[(0x11, 0xAB)]);
    }

    #[test]
    fn read_register_returns_stored_byte() {
        let mut chip = FakeDs1307::new();
        chip.set_raw(0x3F, 0x5A);
        let mut rtc = Ds1307::new(chip);
        assert_eq!(rtc.register(0x3F), Ok(0x5A));
    }

    #[test]
    fn address_outside_chip_is_rejected_without_traffic() {
        let mut rtc = Ds1307::new(FakeDs1307::new());
        assert_eq!(rtc.register(0x40), Err(Error::InvalidInputData));
        assert_eq!(rtc.set_register(0xFF, 0), Err(Error::InvalidInputData));
        assert_eq!(rtc.destroy().transactions(), 0);
    }

    #[test]
    fn bus_failure_is_reported() {
        let mut chip = FakeDs1307::new();
        chip.fail_next();
        let mut rtc = Ds1307::new(chip);
        assert!(matches!(rtc.register(0x00), Err(Error::Comm(_))));
        // only the next transaction fails
        assert_eq!(rtc.register(0x00), Ok(0));
    }

    #[test]
    fn init_reports_bus_failure() {
        let mut chip = FakeDs1307::new();
        chip.fail_next();
        assert!(matches!(Ds1307::init(chip), Err(Error::Comm(_))));
    }
}
