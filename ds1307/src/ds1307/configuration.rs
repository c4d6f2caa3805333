//! Device configuration

use crate::{ControlRegister, Ds1307, Error, Register, SecondsRegister, SqwRate, SquareWave};
use log::debug;

impl<I2C> Ds1307<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Set or clear the clock-halt bit.
    ///
    /// `true` stops the oscillator, `false` starts it. The stored seconds are
    /// kept.
    pub fn set_clock_halt(&mut self, halt: bool) -> Result<(), Error<I2C::Error>> {
        let seconds = self.seconds_register()?;
        debug!("ds1307 clock halt -> {}", halt);
        self.write_register(Register::SECONDS, seconds.with_halted(halt).bits())
    }

    /// Read the clock-halt bit.
    pub fn clock_halt(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.seconds_register()?.halted())
    }

    /// Read whether the oscillator is running.
    pub fn is_running(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(!self.clock_halt()?)
    }

    /// Enable or disable the square-wave output.
    pub fn set_square_wave(&mut self, mode: SquareWave) -> Result<(), Error<I2C::Error>> {
        let enabled = mode == SquareWave::Enabled;
        self.update_control(|control| control.with_square_wave_enabled(enabled))
    }

    /// Read whether the square-wave output is enabled.
    pub fn square_wave(&mut self) -> Result<SquareWave, Error<I2C::Error>> {
        if self.control_register()?.square_wave_enabled() {
            Ok(SquareWave::Enabled)
        } else {
            Ok(SquareWave::Disabled)
        }
    }

    /// Set the square-wave output frequency.
    pub fn set_square_wave_rate(&mut self, rate: SqwRate) -> Result<(), Error<I2C::Error>> {
        self.update_control(|control| control.with_rate(rate))
    }

    /// Read the square-wave output frequency.
    pub fn square_wave_rate(&mut self) -> Result<SqwRate, Error<I2C::Error>> {
        Ok(self.control_register()?.rate())
    }

    /// Set the level of the SQW/OUT pin while the square wave is disabled.
    pub fn set_output_level(&mut self, high: bool) -> Result<(), Error<I2C::Error>> {
        self.update_control(|control| control.with_output_level(high))
    }

    /// Read the level of the SQW/OUT pin while the square wave is disabled.
    pub fn output_level(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.control_register()?.output_level())
    }

    pub(crate) fn seconds_register(&mut self) -> Result<SecondsRegister, Error<I2C::Error>> {
        Ok(SecondsRegister::from_bits(
            self.read_register(Register::SECONDS)?,
        ))
    }

    fn control_register(&mut self) -> Result<ControlRegister, Error<I2C::Error>> {
        Ok(ControlRegister::from_bits(
            self.read_register(Register::CONTROL)?,
        ))
    }

    // Read-modify-write; not atomic with respect to other bus masters.
    fn update_control<F>(&mut self, f: F) -> Result<(), Error<I2C::Error>>
    where
        F: FnOnce(ControlRegister) -> ControlRegister,
    {
        let control = f(self.control_register()?);
        debug!("ds1307 control -> {:#010b}", control.bits());
        self.write_register(Register::CONTROL, control.bits())
    }
}

#[cfg(test)]
mod tests {
    use crate::mock::FakeDs1307;
    use crate::{Ds1307, SqwRate, SquareWave};

    const SECONDS: u8 = 0x00;
    const CONTROL: u8 = 0x07;

    fn rtc_with(address: u8, value: u8) -> Ds1307<FakeDs1307> {
        let mut chip = FakeDs1307::new();
        chip.set_raw(address, value);
        Ds1307::new(chip)
    }

    #[test]
    fn halt_round_trips_and_keeps_seconds() {
        let mut rtc = rtc_with(SECONDS, 0x37);
        rtc.set_clock_halt(true).unwrap();
        assert_eq!(rtc.clock_halt(), Ok(true));
        assert_eq!(rtc.is_running(), Ok(false));
        assert_eq!(rtc.register(SECONDS), Ok(0xB7));

        rtc.set_clock_halt(false).unwrap();
        assert_eq!(rtc.clock_halt(), Ok(false));
        assert_eq!(rtc.register(SECONDS), Ok(0x37));
    }

    #[test]
    fn halt_is_read_from_bit_seven() {
        // bit 6 is the tens-of-seconds digit, not the halt flag
        let mut rtc = rtc_with(SECONDS, 0x40);
        assert_eq!(rtc.clock_halt(), Ok(false));
        let mut rtc = rtc_with(SECONDS, 0x80);
        assert_eq!(rtc.clock_halt(), Ok(true));
    }

    #[test]
    fn rate_changes_only_low_bits() {
        for rate in [
            SqwRate::_1Hz,
            SqwRate::_4_096kHz,
            SqwRate::_8_192kHz,
            SqwRate::_32_768kHz,
        ] {
            let mut rtc = rtc_with(CONTROL, 0b1001_0010);
            rtc.set_square_wave_rate(rate).unwrap();
            let control = rtc.register(CONTROL).unwrap();
            assert_eq!(control & !0b11, 0b1001_0000);
            assert_eq!(rtc.square_wave_rate(), Ok(rate));
        }
    }

    #[test]
    fn enable_survives_rate_change() {
        let mut rtc = rtc_with(CONTROL, 0);
        rtc.set_square_wave(SquareWave::Enabled).unwrap();
        rtc.set_square_wave_rate(SqwRate::_4_096kHz).unwrap();
        assert_eq!(rtc.square_wave(), Ok(SquareWave::Enabled));
        assert_eq!(rtc.register(CONTROL), Ok(0b0001_0001));

        rtc.set_square_wave(SquareWave::Disabled).unwrap();
        assert_eq!(rtc.square_wave(), Ok(SquareWave::Disabled));
        assert_eq!(rtc.square_wave_rate(), Ok(SqwRate::_4_096kHz));
    }

    #[test]
    fn output_level_is_independent() {
        let mut rtc = rtc_with(CONTROL, 0b0001_0011);
        rtc.set_output_level(true).unwrap();
        assert_eq!(rtc.output_level(), Ok(true));
        assert_eq!(rtc.register(CONTROL), Ok(0b1001_0011));
        rtc.set_output_level(false).unwrap();
        assert_eq!(rtc.register(CONTROL), Ok(0b0001_0011));
    }

    #[test]
    fn failed_read_skips_write() {
        let mut rtc = rtc_with(CONTROL, 0);
        let mut chip = rtc.destroy();
        chip.fail_next();
        rtc = Ds1307::new(chip);
        assert!(rtc.set_square_wave(SquareWave::Enabled).is_err());
        assert!(rtc.destroy().writes().is_empty());
    }
}
