//! Typed views of the registers that overlay flags on data

use crate::{BitFlags, SqwRate};

/// Seconds register: clock-halt flag in bit 7, BCD seconds in bits 6..0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecondsRegister(u8);

impl SecondsRegister {
    pub const fn from_bits(bits: u8) -> Self {
        SecondsRegister(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Oscillator stopped.
    pub const fn halted(self) -> bool {
        self.0 & BitFlags::CH != 0
    }

    pub const fn with_halted(self, halted: bool) -> Self {
        if halted {
            SecondsRegister(self.0 | BitFlags::CH)
        } else {
            SecondsRegister(self.0 & !BitFlags::CH)
        }
    }

    pub const fn seconds_bcd(self) -> u8 {
        self.0 & !BitFlags::CH
    }

    pub const fn with_seconds_bcd(self, bcd: u8) -> Self {
        SecondsRegister((self.0 & BitFlags::CH) | (bcd & !BitFlags::CH))
    }
}

/// Control register: OUT (bit 7), SQWE (bit 4), RS1..RS0 (bits 1..0).
///
/// Bits without a named field are carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlRegister(u8);

impl ControlRegister {
    pub const fn from_bits(bits: u8) -> Self {
        ControlRegister(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Level driven on SQW/OUT while the square wave is disabled.
    pub const fn output_level(self) -> bool {
        self.0 & BitFlags::OUT != 0
    }

    pub const fn with_output_level(self, high: bool) -> Self {
        ControlRegister(set_flag(self.0, BitFlags::OUT, high))
    }

    pub const fn square_wave_enabled(self) -> bool {
        self.0 & BitFlags::SQWE != 0
    }

    pub const fn with_square_wave_enabled(self, enabled: bool) -> Self {
        ControlRegister(set_flag(self.0, BitFlags::SQWE, enabled))
    }

    pub const fn rate(self) -> SqwRate {
        SqwRate::from_bits(self.0)
    }

    pub const fn with_rate(self, rate: SqwRate) -> Self {
        ControlRegister((self.0 & !BitFlags::RS) | rate.bits())
    }
}

const fn set_flag(bits: u8, mask: u8, on: bool) -> u8 {
    if on {
        bits | mask
    } else {
        bits & !mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halt_flag_keeps_seconds() {
        let reg = SecondsRegister::from_bits(0x45);
        assert!(!reg.halted());
        let halted = reg.with_halted(true);
        assert_eq!(halted.bits(), 0xC5);
        assert_eq!(halted.seconds_bcd(), 0x45);
        assert_eq!(halted.with_halted(false).bits(), 0x45);
    }

    #[test]
    fn seconds_keep_halt_flag() {
        let reg = SecondsRegister::from_bits(0x80).with_seconds_bcd(0x59);
        assert!(reg.halted());
        assert_eq!(reg.seconds_bcd(), 0x59);
    }

    #[test]
    fn rate_only_touches_low_bits() {
        let reg = ControlRegister::from_bits(0b1111_1100);
        assert_eq!(reg.with_rate(SqwRate::_8_192kHz).bits(), 0b1111_1110);
        assert_eq!(
            ControlRegister::from_bits(0b0001_0011)
                .with_rate(SqwRate::_1Hz)
                .bits(),
            0b0001_0000
        );
    }

    #[test]
    fn enable_and_level_are_independent_of_rate() {
        let reg = ControlRegister::default()
            .with_rate(SqwRate::_32_768kHz)
            .with_square_wave_enabled(true)
            .with_output_level(true);
        assert_eq!(reg.bits(), 0b1001_0011);
        assert_eq!(reg.rate(), SqwRate::_32_768kHz);
        let reg = reg.with_square_wave_enabled(false);
        assert!(reg.output_level());
        assert_eq!(reg.rate(), SqwRate::_32_768kHz);
    }
}
