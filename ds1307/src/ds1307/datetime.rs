//! Calendar fields, UTC offset and the `rtcc` traits
//!
//! Every setter checks its range before touching the bus and returns
//! [`Error::InvalidInputData`] on a value the register cannot hold.

use crate::bcd::{decode, encode};
use crate::{
    BitFlags, DateTimeAccess, Datelike, Ds1307, Error, Hours, NaiveDate, NaiveDateTime,
    NaiveTime, Register, Rtcc, Timelike,
};

const MIN_YEAR: u16 = 2000;
const MAX_YEAR: u16 = 2099;

impl<I2C> Ds1307<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Read the seconds (0-59), without the clock-halt bit.
    pub fn second(&mut self) -> Result<u8, Error<I2C::Error>> {
        Ok(decode(self.seconds_register()?.seconds_bcd()))
    }

    /// Read the minutes (0-59).
    pub fn minute(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_bcd(Register::MINUTES)
    }

    /// Read the hours in 24-hour form (0-23).
    pub fn hour(&mut self) -> Result<u8, Error<I2C::Error>> {
        let data = self.read_register(Register::HOURS)?;
        Ok(decode(data & BitFlags::HOURS_24))
    }

    /// Read the day of the week (0-6, days since Sunday).
    pub fn day_of_week(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_bcd(Register::DOW)
    }

    /// Read the day of the month (1-31).
    pub fn day_of_month(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_bcd(Register::DATE)
    }

    /// Read the month (1-12).
    pub fn month(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_bcd(Register::MONTH)
    }

    /// Read the year: two BCD digits plus 100 times the stored century.
    pub fn year(&mut self) -> Result<u16, Error<I2C::Error>> {
        let low = self.read_bcd(Register::YEAR)?;
        let century = self.read_register(Register::CENTURY)?;
        Ok(u16::from(low) + 100 * u16::from(century))
    }

    /// Set the seconds (0-59), keeping the clock-halt bit as it is.
    pub fn set_second(&mut self, second: u8) -> Result<(), Error<I2C::Error>> {
        check_range(second, 0, 59)?;
        let seconds = self.seconds_register()?.with_seconds_bcd(encode(second));
        self.write_register(Register::SECONDS, seconds.bits())
    }

    /// Set the minutes (0-59).
    pub fn set_minute(&mut self, minute: u8) -> Result<(), Error<I2C::Error>> {
        check_range(minute, 0, 59)?;
        self.write_register(Register::MINUTES, encode(minute))
    }

    /// Set the hours (0-23). The register is switched to 24-hour mode.
    pub fn set_hour(&mut self, hour: u8) -> Result<(), Error<I2C::Error>> {
        check_range(hour, 0, 23)?;
        self.write_register(Register::HOURS, encode(hour) & !BitFlags::H24_H12)
    }

    /// Set the day of the week (0-6, days since Sunday).
    pub fn set_day_of_week(&mut self, day_of_week: u8) -> Result<(), Error<I2C::Error>> {
        check_range(day_of_week, 0, 6)?;
        self.write_register(Register::DOW, encode(day_of_week))
    }

    /// Set the day of the month (1-31).
    pub fn set_day_of_month(&mut self, day: u8) -> Result<(), Error<I2C::Error>> {
        check_range(day, 1, 31)?;
        self.write_register(Register::DATE, encode(day))
    }

    /// Set the month (1-12).
    pub fn set_month(&mut self, month: u8) -> Result<(), Error<I2C::Error>> {
        check_range(month, 1, 12)?;
        self.write_register(Register::MONTH, encode(month))
    }

    /// Set the year (2000-2099), writing both the year and century registers.
    pub fn set_year(&mut self, year: u16) -> Result<(), Error<I2C::Error>> {
        let (low, century) = split_year(year)?;
        self.write_register(Register::CENTURY, century)?;
        self.write_register(Register::YEAR, encode(low))
    }

    /// Read the stored UTC offset as `(hours, minutes)`.
    ///
    /// The offset is an annotation kept in RAM; the chip never applies it.
    pub fn utc_offset(&mut self) -> Result<(i8, u8), Error<I2C::Error>> {
        Ok((self.utc_offset_hour()?, self.utc_offset_minute()?))
    }

    /// Read the hour part of the stored UTC offset (-12 to 12).
    pub fn utc_offset_hour(&mut self) -> Result<i8, Error<I2C::Error>> {
        Ok(self.read_register(Register::UTC_HOUR)? as i8)
    }

    /// Read the minute part of the stored UTC offset (0-59).
    pub fn utc_offset_minute(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register(Register::UTC_MINUTE)
    }

    /// Store a UTC offset of `hour` (-12 to 12) hours and `minute` (0-59) minutes.
    pub fn set_utc_offset(&mut self, hour: i8, minute: u8) -> Result<(), Error<I2C::Error>> {
        if !(-12..=12).contains(&hour) || minute > 59 {
            return Err(Error::InvalidInputData);
        }
        self.write_register(Register::UTC_HOUR, hour as u8)?;
        self.write_register(Register::UTC_MINUTE, minute)
    }

    /// Read the free-form RAM byte.
    pub fn ram_byte(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register(Register::RAM)
    }

    /// Write the free-form RAM byte. Stored as given, without encoding.
    pub fn set_ram_byte(&mut self, value: u8) -> Result<(), Error<I2C::Error>> {
        self.write_register(Register::RAM, value)
    }

    fn read_bcd(&mut self, register: u8) -> Result<u8, Error<I2C::Error>> {
        Ok(decode(self.read_register(register)?))
    }

    fn write_date(&mut self, date: &NaiveDate) -> Result<(), Error<I2C::Error>> {
        let year = u16::try_from(date.year()).map_err(|_| Error::InvalidInputData)?;
        let (low, century) = split_year(year)?;
        let payload = [
            Register::DOW,
            encode(date.weekday().num_days_from_sunday() as u8),
            encode(date.day() as u8),
            encode(date.month() as u8),
            encode(low),
        ];
        self.write_register(Register::CENTURY, century)?;
        self.write_data(&payload)
    }

    fn write_time(&mut self, time: &NaiveTime) -> Result<(), Error<I2C::Error>> {
        let seconds = self
            .seconds_register()?
            .with_seconds_bcd(encode(time.second() as u8));
        let payload = [
            Register::SECONDS,
            seconds.bits(),
            encode(time.minute() as u8),
            encode(time.hour() as u8),
        ];
        self.write_data(&payload)
    }
}

fn check_range<E>(value: u8, min: u8, max: u8) -> Result<(), Error<E>> {
    if value < min || value > max {
        return Err(Error::InvalidInputData);
    }
    Ok(())
}

/// Split a year into its two low digits and its century.
fn split_year<E>(year: u16) -> Result<(u8, u8), Error<E>> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(Error::InvalidInputData);
    }
    Ok(((year % 100) as u8, (year / 100) as u8))
}

fn hours_to_h24<E>(hours: Hours) -> Result<u8, Error<E>> {
    match hours {
        Hours::H24(h) if h < 24 => Ok(h),
        Hours::AM(h) if (1..=12).contains(&h) => Ok(h % 12),
        Hours::PM(h) if (1..=12).contains(&h) => Ok(h % 12 + 12),
        _ => Err(Error::InvalidInputData),
    }
}

fn hours_from_register<E>(data: u8) -> Result<Hours, Error<E>> {
    let hours = if data & BitFlags::H24_H12 != 0 {
        let h = decode(data & BitFlags::HOURS_12);
        if !(1..=12).contains(&h) {
            return Err(Error::InvalidDeviceState);
        }
        if data & BitFlags::AM_PM != 0 {
            Hours::PM(h)
        } else {
            Hours::AM(h)
        }
    } else {
        let h = decode(data & BitFlags::HOURS_24);
        if h > 23 {
            return Err(Error::InvalidDeviceState);
        }
        Hours::H24(h)
    };
    Ok(hours)
}

impl<I2C> DateTimeAccess for Ds1307<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Error = Error<I2C::Error>;

    fn datetime(&mut self) -> Result<NaiveDateTime, Self::Error> {
        let mut data = [0; 7];
        self.read_data(Register::SECONDS, &mut data)?;
        let century = self.read_register(Register::CENTURY)?;

        let year = u16::from(decode(data[6])) + 100 * u16::from(century);
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::InvalidDeviceState);
        }
        let date = NaiveDate::from_ymd_opt(
            i32::from(year),
            u32::from(decode(data[5])),
            u32::from(decode(data[4])),
        );
        let time = NaiveTime::from_hms_opt(
            u32::from(decode(data[2] & BitFlags::HOURS_24)),
            u32::from(decode(data[1])),
            u32::from(decode(data[0] & !BitFlags::CH)),
        );
        match (date, time) {
            (Some(date), Some(time)) => Ok(date.and_time(time)),
            _ => Err(Error::InvalidDeviceState),
        }
    }

    fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), Self::Error> {
        // Check the date first so nothing is written for an unsupported year.
        let year = u16::try_from(datetime.year()).map_err(|_| Error::InvalidInputData)?;
        split_year::<I2C::Error>(year)?;
        self.write_time(&datetime.time())?;
        self.write_date(&datetime.date())
    }
}

impl<I2C> Rtcc for Ds1307<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn seconds(&mut self) -> Result<u8, Self::Error> {
        self.second()
    }

    fn minutes(&mut self) -> Result<u8, Self::Error> {
        self.minute()
    }

    /// 24-hour form, unless another tool left the register in 12-hour mode.
    fn hours(&mut self) -> Result<Hours, Self::Error> {
        let data = self.read_register(Register::HOURS)?;
        hours_from_register(data)
    }

    fn time(&mut self) -> Result<NaiveTime, Self::Error> {
        let mut data = [0; 3];
        self.read_data(Register::SECONDS, &mut data)?;
        NaiveTime::from_hms_opt(
            u32::from(decode(data[2] & BitFlags::HOURS_24)),
            u32::from(decode(data[1])),
            u32::from(decode(data[0] & !BitFlags::CH)),
        )
        .ok_or(Error::InvalidDeviceState)
    }

    /// Day of the week, 1-7 with 1 = Sunday.
    fn weekday(&mut self) -> Result<u8, Self::Error> {
        Ok(self.day_of_week()? + 1)
    }

    fn day(&mut self) -> Result<u8, Self::Error> {
        self.day_of_month()
    }

    fn month(&mut self) -> Result<u8, Self::Error> {
        Ds1307::month(self)
    }

    fn year(&mut self) -> Result<u16, Self::Error> {
        Ds1307::year(self)
    }

    fn date(&mut self) -> Result<NaiveDate, Self::Error> {
        let mut data = [0; 3];
        self.read_data(Register::DATE, &mut data)?;
        let century = self.read_register(Register::CENTURY)?;
        let year = u16::from(decode(data[2])) + 100 * u16::from(century);
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::InvalidDeviceState);
        }
        NaiveDate::from_ymd_opt(
            i32::from(year),
            u32::from(decode(data[1])),
            u32::from(decode(data[0])),
        )
        .ok_or(Error::InvalidDeviceState)
    }

    fn set_seconds(&mut self, seconds: u8) -> Result<(), Self::Error> {
        self.set_second(seconds)
    }

    fn set_minutes(&mut self, minutes: u8) -> Result<(), Self::Error> {
        self.set_minute(minutes)
    }

    fn set_hours(&mut self, hours: Hours) -> Result<(), Self::Error> {
        let hour = hours_to_h24(hours)?;
        self.set_hour(hour)
    }

    fn set_time(&mut self, time: &NaiveTime) -> Result<(), Self::Error> {
        self.write_time(time)
    }

    /// Day of the week, 1-7 with 1 = Sunday.
    fn set_weekday(&mut self, weekday: u8) -> Result<(), Self::Error> {
        check_range(weekday, 1, 7)?;
        self.set_day_of_week(weekday - 1)
    }

    fn set_day(&mut self, day: u8) -> Result<(), Self::Error> {
        self.set_day_of_month(day)
    }

    fn set_month(&mut self, month: u8) -> Result<(), Self::Error> {
        Ds1307::set_month(self, month)
    }

    fn set_year(&mut self, year: u16) -> Result<(), Self::Error> {
        Ds1307::set_year(self, year)
    }

    fn set_date(&mut self, date: &NaiveDate) -> Result<(), Self::Error> {
        self.write_date(date)
    }
}
