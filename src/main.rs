use chrono::{Local, NaiveDateTime};
use ds1307::{DateTimeAccess, Ds1307, SquareWave};
use log::*;
use rppal::i2c::I2c;

mod config;
use config::Config;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;

    // I2C bus shared with nothing else; the driver owns it from here on.
    let i2c = I2c::with_bus(config.get_bus())?;
    if let Err(e) = i2c.set_timeout(config.get_timeout_ms()) {
        warn!("Bus timeout not set, using driver default: {:?}", e);
    }
    info!("Opened I2C bus {}", config.get_bus());

    let mut rtc = Ds1307::init(i2c)?;
    info!("DS1307 oscillator started");

    let now = config
        .clock
        .sync_from_system
        .then(|| Local::now().naive_local());
    configure(&mut rtc, &config, now)?;
    report(&mut rtc)?;
    Ok(())
}

/// Apply the configuration to the chip, optionally setting the time.
fn configure<I2C>(
    rtc: &mut Ds1307<I2C>,
    config: &Config,
    now: Option<NaiveDateTime>,
) -> anyhow::Result<()>
where
    I2C: embedded_hal::i2c::I2c,
    I2C::Error: Send + Sync + 'static,
{
    if let Some(now) = now {
        rtc.set_datetime(&now)?;
        let (hours, minutes) = config.get_timezone_offset();
        rtc.set_utc_offset(hours, minutes)?;
        info!("Clock set to {} (UTC offset {:+}:{:02})", now, hours, minutes);
    }

    rtc.set_output_level(config.square_wave.idle_level_high)?;
    rtc.set_square_wave_rate(config.get_square_wave_rate()?)?;
    let mode = if config.square_wave.enabled {
        SquareWave::Enabled
    } else {
        SquareWave::Disabled
    };
    rtc.set_square_wave(mode)?;
    debug!("Square wave {:?} at {} Hz", mode, config.square_wave.rate_hz);
    Ok(())
}

/// Log what the chip currently holds.
fn report<I2C>(rtc: &mut Ds1307<I2C>) -> anyhow::Result<()>
where
    I2C: embedded_hal::i2c::I2c,
    I2C::Error: Send + Sync + 'static,
{
    match rtc.datetime() {
        Ok(datetime) => info!("{}", datetime.format("%d/%m/%Y %H:%M:%S")),
        Err(ds1307::Error::InvalidDeviceState) => {
            warn!("RTC holds no valid date, enable sync_from_system to set it")
        }
        Err(e) => return Err(e.into()),
    }
    let (hours, minutes) = rtc.utc_offset()?;
    info!("Stored UTC offset: {:+}:{:02}", hours, minutes);
    info!("Clock halted: {}", rtc.clock_halt()?);
    info!("RAM byte: {:#04x}", rtc.ram_byte()?);
    Ok(())
}
