mod configuration;
mod datetime;
