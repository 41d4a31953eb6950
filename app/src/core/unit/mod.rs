mod degree_celsius;
mod kwh;
mod length;
mod percent;
mod pressure;
mod speed;

pub use degree_celsius::DegreeCelsius;
pub use kwh::KiloWattHours;
pub use length::Kilometers;
pub use percent::Percent;
pub use pressure::KiloPascal;
pub use speed::KilometersPerHour;
