use crate::core::unit::Percent;

use super::{DecodeError, parse_number};

//Out-of-range values are kept as sent, clamping happens during derivation
pub fn decode(text: &str) -> Result<Percent, DecodeError> {
    parse_number(text).map(Percent)
}
