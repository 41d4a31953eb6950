use crate::core::unit::KiloWattHours;

use super::ConfigError;

pub fn non_empty(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Empty { key });
    }

    Ok(value.to_string())
}

pub fn topic(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = non_empty(key, value)?;

    if value.contains(['+', '#']) {
        return Err(ConfigError::Wildcard { key, value });
    }

    Ok(value)
}

//Trailing separators are dropped, a leading one is part of the topic
pub fn base_topic(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = topic(key, value)?;
    non_empty(key, value.trim_end_matches('/'))
}

pub fn capacity(value: f64) -> Result<KiloWattHours, ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidCapacity { value });
    }

    Ok(KiloWattHours(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_topic_is_normalised() {
        assert_eq!(base_topic("subscribe_topic", "/dolphinc/"), Ok("/dolphinc".to_string()));
        assert_eq!(base_topic("subscribe_topic", " car/one "), Ok("car/one".to_string()));
        assert_eq!(
            base_topic("subscribe_topic", "/"),
            Err(ConfigError::Empty { key: "subscribe_topic" })
        );
    }

    #[test]
    fn wildcards_are_rejected() {
        assert!(matches!(topic("command_topic", "cars/+/cmd"), Err(ConfigError::Wildcard { .. })));
        assert!(matches!(base_topic("subscribe_topic", "cars/#"), Err(ConfigError::Wildcard { .. })));
    }

    #[test]
    fn capacity_must_be_positive() {
        assert_eq!(capacity(60.48), Ok(KiloWattHours(60.48)));
        assert_eq!(capacity(0.0), Err(ConfigError::InvalidCapacity { value: 0.0 }));
        assert!(capacity(-1.0).is_err());
        assert!(capacity(f64::INFINITY).is_err());
        assert!(capacity(f64::NAN).is_err());
    }
}
