use std::sync::LazyLock;

use chrono::{FixedOffset, NaiveDateTime};
use regex::Regex;

use crate::{
    core::{time::DateTime, unit::*},
    telemetry::domain::{CarStatus, ChargeSession, StatusReport, WindowState},
};

use super::DecodeError;

const ODOMETER: &str = "总里程(km)";
const REMAINING_RANGE: &str = "电量剩余里程(km)";
const TIRE_PRESSURES: &str = "各项胎压(kpa)";
const TIRE_TEMPERATURES: &str = "轮胎温度(℃)";
const AMBIENT_TEMPERATURE: &str = "车外温度";

const BATTERY: &str = "电量(%)";
const BATTERY_ENERGY: &str = "电量(kwh)";
const BATTERY_HEALTH: &str = "电池健康";
const CONSUMPTION_LAST_50KM: &str = "近50KM电耗(kWh)";
const WINDOWS: &str = "车窗状态";
const DETECTED_AT: &str = "检测时间";
const LAST_CHARGED_AT: &str = "充能时间";
const CHARGE_START: &str = "起始电量(%)";
const CHARGE_END: &str = "结束电量(%)";
const CHARGED: &str = "充电量(%)";
const CHARGED_ENERGY: &str = "充电量(kWh)";
const CHARGED_RANGE: &str = "充电里程(km)";

const WHEEL_POSITIONS: [&str; 4] = ["左前", "右前", "左后", "右后"];
const SUNROOF: &str = "天窗";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SOURCE_UTC_OFFSET_SECS: i32 = 8 * 3600;

//Full-width colon terminates a label, values follow up to the end of the line
static LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([^\s：]+)：").expect("label pattern is valid"));

pub fn decode(text: &str) -> Result<StatusReport, DecodeError> {
    let labels = Labels::scan(text);
    //everything before the first label, may span several lines
    let heading = LABEL.find(text).map(|m| &text[..m.start()]).unwrap_or(text);

    Ok(StatusReport {
        status: CarStatus::from_heading(heading),
        odometer: Kilometers(labels.required(ODOMETER).and_then(|v| number(ODOMETER, v))?),
        remaining_range: Kilometers(labels.required(REMAINING_RANGE).and_then(|v| number(REMAINING_RANGE, v))?),
        tire_pressures: labels
            .required(TIRE_PRESSURES)
            .and_then(|v| per_wheel(TIRE_PRESSURES, v))?
            .map(KiloPascal),
        tire_temperatures: labels
            .required(TIRE_TEMPERATURES)
            .and_then(|v| per_wheel(TIRE_TEMPERATURES, v))?
            .map(DegreeCelsius),
        ambient_temperature: DegreeCelsius(
            labels
                .required(AMBIENT_TEMPERATURE)
                .and_then(|v| number(AMBIENT_TEMPERATURE, v))?,
        ),
        battery: labels.optional(BATTERY, number)?.map(Percent),
        battery_energy: labels.optional(BATTERY_ENERGY, number)?.map(KiloWattHours),
        battery_health: labels.optional(BATTERY_HEALTH, number)?.map(Percent),
        consumption_last_50km: labels.optional(CONSUMPTION_LAST_50KM, number)?.map(KiloWattHours),
        windows: labels.optional(WINDOWS, windows)?,
        detected_at: labels.optional(DETECTED_AT, timestamp)?,
        last_charged_at: labels.optional(LAST_CHARGED_AT, timestamp)?,
        charge: ChargeSession {
            start: labels.optional(CHARGE_START, number)?.map(Percent),
            end: labels.optional(CHARGE_END, number)?.map(Percent),
            charged: labels.optional(CHARGED, number)?.map(Percent),
            charged_energy: labels.optional(CHARGED_ENERGY, number)?.map(KiloWattHours),
            charged_range: labels.optional(CHARGED_RANGE, number)?.map(Kilometers),
        },
    })
}

struct Labels<'a> {
    //label and the remainder of its line, in order of appearance
    entries: Vec<(&'a str, &'a str)>,
}

impl<'a> Labels<'a> {
    fn scan(text: &'a str) -> Self {
        let entries = LABEL
            .captures_iter(text)
            .filter_map(|caps| {
                let label = caps.get(1)?;
                let whole = caps.get(0)?;
                let rest = text[whole.end()..].lines().next().unwrap_or_default();
                Some((label.as_str(), rest))
            })
            .collect();

        Self { entries }
    }

    fn get(&self, label: &str) -> Option<&'a str> {
        self.entries.iter().find(|(l, _)| *l == label).map(|(_, rest)| *rest)
    }

    fn required(&self, label: &'static str) -> Result<&'a str, DecodeError> {
        self.get(label).ok_or(DecodeError::MissingLabel { label })
    }

    //absent is fine, present but malformed is not
    fn optional<T>(
        &self,
        label: &'static str,
        parse: impl FnOnce(&'static str, &'a str) -> Result<T, DecodeError>,
    ) -> Result<Option<T>, DecodeError> {
        self.get(label).map(|rest| parse(label, rest)).transpose()
    }
}

fn first_token(rest: &str) -> &str {
    rest.split_whitespace().next().unwrap_or_default()
}

fn invalid(label: &'static str, value: &str) -> DecodeError {
    DecodeError::InvalidValue {
        label,
        value: value.trim().to_string(),
    }
}

//A number optionally followed by its unit, e.g. 25℃ or 98%
fn number(label: &'static str, rest: &str) -> Result<f64, DecodeError> {
    let token = first_token(rest);
    let split = token
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(token.len());
    let (digits, unit) = token.split_at(split);

    if unit.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid(label, token));
    }

    digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(label, token))
}

fn per_wheel(label: &'static str, rest: &str) -> Result<[f64; 4], DecodeError> {
    let positions = Labels::scan(rest);
    let mut values = [0.0; 4];

    for (value, position) in values.iter_mut().zip(WHEEL_POSITIONS) {
        let position_rest = positions.get(position).ok_or_else(|| invalid(label, rest))?;
        *value = number(label, position_rest)?;
    }

    Ok(values)
}

fn windows(label: &'static str, rest: &str) -> Result<WindowState, DecodeError> {
    let positions = Labels::scan(rest);
    let is_open = |position: &str| -> Result<bool, DecodeError> {
        match positions.get(position).map(first_token) {
            Some("0") => Ok(false),
            Some("1") => Ok(true),
            _ => Err(invalid(label, rest)),
        }
    };

    let mut windows_open = [false; 4];
    for (open, position) in windows_open.iter_mut().zip(WHEEL_POSITIONS) {
        *open = is_open(position)?;
    }

    Ok(WindowState {
        windows_open,
        sunroof_open: is_open(SUNROOF)?,
    })
}

fn timestamp(label: &'static str, rest: &str) -> Result<DateTime, DecodeError> {
    let value = rest.split_whitespace().take(2).collect::<Vec<_>>().join(" ");

    let naive = NaiveDateTime::parse_from_str(&value, TIMESTAMP_FORMAT).map_err(|_| invalid(label, rest))?;
    let zone = FixedOffset::east_opt(SOURCE_UTC_OFFSET_SECS).ok_or_else(|| invalid(label, rest))?;

    DateTime::from_naive_in_zone(naive, zone).ok_or_else(|| invalid(label, rest))
}
