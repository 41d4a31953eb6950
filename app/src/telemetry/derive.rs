use crate::{
    core::unit::{KiloWattHours, Percent},
    telemetry::domain::{FieldId, FieldValue, RawReading, StatusReport},
};

pub type DerivedFields = Vec<(FieldId, FieldValue)>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivationConfig {
    pub max_battery_capacity: KiloWattHours,
}

//Stateless, so deriving the same reading twice yields the same fields
pub fn derive(reading: &RawReading, config: &DerivationConfig) -> DerivedFields {
    match reading {
        RawReading::Soc(soc) => soc_fields(*soc, config),
        RawReading::StatusReport(report) => report_fields(report),
        RawReading::VehicleSpeed(speed) => vec![(FieldId::VehicleSpeedKmh, (*speed).into())],
        RawReading::AcTemperature(temperature) => vec![(FieldId::AcTemperatureC, (*temperature).into())],
        RawReading::FanSpeed(level) => vec![(FieldId::FanSpeedLevel, FieldValue::Level(*level))],
        RawReading::DriverVent(level) => vec![(FieldId::DriverVentLevel, FieldValue::Level(*level))],
        RawReading::PassengerVent(level) => vec![(FieldId::PassengerVentLevel, FieldValue::Level(*level))],
        RawReading::SunroofPosition(position) => vec![(
            FieldId::SunroofPositionPercent,
            Percent(f64::from(*position)).into(),
        )],
    }
}

fn soc_fields(soc: Percent, config: &DerivationConfig) -> DerivedFields {
    if !soc.is_in_range() {
        tracing::warn!("State of charge {} outside of 0..100, clamping for energy calculation", soc);
    }

    let energy = config.max_battery_capacity * soc.clamp();

    vec![
        (FieldId::SocPercent, soc.into()),
        (FieldId::BatteryEnergyKwh, energy.into()),
    ]
}

fn report_fields(report: &StatusReport) -> DerivedFields {
    let mut fields: DerivedFields = vec![
        (FieldId::CarStatus, report.status.into()),
        (FieldId::OdometerKm, report.odometer.into()),
        (FieldId::RemainingRangeKm, report.remaining_range.into()),
        (FieldId::AmbientTemperatureC, report.ambient_temperature.into()),
    ];

    fields.extend(FieldId::TIRE_PRESSURES.into_iter().zip(report.tire_pressures.map(FieldValue::from)));
    fields.extend(FieldId::TIRE_TEMPERATURES.into_iter().zip(report.tire_temperatures.map(FieldValue::from)));

    let optional: [(FieldId, Option<FieldValue>); 11] = [
        (FieldId::ReportBatteryPercent, report.battery.map(Into::into)),
        (FieldId::ReportBatteryEnergyKwh, report.battery_energy.map(Into::into)),
        (FieldId::BatteryHealthPercent, report.battery_health.map(Into::into)),
        (FieldId::ConsumptionLast50KmKwh, report.consumption_last_50km.map(Into::into)),
        (FieldId::DetectedAt, report.detected_at.map(Into::into)),
        (FieldId::LastChargedAt, report.last_charged_at.map(Into::into)),
        (FieldId::ChargeStartPercent, report.charge.start.map(Into::into)),
        (FieldId::ChargeEndPercent, report.charge.end.map(Into::into)),
        (FieldId::ChargedPercent, report.charge.charged.map(Into::into)),
        (FieldId::ChargedEnergyKwh, report.charge.charged_energy.map(Into::into)),
        (FieldId::ChargedRangeKm, report.charge.charged_range.map(Into::into)),
    ];
    fields.extend(optional.into_iter().filter_map(|(id, value)| value.map(|v| (id, v))));

    if let Some(windows) = &report.windows {
        fields.extend(
            FieldId::WINDOWS
                .into_iter()
                .zip(windows.windows_open.map(FieldValue::Open)),
        );
        fields.push((FieldId::SunroofOpen, FieldValue::Open(windows.sunroof_open)));
    }

    fields
}
