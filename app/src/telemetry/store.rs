use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    core::{time::DateTime, timeseries::DataPoint},
    telemetry::domain::{FieldId, FieldValue, TopicClass},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreEntry {
    #[serde(flatten)]
    pub data_point: DataPoint<FieldValue>,
    pub topic_class: TopicClass,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    entries: BTreeMap<FieldId, StoreEntry>,
}

impl StateSnapshot {
    pub fn get(&self, field: FieldId) -> Option<&DataPoint<FieldValue>> {
        self.entries.get(&field).map(|entry| &entry.data_point)
    }
}

//Latest value per field. Fields are never removed once written.
#[derive(Debug, Default)]
pub struct StateStore {
    current: StateSnapshot,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    //Returns the fields whose value differs from the stored one. Timestamps are refreshed either way.
    pub fn apply(
        &mut self,
        class: TopicClass,
        fields: impl IntoIterator<Item = (FieldId, FieldValue)>,
        now: DateTime,
    ) -> Vec<FieldId> {
        let mut changed = vec![];

        for (field, value) in fields {
            if field.producer() != class {
                tracing::error!(
                    "Refusing to write {} from {} messages, it is owned by {}",
                    field,
                    class,
                    field.producer()
                );
                continue;
            }

            let entries = &mut self.current.entries;
            match entries.get_mut(&field) {
                Some(entry) => {
                    if entry.data_point.value != value {
                        changed.push(field);
                    }
                    entry.data_point = DataPoint::new(value, now);
                }
                None => {
                    changed.push(field);
                    entries.insert(
                        field,
                        StoreEntry {
                            data_point: DataPoint::new(value, now),
                            topic_class: class,
                        },
                    );
                }
            }
        }

        changed
    }

    pub fn get(&self, field: FieldId) -> Option<&DataPoint<FieldValue>> {
        self.current.get(field)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::unit::*;

    fn t(iso: &str) -> DateTime {
        DateTime::from_iso(iso).unwrap()
    }

    #[test]
    fn first_write_is_a_change() {
        let mut store = StateStore::new();

        let changed = store.apply(
            TopicClass::RealTimeSoc,
            [(FieldId::SocPercent, FieldValue::Percent(Percent(50.0)))],
            t("2024-05-01T10:00:00Z"),
        );

        assert_eq!(changed, vec![FieldId::SocPercent]);
        assert_eq!(
            store.get(FieldId::SocPercent),
            Some(&DataPoint::new(FieldValue::Percent(Percent(50.0)), t("2024-05-01T10:00:00Z")))
        );
    }

    #[test]
    fn unchanged_value_only_refreshes_timestamp() {
        let mut store = StateStore::new();
        let fields = [(FieldId::FanSpeedLevel, FieldValue::Level(3))];

        store.apply(TopicClass::FanSpeed, fields.clone(), t("2024-05-01T10:00:00Z"));
        let changed = store.apply(TopicClass::FanSpeed, fields, t("2024-05-01T10:05:00Z"));

        assert!(changed.is_empty());
        assert_eq!(
            store.get(FieldId::FanSpeedLevel).map(|dp| dp.timestamp),
            Some(t("2024-05-01T10:05:00Z"))
        );
    }

    #[test]
    fn field_of_other_class_is_refused() {
        let mut store = StateStore::new();

        let changed = store.apply(
            TopicClass::StatusReport,
            [
                (FieldId::SocPercent, FieldValue::Percent(Percent(10.0))),
                (FieldId::OdometerKm, FieldValue::Distance(Kilometers(100.0))),
            ],
            t("2024-05-01T10:00:00Z"),
        );

        assert_eq!(changed, vec![FieldId::OdometerKm]);
        assert_eq!(store.get(FieldId::SocPercent), None);
    }

    #[test]
    fn snapshot_is_detached_copy() {
        let mut store = StateStore::new();
        store.apply(
            TopicClass::VehicleSpeed,
            [(FieldId::VehicleSpeedKmh, FieldValue::Speed(KilometersPerHour(30.0)))],
            t("2024-05-01T10:00:00Z"),
        );

        let before = store.snapshot();
        store.apply(
            TopicClass::VehicleSpeed,
            [(FieldId::VehicleSpeedKmh, FieldValue::Speed(KilometersPerHour(55.0)))],
            t("2024-05-01T10:00:01Z"),
        );

        assert_ne!(before, store.snapshot());
        assert_eq!(
            before.get(FieldId::VehicleSpeedKmh).map(|dp| dp.value.clone()),
            Some(FieldValue::Speed(KilometersPerHour(30.0)))
        );
    }
}
