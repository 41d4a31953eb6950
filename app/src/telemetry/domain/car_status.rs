use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
pub enum CarStatus {
    Idle,
    Driving,
    PoweredOff,
    Charging,
    Unknown,
}

//Notification titles sent by the launcher. Checked in order, first hit wins.
const TITLES: [(&str, CarStatus); 4] = [
    ("熄火提醒", CarStatus::PoweredOff),
    ("启动提醒", CarStatus::Driving),
    ("补能提醒", CarStatus::Charging),
    ("能耗提醒", CarStatus::Idle),
];

impl CarStatus {
    //The title may sit anywhere in the heading, e.g. after a line with the car's nickname
    pub fn from_heading(heading: &str) -> Self {
        TITLES
            .iter()
            .find(|(keyword, _)| heading.contains(keyword))
            .map(|(_, status)| *status)
            .unwrap_or(CarStatus::Unknown)
    }
}
