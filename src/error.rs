use thiserror::Error;

/// Rejected host setting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown setting `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for setting `{key}`")]
    InvalidChoice { key: String, value: String },
}

/// Host time that cannot be represented as a [`crate::Timestamp`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TimestampError {
    #[error("time {0} s is not a finite number")]
    NotFinite(f64),
    #[error("time {0} s is beyond the supported range")]
    SecsOutOfRange(f64),
    #[error("time {0} ps is beyond the supported range")]
    TicksOutOfRange(u128),
}

/// Parses a host boolean choice (`True`, `off`, `1`, ...).
pub(crate) fn parse_choice_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(SettingsError::InvalidChoice {
            key: key.into(),
            value: value.into(),
        }),
    }
}
