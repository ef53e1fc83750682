//! `#[serde(with = "serde_duration")]` for `Duration` fields stored as
//! whole milliseconds, the unit the settings and config files use.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    // Saturates; no realistic countdown comes near u64::MAX ms.
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Window {
        #[serde(with = "super")]
        think: Duration,
    }

    #[test]
    fn test_millis_on_the_wire() {
        let json = serde_json::to_string(&Window {
            think: Duration::from_millis(1500),
        })
        .unwrap();
        assert_eq!(json, r#"{"think":1500}"#);

        let back: Window = serde_json::from_str(r#"{"think":350}"#).unwrap();
        assert_eq!(back.think, Duration::from_millis(350));
    }
}
