//! Business records persisted in the entity-set files.

pub mod order;
pub mod product;
pub mod transaction;

pub use order::*;
pub use product::*;
pub use transaction::*;

use std::sync::{Mutex, PoisonError};

use chrono::{Local, NaiveDateTime, SubsecRound};

/// Placeholder used by reports when a join target is missing.
pub const MISSING: &str = "-";

/// Current local time at the precision the files store (microseconds).
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}

/// Returns an id generator producing `<prefix><%Y%m%d%H%M%S>`.
///
/// Ids generated within the same second get a `-N` suffix so they stay unique
/// inside one process.
pub fn timestamp_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let last = Mutex::new((String::new(), 0u32));
    move || {
        let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();
        let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
        if last.0 == stamp {
            last.1 += 1;
            format!("{}{}-{}", prefix, stamp, last.1)
        } else {
            *last = (stamp.clone(), 0);
            format!("{}{}", prefix, stamp)
        }
    }
}

/// ISO-8601 local timestamps (`2024-05-01T09:30:00.000000`).
pub(crate) mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim()
            .parse::<NaiveDateTime>()
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
    }
}
