//! Writer configuration.
//!
//! Settings can be built in code or deserialized from any serde format:
//!
//! ```
//! use jtree_core::{DateTimeZoneHandling, WriterSettings};
//!
//! let settings: WriterSettings =
//!     serde_json::from_str(r#"{"date_time_zone_handling":"utc"}"#).unwrap();
//! assert_eq!(settings.date_time_zone_handling, DateTimeZoneHandling::Utc);
//! ```

use crate::value::DateTimeValue;
use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Policy applied to `Date` values before they are stored in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateTimeZoneHandling {
    /// Convert to local time. Zoneless values are taken as local wall-clock time.
    Local,
    /// Convert to UTC. Zoneless values are taken as UTC wall-clock time.
    Utc,
    /// Drop the zone and keep the wall-clock time.
    Unspecified,
    /// Store the value exactly as written.
    #[default]
    RoundtripKind,
}

impl DateTimeZoneHandling {
    /// Normalize a date according to this policy.
    pub fn apply(self, value: DateTimeValue) -> DateTimeValue {
        match (self, value) {
            (DateTimeZoneHandling::RoundtripKind, v) => v,

            (DateTimeZoneHandling::Local, DateTimeValue::Utc(dt)) => {
                DateTimeValue::Local(dt.with_timezone(&Local))
            }
            (DateTimeZoneHandling::Local, DateTimeValue::Unspecified(naive)) => {
                // Wall-clock times inside a DST gap have no local mapping; read them as UTC.
                let local = Local
                    .from_local_datetime(&naive)
                    .earliest()
                    .unwrap_or_else(|| Local.from_utc_datetime(&naive));
                DateTimeValue::Local(local)
            }
            (DateTimeZoneHandling::Local, v @ DateTimeValue::Local(_)) => v,

            (DateTimeZoneHandling::Utc, DateTimeValue::Local(dt)) => {
                DateTimeValue::Utc(dt.with_timezone(&Utc))
            }
            (DateTimeZoneHandling::Utc, DateTimeValue::Unspecified(naive)) => {
                DateTimeValue::Utc(Utc.from_utc_datetime(&naive))
            }
            (DateTimeZoneHandling::Utc, v @ DateTimeValue::Utc(_)) => v,

            (DateTimeZoneHandling::Unspecified, DateTimeValue::Utc(dt)) => {
                DateTimeValue::Unspecified(dt.naive_utc())
            }
            (DateTimeZoneHandling::Unspecified, DateTimeValue::Local(dt)) => {
                DateTimeValue::Unspecified(dt.naive_local())
            }
            (DateTimeZoneHandling::Unspecified, v @ DateTimeValue::Unspecified(_)) => v,
        }
    }
}

/// Options that shape how a [`TreeWriter`](crate::TreeWriter) stores values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterSettings {
    pub date_time_zone_handling: DateTimeZoneHandling,
    /// Cap on the number of tree nodes, members included. `None` leaves only
    /// the arena's own limit ([`MAX_NODES`](crate::tree::MAX_NODES)).
    pub max_nodes: Option<usize>,
}

impl WriterSettings {
    pub fn with_date_time_zone_handling(mut self, handling: DateTimeZoneHandling) -> Self {
        self.date_time_zone_handling = handling;
        self
    }

    pub fn with_max_nodes(mut self, limit: usize) -> Self {
        self.max_nodes = Some(limit);
        self
    }
}
