use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

use enumset::EnumSet;
use serde::Deserialize;

/// Monitored circuit as the device tags it in the live data.
///
/// The declaration order is significant: circuits are looked up and reported in this order.
#[derive(Debug, Hash, PartialOrd, Ord, Deserialize, enumset::EnumSetType)]
pub enum MetricKey {
    Total,

    #[serde(rename = "MTU1")]
    Mtu1,

    #[serde(rename = "MTU2")]
    Mtu2,

    #[serde(rename = "MTU3")]
    Mtu3,

    #[serde(rename = "MTU4")]
    Mtu4,
}

impl MetricKey {
    /// Iterate over all the keys in the reporting order.
    pub fn ordered() -> impl Iterator<Item = Self> {
        EnumSet::<Self>::all().iter()
    }

    /// XML tag of the circuit element.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Total => "Total",
            Self::Mtu1 => "MTU1",
            Self::Mtu2 => "MTU2",
            Self::Mtu3 => "MTU3",
            Self::Mtu4 => "MTU4",
        }
    }
}

impl Display for MetricKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// User-facing circuit names.
///
/// An empty or missing name suppresses the circuit from the report.
#[must_use]
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct DisplayNames(BTreeMap<MetricKey, String>);

impl DisplayNames {
    pub fn get(&self, key: MetricKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str).filter(|name| !name.is_empty())
    }
}

impl<const N: usize> From<[(MetricKey, &str); N]> for DisplayNames {
    fn from(names: [(MetricKey, &str); N]) -> Self {
        Self(names.into_iter().map(|(key, name)| (key, name.to_owned())).collect())
    }
}
