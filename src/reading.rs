use std::{
    fmt::{Display, Formatter},
    num::ParseFloatError,
    str::Utf8Error,
};

use roxmltree::{Document, Node};

use crate::{
    metric::{DisplayNames, MetricKey},
    prelude::*,
    quantity::power::Watts,
};

/// One of the four power values reported per circuit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PowerField {
    Now,
    Today,
    MonthToDate,
    AverageDaily,
}

impl PowerField {
    /// XML tag of the value inside a circuit element.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Now => "PowerNow",
            Self::Today => "PowerTDY",
            Self::MonthToDate => "PowerMTD",
            Self::AverageDaily => "PowerAvg",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Now => "The most recent Power reading from the MTU",
            Self::Today => "Cumulative Power since midnight",
            Self::MonthToDate => "Cumulative Power since the beginning of the billing cycle",
            Self::AverageDaily => "The average daily power used this billing cycle",
        }
    }
}

impl Display for PowerField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MetricReading {
    pub now: Watts,
    pub today: Watts,
    pub month_to_date: Watts,
    pub average_daily: Watts,
}

impl MetricReading {
    /// Values paired with their fields, in the reporting order.
    pub const fn fields(&self) -> [(PowerField, Watts); 4] {
        [
            (PowerField::Now, self.now),
            (PowerField::Today, self.today),
            (PowerField::MonthToDate, self.month_to_date),
            (PowerField::AverageDaily, self.average_daily),
        ]
    }

    fn try_from_node(metric: MetricKey, node: Node<'_, '_>) -> Result<Self, ParseError> {
        let read = |field: PowerField| read_field(metric, node, field);
        Ok(Self {
            now: read(PowerField::Now)?,
            today: read(PowerField::Today)?,
            month_to_date: read(PowerField::MonthToDate)?,
            average_daily: read(PowerField::AverageDaily)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    pub display_name: String,
    pub reading: MetricReading,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseError {
    #[display("the live data is not valid UTF-8")]
    Encoding(#[error(source)] Utf8Error),

    #[display("the live data is not well-formed XML")]
    Xml(#[error(source)] roxmltree::Error),

    #[display("`{metric}` has no `{field}` element")]
    MissingField { metric: MetricKey, field: PowerField },

    #[display("`{metric}/{field}` is not a number: `{text}`")]
    InvalidNumber { metric: MetricKey, field: PowerField, text: String, source: ParseFloatError },

    #[display("`{metric}/{field}` is not finite: `{text}`")]
    NonFinite { metric: MetricKey, field: PowerField, text: String },
}

/// Parse the live data into the circuits, in the [`MetricKey`] order within each `Power` element.
///
/// Circuits without a display name are skipped. When a `Power` element has several children
/// with the same tag, the first one wins.
#[instrument(skip_all, fields(n_bytes = raw.len()))]
pub fn parse(raw: &[u8], names: &DisplayNames) -> Result<Vec<Circuit>, ParseError> {
    let text = std::str::from_utf8(raw).map_err(ParseError::Encoding)?;
    let document = Document::parse(text).map_err(ParseError::Xml)?;

    let mut circuits = Vec::new();
    for power in document.descendants().filter(|node| node.has_tag_name("Power")) {
        for metric in MetricKey::ordered() {
            let Some(child) = power.children().find(|child| child.has_tag_name(metric.tag())) else {
                continue;
            };
            let Some(display_name) = names.get(metric) else {
                debug!(%metric, "suppressed");
                continue;
            };
            circuits.push(Circuit {
                display_name: display_name.to_owned(),
                reading: MetricReading::try_from_node(metric, child)?,
            });
        }
    }
    Ok(circuits)
}

fn read_field(
    metric: MetricKey,
    node: Node<'_, '_>,
    field: PowerField,
) -> Result<Watts, ParseError> {
    let text = node
        .children()
        .find(|child| child.has_tag_name(field.tag()))
        .ok_or(ParseError::MissingField { metric, field })?
        .text()
        .unwrap_or_default()
        .trim();
    let value: f64 = text.parse().map_err(|source| ParseError::InvalidNumber {
        metric,
        field,
        text: text.to_owned(),
        source,
    })?;
    if !value.is_finite() {
        return Err(ParseError::NonFinite { metric, field, text: text.to_owned() });
    }
    Ok(Watts(value))
}
