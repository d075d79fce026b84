use std::sync::Arc;

use polars::prelude::{DataType, Field, PlSmallStr, Schema, SchemaRef, TimeUnit};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Column vocabulary of the raw daily export, spelled exactly as the export
/// spells its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum RawCol {
    /// The traded instrument. Rows without a symbol are dropped before
    /// normalization.
    Symbol,
    /// Date portion, `MM-DD-YYYY`.
    Day,
    /// Hour portion, zero padded (e.g. `"09"`).
    Hour,
    /// Strategy identifier.
    Name,
    Price,
    Premium,
    Predicted,
    Closed,
    Trade,
    Risk,
    Reward,
    /// Managed profit measure, one of the two profit variants.
    Managed,
    /// Raw profit measure, the variant that reaches the sink.
    Raw,
}

impl From<RawCol> for PlSmallStr {
    fn from(value: RawCol) -> Self {
        value.as_str().into()
    }
}

impl RawCol {
    pub fn name(&self) -> PlSmallStr {
        (*self).into()
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Dtype pins applied on top of CSV inference.
///
/// `Day` and `Hour` must stay strings so the datetime scratch column can be
/// assembled (`"09"` would otherwise infer as the integer `9`), and the
/// numeric columns are pinned so ratio and profit arithmetic is Float64.
/// `Predicted`, `Closed` and `Trade` stay inferred: the export does not
/// constrain them.
pub fn raw_schema_overrides() -> SchemaRef {
    let s = Schema::from_iter([
        Field::new(RawCol::Symbol.name(), DataType::String),
        Field::new(RawCol::Day.name(), DataType::String),
        Field::new(RawCol::Hour.name(), DataType::String),
        Field::new(RawCol::Name.name(), DataType::String),
        Field::new(RawCol::Price.name(), DataType::Float64),
        Field::new(RawCol::Premium.name(), DataType::Float64),
        Field::new(RawCol::Risk.name(), DataType::Float64),
        Field::new(RawCol::Reward.name(), DataType::Float64),
        Field::new(RawCol::Managed.name(), DataType::Float64),
        Field::new(RawCol::Raw.name(), DataType::Float64),
    ]);

    Arc::new(s)
}

/// The standardized vocabulary of the normalized signal table.
///
/// Variant declaration order is the canonical column order of the table that
/// reaches the sink; [`normalized_schema`] and the final projection both
/// derive from it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum SignalCol {
    /// Signal timestamp assembled from `Day` and `Hour`, naive.
    Datetime,
    /// ISO weekday number (Monday=1 .. Sunday=7).
    #[strum(serialize = "weekdaynumber")]
    WeekdayNumber,
    /// Weekday label for Monday through Friday; Saturday and Sunday keep
    /// their number rendered as a string (see `normalize`).
    Weekday,
    /// Time-of-day component of the signal timestamp.
    TimeOfDay,
    Symbol,
    Price,
    /// Strategy identifier, renamed from the export's `Name` column.
    Strategy,
    Premium,
    Predicted,
    Closed,
    /// Whether the selected profit measure is positive.
    Expired,
    Trade,
    Risk,
    Reward,
    /// `Reward / Risk`; IEEE division, so a zero risk yields infinity.
    Ratio,
    /// The selected profit variant (`Managed` or `Raw`).
    Profit,
}

impl From<SignalCol> for PlSmallStr {
    fn from(value: SignalCol) -> Self {
        value.as_str().into()
    }
}

impl SignalCol {
    pub fn name(&self) -> PlSmallStr {
        (*self).into()
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn dtype(&self) -> DataType {
        match self {
            Self::Datetime => DataType::Datetime(TimeUnit::Microseconds, None),
            Self::WeekdayNumber => DataType::Int64,
            Self::TimeOfDay => DataType::Time,
            Self::Expired => DataType::Boolean,

            // Weekday is a string because Monday..Friday carry name labels;
            // the weekend numbers ride along as their decimal rendering.
            Self::Weekday
            | Self::Symbol
            | Self::Strategy
            | Self::Predicted
            | Self::Closed
            | Self::Trade => DataType::String,

            Self::Price
            | Self::Premium
            | Self::Risk
            | Self::Reward
            | Self::Ratio
            | Self::Profit => DataType::Float64,
        }
    }

    pub fn field(&self) -> Field {
        Field::new(self.name(), self.dtype())
    }
}

/// Canonical schema of the normalized signal table, in sink column order.
pub fn normalized_schema() -> SchemaRef {
    let s = Schema::from_iter(SignalCol::iter().map(|c| c.field()));
    Arc::new(s)
}
