use polars::prelude::{
    DataFrame, DataType, Expr, IntoLazy, LazyFrame, PolarsError, StrptimeOptions, TimeUnit, col,
    concat_str, lit, when,
};
use strum::{Display, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    error::{DataError, SignalflowResult},
    schema::{RawCol, SignalCol},
};

/// Pattern of the scratch datetime string assembled from `Day` and `Hour`.
pub const DATETIME_FMT: &str = "%m-%d-%Y %H:%M:%S";

/// Which of the two profit measures in the export is projected into the
/// `profit` column of the normalized table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum ProfitSource {
    Managed,
    Raw,
}

impl ProfitSource {
    fn raw_col(&self) -> RawCol {
        match self {
            Self::Managed => RawCol::Managed,
            Self::Raw => RawCol::Raw,
        }
    }
}

/// Columns that carry over with a new name and unchanged values.
const STRAIGHT_RENAMES: [(RawCol, SignalCol); 9] = [
    (RawCol::Symbol, SignalCol::Symbol),
    (RawCol::Price, SignalCol::Price),
    (RawCol::Name, SignalCol::Strategy),
    (RawCol::Premium, SignalCol::Premium),
    (RawCol::Predicted, SignalCol::Predicted),
    (RawCol::Closed, SignalCol::Closed),
    (RawCol::Trade, SignalCol::Trade),
    (RawCol::Risk, SignalCol::Risk),
    (RawCol::Reward, SignalCol::Reward),
];

/// Normalizes one raw daily export into the canonical 16-column signal table.
///
/// Pure function of its two inputs. The whole table fails on the first
/// malformed `Day`/`Hour` pair or missing column; there is no per-row
/// recovery. A zero `Risk` is not an error: the ratio comes out as infinity
/// (or NaN when `Reward` is also zero).
pub fn normalize(df: &DataFrame, profit_source: ProfitSource) -> SignalflowResult<DataFrame> {
    projection(df.clone().lazy(), profit_source)
        .collect()
        .map_err(|e| to_data_error(e).into())
}

/// The declarative pipeline: derive, rename once, project once.
///
/// The only genuine order dependency is that `datetime` must exist before
/// the weekday and time-of-day extractions, hence the two `with_columns`
/// stages.
fn projection(lf: LazyFrame, profit_source: ProfitSource) -> LazyFrame {
    let (existing, new): (Vec<_>, Vec<_>) = STRAIGHT_RENAMES
        .iter()
        .map(|(from, to)| (from.as_str(), to.as_str()))
        .unzip();

    lf.with_column(datetime_expr())
        .with_columns([
            col(SignalCol::Datetime)
                .dt()
                .weekday()
                .cast(DataType::Int64)
                .alias(SignalCol::WeekdayNumber),
            weekday_label(col(SignalCol::Datetime).dt().weekday()).alias(SignalCol::Weekday),
            col(SignalCol::Datetime)
                .dt()
                .time()
                .alias(SignalCol::TimeOfDay),
            col(profit_source.raw_col())
                .cast(DataType::Float64)
                .alias(SignalCol::Profit),
            (col(RawCol::Reward).cast(DataType::Float64)
                / col(RawCol::Risk).cast(DataType::Float64))
            .alias(SignalCol::Ratio),
        ])
        .with_column(
            col(SignalCol::Profit)
                .gt(lit(0.0))
                .alias(SignalCol::Expired),
        )
        .rename(existing, new, true)
        .select(SignalCol::iter().map(col).collect::<Vec<_>>())
}

/// `Day + " " + Hour + ":00"`, strictly parsed as a naive datetime.
fn datetime_expr() -> Expr {
    concat_str(
        [col(RawCol::Day), lit(" "), col(RawCol::Hour), lit(":00")],
        "",
        false,
    )
    .str()
    .to_datetime(
        Some(TimeUnit::Microseconds),
        None,
        StrptimeOptions {
            format: Some(DATETIME_FMT.into()),
            ..Default::default()
        },
        lit("raise"),
    )
    .alias(SignalCol::Datetime)
}

/// Maps weekday numbers 1-5 to their name; Saturday (6) and Sunday (7)
/// deliberately keep their number, rendered as a string since the column is
/// mono-typed. The export job only ever labeled the trading week.
fn weekday_label(wd: Expr) -> Expr {
    when(wd.clone().eq(lit(1)))
        .then(lit("Monday"))
        .when(wd.clone().eq(lit(2)))
        .then(lit("Tuesday"))
        .when(wd.clone().eq(lit(3)))
        .then(lit("Wednesday"))
        .when(wd.clone().eq(lit(4)))
        .then(lit("Thursday"))
        .when(wd.clone().eq(lit(5)))
        .then(lit("Friday"))
        .otherwise(wd.cast(DataType::String))
}

fn to_data_error(e: PolarsError) -> DataError {
    match e {
        PolarsError::ColumnNotFound(name) => DataError::MissingColumn(name.to_string()),
        e => {
            let msg = e.to_string();
            if msg.contains("conversion from `str` to `datetime") {
                DataError::DatetimeParse(msg)
            } else {
                DataError::DataFrame(msg)
            }
        }
    }
}
