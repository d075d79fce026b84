use polars::prelude::{DataFrame, IntoLazy, UniqueKeepStrategy};

use crate::error::{DataError, SignalflowResult};

pub trait DataFrameExt {
    /// Drops exact duplicate rows (equality across every column), keeping
    /// the first occurrence and the original row order.
    fn dedup_rows(&self) -> SignalflowResult<DataFrame>;

    fn is_not_empty(&self) -> bool;
}

impl DataFrameExt for DataFrame {
    fn dedup_rows(&self) -> SignalflowResult<DataFrame> {
        self.clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()
            .map_err(|e| DataError::DataFrame(e.to_string()).into())
    }

    fn is_not_empty(&self) -> bool {
        self.height() > 0
    }
}
