use std::str::FromStr;
use tracing::trace;

/// A numeric type a catalog cell can be read as.
///
/// `parse_cell` must accept the whole cell or nothing: no trimming, no
/// partial prefixes. `None` is the only "not a number" signal.
pub trait CellValue: Copy + PartialOrd + Sized {
    /// Short name used in diagnostics.
    const KIND: &'static str;

    fn parse_cell(raw: &str) -> Option<Self>;

    /// True for values strictly greater than zero.
    fn is_strictly_positive(&self) -> bool;
}

/// Whole-cell parse shared by every impl. Catalog numbers never carry an
/// explicit `+`, so one is rejected for integers and floats alike.
fn parse_whole<T: FromStr>(raw: &str) -> Option<T> {
    if raw.starts_with('+') {
        return None;
    }
    raw.parse().ok()
}

impl CellValue for u64 {
    const KIND: &'static str = "u64";

    fn parse_cell(raw: &str) -> Option<Self> {
        parse_whole(raw)
    }

    fn is_strictly_positive(&self) -> bool {
        *self > 0
    }
}

impl CellValue for i64 {
    const KIND: &'static str = "i64";

    fn parse_cell(raw: &str) -> Option<Self> {
        parse_whole(raw)
    }

    fn is_strictly_positive(&self) -> bool {
        *self > 0
    }
}

impl CellValue for f64 {
    const KIND: &'static str = "f64";

    fn parse_cell(raw: &str) -> Option<Self> {
        // NaN and infinities parse fine in Rust but are not effect sizes.
        parse_whole::<f64>(raw).filter(|v| v.is_finite())
    }

    fn is_strictly_positive(&self) -> bool {
        *self > 0.0
    }
}

/// Parse `raw` as `T`, or `None` if it is not a valid `T`.
pub fn parse<T: CellValue>(raw: &str) -> Option<T> {
    let parsed = T::parse_cell(raw);
    if parsed.is_none() {
        trace!(raw, kind = T::KIND, "cell is not a valid number");
    }
    parsed
}
