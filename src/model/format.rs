//! Display formatting for backend timestamps.

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Render a timestamp as `DD/MM/YYYY HH:MM` in the given display offset.
#[must_use]
pub fn format_timestamp(ts: OffsetDateTime, offset: UtcOffset) -> String {
    let layout = format_description!("[day]/[month]/[year] [hour]:[minute]");
    ts.to_offset(offset)
        .format(layout)
        .unwrap_or_else(|_| ts.unix_timestamp().to_string())
}

#[cfg(test)]
#[path = "format_test.rs"]
mod tests;
