use serde::Serialize;

use crate::error::Result;
use crate::report::SummaryData;

pub fn render_summary_json(data: &SummaryData) -> Result<String> {
    render_pretty(data)
}

/// Pretty JSON with a trailing newline.
pub fn render_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
