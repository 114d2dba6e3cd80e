use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::statistics::ReportRange;
use crate::forms::FormError;

/// "Run Report" form of the statistics dashboard.
#[derive(Debug, Deserialize)]
pub struct ReportForm {
    pub from: String,
    pub to: String,
}

fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FormError::InvalidDate(value.to_string()))
}

impl TryFrom<ReportForm> for ReportRange {
    type Error = FormError;

    fn try_from(form: ReportForm) -> Result<Self, Self::Error> {
        let from = parse_date(&form.from)?;
        let to = parse_date(&form.to)?;
        Ok(ReportRange::new(from, to)?)
    }
}
