//! CSV export of the department salary report.

use csv::{QuoteStyle, WriterBuilder};
use thiserror::Error;

use crate::domain::statistics::DepartmentSalary;

pub const DEPARTMENT_CSV_FILENAME: &str = "department-salary-statistics.csv";

const DEPARTMENT_CSV_HEADER: [&str; 6] = [
    "Department",
    "Employee Count",
    "Average Salary",
    "Total Salary",
    "Min Salary",
    "Max Salary",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the report as CSV. Returns `None` when there is nothing to export.
///
/// The header is written bare; department names are always quoted.
pub fn department_salaries_csv(
    rows: &[DepartmentSalary],
) -> Result<Option<Vec<u8>>, ExportError> {
    if rows.is_empty() {
        return Ok(None);
    }

    let mut header = WriterBuilder::new().from_writer(Vec::new());
    header.write_record(DEPARTMENT_CSV_HEADER)?;
    let buffer = header.into_inner().map_err(|err| err.into_error())?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(buffer);
    for row in rows {
        writer.write_record([
            row.department_name.clone(),
            row.employee_count.to_string(),
            row.average_salary.to_string(),
            row.total_salary.to_string(),
            row.min_salary.to_string(),
            row.max_salary.to_string(),
        ])?;
    }
    let buffer = writer.into_inner().map_err(|err| err.into_error())?;

    Ok(Some(buffer))
}
