//! Report rows returned by the statistics endpoints.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Inclusive date range of a sales report.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReportRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, TypeConstraintError> {
        if from > to {
            return Err(TypeConstraintError::InvalidValue(
                "report start date is after its end date".to_string(),
            ));
        }
        Ok(Self { from, to })
    }

    /// ISO `yyyy-mm-dd` query values for the backend.
    pub fn query_values(&self) -> (String, String) {
        (
            self.from.format("%Y-%m-%d").to_string(),
            self.to.format("%Y-%m-%d").to_string(),
        )
    }
}

impl Default for ReportRange {
    fn default() -> Self {
        Self {
            from: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default(),
            to: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatistics {
    pub category_name: String,
    pub sales_volume: u64,
    pub total_sales: f64,
    pub percentage: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    /// Month label as produced by the backend, e.g. `2025-06`.
    pub month: String,
    pub total_sales: f64,
    pub sales_volume: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryStatistics {
    pub subcategory_name: String,
    pub category_name: String,
    #[serde(default)]
    pub monthly_sales: Vec<MonthlySales>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearComparison {
    pub category_name: String,
    pub year_a: i32,
    pub sales_volume_year_a: u64,
    pub total_sales_year_a: f64,
    pub year_b: i32,
    pub sales_volume_year_b: u64,
    pub total_sales_year_b: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSalary {
    pub department_name: String,
    pub employee_count: u64,
    pub total_salary: f64,
    pub average_salary: f64,
    pub min_salary: f64,
    pub max_salary: f64,
}

/// Metric plotted by the department chart.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SalaryMetric {
    #[default]
    AverageSalary,
    EmployeeCount,
    TotalSalary,
    MinSalary,
    MaxSalary,
}

impl SalaryMetric {
    pub const ALL: [SalaryMetric; 5] = [
        SalaryMetric::AverageSalary,
        SalaryMetric::EmployeeCount,
        SalaryMetric::TotalSalary,
        SalaryMetric::MinSalary,
        SalaryMetric::MaxSalary,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SalaryMetric::AverageSalary => "average_salary",
            SalaryMetric::EmployeeCount => "employee_count",
            SalaryMetric::TotalSalary => "total_salary",
            SalaryMetric::MinSalary => "min_salary",
            SalaryMetric::MaxSalary => "max_salary",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SalaryMetric::AverageSalary => "Average Salary",
            SalaryMetric::EmployeeCount => "Employee Count",
            SalaryMetric::TotalSalary => "Total Salary",
            SalaryMetric::MinSalary => "Minimum Salary",
            SalaryMetric::MaxSalary => "Maximum Salary",
        }
    }

    pub fn value_of(self, row: &DepartmentSalary) -> f64 {
        match self {
            SalaryMetric::AverageSalary => row.average_salary,
            SalaryMetric::EmployeeCount => row.employee_count as f64,
            SalaryMetric::TotalSalary => row.total_salary,
            SalaryMetric::MinSalary => row.min_salary,
            SalaryMetric::MaxSalary => row.max_salary,
        }
    }
}

impl Display for SalaryMetric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalaryMetric {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SalaryMetric::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s.trim())
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("salary metric `{s}`")))
    }
}

/// Rendering style of the department metric chart.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Area,
    Line,
    Bar,
}

impl FromStr for ChartType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "area" => Ok(ChartType::Area),
            "line" => Ok(ChartType::Line),
            "bar" => Ok(ChartType::Bar),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "chart type `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_rejects_inverted_dates() {
        let from = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(ReportRange::new(from, to).is_err());
        assert!(ReportRange::new(to, from).is_ok());
    }

    #[test]
    fn default_range_is_june_2025() {
        let (from, to) = ReportRange::default().query_values();
        assert_eq!(from, "2025-06-01");
        assert_eq!(to, "2025-06-30");
    }

    #[test]
    fn metric_round_trips_through_its_name() {
        for metric in SalaryMetric::ALL {
            assert_eq!(metric.as_str().parse::<SalaryMetric>(), Ok(metric));
        }
    }
}
