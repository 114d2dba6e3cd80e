//! DTOs used by the statistics dashboard.

use serde::{Deserialize, Serialize};

use crate::charts::{BarChart, BubbleChart, MetricSeries, PieSeries, SubcategorySummary};
use crate::domain::statistics::{CategoryStatistics, ChartType, DepartmentSalary, SalaryMetric};
use crate::query::SortDirection;

/// Query string of the dashboard. Blank values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct StatisticsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Category narrowing the subcategory chart.
    pub category: Option<String>,
    pub year_a: Option<String>,
    pub year_b: Option<String>,
    pub metric: Option<String>,
    pub chart: Option<String>,
    /// Sorted column of the category table.
    pub sort: Option<String>,
    pub dir: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategorySection {
    pub rows: Vec<CategoryStatistics>,
    pub pie: PieSeries,
    pub sort: Option<String>,
    pub direction: SortDirection,
}

#[derive(Debug, Serialize)]
pub struct SubcategorySection {
    pub category: Option<String>,
    pub chart: BarChart,
    pub summary: Vec<SubcategorySummary>,
}

#[derive(Debug, Serialize)]
pub struct YearSection {
    pub year_a: i32,
    pub year_b: i32,
    pub bars: BarChart,
    pub bubbles: BubbleChart,
}

#[derive(Debug, Serialize)]
pub struct DepartmentSection {
    pub rows: Vec<DepartmentSalary>,
    pub series: MetricSeries,
    pub metric: SalaryMetric,
    pub chart_type: ChartType,
}

/// Selector option as `(value, label)`.
pub type ChoiceOption = (&'static str, &'static str);

/// Data required to render the dashboard. A section is `None` when its
/// report failed to load; `errors` then says which.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub from: String,
    pub to: String,
    pub categories: Option<CategorySection>,
    pub subcategories: Option<SubcategorySection>,
    pub years: Option<YearSection>,
    pub departments: Option<DepartmentSection>,
    /// Category names offered by the subcategory filter.
    pub category_names: Vec<String>,
    pub metrics: Vec<ChoiceOption>,
    pub chart_types: Vec<ChoiceOption>,
    pub errors: Vec<String>,
}
