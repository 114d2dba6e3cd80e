//! Reshapes report rows into chart-ready series.
//!
//! The console only prepares data; templates hand these structures to the
//! chart library as JSON.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use serde::Serialize;

use crate::domain::statistics::{
    CategoryStatistics, ChartType, DepartmentSalary, MonthlySales, SalaryMetric,
    SubcategoryStatistics, YearComparison,
};
use crate::domain::types::TypeConstraintError;
use crate::query::SortDirection;

const CATEGORY_COLORS: [&str; 4] = ["#3f51b5", "#2196f3", "#4caf50", "#ff9800"];

const SERIES_COLORS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const YEAR_A_COLOR: &str = "#3f51b5";
const YEAR_B_COLOR: &str = "#2196f3";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PieSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub colors: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub traces: Vec<BarTrace>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BubbleTrace {
    pub name: String,
    /// Total sales per category.
    pub x: Vec<f64>,
    pub y: Vec<String>,
    pub sizes: Vec<f64>,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BubbleChart {
    pub title: String,
    pub traces: Vec<BubbleTrace>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricSeries {
    pub title: String,
    pub label: &'static str,
    pub y_axis_title: &'static str,
    pub chart_type: ChartType,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub color: &'static str,
    pub line_color: &'static str,
}

/// Per-subcategory totals shown beside the monthly chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubcategorySummary {
    pub subcategory_name: String,
    pub category_name: String,
    pub total_sales: f64,
    pub total_volume: u64,
    pub average_monthly_sales: f64,
    pub peak_month: String,
    pub peak_sales: f64,
}

/// Sortable columns of the category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryColumn {
    Name,
    SalesVolume,
    TotalSales,
    Percentage,
}

impl FromStr for CategoryColumn {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "categoryName" => Ok(CategoryColumn::Name),
            "salesVolume" => Ok(CategoryColumn::SalesVolume),
            "totalSales" => Ok(CategoryColumn::TotalSales),
            "percentage" => Ok(CategoryColumn::Percentage),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "category column `{other}`"
            ))),
        }
    }
}

pub fn category_pie(rows: &[CategoryStatistics]) -> PieSeries {
    PieSeries {
        labels: rows.iter().map(|row| row.category_name.clone()).collect(),
        values: rows.iter().map(|row| row.sales_volume).collect(),
        colors: CATEGORY_COLORS.to_vec(),
    }
}

pub fn sort_categories(
    rows: &[CategoryStatistics],
    column: CategoryColumn,
    direction: SortDirection,
) -> Vec<CategoryStatistics> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match column {
            CategoryColumn::Name => a.category_name.cmp(&b.category_name),
            CategoryColumn::SalesVolume => a.sales_volume.cmp(&b.sales_volume),
            CategoryColumn::TotalSales => a.total_sales.total_cmp(&b.total_sales),
            CategoryColumn::Percentage => a.percentage.total_cmp(&b.percentage),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

/// Fixed palette first, then golden-angle hues.
pub fn generate_colors(count: usize) -> Vec<String> {
    (0..count)
        .map(|index| match SERIES_COLORS.get(index) {
            Some(color) => (*color).to_string(),
            None => {
                let hue = (index as f64 * 137.508) % 360.0;
                format!("hsl({hue:.3}, 65%, 50%)")
            }
        })
        .collect()
}

/// One bar trace per subcategory over the sorted union of months; months a
/// subcategory has no sales in are plotted as zero.
pub fn subcategory_monthly_bars(rows: &[SubcategoryStatistics]) -> BarChart {
    let months: Vec<String> = rows
        .iter()
        .flat_map(|row| row.monthly_sales.iter().map(|m| m.month.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let colors = generate_colors(rows.len());

    let traces = rows
        .iter()
        .zip(colors)
        .map(|(row, color)| {
            let by_month: HashMap<&str, &MonthlySales> = row
                .monthly_sales
                .iter()
                .map(|m| (m.month.as_str(), m))
                .collect();
            BarTrace {
                name: format!("{} ({})", row.subcategory_name, row.category_name),
                x: months.clone(),
                y: months
                    .iter()
                    .map(|month| by_month.get(month.as_str()).map_or(0.0, |m| m.total_sales))
                    .collect(),
                color,
            }
        })
        .collect();

    let categories: BTreeSet<&str> = rows.iter().map(|row| row.category_name.as_str()).collect();
    let title = match categories.iter().next() {
        Some(category) if categories.len() == 1 => {
            format!("Monthly Sales by Subcategory - {category}")
        }
        _ => "Monthly Sales by Subcategory".to_string(),
    };

    BarChart { title, traces }
}

/// Summary rows sorted by total sales, highest first.
pub fn subcategory_summary(rows: &[SubcategoryStatistics]) -> Vec<SubcategorySummary> {
    let mut summary: Vec<SubcategorySummary> = rows
        .iter()
        .map(|row| {
            let total_sales: f64 = row.monthly_sales.iter().map(|m| m.total_sales).sum();
            let total_volume: u64 = row.monthly_sales.iter().map(|m| m.sales_volume).sum();
            let average_monthly_sales = if row.monthly_sales.is_empty() {
                0.0
            } else {
                total_sales / row.monthly_sales.len() as f64
            };

            let mut peak_month = String::new();
            let mut peak_sales = 0.0;
            for month in &row.monthly_sales {
                if month.total_sales > peak_sales {
                    peak_sales = month.total_sales;
                    peak_month = month.month.clone();
                }
            }

            SubcategorySummary {
                subcategory_name: row.subcategory_name.clone(),
                category_name: row.category_name.clone(),
                total_sales,
                total_volume,
                average_monthly_sales,
                peak_month,
                peak_sales,
            }
        })
        .collect();

    summary.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    summary
}

fn compared_years(rows: &[YearComparison]) -> Option<(i32, i32)> {
    rows.first().map(|row| (row.year_a, row.year_b))
}

pub fn year_comparison_bars(rows: &[YearComparison]) -> BarChart {
    let Some((year_a, year_b)) = compared_years(rows) else {
        return BarChart {
            title: "Sales Comparison".to_string(),
            traces: Vec::new(),
        };
    };
    let categories: Vec<String> = rows.iter().map(|row| row.category_name.clone()).collect();

    BarChart {
        title: format!("Sales Comparison: {year_a} vs {year_b}"),
        traces: vec![
            BarTrace {
                name: year_a.to_string(),
                x: categories.clone(),
                y: rows.iter().map(|row| row.total_sales_year_a).collect(),
                color: YEAR_A_COLOR.to_string(),
            },
            BarTrace {
                name: year_b.to_string(),
                x: categories,
                y: rows.iter().map(|row| row.total_sales_year_b).collect(),
                color: YEAR_B_COLOR.to_string(),
            },
        ],
    }
}

/// Marker size grows with the square root of the sales volume, never below 10.
pub fn bubble_size(volume: u64) -> f64 {
    ((volume as f64).sqrt() * 2.0).max(10.0)
}

pub fn year_comparison_bubbles(rows: &[YearComparison]) -> BubbleChart {
    let Some((year_a, year_b)) = compared_years(rows) else {
        return BubbleChart {
            title: "Sales Volume Bubble Chart".to_string(),
            traces: Vec::new(),
        };
    };
    let categories: Vec<String> = rows.iter().map(|row| row.category_name.clone()).collect();

    BubbleChart {
        title: format!("Sales Volume Bubble Chart: {year_a} vs {year_b}"),
        traces: vec![
            BubbleTrace {
                name: year_a.to_string(),
                x: rows.iter().map(|row| row.total_sales_year_a).collect(),
                y: categories.clone(),
                sizes: rows
                    .iter()
                    .map(|row| bubble_size(row.sales_volume_year_a))
                    .collect(),
                color: YEAR_A_COLOR,
            },
            BubbleTrace {
                name: year_b.to_string(),
                x: rows.iter().map(|row| row.total_sales_year_b).collect(),
                y: categories,
                sizes: rows
                    .iter()
                    .map(|row| bubble_size(row.sales_volume_year_b))
                    .collect(),
                color: YEAR_B_COLOR,
            },
        ],
    }
}

fn metric_colors(metric: SalaryMetric) -> (&'static str, &'static str) {
    match metric {
        SalaryMetric::AverageSalary => ("#3f51b5", "#1a237e"),
        SalaryMetric::EmployeeCount => ("#4caf50", "#2e7d32"),
        SalaryMetric::TotalSalary => ("#ff9800", "#e65100"),
        SalaryMetric::MinSalary => ("#f44336", "#c62828"),
        SalaryMetric::MaxSalary => ("#9c27b0", "#6a1b9a"),
    }
}

pub fn department_metric_series(
    rows: &[DepartmentSalary],
    metric: SalaryMetric,
    chart_type: ChartType,
) -> MetricSeries {
    let (color, line_color) = metric_colors(metric);
    MetricSeries {
        title: format!("{} by Department", metric.label()),
        label: metric.label(),
        y_axis_title: match metric {
            SalaryMetric::EmployeeCount => "Number of Employees",
            _ => "Salary ($)",
        },
        chart_type,
        x: rows.iter().map(|row| row.department_name.clone()).collect(),
        y: rows.iter().map(|row| metric.value_of(row)).collect(),
        color,
        line_color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly(month: &str, total_sales: f64, sales_volume: u64) -> MonthlySales {
        MonthlySales {
            month: month.to_string(),
            total_sales,
            sales_volume,
        }
    }

    fn subcategory(name: &str, category: &str, months: Vec<MonthlySales>) -> SubcategoryStatistics {
        SubcategoryStatistics {
            subcategory_name: name.to_string(),
            category_name: category.to_string(),
            monthly_sales: months,
        }
    }

    #[test]
    fn monthly_bars_fill_missing_months_with_zero() {
        let rows = vec![
            subcategory(
                "Road Bikes",
                "Bikes",
                vec![monthly("2025-06", 100.0, 2), monthly("2025-04", 50.0, 1)],
            ),
            subcategory("Mountain Bikes", "Bikes", vec![monthly("2025-05", 70.0, 1)]),
        ];

        let chart = subcategory_monthly_bars(&rows);

        assert_eq!(chart.title, "Monthly Sales by Subcategory - Bikes");
        assert_eq!(chart.traces[0].x, vec!["2025-04", "2025-05", "2025-06"]);
        assert_eq!(chart.traces[0].y, vec![50.0, 0.0, 100.0]);
        assert_eq!(chart.traces[1].y, vec![0.0, 70.0, 0.0]);
        assert_eq!(chart.traces[1].name, "Mountain Bikes (Bikes)");
    }

    #[test]
    fn colors_extend_past_the_fixed_palette() {
        let colors = generate_colors(12);
        assert_eq!(colors.len(), 12);
        assert_eq!(colors[0], "#1f77b4");
        assert!(colors[10].starts_with("hsl("));
        assert_ne!(colors[10], colors[11]);
    }

    #[test]
    fn summary_is_sorted_by_total_sales() {
        let rows = vec![
            subcategory("Gloves", "Clothing", vec![monthly("2025-06", 10.0, 4)]),
            subcategory(
                "Helmets",
                "Accessories",
                vec![monthly("2025-05", 30.0, 3), monthly("2025-06", 50.0, 5)],
            ),
            subcategory("Locks", "Accessories", vec![]),
        ];

        let summary = subcategory_summary(&rows);

        assert_eq!(summary[0].subcategory_name, "Helmets");
        assert_eq!(summary[0].total_sales, 80.0);
        assert_eq!(summary[0].total_volume, 8);
        assert_eq!(summary[0].average_monthly_sales, 40.0);
        assert_eq!(summary[0].peak_month, "2025-06");
        assert_eq!(summary[2].average_monthly_sales, 0.0);
        assert_eq!(summary[2].peak_month, "");
    }

    #[test]
    fn bubble_sizes_have_a_floor() {
        assert_eq!(bubble_size(0), 10.0);
        assert_eq!(bubble_size(400), 40.0);
    }

    #[test]
    fn year_comparison_uses_the_years_of_the_data() {
        let rows = vec![YearComparison {
            category_name: "Bikes".to_string(),
            year_a: 2013,
            sales_volume_year_a: 100,
            total_sales_year_a: 1000.0,
            year_b: 2012,
            sales_volume_year_b: 25,
            total_sales_year_b: 800.0,
        }];

        let bars = year_comparison_bars(&rows);
        let bubbles = year_comparison_bubbles(&rows);

        assert_eq!(bars.title, "Sales Comparison: 2013 vs 2012");
        assert_eq!(bars.traces[1].y, vec![800.0]);
        assert_eq!(bubbles.traces[0].sizes, vec![20.0]);
        assert_eq!(bubbles.traces[1].sizes, vec![10.0]);
        assert!(year_comparison_bars(&[]).traces.is_empty());
    }

    #[test]
    fn categories_sort_by_any_column() {
        let row = |name: &str, volume: u64| CategoryStatistics {
            category_name: name.to_string(),
            sales_volume: volume,
            total_sales: volume as f64 * 2.0,
            percentage: 0.0,
        };
        let rows = vec![row("Bikes", 5), row("Accessories", 9), row("Clothing", 1)];

        let by_volume = sort_categories(&rows, CategoryColumn::SalesVolume, SortDirection::Desc);
        let by_name = sort_categories(&rows, CategoryColumn::Name, SortDirection::Asc);

        assert_eq!(by_volume[0].category_name, "Accessories");
        assert_eq!(by_name[0].category_name, "Accessories");
        assert_eq!(by_name[2].category_name, "Clothing");
        assert_eq!(category_pie(&rows).values, vec![5, 9, 1]);
    }

    #[test]
    fn metric_series_picks_the_metric_column() {
        let rows = vec![DepartmentSalary {
            department_name: "Engineering".to_string(),
            employee_count: 12,
            total_salary: 1200.0,
            average_salary: 100.0,
            min_salary: 50.0,
            max_salary: 150.0,
        }];

        let series = department_metric_series(&rows, SalaryMetric::EmployeeCount, ChartType::Bar);

        assert_eq!(series.y, vec![12.0]);
        assert_eq!(series.y_axis_title, "Number of Employees");
        assert_eq!(series.title, "Employee Count by Department");
        assert_eq!(series.color, "#4caf50");
    }
}
