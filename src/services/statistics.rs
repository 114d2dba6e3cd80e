//! Statistics dashboard backed by the shared report cache.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::cache::{CacheKey, PagedResultCache};
use crate::charts::{
    CategoryColumn, category_pie, department_metric_series, sort_categories,
    subcategory_monthly_bars, subcategory_summary, year_comparison_bars, year_comparison_bubbles,
};
use crate::domain::statistics::{
    CategoryStatistics, ChartType, DepartmentSalary, ReportRange, SalaryMetric,
    SubcategoryStatistics, YearComparison,
};
use crate::dto::statistics::{
    CategorySection, DashboardData, DepartmentSection, StatisticsQuery, SubcategorySection,
    YearSection,
};
use crate::export::department_salaries_csv;
use crate::forms::parse_form;
use crate::forms::statistics::ReportForm;
use crate::query::SortDirection;
use crate::repository::StatisticsReader;
use crate::repository::errors::RepositoryError;
use crate::services::{ServiceError, ServiceResult};

const CATEGORY_SALES: &str = "statistics/category-sales";
const SUBCATEGORY_SALES: &str = "statistics/subcategory-sales";
const YEAR_COMPARISON: &str = "statistics/year-comparison";
const DEPARTMENT_SALARIES: &str = "statistics/department-salaries";

pub const DEFAULT_YEAR_A: i32 = 2024;
pub const DEFAULT_YEAR_B: i32 = 2025;

/// Distinct parameter sets remembered per report.
pub const REPORT_CACHE_CAPACITY: usize = 32;

type ReportSlot<T> = PagedResultCache<Vec<T>, RepositoryError>;

/// Process-wide cache of report responses, one slot per report.
///
/// Owned by the application state. Entries live until
/// [`Self::invalidate_range`] drops them or a slot exceeds
/// [`REPORT_CACHE_CAPACITY`] keys and evicts its oldest.
pub struct ReportCache {
    categories: ReportSlot<CategoryStatistics>,
    subcategories: ReportSlot<SubcategoryStatistics>,
    years: ReportSlot<YearComparison>,
    departments: ReportSlot<DepartmentSalary>,
}

fn range_key(endpoint: &str, range: &ReportRange) -> CacheKey {
    let (from, to) = range.query_values();
    CacheKey::new(endpoint).filter("from", from).filter("to", to)
}

impl Default for ReportCache {
    fn default() -> Self {
        Self {
            categories: PagedResultCache::with_capacity(REPORT_CACHE_CAPACITY),
            subcategories: PagedResultCache::with_capacity(REPORT_CACHE_CAPACITY),
            years: PagedResultCache::with_capacity(REPORT_CACHE_CAPACITY),
            departments: PagedResultCache::with_capacity(REPORT_CACHE_CAPACITY),
        }
    }
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every cached report computed for `range` together with every
    /// failed report, whatever its parameters. Returns how many entries were
    /// removed.
    pub fn invalidate_range(&self, range: &ReportRange) -> usize {
        let (from, to) = range.query_values();
        // `from` and `to` sort last among the filters of every range report.
        let suffix = format!("from={from}&to={to}");
        let matches = |key: &str| key.ends_with(&suffix);
        self.categories.invalidate_where(matches)
            + self.subcategories.invalidate_where(matches)
            + self.departments.invalidate_where(matches)
            + self.categories.invalidate_failed()
            + self.subcategories.invalidate_failed()
            + self.years.invalidate_failed()
            + self.departments.invalidate_failed()
    }

    pub fn len(&self) -> usize {
        self.categories.len() + self.subcategories.len() + self.years.len() + self.departments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn category_sales<R>(
        &self,
        repo: &Arc<R>,
        range: ReportRange,
    ) -> Result<Vec<CategoryStatistics>, RepositoryError>
    where
        R: StatisticsReader + Send + Sync + 'static,
    {
        let key = range_key(CATEGORY_SALES, &range).to_string();
        let repo = Arc::clone(repo);
        self.categories
            .get(&key, move || async move { repo.category_sales(range).await })
            .await
    }

    async fn subcategory_sales<R>(
        &self,
        repo: &Arc<R>,
        category: Option<String>,
        range: ReportRange,
    ) -> Result<Vec<SubcategoryStatistics>, RepositoryError>
    where
        R: StatisticsReader + Send + Sync + 'static,
    {
        let mut key = range_key(SUBCATEGORY_SALES, &range);
        if let Some(category) = &category {
            key = key.filter("categoryName", category);
        }
        let repo = Arc::clone(repo);
        self.subcategories
            .get(&key.to_string(), move || async move {
                repo.subcategory_sales(category, range).await
            })
            .await
    }

    async fn year_comparison<R>(
        &self,
        repo: &Arc<R>,
        year_a: i32,
        year_b: i32,
    ) -> Result<Vec<YearComparison>, RepositoryError>
    where
        R: StatisticsReader + Send + Sync + 'static,
    {
        let key = CacheKey::new(YEAR_COMPARISON)
            .filter("yearA", year_a.to_string())
            .filter("yearB", year_b.to_string())
            .to_string();
        let repo = Arc::clone(repo);
        self.years
            .get(&key, move || async move {
                repo.year_comparison(year_a, year_b).await
            })
            .await
    }

    async fn department_salaries<R>(
        &self,
        repo: &Arc<R>,
        range: ReportRange,
    ) -> Result<Vec<DepartmentSalary>, RepositoryError>
    where
        R: StatisticsReader + Send + Sync + 'static,
    {
        let key = range_key(DEPARTMENT_SALARIES, &range).to_string();
        let repo = Arc::clone(repo);
        self.departments
            .get(&key, move || async move { repo.department_salaries(range).await })
            .await
    }
}

fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_date(value: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ServiceError::Form(format!("Invalid date `{value}`")))
}

/// Report range of the query, June 2025 when absent.
pub fn report_range(query: &StatisticsQuery) -> ServiceResult<ReportRange> {
    let default = ReportRange::default();
    let from = match blank_to_none(&query.from) {
        Some(value) => parse_date(value)?,
        None => default.from,
    };
    let to = match blank_to_none(&query.to) {
        Some(value) => parse_date(value)?,
        None => default.to,
    };
    ReportRange::new(from, to).map_err(|err| ServiceError::Form(err.to_string()))
}

fn parse_choice<T>(value: &Option<String>, default: T) -> ServiceResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match blank_to_none(value) {
        Some(value) => value
            .parse::<T>()
            .map_err(|err| ServiceError::Form(err.to_string())),
        None => Ok(default),
    }
}

fn parse_year(value: &Option<String>, default: i32) -> ServiceResult<i32> {
    parse_choice(value, default)
        .map_err(|_| ServiceError::Form("Years must be numbers".to_string()))
}

/// Loads every dashboard section. A failing report only blanks its section.
pub async fn load_dashboard<R>(
    repo: Arc<R>,
    cache: &ReportCache,
    query: &StatisticsQuery,
) -> ServiceResult<DashboardData>
where
    R: StatisticsReader + Send + Sync + 'static,
{
    let range = report_range(query)?;
    let category = blank_to_none(&query.category).map(str::to_string);
    let year_a = parse_year(&query.year_a, DEFAULT_YEAR_A)?;
    let year_b = parse_year(&query.year_b, DEFAULT_YEAR_B)?;
    let metric = parse_choice(&query.metric, SalaryMetric::default())?;
    let chart_type = parse_choice(&query.chart, ChartType::default())?;
    let sort = blank_to_none(&query.sort)
        .map(CategoryColumn::from_str)
        .transpose()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let direction = match blank_to_none(&query.dir) {
        Some("desc") => SortDirection::Desc,
        _ => SortDirection::Asc,
    };

    let (categories, subcategories, years, departments) = futures::join!(
        cache.category_sales(&repo, range),
        cache.subcategory_sales(&repo, category.clone(), range),
        cache.year_comparison(&repo, year_a, year_b),
        cache.department_salaries(&repo, range),
    );

    let mut errors = Vec::new();
    let mut report = |name: &str, err: &RepositoryError| {
        log::error!("Failed to load {name}: {err}");
        errors.push(format!("Failed to load {name}"));
    };

    let categories = match categories {
        Ok(rows) => Some(rows),
        Err(err) => {
            report("category sales", &err);
            None
        }
    };
    let category_names = categories
        .iter()
        .flatten()
        .map(|row| row.category_name.clone())
        .collect();
    let categories = categories.map(|rows| {
        let rows = match sort {
            Some(column) => sort_categories(&rows, column, direction),
            None => rows,
        };
        CategorySection {
            pie: category_pie(&rows),
            rows,
            sort: blank_to_none(&query.sort).map(str::to_string),
            direction,
        }
    });

    let subcategories = match subcategories {
        Ok(rows) => Some(SubcategorySection {
            category,
            chart: subcategory_monthly_bars(&rows),
            summary: subcategory_summary(&rows),
        }),
        Err(err) => {
            report("subcategory sales", &err);
            None
        }
    };

    let years = match years {
        Ok(rows) => Some(YearSection {
            year_a,
            year_b,
            bars: year_comparison_bars(&rows),
            bubbles: year_comparison_bubbles(&rows),
        }),
        Err(err) => {
            report("year comparison", &err);
            None
        }
    };

    let departments = match departments {
        Ok(rows) => Some(DepartmentSection {
            series: department_metric_series(&rows, metric, chart_type),
            rows,
            metric,
            chart_type,
        }),
        Err(err) => {
            report("department salaries", &err);
            None
        }
    };

    let (from, to) = range.query_values();
    Ok(DashboardData {
        from,
        to,
        categories,
        subcategories,
        years,
        departments,
        category_names,
        metrics: SalaryMetric::ALL
            .iter()
            .map(|metric| (metric.as_str(), metric.label()))
            .collect(),
        chart_types: vec![("area", "Area"), ("line", "Line"), ("bar", "Bar")],
        errors,
    })
}

/// Handles "Run Report": validates the range and drops its cached reports,
/// plus any failed report, so the next dashboard load refetches them.
pub fn run_report(cache: &ReportCache, body: &[u8]) -> ServiceResult<ReportRange> {
    let form: ReportForm = parse_form(body)?;
    let range = ReportRange::try_from(form)?;

    let removed = cache.invalidate_range(&range);
    let (from, to) = range.query_values();
    log::info!("Invalidated {removed} cached reports for {from}..{to}");

    Ok(range)
}

/// Department salary CSV for the query's range; `None` when there is no data.
pub async fn export_department_salaries<R>(
    repo: Arc<R>,
    cache: &ReportCache,
    query: &StatisticsQuery,
) -> ServiceResult<Option<Vec<u8>>>
where
    R: StatisticsReader + Send + Sync + 'static,
{
    let range = report_range(query)?;
    let rows = cache.department_salaries(&repo, range).await.map_err(|err| {
        log::error!("Failed to load department salaries: {err}");
        ServiceError::from(err)
    })?;
    Ok(department_salaries_csv(&rows)?)
}
