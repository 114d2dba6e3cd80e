//! Paged results, page bounds and pager navigation.
//!
//! Page indices are zero-based everywhere inside the crate; only the values
//! shown to the user (pager labels, the goto input) are one-based.

use serde::{Deserialize, Serialize};

use crate::query::{PAGE_SIZE_OPTIONS, QueryError};

/// Builds the compact one-based pager strip: edge pages, a window around the
/// current page, and `None` where pages are skipped.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One page of a larger result set, as served by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage<T> {
    pub content: Vec<T>,
    pub total_elements: usize,
    pub total_pages: usize,
    /// Zero-based index of this page.
    pub number: usize,
    pub size: usize,
    pub first: bool,
    pub last: bool,
}

impl<T> ResultPage<T> {
    /// Builds a page, deriving page count and boundary flags.
    pub fn new(content: Vec<T>, number: usize, size: usize, total_elements: usize) -> Self {
        let size = size.max(content.len()).max(1);
        let total_pages = total_elements.div_ceil(size);
        Self {
            content,
            total_elements,
            total_pages,
            number,
            size,
            first: number == 0,
            last: number.saturating_add(1) >= total_pages,
        }
    }

    pub fn empty(size: usize) -> Self {
        Self::new(Vec::new(), 0, size, 0)
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            page: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}

/// Lenient wire shape: several backend endpoints only send `content` and
/// `totalElements`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePage<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: Option<usize>,
    #[serde(default)]
    pub total_pages: Option<usize>,
    #[serde(default)]
    pub number: Option<usize>,
    #[serde(default)]
    pub size: Option<usize>,
}

impl<T> WirePage<T> {
    /// Fills the missing fields from the request that produced this page.
    pub fn into_page(self, requested_page: usize, requested_size: usize) -> ResultPage<T> {
        let total_elements = self.total_elements.unwrap_or(self.content.len());
        let number = self.number.unwrap_or(requested_page);
        let size = self
            .size
            .filter(|size| *size > 0)
            .unwrap_or(requested_size)
            .max(self.content.len())
            .max(1);
        let total_pages = self
            .total_pages
            .unwrap_or_else(|| total_elements.div_ceil(size));

        ResultPage {
            content: self.content,
            total_elements,
            total_pages,
            number,
            size,
            first: number == 0,
            last: number.saturating_add(1) >= total_pages,
        }
    }
}

/// Position of a page inside its result set.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
    pub first: bool,
    pub last: bool,
}

impl PageInfo {
    pub fn new(page: usize, size: usize, total_elements: usize) -> Self {
        let size = size.max(1);
        let total_pages = total_elements.div_ceil(size);
        Self {
            page,
            size,
            total_elements,
            total_pages,
            first: page == 0,
            last: page.saturating_add(1) >= total_pages,
        }
    }
}

/// One-based item range shown as "21–25 of 25".
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PageBounds {
    pub start_item: usize,
    pub end_item: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    First,
    Prev,
    Next,
    Last,
    /// Raw one-based page number typed by the user.
    Goto(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// Move to the given zero-based page.
    Navigate { page: usize },
    /// Nothing to do; no request is issued.
    NoOp,
    /// Invalid goto input. `display` is the one-based current page the input
    /// is reset to.
    Rejected { input: String, display: usize },
}

/// Translates pager interactions into page indices.
#[derive(Debug, Clone, Copy)]
pub struct PaginationController {
    page_size_options: &'static [usize],
}

impl Default for PaginationController {
    fn default() -> Self {
        Self {
            page_size_options: &PAGE_SIZE_OPTIONS,
        }
    }
}

impl PaginationController {
    pub fn new(page_size_options: &'static [usize]) -> Self {
        Self { page_size_options }
    }

    pub fn page_size_options(&self) -> &'static [usize] {
        self.page_size_options
    }

    pub fn compute_bounds(&self, info: &PageInfo) -> PageBounds {
        if info.total_elements == 0 {
            return PageBounds {
                start_item: 0,
                end_item: 0,
            };
        }
        let start = info.page.saturating_mul(info.size);
        PageBounds {
            start_item: start.saturating_add(1),
            end_item: start.saturating_add(info.size).min(info.total_elements),
        }
    }

    pub fn navigate(&self, action: &NavigationAction, info: &PageInfo) -> NavigationEvent {
        match action {
            NavigationAction::First | NavigationAction::Prev if info.first => NavigationEvent::NoOp,
            NavigationAction::Next | NavigationAction::Last if info.last => NavigationEvent::NoOp,
            NavigationAction::First => NavigationEvent::Navigate { page: 0 },
            NavigationAction::Prev => NavigationEvent::Navigate {
                page: info.page.saturating_sub(1),
            },
            NavigationAction::Next => NavigationEvent::Navigate {
                page: info.page + 1,
            },
            NavigationAction::Last => NavigationEvent::Navigate {
                page: info.total_pages.saturating_sub(1),
            },
            NavigationAction::Goto(input) => match self.goto_target(input, info) {
                Ok(page) if page == info.page => NavigationEvent::NoOp,
                Ok(page) => NavigationEvent::Navigate { page },
                Err(_) => {
                    log::warn!("Rejected page input `{input}`");
                    NavigationEvent::Rejected {
                        input: input.clone(),
                        display: info.page + 1,
                    }
                }
            },
        }
    }

    /// Validates a one-based page number typed by the user and returns the
    /// zero-based index.
    pub fn goto_target(&self, input: &str, info: &PageInfo) -> Result<usize, QueryError> {
        input
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|target| (1..=info.total_pages).contains(target))
            .map(|target| target - 1)
            .ok_or_else(|| QueryError::InvalidPageInput(input.to_string()))
    }

    /// Page index whose first item is closest to the first item now visible.
    pub fn on_page_size_change(&self, info: &PageInfo, new_size: usize) -> Result<usize, QueryError> {
        if new_size == 0
            || (!self.page_size_options.is_empty() && !self.page_size_options.contains(&new_size))
        {
            return Err(QueryError::InvalidPageSize(new_size as i64));
        }
        let first_item_index = info.page.checked_mul(info.size).ok_or_else(|| {
            QueryError::PageOutOfRange(i64::try_from(info.page).unwrap_or(i64::MAX))
        })?;
        Ok(first_item_index / new_size)
    }

    pub fn page_links(&self, info: &PageInfo) -> Vec<Option<usize>> {
        get_pages(info.total_pages, info.page + 1, 2, 2, 4, 2)
    }
}

/// Template-ready page: items plus everything the pager needs.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// One-based pager strip, `None` marks a gap.
    pub pages: Vec<Option<usize>>,
    /// One-based current page for display.
    pub page: usize,
    pub info: PageInfo,
    pub bounds: PageBounds,
    /// Zero-based navigation targets; `None` disables the control.
    pub first: Option<usize>,
    pub prev: Option<usize>,
    pub next: Option<usize>,
    pub last: Option<usize>,
    pub page_size_options: &'static [usize],
}

impl<T> Paginated<T> {
    pub fn new(result: ResultPage<T>, controller: &PaginationController) -> Self {
        let info = result.info();
        let target = |action: NavigationAction| match controller.navigate(&action, &info) {
            NavigationEvent::Navigate { page } => Some(page),
            _ => None,
        };

        Self {
            pages: controller.page_links(&info),
            page: info.page + 1,
            bounds: controller.compute_bounds(&info),
            first: target(NavigationAction::First),
            prev: target(NavigationAction::Prev),
            next: target(NavigationAction::Next),
            last: target(NavigationAction::Last),
            page_size_options: controller.page_size_options(),
            info,
            items: result.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PaginationController {
        PaginationController::default()
    }

    #[test]
    fn bounds_of_an_empty_result_are_zero() {
        let bounds = controller().compute_bounds(&PageInfo::new(0, 10, 0));
        assert_eq!(
            bounds,
            PageBounds {
                start_item: 0,
                end_item: 0
            }
        );
    }

    #[test]
    fn bounds_of_a_partial_last_page() {
        let bounds = controller().compute_bounds(&PageInfo::new(2, 10, 25));
        assert_eq!(
            bounds,
            PageBounds {
                start_item: 21,
                end_item: 25
            }
        );
    }

    #[test]
    fn page_flags_follow_the_number() {
        let page = ResultPage::new(vec![1, 2, 3], 0, 10, 3);
        assert!(page.first && page.last);
        assert_eq!(page.total_pages, 1);

        let empty: ResultPage<u8> = ResultPage::empty(10);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.first && empty.last);

        let middle: ResultPage<u8> = ResultPage::new(vec![0; 10], 2, 10, 47);
        assert!(!middle.first && !middle.last);
    }

    #[test]
    fn last_then_next_is_a_no_op() {
        let controller = controller();
        let info = PageInfo::new(0, 10, 47);
        assert_eq!(info.total_pages, 5);

        let NavigationEvent::Navigate { page } = controller.navigate(&NavigationAction::Last, &info)
        else {
            panic!("expected navigation");
        };
        assert_eq!(page, 4);

        let on_last = PageInfo::new(page, 10, 47);
        assert_eq!(
            controller.navigate(&NavigationAction::Next, &on_last),
            NavigationEvent::NoOp
        );
        assert_eq!(
            controller.navigate(&NavigationAction::Last, &on_last),
            NavigationEvent::NoOp
        );
    }

    #[test]
    fn first_and_prev_are_no_ops_on_the_first_page() {
        let controller = controller();
        let info = PageInfo::new(0, 10, 47);
        assert_eq!(
            controller.navigate(&NavigationAction::First, &info),
            NavigationEvent::NoOp
        );
        assert_eq!(
            controller.navigate(&NavigationAction::Prev, &info),
            NavigationEvent::NoOp
        );
        assert_eq!(
            controller.navigate(&NavigationAction::Prev, &PageInfo::new(3, 10, 47)),
            NavigationEvent::Navigate { page: 2 }
        );
    }

    #[test]
    fn goto_accepts_one_based_numbers_in_range() {
        let controller = controller();
        let info = PageInfo::new(1, 10, 47);

        assert_eq!(
            controller.navigate(&NavigationAction::Goto(" 5 ".to_string()), &info),
            NavigationEvent::Navigate { page: 4 }
        );
        assert_eq!(
            controller.navigate(&NavigationAction::Goto("2".to_string()), &info),
            NavigationEvent::NoOp
        );
    }

    #[test]
    fn goto_rejects_invalid_input_and_resets_display() {
        let controller = controller();
        let info = PageInfo::new(1, 10, 47);

        for input in ["0", "6", "-1", "two", ""] {
            assert_eq!(
                controller.navigate(&NavigationAction::Goto(input.to_string()), &info),
                NavigationEvent::Rejected {
                    input: input.to_string(),
                    display: 2
                }
            );
        }
    }

    #[test]
    fn page_size_change_keeps_the_first_visible_item_in_view() {
        let controller = controller();
        assert_eq!(
            controller.on_page_size_change(&PageInfo::new(2, 10, 100), 25),
            Ok(0)
        );
        assert_eq!(
            controller.on_page_size_change(&PageInfo::new(7, 10, 100), 25),
            Ok(2)
        );
        assert_eq!(
            controller.on_page_size_change(&PageInfo::new(1, 50, 100), 5),
            Ok(10)
        );
        assert!(controller.on_page_size_change(&PageInfo::new(1, 10, 100), 7).is_err());
    }

    #[test]
    fn huge_page_indices_do_not_overflow() {
        let controller = controller();
        let info = PageInfo::new(usize::MAX / 2, 50, 100);

        assert_eq!(
            controller.on_page_size_change(&info, 25),
            Err(QueryError::PageOutOfRange(i64::MAX))
        );
        let bounds = controller.compute_bounds(&info);
        assert_eq!(bounds.end_item, 100);
    }

    #[test]
    fn wire_page_without_metadata_is_normalized() {
        let wire: WirePage<u32> =
            serde_json::from_str(r#"{"content":[1,2,3],"totalElements":23}"#).unwrap();

        let page = wire.into_page(2, 10);

        assert_eq!(page.number, 2);
        assert_eq!(page.total_pages, 3);
        assert!(!page.first);
        assert!(page.last);
    }

    #[test]
    fn pager_strip_collapses_distant_pages() {
        assert_eq!(get_pages(0, 1, 2, 2, 4, 2), Vec::<Option<usize>>::new());
        assert_eq!(
            get_pages(3, 1, 2, 2, 4, 2),
            vec![Some(1), Some(2), Some(3)]
        );
        assert_eq!(
            get_pages(20, 10, 2, 2, 4, 2),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20)
            ]
        );
    }

    #[test]
    fn paginated_disables_unavailable_controls() {
        let page = ResultPage::new(vec!["a"; 10], 0, 10, 47);
        let paginated = Paginated::new(page, &controller());

        assert_eq!(paginated.page, 1);
        assert_eq!(paginated.first, None);
        assert_eq!(paginated.prev, None);
        assert_eq!(paginated.next, Some(1));
        assert_eq!(paginated.last, Some(4));
        assert_eq!(paginated.bounds.end_item, 10);
    }
}
