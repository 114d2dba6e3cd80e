//! Shared flow of every paginated list page.
//!
//! The query string carries the complete [`crate::query::QueryState`] of the
//! page the user was looking at (criteria, sort, page, size and the total it
//! reported). It is replayed into a fresh [`ListView`], the requested pager
//! action is applied and exactly one backend request is issued.

use std::future::Future;

use crate::dto::listing::{ListPage, ListQuery, SearchEcho};
use crate::list_view::{Completion, ListView, RequestTicket};
use crate::pagination::{NavigationAction, PageInfo, PaginationController, ResultPage};
use crate::query::{ListRequest, QueryError, SearchConfig, Sort};
use crate::repository::errors::RepositoryResult;

fn parse_number(value: &str) -> Result<i64, QueryError> {
    value
        .parse::<i64>()
        .map_err(|_| QueryError::InvalidPageInput(value.to_string()))
}

/// Page size of the query: the configured default or one of the selector
/// options.
fn page_size(query: &ListQuery, default_size: usize) -> Result<usize, QueryError> {
    let Some(raw) = query.size() else {
        return Ok(default_size);
    };
    let size = parse_number(raw)?;
    usize::try_from(size)
        .ok()
        .filter(|size| {
            *size == default_size
                || PaginationController::default()
                    .page_size_options()
                    .contains(size)
        })
        .ok_or(QueryError::InvalidPageSize(size))
}

/// Rebuilds the view state from the query string.
fn restore_state<T>(view: &mut ListView<T>, query: &ListQuery, size: usize) -> Result<(), QueryError> {
    if let Some(sort) = query.sort() {
        view.sort_by(Some(sort.parse::<Sort>()?));
    }

    let criteria = query.criteria(view.config());
    if !criteria.is_blank() {
        view.search(criteria);
    }

    let page = query.page().map(parse_number).transpose()?;
    match (query.total(), page) {
        (Some(total), page) => {
            let total = usize::try_from(parse_number(total)?)
                .map_err(|_| QueryError::InvalidPageInput(total.to_string()))?;
            let page = page.unwrap_or(0);
            let page = usize::try_from(page).map_err(|_| QueryError::NegativePage(page))?;
            view.restore(PageInfo::new(page, size, total))
        }
        (None, Some(page)) => view.go_to(page, size as i64).map(|_| ()),
        (None, None) => Ok(()),
    }
}

/// Applies the pager action of the query, if any.
fn requested_ticket<T>(
    view: &mut ListView<T>,
    query: &ListQuery,
) -> Result<Option<RequestTicket>, QueryError> {
    if let Some(goto) = query.goto() {
        return view.navigate(&NavigationAction::Goto(goto.to_string()));
    }
    if let Some(resize) = query.resize() {
        let size = usize::try_from(parse_number(resize)?)
            .map_err(|_| QueryError::InvalidPageSize(-1))?;
        return view.change_page_size(size).map(Some);
    }
    Ok(None)
}

fn encode(pairs: &[(String, String)]) -> String {
    serde_html_form::to_string(pairs).unwrap_or_default()
}

/// Loads one page of `config`'s resource as described by `query`.
///
/// Invalid pager input is rejected locally: the state is left as it was and
/// the current page is shown again with a notice. Backend failures produce
/// an empty table with `load_error` set.
pub async fn load_list<T, F, Fut>(
    config: SearchConfig,
    query: &ListQuery,
    default_size: usize,
    fetch: F,
) -> ListPage<T>
where
    F: FnOnce(ListRequest) -> Fut,
    Fut: Future<Output = RepositoryResult<ResultPage<T>>>,
{
    let mut notice = None;
    let size = match page_size(query, default_size) {
        Ok(size) => size,
        Err(err) => {
            log::warn!("Ignoring page size of {} list: {err}", config.resource);
            notice = Some(err.to_string());
            default_size
        }
    };

    let mut view = ListView::new(config, size);
    if let Err(err) = restore_state(&mut view, query, size) {
        log::warn!("Rejected {} list state: {err}", config.resource);
        notice = Some(err.to_string());
    }

    let ticket = match requested_ticket(&mut view, query) {
        Ok(Some(ticket)) => ticket,
        Ok(None) => view.reload(),
        Err(err) => {
            log::warn!("Rejected {} pager input: {err}", config.resource);
            notice = Some(err.to_string());
            view.reload()
        }
    };

    let load_error = match view.load(ticket, fetch).await {
        Completion::Failed(message) => {
            log::error!("Failed to load {}: {message}", config.resource);
            Some(format!("Failed to load {}", config.resource))
        }
        Completion::Applied | Completion::Stale => None,
    };

    let state = view.state().clone();
    let criteria_params = state
        .criteria
        .as_ref()
        .map(|criteria| {
            let mut params = Vec::new();
            if !criteria.search_term.is_empty() {
                params.push(("q".to_string(), criteria.search_term.clone()));
                params.push(("type".to_string(), criteria.search_type.clone()));
            }
            params.extend(
                criteria
                    .filters
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone())),
            );
            params
        })
        .unwrap_or_default();
    let mut base_params = criteria_params.clone();
    if let Some(sort) = &state.sort {
        base_params.push(("sort".to_string(), sort.to_string()));
    }

    ListPage {
        search: SearchEcho::new(&config, state.criteria.as_ref()),
        criteria_query: encode(&criteria_params),
        base_query: encode(&base_params),
        criteria_params,
        sort: state.sort,
        notice,
        load_error,
        list: view.into_paginated(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::executor::block_on;

    use super::*;
    use crate::query::{ADDRESS_SEARCH, ORDER_SEARCH};
    use crate::repository::errors::RepositoryError;

    fn query(raw: &str) -> ListQuery {
        serde_html_form::from_str(raw).unwrap()
    }

    /// Serves `total` numbered items and records every request.
    fn serve(
        total: usize,
        seen: &Mutex<Vec<ListRequest>>,
    ) -> impl FnOnce(ListRequest) -> futures::future::Ready<RepositoryResult<ResultPage<usize>>> + '_
    {
        move |request| {
            let start = request.page * request.size;
            let content = (start..(start + request.size).min(total)).collect();
            let page = ResultPage::new(content, request.page, request.size, total);
            seen.lock().unwrap().push(request);
            futures::future::ready(Ok(page))
        }
    }

    #[test]
    fn first_visit_lists_the_first_page() {
        let seen = Mutex::new(Vec::new());

        let page = block_on(load_list(ORDER_SEARCH, &query(""), 10, serve(47, &seen)));

        let requests = seen.into_inner().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "orders");
        assert_eq!(page.list.info.total_pages, 5);
        assert_eq!(page.list.bounds.start_item, 1);
        assert_eq!(page.list.next, Some(1));
        assert_eq!(page.notice, None);
    }

    #[test]
    fn search_uses_the_search_endpoint_and_is_echoed() {
        let seen = Mutex::new(Vec::new());

        let page = block_on(load_list(
            ADDRESS_SEARCH,
            &query("q=+Main+&type=general&city=Paris&sort=city,desc&page=3"),
            10,
            serve(5, &seen),
        ));

        let requests = seen.into_inner().unwrap();
        assert_eq!(requests[0].path, "addresses/search");
        assert!(
            requests[0]
                .params()
                .contains(&("q".to_string(), "Main".to_string()))
        );
        assert_eq!(page.search.term, "Main");
        assert!(page.search.active);
        assert_eq!(
            page.base_query,
            "q=Main&type=general&city=Paris&sort=city%2Cdesc"
        );
    }

    #[test]
    fn page_past_the_end_is_clamped_to_the_last_page() {
        let seen = Mutex::new(Vec::new());

        block_on(load_list(
            ORDER_SEARCH,
            &query("page=9&size=10&total=47"),
            10,
            serve(47, &seen),
        ));

        assert_eq!(seen.into_inner().unwrap()[0].page, 4);
    }

    #[test]
    fn invalid_goto_keeps_the_current_page() {
        let seen = Mutex::new(Vec::new());

        let page = block_on(load_list(
            ORDER_SEARCH,
            &query("page=2&size=10&total=47&goto=99"),
            10,
            serve(47, &seen),
        ));

        assert_eq!(seen.into_inner().unwrap()[0].page, 2);
        assert_eq!(page.list.page, 3);
        assert!(page.notice.is_some());
    }

    #[test]
    fn unsupported_page_size_falls_back_to_the_default() {
        let seen = Mutex::new(Vec::new());

        let page = block_on(load_list(
            ORDER_SEARCH,
            &query("size=100000000"),
            10,
            serve(47, &seen),
        ));

        assert_eq!(seen.into_inner().unwrap()[0].size, 10);
        assert_eq!(page.notice.as_deref(), Some("unsupported page size: 100000000"));
    }

    #[test]
    fn huge_page_without_total_is_rejected() {
        let seen = Mutex::new(Vec::new());

        let page = block_on(load_list(
            ORDER_SEARCH,
            &query("page=9223372036854775807&size=50&resize=25"),
            10,
            serve(47, &seen),
        ));

        let requests = seen.into_inner().unwrap();
        assert_eq!((requests[0].page, requests[0].size), (0, 25));
        assert!(page.notice.is_some());
    }

    #[test]
    fn goto_and_resize_move_the_view() {
        let seen = Mutex::new(Vec::new());
        block_on(load_list(
            ORDER_SEARCH,
            &query("page=0&size=10&total=47&goto=4"),
            10,
            serve(47, &seen),
        ));
        block_on(load_list(
            ORDER_SEARCH,
            &query("page=2&size=10&total=47&resize=25"),
            10,
            serve(47, &seen),
        ));

        let requests = seen.into_inner().unwrap();
        assert_eq!((requests[0].page, requests[0].size), (3, 10));
        assert_eq!((requests[1].page, requests[1].size), (0, 25));
    }

    #[test]
    fn backend_failure_renders_an_empty_table() {
        let page = block_on(load_list(ADDRESS_SEARCH, &query(""), 10, |_| {
            futures::future::ready(Err::<ResultPage<usize>, _>(RepositoryError::Timeout))
        }));

        assert_eq!(page.load_error.as_deref(), Some("Failed to load addresses"));
        assert!(page.list.items.is_empty());
        assert_eq!(page.list.bounds.start_item, 0);
    }
}
