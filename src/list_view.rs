//! One list view: query state, pager and the latest applied result.
//!
//! Every transition hands out a [`RequestTicket`] stamped with a sequence
//! number. Completions are applied in issue order only; a response older
//! than the last settled one is dropped.

use std::fmt::Display;
use std::future::Future;

use crate::pagination::{
    NavigationAction, NavigationEvent, PageInfo, PaginationController, Paginated, ResultPage,
};
use crate::query::{
    ListRequest, QueryError, QueryState, QueryStateManager, SearchConfig, SearchCriteria, Sort,
};

/// Request issued by a transition, to be completed with its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub request: ListRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request already settled; the response was dropped.
    Stale,
    /// The request failed; the previous page is kept.
    Failed(String),
}

pub struct ListView<T> {
    manager: QueryStateManager,
    controller: PaginationController,
    next_seq: u64,
    last_settled: Option<u64>,
    known: Option<PageInfo>,
    page: Option<ResultPage<T>>,
    error: Option<String>,
}

impl<T> ListView<T> {
    pub fn new(config: SearchConfig, size: usize) -> Self {
        Self {
            manager: QueryStateManager::new(config, size),
            controller: PaginationController::default(),
            next_seq: 1,
            last_settled: None,
            known: None,
            page: None,
            error: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        self.manager.config()
    }

    pub fn state(&self) -> &QueryState {
        self.manager.current_state()
    }

    pub fn controller(&self) -> &PaginationController {
        &self.controller
    }

    pub fn page(&self) -> Option<&ResultPage<T>> {
        self.page.as_ref()
    }

    /// Position of the last applied or restored result.
    pub fn page_info(&self) -> Option<PageInfo> {
        self.known
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Restores the position of a result shown earlier, e.g. from the totals
    /// echoed back by a submitted pager form.
    pub fn restore(&mut self, info: PageInfo) -> Result<(), QueryError> {
        self.manager.observe(&info);
        let state = self.manager.set_page(info.page as i64, info.size as i64)?;
        self.known = Some(PageInfo::new(state.page, state.size, info.total_elements));
        Ok(())
    }

    fn issue(&mut self) -> RequestTicket {
        let seq = self.next_seq;
        self.next_seq += 1;
        RequestTicket {
            seq,
            request: self.manager.request(),
        }
    }

    /// Ticket for the current state without changing it.
    pub fn reload(&mut self) -> RequestTicket {
        self.issue()
    }

    pub fn search(&mut self, criteria: SearchCriteria) -> RequestTicket {
        self.manager.apply_search(criteria);
        self.issue()
    }

    pub fn clear_search(&mut self) -> RequestTicket {
        self.manager.clear_search();
        self.issue()
    }

    pub fn sort_by(&mut self, sort: Option<Sort>) -> RequestTicket {
        self.manager.set_sort(sort);
        self.issue()
    }

    pub fn go_to(&mut self, page: i64, size: i64) -> Result<RequestTicket, QueryError> {
        self.manager.set_page(page, size)?;
        Ok(self.issue())
    }

    /// Applies a pager action. `Ok(None)` means nothing to do.
    pub fn navigate(
        &mut self,
        action: &NavigationAction,
    ) -> Result<Option<RequestTicket>, QueryError> {
        let Some(info) = self.known else {
            return Ok(None);
        };
        match self.controller.navigate(action, &info) {
            NavigationEvent::Navigate { page } => {
                self.manager.set_page(page as i64, info.size as i64)?;
                Ok(Some(self.issue()))
            }
            NavigationEvent::NoOp => Ok(None),
            NavigationEvent::Rejected { input, .. } => Err(QueryError::InvalidPageInput(input)),
        }
    }

    /// Switches the page size, keeping the first visible item in view.
    pub fn change_page_size(&mut self, new_size: usize) -> Result<RequestTicket, QueryError> {
        let info = self.known.unwrap_or_else(|| {
            let state = self.manager.current_state();
            PageInfo::new(state.page, state.size, 0)
        });
        let page = self.controller.on_page_size_change(&info, new_size)?;
        self.manager.set_page(page as i64, new_size as i64)?;
        Ok(self.issue())
    }

    /// Applies the response of `ticket` unless a newer one already settled.
    ///
    /// Failed responses count as settled too: once a newer request fails, an
    /// older success arriving later is `Stale` and the view keeps the page it
    /// showed before either request.
    pub fn complete<E: Display>(
        &mut self,
        ticket: &RequestTicket,
        result: Result<ResultPage<T>, E>,
    ) -> Completion {
        if self.last_settled.is_some_and(|last| ticket.seq <= last) {
            log::warn!(
                "Discarding stale response #{} for {}",
                ticket.seq,
                ticket.request.path
            );
            return Completion::Stale;
        }
        self.last_settled = Some(ticket.seq);

        match result {
            Ok(page) => {
                let info = page.info();
                self.manager.observe(&info);
                self.known = Some(info);
                self.page = Some(page);
                self.error = None;
                Completion::Applied
            }
            Err(err) => {
                let message = err.to_string();
                self.error = Some(message.clone());
                Completion::Failed(message)
            }
        }
    }

    /// Runs `fetch` for `ticket` and applies its outcome.
    pub async fn load<F, Fut, E>(&mut self, ticket: RequestTicket, fetch: F) -> Completion
    where
        F: FnOnce(ListRequest) -> Fut,
        Fut: Future<Output = Result<ResultPage<T>, E>>,
        E: Display,
    {
        let result = fetch(ticket.request.clone()).await;
        self.complete(&ticket, result)
    }

    /// Template-ready view of the current page, empty when nothing loaded.
    pub fn into_paginated(self) -> Paginated<T> {
        let size = self.manager.current_state().size;
        let page = self.page.unwrap_or_else(|| ResultPage::empty(size));
        Paginated::new(page, &self.controller)
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::query::ADDRESS_SEARCH;

    fn page(items: Vec<u32>, number: usize, total: usize) -> ResultPage<u32> {
        ResultPage::new(items, number, 10, total)
    }

    #[test]
    fn older_response_never_overwrites_newer_state() {
        let mut view: ListView<u32> = ListView::new(ADDRESS_SEARCH, 10);
        let tickets: Vec<_> = (0..5)
            .map(|i| view.search(SearchCriteria::new(format!("term {i}"))))
            .collect();
        assert_eq!(tickets[4].seq, 5);

        assert_eq!(
            view.complete(&tickets[4], Ok::<_, String>(page(vec![5], 0, 1))),
            Completion::Applied
        );
        assert_eq!(
            view.complete(&tickets[2], Ok::<_, String>(page(vec![3], 0, 1))),
            Completion::Stale
        );

        assert_eq!(view.page().unwrap().content, vec![5]);
    }

    #[test]
    fn failure_keeps_previous_page_and_reports_the_error() {
        let mut view: ListView<u32> = ListView::new(ADDRESS_SEARCH, 10);
        let first = view.reload();
        view.complete(&first, Ok::<_, String>(page(vec![1, 2], 0, 2)));

        let second = view.reload();
        let outcome = view.complete(&second, Err("Failed to load addresses"));

        assert_eq!(outcome, Completion::Failed("Failed to load addresses".to_string()));
        assert_eq!(view.page().unwrap().content, vec![1, 2]);
        assert_eq!(view.error(), Some("Failed to load addresses"));
    }

    #[test]
    fn older_success_after_a_newer_failure_is_stale() {
        let mut view: ListView<u32> = ListView::new(ADDRESS_SEARCH, 10);
        let shown = view.reload();
        view.complete(&shown, Ok::<_, String>(page(vec![1], 0, 1)));

        let older = view.search(SearchCriteria::new("Elm"));
        let newer = view.search(SearchCriteria::new("Oak"));
        view.complete(&newer, Err("timeout"));

        assert_eq!(
            view.complete(&older, Ok::<_, String>(page(vec![2], 0, 1))),
            Completion::Stale
        );
        assert_eq!(view.page().unwrap().content, vec![1]);
    }

    #[test]
    fn navigation_uses_the_last_known_result() {
        let mut view: ListView<u32> = ListView::new(ADDRESS_SEARCH, 10);
        assert_eq!(view.navigate(&NavigationAction::Next), Ok(None));

        let ticket = view.reload();
        view.complete(&ticket, Ok::<_, String>(page(vec![0; 10], 0, 47)));

        let last = view.navigate(&NavigationAction::Last).unwrap().unwrap();
        assert_eq!(last.request.page, 4);

        view.complete(&last, Ok::<_, String>(page(vec![0; 7], 4, 47)));
        assert_eq!(view.navigate(&NavigationAction::Next), Ok(None));
        assert_eq!(
            view.navigate(&NavigationAction::Goto("9".to_string())),
            Err(QueryError::InvalidPageInput("9".to_string()))
        );
        assert_eq!(view.state().page, 4);
    }

    #[test]
    fn page_size_change_moves_to_the_page_holding_the_first_item() {
        let mut view: ListView<u32> = ListView::new(ADDRESS_SEARCH, 10);
        view.restore(PageInfo::new(2, 10, 100)).unwrap();

        let ticket = view.change_page_size(25).unwrap();

        assert_eq!((ticket.request.page, ticket.request.size), (0, 25));
        assert!(view.change_page_size(30).is_err());
    }

    #[test]
    fn load_applies_the_fetched_page() {
        let mut view: ListView<u32> = ListView::new(ADDRESS_SEARCH, 10);
        let ticket = view.search(SearchCriteria::new("Elm"));

        let outcome = block_on(view.load(ticket, |request| async move {
            assert_eq!(request.path, "addresses/search");
            Ok::<_, String>(ResultPage::new(vec![7], request.page, request.size, 1))
        }));

        assert_eq!(outcome, Completion::Applied);
        let paginated = view.into_paginated();
        assert_eq!(paginated.items, vec![7]);
        assert_eq!(paginated.bounds.start_item, 1);
    }
}
