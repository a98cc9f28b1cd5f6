// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ListRecord, QueryService, RecordId};

pub const FIRST_PAGE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Page, sort and filter state for one list. Every mutation other than
/// page navigation puts the query back on the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    page_num: u32,
    page_size: u32,
    sort: Option<SortSpec>,
    filters: BTreeMap<String, String>,
}

impl PageQuery {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_num: FIRST_PAGE,
            page_size: page_size.max(1),
            sort: None,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_sort(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec {
            field: field.to_owned(),
            direction,
        });
        self
    }

    pub fn with_filter(mut self, name: &str, value: &str) -> Self {
        self.filters.insert(name.to_owned(), value.to_owned());
        self
    }

    pub fn page_num(&self) -> u32 {
        self.page_num
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn sort_field(&self) -> &str {
        self.sort.as_ref().map_or("", |sort| sort.field.as_str())
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort
            .as_ref()
            .map_or(SortDirection::default(), |sort| sort.direction)
    }

    /// Value of a named filter; unset filters read as empty ("all").
    pub fn filter(&self, name: &str) -> &str {
        self.filters.get(name).map_or("", String::as_str)
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn set_filter(&mut self, name: &str, value: &str) {
        self.filters.insert(name.to_owned(), value.to_owned());
        self.page_num = FIRST_PAGE;
    }

    pub fn set_sort_field(&mut self, field: &str) {
        let direction = self.sort_direction();
        self.sort = Some(SortSpec {
            field: field.to_owned(),
            direction,
        });
        self.page_num = FIRST_PAGE;
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        let field = self.sort_field().to_owned();
        self.sort = Some(SortSpec { field, direction });
        self.page_num = FIRST_PAGE;
    }

    pub(crate) fn set_page(&mut self, page_num: u32) {
        self.page_num = page_num.max(FIRST_PAGE);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PageResult<T> {
    #[serde(default)]
    pub records: Vec<T>,
    #[serde(default)]
    pub total_count: u64,
}

impl<T> PageResult<T> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            total_count: 0,
        }
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(current_page: u32, total_count: u64, page_size: u32) -> Self {
        Self {
            current_page,
            total_pages: total_pages(total_count, page_size),
        }
    }

    pub fn show_controls(self) -> bool {
        self.total_pages > 1
    }

    pub fn is_first_page(self) -> bool {
        self.current_page <= FIRST_PAGE
    }

    pub fn is_last_page(self) -> bool {
        self.current_page >= self.total_pages
    }

    pub fn label(self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}

/// Per-key request counter. Only the most recently issued sequence number
/// may update view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: PageQuery,
}

pub(crate) fn error_chain(error: &anyhow::Error) -> String {
    format!("{error:#}")
}

/// Paged list fetcher and its filter/pagination controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    parent_id: RecordId,
    query: PageQuery,
    records: Vec<T>,
    total_count: u64,
    loading: bool,
    seq: RequestSeq,
}

impl<T: ListRecord> PagedList<T> {
    pub fn new(parent_id: RecordId) -> Self {
        Self {
            parent_id,
            query: T::default_query(),
            records: Vec::new(),
            total_count: 0,
            loading: false,
            seq: RequestSeq::default(),
        }
    }

    pub fn parent_id(&self) -> &RecordId {
        &self.parent_id
    }

    pub fn query(&self) -> &PageQuery {
        &self.query
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn current_page(&self) -> u32 {
        self.query.page_num()
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.query.page_num(),
            self.total_count,
            self.query.page_size(),
        )
    }

    pub fn has_records(&self) -> bool {
        !self.loading && !self.records.is_empty()
    }

    pub fn is_empty_state(&self) -> bool {
        !self.loading && self.records.is_empty()
    }

    /// Issues a fetch for the current query.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.loading = true;
        let seq = self.seq.issue();
        tracing::debug!(
            list = T::KIND.as_str(),
            parent = %self.parent_id,
            seq,
            page = self.query.page_num(),
            "issuing page fetch"
        );
        FetchTicket {
            seq,
            query: self.query.clone(),
        }
    }

    pub fn apply_filter(&mut self, name: &str, value: &str) -> FetchTicket {
        self.query.set_filter(name, value);
        self.begin_fetch()
    }

    pub fn change_sort(&mut self, field: &str) -> FetchTicket {
        self.query.set_sort_field(field);
        self.begin_fetch()
    }

    pub fn change_sort_direction(&mut self, direction: SortDirection) -> FetchTicket {
        self.query.set_sort_direction(direction);
        self.begin_fetch()
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        let pagination = self.pagination();
        if pagination.current_page >= pagination.total_pages {
            return None;
        }
        self.query.set_page(pagination.current_page + 1);
        Some(self.begin_fetch())
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        let current = self.query.page_num();
        if current <= FIRST_PAGE {
            return None;
        }
        self.query.set_page(current - 1);
        Some(self.begin_fetch())
    }

    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<PageResult<T>>,
    ) -> FetchOutcome {
        if !self.seq.is_latest(ticket.seq) {
            tracing::debug!(
                list = T::KIND.as_str(),
                seq = ticket.seq,
                latest = self.seq.latest(),
                "discarding stale page"
            );
            return FetchOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.records = page.records;
                self.total_count = page.total_count;
                FetchOutcome::Applied
            }
            Err(error) => {
                tracing::warn!(
                    list = T::KIND.as_str(),
                    parent = %self.parent_id,
                    error = %error_chain(&error),
                    "page fetch failed"
                );
                self.records.clear();
                self.total_count = 0;
                FetchOutcome::Failed
            }
        }
    }

    pub fn execute(&mut self, service: &dyn QueryService, ticket: &FetchTicket) -> FetchOutcome {
        let result = T::fetch(service, &self.parent_id, &ticket.query);
        self.complete(ticket, result)
    }

    /// Runs an optional ticket from a navigation call; `None` stays a no-op.
    pub fn run(
        &mut self,
        service: &dyn QueryService,
        ticket: Option<FetchTicket>,
    ) -> Option<FetchOutcome> {
        ticket.map(|ticket| self.execute(service, &ticket))
    }

    pub fn refresh(&mut self, service: &dyn QueryService) -> FetchOutcome {
        let ticket = self.begin_fetch();
        self.execute(service, &ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FetchOutcome, PageQuery, PageResult, PagedList, Pagination, RequestSeq, SortDirection,
        total_pages,
    };
    use crate::{CaseId, CaseRow, RecordId, STATUS_FILTER};
    use anyhow::anyhow;

    fn case(number: u32) -> CaseRow {
        CaseRow {
            case_id: CaseId::new(format!("500{number:05}")),
            case_number: format!("{number:08}"),
            case_type: None,
            owner_name: None,
            status: Some("Open".to_owned()),
            category: None,
            sub_category: None,
            summary: None,
        }
    }

    fn page(range: std::ops::Range<u32>, total_count: u64) -> PageResult<CaseRow> {
        PageResult {
            records: range.map(case).collect(),
            total_count,
        }
    }

    fn loaded_list(total_count: u64) -> PagedList<CaseRow> {
        let mut list = PagedList::<CaseRow>::new(RecordId::new("001A"));
        let ticket = list.begin_fetch();
        list.complete(&ticket, Ok(page(0..5, total_count)));
        list
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(7, 0), 0);
    }

    #[test]
    fn pagination_controls_hidden_without_extra_pages() {
        let empty = Pagination::new(1, 0, 5);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.show_controls());
        assert!(empty.is_first_page());
        assert!(empty.is_last_page());

        let single = Pagination::new(1, 5, 5);
        assert!(!single.show_controls());

        let many = Pagination::new(2, 12, 5);
        assert!(many.show_controls());
        assert!(!many.is_first_page());
        assert!(!many.is_last_page());
        assert_eq!(many.label(), "Page 2 of 3");
    }

    #[test]
    fn query_mutations_reset_page() {
        let mut query = PageQuery::new(10).with_sort("Name", SortDirection::Asc);
        query.set_page(4);
        query.set_filter("search", "ann");
        assert_eq!(query.page_num(), 1);

        query.set_page(3);
        query.set_sort_field("lastRapidDate");
        assert_eq!(query.page_num(), 1);
        assert_eq!(query.sort_direction(), SortDirection::Asc);

        query.set_page(2);
        query.set_sort_direction(SortDirection::Desc);
        assert_eq!(query.page_num(), 1);
        assert_eq!(query.sort_field(), "lastRapidDate");
        assert_eq!(query.filter("search"), "ann");
        assert_eq!(query.filter("missing"), "");
    }

    #[test]
    fn filter_and_sort_always_return_to_first_page() {
        let mut list = loaded_list(40);
        for _ in 0..3 {
            let ticket = list.next_page().expect("more pages available");
            list.complete(&ticket, Ok(page(0..5, 40)));
        }
        assert_eq!(list.current_page(), 4);

        let ticket = list.apply_filter(STATUS_FILTER, "Closed");
        assert_eq!(ticket.query.page_num(), 1);
        assert_eq!(ticket.query.filter(STATUS_FILTER), "Closed");
        list.complete(&ticket, Ok(page(0..5, 40)));

        let ticket = list.next_page().expect("second page");
        list.complete(&ticket, Ok(page(5..10, 40)));
        let ticket = list.change_sort("CaseNumber");
        assert_eq!(ticket.query.page_num(), 1);
    }

    #[test]
    fn navigation_keeps_filters() {
        let mut list = loaded_list(12);
        let ticket = list.apply_filter(STATUS_FILTER, "All");
        list.complete(&ticket, Ok(page(0..5, 12)));

        let ticket = list.next_page().expect("second page");
        assert_eq!(ticket.query.page_num(), 2);
        assert_eq!(ticket.query.filter(STATUS_FILTER), "All");
    }

    #[test]
    fn navigation_is_a_no_op_at_boundaries() {
        let mut list = loaded_list(12);
        assert!(list.previous_page().is_none());
        assert!(!list.is_loading());

        for expected in [2, 3] {
            let ticket = list.next_page().expect("page available");
            assert_eq!(ticket.query.page_num(), expected);
            list.complete(&ticket, Ok(page(0..2, 12)));
        }
        assert!(list.next_page().is_none());
        assert_eq!(list.current_page(), 3);

        let ticket = list.previous_page().expect("previous available");
        assert_eq!(ticket.query.page_num(), 2);
    }

    #[test]
    fn next_page_is_a_no_op_when_empty() {
        let mut list = loaded_list(0);
        assert!(list.next_page().is_none());
        assert!(!list.pagination().show_controls());
    }

    #[test]
    fn success_replaces_records_and_count_together() {
        let mut list = loaded_list(12);
        assert_eq!(list.records().len(), 5);
        assert_eq!(list.total_count(), 12);
        assert!(list.has_records());

        let ticket = list.apply_filter(STATUS_FILTER, "Closed");
        assert!(list.is_loading());
        assert!(!list.has_records());
        let outcome = list.complete(&ticket, Ok(page(0..1, 1)));
        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(list.records().len(), 1);
        assert_eq!(list.total_count(), 1);
        assert!(!list.is_loading());
    }

    #[test]
    fn failure_clears_to_empty() {
        let mut list = loaded_list(12);
        let ticket = list.begin_fetch();
        let outcome = list.complete(&ticket, Err(anyhow!("server error (500)")));
        assert_eq!(outcome, FetchOutcome::Failed);
        assert!(list.records().is_empty());
        assert_eq!(list.total_count(), 0);
        assert!(!list.is_loading());
        assert!(list.is_empty_state());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut list = loaded_list(12);
        let slow = list.apply_filter(STATUS_FILTER, "Closed");
        let fast = list.apply_filter(STATUS_FILTER, "All");

        assert_eq!(list.complete(&fast, Ok(page(0..3, 3))), FetchOutcome::Applied);
        assert_eq!(
            list.complete(&slow, Ok(page(0..5, 99))),
            FetchOutcome::Stale
        );
        assert_eq!(list.total_count(), 3);
        assert_eq!(list.records().len(), 3);
    }

    #[test]
    fn stale_completion_leaves_loading_flag_for_newer_request() {
        let mut list = loaded_list(12);
        let first = list.begin_fetch();
        let _second = list.begin_fetch();
        assert_eq!(
            list.complete(&first, Err(anyhow!("boom"))),
            FetchOutcome::Stale
        );
        assert!(list.is_loading());
        assert_eq!(list.total_count(), 12);
    }

    #[test]
    fn request_seq_tracks_latest() {
        let mut seq = RequestSeq::default();
        let first = seq.issue();
        let second = seq.issue();
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
        assert_eq!(seq.latest(), second);
    }

    #[test]
    fn sort_direction_parses_case_insensitively() {
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("ASC"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("up"), None);
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
    }
}
