// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::time::{Duration, Instant};

use crate::paging::error_chain;
use crate::{FetchOutcome, QueryService, RequestSeq, SearchIcon, SearchResult};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const MIN_SEARCH_LENGTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub result: SearchResult,
    pub icon: SearchIcon,
}

impl From<SearchResult> for SearchHit {
    fn from(result: SearchResult) -> Self {
        let icon = result.icon();
        Self { result, icon }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub term: String,
}

/// Debounced free-text search. Time is supplied by the caller so the
/// debounce window is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchController {
    term: String,
    results: Vec<SearchHit>,
    searching: bool,
    has_searched: bool,
    pending: Option<Instant>,
    debounce: Duration,
    min_length: usize,
    seq: RequestSeq,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE, MIN_SEARCH_LENGTH)
    }
}

impl SearchController {
    pub fn new(debounce: Duration, min_length: usize) -> Self {
        Self {
            term: String::new(),
            results: Vec::new(),
            searching: false,
            has_searched: false,
            pending: None,
            debounce,
            min_length: min_length.max(1),
            seq: RequestSeq::default(),
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending
    }

    pub fn show_results(&self) -> bool {
        !self.searching && !self.results.is_empty()
    }

    pub fn no_results(&self) -> bool {
        !self.searching && self.has_searched && self.results.is_empty()
    }

    /// Records a keystroke. Any pending or in-flight search is superseded.
    pub fn on_input(&mut self, text: &str, now: Instant) {
        self.term = text.to_owned();
        self.pending = None;
        self.seq.issue();
        self.searching = false;

        if self.term.trim().chars().count() >= self.min_length {
            self.pending = Some(now + self.debounce);
        } else {
            self.results.clear();
            self.has_searched = false;
        }
    }

    /// Fires the pending search once its debounce deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchTicket> {
        let deadline = self.pending?;
        if now < deadline {
            return None;
        }

        self.pending = None;
        self.searching = true;
        self.has_searched = true;
        let seq = self.seq.issue();
        let term = self.term.trim().to_owned();
        tracing::debug!(seq, term = %term, "issuing search");
        Some(SearchTicket { seq, term })
    }

    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<SearchResult>>,
    ) -> FetchOutcome {
        if !self.seq.is_latest(ticket.seq) {
            tracing::debug!(seq = ticket.seq, "discarding stale search results");
            return FetchOutcome::Stale;
        }

        self.searching = false;
        match result {
            Ok(results) => {
                self.results = results.into_iter().map(SearchHit::from).collect();
                FetchOutcome::Applied
            }
            Err(error) => {
                tracing::warn!(term = %ticket.term, error = %error_chain(&error), "search failed");
                self.results.clear();
                FetchOutcome::Failed
            }
        }
    }

    pub fn execute(&mut self, service: &dyn QueryService, ticket: &SearchTicket) -> FetchOutcome {
        let result = service.search_records(&ticket.term);
        self.complete(ticket, result)
    }

    pub fn tick(&mut self, service: &dyn QueryService, now: Instant) -> Option<FetchOutcome> {
        let ticket = self.poll(now)?;
        Some(self.execute(service, &ticket))
    }

    /// Takes the chosen result and resets the controller for the next search.
    pub fn select(&mut self, index: usize) -> Option<SearchResult> {
        let selected = self.results.get(index)?.result.clone();
        self.clear();
        Some(selected)
    }

    pub fn clear(&mut self) {
        self.term.clear();
        self.results.clear();
        self.has_searched = false;
        self.searching = false;
        self.pending = None;
        self.seq.issue();
    }
}
