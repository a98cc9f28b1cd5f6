// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::config::Config;
use anyhow::{Context, Result, anyhow};
use pmdash_app::{DashboardSession, FetchOutcome, QueryService, SearchController};
use pmdash_client::Client;
use pmdash_testkit::FakeQueryService;
use std::time::Instant;

const DEMO_SEED: u64 = 42;

/// Where dashboard queries go: the configured HTTP endpoint or an in-memory
/// seeded data set.
pub enum Backend {
    Http(Client),
    Demo(FakeQueryService),
}

impl Backend {
    pub fn from_config(config: &Config, demo: bool) -> Result<Self> {
        if demo {
            return Ok(Self::Demo(FakeQueryService::demo(DEMO_SEED)));
        }

        let base_url = config.base_url().ok_or_else(|| {
            anyhow!(
                "no query service configured; set [service].base_url in the config file or run with --demo"
            )
        })?;
        let token = config.access_token();
        let client = Client::new(base_url, token.as_deref(), config.timeout()?)
            .context("invalid [service] config; fix base_url/timeout values")?;
        Ok(Self::Http(client))
    }

    pub fn service(&self) -> &dyn QueryService {
        match self {
            Self::Http(client) => client,
            Self::Demo(fake) => fake,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Http(client) => client.base_url().to_owned(),
            Self::Demo(_) => format!("demo data (seed {DEMO_SEED})"),
        }
    }
}

pub fn search_controller(config: &Config) -> Result<SearchController> {
    Ok(SearchController::new(
        config.search_debounce()?,
        config.search_min_length(),
    ))
}

/// Drives one dashboard session from command-line intent: open a record,
/// run a search, and optionally open the notes panel.
pub struct DashRuntime<'a> {
    session: DashboardSession<'a>,
}

impl<'a> DashRuntime<'a> {
    pub fn new(service: &'a dyn QueryService, search: SearchController) -> Self {
        Self {
            session: DashboardSession::with_search(service, search),
        }
    }

    pub fn session(&self) -> &DashboardSession<'a> {
        &self.session
    }

    pub fn open(&mut self, record: Option<&str>) {
        let events = self.session.start(record);
        tracing::info!(
            mode = self.session.state().mode().as_str(),
            events = events.len(),
            "dashboard started"
        );
    }

    /// Types `term` and waits out the debounce window. Returns `None` when
    /// the term is too short to search.
    pub fn search(&mut self, term: &str) -> Option<FetchOutcome> {
        self.session.input_search(term, Instant::now());
        let deadline = self.session.search().next_deadline()?;
        let outcome = self.session.tick(deadline);
        tracing::info!(
            term,
            results = self.session.search().results().len(),
            "search finished"
        );
        outcome
    }

    /// Navigates to the first search hit, if any.
    pub fn select_first_result(&mut self) -> bool {
        if self.session.search().results().is_empty() {
            return false;
        }
        let events = self.session.select_search_result(0);
        tracing::info!(
            mode = self.session.state().mode().as_str(),
            events = events.len(),
            "search result selected"
        );
        true
    }

    pub fn open_notes(&mut self) -> bool {
        self.session.open_notes();
        let opened = self.session.notes().is_some();
        if !opened {
            tracing::warn!("notes requested but no record page is open");
        }
        opened
    }
}
