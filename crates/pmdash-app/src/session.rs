// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Instant;

use crate::{
    ChildEvent, DashboardEvent, DashboardState, DetailPage, FetchOutcome, NotesFeed,
    QueryService, SearchController,
};

/// Runs a dashboard synchronously against a query service, routing page
/// events back into the dashboard state.
pub struct DashboardSession<'a> {
    service: &'a dyn QueryService,
    state: DashboardState,
    search: SearchController,
    page: Option<DetailPage>,
    notes: Option<NotesFeed>,
}

impl<'a> DashboardSession<'a> {
    pub fn new(service: &'a dyn QueryService) -> Self {
        Self::with_search(service, SearchController::default())
    }

    pub fn with_search(service: &'a dyn QueryService, search: SearchController) -> Self {
        Self {
            service,
            state: DashboardState::default(),
            search,
            page: None,
            notes: None,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn page(&self) -> Option<&DetailPage> {
        self.page.as_ref()
    }

    pub fn page_mut(&mut self) -> Option<&mut DetailPage> {
        self.page.as_mut()
    }

    pub fn notes(&self) -> Option<&NotesFeed> {
        self.notes.as_ref()
    }

    pub fn notes_mut(&mut self) -> Option<&mut NotesFeed> {
        self.notes.as_mut()
    }

    pub fn service(&self) -> &'a dyn QueryService {
        self.service
    }

    pub fn start(&mut self, external_id: Option<&str>) -> Vec<DashboardEvent> {
        let events = self.state.resolve(self.service, external_id);
        self.apply(events)
    }

    pub fn input_search(&mut self, text: &str, now: Instant) {
        self.search.on_input(text, now);
    }

    pub fn tick(&mut self, now: Instant) -> Option<FetchOutcome> {
        self.search.tick(self.service, now)
    }

    pub fn select_search_result(&mut self, index: usize) -> Vec<DashboardEvent> {
        match self.search.select(index) {
            Some(selected) => self.handle(ChildEvent::RecordSelect(selected)),
            None => Vec::new(),
        }
    }

    pub fn handle(&mut self, event: ChildEvent) -> Vec<DashboardEvent> {
        let events = self.state.dispatch(event);
        self.apply(events)
    }

    /// Opens the notes panel for the record shown by the current page.
    pub fn open_notes(&mut self) -> Vec<DashboardEvent> {
        match self.page.as_ref().map(DetailPage::open_notes) {
            Some(event) => self.handle(event),
            None => Vec::new(),
        }
    }

    pub fn close_notes(&mut self) -> Vec<DashboardEvent> {
        match self.notes.as_ref().map(NotesFeed::close_event) {
            Some(event) => self.handle(event),
            None => Vec::new(),
        }
    }

    pub fn load_more_notes(&mut self) -> Option<FetchOutcome> {
        let notes = self.notes.as_mut()?;
        let ticket = notes.load_more()?;
        Some(notes.execute(self.service, &ticket))
    }

    pub fn filter_notes_by_object_type(&mut self, value: &str) -> Option<FetchOutcome> {
        let notes = self.notes.as_mut()?;
        let ticket = notes.set_object_type_filter(value);
        Some(notes.execute(self.service, &ticket))
    }

    fn apply(&mut self, mut pending: Vec<DashboardEvent>) -> Vec<DashboardEvent> {
        let mut emitted = Vec::new();
        while !pending.is_empty() {
            let mut rebuild = false;
            for event in &pending {
                match event {
                    DashboardEvent::ModeChanged(_) | DashboardEvent::RecordChanged(_) => {
                        rebuild = true;
                    }
                    DashboardEvent::NotesOpened(parent_id) => {
                        let mut feed = NotesFeed::new(parent_id.clone());
                        feed.refresh(self.service);
                        self.notes = Some(feed);
                    }
                    DashboardEvent::NotesClosed => self.notes = None,
                    DashboardEvent::TitleChanged(_) | DashboardEvent::LoadingChanged(_) => {}
                }
            }
            emitted.append(&mut pending);
            if rebuild {
                pending = self.rebuild_page();
            }
        }
        emitted
    }

    fn rebuild_page(&mut self) -> Vec<DashboardEvent> {
        let shared_name = self.state.selected_name().map(str::to_owned);
        let page = self
            .state
            .current_record_id()
            .cloned()
            .and_then(|record_id| DetailPage::for_mode(self.state.mode(), record_id, shared_name));
        let Some(mut page) = page else {
            self.page = None;
            self.search.clear();
            return Vec::new();
        };

        let loaded = page.load(self.service);
        self.page = Some(page);
        loaded
            .into_iter()
            .flat_map(|event| self.state.dispatch(event))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::DashboardSession;
    use crate::{
        CaseRow, DashboardEvent, DashboardMode, MerchantRow, MerchantSummary, MerchantsRequest,
        NotePage, NotesRequest, OpportunityRow, PageResult, PageSummary, PartnerSummary,
        QueryService, RecordId, ResellerContactRow, ResellerContactSummary,
        ResellerContactsRequest, ResolvedContext, SearchResult, StatusPageRequest, SummaryType,
    };
    use anyhow::{Result, bail};

    struct Offline;

    impl QueryService for Offline {
        fn search_records(&self, _: &str) -> Result<Vec<SearchResult>> {
            bail!("offline")
        }

        fn resolve_context(&self, _: &RecordId) -> Result<ResolvedContext> {
            bail!("offline")
        }

        fn partner_summary(&self, _: &RecordId) -> Result<PartnerSummary> {
            bail!("offline")
        }

        fn reseller_contacts(
            &self,
            _: &RecordId,
            _: &ResellerContactsRequest,
        ) -> Result<PageResult<ResellerContactRow>> {
            bail!("offline")
        }

        fn merchant_summary(&self, _: &RecordId) -> Result<MerchantSummary> {
            bail!("offline")
        }

        fn merchants_by_reseller_contact(
            &self,
            _: &RecordId,
            _: &MerchantsRequest,
        ) -> Result<PageResult<MerchantRow>> {
            bail!("offline")
        }

        fn cases(&self, _: &RecordId, _: &StatusPageRequest) -> Result<PageResult<CaseRow>> {
            bail!("offline")
        }

        fn opportunities(
            &self,
            _: &RecordId,
            _: &StatusPageRequest,
        ) -> Result<PageResult<OpportunityRow>> {
            bail!("offline")
        }

        fn notes(&self, _: &RecordId, _: &NotesRequest) -> Result<NotePage> {
            bail!("offline")
        }

        fn reseller_contact_summary(&self, _: &RecordId) -> Result<ResellerContactSummary> {
            bail!("offline")
        }

        fn page_summary(&self, _: &RecordId, _: SummaryType) -> Result<PageSummary> {
            bail!("offline")
        }
    }

    #[test]
    fn offline_start_falls_back_to_search() {
        let mut session = DashboardSession::new(&Offline);
        let events = session.start(Some("001X"));
        assert_eq!(session.state().mode(), DashboardMode::Search);
        assert!(session.state().show_search());
        assert!(session.page().is_none());
        assert_eq!(events.last(), Some(&DashboardEvent::LoadingChanged(false)));
    }

    #[test]
    fn notes_require_a_page() {
        let mut session = DashboardSession::new(&Offline);
        session.start(None);
        assert!(session.open_notes().is_empty());
        assert!(session.close_notes().is_empty());
        assert!(session.load_more_notes().is_none());
    }
}
