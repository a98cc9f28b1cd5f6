// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::display;
use crate::paging::error_chain;
use crate::{DashboardMode, QueryService, RecordId, RequestSeq, ResolvedContext, SearchResult};

pub const DEFAULT_PARTNER_NAME: &str = "PNC";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NotesPanel {
    #[default]
    Closed,
    Open {
        parent_id: RecordId,
    },
}

/// Events raised by the search box and the detail pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildEvent {
    RecordSelect(SearchResult),
    RecordLoaded {
        record_name: Option<String>,
        parent_account_name: Option<String>,
    },
    OpenNotes {
        parent_id: RecordId,
    },
    CloseSidebar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    ModeChanged(DashboardMode),
    RecordChanged(Option<RecordId>),
    TitleChanged(String),
    NotesOpened(RecordId),
    NotesClosed,
    LoadingChanged(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    pub seq: u64,
    pub record_id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initialize {
    Resolve(ResolveTicket),
    Ready(Vec<DashboardEvent>),
}

/// Top-level navigation state. Outside Search mode there is always an
/// active record id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    mode: DashboardMode,
    record_id: Option<RecordId>,
    selected_name: Option<String>,
    record_name: Option<String>,
    parent_account_name: Option<String>,
    notes: NotesPanel,
    loading: bool,
    resolve_seq: RequestSeq,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            mode: DashboardMode::Search,
            record_id: None,
            selected_name: None,
            record_name: None,
            parent_account_name: None,
            notes: NotesPanel::Closed,
            loading: true,
            resolve_seq: RequestSeq::default(),
        }
    }
}

impl DashboardState {
    pub fn mode(&self) -> DashboardMode {
        self.mode
    }

    pub fn current_record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected_name.as_deref()
    }

    pub fn record_name(&self) -> Option<&str> {
        self.record_name.as_deref()
    }

    pub fn parent_account_name(&self) -> Option<&str> {
        self.parent_account_name.as_deref()
    }

    pub fn notes_panel(&self) -> &NotesPanel {
        &self.notes
    }

    pub fn notes_open(&self) -> bool {
        matches!(self.notes, NotesPanel::Open { .. })
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn show_search(&self) -> bool {
        self.mode == DashboardMode::Search && !self.loading
    }

    pub fn show_dashboard(&self) -> bool {
        self.mode != DashboardMode::Search && !self.loading
    }

    pub fn is_partner_mode(&self) -> bool {
        self.mode == DashboardMode::Partner
    }

    pub fn is_merchant_mode(&self) -> bool {
        self.mode == DashboardMode::Merchant
    }

    pub fn is_reseller_contact_mode(&self) -> bool {
        self.mode == DashboardMode::ResellerContact
    }

    pub fn partner_name(&self) -> String {
        display::display_name(
            self.selected_name.as_deref(),
            self.record_name.as_deref(),
            DEFAULT_PARTNER_NAME,
        )
    }

    pub fn dashboard_title(&self) -> String {
        match self.mode {
            DashboardMode::Partner => {
                format!("Partner Overview Dashboard - {}", self.partner_name())
            }
            DashboardMode::Merchant => "Merchant Overview Dashboard".to_owned(),
            DashboardMode::ResellerContact => "Reseller Contact".to_owned(),
            DashboardMode::Search => "Dashboard".to_owned(),
        }
    }

    /// Starts the dashboard for an optional host record id. A blank id lands
    /// in Search without a remote call.
    pub fn initialize(&mut self, external_id: Option<&str>) -> Initialize {
        self.loading = true;
        match external_id.and_then(RecordId::parse) {
            Some(record_id) => {
                let seq = self.resolve_seq.issue();
                tracing::debug!(seq, record_id = %record_id, "resolving dashboard context");
                Initialize::Resolve(ResolveTicket { seq, record_id })
            }
            None => {
                let mut events = self.enter(DashboardMode::Search, None);
                events.push(self.set_loading(false));
                Initialize::Ready(events)
            }
        }
    }

    pub fn complete_resolve(
        &mut self,
        ticket: &ResolveTicket,
        result: Result<ResolvedContext>,
    ) -> Vec<DashboardEvent> {
        if !self.resolve_seq.is_latest(ticket.seq) {
            tracing::debug!(seq = ticket.seq, "discarding stale context resolution");
            return Vec::new();
        }

        let mut events = match result {
            Ok(context) if context.dashboard_mode == DashboardMode::Search => {
                self.enter(DashboardMode::Search, None)
            }
            Ok(context) => self.enter(context.dashboard_mode, Some(ticket.record_id.clone())),
            Err(error) => {
                tracing::warn!(
                    record_id = %ticket.record_id,
                    error = %error_chain(&error),
                    "context resolution failed, falling back to search"
                );
                self.enter(DashboardMode::Search, None)
            }
        };
        events.push(self.set_loading(false));
        events
    }

    pub fn resolve(
        &mut self,
        service: &dyn QueryService,
        external_id: Option<&str>,
    ) -> Vec<DashboardEvent> {
        match self.initialize(external_id) {
            Initialize::Resolve(ticket) => {
                let result = service.resolve_context(&ticket.record_id);
                self.complete_resolve(&ticket, result)
            }
            Initialize::Ready(events) => events,
        }
    }

    pub fn dispatch(&mut self, event: ChildEvent) -> Vec<DashboardEvent> {
        match event {
            ChildEvent::RecordSelect(selected) => {
                let mode = DashboardMode::for_record(selected.object_type, selected.record_type);
                let Some(mode) = mode else {
                    tracing::warn!(
                        record_id = %selected.record_id,
                        object_type = selected.object_type.as_str(),
                        "ignoring selection of unsupported record"
                    );
                    return Vec::new();
                };

                // A selection supersedes any resolution still in flight.
                self.resolve_seq.issue();
                let mut events = self.enter(mode, Some(selected.record_id));
                self.selected_name = Some(selected.name).filter(|name| !name.trim().is_empty());
                events.push(DashboardEvent::TitleChanged(self.dashboard_title()));
                if self.loading {
                    events.push(self.set_loading(false));
                }
                events
            }
            ChildEvent::RecordLoaded {
                record_name,
                parent_account_name,
            } => {
                if record_name.is_some() {
                    self.record_name = record_name;
                }
                if parent_account_name.is_some() {
                    self.parent_account_name = parent_account_name;
                }
                vec![DashboardEvent::TitleChanged(self.dashboard_title())]
            }
            ChildEvent::OpenNotes { parent_id } => {
                self.notes = NotesPanel::Open {
                    parent_id: parent_id.clone(),
                };
                vec![DashboardEvent::NotesOpened(parent_id)]
            }
            ChildEvent::CloseSidebar => {
                if !self.notes_open() {
                    return Vec::new();
                }
                self.notes = NotesPanel::Closed;
                vec![DashboardEvent::NotesClosed]
            }
        }
    }

    fn enter(&mut self, mode: DashboardMode, record_id: Option<RecordId>) -> Vec<DashboardEvent> {
        let record_id = if mode == DashboardMode::Search {
            None
        } else {
            record_id
        };
        tracing::debug!(
            mode = mode.as_str(),
            record_id = record_id.as_ref().map(RecordId::as_str),
            "entering dashboard mode"
        );

        let changed = self.mode != mode || self.record_id != record_id;
        self.mode = mode;
        self.record_id = record_id;
        self.selected_name = None;
        self.record_name = None;
        self.parent_account_name = None;
        let mut events = vec![
            DashboardEvent::ModeChanged(self.mode),
            DashboardEvent::RecordChanged(self.record_id.clone()),
        ];
        // The notes panel belongs to the record it was opened for.
        if changed && self.notes_open() {
            self.notes = NotesPanel::Closed;
            events.push(DashboardEvent::NotesClosed);
        }
        events
    }

    fn set_loading(&mut self, loading: bool) -> DashboardEvent {
        self.loading = loading;
        DashboardEvent::LoadingChanged(loading)
    }
}
