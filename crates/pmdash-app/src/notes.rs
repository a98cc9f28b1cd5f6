// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::paging::error_chain;
use crate::{
    ChildEvent, FIRST_PAGE, FetchOutcome, Note, NotePage, NotesRequest, QueryService, RecordId,
    RequestSeq, SelectOption,
};

pub const NOTES_PAGE_SIZE: u32 = 10;

pub const NOTE_OBJECT_TYPE_OPTIONS: [SelectOption; 5] = [
    SelectOption {
        label: "All Types",
        value: "",
    },
    SelectOption {
        label: "Account",
        value: "Account",
    },
    SelectOption {
        label: "Opportunity",
        value: "Opportunity",
    },
    SelectOption {
        label: "Case",
        value: "Case",
    },
    SelectOption {
        label: "Contact",
        value: "Contact",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesLoad {
    Replace,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesTicket {
    pub seq: u64,
    pub mode: NotesLoad,
    pub request: NotesRequest,
}

/// Notes side panel feed. A replace load always starts from the first page;
/// `load_more` appends the next page while the service reports more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesFeed {
    parent_id: RecordId,
    object_type_filter: String,
    merchant_account_filter: String,
    notes: Vec<Note>,
    has_more: bool,
    current_page: u32,
    loading: bool,
    loading_more: bool,
    initial_load_done: bool,
    seq: RequestSeq,
}

impl NotesFeed {
    pub fn new(parent_id: RecordId) -> Self {
        Self {
            parent_id,
            object_type_filter: String::new(),
            merchant_account_filter: String::new(),
            notes: Vec::new(),
            has_more: false,
            current_page: FIRST_PAGE,
            loading: false,
            loading_more: false,
            initial_load_done: false,
            seq: RequestSeq::default(),
        }
    }

    pub fn parent_id(&self) -> &RecordId {
        &self.parent_id
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn object_type_filter(&self) -> &str {
        &self.object_type_filter
    }

    pub fn merchant_account_filter(&self) -> &str {
        &self.merchant_account_filter
    }

    pub fn has_notes(&self) -> bool {
        !self.loading && !self.notes.is_empty()
    }

    pub fn no_notes(&self) -> bool {
        !self.loading && self.initial_load_done && self.notes.is_empty()
    }

    pub fn reload(&mut self) -> NotesTicket {
        self.loading = true;
        self.loading_more = false;
        self.ticket(NotesLoad::Replace, FIRST_PAGE)
    }

    pub fn set_object_type_filter(&mut self, value: &str) -> NotesTicket {
        self.object_type_filter = value.to_owned();
        self.reload()
    }

    pub fn set_merchant_account_filter(&mut self, value: &str) -> NotesTicket {
        self.merchant_account_filter = value.to_owned();
        self.reload()
    }

    pub fn load_more(&mut self) -> Option<NotesTicket> {
        if !self.has_more || self.loading || self.loading_more {
            return None;
        }
        self.loading_more = true;
        Some(self.ticket(NotesLoad::Append, self.current_page + 1))
    }

    fn ticket(&mut self, mode: NotesLoad, page_num: u32) -> NotesTicket {
        let seq = self.seq.issue();
        tracing::debug!(
            parent = %self.parent_id,
            seq,
            page = page_num,
            ?mode,
            "issuing notes fetch"
        );
        NotesTicket {
            seq,
            mode,
            request: NotesRequest {
                object_type_filter: self.object_type_filter.clone(),
                merchant_account_filter: self.merchant_account_filter.clone(),
                page_num,
                page_size: NOTES_PAGE_SIZE,
            },
        }
    }

    pub fn complete(&mut self, ticket: &NotesTicket, result: Result<NotePage>) -> FetchOutcome {
        if !self.seq.is_latest(ticket.seq) {
            tracing::debug!(seq = ticket.seq, "discarding stale notes page");
            return FetchOutcome::Stale;
        }

        match ticket.mode {
            NotesLoad::Replace => {
                self.loading = false;
                self.initial_load_done = true;
                match result {
                    Ok(page) => {
                        self.notes = page.records;
                        self.has_more = page.has_more;
                        self.current_page = FIRST_PAGE;
                        FetchOutcome::Applied
                    }
                    Err(error) => {
                        tracing::warn!(
                            parent = %self.parent_id,
                            error = %error_chain(&error),
                            "loading notes failed"
                        );
                        self.notes.clear();
                        self.has_more = false;
                        self.current_page = FIRST_PAGE;
                        FetchOutcome::Failed
                    }
                }
            }
            NotesLoad::Append => {
                self.loading_more = false;
                match result {
                    Ok(page) => {
                        self.notes.extend(page.records);
                        self.has_more = page.has_more;
                        self.current_page = ticket.request.page_num;
                        FetchOutcome::Applied
                    }
                    Err(error) => {
                        // Already-shown pages stay; the next attempt retries the same page.
                        tracing::warn!(
                            parent = %self.parent_id,
                            error = %error_chain(&error),
                            "loading more notes failed"
                        );
                        FetchOutcome::Failed
                    }
                }
            }
        }
    }

    pub fn execute(&mut self, service: &dyn QueryService, ticket: &NotesTicket) -> FetchOutcome {
        let result = service.notes(&self.parent_id, &ticket.request);
        self.complete(ticket, result)
    }

    pub fn refresh(&mut self, service: &dyn QueryService) -> FetchOutcome {
        let ticket = self.reload();
        self.execute(service, &ticket)
    }

    pub fn close_event(&self) -> ChildEvent {
        ChildEvent::CloseSidebar
    }
}
