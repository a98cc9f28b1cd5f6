// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::paging::error_chain;
use crate::{
    FetchOutcome, MerchantSummary, PageSummary, PartnerSummary, QueryService, RecordId,
    RequestSeq, ResellerContactSummary, SummaryType,
};

/// A summary shape with its own remote read.
pub trait SummaryKind: Sized {
    const DEFAULT_TYPE: SummaryType;

    fn fetch(
        service: &dyn QueryService,
        record_id: &RecordId,
        summary_type: SummaryType,
    ) -> Result<Self>;
}

impl SummaryKind for PartnerSummary {
    const DEFAULT_TYPE: SummaryType = SummaryType::PartnerInfo;

    fn fetch(service: &dyn QueryService, record_id: &RecordId, _: SummaryType) -> Result<Self> {
        service.partner_summary(record_id)
    }
}

impl SummaryKind for MerchantSummary {
    const DEFAULT_TYPE: SummaryType = SummaryType::MerchantSummary;

    fn fetch(service: &dyn QueryService, record_id: &RecordId, _: SummaryType) -> Result<Self> {
        service.merchant_summary(record_id)
    }
}

impl SummaryKind for ResellerContactSummary {
    const DEFAULT_TYPE: SummaryType = SummaryType::ResellerContactKpi;

    fn fetch(service: &dyn QueryService, record_id: &RecordId, _: SummaryType) -> Result<Self> {
        service.reseller_contact_summary(record_id)
    }
}

impl SummaryKind for PageSummary {
    const DEFAULT_TYPE: SummaryType = SummaryType::PartnerInfo;

    fn fetch(
        service: &dyn QueryService,
        record_id: &RecordId,
        summary_type: SummaryType,
    ) -> Result<Self> {
        service.page_summary(record_id, summary_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTicket {
    pub seq: u64,
    pub record_id: RecordId,
    pub summary_type: SummaryType,
}

/// Holds at most one summary, replaced wholesale by each load.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLoader<S> {
    record_id: Option<RecordId>,
    summary_type: SummaryType,
    summary: Option<S>,
    loading: bool,
    has_error: bool,
    seq: RequestSeq,
}

pub type PageSummaryCard = SummaryLoader<PageSummary>;

impl<S: SummaryKind> SummaryLoader<S> {
    pub fn new(record_id: Option<RecordId>) -> Self {
        Self::with_type(record_id, S::DEFAULT_TYPE)
    }

    pub fn with_type(record_id: Option<RecordId>, summary_type: SummaryType) -> Self {
        Self {
            record_id,
            summary_type,
            summary: None,
            loading: false,
            has_error: false,
            seq: RequestSeq::default(),
        }
    }

    pub fn record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    pub fn summary_type(&self) -> SummaryType {
        self.summary_type
    }

    pub fn summary(&self) -> Option<&S> {
        self.summary.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn has_data(&self) -> bool {
        !self.loading && !self.has_error && self.summary.is_some()
    }

    /// Returns `None` without touching the service when no record id is set.
    pub fn begin_load(&mut self) -> Option<SummaryTicket> {
        let Some(record_id) = self.record_id.clone() else {
            tracing::warn!(
                summary_type = self.summary_type.as_str(),
                "summary requested without a record id"
            );
            self.loading = false;
            return None;
        };

        self.loading = true;
        self.has_error = false;
        let seq = self.seq.issue();
        tracing::debug!(
            summary_type = self.summary_type.as_str(),
            record = %record_id,
            seq,
            "issuing summary fetch"
        );
        Some(SummaryTicket {
            seq,
            record_id,
            summary_type: self.summary_type,
        })
    }

    pub fn complete(&mut self, ticket: &SummaryTicket, result: Result<S>) -> FetchOutcome {
        if !self.seq.is_latest(ticket.seq) {
            tracing::debug!(seq = ticket.seq, "discarding stale summary");
            return FetchOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(summary) => {
                self.summary = Some(summary);
                self.has_error = false;
                FetchOutcome::Applied
            }
            Err(error) => {
                tracing::warn!(
                    summary_type = ticket.summary_type.as_str(),
                    record = %ticket.record_id,
                    error = %error_chain(&error),
                    "summary fetch failed"
                );
                self.summary = None;
                self.has_error = true;
                FetchOutcome::Failed
            }
        }
    }

    pub fn execute(&mut self, service: &dyn QueryService, ticket: &SummaryTicket) -> FetchOutcome {
        let result = S::fetch(service, &ticket.record_id, ticket.summary_type);
        self.complete(ticket, result)
    }

    pub fn load(&mut self, service: &dyn QueryService) -> Option<FetchOutcome> {
        let ticket = self.begin_load()?;
        Some(self.execute(service, &ticket))
    }
}

impl SummaryLoader<PageSummary> {
    pub fn card_title(&self) -> &'static str {
        self.summary_type.card_title()
    }

    pub fn card_icon(&self) -> &'static str {
        self.summary_type.card_icon()
    }
}
