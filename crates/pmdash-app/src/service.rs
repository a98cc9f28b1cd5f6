// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use serde::Serialize;

use crate::{
    CaseRow, MerchantRow, MerchantSummary, NotePage, OpportunityRow, PageResult, PageSummary,
    PartnerSummary, RecordId, ResellerContactRow, ResellerContactSummary, ResolvedContext,
    SearchResult, SummaryType,
};

/// Remote operations consumed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    SearchRecords,
    ResolveContext,
    GetPartnerSummary,
    GetResellerContacts,
    GetMerchantSummary,
    GetMerchantsByResellerContact,
    GetCases,
    GetOpportunities,
    GetNotes,
    GetResellerContactSummary,
    GetPageSummary,
}

impl Operation {
    pub const ALL: [Self; 11] = [
        Self::SearchRecords,
        Self::ResolveContext,
        Self::GetPartnerSummary,
        Self::GetResellerContacts,
        Self::GetMerchantSummary,
        Self::GetMerchantsByResellerContact,
        Self::GetCases,
        Self::GetOpportunities,
        Self::GetNotes,
        Self::GetResellerContactSummary,
        Self::GetPageSummary,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SearchRecords => "searchRecords",
            Self::ResolveContext => "resolveContext",
            Self::GetPartnerSummary => "getPartnerSummary",
            Self::GetResellerContacts => "getResellerContacts",
            Self::GetMerchantSummary => "getMerchantSummary",
            Self::GetMerchantsByResellerContact => "getMerchantsByResellerContact",
            Self::GetCases => "getCases",
            Self::GetOpportunities => "getOpportunities",
            Self::GetNotes => "getNotes",
            Self::GetResellerContactSummary => "getResellerContactSummary",
            Self::GetPageSummary => "getPageSummary",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|operation| operation.as_str() == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResellerContactsRequest {
    pub page_num: u32,
    pub page_size: u32,
    pub sort_field: String,
    pub sort_dir: String,
    pub search_term: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantsRequest {
    pub page_num: u32,
    pub page_size: u32,
    pub filter_name: String,
    pub filter_plan: String,
    pub filter_level: String,
    pub filter_status: String,
}

/// Parameters shared by the case and opportunity lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPageRequest {
    pub filter_status: String,
    pub page_num: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesRequest {
    pub object_type_filter: String,
    pub merchant_account_filter: String,
    pub page_num: u32,
    pub page_size: u32,
}

/// The remote query service. Implementations perform one blocking call per
/// method; callers own sequencing and stale-result handling.
pub trait QueryService {
    fn search_records(&self, search_term: &str) -> Result<Vec<SearchResult>>;

    fn resolve_context(&self, record_id: &RecordId) -> Result<ResolvedContext>;

    fn partner_summary(&self, account_id: &RecordId) -> Result<PartnerSummary>;

    fn reseller_contacts(
        &self,
        account_id: &RecordId,
        request: &ResellerContactsRequest,
    ) -> Result<PageResult<ResellerContactRow>>;

    fn merchant_summary(&self, account_id: &RecordId) -> Result<MerchantSummary>;

    fn merchants_by_reseller_contact(
        &self,
        contact_id: &RecordId,
        request: &MerchantsRequest,
    ) -> Result<PageResult<MerchantRow>>;

    fn cases(
        &self,
        account_id: &RecordId,
        request: &StatusPageRequest,
    ) -> Result<PageResult<CaseRow>>;

    fn opportunities(
        &self,
        account_id: &RecordId,
        request: &StatusPageRequest,
    ) -> Result<PageResult<OpportunityRow>>;

    fn notes(&self, parent_id: &RecordId, request: &NotesRequest) -> Result<NotePage>;

    fn reseller_contact_summary(&self, contact_id: &RecordId) -> Result<ResellerContactSummary>;

    fn page_summary(&self, record_id: &RecordId, summary_type: SummaryType)
    -> Result<PageSummary>;
}
