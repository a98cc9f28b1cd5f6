// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{
    CaseRow, MerchantRow, MerchantsRequest, OpportunityRow, PageQuery, PageResult, QueryService,
    RecordId, ResellerContactRow, ResellerContactsRequest, SortDirection, StatusPageRequest,
};

pub const CONTACTS_PAGE_SIZE: u32 = 10;
pub const MERCHANTS_PAGE_SIZE: u32 = 10;
pub const CASES_PAGE_SIZE: u32 = 5;
pub const OPPORTUNITIES_PAGE_SIZE: u32 = 5;

pub const STATUS_FILTER: &str = "status";
pub const CONTACT_SEARCH_FILTER: &str = "search";
pub const MERCHANT_NAME_FILTER: &str = "name";
pub const MERCHANT_PLAN_FILTER: &str = "plan";
pub const MERCHANT_LEVEL_FILTER: &str = "level";

pub const DEFAULT_CONTACT_SORT: &str = "Name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub label: &'static str,
    pub value: &'static str,
}

const fn option(label: &'static str, value: &'static str) -> SelectOption {
    SelectOption { label, value }
}

pub const CONTACT_SORT_OPTIONS: [SelectOption; 4] = [
    option("Name", "Name"),
    option("Rapids Submitted", "rapidsSubmitted"),
    option("Last Rapid Date", "lastRapidDate"),
    option("Active Accounts", "activeAccounts"),
];

pub const PLAN_OPTIONS: [SelectOption; 4] = [
    option("All Plans", ""),
    option("Basic", "Basic"),
    option("Premium", "Premium"),
    option("Enterprise", "Enterprise"),
];

pub const LEVEL_OPTIONS: [SelectOption; 6] = [
    option("All Levels", ""),
    option("Level 1", "1"),
    option("Level 2", "2"),
    option("Level 3", "3"),
    option("Level 4", "4"),
    option("Level 5", "5"),
];

pub const MERCHANT_STATUS_OPTIONS: [SelectOption; 4] = [
    option("All Statuses", ""),
    option("Active", "Active"),
    option("Onboarding", "Onboarding"),
    option("Churned", "Churned"),
];

/// Status filter shared by the case and opportunity lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl StatusFilter {
    pub const ALL: [Self; 3] = [Self::Open, Self::Closed, Self::All];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::All => "All",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    ResellerContacts,
    Merchants,
    Cases,
    Opportunities,
}

impl ListKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResellerContacts => "reseller_contacts",
            Self::Merchants => "merchants",
            Self::Cases => "cases",
            Self::Opportunities => "opportunities",
        }
    }
}

/// A row type that can be listed page by page under a parent record.
pub trait ListRecord: Sized {
    const KIND: ListKind;

    fn default_query() -> PageQuery;

    fn fetch(
        service: &dyn QueryService,
        parent_id: &RecordId,
        query: &PageQuery,
    ) -> Result<PageResult<Self>>;
}

impl ListRecord for ResellerContactRow {
    const KIND: ListKind = ListKind::ResellerContacts;

    fn default_query() -> PageQuery {
        PageQuery::new(CONTACTS_PAGE_SIZE).with_sort(DEFAULT_CONTACT_SORT, SortDirection::Asc)
    }

    fn fetch(
        service: &dyn QueryService,
        parent_id: &RecordId,
        query: &PageQuery,
    ) -> Result<PageResult<Self>> {
        let request = ResellerContactsRequest {
            page_num: query.page_num(),
            page_size: query.page_size(),
            sort_field: query.sort_field().to_owned(),
            sort_dir: query.sort_direction().as_str().to_owned(),
            search_term: query.filter(CONTACT_SEARCH_FILTER).to_owned(),
        };
        service.reseller_contacts(parent_id, &request)
    }
}

impl ListRecord for MerchantRow {
    const KIND: ListKind = ListKind::Merchants;

    fn default_query() -> PageQuery {
        PageQuery::new(MERCHANTS_PAGE_SIZE)
    }

    fn fetch(
        service: &dyn QueryService,
        parent_id: &RecordId,
        query: &PageQuery,
    ) -> Result<PageResult<Self>> {
        let request = MerchantsRequest {
            page_num: query.page_num(),
            page_size: query.page_size(),
            filter_name: query.filter(MERCHANT_NAME_FILTER).to_owned(),
            filter_plan: query.filter(MERCHANT_PLAN_FILTER).to_owned(),
            filter_level: query.filter(MERCHANT_LEVEL_FILTER).to_owned(),
            filter_status: query.filter(STATUS_FILTER).to_owned(),
        };
        service.merchants_by_reseller_contact(parent_id, &request)
    }
}

fn status_request(query: &PageQuery) -> StatusPageRequest {
    StatusPageRequest {
        filter_status: query.filter(STATUS_FILTER).to_owned(),
        page_num: query.page_num(),
        page_size: query.page_size(),
    }
}

impl ListRecord for CaseRow {
    const KIND: ListKind = ListKind::Cases;

    fn default_query() -> PageQuery {
        PageQuery::new(CASES_PAGE_SIZE).with_filter(STATUS_FILTER, StatusFilter::Open.as_str())
    }

    fn fetch(
        service: &dyn QueryService,
        parent_id: &RecordId,
        query: &PageQuery,
    ) -> Result<PageResult<Self>> {
        service.cases(parent_id, &status_request(query))
    }
}

impl ListRecord for OpportunityRow {
    const KIND: ListKind = ListKind::Opportunities;

    fn default_query() -> PageQuery {
        PageQuery::new(OPPORTUNITIES_PAGE_SIZE)
            .with_filter(STATUS_FILTER, StatusFilter::Open.as_str())
    }

    fn fetch(
        service: &dyn QueryService,
        parent_id: &RecordId,
        query: &PageQuery,
    ) -> Result<PageResult<Self>> {
        service.opportunities(parent_id, &status_request(query))
    }
}
