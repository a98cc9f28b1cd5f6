// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use pmdash_app::{
    CaseRow, DashboardMode, MerchantRow, MerchantSummary, MerchantsRequest, NotePage,
    NotesRequest, ObjectType, Operation, OpportunityRow, PageResult, PageSummary, PartnerSummary,
    QueryService, RecordId, RecordType, ResellerContactRow, ResellerContactSummary,
    ResellerContactsRequest, ResolvedContext, SearchResult, SortDirection, StatusPageRequest,
    SummaryType,
};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{DemoData, is_closed_case, is_closed_opportunity};

const SEARCH_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    pub subject: String,
}

/// In-memory `QueryService` over a `DemoData` set. Filtering and paging are
/// just enough to exercise the client contract. Any operation can be made to
/// fail, and every call is recorded.
#[derive(Debug, Default)]
pub struct FakeQueryService {
    data: DemoData,
    failing: Mutex<BTreeSet<Operation>>,
    calls: Mutex<Vec<Call>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn page<T>(items: Vec<T>, page_num: u32, page_size: u32) -> PageResult<T> {
    let total_count = items.len() as u64;
    let skip = (page_num.max(1) as usize - 1) * page_size as usize;
    PageResult {
        records: items
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect(),
        total_count,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_filter(value: Option<&str>, filter: &str) -> bool {
    filter.is_empty() || value == Some(filter)
}

fn status_matches(closed: bool, filter: &str) -> bool {
    match filter {
        "Open" => !closed,
        "Closed" => closed,
        _ => true,
    }
}

fn compare_contacts(
    left: &ResellerContactRow,
    right: &ResellerContactRow,
    field: &str,
) -> Ordering {
    match field {
        "rapidsSubmitted" => left.rapids_submitted.cmp(&right.rapids_submitted),
        "lastRapidDate" => left.last_rapid_date.cmp(&right.last_rapid_date),
        "activeAccounts" => left.active_accounts.cmp(&right.active_accounts),
        _ => left.name.cmp(&right.name),
    }
}

impl FakeQueryService {
    pub fn new(data: DemoData) -> Self {
        Self {
            data,
            failing: Mutex::new(BTreeSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn demo(seed: u64) -> Self {
        Self::new(DemoData::generate(seed))
    }

    pub fn data(&self) -> &DemoData {
        &self.data
    }

    pub fn fail(&self, operation: Operation) {
        lock(&self.failing).insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        lock(&self.failing).remove(&operation);
    }

    pub fn recover_all(&self) {
        lock(&self.failing).clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.operation == operation)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn subjects(&self, operation: Operation) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.operation == operation)
            .map(|call| call.subject.clone())
            .collect()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    fn record(&self, operation: Operation, subject: &str) -> Result<()> {
        lock(&self.calls).push(Call {
            operation,
            subject: subject.to_owned(),
        });
        if lock(&self.failing).contains(&operation) {
            bail!("{} unavailable (injected failure)", operation.as_str());
        }
        Ok(())
    }

    fn partner_summary_of(&self, account_id: &RecordId) -> Result<PartnerSummary> {
        self.data
            .partner(account_id)
            .map(|partner| partner.summary.clone())
            .ok_or_else(|| anyhow!("no partner account {account_id}"))
    }

    fn merchant_summary_of(&self, account_id: &RecordId) -> Result<MerchantSummary> {
        self.data
            .merchant(account_id)
            .map(|merchant| merchant.summary.clone())
            .ok_or_else(|| anyhow!("no merchant account {account_id}"))
    }

    fn contact_summary_of(&self, contact_id: &RecordId) -> Result<ResellerContactSummary> {
        self.data
            .contact(contact_id)
            .map(|contact| contact.summary.clone())
            .ok_or_else(|| anyhow!("no reseller contact {contact_id}"))
    }
}

impl QueryService for FakeQueryService {
    fn search_records(&self, search_term: &str) -> Result<Vec<SearchResult>> {
        self.record(Operation::SearchRecords, search_term)?;

        let partners = self.data.partners.iter().map(|partner| SearchResult {
            record_id: partner.account_id.clone(),
            object_type: ObjectType::Account,
            record_type: Some(RecordType::Reseller),
            name: partner.summary.account_name.clone().unwrap_or_default(),
        });
        let merchants = self.data.merchants.iter().map(|merchant| SearchResult {
            record_id: merchant.row.account_id.clone(),
            object_type: ObjectType::Account,
            record_type: Some(RecordType::Standard),
            name: merchant.row.account_name.clone(),
        });
        let contacts = self.data.contacts.iter().map(|contact| SearchResult {
            record_id: contact.row.contact_id.clone(),
            object_type: ObjectType::Contact,
            record_type: None,
            name: contact.row.name.clone(),
        });

        let term = search_term.trim();
        Ok(partners
            .chain(merchants)
            .chain(contacts)
            .filter(|result| contains_ignore_case(&result.name, term))
            .take(SEARCH_LIMIT)
            .collect())
    }

    fn resolve_context(&self, record_id: &RecordId) -> Result<ResolvedContext> {
        self.record(Operation::ResolveContext, record_id.as_str())?;
        let dashboard_mode = if self.data.partner(record_id).is_some() {
            DashboardMode::Partner
        } else if self.data.merchant(record_id).is_some() {
            DashboardMode::Merchant
        } else if self.data.contact(record_id).is_some() {
            DashboardMode::ResellerContact
        } else {
            bail!("no record {record_id}");
        };
        Ok(ResolvedContext { dashboard_mode })
    }

    fn partner_summary(&self, account_id: &RecordId) -> Result<PartnerSummary> {
        self.record(Operation::GetPartnerSummary, account_id.as_str())?;
        self.partner_summary_of(account_id)
    }

    fn reseller_contacts(
        &self,
        account_id: &RecordId,
        request: &ResellerContactsRequest,
    ) -> Result<PageResult<ResellerContactRow>> {
        self.record(Operation::GetResellerContacts, account_id.as_str())?;
        let mut rows = self
            .data
            .contacts_of(account_id)
            .filter(|contact| contains_ignore_case(&contact.row.name, &request.search_term))
            .map(|contact| contact.row.clone())
            .collect::<Vec<_>>();
        rows.sort_by(|left, right| compare_contacts(left, right, &request.sort_field));
        if SortDirection::parse(&request.sort_dir) == Some(SortDirection::Desc) {
            rows.reverse();
        }
        Ok(page(rows, request.page_num, request.page_size))
    }

    fn merchant_summary(&self, account_id: &RecordId) -> Result<MerchantSummary> {
        self.record(Operation::GetMerchantSummary, account_id.as_str())?;
        self.merchant_summary_of(account_id)
    }

    fn merchants_by_reseller_contact(
        &self,
        contact_id: &RecordId,
        request: &MerchantsRequest,
    ) -> Result<PageResult<MerchantRow>> {
        self.record(Operation::GetMerchantsByResellerContact, contact_id.as_str())?;
        let level = request.filter_level.parse::<u32>().ok();
        let rows = self
            .data
            .merchants_of(contact_id)
            .map(|merchant| &merchant.row)
            .filter(|row| contains_ignore_case(&row.account_name, &request.filter_name))
            .filter(|row| matches_filter(row.current_plan_type.as_deref(), &request.filter_plan))
            .filter(|row| request.filter_level.is_empty() || row.level == level)
            .filter(|row| matches_filter(row.adoption_status.as_deref(), &request.filter_status))
            .cloned()
            .collect();
        Ok(page(rows, request.page_num, request.page_size))
    }

    fn cases(
        &self,
        account_id: &RecordId,
        request: &StatusPageRequest,
    ) -> Result<PageResult<CaseRow>> {
        self.record(Operation::GetCases, account_id.as_str())?;
        let rows = self
            .data
            .cases_of(account_id)
            .filter(|case| status_matches(is_closed_case(&case.row), &request.filter_status))
            .map(|case| case.row.clone())
            .collect();
        Ok(page(rows, request.page_num, request.page_size))
    }

    fn opportunities(
        &self,
        account_id: &RecordId,
        request: &StatusPageRequest,
    ) -> Result<PageResult<OpportunityRow>> {
        self.record(Operation::GetOpportunities, account_id.as_str())?;
        let rows = self
            .data
            .opportunities_of(account_id)
            .filter(|opportunity| {
                status_matches(is_closed_opportunity(&opportunity.row), &request.filter_status)
            })
            .map(|opportunity| opportunity.row.clone())
            .collect();
        Ok(page(rows, request.page_num, request.page_size))
    }

    fn notes(&self, parent_id: &RecordId, request: &NotesRequest) -> Result<NotePage> {
        self.record(Operation::GetNotes, parent_id.as_str())?;
        let mut notes = self
            .data
            .notes_of(parent_id)
            .filter(|note| {
                matches_filter(
                    note.note.related_object_type.as_deref(),
                    &request.object_type_filter,
                )
            })
            .filter(|note| {
                request.merchant_account_filter.is_empty()
                    || note.merchant_account_id.as_ref().map(RecordId::as_str)
                        == Some(request.merchant_account_filter.as_str())
            })
            .map(|note| note.note.clone())
            .collect::<Vec<_>>();
        notes.sort_by(|left, right| right.created_date.cmp(&left.created_date));

        let shown = request.page_num.max(1) as u64 * u64::from(request.page_size);
        let result = page(notes, request.page_num, request.page_size);
        Ok(NotePage {
            has_more: result.total_count > shown,
            records: result.records,
        })
    }

    fn reseller_contact_summary(&self, contact_id: &RecordId) -> Result<ResellerContactSummary> {
        self.record(Operation::GetResellerContactSummary, contact_id.as_str())?;
        self.contact_summary_of(contact_id)
    }

    fn page_summary(&self, record_id: &RecordId, summary_type: SummaryType) -> Result<PageSummary> {
        self.record(Operation::GetPageSummary, record_id.as_str())?;
        Ok(match summary_type {
            SummaryType::PartnerInfo => {
                PageSummary::PartnerInfo(self.partner_summary_of(record_id)?)
            }
            SummaryType::MerchantSummary => {
                PageSummary::MerchantSummary(self.merchant_summary_of(record_id)?)
            }
            SummaryType::ResellerContactKpi => {
                PageSummary::ResellerContactKpi(self.contact_summary_of(record_id)?)
            }
        })
    }
}
