// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Per-mode detail pages. Each page composes its summary loader with the
//! lists it shows and reports the names it learns back to the dashboard.

use crate::display;
use crate::{
    CONTACT_SEARCH_FILTER, CaseRow, ChildEvent, DashboardMode, FetchOutcome, MerchantRow,
    MerchantSummary, OpportunityRow, PageSummaryCard, PagedList, PartnerSummary, QueryService,
    RecordId, ResellerContactRow, ResellerContactSummary, STATUS_FILTER, SortDirection,
    StatusFilter, SummaryLoader, SummaryType,
};

fn non_blank(value: Option<&String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty()).cloned()
}

fn record_loaded(
    record_name: Option<String>,
    parent_account_name: Option<String>,
) -> Vec<ChildEvent> {
    if record_name.is_none() && parent_account_name.is_none() {
        return Vec::new();
    }
    vec![ChildEvent::RecordLoaded {
        record_name,
        parent_account_name,
    }]
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartnerPage {
    account_id: RecordId,
    partner_account_name: Option<String>,
    summary: SummaryLoader<PartnerSummary>,
    contacts: PagedList<ResellerContactRow>,
    open_sections: Vec<RecordId>,
}

impl PartnerPage {
    /// `partner_account_name` is the name already known to the dashboard and
    /// wins over the fetched one.
    pub fn new(account_id: RecordId, partner_account_name: Option<String>) -> Self {
        Self {
            summary: SummaryLoader::new(Some(account_id.clone())),
            contacts: PagedList::new(account_id.clone()),
            account_id,
            partner_account_name,
            open_sections: Vec::new(),
        }
    }

    pub fn account_id(&self) -> &RecordId {
        &self.account_id
    }

    pub fn summary(&self) -> &SummaryLoader<PartnerSummary> {
        &self.summary
    }

    pub fn contacts(&self) -> &PagedList<ResellerContactRow> {
        &self.contacts
    }

    pub fn contacts_mut(&mut self) -> &mut PagedList<ResellerContactRow> {
        &mut self.contacts
    }

    pub fn open_sections(&self) -> &[RecordId] {
        &self.open_sections
    }

    pub fn load(&mut self, service: &dyn QueryService) -> Vec<ChildEvent> {
        self.summary.load(service);
        self.contacts.refresh(service);
        let fetched = self
            .summary
            .summary()
            .and_then(|summary| non_blank(summary.account_name.as_ref()));
        record_loaded(fetched, None)
    }

    pub fn search_contacts(&mut self, service: &dyn QueryService, text: &str) -> FetchOutcome {
        let ticket = self.contacts.apply_filter(CONTACT_SEARCH_FILTER, text);
        self.contacts.execute(service, &ticket)
    }

    pub fn sort_contacts(&mut self, service: &dyn QueryService, field: &str) -> FetchOutcome {
        let ticket = self.contacts.change_sort(field);
        self.contacts.execute(service, &ticket)
    }

    pub fn set_sort_direction(
        &mut self,
        service: &dyn QueryService,
        direction: SortDirection,
    ) -> FetchOutcome {
        let ticket = self.contacts.change_sort_direction(direction);
        self.contacts.execute(service, &ticket)
    }

    pub fn set_open_sections(&mut self, open_sections: Vec<RecordId>) {
        self.open_sections = open_sections;
    }

    pub fn open_notes(&self) -> ChildEvent {
        ChildEvent::OpenNotes {
            parent_id: self.account_id.clone(),
        }
    }

    pub fn display_partner_account_name(&self) -> String {
        display::display_name(
            self.partner_account_name.as_deref(),
            self.summary
                .summary()
                .and_then(|summary| summary.account_name.as_deref()),
            crate::DEFAULT_PARTNER_NAME,
        )
    }

    pub fn has_partner_data(&self) -> bool {
        self.summary
            .summary()
            .is_some_and(|summary| summary.billing.has_data())
    }

    pub fn formatted_last_rapid_date(&self) -> String {
        display::format_date(
            self.summary
                .summary()
                .and_then(|summary| summary.last_rapid_date.as_deref()),
        )
    }

    pub fn formatted_plugin_fee(&self) -> String {
        display::format_currency(
            self.summary
                .summary()
                .and_then(|summary| summary.billing.plugin_monthly_fee),
        )
    }

    pub fn formatted_premium_percent(&self) -> String {
        display::format_percent(
            self.summary
                .summary()
                .and_then(|summary| summary.premium_accounts_percent),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MerchantPage {
    account_id: RecordId,
    summary: SummaryLoader<MerchantSummary>,
    cases: PagedList<CaseRow>,
    opportunities: PagedList<OpportunityRow>,
}

impl MerchantPage {
    pub fn new(account_id: RecordId) -> Self {
        Self {
            summary: SummaryLoader::new(Some(account_id.clone())),
            cases: PagedList::new(account_id.clone()),
            opportunities: PagedList::new(account_id.clone()),
            account_id,
        }
    }

    pub fn account_id(&self) -> &RecordId {
        &self.account_id
    }

    pub fn summary(&self) -> &SummaryLoader<MerchantSummary> {
        &self.summary
    }

    pub fn cases(&self) -> &PagedList<CaseRow> {
        &self.cases
    }

    pub fn cases_mut(&mut self) -> &mut PagedList<CaseRow> {
        &mut self.cases
    }

    pub fn opportunities(&self) -> &PagedList<OpportunityRow> {
        &self.opportunities
    }

    pub fn opportunities_mut(&mut self) -> &mut PagedList<OpportunityRow> {
        &mut self.opportunities
    }

    pub fn load(&mut self, service: &dyn QueryService) -> Vec<ChildEvent> {
        self.summary.load(service);
        self.cases.refresh(service);
        self.opportunities.refresh(service);
        match self.summary.summary() {
            Some(summary) => record_loaded(
                non_blank(summary.account_name.as_ref()),
                non_blank(summary.parent_account_name.as_ref()),
            ),
            None => Vec::new(),
        }
    }

    pub fn filter_cases(
        &mut self,
        service: &dyn QueryService,
        status: StatusFilter,
    ) -> FetchOutcome {
        let ticket = self.cases.apply_filter(STATUS_FILTER, status.as_str());
        self.cases.execute(service, &ticket)
    }

    pub fn filter_opportunities(
        &mut self,
        service: &dyn QueryService,
        status: StatusFilter,
    ) -> FetchOutcome {
        let ticket = self.opportunities.apply_filter(STATUS_FILTER, status.as_str());
        self.opportunities.execute(service, &ticket)
    }

    pub fn open_notes(&self) -> ChildEvent {
        ChildEvent::OpenNotes {
            parent_id: self.account_id.clone(),
        }
    }

    pub fn has_partner_data(&self) -> bool {
        self.summary
            .summary()
            .is_some_and(|summary| summary.billing.has_data())
    }

    pub fn show_partner_summary(&self) -> bool {
        self.has_partner_data()
    }

    /// Bare level number; the summary card renders it as "Level N".
    pub fn formatted_level(&self) -> String {
        display::format_count(
            self.summary
                .summary()
                .and_then(|summary| summary.level)
                .filter(|level| *level != 0),
        )
    }

    pub fn formatted_last_transaction(&self) -> String {
        display::format_date(
            self.summary
                .summary()
                .and_then(|summary| summary.last_transaction_date.as_deref()),
        )
    }

    pub fn formatted_plugin_fee(&self) -> String {
        display::format_currency(
            self.summary
                .summary()
                .and_then(|summary| summary.billing.plugin_monthly_fee),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResellerContactPage {
    contact_id: RecordId,
    summary: SummaryLoader<ResellerContactSummary>,
    merchants: PagedList<MerchantRow>,
    open_merchant_sections: Vec<RecordId>,
}

impl ResellerContactPage {
    pub fn new(contact_id: RecordId) -> Self {
        Self {
            summary: SummaryLoader::new(Some(contact_id.clone())),
            merchants: PagedList::new(contact_id.clone()),
            contact_id,
            open_merchant_sections: Vec::new(),
        }
    }

    pub fn contact_id(&self) -> &RecordId {
        &self.contact_id
    }

    pub fn summary(&self) -> &SummaryLoader<ResellerContactSummary> {
        &self.summary
    }

    pub fn merchants(&self) -> &PagedList<MerchantRow> {
        &self.merchants
    }

    pub fn merchants_mut(&mut self) -> &mut PagedList<MerchantRow> {
        &mut self.merchants
    }

    pub fn open_merchant_sections(&self) -> &[RecordId] {
        &self.open_merchant_sections
    }

    pub fn load(&mut self, service: &dyn QueryService) -> Vec<ChildEvent> {
        self.summary.load(service);
        self.merchants.refresh(service);
        match self.summary.summary() {
            Some(summary) => record_loaded(
                non_blank(summary.contact_name.as_ref()),
                non_blank(summary.account_name.as_ref()),
            ),
            None => Vec::new(),
        }
    }

    /// Sets one of the merchant filters (`name`, `plan`, `level`, `status`).
    pub fn filter_merchants(
        &mut self,
        service: &dyn QueryService,
        name: &str,
        value: &str,
    ) -> FetchOutcome {
        let ticket = self.merchants.apply_filter(name, value);
        self.merchants.execute(service, &ticket)
    }

    pub fn accordion_labels(&self) -> Vec<String> {
        self.merchants
            .records()
            .iter()
            .map(MerchantRow::accordion_label)
            .collect()
    }

    pub fn set_open_merchant_sections(&mut self, open_sections: Vec<RecordId>) {
        self.open_merchant_sections = open_sections;
    }

    pub fn open_notes(&self) -> ChildEvent {
        ChildEvent::OpenNotes {
            parent_id: self.contact_id.clone(),
        }
    }

    pub fn open_merchant_notes(&self, index: usize) -> Option<ChildEvent> {
        let merchant = self.merchants.records().get(index)?;
        Some(ChildEvent::OpenNotes {
            parent_id: merchant.account_id.clone(),
        })
    }

    pub fn has_partner_data(&self) -> bool {
        self.summary
            .summary()
            .is_some_and(|summary| summary.billing.has_data())
    }

    pub fn formatted_last_rapid_date(&self) -> String {
        display::format_date(
            self.summary
                .summary()
                .and_then(|summary| summary.last_rapid_date.as_deref()),
        )
    }

    pub fn formatted_plugin_fee(&self) -> String {
        display::format_currency(
            self.summary
                .summary()
                .and_then(|summary| summary.billing.plugin_monthly_fee),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPage {
    Partner(PartnerPage),
    Merchant(MerchantPage),
    ResellerContact(ResellerContactPage),
}

impl DetailPage {
    /// Builds a fresh page, so every list starts from its default query.
    pub fn for_mode(
        mode: DashboardMode,
        record_id: RecordId,
        shared_name: Option<String>,
    ) -> Option<Self> {
        match mode {
            DashboardMode::Partner => Some(Self::Partner(PartnerPage::new(record_id, shared_name))),
            DashboardMode::Merchant => Some(Self::Merchant(MerchantPage::new(record_id))),
            DashboardMode::ResellerContact => {
                Some(Self::ResellerContact(ResellerContactPage::new(record_id)))
            }
            DashboardMode::Search => None,
        }
    }

    pub fn mode(&self) -> DashboardMode {
        match self {
            Self::Partner(_) => DashboardMode::Partner,
            Self::Merchant(_) => DashboardMode::Merchant,
            Self::ResellerContact(_) => DashboardMode::ResellerContact,
        }
    }

    pub fn record_id(&self) -> &RecordId {
        match self {
            Self::Partner(page) => page.account_id(),
            Self::Merchant(page) => page.account_id(),
            Self::ResellerContact(page) => page.contact_id(),
        }
    }

    pub fn summary_type(&self) -> SummaryType {
        match self {
            Self::Partner(_) => SummaryType::PartnerInfo,
            Self::Merchant(_) => SummaryType::MerchantSummary,
            Self::ResellerContact(_) => SummaryType::ResellerContactKpi,
        }
    }

    pub fn summary_card(&self) -> PageSummaryCard {
        PageSummaryCard::with_type(Some(self.record_id().clone()), self.summary_type())
    }

    pub fn load(&mut self, service: &dyn QueryService) -> Vec<ChildEvent> {
        match self {
            Self::Partner(page) => page.load(service),
            Self::Merchant(page) => page.load(service),
            Self::ResellerContact(page) => page.load(service),
        }
    }

    pub fn open_notes(&self) -> ChildEvent {
        match self {
            Self::Partner(page) => page.open_notes(),
            Self::Merchant(page) => page.open_notes(),
            Self::ResellerContact(page) => page.open_notes(),
        }
    }
}
