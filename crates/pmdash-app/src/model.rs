// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::display;
use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashboardMode {
    #[default]
    Search,
    Partner,
    Merchant,
    ResellerContact,
}

impl DashboardMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Partner => "Partner",
            Self::Merchant => "Merchant",
            Self::ResellerContact => "ResellerContact",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Search" => Some(Self::Search),
            "Partner" => Some(Self::Partner),
            "Merchant" => Some(Self::Merchant),
            "ResellerContact" => Some(Self::ResellerContact),
            _ => None,
        }
    }

    /// Mode implied by a record picked from search results.
    pub fn for_record(object_type: ObjectType, record_type: Option<RecordType>) -> Option<Self> {
        match object_type {
            ObjectType::Account if record_type == Some(RecordType::Reseller) => Some(Self::Partner),
            ObjectType::Account => Some(Self::Merchant),
            ObjectType::Contact => Some(Self::ResellerContact),
            ObjectType::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    Account,
    Contact,
    #[serde(other)]
    Other,
}

impl ObjectType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Contact => "Contact",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    Reseller,
    Standard,
    #[serde(other)]
    Other,
}

impl RecordType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reseller => "Reseller",
            Self::Standard => "Standard",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedContext {
    pub dashboard_mode: DashboardMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub record_id: RecordId,
    pub object_type: ObjectType,
    #[serde(default)]
    pub record_type: Option<RecordType>,
    #[serde(default)]
    pub name: String,
}

impl SearchResult {
    pub fn icon(&self) -> SearchIcon {
        SearchIcon::for_record(self.object_type, self.record_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchIcon {
    Contact,
    Partner,
    Account,
}

impl SearchIcon {
    pub fn for_record(object_type: ObjectType, record_type: Option<RecordType>) -> Self {
        if object_type == ObjectType::Contact {
            return Self::Contact;
        }
        if record_type == Some(RecordType::Reseller) {
            return Self::Partner;
        }
        Self::Account
    }

    pub const fn icon_name(self) -> &'static str {
        match self {
            Self::Contact => "standard:contact",
            Self::Partner => "standard:partner_marketing_budget",
            Self::Account => "standard:account",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryType {
    PartnerInfo,
    MerchantSummary,
    #[serde(rename = "ResellerContactKPI")]
    ResellerContactKpi,
}

impl SummaryType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PartnerInfo => "PartnerInfo",
            Self::MerchantSummary => "MerchantSummary",
            Self::ResellerContactKpi => "ResellerContactKPI",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PartnerInfo" => Some(Self::PartnerInfo),
            "MerchantSummary" => Some(Self::MerchantSummary),
            "ResellerContactKPI" => Some(Self::ResellerContactKpi),
            _ => None,
        }
    }

    pub const fn card_title(self) -> &'static str {
        match self {
            Self::PartnerInfo => "Partner Information",
            Self::MerchantSummary => "Merchant Summary",
            Self::ResellerContactKpi => "Reseller Contact KPIs",
        }
    }

    pub const fn card_icon(self) -> &'static str {
        match self {
            Self::PartnerInfo => "standard:partner_marketing_budget",
            Self::MerchantSummary => "utility:summary",
            Self::ResellerContactKpi => "utility:chart",
        }
    }
}

/// Plugin billing fields shared by every summary kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginBilling {
    pub plugin_monthly_fee: Option<f64>,
    pub plugin_bill_to: Option<String>,
    pub tech_fee_minimum_plan: Option<String>,
    pub ach_sold_by: Option<String>,
}

impl PluginBilling {
    pub fn has_data(&self) -> bool {
        let fee = self.plugin_monthly_fee.is_some_and(|fee| fee != 0.0);
        fee || present(&self.plugin_bill_to)
            || present(&self.tech_fee_minimum_plan)
            || present(&self.ach_sold_by)
    }

    pub fn formatted_plugin_fee(&self) -> String {
        display::format_currency(self.plugin_monthly_fee)
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|text| !text.is_empty())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartnerSummary {
    pub account_name: Option<String>,
    pub owner_name: Option<String>,
    pub total_merchants: Option<u32>,
    pub active_accounts: Option<u32>,
    pub rapids_submitted: Option<u32>,
    pub last_rapid_date: Option<String>,
    pub premium_accounts_percent: Option<f64>,
    #[serde(flatten)]
    pub billing: PluginBilling,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MerchantSummary {
    pub account_name: Option<String>,
    pub parent_account_name: Option<String>,
    pub level: Option<u32>,
    pub current_plan_type: Option<String>,
    pub adoption_status: Option<String>,
    pub last_transaction_date: Option<String>,
    #[serde(flatten)]
    pub billing: PluginBilling,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResellerContactSummary {
    pub contact_name: Option<String>,
    pub account_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub rapids_submitted: Option<u32>,
    pub last_rapid_date: Option<String>,
    pub active_accounts: Option<u32>,
    #[serde(flatten)]
    pub billing: PluginBilling,
}

/// Payload of `getPageSummary`, decoded according to the requested type.
#[derive(Debug, Clone, PartialEq)]
pub enum PageSummary {
    PartnerInfo(PartnerSummary),
    MerchantSummary(MerchantSummary),
    ResellerContactKpi(ResellerContactSummary),
}

impl PageSummary {
    pub fn summary_type(&self) -> SummaryType {
        match self {
            Self::PartnerInfo(_) => SummaryType::PartnerInfo,
            Self::MerchantSummary(_) => SummaryType::MerchantSummary,
            Self::ResellerContactKpi(_) => SummaryType::ResellerContactKpi,
        }
    }

    pub fn billing(&self) -> &PluginBilling {
        match self {
            Self::PartnerInfo(summary) => &summary.billing,
            Self::MerchantSummary(summary) => &summary.billing,
            Self::ResellerContactKpi(summary) => &summary.billing,
        }
    }

    pub fn formatted_plugin_fee(&self) -> String {
        self.billing().formatted_plugin_fee()
    }

    pub fn formatted_level(&self) -> String {
        match self {
            Self::MerchantSummary(summary) => display::format_level(summary.level),
            _ => display::NOT_AVAILABLE.to_owned(),
        }
    }

    pub fn formatted_last_transaction(&self) -> String {
        match self {
            Self::MerchantSummary(summary) => {
                display::format_date(summary.last_transaction_date.as_deref())
            }
            _ => display::NOT_AVAILABLE.to_owned(),
        }
    }

    pub fn formatted_last_rapid_date(&self) -> String {
        let raw = match self {
            Self::PartnerInfo(summary) => summary.last_rapid_date.as_deref(),
            Self::ResellerContactKpi(summary) => summary.last_rapid_date.as_deref(),
            Self::MerchantSummary(_) => None,
        };
        display::format_date(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResellerContactRow {
    pub contact_id: RecordId,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub rapids_submitted: Option<u32>,
    #[serde(default)]
    pub last_rapid_date: Option<String>,
    #[serde(default)]
    pub active_accounts: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantRow {
    pub account_id: RecordId,
    pub account_name: String,
    #[serde(default)]
    pub current_plan_type: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub adoption_status: Option<String>,
    #[serde(default)]
    pub last_transaction_date: Option<String>,
}

impl MerchantRow {
    pub fn accordion_label(&self) -> String {
        format!(
            "{} | {} | Level {} | {}",
            self.account_name,
            display::or_not_available(self.current_plan_type.as_deref()),
            self.level
                .map(|level| level.to_string())
                .unwrap_or_else(|| display::NOT_AVAILABLE.to_owned()),
            display::or_not_available(self.adoption_status.as_deref()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRow {
    pub case_id: CaseId,
    pub case_number: String,
    #[serde(default)]
    pub case_type: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityRow {
    pub opportunity_id: OpportunityId,
    pub name: String,
    #[serde(default)]
    pub opp_type: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub note_id: NoteId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub related_object_type: Option<String>,
    #[serde(default)]
    pub related_record_name: Option<String>,
}

impl Note {
    pub fn formatted_date(&self) -> String {
        display::format_datetime(self.created_date.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePage {
    #[serde(default)]
    pub records: Vec<Note>,
    #[serde(default)]
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::{
        DashboardMode, MerchantRow, MerchantSummary, ObjectType, PageSummary, PluginBilling,
        RecordType, ResolvedContext, SearchIcon, SearchResult, SummaryType,
    };
    use crate::RecordId;
    use anyhow::Result;

    #[test]
    fn mode_for_selected_record() {
        assert_eq!(
            DashboardMode::for_record(ObjectType::Account, Some(RecordType::Reseller)),
            Some(DashboardMode::Partner)
        );
        assert_eq!(
            DashboardMode::for_record(ObjectType::Account, Some(RecordType::Standard)),
            Some(DashboardMode::Merchant)
        );
        assert_eq!(
            DashboardMode::for_record(ObjectType::Account, None),
            Some(DashboardMode::Merchant)
        );
        assert_eq!(
            DashboardMode::for_record(ObjectType::Contact, None),
            Some(DashboardMode::ResellerContact)
        );
        assert_eq!(DashboardMode::for_record(ObjectType::Other, None), None);
    }

    #[test]
    fn search_icons_follow_object_and_record_type() {
        assert_eq!(
            SearchIcon::for_record(ObjectType::Contact, Some(RecordType::Reseller)),
            SearchIcon::Contact
        );
        assert_eq!(
            SearchIcon::for_record(ObjectType::Account, Some(RecordType::Reseller)),
            SearchIcon::Partner
        );
        assert_eq!(
            SearchIcon::for_record(ObjectType::Account, Some(RecordType::Standard)),
            SearchIcon::Account
        );
        assert_eq!(SearchIcon::Partner.icon_name(), "standard:partner_marketing_budget");
    }

    #[test]
    fn search_result_decodes_unknown_types() -> Result<()> {
        let result: SearchResult = serde_json::from_str(
            r#"{"recordId":"001A","objectType":"Lead","recordType":"Franchise","name":"Zed"}"#,
        )?;
        assert_eq!(result.record_id, RecordId::new("001A"));
        assert_eq!(result.object_type, ObjectType::Other);
        assert_eq!(result.record_type, Some(RecordType::Other));
        Ok(())
    }

    #[test]
    fn resolved_context_decodes_mode_tag() -> Result<()> {
        let context: ResolvedContext =
            serde_json::from_str(r#"{"dashboardMode":"ResellerContact"}"#)?;
        assert_eq!(context.dashboard_mode, DashboardMode::ResellerContact);
        assert!(serde_json::from_str::<ResolvedContext>(r#"{"dashboardMode":"Bogus"}"#).is_err());
        Ok(())
    }

    #[test]
    fn summary_decodes_flattened_billing() -> Result<()> {
        let summary: MerchantSummary = serde_json::from_str(
            r#"{"accountName":"Acme","pluginMonthlyFee":49.99,"level":3}"#,
        )?;
        assert_eq!(summary.account_name.as_deref(), Some("Acme"));
        assert_eq!(summary.level, Some(3));
        assert_eq!(summary.billing.plugin_monthly_fee, Some(49.99));
        assert!(summary.billing.has_data());
        Ok(())
    }

    #[test]
    fn billing_without_values_has_no_data() {
        let billing = PluginBilling {
            plugin_monthly_fee: Some(0.0),
            plugin_bill_to: Some(String::new()),
            ..PluginBilling::default()
        };
        assert!(!billing.has_data());
        assert_eq!(billing.formatted_plugin_fee(), "N/A");
    }

    #[test]
    fn summary_type_tags_round_trip_through_parse() {
        for kind in [
            SummaryType::PartnerInfo,
            SummaryType::MerchantSummary,
            SummaryType::ResellerContactKpi,
        ] {
            assert_eq!(SummaryType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(SummaryType::ResellerContactKpi.card_title(), "Reseller Contact KPIs");
    }

    #[test]
    fn unknown_summary_type_is_rejected() {
        assert_eq!(SummaryType::parse("ForecastSummary"), None);
        assert!(serde_json::from_str::<SummaryType>("\"ForecastSummary\"").is_err());
    }

    #[test]
    fn page_summary_level_only_for_merchants() {
        let merchant = PageSummary::MerchantSummary(MerchantSummary {
            level: Some(2),
            ..MerchantSummary::default()
        });
        assert_eq!(merchant.formatted_level(), "Level 2");
        let partner = PageSummary::PartnerInfo(Default::default());
        assert_eq!(partner.formatted_level(), "N/A");
        assert_eq!(partner.formatted_last_rapid_date(), "N/A");
    }

    #[test]
    fn merchant_accordion_label_fills_gaps() {
        let row = MerchantRow {
            account_id: RecordId::new("001M"),
            account_name: "Corner Cafe".to_owned(),
            current_plan_type: Some("Premium".to_owned()),
            level: None,
            adoption_status: None,
            last_transaction_date: None,
        };
        assert_eq!(row.accordion_label(), "Corner Cafe | Premium | Level N/A | N/A");
    }
}
