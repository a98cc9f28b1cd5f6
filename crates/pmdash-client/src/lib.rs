// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use pmdash_app::{
    CaseRow, MerchantRow, MerchantSummary, MerchantsRequest, NotePage, NotesRequest, Operation,
    OpportunityRow, PageResult, PageSummary, PartnerSummary, QueryService, RecordId,
    ResellerContactRow, ResellerContactSummary, ResellerContactsRequest, ResolvedContext,
    SearchResult, StatusPageRequest, SummaryType,
};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

/// Blocking client for the dashboard query service. Every operation is a
/// `POST <base_url>/<operation>` with a JSON object of named parameters.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    access_token: Option<String>,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, access_token: Option<&str>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("service.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("service.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "service.base_url must use http or https, got {:?}",
                parsed.scheme()
            );
        }
        if timeout.is_zero() {
            bail!("service.timeout must be positive");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            access_token: access_token
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_owned),
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn endpoint(&self, operation: Operation) -> String {
        format!("{}/{}", self.base_url, operation.as_str())
    }

    fn call<R: DeserializeOwned>(&self, operation: Operation, body: &Value) -> Result<R> {
        tracing::debug!(operation = operation.as_str(), "calling query service");
        let mut request = self.http.post(self.endpoint(operation)).json(body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body))
                .with_context(|| format!("{} failed", operation.as_str()));
        }

        response
            .json()
            .with_context(|| format!("decode {} response", operation.as_str()))
    }

    fn call_keyed<P: Serialize, R: DeserializeOwned>(
        &self,
        operation: Operation,
        key: &str,
        id: &RecordId,
        params: &P,
    ) -> Result<R> {
        let body = keyed_body(key, id, params)?;
        self.call(operation, &body)
    }
}

fn keyed_body<P: Serialize>(key: &str, id: &RecordId, params: &P) -> Result<Value> {
    let mut body = match serde_json::to_value(params).context("encode request parameters")? {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => bail!("request parameters must encode as an object, got {other}"),
    };
    body.insert(key.to_owned(), Value::String(id.as_str().to_owned()));
    Ok(Value::Object(body))
}

impl QueryService for Client {
    fn search_records(&self, search_term: &str) -> Result<Vec<SearchResult>> {
        self.call(
            Operation::SearchRecords,
            &serde_json::json!({ "searchTerm": search_term }),
        )
    }

    fn resolve_context(&self, record_id: &RecordId) -> Result<ResolvedContext> {
        self.call_keyed(Operation::ResolveContext, "recordId", record_id, &())
    }

    fn partner_summary(&self, account_id: &RecordId) -> Result<PartnerSummary> {
        self.call_keyed(Operation::GetPartnerSummary, "accountId", account_id, &())
    }

    fn reseller_contacts(
        &self,
        account_id: &RecordId,
        request: &ResellerContactsRequest,
    ) -> Result<PageResult<ResellerContactRow>> {
        self.call_keyed(
            Operation::GetResellerContacts,
            "accountId",
            account_id,
            request,
        )
    }

    fn merchant_summary(&self, account_id: &RecordId) -> Result<MerchantSummary> {
        self.call_keyed(Operation::GetMerchantSummary, "accountId", account_id, &())
    }

    fn merchants_by_reseller_contact(
        &self,
        contact_id: &RecordId,
        request: &MerchantsRequest,
    ) -> Result<PageResult<MerchantRow>> {
        self.call_keyed(
            Operation::GetMerchantsByResellerContact,
            "contactId",
            contact_id,
            request,
        )
    }

    fn cases(
        &self,
        account_id: &RecordId,
        request: &StatusPageRequest,
    ) -> Result<PageResult<CaseRow>> {
        self.call_keyed(Operation::GetCases, "accountId", account_id, request)
    }

    fn opportunities(
        &self,
        account_id: &RecordId,
        request: &StatusPageRequest,
    ) -> Result<PageResult<OpportunityRow>> {
        self.call_keyed(Operation::GetOpportunities, "accountId", account_id, request)
    }

    fn notes(&self, parent_id: &RecordId, request: &NotesRequest) -> Result<NotePage> {
        self.call_keyed(Operation::GetNotes, "parentId", parent_id, request)
    }

    fn reseller_contact_summary(&self, contact_id: &RecordId) -> Result<ResellerContactSummary> {
        self.call_keyed(
            Operation::GetResellerContactSummary,
            "contactId",
            contact_id,
            &(),
        )
    }

    fn page_summary(&self, record_id: &RecordId, summary_type: SummaryType) -> Result<PageSummary> {
        let envelope: PageSummaryEnvelope = self.call_keyed(
            Operation::GetPageSummary,
            "recordId",
            record_id,
            &serde_json::json!({ "summaryType": summary_type.as_str() }),
        )?;
        decode_page_summary(summary_type, envelope.data)
    }
}

#[derive(Debug, Deserialize)]
struct PageSummaryEnvelope {
    #[serde(default)]
    data: Value,
}

fn decode_page_summary(summary_type: SummaryType, data: Value) -> Result<PageSummary> {
    if data.is_null() {
        bail!("{} summary has no data", summary_type.as_str());
    }
    let context = || format!("decode {} summary", summary_type.as_str());
    let summary = match summary_type {
        SummaryType::PartnerInfo => {
            PageSummary::PartnerInfo(serde_json::from_value(data).with_context(context)?)
        }
        SummaryType::MerchantSummary => {
            PageSummary::MerchantSummary(serde_json::from_value(data).with_context(context)?)
        }
        SummaryType::ResellerContactKpi => {
            PageSummary::ResellerContactKpi(serde_json::from_value(data).with_context(context)?)
        }
    };
    Ok(summary)
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!(
            "{base_url} timed out -- raise service.timeout or check the network ({error})"
        );
    }
    anyhow!("cannot reach {base_url} -- check service.base_url in your config ({error})")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlatformError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error_code: Option<String>,
}

impl PlatformError {
    fn describe(&self, status: StatusCode) -> Option<anyhow::Error> {
        if self.message.is_empty() {
            return None;
        }
        Some(match self.error_code.as_deref() {
            Some(code) if !code.is_empty() => {
                anyhow!("server error ({}): {} [{code}]", status.as_u16(), self.message)
            }
            _ => anyhow!("server error ({}): {}", status.as_u16(), self.message),
        })
    }
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(errors) = serde_json::from_str::<Vec<PlatformError>>(body)
        && let Some(error) = errors.iter().find_map(|error| error.describe(status))
    {
        return error;
    }

    if let Ok(parsed) = serde_json::from_str::<PlatformError>(body)
        && let Some(error) = parsed.describe(status)
    {
        return error;
    }

    let body = body.trim();
    if !body.is_empty() && body.len() < 100 && !body.contains('{') && !body.contains('[') {
        return anyhow!("server error ({}): {}", status.as_u16(), body);
    }

    anyhow!("server returned {}", status.as_u16())
}
