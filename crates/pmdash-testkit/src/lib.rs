// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod fake;

pub use fake::{Call, FakeQueryService};

use pmdash_app::{
    CaseId, CaseRow, MerchantRow, MerchantSummary, Note, NoteId, OpportunityId, OpportunityRow,
    PartnerSummary, PluginBilling, RecordId, ResellerContactRow, ResellerContactSummary,
};
use time::{Date, Duration, Month, OffsetDateTime};

const COMPANY_ADJECTIVES: [&str; 12] = [
    "Summit",
    "Harbor",
    "Northwind",
    "Bright",
    "Keystone",
    "Liberty",
    "Granite",
    "Riverside",
    "Evergreen",
    "Pioneer",
    "Lakeshore",
    "Copper",
];
const PARTNER_NOUNS: [&str; 6] = [
    "Payments",
    "Merchant Services",
    "Processing",
    "Commerce",
    "Fintech",
    "Card Solutions",
];
const PARTNER_SUFFIXES: [&str; 4] = ["Group", "Partners", "LLC", "Inc"];
const MERCHANT_NOUNS: [&str; 14] = [
    "Bakery",
    "Hardware",
    "Coffee",
    "Dental",
    "Auto Repair",
    "Florist",
    "Bistro",
    "Pet Supply",
    "Fitness",
    "Books",
    "Tailor",
    "Market",
    "Salon",
    "Outfitters",
];

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];
const CONTACT_TITLES: [&str; 5] = [
    "Sales Director",
    "Account Executive",
    "Relationship Manager",
    "Partner Manager",
    "Regional VP",
];

const PLANS: [&str; 3] = ["Basic", "Premium", "Enterprise"];
const ADOPTION_STATUSES: [&str; 3] = ["Active", "Onboarding", "Churned"];
const BILL_TO: [&str; 2] = ["Partner", "Merchant"];
const ACH_SOLD_BY: [&str; 2] = ["PNC", "Partner"];
const PLUGIN_FEES: [f64; 5] = [29.99, 49.99, 99.0, 149.5, 1250.0];

const CASE_TYPES: [&str; 4] = ["Support", "Billing", "Onboarding", "Technical"];
const CASE_STATUSES: [&str; 4] = ["New", "Working", "Escalated", "Closed"];
const CASE_CATEGORIES: [(&str, &str); 4] = [
    ("Payments", "Declines"),
    ("Payments", "Chargebacks"),
    ("Hardware", "Terminal"),
    ("Account", "Access"),
];
const OPPORTUNITY_TYPES: [&str; 3] = ["New Business", "Upsell", "Renewal"];
const OPPORTUNITY_STAGES: [&str; 5] = [
    "Prospecting",
    "Qualification",
    "Negotiation",
    "Closed Won",
    "Closed Lost",
];
const NOTE_TOPICS: [&str; 8] = [
    "Quarterly review",
    "Pricing discussion",
    "Terminal swap",
    "Chargeback follow-up",
    "Plugin billing question",
    "Onboarding call",
    "Renewal prep",
    "Escalation recap",
];

const REFERENCE_YEAR: i32 = 2024;

pub const PARTNER_PREFIX: &str = "001";
pub const CONTACT_PREFIX: &str = "003";
pub const CASE_PREFIX: &str = "500";
pub const OPPORTUNITY_PREFIX: &str = "006";
pub const NOTE_PREFIX: &str = "002";

/// Builds a 15-character platform-style id from a key prefix.
pub fn record_id(prefix: &str, index: usize) -> String {
    format!("{prefix}{index:012}")
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of dashboard records. The same seed always yields the
/// same sequence.
#[derive(Debug, Clone)]
pub struct DashFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl DashFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn partner_name(&mut self) -> String {
        format!(
            "{} {} {}",
            self.pick(&COMPANY_ADJECTIVES),
            self.pick(&PARTNER_NOUNS),
            self.pick(&PARTNER_SUFFIXES),
        )
    }

    pub fn merchant_name(&mut self) -> String {
        if self.rng.bool() {
            format!("{}'s {}", self.pick(&FIRST_NAMES), self.pick(&MERCHANT_NOUNS))
        } else {
            format!(
                "{} {}",
                self.pick(&COMPANY_ADJECTIVES),
                self.pick(&MERCHANT_NOUNS)
            )
        }
    }

    pub fn person_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    pub fn email(&mut self, person: &str) -> String {
        let local = person.to_ascii_lowercase().replace(' ', ".");
        format!("{local}@partner{}.example.com", self.int_n(90) + 10)
    }

    pub fn phone(&mut self) -> String {
        format!("(555) {:03}-{:04}", self.int_n(900) + 100, self.int_n(10_000))
    }

    pub fn plugin_billing(&mut self) -> PluginBilling {
        if self.int_n(3) == 0 {
            return PluginBilling::default();
        }
        PluginBilling {
            plugin_monthly_fee: Some(PLUGIN_FEES[self.int_n(PLUGIN_FEES.len())]),
            plugin_bill_to: Some(self.pick(&BILL_TO).to_owned()),
            tech_fee_minimum_plan: Some(self.pick(&PLANS).to_owned()),
            ach_sold_by: Some(self.pick(&ACH_SOLD_BY).to_owned()),
        }
    }

    pub fn merchant_row(&mut self, account_id: RecordId) -> MerchantRow {
        MerchantRow {
            account_id,
            account_name: self.merchant_name(),
            current_plan_type: Some(self.pick(&PLANS).to_owned()),
            level: Some(self.int_n(5) as u32 + 1),
            adoption_status: Some(self.pick(&ADOPTION_STATUSES).to_owned()),
            last_transaction_date: Some(date_string(self.date_in_year(REFERENCE_YEAR))),
        }
    }

    pub fn contact_row(&mut self, contact_id: RecordId) -> ResellerContactRow {
        let name = self.person_name();
        ResellerContactRow {
            contact_id,
            email: Some(self.email(&name)),
            phone: Some(self.phone()),
            title: Some(self.pick(&CONTACT_TITLES).to_owned()),
            rapids_submitted: Some(self.int_n(40) as u32),
            last_rapid_date: Some(date_string(self.date_in_year(REFERENCE_YEAR))),
            active_accounts: None,
            name,
        }
    }

    pub fn case_row(&mut self, case_id: CaseId, number: usize) -> CaseRow {
        let (category, sub_category) = CASE_CATEGORIES[self.int_n(CASE_CATEGORIES.len())];
        CaseRow {
            case_id,
            case_number: format!("{number:08}"),
            case_type: Some(self.pick(&CASE_TYPES).to_owned()),
            owner_name: Some(self.person_name()),
            status: Some(self.pick(&CASE_STATUSES).to_owned()),
            category: Some(category.to_owned()),
            sub_category: Some(sub_category.to_owned()),
            summary: Some(self.sentence()),
        }
    }

    pub fn opportunity_row(
        &mut self,
        opportunity_id: OpportunityId,
        merchant: &str,
    ) -> OpportunityRow {
        let opp_type = self.pick(&OPPORTUNITY_TYPES);
        OpportunityRow {
            opportunity_id,
            name: format!("{merchant} - {opp_type}"),
            opp_type: Some(opp_type.to_owned()),
            stage: Some(self.pick(&OPPORTUNITY_STAGES).to_owned()),
        }
    }

    pub fn note(&mut self, note_id: NoteId, related_object_type: &str, related_name: &str) -> Note {
        Note {
            note_id,
            title: Some(self.pick(&NOTE_TOPICS).to_owned()),
            body: Some(self.sentence()),
            created_date: Some(datetime_string(self.date_in_year(REFERENCE_YEAR))),
            created_by_name: Some(self.person_name()),
            related_object_type: Some(related_object_type.to_owned()),
            related_record_name: Some(related_name.to_owned()),
        }
    }

    pub fn date_in_year(&mut self, year: i32) -> OffsetDateTime {
        let Ok(start) = Date::from_calendar_date(year, Month::January, 1) else {
            return OffsetDateTime::UNIX_EPOCH;
        };
        let start = start.midnight().assume_utc();
        let seconds = self.rng.next_u64() % (365 * 24 * 60 * 60);
        start + Duration::seconds(seconds as i64)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn sentence(&mut self) -> String {
        const WORDS: [&str; 20] = [
            "merchant",
            "terminal",
            "settlement",
            "deposit",
            "review",
            "pricing",
            "batch",
            "declined",
            "refund",
            "gateway",
            "plugin",
            "invoice",
            "follow",
            "up",
            "call",
            "scheduled",
            "resolved",
            "pending",
            "partner",
            "statement",
        ];

        let count = 4 + self.int_n(6);
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.pick(&WORDS).to_owned());
        }
        let mut sentence = parts.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }
}

pub fn date_string(at: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        at.year(),
        u8::from(at.month()),
        at.day()
    )
}

pub fn datetime_string(at: OffsetDateTime) -> String {
    format!(
        "{}T{:02}:{:02}:{:02}Z",
        date_string(at),
        at.hour(),
        at.minute(),
        at.second()
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoPartner {
    pub account_id: RecordId,
    pub summary: PartnerSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoContact {
    pub partner_id: RecordId,
    pub row: ResellerContactRow,
    pub summary: ResellerContactSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoMerchant {
    pub partner_id: RecordId,
    pub contact_id: RecordId,
    pub row: MerchantRow,
    pub summary: MerchantSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoCase {
    pub account_id: RecordId,
    pub row: CaseRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoOpportunity {
    pub account_id: RecordId,
    pub row: OpportunityRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoNote {
    pub parent_id: RecordId,
    pub merchant_account_id: Option<RecordId>,
    pub note: Note,
}

/// A connected data set: partners own contacts, contacts manage merchants,
/// merchants carry cases, opportunities and notes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DemoData {
    pub partners: Vec<DemoPartner>,
    pub contacts: Vec<DemoContact>,
    pub merchants: Vec<DemoMerchant>,
    pub cases: Vec<DemoCase>,
    pub opportunities: Vec<DemoOpportunity>,
    pub notes: Vec<DemoNote>,
}

impl DemoData {
    pub fn generate(seed: u64) -> Self {
        let mut faker = DashFaker::new(seed);
        let mut data = Self::default();
        let mut next_account = 1;

        for _ in 0..2 {
            let partner_id = RecordId::new(record_id(PARTNER_PREFIX, next_account));
            next_account += 1;
            let partner_name = faker.partner_name();

            for _ in 0..3 + faker.int_n(2) {
                let contact_id =
                    RecordId::new(record_id(CONTACT_PREFIX, data.contacts.len() + 1));
                let row = faker.contact_row(contact_id.clone());
                let contact_name = row.name.clone();

                for _ in 0..3 + faker.int_n(5) {
                    let account_id = RecordId::new(record_id(PARTNER_PREFIX, next_account));
                    next_account += 1;
                    data.add_merchant(
                        &mut faker,
                        &partner_id,
                        &partner_name,
                        &contact_id,
                        account_id,
                    );
                }

                let active_accounts = data
                    .merchants
                    .iter()
                    .filter(|merchant| {
                        merchant.contact_id == contact_id
                            && merchant.row.adoption_status.as_deref() == Some("Active")
                    })
                    .count() as u32;
                data.contacts.push(DemoContact {
                    partner_id: partner_id.clone(),
                    summary: ResellerContactSummary {
                        contact_name: Some(contact_name.clone()),
                        account_name: Some(partner_name.clone()),
                        title: row.title.clone(),
                        email: row.email.clone(),
                        phone: row.phone.clone(),
                        rapids_submitted: row.rapids_submitted,
                        last_rapid_date: row.last_rapid_date.clone(),
                        active_accounts: Some(active_accounts),
                        billing: faker.plugin_billing(),
                    },
                    row: ResellerContactRow {
                        active_accounts: Some(active_accounts),
                        ..row
                    },
                });

                for _ in 0..faker.int_n(3) {
                    data.add_note(&mut faker, &contact_id, None, "Contact", &contact_name);
                }
            }

            for _ in 0..12 {
                data.add_note(&mut faker, &partner_id, None, "Account", &partner_name);
            }

            let summary = data.partner_summary(&mut faker, &partner_id, partner_name);
            data.partners.push(DemoPartner {
                account_id: partner_id,
                summary,
            });
        }

        data
    }

    fn add_merchant(
        &mut self,
        faker: &mut DashFaker,
        partner_id: &RecordId,
        partner_name: &str,
        contact_id: &RecordId,
        account_id: RecordId,
    ) {
        let row = faker.merchant_row(account_id.clone());
        let name = row.account_name.clone();

        for _ in 0..faker.int_n(9) {
            let index = self.cases.len() + 1;
            let case_id = CaseId::new(record_id(CASE_PREFIX, index));
            self.cases.push(DemoCase {
                account_id: account_id.clone(),
                row: faker.case_row(case_id, index),
            });
        }
        for _ in 0..faker.int_n(8) {
            let opportunity_id =
                OpportunityId::new(record_id(OPPORTUNITY_PREFIX, self.opportunities.len() + 1));
            self.opportunities.push(DemoOpportunity {
                account_id: account_id.clone(),
                row: faker.opportunity_row(opportunity_id, &name),
            });
        }
        for _ in 0..faker.int_n(4) {
            let object_type = ["Account", "Case", "Opportunity"][faker.int_n(3)];
            self.add_note(faker, &account_id, Some(&account_id), object_type, &name);
        }

        self.merchants.push(DemoMerchant {
            partner_id: partner_id.clone(),
            contact_id: contact_id.clone(),
            summary: MerchantSummary {
                account_name: Some(name),
                parent_account_name: Some(partner_name.to_owned()),
                level: row.level,
                current_plan_type: row.current_plan_type.clone(),
                adoption_status: row.adoption_status.clone(),
                last_transaction_date: row.last_transaction_date.clone(),
                billing: faker.plugin_billing(),
            },
            row,
        });
    }

    fn add_note(
        &mut self,
        faker: &mut DashFaker,
        parent_id: &RecordId,
        merchant_account_id: Option<&RecordId>,
        object_type: &str,
        related_name: &str,
    ) {
        let note_id = NoteId::new(record_id(NOTE_PREFIX, self.notes.len() + 1));
        self.notes.push(DemoNote {
            parent_id: parent_id.clone(),
            merchant_account_id: merchant_account_id.cloned(),
            note: faker.note(note_id, object_type, related_name),
        });
    }

    fn partner_summary(
        &self,
        faker: &mut DashFaker,
        partner_id: &RecordId,
        partner_name: String,
    ) -> PartnerSummary {
        let merchants = self
            .merchants
            .iter()
            .filter(|merchant| &merchant.partner_id == partner_id)
            .collect::<Vec<_>>();
        let status_count = |status: &str| {
            merchants
                .iter()
                .filter(|merchant| merchant.row.adoption_status.as_deref() == Some(status))
                .count()
        };
        let premium = merchants
            .iter()
            .filter(|merchant| merchant.row.current_plan_type.as_deref() != Some("Basic"))
            .count();
        let contacts = self
            .contacts
            .iter()
            .filter(|contact| &contact.partner_id == partner_id);
        let rapids_submitted = contacts
            .clone()
            .filter_map(|contact| contact.row.rapids_submitted)
            .sum();
        let last_rapid_date = contacts
            .filter_map(|contact| contact.row.last_rapid_date.clone())
            .max();

        PartnerSummary {
            account_name: Some(partner_name),
            owner_name: Some(faker.person_name()),
            total_merchants: Some(merchants.len() as u32),
            active_accounts: Some(status_count("Active") as u32),
            rapids_submitted: Some(rapids_submitted),
            last_rapid_date,
            premium_accounts_percent: (!merchants.is_empty())
                .then(|| premium as f64 * 100.0 / merchants.len() as f64),
            billing: faker.plugin_billing(),
        }
    }

    pub fn partner(&self, account_id: &RecordId) -> Option<&DemoPartner> {
        self.partners
            .iter()
            .find(|partner| &partner.account_id == account_id)
    }

    pub fn contact(&self, contact_id: &RecordId) -> Option<&DemoContact> {
        self.contacts
            .iter()
            .find(|contact| &contact.row.contact_id == contact_id)
    }

    pub fn merchant(&self, account_id: &RecordId) -> Option<&DemoMerchant> {
        self.merchants
            .iter()
            .find(|merchant| &merchant.row.account_id == account_id)
    }

    pub fn contacts_of(&self, partner_id: &RecordId) -> impl Iterator<Item = &DemoContact> {
        self.contacts
            .iter()
            .filter(move |contact| &contact.partner_id == partner_id)
    }

    pub fn merchants_of(&self, contact_id: &RecordId) -> impl Iterator<Item = &DemoMerchant> {
        self.merchants
            .iter()
            .filter(move |merchant| &merchant.contact_id == contact_id)
    }

    pub fn cases_of(&self, account_id: &RecordId) -> impl Iterator<Item = &DemoCase> {
        self.cases
            .iter()
            .filter(move |case| &case.account_id == account_id)
    }

    pub fn opportunities_of(
        &self,
        account_id: &RecordId,
    ) -> impl Iterator<Item = &DemoOpportunity> {
        self.opportunities
            .iter()
            .filter(move |opportunity| &opportunity.account_id == account_id)
    }

    pub fn notes_of(&self, parent_id: &RecordId) -> impl Iterator<Item = &DemoNote> {
        self.notes
            .iter()
            .filter(move |note| &note.parent_id == parent_id)
    }
}

pub fn is_closed_case(row: &CaseRow) -> bool {
    row.status.as_deref() == Some("Closed")
}

pub fn is_closed_opportunity(row: &OpportunityRow) -> bool {
    row.stage
        .as_deref()
        .is_some_and(|stage| stage.starts_with("Closed"))
}

#[cfg(test)]
mod tests {
    use super::{DashFaker, DemoData, date_string, datetime_string, record_id};
    use std::collections::BTreeSet;

    #[test]
    fn new_deterministic_seed() {
        let mut left = DashFaker::new(42);
        let mut right = DashFaker::new(42);
        assert_eq!(left.partner_name(), right.partner_name());
        assert_eq!(left.person_name(), right.person_name());
    }

    #[test]
    fn zero_seed_is_normalized() {
        assert_eq!(DashFaker::new(0).seed(), 1);
    }

    #[test]
    fn record_ids_have_platform_shape() {
        let id = record_id("001", 7);
        assert_eq!(id, "001000000000007");
        assert_eq!(id.len(), 15);
    }

    #[test]
    fn date_strings_parse_back() {
        let mut faker = DashFaker::new(5);
        let at = faker.date_in_year(2024);
        assert_eq!(at.year(), 2024);
        let date = date_string(at);
        assert_ne!(pmdash_app::display::format_date(Some(&date)), "N/A");
        let datetime = datetime_string(at);
        assert!(pmdash_app::display::parse_timestamp(&datetime).is_some());
    }

    #[test]
    fn generated_data_is_connected() {
        let data = DemoData::generate(7);
        assert_eq!(data.partners.len(), 2);
        assert!(data.contacts.len() >= 6);

        for contact in &data.contacts {
            assert!(data.partner(&contact.partner_id).is_some());
            assert!(data.merchants_of(&contact.row.contact_id).count() >= 3);
        }
        for merchant in &data.merchants {
            assert!(data.contact(&merchant.contact_id).is_some());
            assert_eq!(
                merchant.summary.parent_account_name,
                data.partner(&merchant.partner_id)
                    .and_then(|partner| partner.summary.account_name.clone())
            );
        }
        for partner in &data.partners {
            assert_eq!(data.notes_of(&partner.account_id).count(), 12);
        }
    }

    #[test]
    fn generated_ids_are_unique() {
        let data = DemoData::generate(11);
        let mut ids = BTreeSet::new();
        let accounts = data
            .partners
            .iter()
            .map(|partner| partner.account_id.as_str())
            .chain(data.merchants.iter().map(|merchant| merchant.row.account_id.as_str()));
        for id in accounts {
            assert!(ids.insert(id.to_owned()), "duplicate id {id}");
        }
    }

    #[test]
    fn variety_across_seeds() {
        let names = (1..20)
            .map(|seed| DashFaker::new(seed).partner_name())
            .collect::<BTreeSet<_>>();
        assert!(names.len() > 5);
    }
}
