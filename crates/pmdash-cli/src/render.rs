// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use pmdash_app::display::{self, NOT_AVAILABLE};
use pmdash_app::{
    DashboardSession, DetailPage, ListRecord, MerchantPage, NotesFeed, PagedList, PartnerPage,
    ResellerContactPage, SearchController, SummaryKind, SummaryLoader,
};

/// Plain-text report of what the dashboard currently shows.
pub fn render_session(session: &DashboardSession<'_>) -> String {
    let state = session.state();
    let mut lines = vec![
        state.dashboard_title(),
        format!("mode: {}", state.mode().as_str()),
    ];

    if state.show_search() || !session.search().term().is_empty() {
        lines.push(String::new());
        render_search(&mut lines, session.search());
    }

    if let Some(page) = session.page() {
        lines.push(String::new());
        match page {
            DetailPage::Partner(page) => render_partner(&mut lines, page),
            DetailPage::Merchant(page) => render_merchant(&mut lines, page),
            DetailPage::ResellerContact(page) => render_contact(&mut lines, page),
        }
    }

    if let Some(notes) = session.notes() {
        lines.push(String::new());
        render_notes(&mut lines, notes);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_search(lines: &mut Vec<String>, search: &SearchController) {
    if search.term().is_empty() {
        lines.push("Search for a partner, merchant, or reseller contact".to_owned());
        return;
    }
    lines.push(format!("search: {:?}", search.term()));
    if search.no_results() {
        lines.push("  No results found".to_owned());
        return;
    }
    for hit in search.results() {
        lines.push(format!(
            "  [{}] {} ({})",
            hit.icon.icon_name(),
            hit.result.name,
            hit.result.record_id
        ));
    }
}

fn summary_status<S: SummaryKind>(loader: &SummaryLoader<S>) -> Option<&'static str> {
    if loader.is_loading() {
        Some("  loading...")
    } else if loader.has_error() {
        Some("  summary unavailable")
    } else {
        None
    }
}

fn field(lines: &mut Vec<String>, label: &str, value: String) {
    lines.push(format!("  {label:<22}{value}"));
}

fn render_partner(lines: &mut Vec<String>, page: &PartnerPage) {
    lines.push(format!("Partner: {}", page.display_partner_account_name()));
    if let Some(status) = summary_status(page.summary()) {
        lines.push(status.to_owned());
    }
    if let Some(summary) = page.summary().summary() {
        field(lines, "Owner", display::or_not_available(summary.owner_name.as_deref()));
        field(lines, "Total merchants", display::format_count(summary.total_merchants));
        field(lines, "Active accounts", display::format_count(summary.active_accounts));
        field(lines, "Rapids submitted", display::format_count(summary.rapids_submitted));
        field(lines, "Last rapid", page.formatted_last_rapid_date());
        field(lines, "Premium accounts", page.formatted_premium_percent());
        if page.has_partner_data() {
            field(lines, "Plugin fee", page.formatted_plugin_fee());
        }
    }

    render_list(lines, "Reseller contacts", page.contacts(), |row| {
        format!(
            "{} | {} | {}",
            row.name,
            display::or_not_available(row.title.as_deref()),
            display::or_not_available(row.email.as_deref()),
        )
    });
}

fn render_merchant(lines: &mut Vec<String>, page: &MerchantPage) {
    let summary = page.summary().summary();
    lines.push(format!(
        "Merchant: {}",
        display::or_not_available(summary.and_then(|summary| summary.account_name.as_deref()))
    ));
    if let Some(status) = summary_status(page.summary()) {
        lines.push(status.to_owned());
    }
    if let Some(summary) = summary {
        if page.show_partner_summary() {
            field(
                lines,
                "Partner",
                display::or_not_available(summary.parent_account_name.as_deref()),
            );
        }
        field(lines, "Level", page.formatted_level());
        field(
            lines,
            "Plan",
            display::or_not_available(summary.current_plan_type.as_deref()),
        );
        field(
            lines,
            "Adoption",
            display::or_not_available(summary.adoption_status.as_deref()),
        );
        field(lines, "Last transaction", page.formatted_last_transaction());
        if page.has_partner_data() {
            field(lines, "Plugin fee", page.formatted_plugin_fee());
        }
    }

    render_list(lines, "Cases", page.cases(), |row| {
        format!(
            "{} | {} | {} | {}",
            row.case_number,
            display::or_not_available(row.case_type.as_deref()),
            display::or_not_available(row.status.as_deref()),
            display::or_not_available(row.owner_name.as_deref()),
        )
    });
    render_list(lines, "Opportunities", page.opportunities(), |row| {
        format!(
            "{} | {} | {}",
            row.name,
            display::or_not_available(row.opp_type.as_deref()),
            display::or_not_available(row.stage.as_deref()),
        )
    });
}

fn render_contact(lines: &mut Vec<String>, page: &ResellerContactPage) {
    let summary = page.summary().summary();
    lines.push(format!(
        "Reseller contact: {}",
        display::or_not_available(summary.and_then(|summary| summary.contact_name.as_deref()))
    ));
    if let Some(status) = summary_status(page.summary()) {
        lines.push(status.to_owned());
    }
    if let Some(summary) = summary {
        field(
            lines,
            "Partner",
            display::or_not_available(summary.account_name.as_deref()),
        );
        field(lines, "Title", display::or_not_available(summary.title.as_deref()));
        field(lines, "Email", display::or_not_available(summary.email.as_deref()));
        field(lines, "Phone", display::or_not_available(summary.phone.as_deref()));
        field(lines, "Rapids submitted", display::format_count(summary.rapids_submitted));
        field(lines, "Active accounts", display::format_count(summary.active_accounts));
        field(lines, "Last rapid", page.formatted_last_rapid_date());
        if page.has_partner_data() {
            field(lines, "Plugin fee", page.formatted_plugin_fee());
        }
    }

    lines.push(String::new());
    lines.push("Merchants".to_owned());
    let labels = page.accordion_labels();
    if labels.is_empty() {
        lines.push("  No merchants found".to_owned());
    }
    for label in labels {
        lines.push(format!("  > {label}"));
    }
    push_pagination(lines, page.merchants());
}

fn render_list<T: ListRecord>(
    lines: &mut Vec<String>,
    heading: &str,
    list: &PagedList<T>,
    row: impl Fn(&T) -> String,
) {
    lines.push(String::new());
    lines.push(format!("{heading} ({})", list.total_count()));
    if list.is_empty_state() {
        lines.push("  No records found".to_owned());
    }
    for record in list.records() {
        lines.push(format!("  - {}", row(record)));
    }
    push_pagination(lines, list);
}

fn push_pagination<T: ListRecord>(lines: &mut Vec<String>, list: &PagedList<T>) {
    let pagination = list.pagination();
    if pagination.show_controls() {
        lines.push(format!("  {}", pagination.label()));
    }
}

fn render_notes(lines: &mut Vec<String>, notes: &NotesFeed) {
    lines.push(format!("Notes for {}", notes.parent_id()));
    if notes.no_notes() {
        lines.push("  No notes found".to_owned());
    }
    for note in notes.notes() {
        lines.push(format!(
            "  {} | {} | {}",
            note.formatted_date(),
            display::or_not_available(note.title.as_deref()),
            note.created_by_name.as_deref().unwrap_or(NOT_AVAILABLE),
        ));
        if let Some(related) = note.related_record_name.as_deref() {
            lines.push(format!(
                "    on {} {related}",
                note.related_object_type.as_deref().unwrap_or(NOT_AVAILABLE)
            ));
        }
    }
    if notes.has_more() {
        lines.push("  (more notes available)".to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::render_session;
    use anyhow::Result;
    use pmdash_app::DashboardSession;
    use pmdash_testkit::FakeQueryService;
    use std::time::Instant;

    #[test]
    fn search_mode_prompts_for_a_search() {
        let service = FakeQueryService::demo(7);
        let mut session = DashboardSession::new(&service);
        session.start(None);

        let report = render_session(&session);
        assert!(report.starts_with("Dashboard\nmode: Search\n"));
        assert!(report.contains("Search for a partner"));
    }

    #[test]
    fn search_results_show_icons() -> Result<()> {
        let service = FakeQueryService::demo(7);
        let term = service.data().partners[0]
            .summary
            .account_name
            .clone()
            .unwrap_or_default();
        let mut session = DashboardSession::new(&service);
        session.start(None);
        let now = Instant::now();
        session.input_search(&term, now);
        let deadline = session
            .search()
            .next_deadline()
            .ok_or_else(|| anyhow::anyhow!("search should be pending"))?;
        session.tick(deadline);

        let report = render_session(&session);
        assert!(report.contains("[standard:partner_marketing_budget]"));
        assert!(report.contains(&term));
        Ok(())
    }

    #[test]
    fn search_results_render_alongside_an_open_record() -> Result<()> {
        let service = FakeQueryService::demo(7);
        let partner = &service.data().partners[0];
        let merchant_name = service.data().merchants[0].row.account_name.clone();
        let mut session = DashboardSession::new(&service);
        session.start(Some(partner.account_id.as_str()));
        let now = Instant::now();
        session.input_search(&merchant_name, now);
        let deadline = session
            .search()
            .next_deadline()
            .ok_or_else(|| anyhow::anyhow!("search should be pending"))?;
        session.tick(deadline);

        let report = render_session(&session);
        assert!(report.contains("mode: Partner"));
        assert!(report.contains(&format!("search: {merchant_name:?}")));
        assert!(report.contains("[standard:account]"));
        assert!(report.contains("Reseller contacts ("));
        Ok(())
    }

    #[test]
    fn partner_page_lists_contacts_and_title() {
        let service = FakeQueryService::demo(7);
        let partner = &service.data().partners[0];
        let name = partner.summary.account_name.clone().unwrap_or_default();
        let mut session = DashboardSession::new(&service);
        session.start(Some(partner.account_id.as_str()));

        let report = render_session(&session);
        assert!(report.starts_with(&format!("Partner Overview Dashboard - {name}\n")));
        assert!(report.contains("Reseller contacts ("));
        assert!(report.contains("Rapids submitted"));
    }

    #[test]
    fn merchant_page_shows_cases_and_opportunities() {
        let service = FakeQueryService::demo(7);
        let merchant_id = service.data().merchants[0].row.account_id.clone();
        let mut session = DashboardSession::new(&service);
        session.start(Some(merchant_id.as_str()));

        let report = render_session(&session);
        assert!(report.starts_with("Merchant Overview Dashboard\nmode: Merchant\n"));
        assert!(report.contains("Cases ("));
        assert!(report.contains("Opportunities ("));
        assert!(report.contains("Last transaction"));
    }

    #[test]
    fn open_notes_are_listed_with_more_marker() {
        let service = FakeQueryService::demo(7);
        let partner_id = service.data().partners[0].account_id.clone();
        let mut session = DashboardSession::new(&service);
        session.start(Some(partner_id.as_str()));
        session.open_notes();

        let report = render_session(&session);
        assert!(report.contains(&format!("Notes for {partner_id}")));
        assert!(report.contains("(more notes available)"));
    }
}
