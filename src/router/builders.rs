/// Report builders, one per intent.
///
/// Each builder reads only the records it needs. A required tool that is not
/// connected yields a one-line report, never an error.

use crate::catalog::records::{Availability, Priority, ProjectStatus};
use crate::catalog::{ConnectionSet, ToolCatalog, ToolId};
use crate::report::{Report, currency, percent, rating, thousands};

use super::Intent;

/// Outstanding invoice total above which the summary suggests a follow-up
pub const INVOICE_FOLLOWUP_THRESHOLD: u64 = 20_000;

fn not_connected(label: &str, tool: &str) -> Report {
    Report::new(format!("❌ {} tool ({}) not connected.", label, tool))
}

fn no_data(tool: &str) -> Report {
    Report::new(format!("⚠️ {} is connected but has no data.", tool))
}

fn status_marker(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::OnTrack => "🟢",
        ProjectStatus::BehindSchedule => "🟡",
        ProjectStatus::AheadOfSchedule => "🔵",
    }
}

fn availability_marker(availability: Availability) -> &'static str {
    match availability {
        Availability::Overloaded => "🔴",
        Availability::Busy => "🟡",
        Availability::Available => "🟢",
    }
}

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

pub(super) fn executive_summary(catalog: &ToolCatalog, connected: &ConnectionSet) -> Report {
    let mut report = Report::new("📊 EXECUTIVE SUMMARY");
    report
        .line(format!("Generated from {} connected tools", connected.len()))
        .blank();

    let projects = connected
        .contains(ToolId::Asana)
        .then(|| catalog.record(ToolId::Asana).project_management())
        .flatten();
    let books = connected
        .contains(ToolId::Quickbooks)
        .then(|| catalog.record(ToolId::Quickbooks).accounting())
        .flatten();

    if let Some(data) = projects {
        report.heading("📋 PROJECTS");
        match data.average_progress() {
            Some(avg) => report.bullet(format!("Average progress: {:.1}%", avg)),
            None => report.bullet("No active projects"),
        };
        report
            .bullet(format!(
                "{} on track, {} behind",
                data.count_with_status(ProjectStatus::OnTrack),
                data.count_with_status(ProjectStatus::BehindSchedule)
            ))
            .blank();
    }

    if let Some(data) = books {
        report
            .heading("💰 FINANCIAL")
            .bullet(format!("Monthly revenue: {}", currency(data.monthly_revenue)))
            .bullet(format!("Outstanding invoices: {}", currency(data.outstanding_invoices)))
            .bullet(format!("Profit margin: {}", percent(data.profit_margin)))
            .blank();
    }

    if connected.contains(ToolId::Zendesk) {
        if let Some(data) = catalog.record(ToolId::Zendesk).support() {
            report
                .heading("🎫 SUPPORT")
                .bullet(format!("{} active tickets", data.tickets.len()))
                .bullet(format!("{} high priority issues", data.count_with_priority(Priority::High)))
                .bullet(format!("Customer satisfaction: {}", rating(data.customer_satisfaction)))
                .blank();
        }
    }

    if connected.contains(ToolId::GoogleAnalytics) {
        if let Some(data) = catalog.record(ToolId::GoogleAnalytics).analytics() {
            report
                .heading("📈 WEBSITE")
                .bullet(format!("Page views: {}", thousands(data.page_views)))
                .bullet(format!("Conversion rate: {}", percent(data.conversion_rate)))
                .bullet(format!("Bounce rate: {}", percent(data.bounce_rate)))
                .blank();
        }
    }

    report.heading("🎯 KEY ACTIONS");
    if let Some(data) = projects {
        let behind = data.count_with_status(ProjectStatus::BehindSchedule);
        if behind > 0 {
            report.bullet(format!("Focus on {} behind-schedule projects", behind));
        }
    }
    if let Some(data) = books {
        if data.outstanding_invoices > INVOICE_FOLLOWUP_THRESHOLD {
            report.bullet("Follow up on outstanding invoices");
        }
    }

    report
}

pub(super) fn project_status(catalog: &ToolCatalog, connected: &ConnectionSet) -> Report {
    if !connected.contains(ToolId::Asana) {
        return not_connected("Project management", "Asana");
    }
    let Some(data) = catalog.record(ToolId::Asana).project_management() else {
        return no_data("Asana");
    };

    let mut report = Report::new("📋 PROJECT STATUS REPORT");
    report.blank();
    for project in &data.projects {
        report
            .item(
                status_marker(project.status),
                project.name.clone(),
                vec![
                    format!("Progress: {}%", project.progress),
                    format!("Status: {}", project.status),
                    format!("Due: {}", project.due_date),
                ],
            )
            .blank();
    }
    report
}

pub(super) fn financial(catalog: &ToolCatalog, connected: &ConnectionSet) -> Report {
    if !connected.contains(ToolId::Quickbooks) {
        return not_connected("Accounting", "QuickBooks");
    }
    let Some(data) = catalog.record(ToolId::Quickbooks).accounting() else {
        return no_data("QuickBooks");
    };

    let mut report = Report::new("💰 FINANCIAL REPORT");
    report
        .blank()
        .line(format!("📈 Revenue: {}", currency(data.monthly_revenue)))
        .line(format!("📋 Outstanding: {}", currency(data.outstanding_invoices)))
        .line(format!("💸 Expenses: {}", currency(data.expenses)))
        .line(format!("📊 Profit Margin: {}", percent(data.profit_margin)));
    report
}

pub(super) fn team(catalog: &ToolCatalog, connected: &ConnectionSet) -> Report {
    let mut report = Report::new("👥 TEAM REPORT");
    report.blank();

    if connected.contains(ToolId::Asana) {
        if let Some(data) = catalog.record(ToolId::Asana).project_management() {
            report.heading("💼 WORKLOAD");
            for member in &data.team_workload {
                report.item(
                    availability_marker(member.availability),
                    format!("{}: {}% - {}", member.name, member.utilization, member.availability),
                    Vec::new(),
                );
            }
            report.blank();
        }
    }

    if connected.contains(ToolId::GoogleCalendar) {
        if let Some(data) = catalog.record(ToolId::GoogleCalendar).calendar() {
            report
                .line(format!("📅 MEETINGS TODAY: {}", data.meetings_today))
                .blank()
                .heading("🕐 AVAILABILITY");
            for schedule in &data.availability {
                report.bullet(format!("{}: {}", schedule.name, schedule.status));
            }
        }
    }

    report
}

pub(super) fn support(catalog: &ToolCatalog, connected: &ConnectionSet) -> Report {
    if !connected.contains(ToolId::Zendesk) {
        return not_connected("Support", "Zendesk");
    }
    let Some(data) = catalog.record(ToolId::Zendesk).support() else {
        return no_data("Zendesk");
    };

    let mut report = Report::new("🎫 SUPPORT REPORT");
    report.blank().heading("📋 ACTIVE TICKETS");
    for ticket in &data.tickets {
        report.item(
            priority_marker(ticket.priority),
            format!("{}: {} ({})", ticket.client, ticket.subject, ticket.status),
            Vec::new(),
        );
    }
    report
        .blank()
        .heading("📊 METRICS")
        .bullet(format!("Response time: {}", data.avg_response_time))
        .bullet(format!("Satisfaction: {}", rating(data.customer_satisfaction)));
    report
}

pub(super) fn general_insights(query: &str, connected: &ConnectionSet) -> Report {
    let mut report = Report::new("🤖 AI ANALYSIS");
    report
        .blank()
        .line(format!("Query: {}", query))
        .line(format!("Connected tools: {}", connected.len()))
        .blank()
        .line("Available commands:");
    for (phrase, blurb) in Intent::RECOGNIZED.iter().filter_map(|i| i.help()) {
        report.bullet(format!("'{}' - {}", phrase, blurb));
    }
    report
}
