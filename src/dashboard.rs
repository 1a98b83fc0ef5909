/// Live dashboard snapshot of connected tools

use serde::Serialize;

use crate::catalog::{ConnectionSet, ToolCatalog, ToolDescriptor, ToolId, ToolRecord};
use crate::report::{currency, percent, rating, thousands};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Metrics shown for one connected tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolPanel {
    pub tool: &'static ToolDescriptor,
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub connected: usize,
    pub available: usize,
    pub panels: Vec<ToolPanel>,
}

/// Snapshot of every connected tool in catalog order.
///
/// Tools without dashboard metrics, or without a record, get an empty panel.
pub fn snapshot(catalog: &ToolCatalog, connected: &ConnectionSet) -> Dashboard {
    let panels = connected
        .iter()
        .map(|id| ToolPanel {
            tool: catalog.descriptor_of(id),
            metrics: metrics_for(id, catalog.record(id)),
        })
        .collect();

    Dashboard {
        connected: connected.len(),
        available: catalog.tool_count() - connected.len(),
        panels,
    }
}

fn metrics_for(id: ToolId, record: &ToolRecord) -> Vec<Metric> {
    let metrics = match id {
        ToolId::Asana => record.project_management().map(|data| {
            let mut metrics = vec![Metric::new("Active Projects", data.projects.len().to_string())];
            metrics.extend(
                data.projects
                    .iter()
                    .map(|p| Metric::new(p.name.clone(), format!("{}%", p.progress))),
            );
            metrics
        }),
        ToolId::Quickbooks => record.accounting().map(|data| {
            vec![
                Metric::new("Monthly Revenue", currency(data.monthly_revenue)),
                Metric::new("Outstanding", currency(data.outstanding_invoices)),
                Metric::new("Profit Margin", percent(data.profit_margin)),
            ]
        }),
        ToolId::GoogleAnalytics => record.analytics().map(|data| {
            vec![
                Metric::new("Page Views", thousands(data.page_views)),
                Metric::new("Conversion Rate", percent(data.conversion_rate)),
                Metric::new("Bounce Rate", percent(data.bounce_rate)),
            ]
        }),
        ToolId::Zendesk => record.support().map(|data| {
            vec![
                Metric::new("Active Tickets", data.tickets.len().to_string()),
                Metric::new("Customer Satisfaction", rating(data.customer_satisfaction)),
            ]
        }),
        ToolId::Hootsuite => record.social().map(|data| {
            vec![
                Metric::new("Total Followers", thousands(data.total_followers)),
                Metric::new("Engagement Rate", percent(data.engagement_rate)),
            ]
        }),
        ToolId::GoogleCalendar | ToolId::Hubspot | ToolId::Slack => None,
    };
    metrics.unwrap_or_default()
}
