/// Query Router
///
/// Maps a free-text query to one of six report builders by keyword matching
/// and renders the report against the caller's connected tools. Routing is
/// stateless: the same query, connection set and catalog always produce the
/// same text.

mod builders;

use std::fmt;
use std::sync::Arc;

use crate::catalog::{ConnectionSet, ToolCatalog};
use crate::report::Report;

pub use builders::INVOICE_FOLLOWUP_THRESHOLD;

/// Text returned for any query while nothing is connected
pub const NO_TOOLS_MESSAGE: &str =
    "❌ No tools connected. Please connect your business tools to get AI-powered insights.";

/// Query category resolved from keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    ExecutiveSummary,
    ProjectStatus,
    Financial,
    Team,
    Support,
    General,
}

/// Keyword rules, checked in order; the first rule with any matching
/// keyword wins regardless of where the keyword appears in the query.
const RULES: [(Intent, &[&str]); 5] = [
    (Intent::ExecutiveSummary, &["summary", "overview", "executive"]),
    (Intent::ProjectStatus, &["project", "task"]),
    (Intent::Financial, &["revenue", "financial", "money"]),
    (Intent::Team, &["team", "availability"]),
    (Intent::Support, &["support", "ticket"]),
];

impl Intent {
    /// Intents that can be requested by keyword, in rule order
    pub const RECOGNIZED: [Intent; 5] = [
        Intent::ExecutiveSummary,
        Intent::ProjectStatus,
        Intent::Financial,
        Intent::Team,
        Intent::Support,
    ];

    /// Classify a query; case-insensitive substring match
    pub fn classify(query: &str) -> Intent {
        let query = query.to_lowercase();
        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| query.contains(k)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::General)
    }

    /// Example phrase and blurb advertised in the help listing
    pub fn help(self) -> Option<(&'static str, &'static str)> {
        match self {
            Intent::ExecutiveSummary => Some(("executive summary", "comprehensive overview")),
            Intent::ProjectStatus => Some(("project status", "project details")),
            Intent::Financial => Some(("financial report", "revenue and expenses")),
            Intent::Team => Some(("team availability", "workload and schedule")),
            Intent::Support => Some(("support tickets", "customer issues")),
            Intent::General => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::ExecutiveSummary => "executive_summary",
            Intent::ProjectStatus => "project_status",
            Intent::Financial => "financial",
            Intent::Team => "team",
            Intent::Support => "support",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canned queries offered as one-click actions
pub const QUICK_ACTIONS: [&str; 5] = [
    "Generate executive summary",
    "Show project status",
    "Financial report",
    "Team availability",
    "Support tickets overview",
];

/// Routes queries to report builders over a shared catalog
#[derive(Debug, Clone)]
pub struct QueryRouter {
    catalog: Arc<ToolCatalog>,
}

impl QueryRouter {
    pub fn new(catalog: Arc<ToolCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Build the structured report for a query
    pub fn build(&self, query: &str, connected: &ConnectionSet) -> Report {
        if connected.is_empty() {
            return Report::new(NO_TOOLS_MESSAGE);
        }

        let catalog = self.catalog.as_ref();
        match Intent::classify(query) {
            Intent::ExecutiveSummary => builders::executive_summary(catalog, connected),
            Intent::ProjectStatus => builders::project_status(catalog, connected),
            Intent::Financial => builders::financial(catalog, connected),
            Intent::Team => builders::team(catalog, connected),
            Intent::Support => builders::support(catalog, connected),
            Intent::General => builders::general_insights(query, connected),
        }
    }

    /// Route a query and render the report text.
    ///
    /// # Arguments
    /// * `query` - Free text; matched case-insensitively against the intent keywords
    /// * `connected` - The caller's connection set
    ///
    /// # Returns
    /// The rendered report. With nothing connected this is always the
    /// "no tools connected" prompt, whatever the query.
    pub fn route(&self, query: &str, connected: &ConnectionSet) -> String {
        self.build(query, connected).render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToolId;

    fn router() -> QueryRouter {
        QueryRouter::new(Arc::new(ToolCatalog::new()))
    }

    fn connected(ids: &[ToolId]) -> ConnectionSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_classify_each_rule() {
        assert_eq!(Intent::classify("Generate executive summary"), Intent::ExecutiveSummary);
        assert_eq!(Intent::classify("give me an OVERVIEW"), Intent::ExecutiveSummary);
        assert_eq!(Intent::classify("Show project status"), Intent::ProjectStatus);
        assert_eq!(Intent::classify("open tasks"), Intent::ProjectStatus);
        assert_eq!(Intent::classify("How much money did we make"), Intent::Financial);
        assert_eq!(Intent::classify("Revenue?"), Intent::Financial);
        assert_eq!(Intent::classify("Team availability"), Intent::Team);
        assert_eq!(Intent::classify("Support tickets overview"), Intent::ExecutiveSummary);
        assert_eq!(Intent::classify("open tickets"), Intent::Support);
        assert_eq!(Intent::classify("xyzzy nonsense"), Intent::General);
    }

    #[test]
    fn test_rule_order_beats_keyword_position() {
        assert_eq!(Intent::classify("executive project summary"), Intent::ExecutiveSummary);
        assert_eq!(Intent::classify("ticket about a project"), Intent::ProjectStatus);
    }

    #[test]
    fn test_no_tools_short_circuits() {
        let router = router();
        let empty = ConnectionSet::new();
        for query in ["executive summary", "project status", "xyzzy", ""] {
            assert_eq!(router.route(query, &empty).trim_end(), NO_TOOLS_MESSAGE);
        }
    }

    #[test]
    fn test_route_is_idempotent() {
        let router = router();
        let set = connected(&ToolId::ALL);
        for query in QUICK_ACTIONS {
            assert_eq!(router.route(query, &set), router.route(query, &set));
        }
    }

    #[test]
    fn test_executive_summary_projects() {
        let report = router().route("executive summary", &connected(&[ToolId::Asana]));
        assert!(report.contains("Generated from 1 connected tools"));
        assert!(report.contains("Average progress: 70.7%"));
        assert!(report.contains("1 on track, 1 behind"));
        assert!(report.contains("Focus on 1 behind-schedule projects"));
        assert!(!report.contains("FINANCIAL"));
    }

    #[test]
    fn test_financial_report_figures() {
        let set = connected(&[ToolId::Quickbooks]);
        let report = router().route("financial report", &set);
        assert!(report.contains("78,450"));
        assert!(report.contains("23,400"));
        assert!(report.contains("45,200"));
        assert!(report.contains("42.4%"));

        let summary = router().route("executive summary", &set);
        assert!(summary.contains("Follow up on outstanding invoices"));
        assert!(!summary.contains("behind-schedule"));
    }

    #[test]
    fn test_project_status_not_connected() {
        let report = router().route("project status", &connected(&[ToolId::Slack]));
        assert!(report.contains("Project management tool (Asana) not connected."));
    }

    #[test]
    fn test_general_insights_fallback() {
        let report = router().route("xyzzy nonsense", &connected(&[ToolId::Quickbooks]));
        assert!(report.contains("Query: xyzzy nonsense"));
        assert!(report.contains("Connected tools: 1"));
        let listed: Vec<&str> = report.lines().filter(|l| l.starts_with("• '")).collect();
        assert_eq!(listed.len(), 5);
        for intent in Intent::RECOGNIZED {
            let (phrase, _) = intent.help().unwrap();
            assert!(report.contains(&format!("'{}'", phrase)));
        }
    }

    #[test]
    fn test_quick_actions_reach_every_builder_but_general() {
        let intents: Vec<Intent> = QUICK_ACTIONS.iter().map(|q| Intent::classify(q)).collect();
        assert!(!intents.contains(&Intent::General));
    }
}
