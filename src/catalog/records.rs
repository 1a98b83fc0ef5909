/// Mock payloads for the simulated tools
///
/// One concrete record type per tool. The built-in data is what every query
/// reads unless a data file overrides it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Schedule state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "Behind Schedule")]
    BehindSchedule,
    #[serde(rename = "Ahead of Schedule")]
    AheadOfSchedule,
}

impl ProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::OnTrack => "On Track",
            ProjectStatus::BehindSchedule => "Behind Schedule",
            ProjectStatus::AheadOfSchedule => "Ahead of Schedule",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Workload classification of a team member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Overloaded,
    Busy,
    Available,
}

impl Availability {
    pub fn label(self) -> &'static str {
        match self {
            Availability::Overloaded => "Overloaded",
            Availability::Busy => "Busy",
            Availability::Available => "Available",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Support ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub status: ProjectStatus,
    pub progress: u32,
    pub due_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub utilization: u32,
    pub availability: Availability,
}

/// Project management payload (asana)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub projects: Vec<Project>,
    #[serde(default)]
    pub team_workload: Vec<TeamMember>,
}

impl ProjectRecord {
    /// Arithmetic mean of project progress, `None` without projects
    pub fn average_progress(&self) -> Option<f64> {
        if self.projects.is_empty() {
            return None;
        }
        let total: u32 = self.projects.iter().map(|p| p.progress).sum();
        Some(f64::from(total) / self.projects.len() as f64)
    }

    pub fn count_with_status(&self, status: ProjectStatus) -> usize {
        self.projects.iter().filter(|p| p.status == status).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageViews {
    pub page: String,
    pub views: u64,
}

/// Web analytics payload (google_analytics)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub page_views: u64,
    pub conversion_rate: f64,
    pub bounce_rate: f64,
    #[serde(default)]
    pub top_pages: Vec<PageViews>,
}

/// Accounting payload (quickbooks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingRecord {
    pub monthly_revenue: u64,
    pub outstanding_invoices: u64,
    pub profit_margin: f64,
    pub expenses: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub client: String,
    pub subject: String,
    pub priority: Priority,
    pub status: String,
}

/// Customer support payload (zendesk)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportRecord {
    pub tickets: Vec<Ticket>,
    pub avg_response_time: String,
    pub customer_satisfaction: f64,
}

impl SupportRecord {
    pub fn count_with_priority(&self, priority: Priority) -> usize {
        self.tickets.iter().filter(|t| t.priority == priority).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSchedule {
    pub name: String,
    pub status: String,
}

/// Team scheduling payload (google_calendar)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub meetings_today: u32,
    #[serde(default)]
    pub availability: Vec<MemberSchedule>,
}

/// Social media payload (hootsuite)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialRecord {
    pub total_followers: u64,
    pub engagement_rate: f64,
    pub posts_this_week: u32,
    pub reach: u64,
}

/// CRM payload (hubspot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmRecord {
    pub pipeline_value: u64,
    pub deals_won: u32,
    pub conversion_rate: f64,
    pub new_leads: u32,
}

/// Team chat payload (slack)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub messages_today: u32,
    pub active_users: u32,
    pub urgent_mentions: u32,
}

/// Mock payload for one tool identifier.
///
/// `Empty` is a valid state: a tool may be known to the catalog without
/// carrying any data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolRecord {
    ProjectManagement(ProjectRecord),
    Analytics(AnalyticsRecord),
    Accounting(AccountingRecord),
    Support(SupportRecord),
    Calendar(CalendarRecord),
    Social(SocialRecord),
    Crm(CrmRecord),
    Chat(ChatRecord),
    Empty,
}

impl ToolRecord {
    pub fn is_empty(&self) -> bool {
        matches!(self, ToolRecord::Empty)
    }

    pub fn project_management(&self) -> Option<&ProjectRecord> {
        match self {
            ToolRecord::ProjectManagement(r) => Some(r),
            _ => None,
        }
    }

    pub fn analytics(&self) -> Option<&AnalyticsRecord> {
        match self {
            ToolRecord::Analytics(r) => Some(r),
            _ => None,
        }
    }

    pub fn accounting(&self) -> Option<&AccountingRecord> {
        match self {
            ToolRecord::Accounting(r) => Some(r),
            _ => None,
        }
    }

    pub fn support(&self) -> Option<&SupportRecord> {
        match self {
            ToolRecord::Support(r) => Some(r),
            _ => None,
        }
    }

    pub fn calendar(&self) -> Option<&CalendarRecord> {
        match self {
            ToolRecord::Calendar(r) => Some(r),
            _ => None,
        }
    }

    pub fn social(&self) -> Option<&SocialRecord> {
        match self {
            ToolRecord::Social(r) => Some(r),
            _ => None,
        }
    }
}

fn project(name: &str, status: ProjectStatus, progress: u32, due_date: &str) -> Project {
    Project {
        name: name.to_string(),
        status,
        progress,
        due_date: due_date.to_string(),
    }
}

fn member(name: &str, utilization: u32, availability: Availability) -> TeamMember {
    TeamMember {
        name: name.to_string(),
        utilization,
        availability,
    }
}

fn ticket(client: &str, subject: &str, priority: Priority, status: &str) -> Ticket {
    Ticket {
        client: client.to_string(),
        subject: subject.to_string(),
        priority,
        status: status.to_string(),
    }
}

fn schedule(name: &str, status: &str) -> MemberSchedule {
    MemberSchedule {
        name: name.to_string(),
        status: status.to_string(),
    }
}

pub(crate) fn builtin_project_record() -> ProjectRecord {
    ProjectRecord {
        projects: vec![
            project("Johnson Marketing Campaign", ProjectStatus::OnTrack, 75, "2025-06-15"),
            project("Tech Startup Rebrand", ProjectStatus::BehindSchedule, 45, "2025-06-10"),
            project("E-commerce Platform Launch", ProjectStatus::AheadOfSchedule, 92, "2025-06-20"),
        ],
        team_workload: vec![
            member("Alex", 85, Availability::Busy),
            member("Sarah", 92, Availability::Overloaded),
            member("Mike", 78, Availability::Available),
            member("Lisa", 88, Availability::Busy),
        ],
    }
}

pub(crate) fn builtin_analytics_record() -> AnalyticsRecord {
    AnalyticsRecord {
        page_views: 45_600,
        conversion_rate: 3.2,
        bounce_rate: 32.5,
        top_pages: vec![
            PageViews { page: "/landing-page".to_string(), views: 8_900 },
            PageViews { page: "/services".to_string(), views: 6_700 },
            PageViews { page: "/about".to_string(), views: 4_200 },
        ],
    }
}

pub(crate) fn builtin_accounting_record() -> AccountingRecord {
    AccountingRecord {
        monthly_revenue: 78_450,
        outstanding_invoices: 23_400,
        profit_margin: 42.4,
        expenses: 45_200,
    }
}

pub(crate) fn builtin_support_record() -> SupportRecord {
    SupportRecord {
        tickets: vec![
            ticket("TechCorp", "Login Issues", Priority::High, "Open"),
            ticket("RetailPlus", "Analytics Question", Priority::Medium, "In Progress"),
            ticket("StartupHub", "Feature Request", Priority::Low, "Pending"),
        ],
        avg_response_time: "2.5 hours".to_string(),
        customer_satisfaction: 4.6,
    }
}

pub(crate) fn builtin_calendar_record() -> CalendarRecord {
    CalendarRecord {
        meetings_today: 5,
        availability: vec![
            schedule("Alex", "Busy until 3 PM"),
            schedule("Sarah", "Available after 11 AM"),
            schedule("Mike", "Free all day"),
            schedule("Lisa", "Busy 2-4 PM"),
        ],
    }
}

pub(crate) fn builtin_social_record() -> SocialRecord {
    SocialRecord {
        total_followers: 28_600,
        engagement_rate: 4.8,
        posts_this_week: 12,
        reach: 45_600,
    }
}

pub(crate) fn builtin_crm_record() -> CrmRecord {
    CrmRecord {
        pipeline_value: 567_800,
        deals_won: 12,
        conversion_rate: 26.7,
        new_leads: 23,
    }
}

pub(crate) fn builtin_chat_record() -> ChatRecord {
    ChatRecord {
        messages_today: 156,
        active_users: 8,
        urgent_mentions: 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_progress_of_builtin_projects() {
        let record = builtin_project_record();
        let avg = record.average_progress().unwrap();
        assert_eq!(format!("{:.1}", avg), "70.7");
    }

    #[test]
    fn test_average_progress_without_projects() {
        let record = ProjectRecord {
            projects: vec![],
            team_workload: vec![],
        };
        assert!(record.average_progress().is_none());
    }

    #[test]
    fn test_status_counts() {
        let record = builtin_project_record();
        assert_eq!(record.count_with_status(ProjectStatus::OnTrack), 1);
        assert_eq!(record.count_with_status(ProjectStatus::BehindSchedule), 1);
        assert_eq!(record.count_with_status(ProjectStatus::AheadOfSchedule), 1);
    }

    #[test]
    fn test_status_deserializes_from_label() {
        let status: ProjectStatus = serde_yaml::from_str("Behind Schedule").unwrap();
        assert_eq!(status, ProjectStatus::BehindSchedule);
    }

    #[test]
    fn test_high_priority_count() {
        let record = builtin_support_record();
        assert_eq!(record.count_with_priority(Priority::High), 1);
    }

    #[test]
    fn test_accessor_mismatch_is_none() {
        let record = ToolRecord::Accounting(builtin_accounting_record());
        assert!(record.accounting().is_some());
        assert!(record.project_management().is_none());
        assert!(!record.is_empty());
        assert!(ToolRecord::Empty.is_empty());
    }
}
