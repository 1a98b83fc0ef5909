/// Tool Catalog
///
/// Static registry of the eight simulated business tools: identifiers,
/// display metadata and the mock record each tool serves. The catalog never
/// changes after construction; which tools are connected is tracked by a
/// caller-owned `ConnectionSet`.

pub mod records;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{AssistantError, Result};

pub use records::ToolRecord;

/// Identifier of a simulated tool.
///
/// The enumeration is closed: anything that parses into a `ToolId` is a
/// catalog key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolId {
    Asana,
    GoogleAnalytics,
    Quickbooks,
    Zendesk,
    GoogleCalendar,
    Hootsuite,
    Hubspot,
    Slack,
}

impl ToolId {
    /// All identifiers in catalog order
    pub const ALL: [ToolId; 8] = [
        ToolId::Asana,
        ToolId::GoogleAnalytics,
        ToolId::Quickbooks,
        ToolId::Zendesk,
        ToolId::GoogleCalendar,
        ToolId::Hootsuite,
        ToolId::Hubspot,
        ToolId::Slack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolId::Asana => "asana",
            ToolId::GoogleAnalytics => "google_analytics",
            ToolId::Quickbooks => "quickbooks",
            ToolId::Zendesk => "zendesk",
            ToolId::GoogleCalendar => "google_calendar",
            ToolId::Hootsuite => "hootsuite",
            ToolId::Hubspot => "hubspot",
            ToolId::Slack => "slack",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        ToolId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| AssistantError::UnknownTool(s.to_string()))
    }
}

/// Category tag shown next to a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Productivity,
    Analytics,
    Finance,
    Support,
    Marketing,
    Sales,
    Communication,
}

/// Display metadata for one tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub id: ToolId,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub icon: &'static str,
}

static DESCRIPTORS: [ToolDescriptor; 8] = [
    ToolDescriptor {
        id: ToolId::Asana,
        name: "Asana",
        description: "Project Management",
        category: Category::Productivity,
        icon: "📋",
    },
    ToolDescriptor {
        id: ToolId::GoogleAnalytics,
        name: "Google Analytics",
        description: "Web Analytics",
        category: Category::Analytics,
        icon: "📈",
    },
    ToolDescriptor {
        id: ToolId::Quickbooks,
        name: "QuickBooks",
        description: "Accounting & Finance",
        category: Category::Finance,
        icon: "💰",
    },
    ToolDescriptor {
        id: ToolId::Zendesk,
        name: "Zendesk",
        description: "Customer Support",
        category: Category::Support,
        icon: "🎫",
    },
    ToolDescriptor {
        id: ToolId::GoogleCalendar,
        name: "Google Calendar",
        description: "Team Scheduling",
        category: Category::Productivity,
        icon: "📅",
    },
    ToolDescriptor {
        id: ToolId::Hootsuite,
        name: "Hootsuite",
        description: "Social Media Management",
        category: Category::Marketing,
        icon: "📱",
    },
    ToolDescriptor {
        id: ToolId::Hubspot,
        name: "HubSpot CRM",
        description: "Customer Relationship Management",
        category: Category::Sales,
        icon: "🏢",
    },
    ToolDescriptor {
        id: ToolId::Slack,
        name: "Slack",
        description: "Team Communication",
        category: Category::Communication,
        icon: "💬",
    },
];

static EMPTY_RECORD: ToolRecord = ToolRecord::Empty;

/// Set of connected tool identifiers, owned by a session.
///
/// Iteration follows catalog order so reports and listings are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionSet {
    ids: BTreeSet<ToolId>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the tool was already connected
    pub fn connect(&mut self, id: ToolId) -> bool {
        self.ids.insert(id)
    }

    /// Returns false if the tool was not connected
    pub fn disconnect(&mut self, id: ToolId) -> bool {
        self.ids.remove(&id)
    }

    /// Flip the connection state, returning the new state
    pub fn toggle(&mut self, id: ToolId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: ToolId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ToolId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<ToolId> for ConnectionSet {
    fn from_iter<I: IntoIterator<Item = ToolId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Read-only catalog of tool descriptors and their mock records
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    records: HashMap<ToolId, ToolRecord>,
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolCatalog {
    /// Catalog populated with the built-in mock data
    pub fn new() -> Self {
        let mut map = HashMap::with_capacity(ToolId::ALL.len());
        map.insert(
            ToolId::Asana,
            ToolRecord::ProjectManagement(records::builtin_project_record()),
        );
        map.insert(
            ToolId::GoogleAnalytics,
            ToolRecord::Analytics(records::builtin_analytics_record()),
        );
        map.insert(
            ToolId::Quickbooks,
            ToolRecord::Accounting(records::builtin_accounting_record()),
        );
        map.insert(
            ToolId::Zendesk,
            ToolRecord::Support(records::builtin_support_record()),
        );
        map.insert(
            ToolId::GoogleCalendar,
            ToolRecord::Calendar(records::builtin_calendar_record()),
        );
        map.insert(
            ToolId::Hootsuite,
            ToolRecord::Social(records::builtin_social_record()),
        );
        map.insert(ToolId::Hubspot, ToolRecord::Crm(records::builtin_crm_record()));
        map.insert(ToolId::Slack, ToolRecord::Chat(records::builtin_chat_record()));
        Self { records: map }
    }

    /// Catalog with mock records replaced from a YAML document.
    ///
    /// The document maps tool identifiers to records. Tools absent from the
    /// document keep their built-in record; a tool mapped to `null` has no
    /// record at all.
    ///
    /// # Arguments
    /// * `yaml` - Mapping from tool identifier to record (or `null`)
    ///
    /// # Returns
    /// `UnknownTool` for a key outside the enumeration, `Yaml` for a
    /// malformed document or a record that does not match its tool's shape
    ///
    /// ```yaml
    /// quickbooks:
    ///   monthly_revenue: 1000
    ///   outstanding_invoices: 0
    ///   profit_margin: 10.0
    ///   expenses: 900
    /// slack: null
    /// ```
    pub fn with_overrides(yaml: &str) -> Result<Self> {
        let overrides: HashMap<String, Option<serde_yaml::Value>> = serde_yaml::from_str(yaml)?;
        let mut catalog = Self::new();
        for (key, value) in overrides {
            let id: ToolId = key.parse()?;
            let record = match value {
                Some(value) => parse_record(id, value)?,
                None => ToolRecord::Empty,
            };
            tracing::debug!(tool = %id, empty = record.is_empty(), "Overriding mock record");
            catalog.records.insert(id, record);
        }
        Ok(catalog)
    }

    /// Load mock record overrides from a YAML data file
    pub fn from_data_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::with_overrides(&content)
    }

    /// Look up a descriptor by its string identifier
    pub fn descriptor(&self, id: &str) -> Result<&'static ToolDescriptor> {
        let id: ToolId = id.parse()?;
        Ok(self.descriptor_of(id))
    }

    pub fn descriptor_of(&self, id: ToolId) -> &'static ToolDescriptor {
        // DESCRIPTORS is laid out in ToolId::ALL order
        &DESCRIPTORS[id as usize]
    }

    /// All descriptors in catalog order
    pub fn descriptors(&self) -> impl Iterator<Item = &'static ToolDescriptor> {
        DESCRIPTORS.iter()
    }

    /// Mock record for a tool; `ToolRecord::Empty` when it has none
    pub fn record(&self, id: ToolId) -> &ToolRecord {
        self.records.get(&id).unwrap_or(&EMPTY_RECORD)
    }

    pub fn is_connected(&self, id: ToolId, connections: &ConnectionSet) -> bool {
        connections.contains(id)
    }

    /// Number of tools the catalog knows, connected or not
    pub fn tool_count(&self) -> usize {
        DESCRIPTORS.len()
    }
}

fn parse_record(id: ToolId, value: serde_yaml::Value) -> Result<ToolRecord> {
    let record = match id {
        ToolId::Asana => ToolRecord::ProjectManagement(serde_yaml::from_value(value)?),
        ToolId::GoogleAnalytics => ToolRecord::Analytics(serde_yaml::from_value(value)?),
        ToolId::Quickbooks => ToolRecord::Accounting(serde_yaml::from_value(value)?),
        ToolId::Zendesk => ToolRecord::Support(serde_yaml::from_value(value)?),
        ToolId::GoogleCalendar => ToolRecord::Calendar(serde_yaml::from_value(value)?),
        ToolId::Hootsuite => ToolRecord::Social(serde_yaml::from_value(value)?),
        ToolId::Hubspot => ToolRecord::Crm(serde_yaml::from_value(value)?),
        ToolId::Slack => ToolRecord::Chat(serde_yaml::from_value(value)?),
    };
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_every_identifier_has_descriptor_and_record() {
        let catalog = ToolCatalog::new();
        for id in ToolId::ALL {
            let descriptor = catalog.descriptor(id.as_str()).unwrap();
            assert_eq!(descriptor.id, id);
            assert!(!catalog.record(id).is_empty(), "{id} has no record");
        }
        assert_eq!(catalog.descriptors().count(), 8);
        assert_eq!(catalog.tool_count(), 8);
    }

    #[test]
    fn test_unknown_descriptor_fails() {
        let catalog = ToolCatalog::new();
        let err = catalog.descriptor("jira").unwrap_err();
        assert!(matches!(err, AssistantError::UnknownTool(ref id) if id == "jira"));
    }

    #[test]
    fn test_descriptor_metadata() {
        let catalog = ToolCatalog::new();
        let hubspot = catalog.descriptor_of(ToolId::Hubspot);
        assert_eq!(hubspot.name, "HubSpot CRM");
        assert_eq!(hubspot.category, Category::Sales);
        let quickbooks = catalog.descriptor("quickbooks").unwrap();
        assert_eq!(quickbooks.description, "Accounting & Finance");
    }

    #[test]
    fn test_tool_id_round_trips_through_str() {
        for id in ToolId::ALL {
            assert_eq!(id.as_str().parse::<ToolId>().unwrap(), id);
        }
        assert!("Asana".parse::<ToolId>().is_err());
    }

    #[test]
    fn test_connection_set_operations() {
        let mut set = ConnectionSet::new();
        assert!(set.is_empty());
        assert!(set.connect(ToolId::Slack));
        assert!(!set.connect(ToolId::Slack));
        assert!(set.connect(ToolId::Asana));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![ToolId::Asana, ToolId::Slack]);
        assert!(!set.toggle(ToolId::Slack));
        assert!(set.toggle(ToolId::Zendesk));
        assert!(set.disconnect(ToolId::Asana));
        assert!(!set.disconnect(ToolId::Asana));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_is_connected_uses_caller_set() {
        let catalog = ToolCatalog::new();
        let set: ConnectionSet = [ToolId::Quickbooks].into_iter().collect();
        assert!(catalog.is_connected(ToolId::Quickbooks, &set));
        assert!(!catalog.is_connected(ToolId::Asana, &set));
    }

    #[test]
    fn test_overrides_replace_and_clear_records() {
        let yaml = r#"
quickbooks:
  monthly_revenue: 1000
  outstanding_invoices: 0
  profit_margin: 10.5
  expenses: 900
slack: null
"#;
        let catalog = ToolCatalog::with_overrides(yaml).unwrap();
        let books = catalog.record(ToolId::Quickbooks).accounting().unwrap();
        assert_eq!(books.monthly_revenue, 1000);
        assert!(catalog.record(ToolId::Slack).is_empty());
        assert!(catalog.record(ToolId::Asana).project_management().is_some());
    }

    #[test]
    fn test_overrides_reject_unknown_tool() {
        let err = ToolCatalog::with_overrides("jira: null\n").unwrap_err();
        assert!(matches!(err, AssistantError::UnknownTool(_)));
    }

    #[test]
    fn test_overrides_reject_malformed_record() {
        let err = ToolCatalog::with_overrides("quickbooks:\n  monthly_revenue: lots\n").unwrap_err();
        assert!(matches!(err, AssistantError::Yaml(_)));
    }

    #[test]
    fn test_from_data_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "google_calendar:\n  meetings_today: 2").unwrap();
        let catalog = ToolCatalog::from_data_file(file.path()).unwrap();
        let calendar = catalog.record(ToolId::GoogleCalendar).calendar().unwrap();
        assert_eq!(calendar.meetings_today, 2);
        assert!(calendar.availability.is_empty());
    }
}
