use chrono::{Duration, NaiveDate, TimeZone, Utc};
use handwerk_os::error::AppError;
use handwerk_os::workflows::billing::{
    CustomerType, ProjectSize, ProjectWithWorkflow, ProjectWorkflowConfig, WorkflowProjectStatus,
    WorkflowSettings,
};
use handwerk_os::workflows::cockpit::{ProjectSnapshotSource, SourceError, WorkflowSource};
use handwerk_os::workflows::health::{
    MaterialEntry, ProjectAggregates, ProjectStatus, ProjectWithTargets, TimeEntry,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Seed document loaded with `serve --seed`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SeedData {
    #[serde(default)]
    pub(crate) projects: Vec<SeedProject>,
    #[serde(default)]
    pub(crate) companies: Vec<SeedCompany>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeedProject {
    pub(crate) project: ProjectWithTargets,
    #[serde(default)]
    pub(crate) time_entries: Vec<TimeEntry>,
    #[serde(default)]
    pub(crate) material_entries: Vec<MaterialEntry>,
    #[serde(default)]
    pub(crate) has_invoice: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeedCompany {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) settings: Option<WorkflowSettings>,
    #[serde(default)]
    pub(crate) projects: Vec<ProjectWithWorkflow>,
}

#[derive(Default)]
struct StoreData {
    projects: HashMap<String, ProjectWithTargets>,
    aggregates: HashMap<String, ProjectAggregates>,
    settings: HashMap<String, WorkflowSettings>,
    workflow_projects: HashMap<String, Vec<ProjectWithWorkflow>>,
}

/// In-memory stand-in for the hosted data layer. Read-only once seeded.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProjectStore {
    data: Arc<StoreData>,
}

impl InMemoryProjectStore {
    pub(crate) fn from_seed(seed: SeedData) -> Self {
        let mut data = StoreData::default();

        for entry in seed.projects {
            let aggregates = ProjectAggregates::from_entries(
                &entry.time_entries,
                &entry.material_entries,
                entry.has_invoice,
            );
            data.aggregates.insert(entry.project.id.clone(), aggregates);
            data.projects.insert(entry.project.id.clone(), entry.project);
        }

        for company in seed.companies {
            if let Some(settings) = company.settings {
                data.settings.insert(company.id.clone(), settings);
            }
            data.workflow_projects.insert(company.id, company.projects);
        }

        Self {
            data: Arc::new(data),
        }
    }

    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let seed: SeedData = serde_json::from_str(&raw)?;
        Ok(Self::from_seed(seed))
    }

    /// A small workshop's portfolio, dated relative to `today`.
    pub(crate) fn demo(today: NaiveDate) -> Self {
        Self::from_seed(demo_seed(today))
    }

    pub(crate) fn project_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.data.projects.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub(crate) fn company_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.data.workflow_projects.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub(crate) fn workflow_project_ids(&self, company_id: &str) -> Vec<String> {
        self.data
            .workflow_projects
            .get(company_id)
            .map(|projects| projects.iter().map(|project| project.id.clone()).collect())
            .unwrap_or_default()
    }
}

impl ProjectSnapshotSource for InMemoryProjectStore {
    fn project(&self, project_id: &str) -> Result<Option<ProjectWithTargets>, SourceError> {
        Ok(self.data.projects.get(project_id).cloned())
    }

    fn aggregates(&self, project_id: &str) -> Result<ProjectAggregates, SourceError> {
        Ok(self
            .data
            .aggregates
            .get(project_id)
            .copied()
            .unwrap_or_default())
    }
}

impl WorkflowSource for InMemoryProjectStore {
    fn company_settings(&self, company_id: &str) -> Result<Option<WorkflowSettings>, SourceError> {
        Ok(self.data.settings.get(company_id).cloned())
    }

    fn workflow_project(
        &self,
        company_id: &str,
        project_id: &str,
    ) -> Result<Option<ProjectWithWorkflow>, SourceError> {
        Ok(self
            .data
            .workflow_projects
            .get(company_id)
            .and_then(|projects| projects.iter().find(|project| project.id == project_id))
            .cloned())
    }

    fn workflow_projects(&self, company_id: &str) -> Result<Vec<ProjectWithWorkflow>, SourceError> {
        Ok(self
            .data
            .workflow_projects
            .get(company_id)
            .cloned()
            .unwrap_or_default())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn workday(day: NaiveDate, hours: i64, break_minutes: u32) -> TimeEntry {
    let start = Utc.from_utc_datetime(&day.and_hms_opt(7, 0, 0).unwrap_or_default());
    TimeEntry {
        start_time: start,
        end_time: Some(start + Duration::hours(hours)),
        break_minutes: Some(break_minutes),
    }
}

fn booked_days(first: NaiveDate, days: i64, hours: i64) -> Vec<TimeEntry> {
    (0..days)
        .map(|offset| workday(first + Duration::days(offset), hours, 30))
        .collect()
}

fn material(total_cost: f64) -> MaterialEntry {
    MaterialEntry {
        total_cost: Some(total_cost),
    }
}

fn demo_seed(today: NaiveDate) -> SeedData {
    let started = today - Duration::days(20);

    let projects = vec![
        SeedProject {
            project: ProjectWithTargets {
                id: "proj-bath-meier".to_string(),
                status: ProjectStatus::Active,
                planned_hours: Some(80.0),
                target_revenue: Some(12_000.0),
                end_date: Some(today + Duration::days(30)),
                project_manager_id: Some("emp-anna".to_string()),
                budget: Some(11_000.0),
            },
            time_entries: booked_days(started, 5, 8),
            material_entries: vec![material(3_450.0), material(1_220.4)],
            has_invoice: false,
        },
        SeedProject {
            project: ProjectWithTargets {
                id: "proj-roof-schulz".to_string(),
                status: ProjectStatus::Active,
                planned_hours: Some(40.0),
                target_revenue: Some(6_500.0),
                end_date: Some(today + Duration::days(4)),
                project_manager_id: Some("emp-jonas".to_string()),
                budget: None,
            },
            time_entries: booked_days(started, 7, 8),
            material_entries: vec![material(2_980.0)],
            has_invoice: false,
        },
        SeedProject {
            project: ProjectWithTargets {
                id: "proj-heating-bauer".to_string(),
                status: ProjectStatus::Completed,
                planned_hours: Some(24.0),
                target_revenue: Some(4_200.0),
                end_date: Some(today - Duration::days(5)),
                project_manager_id: None,
                budget: None,
            },
            time_entries: booked_days(started, 3, 9),
            material_entries: vec![material(3_900.0), material(780.0)],
            has_invoice: false,
        },
        SeedProject {
            project: ProjectWithTargets {
                id: "proj-garden-wall".to_string(),
                status: ProjectStatus::parse("geplant"),
                planned_hours: None,
                target_revenue: None,
                end_date: None,
                project_manager_id: None,
                budget: None,
            },
            time_entries: Vec::new(),
            material_entries: Vec::new(),
            has_invoice: false,
        },
    ];

    let companies = vec![SeedCompany {
        id: "handwerk-gmbh".to_string(),
        settings: Some(WorkflowSettings {
            min_hours_for_delivery_note: 6.0,
            ..WorkflowSettings::default()
        }),
        projects: vec![
            ProjectWithWorkflow {
                id: "wf-tap-repair".to_string(),
                name: "Tap repair".to_string(),
                customer_id: "cust-private-1".to_string(),
                customer_type: CustomerType::B2c,
                estimated_budget: Some(180.0),
                workflow_config: None,
                total_hours: Some(1.5),
                total_material_value: Some(45.0),
                status: WorkflowProjectStatus::Completed,
            },
            ProjectWithWorkflow {
                id: "wf-office-lighting".to_string(),
                name: "Office lighting".to_string(),
                customer_id: "cust-business-7".to_string(),
                customer_type: CustomerType::B2b,
                estimated_budget: Some(2_400.0),
                workflow_config: None,
                total_hours: Some(3.0),
                total_material_value: Some(310.0),
                status: WorkflowProjectStatus::Active,
            },
            ProjectWithWorkflow {
                id: "wf-kitchen-refit".to_string(),
                name: "Kitchen refit".to_string(),
                customer_id: "cust-private-2".to_string(),
                customer_type: CustomerType::B2c,
                estimated_budget: Some(9_500.0),
                workflow_config: Some(ProjectWorkflowConfig {
                    workflow_type: ProjectSize::Small,
                    requires_delivery_note: None,
                    override_reason: Some("billed as one fixed-price job".to_string()),
                }),
                total_hours: Some(22.0),
                total_material_value: Some(4_100.0),
                status: WorkflowProjectStatus::Active,
            },
        ],
    }];

    SeedData {
        projects,
        companies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 14).expect("valid date")
    }

    #[test]
    fn seed_entries_are_aggregated_per_project() {
        let store = InMemoryProjectStore::demo(today());

        let aggregates = store
            .aggregates("proj-bath-meier")
            .expect("store readable");
        assert_eq!(aggregates.actual_hours, 37.5);
        assert_eq!(aggregates.actual_costs, 4_670.4);
        assert!(!aggregates.has_invoice);

        let missing = store.aggregates("proj-unknown").expect("store readable");
        assert_eq!(missing, ProjectAggregates::default());
    }

    #[test]
    fn seed_json_is_parsed() {
        let seed: SeedData = serde_json::from_str(
            r#"{
                "projects": [{
                    "project": { "id": "p-1", "status": "aktiv", "end_date": "2025-05-01" },
                    "material_entries": [{ "total_cost": 99.5 }],
                    "has_invoice": true
                }],
                "companies": [{ "id": "c-1", "projects": [
                    { "id": "w-1", "customer_type": "b2b" }
                ]}]
            }"#,
        )
        .expect("seed parses");
        let store = InMemoryProjectStore::from_seed(seed);

        let project = store
            .project("p-1")
            .expect("store readable")
            .expect("project stored");
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(store.company_ids(), vec!["c-1".to_string()]);
        assert_eq!(store.company_settings("c-1").expect("readable"), None);
        assert!(store
            .workflow_project("c-1", "w-1")
            .expect("readable")
            .is_some());
    }

    #[test]
    fn clones_share_one_seeded_snapshot() {
        let store = InMemoryProjectStore::demo(today());
        let clone = store.clone();

        assert!(Arc::ptr_eq(&store.data, &clone.data));
        assert_eq!(clone.project_ids(), store.project_ids());
        assert_eq!(
            clone.workflow_projects("handwerk-gmbh").expect("readable"),
            store.workflow_projects("handwerk-gmbh").expect("readable")
        );
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(parse_date(" 2025-04-14 "), Ok(today()));
        assert!(parse_date("14.04.2025").is_err());
    }
}
