use super::*;
use crate::workflows::health::InvalidInputError;

fn settings() -> WorkflowSettings {
    WorkflowSettings::default()
}

fn b2c_project() -> ProjectWithWorkflow {
    ProjectWithWorkflow {
        id: "proj-100".to_string(),
        name: "Bathroom refit".to_string(),
        customer_id: "cust-7".to_string(),
        customer_type: CustomerType::B2c,
        estimated_budget: Some(500.0),
        workflow_config: None,
        total_hours: Some(2.0),
        total_material_value: Some(80.0),
        status: WorkflowProjectStatus::Active,
    }
}

#[test]
fn small_private_job_goes_straight_to_invoice() {
    let decision = determine_workflow(&b2c_project(), &settings());

    assert_eq!(decision.workflow, WorkflowType::DirectInvoice);
    assert!(decision.auto_determined);
    assert!(decision.triggered_rules.is_empty());
    assert_eq!(decision.reason, vec!["no threshold exceeded".to_string()]);
}

#[test]
fn hours_alone_force_delivery_note() {
    let mut project = b2c_project();
    project.total_hours = Some(10.0);

    let decision = determine_workflow(&project, &settings());

    assert_eq!(decision.workflow, WorkflowType::DeliveryNoteFirst);
    assert!(decision.auto_determined);
    assert_eq!(decision.triggered_rules, vec!["hours_threshold".to_string()]);
    assert_eq!(decision.reason.len(), 1);
}

#[test]
fn thresholds_are_inclusive() {
    let mut project = b2c_project();
    project.total_hours = Some(8.0);
    project.total_material_value = Some(500.0);
    project.estimated_budget = Some(1_000.0);

    let decision = determine_workflow(&project, &settings());

    assert_eq!(
        decision.triggered_rules,
        vec![
            "hours_threshold".to_string(),
            "material_value_threshold".to_string(),
            "b2c_threshold".to_string(),
        ]
    );
    assert_eq!(decision.reason.len(), 3);
}

#[test]
fn business_customers_always_get_delivery_notes() {
    let mut project = b2c_project();
    project.customer_type = CustomerType::B2b;
    project.estimated_budget = Some(50_000.0);

    let decision = determine_workflow(&project, &settings());
    assert_eq!(decision.workflow, WorkflowType::DeliveryNoteFirst);
    assert_eq!(
        decision.triggered_rules,
        vec!["b2b_auto_delivery_note".to_string()]
    );

    let relaxed = WorkflowSettings {
        b2b_always_delivery_note: false,
        ..settings()
    };
    let decision = determine_workflow(&project, &relaxed);
    assert_eq!(decision.workflow, WorkflowType::DirectInvoice);
}

#[test]
fn missing_figures_never_fire_rules() {
    let project = ProjectWithWorkflow {
        total_hours: None,
        total_material_value: None,
        estimated_budget: None,
        ..b2c_project()
    };
    let zero_thresholds = WorkflowSettings {
        min_hours_for_delivery_note: 0.0,
        min_material_value_for_delivery_note: 0.0,
        b2c_delivery_note_threshold: 0.0,
        ..settings()
    };

    let decision = determine_workflow(&project, &zero_thresholds);

    assert_eq!(decision.workflow, WorkflowType::DirectInvoice);
}

#[test]
fn explicit_no_delivery_note_beats_every_rule() {
    let mut project = b2c_project();
    project.customer_type = CustomerType::B2b;
    project.total_hours = Some(40.0);
    project.total_material_value = Some(4_000.0);
    project.workflow_config = Some(ProjectWorkflowConfig {
        workflow_type: ProjectSize::Auto,
        requires_delivery_note: Some(false),
        override_reason: Some("framework contract".to_string()),
    });

    let decision = determine_workflow(&project, &settings());

    assert_eq!(decision.workflow, WorkflowType::DirectInvoice);
    assert!(!decision.auto_determined);
    assert_eq!(
        decision.reason,
        vec!["manual override: framework contract".to_string()]
    );
    assert_eq!(
        decision.triggered_rules,
        vec!["manual_delivery_note_disabled".to_string()]
    );
}

#[test]
fn workflow_type_takes_precedence_over_delivery_note_flag() {
    let mut project = b2c_project();
    project.workflow_config = Some(ProjectWorkflowConfig {
        workflow_type: ProjectSize::Large,
        requires_delivery_note: Some(false),
        override_reason: None,
    });

    let decision = determine_workflow(&project, &settings());

    assert_eq!(decision.workflow, WorkflowType::DeliveryNoteFirst);
    assert!(!decision.auto_determined);
    assert_eq!(
        decision.reason,
        vec!["manual override: project configured as large".to_string()]
    );
}

#[test]
fn auto_config_without_flag_uses_rules() {
    let mut project = b2c_project();
    project.workflow_config = Some(ProjectWorkflowConfig::default());

    let decision = determine_workflow(&project, &settings());

    assert!(decision.auto_determined);
}

#[test]
fn stored_overrides_hold_when_company_disallows_new_ones() {
    let mut project = b2c_project();
    project.total_hours = Some(12.0);
    project.workflow_config = Some(ProjectWorkflowConfig {
        workflow_type: ProjectSize::Small,
        requires_delivery_note: None,
        override_reason: Some("customer asked".to_string()),
    });
    let locked = WorkflowSettings {
        allow_manual_override: false,
        ..settings()
    };

    let decision = determine_workflow(&project, &locked);

    assert_eq!(decision.workflow, WorkflowType::DirectInvoice);
    assert!(!decision.auto_determined);
    assert_eq!(decision.reason, vec!["manual override: customer asked"]);
    assert_eq!(decision.triggered_rules, vec!["manual_override_small"]);
}

#[test]
fn switch_notice_only_for_changed_automatic_decisions() {
    let engine = WorkflowEngine::default();
    let mut project = b2c_project();
    project.total_hours = Some(9.0);
    let decision = engine.decide(&project);

    let notice = engine
        .switch_notice(&project.id, Some(WorkflowType::DirectInvoice), &decision)
        .expect("switch noticed");
    assert_eq!(notice.from, WorkflowType::DirectInvoice);
    assert_eq!(notice.to, WorkflowType::DeliveryNoteFirst);
    assert_eq!(notice.triggered_rules, vec!["hours_threshold".to_string()]);

    assert!(engine
        .switch_notice(&project.id, Some(WorkflowType::DeliveryNoteFirst), &decision)
        .is_none());
    assert!(engine.switch_notice(&project.id, None, &decision).is_none());

    let quiet = WorkflowEngine::new(WorkflowSettings {
        notify_on_workflow_auto_switch: false,
        ..settings()
    });
    assert!(quiet
        .switch_notice(&project.id, Some(WorkflowType::DirectInvoice), &decision)
        .is_none());
}

#[test]
fn stats_count_paths_and_origins() {
    let mut large = b2c_project();
    large.total_hours = Some(20.0);
    let mut forced = b2c_project();
    forced.workflow_config = Some(ProjectWorkflowConfig {
        workflow_type: ProjectSize::Small,
        ..ProjectWorkflowConfig::default()
    });

    let decisions: Vec<WorkflowDecision> = [b2c_project(), large, forced]
        .iter()
        .map(|project| determine_workflow(project, &settings()))
        .collect();
    let stats: WorkflowStats = decisions.iter().collect();

    assert_eq!(
        stats,
        WorkflowStats {
            total_projects: 3,
            direct_invoices: 2,
            delivery_note_first: 1,
            auto_determined: 2,
            manual_override: 1,
        }
    );
}

#[test]
fn settings_deserialise_with_defaults() {
    let settings: WorkflowSettings =
        serde_json::from_str(r#"{ "min_hours_for_delivery_note": 4 }"#).expect("settings parse");
    assert_eq!(settings.min_hours_for_delivery_note, 4.0);
    assert_eq!(settings.b2c_delivery_note_threshold, 1_000.0);
    assert!(settings.b2b_always_delivery_note);
}

#[test]
fn negative_or_non_finite_figures_fail_validation() {
    assert!(b2c_project().validate().is_ok());
    assert!(settings().validate().is_ok());

    let mut project = b2c_project();
    project.total_hours = Some(-3.0);
    assert!(matches!(
        project.validate(),
        Err(InvalidInputError::Negative { field: "total_hours", .. })
    ));

    let mut project = b2c_project();
    project.estimated_budget = Some(f64::NAN);
    assert!(matches!(
        project.validate(),
        Err(InvalidInputError::NotFinite { field: "estimated_budget" })
    ));

    let mut settings = settings();
    settings.b2c_delivery_note_threshold = f64::INFINITY;
    assert!(matches!(
        settings.validate(),
        Err(InvalidInputError::NotFinite { field: "b2c_delivery_note_threshold" })
    ));
}
