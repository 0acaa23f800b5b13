use super::common::*;
use crate::workflows::procurement::domain::{Partner, ProcessId, ProponentId, Requirements};
use crate::workflows::procurement::evaluation::EvaluationConfig;
use crate::workflows::procurement::intake::IntakeViolation;
use crate::workflows::procurement::repository::{ProcessRepository, RepositoryError};
use crate::workflows::procurement::{
    EvaluationBundle, ProcurementEvaluationService, ProponentRegistration, ScoringUpdate,
    ServiceError, VerificationUpdate,
};
use std::sync::Arc;
use std::thread;

fn registration(name: &str) -> ProponentRegistration {
    ProponentRegistration {
        name: name.to_string(),
        rup_renewal_date: Some(date(2024, 2, 15)),
        ..ProponentRegistration::default()
    }
}

fn verification() -> VerificationUpdate {
    VerificationUpdate {
        requirements: compliant_requirements(),
        contractors: vec![contract("Constructora Andina S.A.S.", 1000.0, 100.0)],
        rup_renewal_date: None,
    }
}

#[test]
fn register_process_assigns_id_when_missing() {
    let (service, repository) = build_service();
    let mut definition = process();
    definition.id = ProcessId::default();

    let record = service
        .register_process(definition)
        .expect("process registers");

    assert!(record.id().0.starts_with("proc-"));
    assert!(repository
        .fetch(record.id())
        .expect("fetch succeeds")
        .is_some());
}

#[test]
fn register_process_propagates_conflicts() {
    let (service, _) = build_service();
    service.register_process(process()).expect("first insert");

    match service.register_process(process()) {
        Err(ServiceError::Repository(RepositoryError::Conflict)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn register_proponent_requires_a_known_process() {
    let (service, _) = build_service();

    match service.register_proponent(&ProcessId("missing".to_string()), registration("A")) {
        Err(ServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn register_proponent_rejects_blank_names() {
    let (service, _) = build_service();
    let record = service.register_process(process()).expect("process registers");

    match service.register_proponent(record.id(), registration("  ")) {
        Err(ServiceError::Intake(IntakeViolation::MissingProponentName)) => {}
        other => panic!("expected missing name, got {other:?}"),
    }
}

#[test]
fn new_proponent_starts_flagged_until_verified() {
    let (service, _) = build_service();
    let record = service.register_process(process()).expect("process registers");

    let proponent = service
        .register_proponent(record.id(), registration("Constructora Andina S.A.S."))
        .expect("proponent registers");

    assert!(proponent.id.0.starts_with("prop-"));
    assert!(proponent.rup.complies);
    assert!(proponent.needs_subsanation);
    assert_eq!(
        proponent.subsanation_details,
        vec![
            "No cumple experiencia general",
            "No cumple experiencia específica",
            "No aporta tarjeta profesional",
            "No cumple Longitud en vías",
        ]
    );
}

#[test]
fn scoring_and_verification_recompute_derived_fields() {
    let (service, repository) = build_service();
    let record = service.register_process(process()).expect("process registers");
    let proponent = service
        .register_proponent(record.id(), registration("Constructora Andina S.A.S."))
        .expect("proponent registers");

    let scored = service
        .score_proponent(
            record.id(),
            &proponent.id,
            ScoringUpdate {
                scoring: full_scoring(),
                partners: None,
            },
        )
        .expect("scoring applies");
    assert_eq!(scored.total_score, 51.5);

    let verified = service
        .verify_proponent(record.id(), &proponent.id, verification())
        .expect("verification applies");
    assert!(!verified.needs_subsanation);
    assert_eq!(verified.total_score, 51.5);
    assert_eq!(verified.contractors[0].adjusted_value, 1000.0);
    assert!(verified.contractors[0].classifier_codes_match);

    let stored = repository
        .fetch(record.id())
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.proponent(&proponent.id), Some(&verified));
    assert_eq!(stored.status_view().requiring_subsanation, 0);
}

#[test]
fn scoring_rejects_invalid_partner_percentages() {
    let (service, _) = build_service();
    let record = service.register_process(process()).expect("process registers");
    let proponent = service
        .register_proponent(record.id(), registration("Consorcio"))
        .expect("proponent registers");

    let update = ScoringUpdate {
        scoring: full_scoring(),
        partners: Some(vec![Partner {
            name: "A".to_string(),
            percentage: -5.0,
            rup_renewal_date: None,
        }]),
    };

    match service.score_proponent(record.id(), &proponent.id, update) {
        Err(ServiceError::Intake(IntakeViolation::PartnerPercentageOutOfRange { .. })) => {}
        other => panic!("expected partner violation, got {other:?}"),
    }
}

#[test]
fn verification_of_unknown_proponent_fails() {
    let (service, _) = build_service();
    let record = service.register_process(process()).expect("process registers");

    match service.verify_proponent(
        record.id(),
        &ProponentId("prop-missing".to_string()),
        verification(),
    ) {
        Err(ServiceError::UnknownProponent { proponent, .. }) => {
            assert_eq!(proponent.0, "prop-missing")
        }
        other => panic!("expected unknown proponent, got {other:?}"),
    }
}

#[test]
fn verification_can_replace_rup_date() {
    let (service, _) = build_service();
    let record = service.register_process(process()).expect("process registers");
    let proponent = service
        .register_proponent(record.id(), registration("Constructora Andina S.A.S."))
        .expect("proponent registers");

    let mut update = verification();
    update.rup_renewal_date = Some(date(2023, 1, 10));
    let verified = service
        .verify_proponent(record.id(), &proponent.id, update)
        .expect("verification applies");

    assert!(!verified.rup.complies);
    assert_eq!(verified.subsanation_details, vec!["RUP no vigente"]);
}

#[test]
fn evaluate_reports_disability_credit_for_plural_proponents() {
    let repository = Arc::new(MemoryRepository::default());
    let service = ProcurementEvaluationService::new(
        repository,
        EvaluationConfig {
            disability_threshold: 40.0,
            ..EvaluationConfig::default()
        },
    );
    let record = service.register_process(process()).expect("process registers");
    let proponent = service
        .register_proponent(
            record.id(),
            ProponentRegistration {
                name: "Consorcio Vías del Norte".to_string(),
                is_plural: true,
                partners: plural_proponent().partners,
                rup_renewal_date: None,
            },
        )
        .expect("proponent registers");

    let mut scoring = full_scoring();
    scoring.disability_partner = Some("B".to_string());
    service
        .score_proponent(
            record.id(),
            &proponent.id,
            ScoringUpdate {
                scoring,
                partners: None,
            },
        )
        .expect("scoring applies");
    service
        .verify_proponent(
            record.id(),
            &proponent.id,
            VerificationUpdate {
                requirements: Requirements {
                    general_experience: true,
                    specific_experience: true,
                    professional_card: true,
                    additional_specific: Vec::new(),
                },
                contractors: plural_proponent().contractors,
                rup_renewal_date: None,
            },
        )
        .expect("verification applies");

    let outcome = service
        .evaluate(record.id(), &proponent.id)
        .expect("evaluation succeeds");

    assert!(outcome.rup_complies);
    assert_eq!(outcome.partner_shares.get("B"), Some(&100.0));
    let credit = outcome.disability_credit.expect("credit reported");
    assert_eq!(credit.partner.as_deref(), Some("B"));
    assert!(credit.meets_threshold);
    assert!(!outcome.verdict.needs_subsanation);
}

#[test]
fn report_ranks_stored_proponents() {
    let (service, _) = build_service();
    let record = service.register_process(process()).expect("process registers");
    let first = service
        .register_proponent(record.id(), registration("Obras Menores Ltda."))
        .expect("first registers");
    let second = service
        .register_proponent(record.id(), registration("Constructora Andina S.A.S."))
        .expect("second registers");
    service
        .score_proponent(
            record.id(),
            &second.id,
            ScoringUpdate {
                scoring: full_scoring(),
                partners: None,
            },
        )
        .expect("scoring applies");

    let report = service.report(record.id()).expect("report builds");

    assert_eq!(report.ranking[0].proponent_id, second.id);
    assert_eq!(report.ranking[1].proponent_id, first.id);
    assert_eq!(report.requiring_subsanation, 2);
}

#[test]
fn bundle_evaluation_does_not_touch_storage() {
    let (service, repository) = build_service();
    let bundle = EvaluationBundle {
        process: process(),
        proponents: vec![single_proponent(), plural_proponent()],
    };

    let report = service.evaluate_bundle(bundle).expect("bundle ranks");

    assert_eq!(report.proponents_evaluated, 2);
    assert_eq!(report.requiring_subsanation, 0);
    assert!(repository.list(10).expect("list succeeds").is_empty());
}

#[test]
fn bundle_evaluation_validates_proponents() {
    let (service, _) = build_service();
    let mut invalid = single_proponent();
    invalid.contractors[0].participation_percentage = 150.0;

    match service.evaluate_bundle(EvaluationBundle {
        process: process(),
        proponents: vec![invalid],
    }) {
        Err(ServiceError::Intake(IntakeViolation::ParticipationOutOfRange { position, .. })) => {
            assert_eq!(position, 1)
        }
        other => panic!("expected participation violation, got {other:?}"),
    }
}

#[test]
fn unavailable_repository_surfaces_errors() {
    let service = ProcurementEvaluationService::new(
        Arc::new(UnavailableRepository),
        EvaluationConfig::default(),
    );

    match service.get(&ProcessId("proc-test".to_string())) {
        Err(ServiceError::Repository(RepositoryError::Unavailable(message))) => {
            assert_eq!(message, "database offline")
        }
        other => panic!("expected unavailable repository, got {other:?}"),
    }
}

#[test]
fn concurrent_registrations_are_all_stored() {
    let repository = Arc::new(SlowReadRepository::default());
    let service = Arc::new(ProcurementEvaluationService::new(
        repository.clone(),
        EvaluationConfig::default(),
    ));
    let stored = service.register_process(process()).expect("process stored");
    let process_id = stored.id().clone();

    let workers: Vec<_> = ["Norte", "Sur", "Oriente", "Occidente"]
        .into_iter()
        .map(|name| {
            let service = service.clone();
            let process_id = process_id.clone();
            thread::spawn(move || service.register_proponent(&process_id, registration(name)))
        })
        .collect();
    for worker in workers {
        worker
            .join()
            .expect("worker finished")
            .expect("proponent registered");
    }

    let record = repository
        .fetch(&process_id)
        .expect("fetch succeeds")
        .expect("process exists");
    assert_eq!(record.proponents.len(), 4);
}

#[test]
fn concurrent_edits_to_different_proponents_are_kept() {
    let repository = Arc::new(SlowReadRepository::default());
    let service = Arc::new(ProcurementEvaluationService::new(
        repository.clone(),
        EvaluationConfig::default(),
    ));
    let process_id = service
        .register_process(process())
        .expect("process stored")
        .id()
        .clone();
    let first = service
        .register_proponent(&process_id, registration("Norte"))
        .expect("first registered");
    let second = service
        .register_proponent(&process_id, registration("Sur"))
        .expect("second registered");

    let workers: Vec<_> = [first.id.clone(), second.id.clone()]
        .into_iter()
        .map(|proponent_id| {
            let service = service.clone();
            let process_id = process_id.clone();
            thread::spawn(move || service.verify_proponent(&process_id, &proponent_id, verification()))
        })
        .collect();
    for worker in workers {
        worker
            .join()
            .expect("worker finished")
            .expect("proponent verified");
    }

    let record = repository
        .fetch(&process_id)
        .expect("fetch succeeds")
        .expect("process exists");
    for proponent_id in [&first.id, &second.id] {
        let proponent = record.proponent(proponent_id).expect("proponent stored");
        assert_eq!(proponent.contractors.len(), 1);
        assert!(proponent.requirements.general_experience);
    }
}

#[test]
fn legacy_bundles_keep_every_proponent() {
    let (service, _) = build_service();
    let bundle: EvaluationBundle = serde_json::from_str(
        r#"{
            "process": {"id": "proc-legacy", "name": "Mantenimiento vial", "closingDate": "2024-03-01"},
            "proponents": [
                {"id": "A", "name": "Alfa", "requirements": null},
                {"id": 17, "name": "Beta"},
                {"id": "C", "name": "Gamma", "rup": null},
                {"id": "D", "name": "Delta"}
            ]
        }"#,
    )
    .expect("bundle parses");

    let report = service.evaluate_bundle(bundle).expect("bundle ranks");

    assert_eq!(report.proponents_evaluated, 4);
    let mut ids: Vec<&str> = report
        .ranking
        .iter()
        .map(|entry| entry.proponent_id.0.as_str())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["17", "A", "C", "D"]);
}
