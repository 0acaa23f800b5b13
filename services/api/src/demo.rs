use crate::infra::{load_bundle, parse_date, InMemoryProcessRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use procurement_eval::config::AppConfig;
use procurement_eval::error::AppError;
use procurement_eval::workflows::procurement::{
    AdditionalCriterion, Contract, ContractType, EvaluationConfig, EvaluationOutcome,
    ExperienceRequirements, MeasurementUnit, Partner, ProcessDefinition, ProcessReport,
    ProcurementEvaluationService, ProponentRegistration, Requirements, Scoring, ScoringCriterion,
    ScoringMaxima, ScoringUpdate, VerificationUpdate,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding `{ "process": ..., "proponents": [...] }`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the report as JSON instead of a ranking table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Process closing date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) closing_date: Option<NaiveDate>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let bundle = load_bundle(&args.input)?;
    let service = ProcurementEvaluationService::new(
        Arc::new(InMemoryProcessRepository::default()),
        config.evaluation,
    );

    let report = service.evaluate_bundle(bundle)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let closing_date = args
        .closing_date
        .unwrap_or_else(|| Local::now().date_naive());

    println!("Procurement evaluation demo (closing date {closing_date})");
    let run = execute_demo(closing_date)?;

    for criterion in run.process.additional_criteria() {
        println!(
            "Additional requirement: {} >= {} {}",
            criterion.name,
            criterion.value,
            criterion.unit.label()
        );
    }

    for (name, outcome) in &run.outcomes {
        println!("\n{name}");
        render_outcome(outcome);
    }

    println!();
    render_report(&run.report);
    Ok(())
}

pub(crate) struct DemoRun {
    pub(crate) process: ProcessDefinition,
    pub(crate) outcomes: Vec<(String, EvaluationOutcome)>,
    pub(crate) report: ProcessReport,
}

/// Registers a road-works process with three bidders, walks each through scoring and
/// verification, and returns their evaluations plus the final ranking.
pub(crate) fn execute_demo(closing_date: NaiveDate) -> Result<DemoRun, AppError> {
    let service = ProcurementEvaluationService::new(
        Arc::new(InMemoryProcessRepository::default()),
        EvaluationConfig::default(),
    );
    let record = service.register_process(demo_process(closing_date))?;
    let process_id = record.id().clone();

    let mut outcomes = Vec::new();
    for bidder in demo_bidders(closing_date) {
        let proponent = service.register_proponent(&process_id, bidder.registration)?;
        service.score_proponent(&process_id, &proponent.id, bidder.scoring)?;
        let verified = service.verify_proponent(&process_id, &proponent.id, bidder.verification)?;
        let outcome = service.evaluate(&process_id, &proponent.id)?;
        outcomes.push((verified.name, outcome));
    }

    let report = service.report(&process_id)?;
    Ok(DemoRun {
        process: record.process,
        outcomes,
        report,
    })
}

pub(crate) fn render_outcome(outcome: &EvaluationOutcome) {
    println!(
        "  Score {:.2}/{:.2} | RUP {}",
        outcome.total_score,
        outcome.maximum_total,
        if outcome.rup_complies {
            "vigente"
        } else {
            "no vigente"
        }
    );
    println!("  Verdict: {}", outcome.verdict.summary());
    if !outcome.verdict.incomplete_contracts.is_empty() {
        println!(
            "  Incomplete contracts: {:?}",
            outcome.verdict.incomplete_contracts
        );
    }
    for (partner, share) in &outcome.partner_shares {
        println!("  Experience share {partner}: {share:.2}%");
    }
    if let Some(credit) = &outcome.disability_credit {
        println!(
            "  Disability credit: {} holds {:.2}% (threshold {:.0}%) -> {}",
            credit.partner.as_deref().unwrap_or("unassigned partner"),
            credit.share,
            credit.threshold,
            if credit.meets_threshold {
                "meets"
            } else {
                "below"
            }
        );
    }
    for warning in &outcome.warnings {
        println!("  Warning: {}", warning.summary());
    }
}

pub(crate) fn render_report(report: &ProcessReport) {
    println!(
        "Process {} - {}",
        report.process_id.0, report.process_name
    );
    if let Some(closing_date) = report.closing_date {
        println!("Closing date: {closing_date}");
    }
    println!("{}", report.summary());

    for entry in &report.ranking {
        println!(
            "{:>3}. {} [{}] {:.2}/{:.2} {}",
            entry.rank,
            entry.name,
            if entry.is_plural { "plural" } else { "single" },
            entry.total_score,
            report.maximum_total,
            if entry.needs_subsanation {
                "requiere subsanación"
            } else {
                "cumple"
            }
        );
        for reason in &entry.subsanation_details {
            println!("       - {reason}");
        }
    }
}

struct DemoBidder {
    registration: ProponentRegistration,
    scoring: ScoringUpdate,
    verification: VerificationUpdate,
}

fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_sub_signed(chrono::Duration::days(days))
        .unwrap_or(date)
}

fn demo_process(closing_date: NaiveDate) -> ProcessDefinition {
    ProcessDefinition {
        name: "Mejoramiento de la vía Tunja - Soracá".to_string(),
        closing_date: Some(closing_date),
        scoring_maxima: ScoringMaxima {
            woman_entrepreneurship: 0.25,
            mipyme: 0.25,
            disabled: 1.0,
            quality_factor: 20.0,
            environmental_quality: 10.0,
            national_industry_support: 20.0,
        },
        experience_requirements: ExperienceRequirements {
            general: "Tres contratos de construcción de obra civil".to_string(),
            specific: "Un contrato de construcción o mejoramiento de vías".to_string(),
            additional_specific: vec![AdditionalCriterion {
                name: "Longitud en vías".to_string(),
                value: 500.0,
                unit: MeasurementUnit::Length,
            }],
        },
        classifier_codes: vec!["721410".to_string(), "811015".to_string()],
        ..ProcessDefinition::default()
    }
}

fn full_scoring() -> Scoring {
    Scoring {
        woman_entrepreneurship: 0.25,
        mipyme: 0.25,
        disabled: 1.0,
        quality_factor: 20.0,
        environmental_quality: 10.0,
        national_industry_support: 20.0,
        ..Scoring::default()
    }
}

fn verified_requirements(professional_card: bool) -> Requirements {
    Requirements {
        general_experience: true,
        specific_experience: true,
        professional_card,
        additional_specific: Vec::new(),
    }
}

fn road_contract(
    contributor: &str,
    entity: &str,
    total_value_smmlv: f64,
    participation_percentage: f64,
    road_length: f64,
) -> Contract {
    Contract {
        contracting_entity: entity.to_string(),
        contract_number: format!("OBR-{:.0}", total_value_smmlv),
        object: "Construcción y mejoramiento de vías terciarias".to_string(),
        services_code: "721410".to_string(),
        total_value_smmlv,
        participation_percentage,
        additional_specific_experience_contribution: vec![road_length],
        experience_contributor: contributor.to_string(),
        contract_type: ContractType::Public,
        selected_classifier_codes: vec!["721410".to_string()],
        contract_complies: true,
        ..Contract::default()
    }
}

fn demo_bidders(closing_date: NaiveDate) -> Vec<DemoBidder> {
    let andina = DemoBidder {
        registration: ProponentRegistration {
            name: "Constructora Andina S.A.S.".to_string(),
            rup_renewal_date: Some(days_before(closing_date, 15)),
            ..ProponentRegistration::default()
        },
        scoring: ScoringUpdate {
            scoring: full_scoring(),
            partners: None,
        },
        verification: VerificationUpdate {
            requirements: verified_requirements(true),
            contractors: vec![road_contract(
                "Constructora Andina S.A.S.",
                "Gobernación de Boyacá",
                1000.0,
                100.0,
                650.0,
            )],
            rup_renewal_date: None,
        },
    };

    let mut consortium_scoring = full_scoring();
    consortium_scoring.quality_factor = 0.0;
    consortium_scoring.comments.insert(
        ScoringCriterion::QualityFactor,
        "No ofrece interventoría adicional".to_string(),
    );
    consortium_scoring.disability_partner = Some("Ingeniería Boyacá Ltda.".to_string());
    let consortium = DemoBidder {
        registration: ProponentRegistration {
            name: "Consorcio Vías del Norte".to_string(),
            is_plural: true,
            partners: vec![
                Partner {
                    name: "Ingeniería Boyacá Ltda.".to_string(),
                    percentage: 60.0,
                    rup_renewal_date: Some(days_before(closing_date, 10)),
                },
                Partner {
                    name: "Pavimentos del Centro S.A.".to_string(),
                    percentage: 40.0,
                    rup_renewal_date: Some(days_before(closing_date, 20)),
                },
            ],
            rup_renewal_date: None,
        },
        scoring: ScoringUpdate {
            scoring: consortium_scoring,
            partners: None,
        },
        verification: VerificationUpdate {
            requirements: verified_requirements(true),
            contractors: vec![
                road_contract(
                    "Ingeniería Boyacá Ltda.",
                    "Municipio de Duitama",
                    600.0,
                    60.0,
                    500.0,
                ),
                road_contract(
                    "Pavimentos del Centro S.A.",
                    "INVÍAS",
                    400.0,
                    100.0,
                    150.0,
                ),
            ],
            rup_renewal_date: None,
        },
    };

    let mut unsupported = road_contract(
        "Obras Civiles del Sur",
        "Constructora Privada El Roble",
        300.0,
        100.0,
        700.0,
    );
    unsupported.contract_type = ContractType::Private;
    unsupported.contract_complies = false;
    unsupported.non_compliance_reason = Some("Certificación sin acta de liquidación".to_string());
    let obras = DemoBidder {
        registration: ProponentRegistration {
            name: "Obras Civiles del Sur".to_string(),
            rup_renewal_date: Some(days_before(closing_date, 60)),
            ..ProponentRegistration::default()
        },
        scoring: ScoringUpdate {
            scoring: Scoring {
                mipyme: 0.25,
                national_industry_support: 20.0,
                ..Scoring::default()
            },
            partners: None,
        },
        verification: VerificationUpdate {
            requirements: verified_requirements(false),
            contractors: vec![unsupported],
            rup_renewal_date: None,
        },
    };

    vec![andina, consortium, obras]
}
