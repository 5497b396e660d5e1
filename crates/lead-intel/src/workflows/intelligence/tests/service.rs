use std::sync::Arc;

use super::common::*;
use crate::workflows::intelligence::repository::ScoreRepository;
use crate::workflows::intelligence::{
    Coordinates, LeadId, LeadIntelligenceError, LeadIntelligenceService, ProviderId,
    RepositoryError, ScoringConfig, ScoringConfigPatch, ScoringError, ScoringFactorsPatch,
};

#[test]
fn calculate_score_persists_latest_snapshot() {
    let (service, repository) = build_service(Vec::new());
    let lead = oslo_lead("lead-1");

    let first = service.calculate_score(&lead, None).expect("scores");
    let boosted = ScoringFactorsPatch {
        urgency_level: Some(1.0),
        ..ScoringFactorsPatch::default()
    };
    let second = service
        .calculate_score(&lead, Some(&boosted))
        .expect("scores");

    assert_ne!(first, second);
    let stored = repository
        .fetch(&lead.id)
        .expect("fetch succeeds")
        .expect("score stored");
    assert_eq!(stored, second);
    assert_eq!(repository.all().expect("list").len(), 1);
}

#[test]
fn scoring_is_idempotent_under_fixed_clock() {
    let (service, _) = build_service(Vec::new());
    let lead = oslo_lead("lead-2");

    let first = service.calculate_score(&lead, None).expect("scores");
    let second = service.calculate_score(&lead, None).expect("scores");

    assert_eq!(first, second);
    assert_eq!(first.calculated_at, now());
}

#[test]
fn invalid_factors_do_not_touch_the_store() {
    let (service, repository) = build_service(Vec::new());
    let lead = oslo_lead("lead-3");
    let invalid = ScoringFactorsPatch {
        email_engagement: Some(-0.2),
        ..ScoringFactorsPatch::default()
    };

    match service.calculate_score(&lead, Some(&invalid)) {
        Err(LeadIntelligenceError::Scoring(ScoringError::InvalidFactors { field, .. })) => {
            assert_eq!(field, "email_engagement");
        }
        other => panic!("expected invalid factors, got {other:?}"),
    }
    assert!(repository.fetch(&lead.id).expect("fetch").is_none());
}

#[test]
fn bulk_scoring_skips_failures_and_keeps_order() {
    let (service, _) = build_service(Vec::new());
    let mut broken = oslo_lead("lead-broken");
    broken.metadata.analytics = Some(ScoringFactorsPatch {
        budget_indicator: Some(2.0),
        ..ScoringFactorsPatch::default()
    });
    let leads = vec![oslo_lead("lead-a"), broken, oslo_lead("lead-b")];

    let report = service.bulk_calculate_scores(&leads);

    let scored: Vec<&str> = report
        .scored
        .iter()
        .map(|score| score.lead_id.0.as_str())
        .collect();
    assert_eq!(scored, vec!["lead-a", "lead-b"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].lead_id, LeadId("lead-broken".to_string()));
    assert!(report.failed[0].error.contains("budget_indicator"));
}

#[test]
fn bulk_scoring_of_nothing_is_empty() {
    let (service, _) = build_service(Vec::new());
    let report = service.bulk_calculate_scores(&[]);
    assert!(report.scored.is_empty());
    assert!(report.failed.is_empty());
}

#[test]
fn stored_score_lookup_reports_missing_leads() {
    let (service, _) = build_service(Vec::new());

    match service.score(&LeadId("missing".to_string())) {
        Err(LeadIntelligenceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn repository_outage_surfaces_from_calculate_score() {
    let service = LeadIntelligenceService::new(
        Arc::new(UnavailableRepository),
        analysis_builder(Vec::new()),
        clock(),
        ScoringConfig::default(),
    );

    match service.calculate_score(&oslo_lead("lead-4"), None) {
        Err(LeadIntelligenceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable repository, got {other:?}"),
    }
}

#[test]
fn config_updates_merge_and_apply_to_new_scores_only() {
    let (service, repository) = build_service(Vec::new());
    let lead = oslo_lead("lead-5");
    let before = service.calculate_score(&lead, None).expect("scores");

    let updated = service.update_config(&ScoringConfigPatch {
        behavioral: Some(1.0),
        demographic: Some(0.0),
        engagement: Some(0.0),
    })
    .expect("valid weights");
    assert_eq!(updated, service.config());
    assert_eq!(updated.behavioral, 1.0);

    let partial = service.update_config(&ScoringConfigPatch {
        engagement: Some(0.5),
        ..ScoringConfigPatch::default()
    })
    .expect("valid weights");
    assert_eq!(partial.behavioral, 1.0);
    assert_eq!(partial.engagement, 0.5);

    let stored = repository.fetch(&lead.id).expect("fetch").expect("stored");
    assert_eq!(stored, before);

    let after = service
        .calculate_score(&oslo_lead("lead-6"), None)
        .expect("scores");
    assert_ne!(after.total_score, before.total_score);
}

#[test]
fn invalid_weight_updates_are_rejected_and_keep_current_weights() {
    let (service, _) = build_service(Vec::new());

    match service.update_config(&ScoringConfigPatch {
        behavioral: Some(-5.0),
        ..ScoringConfigPatch::default()
    }) {
        Err(LeadIntelligenceError::Scoring(ScoringError::InvalidWeight { field, value })) => {
            assert_eq!(field, "behavioral");
            assert_eq!(value, -5.0);
        }
        other => panic!("expected invalid weight, got {other:?}"),
    }

    for weight in [f64::INFINITY, f64::NAN] {
        let result = service.update_config(&ScoringConfigPatch {
            demographic: Some(weight),
            ..ScoringConfigPatch::default()
        });
        assert!(matches!(
            result,
            Err(LeadIntelligenceError::Scoring(ScoringError::InvalidWeight {
                field: "demographic",
                ..
            }))
        ));
    }

    assert_eq!(service.config(), ScoringConfig::default());
}

#[test]
fn optimize_distribution_is_repeatable() {
    let (service, _) = build_service(vec![
        provider_north_of_oslo("p1", 10.0),
        provider_north_of_oslo("p2", 40.0),
    ]);
    let lead = oslo_lead("lead-7");

    let analysis = service.analyze(&lead).expect("oslo resolves");
    assert_eq!(analysis.coverage.len(), 2);

    let outcome = service.optimize_distribution(&[lead.clone()]);
    assert_eq!(
        outcome.assignments.get(&ProviderId("p1".to_string())),
        Some(&vec![lead.id.clone()])
    );
    assert!(outcome.unassigned.is_empty());

    let again = service.optimize_distribution(&[lead]);
    assert_eq!(again, outcome);
}

#[test]
fn distribution_ignores_analyses_made_outside_the_batch() {
    let mut bergen_plumber = provider_north_of_oslo("bergen", 0.0);
    bergen_plumber.location = Some(Coordinates::new(60.3913 + 5.5 / 111.195, 5.3221));
    let (service, _) = build_service(vec![provider_north_of_oslo("oslo", 5.0), bergen_plumber]);

    service
        .analyze(&oslo_lead("lead-moved"))
        .expect("oslo resolves");
    let moved = lead("lead-moved", "rørlegging", Some("5020"));
    let outcome = service.optimize_distribution(&[moved.clone()]);

    assert_eq!(
        outcome.assignments.get(&ProviderId("bergen".to_string())),
        Some(&vec![moved.id.clone()])
    );
    assert!(!outcome
        .assignments
        .contains_key(&ProviderId("oslo".to_string())));
}

#[test]
fn analyze_propagates_geographic_errors() {
    let (service, _) = build_service(Vec::new());
    assert!(matches!(
        service.analyze(&lead("lead-8", "tak", None)),
        Err(LeadIntelligenceError::Analysis(_))
    ));
}
