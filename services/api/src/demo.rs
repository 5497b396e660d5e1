use crate::infra::{build_service, clock_for, IntelligenceService};
use chrono::{Local, NaiveDate};
use clap::Args;
use lead_intel::config::AppConfig;
use lead_intel::error::AppError;
use lead_intel::workflows::intelligence::{
    Lead, LeadId, LeadMetadata, ScoringFactorsPatch, UnassignedReason,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Signal seed for ratings, traffic, and market figures (defaults to the configured seed).
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Reference date driving the demand calendar (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Postcode dataset (postcode,lat,lng,municipality,region) replacing the built-in table.
    #[arg(long)]
    pub(crate) postcodes_csv: Option<PathBuf>,
    /// Provider directory (id,name,categories,lat,lng) replacing the fixture providers.
    #[arg(long)]
    pub(crate) providers_csv: Option<PathBuf>,
    /// Print the full geographic analysis for every lead as JSON.
    #[arg(long)]
    pub(crate) verbose: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        seed,
        today,
        postcodes_csv,
        providers_csv,
        verbose,
    } = args;

    let mut config = AppConfig::load()?.intelligence;
    if let Some(seed) = seed {
        config.signal_seed = seed;
    }
    if postcodes_csv.is_some() {
        config.postcodes_csv = postcodes_csv;
    }
    if providers_csv.is_some() {
        config.providers_csv = providers_csv;
    }

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let service = build_service(&config, Arc::new(clock_for(today)))?;
    let leads = demo_leads();

    println!("Lead intelligence demo ({today}, seed {})", config.signal_seed);
    render_scores(&service, &leads);
    render_analyses(&service, &leads, verbose);
    render_distribution(&service, &leads);

    Ok(())
}

fn render_scores(service: &IntelligenceService, leads: &[Lead]) {
    let report = service.bulk_calculate_scores(leads);

    println!("\nLead scores");
    for score in &report.scored {
        println!(
            "- {}: total {} ({}) | behavioral {} | demographic {} | engagement {} | quality {}",
            score.lead_id,
            score.total_score,
            score.range().label(),
            score.behavioral_score,
            score.demographic_score,
            score.engagement_score,
            score.quality_score
        );
        println!(
            "  {:.0}% conversion likelihood | estimated value NOK {}",
            score.conversion_probability * 100.0,
            score.value_estimate
        );
    }
    for failure in &report.failed {
        println!("- {}: not scored ({})", failure.lead_id, failure.error);
    }
}

fn render_analyses(service: &IntelligenceService, leads: &[Lead], verbose: bool) {
    println!("\nGeographic coverage");
    for lead in leads {
        let analysis = match service.analyze(lead) {
            Ok(analysis) => analysis,
            Err(err) => {
                println!("- {}: analysis unavailable ({})", lead.id, err);
                continue;
            }
        };

        let location = &analysis.customer_location;
        let travel = &analysis.travel_time_analysis;
        println!(
            "- {} in {} ({}, {}): {} providers in range | nearest {} | access {:?}",
            lead.id,
            location.postcode,
            location.municipality,
            location.region,
            analysis.coverage.len(),
            travel
                .nearest_provider_minutes
                .map(|minutes| format!("{minutes} min"))
                .unwrap_or_else(|| "n/a".to_string()),
            travel.accessibility_rating
        );
        for entry in &analysis.coverage {
            println!(
                "    - {} | {:.1} km | coverage {:.0} | {} min | rating {:.1} | {}",
                entry.provider_name,
                entry.distance_km,
                entry.coverage_score,
                entry.travel_time_minutes,
                entry.rating,
                entry.availability.label()
            );
        }
        println!(
            "    demand {} ({:?} season) | price multiplier {:.2}",
            analysis.market_demand.area_demand_score,
            analysis.market_demand.seasonal_trend,
            analysis.regional_pricing.base_price_multiplier
        );

        if verbose {
            match serde_json::to_string_pretty(&analysis) {
                Ok(json) => println!("{json}"),
                Err(err) => println!("    analysis payload unavailable: {err}"),
            }
        }
    }
}

fn render_distribution(service: &IntelligenceService, leads: &[Lead]) {
    let outcome = service.optimize_distribution(leads);

    println!("\nDistribution");
    for (provider, assigned) in &outcome.assignments {
        let ids: Vec<&str> = assigned.iter().map(|id| id.0.as_str()).collect();
        println!("- {} <- {}", provider, ids.join(", "));
    }
    for entry in &outcome.unassigned {
        let reason = match &entry.reason {
            UnassignedReason::AnalysisFailed(detail) => detail.as_str(),
            UnassignedReason::NoAvailableProvider => "no available provider in range",
        };
        println!("- {} unassigned: {}", entry.lead_id, reason);
    }
}

pub(crate) fn demo_leads() -> Vec<Lead> {
    let lead = |id: &str, title: &str, description: &str, category: &str, postcode: Option<&str>| {
        Lead {
            id: LeadId(id.to_string()),
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            metadata: LeadMetadata {
                postcode: postcode.map(str::to_string),
                analytics: None,
            },
        }
    };

    let mut engaged = lead(
        "lead-oslo-bad",
        "Nytt bad i leilighet",
        "Totalrenovering av bad, ønsker befaring snarest.",
        "rørlegging",
        Some("0150"),
    );
    engaged.metadata.analytics = Some(ScoringFactorsPatch {
        page_views: Some(14.0),
        time_on_site: Some(540.0),
        email_engagement: Some(0.9),
        budget_indicator: Some(0.85),
        urgency_level: Some(0.9),
        response_time: Some(0.5),
        ..ScoringFactorsPatch::default()
    });

    vec![
        engaged,
        lead(
            "lead-bergen-tak",
            "Lekkasje i taket",
            "Takstein har løsnet etter storm.",
            "tak",
            Some("5020"),
        ),
        lead(
            "lead-trondheim-maling",
            "Maling av enebolig",
            "Utvendig maling, ca 180 kvm. Adresse 7030 Trondheim.",
            "maling",
            None,
        ),
        lead(
            "lead-tromso-bygg",
            "Tilbygg",
            "Ønsker pris på tilbygg til hytte.",
            "bygg",
            Some("9010"),
        ),
        lead(
            "lead-ukjent",
            "Elektriker trengs",
            "Sikringsskap må byttes.",
            "elektro",
            None,
        ),
    ]
}
