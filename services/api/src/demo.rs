use crate::infra::{default_analyzer, parse_date, parse_policy, InMemoryChallengeRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use couplefit::config::{AppConfig, ChallengeConfig, DiningConfig};
use couplefit::error::AppError;
use couplefit::workflows::challenge::{
    ChallengeScoreInput, ChallengeServiceError, ChallengeWinner, CoupleChallengeService,
    InputPolicy, JudgeRequest, NewChallenge, ParticipantEvidence, ParticipantSlot, PhotoPair,
    PhotoPayload, ProgressUpdate, ScoreBreakdown, ScoreRequest, ScoringEngine,
    TransformationAnalysis,
};
use couplefit::workflows::dining::{
    CatalogueSearch, GeoPoint, NearbyRequest, PlaceCandidate, RankedCandidate, RestaurantFinder,
};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

const SAMPLE_PLACES: &str = "\
name,latitude,longitude,rating,price_level,cuisine,address
Osteria Lume,40.7306,-73.9866,4.7,3,italian,14 E 13th St
Harbor Lights,40.7033,-74.0170,4.4,4,seafood,1 Battery Pl
Sakura Table,40.7265,-73.9815,4.6,2,japanese,77 Ave A
Candle & Crust,40.7580,-73.9855,4.1,2,pizza,1501 Broadway
Garden Terrace,40.7794,-73.9632,4.8,4,french,960 5th Ave
";

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Transformation score for participant A (0-100)
    #[arg(long)]
    pub(crate) score_a: f64,
    /// Transformation quality for participant A (0-10)
    #[arg(long)]
    pub(crate) quality_a: f64,
    #[arg(long, default_value_t = 0)]
    pub(crate) points_a: u32,
    #[arg(long, default_value_t = 0)]
    pub(crate) days_a: u32,
    /// Transformation score for participant B (0-100)
    #[arg(long)]
    pub(crate) score_b: f64,
    /// Transformation quality for participant B (0-10)
    #[arg(long)]
    pub(crate) quality_b: f64,
    #[arg(long, default_value_t = 0)]
    pub(crate) points_b: u32,
    #[arg(long, default_value_t = 0)]
    pub(crate) days_b: u32,
    /// Length of the challenge in days
    #[arg(long)]
    pub(crate) total_days: u32,
    /// How out-of-range inputs are handled: clamp or reject (defaults to COUPLEFIT_INPUT_POLICY)
    #[arg(long, value_parser = parse_policy)]
    pub(crate) policy: Option<InputPolicy>,
    /// Print the verdict as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct NearbyArgs {
    /// Places CSV export (name,latitude,longitude,rating,price_level,cuisine,address)
    #[arg(long)]
    pub(crate) catalogue: PathBuf,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) lon: f64,
    /// Search radius in kilometres (defaults to COUPLEFIT_SEARCH_RADIUS_KM)
    #[arg(long)]
    pub(crate) radius_km: Option<f64>,
    #[arg(long)]
    pub(crate) cuisine: Option<String>,
    /// Maximum number of places to print (defaults to COUPLEFIT_RESULT_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Print the ranking as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Challenge start date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) started_on: Option<NaiveDate>,
    /// Skip the date-night portion of the demo.
    #[arg(long)]
    pub(crate) skip_dining: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let winner = score_verdict(&args, config.challenges.input_policy)?;

    if args.json {
        print_json(&winner)?;
    } else {
        render_verdict(&winner, "A", "B");
    }
    Ok(())
}

fn score_verdict(args: &ScoreArgs, configured: InputPolicy) -> Result<ChallengeWinner, AppError> {
    let request = ScoreRequest {
        analysis_a: TransformationAnalysis {
            transformation_score: args.score_a,
            transformation_quality: args.quality_a,
        },
        analysis_b: TransformationAnalysis {
            transformation_score: args.score_b,
            transformation_quality: args.quality_b,
        },
        input_a: ChallengeScoreInput {
            points: args.points_a,
            consistency_days: args.days_a,
        },
        input_b: ChallengeScoreInput {
            points: args.points_b,
            consistency_days: args.days_b,
        },
        total_challenge_days: args.total_days,
    };

    let prepared = args
        .policy
        .unwrap_or(configured)
        .prepare(request)
        .map_err(ChallengeServiceError::from)?;
    Ok(ScoringEngine::default().judge(&prepared))
}

pub(crate) fn run_nearby(args: NearbyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let ranked = nearby_places(&args, &config.dining)?;

    if args.json {
        print_json(&ranked)?;
    } else {
        render_places(&ranked);
    }
    Ok(())
}

fn nearby_places(
    args: &NearbyArgs,
    dining: &DiningConfig,
) -> Result<Vec<RankedCandidate<PlaceCandidate>>, AppError> {
    let catalogue = CatalogueSearch::from_path(&args.catalogue)?;
    let finder = RestaurantFinder::new(Arc::new(catalogue), dining);
    Ok(finder.nearby(NearbyRequest {
        origin: GeoPoint::new(args.lat, args.lon),
        radius_km: args.radius_km,
        cuisine: args.cuisine.clone(),
        limit: args.limit,
    })?)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        started_on,
        skip_dining,
    } = args;
    let started_on = started_on.unwrap_or_else(|| Local::now().date_naive());

    println!("Couple challenge demo");
    let service = CoupleChallengeService::new(
        Arc::new(InMemoryChallengeRepository::default()),
        Arc::new(default_analyzer()),
        ChallengeConfig::default(),
    );

    let record = service.create(NewChallenge {
        partner_a: "Maya".to_string(),
        partner_b: "Jordan".to_string(),
        total_days: 30,
        started_on,
    })?;
    println!(
        "- Opened {} for {} & {} ({} days from {})",
        record.challenge_id,
        record.participant_a.name,
        record.participant_b.name,
        record.total_days,
        record.started_on
    );

    let workouts = [
        (ParticipantSlot::A, 12, 9),
        (ParticipantSlot::B, 8, 11),
        (ParticipantSlot::A, 18, 11),
        (ParticipantSlot::B, 4, 12),
    ];
    for (participant, points, consistency_days) in workouts {
        service.record_progress(
            &record.challenge_id,
            ProgressUpdate {
                participant,
                points,
                consistency_days,
            },
        )?;
    }

    // Jordan only uploads photos; without a model backend the analysis is neutral.
    let winner = service.judge(
        &record.challenge_id,
        JudgeRequest {
            participant_a: ParticipantEvidence {
                analysis: Some(TransformationAnalysis {
                    transformation_score: 72.0,
                    transformation_quality: 8.0,
                }),
                photos: None,
            },
            participant_b: ParticipantEvidence {
                analysis: None,
                photos: Some(sample_photos()),
            },
        },
    )?;
    let judged = service.get(&record.challenge_id)?;
    render_verdict(
        &winner,
        &judged.participant_a.name,
        &judged.participant_b.name,
    );
    match judged.winner_name() {
        Some(name) => println!("  Winner: {}", name),
        None => println!("  Result: tie"),
    }

    if skip_dining {
        return Ok(());
    }

    println!("\nDate night near Union Square");
    let catalogue = CatalogueSearch::from_reader(Cursor::new(SAMPLE_PLACES))?;
    let finder = RestaurantFinder::new(Arc::new(catalogue), &DiningConfig::default());
    let ranked = finder.nearby(NearbyRequest {
        origin: GeoPoint::new(40.7359, -73.9911),
        radius_km: Some(8.0),
        cuisine: None,
        limit: Some(3),
    })?;
    render_places(&ranked);

    Ok(())
}

fn sample_photos() -> PhotoPair {
    PhotoPair {
        before: PhotoPayload {
            media_type: "image/jpeg".to_string(),
            data: "YmVmb3Jl".to_string(),
        },
        after: PhotoPayload {
            media_type: "image/jpeg".to_string(),
            data: "YWZ0ZXI=".to_string(),
        },
    }
}

fn render_verdict(winner: &ChallengeWinner, name_a: &str, name_b: &str) {
    println!(
        "- Verdict: {} (judged {})",
        winner.winner_id.label(),
        winner.judged_at.format("%Y-%m-%d %H:%M UTC")
    );
    render_breakdown(name_a, winner.score_a, &winner.breakdown_a);
    render_breakdown(name_b, winner.score_b, &winner.breakdown_b);
}

fn render_breakdown(name: &str, total: f64, breakdown: &ScoreBreakdown) {
    println!(
        "  {:<8} {:>6.2} = transformation {:.2} + points {:.2} + consistency {:.2} + goal {:.2}",
        name,
        total,
        breakdown.transformation_score,
        breakdown.points_score,
        breakdown.consistency_score,
        breakdown.goal_score
    );
}

fn render_places(ranked: &[RankedCandidate<PlaceCandidate>]) {
    if ranked.is_empty() {
        println!("  No places found within the search radius");
        return;
    }

    for (index, entry) in ranked.iter().enumerate() {
        let place = &entry.candidate;
        let rating = place
            .rating
            .map(|value| format!("{value:.1}"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  {}. {} ({:.2} km) | {} | rating {}",
            index + 1,
            place.name,
            entry.distance_km,
            place.cuisine.as_deref().unwrap_or("any cuisine"),
            rating
        );
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
