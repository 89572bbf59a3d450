//! End-to-end turn pipeline checks over the public API.

use chrono::{Duration, TimeZone, Utc};
use tripflow_core::{
    CollectedInfo, ConversationFlow, ConversationStage, DecisionEngine, DetectorContext,
    DetectorError, Engagement, EngineConfig, NextAction, ServiceType, SessionView, Suggestion,
    SuggestionDetector, SuggestionKind, SuggestionPriority, SuggestionStage, TimingContext,
    TripDates, TripField, Travelers,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
}

fn detector_ctx(stage: SuggestionStage, engagement: Engagement) -> DetectorContext {
    DetectorContext::new(SessionView::new(stage, engagement), now())
}

fn active_timing(stage: SuggestionStage, engagement: Engagement) -> TimingContext {
    let mut timing = TimingContext::new(stage, engagement);
    timing.last_user_message = Some(now() - Duration::seconds(5));
    timing
}

fn static_detector(
    name: &'static str,
    suggestions: Vec<Suggestion>,
) -> Box<dyn SuggestionDetector> {
    Box::new((name, move |_: &DetectorContext| -> Result<Vec<Suggestion>, DetectorError> {
        Ok(suggestions.clone())
    }))
}

#[test]
fn flight_booking_conversation_progresses_turn_by_turn() {
    init_logging();
    let engine = DecisionEngine::new(EngineConfig::default(), Vec::new());
    let ctx = detector_ctx(SuggestionStage::Search, Engagement::Medium);
    let timing = active_timing(SuggestionStage::Search, Engagement::Medium);

    // Turn 1: nothing extracted yet.
    let outcome =
        engine.run_turn(ConversationFlow::begin(), CollectedInfo::default(), &ctx, &timing);
    assert_eq!(outcome.flow.current_stage, Some(ConversationStage::Greeting));
    assert_eq!(outcome.action, NextAction::AskQuestion);
    assert_eq!(outcome.next_question, Some(TripField::ServiceType));

    // Turn 2: the user wants a flight to London.
    let extracted = CollectedInfo {
        service_type: Some(ServiceType::Flight),
        destination: Some("LON".to_owned()),
        ..CollectedInfo::default()
    };
    let outcome = engine.run_turn(outcome.flow, extracted, &ctx, &timing);
    assert_eq!(outcome.flow.current_stage, Some(ConversationStage::GatheringDetails));
    assert_eq!(outcome.next_question, Some(TripField::Origin));

    // Turn 3: origin, date and travelers arrive together.
    let extracted = CollectedInfo {
        origin: Some("JFK".to_owned()),
        dates: Some(TripDates {
            departure: Some("2025-06-01".parse().expect("valid date")),
            ..TripDates::default()
        }),
        travelers: Some(Travelers { adults: 2, children: 0, infants: 0 }),
        ..CollectedInfo::default()
    };
    let outcome = engine.run_turn(outcome.flow, extracted, &ctx, &timing);
    assert_eq!(outcome.flow.current_stage, Some(ConversationStage::Searching));
    assert_eq!(outcome.action, NextAction::Search);
    assert!(outcome.flow.missing_info.is_empty());

    // Turn 4: the search ran; options go out and guidance begins.
    let mut flow = outcome.flow;
    flow.context.search_attempted = true;
    let outcome = engine.run_turn(flow, CollectedInfo::default(), &ctx, &timing);
    assert_eq!(outcome.flow.current_stage, Some(ConversationStage::PresentingOptions));
    assert_eq!(outcome.action, NextAction::Guide);
}

#[test]
fn delivered_suggestions_never_exceed_gate_cap_or_group_shape() {
    let candidates: Vec<Suggestion> = (0..8)
        .map(|n| {
            Suggestion::new(
                format!("deal-{n}"),
                SuggestionKind::DealAlert,
                SuggestionPriority::Medium,
                "msg",
            )
        })
        .collect();
    let engine = DecisionEngine::new(
        EngineConfig::default(),
        vec![static_detector("deals", candidates)],
    );

    // Results stage at high engagement admits up to 4; grouping holds the
    // final shape to one primary plus two secondary.
    let outcome = engine.run_turn(
        ConversationFlow::begin(),
        CollectedInfo::default(),
        &detector_ctx(SuggestionStage::Results, Engagement::High),
        &active_timing(SuggestionStage::Results, Engagement::High),
    );

    assert_eq!(outcome.timing.max_suggestions, 4);
    assert!(outcome.suggestions.len() <= 3);
    assert!(outcome.suggestions.primary.is_none());
    assert_eq!(outcome.suggestions.secondary.len(), 2);
}

#[test]
fn expired_candidates_never_surface() {
    let expired = Suggestion::new(
        "flash-gone",
        SuggestionKind::DealAlert,
        SuggestionPriority::High,
        "msg",
    )
    .with_expires_at(now() - Duration::minutes(1));
    let engine = DecisionEngine::new(
        EngineConfig::default(),
        vec![static_detector("deals", vec![expired])],
    );

    let outcome = engine.run_turn(
        ConversationFlow::begin(),
        CollectedInfo::default(),
        &detector_ctx(SuggestionStage::Results, Engagement::High),
        &active_timing(SuggestionStage::Results, Engagement::High),
    );

    assert!(outcome.timing.should_suggest);
    assert!(outcome.suggestions.is_empty());
}

#[test]
fn high_priority_expiring_saver_becomes_the_primary() {
    let a = Suggestion::new("A", SuggestionKind::DealAlert, SuggestionPriority::High, "a")
        .with_savings_amount(300.0)
        .with_expires_at(now() + Duration::minutes(30));
    let b = Suggestion::new("B", SuggestionKind::DealAlert, SuggestionPriority::Medium, "b");
    let engine = DecisionEngine::new(
        EngineConfig::default(),
        vec![static_detector("deals", vec![b, a])],
    );

    let outcome = engine.run_turn(
        ConversationFlow::begin(),
        CollectedInfo::default(),
        &detector_ctx(SuggestionStage::Results, Engagement::Medium),
        &active_timing(SuggestionStage::Results, Engagement::Medium),
    );

    assert_eq!(
        outcome.suggestions.primary.as_ref().map(|s| s.id.as_str()),
        Some("A")
    );
    assert_eq!(outcome.suggestions.secondary.len(), 1);
    assert_eq!(outcome.suggestions.secondary[0].id.as_str(), "B");
}

#[test]
fn duplicate_ids_across_detectors_collapse_to_one() {
    let duplicate = Suggestion::new(
        "same-opportunity",
        SuggestionKind::CostSaving,
        SuggestionPriority::Medium,
        "msg",
    );
    let engine = DecisionEngine::new(
        EngineConfig::default(),
        vec![
            static_detector("first", vec![duplicate.clone()]),
            static_detector("second", vec![duplicate]),
        ],
    );

    let outcome = engine.run_turn(
        ConversationFlow::begin(),
        CollectedInfo::default(),
        &detector_ctx(SuggestionStage::Results, Engagement::High),
        &active_timing(SuggestionStage::Results, Engagement::High),
    );

    assert_eq!(outcome.suggestions.len(), 1);
}
