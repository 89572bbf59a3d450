//! Stage derivation and the next-action policy.
//!
//! Both are pure functions of the conversation state, re-evaluated from
//! scratch every turn rather than patched incrementally. The derivation
//! order and the policy's priority order are load-bearing contracts.

use tracing::debug;

use crate::domain::trip::{CollectedInfo, ServiceType};
use crate::flows::states::{ConversationFlow, ConversationStage, NextAction, TripField};

/// Ordered required-field set for a service type. The order doubles as the
/// question order: `missing_info` preserves it and `next_question` is its
/// head.
pub fn required_fields(service_type: ServiceType) -> &'static [TripField] {
    use TripField::{Adults, DepartureDate, Destination, Origin, ReturnDate};

    match service_type {
        ServiceType::Flight => &[Origin, Destination, DepartureDate, Adults],
        ServiceType::Hotel => &[Destination, DepartureDate, ReturnDate, Adults],
        ServiceType::Package => &[Origin, Destination, DepartureDate, ReturnDate, Adults],
        ServiceType::Undecided => &[],
    }
}

fn field_present(info: &CollectedInfo, field: TripField) -> bool {
    match field {
        TripField::ServiceType => {
            matches!(
                info.service_type,
                Some(ServiceType::Flight | ServiceType::Hotel | ServiceType::Package)
            )
        }
        TripField::Origin => info.origin.is_some(),
        TripField::Destination => info.destination.is_some(),
        TripField::DepartureDate => info.departure_date().is_some(),
        TripField::ReturnDate => info.return_date().is_some(),
        TripField::Adults => info.has_adults(),
    }
}

/// Ordered list of fields still required before a search can run. While
/// the service type is unknown (or explicitly undecided) it is the only
/// missing field: there is no point asking for dates before knowing what
/// to search.
pub fn missing_info(info: &CollectedInfo) -> Vec<TripField> {
    let service_type = match info.service_type {
        Some(service_type) if service_type != ServiceType::Undecided => service_type,
        _ => return vec![TripField::ServiceType],
    };

    required_fields(service_type)
        .iter()
        .copied()
        .filter(|field| !field_present(info, *field))
        .collect()
}

/// True once every service-specific required field is present.
pub fn can_search(info: &CollectedInfo) -> bool {
    match info.service_type {
        Some(service_type) if service_type != ServiceType::Undecided => {
            required_fields(service_type).iter().all(|field| field_present(info, *field))
        }
        _ => false,
    }
}

/// Derive the current stage. Evaluation order matters: the first matching
/// rule wins, and clarifying states preempt forward progress.
pub fn derive_stage(flow: &ConversationFlow) -> ConversationStage {
    if flow.is_completed() {
        return ConversationStage::Completed;
    }
    if flow.context.needs_assistance {
        return ConversationStage::AssistanceNeeded;
    }
    if flow.context.awaiting_confirmation {
        return ConversationStage::Confirming;
    }

    let info = &flow.collected_info;
    if info.is_empty() {
        return ConversationStage::Greeting;
    }
    if flow.context.selected_option.is_some() {
        return ConversationStage::Booking;
    }
    if flow.context.options_presented {
        return ConversationStage::GuidingDecision;
    }
    if can_search(info) {
        return if flow.context.search_attempted {
            ConversationStage::PresentingOptions
        } else {
            ConversationStage::Searching
        };
    }
    let service_known = matches!(
        info.service_type,
        Some(ServiceType::Flight | ServiceType::Hotel | ServiceType::Package)
    );
    if service_known && info.destination.is_some() {
        return ConversationStage::GatheringDetails;
    }
    ConversationStage::Discovery
}

/// Map (stage, flags) to the agent's single next move. Strict priority
/// order; clarification always wins so a confused user is never pushed
/// into a search or booking step.
pub fn next_action(flow: &ConversationFlow, stage: ConversationStage) -> NextAction {
    if flow.context.needs_clarification || flow.context.user_seems_unsure {
        return NextAction::Clarify;
    }
    if matches!(stage, ConversationStage::Confirming | ConversationStage::Booking) {
        return NextAction::Book;
    }
    if matches!(stage, ConversationStage::PresentingOptions | ConversationStage::GuidingDecision) {
        return NextAction::Guide;
    }
    if can_search(&flow.collected_info) && !flow.context.search_attempted {
        return NextAction::Search;
    }
    if flow.context.search_attempted && !flow.context.options_presented {
        return NextAction::Present;
    }
    NextAction::AskQuestion
}

/// Merge one turn's extracted fields into the flow and rebuild every
/// derived field from the merged base state.
pub fn advance(mut flow: ConversationFlow, extracted: CollectedInfo) -> ConversationFlow {
    flow.collected_info.merge(extracted);

    let stage = derive_stage(&flow);
    let action = next_action(&flow, stage);
    let missing = missing_info(&flow.collected_info);

    debug!(
        event_name = "flow.turn_recomputed",
        stage = ?stage,
        action = ?action,
        missing_fields = missing.len(),
        "conversation flow recomputed"
    );

    flow.next_question = missing.first().copied();
    flow.missing_info = missing;
    flow.current_stage = Some(stage);
    flow.suggested_action = Some(action);
    flow
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::domain::trip::{CollectedInfo, ServiceType, TripDates, Travelers};
    use crate::flows::engine::{advance, can_search, derive_stage, missing_info, next_action};
    use crate::flows::states::{ConversationFlow, ConversationStage, NextAction, TripField};

    fn date(text: &str) -> NaiveDate {
        text.parse().expect("valid date literal")
    }

    fn flight_ready_info() -> CollectedInfo {
        CollectedInfo {
            service_type: Some(ServiceType::Flight),
            origin: Some("JFK".to_owned()),
            destination: Some("LON".to_owned()),
            dates: Some(TripDates { departure: Some(date("2025-06-01")), ..TripDates::default() }),
            travelers: Some(Travelers { adults: 1, children: 0, infants: 0 }),
            ..CollectedInfo::default()
        }
    }

    #[test]
    fn empty_conversation_stays_in_greeting() {
        let flow = ConversationFlow::begin();
        assert_eq!(derive_stage(&flow), ConversationStage::Greeting);
        assert_eq!(next_action(&flow, ConversationStage::Greeting), NextAction::AskQuestion);
    }

    #[test]
    fn complete_flight_info_moves_to_searching_with_search_action() {
        let flow = advance(ConversationFlow::begin(), flight_ready_info());

        assert_eq!(flow.current_stage, Some(ConversationStage::Searching));
        assert_eq!(flow.suggested_action, Some(NextAction::Search));
        assert!(flow.missing_info.is_empty());
        assert_eq!(flow.next_question, None);
    }

    #[test]
    fn search_attempted_moves_to_presenting_options() {
        let mut flow = ConversationFlow::begin();
        flow.context.search_attempted = true;
        let flow = advance(flow, flight_ready_info());

        assert_eq!(flow.current_stage, Some(ConversationStage::PresentingOptions));
        assert_eq!(flow.suggested_action, Some(NextAction::Guide));
    }

    #[test]
    fn selected_option_outranks_presented_options() {
        let mut flow = ConversationFlow::begin();
        flow.context.search_attempted = true;
        flow.context.options_presented = true;
        flow.context.selected_option = Some("fare-2".to_owned());
        let flow = advance(flow, flight_ready_info());

        assert_eq!(flow.current_stage, Some(ConversationStage::Booking));
        assert_eq!(flow.suggested_action, Some(NextAction::Book));
    }

    #[test]
    fn hotel_requires_return_date_before_search() {
        let info = CollectedInfo {
            service_type: Some(ServiceType::Hotel),
            destination: Some("Bali".to_owned()),
            dates: Some(TripDates { departure: Some(date("2025-07-01")), ..TripDates::default() }),
            travelers: Some(Travelers { adults: 2, children: 0, infants: 0 }),
            ..CollectedInfo::default()
        };

        assert!(!can_search(&info));
        assert_eq!(missing_info(&info), vec![TripField::ReturnDate]);
    }

    #[test]
    fn unknown_service_type_asks_for_it_first() {
        let info = CollectedInfo {
            destination: Some("Tokyo".to_owned()),
            origin: Some("SFO".to_owned()),
            ..CollectedInfo::default()
        };

        assert_eq!(missing_info(&info), vec![TripField::ServiceType]);
        assert!(!can_search(&info));
    }

    #[test]
    fn undecided_service_type_counts_as_unknown() {
        let info = CollectedInfo {
            service_type: Some(ServiceType::Undecided),
            destination: Some("Tokyo".to_owned()),
            ..CollectedInfo::default()
        };
        let flow = advance(ConversationFlow::begin(), info);

        // Destination alone is not gathering-details while the product is open.
        assert_eq!(flow.current_stage, Some(ConversationStage::Discovery));
        assert_eq!(flow.next_question, Some(TripField::ServiceType));
    }

    #[test]
    fn service_and_destination_without_search_readiness_is_gathering_details() {
        let info = CollectedInfo {
            service_type: Some(ServiceType::Flight),
            destination: Some("LON".to_owned()),
            ..CollectedInfo::default()
        };
        let flow = advance(ConversationFlow::begin(), info);

        assert_eq!(flow.current_stage, Some(ConversationStage::GatheringDetails));
        assert_eq!(flow.next_question, Some(TripField::Origin));
    }

    #[test]
    fn assistance_signal_overrides_every_derived_stage() {
        let mut flow = ConversationFlow::begin();
        flow.context.needs_assistance = true;
        flow.context.search_attempted = true;
        flow.context.options_presented = true;
        let flow = advance(flow, flight_ready_info());

        assert_eq!(flow.current_stage, Some(ConversationStage::AssistanceNeeded));
    }

    #[test]
    fn completion_is_sticky_and_never_rederived_away() {
        let mut flow = advance(ConversationFlow::begin(), flight_ready_info());
        flow.mark_completed();
        let flow = advance(flow, CollectedInfo::default());

        assert_eq!(flow.current_stage, Some(ConversationStage::Completed));
    }

    #[test]
    fn clarification_preempts_for_every_flag_combination() {
        // needs_clarification or user_seems_unsure must yield Clarify no
        // matter how the remaining flags are set. Exhaustive over the six
        // boolean-ish context inputs.
        for bits in 0u32..64 {
            let mut flow = advance(ConversationFlow::begin(), flight_ready_info());
            flow.context.needs_clarification = bits & 1 != 0;
            flow.context.user_seems_unsure = bits & 2 != 0;
            flow.context.search_attempted = bits & 4 != 0;
            flow.context.options_presented = bits & 8 != 0;
            flow.context.selected_option =
                (bits & 16 != 0).then(|| "fare-1".to_owned());
            flow.context.awaiting_confirmation = bits & 32 != 0;

            let stage = derive_stage(&flow);
            let action = next_action(&flow, stage);

            if flow.context.needs_clarification || flow.context.user_seems_unsure {
                assert_eq!(action, NextAction::Clarify, "flag bits {bits:#08b}");
            } else {
                assert_ne!(action, NextAction::Clarify, "flag bits {bits:#08b}");
            }
        }
    }

    #[test]
    fn present_action_follows_search_until_options_are_shown() {
        let mut flow = ConversationFlow::begin();
        flow.context.search_attempted = true;
        // Search ran but info is no longer sufficient for the presenting
        // stage (e.g. hotel without return date): policy still says present.
        let info = CollectedInfo {
            service_type: Some(ServiceType::Hotel),
            destination: Some("Bali".to_owned()),
            ..CollectedInfo::default()
        };
        let flow = advance(flow, info);

        assert_eq!(flow.suggested_action, Some(NextAction::Present));
    }
}
