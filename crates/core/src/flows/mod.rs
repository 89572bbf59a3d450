pub mod engine;
pub mod states;

pub use engine::{advance, can_search, derive_stage, missing_info, next_action, required_fields};
pub use states::{
    ConversationFlow, ConversationStage, FlowContext, NextAction, TripField, TurnRecord,
};
