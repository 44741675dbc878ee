//! End-to-end turns through the public engine API.

use zen_suggest::suggest::{ActivityDomain, EnergyRequirement, SelectionTier, SuggestionEngine};
use zen_suggest::{AffectReading, ConversationContext, Language};

const NOON: u32 = 12;

fn engine() -> SuggestionEngine {
    SuggestionEngine::new().expect("built-in resources must load")
}

#[test]
fn sleepless_anxious_user_gets_a_low_effort_calming_activity() {
    let e = engine();
    let message = "Tôi không ngủ được mấy ngày nay, lo quá";
    let affect = AffectReading::new("anxious", 3);
    let mut ctx = ConversationContext {
        turn_count: 4,
        ..Default::default()
    };

    let needs = e.compute_needs(message, &affect, NOON);
    assert!(needs.calming > 0.5, "calming {}", needs.calming);
    assert!(needs.urgency > 0.5, "urgency {}", needs.urgency);

    let payload = e
        .suggest_activity_at(&affect, message, Language::Vi, &mut ctx, NOON)
        .expect("a calming activity should be chosen");
    let chosen = e.catalog().get(&payload.activity_id).unwrap();
    assert!(matches!(
        chosen.energy_required,
        EnergyRequirement::Low | EnergyRequirement::VeryLow
    ));
    assert!(chosen.commitment_level <= 2);
    assert_eq!(payload.tier, SelectionTier::NeedBased);
    assert!(ctx.has_suggested_in_session);
}

#[test]
fn agreeing_to_offered_music_continues_the_offer() {
    let e = engine();
    let mut ctx = ConversationContext {
        turn_count: 5,
        last_assistant_message: "Hay là mình nghe một chút nhạc nhẹ nhé?".to_string(),
        ..Default::default()
    };

    assert!(e.should_suggest(
        "yes",
        &AffectReading::neutral(),
        ctx.turn_count,
        &ctx.last_assistant_message,
        &ctx,
    ));
    let payload = e
        .suggest_activity_at(&AffectReading::neutral(), "yes", Language::En, &mut ctx, NOON)
        .expect("continuation should select music");
    assert_eq!(payload.tier, SelectionTier::ContinuationOfOffer);
    let chosen = e.catalog().get(&payload.activity_id).unwrap();
    assert_eq!(chosen.domain, Some(ActivityDomain::Music));
}

#[test]
fn bare_refusal_without_invitation_is_not_eligible() {
    let e = engine();
    let ctx = ConversationContext {
        turn_count: 2,
        last_assistant_message: "Hôm nay của bạn thế nào?".to_string(),
        ..Default::default()
    };
    assert!(!e.should_suggest(
        "không",
        &AffectReading::neutral(),
        ctx.turn_count,
        &ctx.last_assistant_message,
        &ctx,
    ));
}

#[test]
fn casual_yes_to_a_breathing_offer_is_eligible() {
    let e = engine();
    let offer = "Bạn có muốn thử một bài tập thở không?";
    let ctx = ConversationContext {
        turn_count: 3,
        last_assistant_message: offer.to_string(),
        ..Default::default()
    };
    let affect = AffectReading::neutral();
    let replies = ["ừ, không sao", "ok, thử xem được không", "yes, why not", "sure, I don't mind"];
    for reply in replies {
        assert!(
            e.should_suggest(reply, &affect, ctx.turn_count, offer, &ctx),
            "{:?} should count as agreement",
            reply
        );
    }
    assert!(!e.should_suggest("thôi, để sau nhé", &affect, ctx.turn_count, offer, &ctx));
}

#[test]
fn explicit_request_overrides_session_exhaustion() {
    let e = engine();
    let mut ctx = ConversationContext {
        turn_count: 6,
        has_suggested_in_session: true,
        suggested_activities: vec!["breathing_478".to_string()],
        ..Default::default()
    };
    let affect = AffectReading::neutral();

    assert!(e.should_suggest("nhạc", &affect, ctx.turn_count, "", &ctx));
    let payload = e
        .suggest_activity_at(&affect, "nhạc", Language::Vi, &mut ctx, NOON)
        .expect("explicit music request");
    let chosen = e.catalog().get(&payload.activity_id).unwrap();
    assert_eq!(chosen.domain, Some(ActivityDomain::Music));
    assert_eq!(ctx.suggested_activities.len(), 2);
}

#[test]
fn too_early_blocks_everything() {
    let e = engine();
    let ctx = ConversationContext::default();
    let affect = AffectReading::new("anxious", 2);
    let offer = "Bạn có muốn thử không?";
    for message in ["nhạc", "breathing", "yes", "", "khó thở quá"] {
        for turn in [0, 1] {
            assert!(
                !e.should_suggest(message, &affect, turn, offer, &ctx),
                "turn {} message {:?} should be too early",
                turn,
                message
            );
        }
    }
}

#[test]
fn need_based_suggestion_exhausts_the_session() {
    let e = engine();
    let offer = "Bạn có muốn thử một bài tập nhỏ không?";
    let mut ctx = ConversationContext {
        turn_count: 3,
        last_assistant_message: offer.to_string(),
        ..Default::default()
    };
    let affect = AffectReading::new("stressed", 3);

    assert!(e.should_suggest("ừ", &affect, ctx.turn_count, offer, &ctx));
    let first = e
        .suggest_activity_at(&affect, "ừ", Language::Vi, &mut ctx, NOON)
        .expect("stressed user should get something");
    assert_eq!(first.tier, SelectionTier::NeedBased);

    // Same offer/agreement pairing again: the session is exhausted
    ctx.record_user_turn();
    assert!(!e.should_suggest("ừ", &affect, ctx.turn_count, offer, &ctx));
}

#[test]
fn explicit_and_continuation_tiers_are_deterministic() {
    let e = engine();
    let run = |message: &str, last: &str| {
        let mut ctx = ConversationContext {
            turn_count: 5,
            last_assistant_message: last.to_string(),
            ..Default::default()
        };
        e.suggest_activity_at(&AffectReading::neutral(), message, Language::Vi, &mut ctx, NOON)
            .map(|p| p.activity_id)
    };
    assert_eq!(run("hít thở", ""), run("hít thở", ""));
    assert_eq!(
        run("ok", "Would you like to try some journaling?"),
        run("ok", "Would you like to try some journaling?")
    );
    assert_eq!(
        run("ok", "Would you like to try some journaling?").as_deref(),
        Some("journaling")
    );
}

#[test]
fn repeated_need_based_turns_rotate_activities() {
    let e = engine();
    let affect = AffectReading::new("anxious", 3);
    let message = "mình thấy khó thở";
    let mut ctx = ConversationContext {
        turn_count: 8,
        ..Default::default()
    };

    let first = e
        .suggest_activity_at(&affect, message, Language::En, &mut ctx, NOON)
        .unwrap();
    let second = e
        .suggest_activity_at(&affect, message, Language::En, &mut ctx, NOON)
        .unwrap();
    assert_ne!(first.activity_id, second.activity_id, "recency penalty should rotate");
}

#[test]
fn malformed_affect_fails_open() {
    let e = engine();
    let affect = AffectReading::from_model_output("sorry, I can't analyze that");
    let mut ctx = ConversationContext {
        turn_count: 6,
        ..Default::default()
    };
    assert!(e
        .suggest_activity_at(&affect, "", Language::Vi, &mut ctx, NOON)
        .is_none());
}
