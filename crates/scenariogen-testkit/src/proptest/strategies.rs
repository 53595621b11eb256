use proptest::prelude::*;

/// Fragments that show up in real backend replies, glued together in any order.
pub fn strategy_raw_generation() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("```gherkin\n".to_string()),
        Just("```Gherkin\n".to_string()),
        Just("```\n".to_string()),
        Just("```dart\n".to_string()),
        Just("**Scenario 1: Login**\n".to_string()),
        Just("**Scenario**".to_string()),
        Just("Scenario 2: Checkout\n".to_string()),
        Just("Scenario:".to_string()),
        Just("Feature: Cart\n".to_string()),
        Just("  Given a signed in user\n".to_string()),
        Just("*".to_string()),
        Just("`".to_string()),
        "[a-zA-Z0-9 :*`\n]{0,16}",
    ];
    prop::collection::vec(fragment, 0..12).prop_map(|parts| parts.concat())
}

/// Short English-ish requirement sentences, with punctuation.
pub fn strategy_requirement() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ,.!?'-]{0,60}"
}

/// Squad names as people type them.
pub fn strategy_squad_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 _-]{0,20}"
}

/// One tag, with or without leading `@`s.
pub fn strategy_tag_token() -> impl Strategy<Value = String> {
    "@{0,2}[A-Za-z0-9_-]{1,10}"
}
