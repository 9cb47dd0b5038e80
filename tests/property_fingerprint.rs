use inference_cache::domain::fingerprint::{
    Fingerprintable, InferenceRequest, MealPlanRequest, StoryRequest,
};
use proptest::prelude::*;

proptest! {
    /// Property: surrounding whitespace on the prompt never changes the digest
    ///
    /// Padding is insignificant; only the trimmed prompt participates in the
    /// canonical form.
    #[test]
    fn prop_prompt_padding_insignificant(
        prompt in "[a-z0-9 ]{1,40}",
        left in 0usize..5,
        right in 0usize..5,
    ) {
        let padded = format!("{}{}{}", " ".repeat(left), &prompt, " ".repeat(right));

        let bare = InferenceRequest::new(&prompt, "openai").fingerprint();
        let wrapped = InferenceRequest::new(padded, "openai").fingerprint();
        prop_assert_eq!(bare, wrapped);
    }

    /// Property: provider letter case never changes the digest
    #[test]
    fn prop_provider_case_insignificant(
        prompt in "[a-z]{1,20}",
        provider in "[a-zA-Z]{1,12}",
    ) {
        let upper = InferenceRequest::new(&prompt, provider.to_uppercase()).fingerprint();
        let lower = InferenceRequest::new(&prompt, provider.to_lowercase()).fingerprint();
        prop_assert_eq!(upper, lower);
    }

    /// Property: ingredient order never changes a meal-plan digest
    #[test]
    fn prop_meal_plan_list_order_insignificant(
        mut ingredients in prop::collection::vec("[a-z]{1,10}", 1..8),
        rotate_by in 0usize..8,
    ) {
        let forward = MealPlanRequest::new(vec![], ingredients.clone()).fingerprint();

        let len = ingredients.len();
        ingredients.rotate_left(rotate_by % len);
        let rotated = MealPlanRequest::new(vec![], ingredients).fingerprint();

        prop_assert_eq!(forward, rotated);
    }

    /// Property: character order never changes a story digest
    #[test]
    fn prop_story_character_order_insignificant(
        mut characters in prop::collection::vec("[a-z]{1,8}", 1..6),
    ) {
        let mut forward = StoryRequest::new("dragons");
        for character in &characters {
            forward = forward.with_character(character.clone());
        }

        characters.reverse();
        let mut reversed = StoryRequest::new("dragons");
        for character in &characters {
            reversed = reversed.with_character(character.clone());
        }

        prop_assert_eq!(forward.fingerprint(), reversed.fingerprint());
    }

    /// Property: any temperature change changes the digest
    ///
    /// Temperatures come from a hundredths grid so distinct draws are
    /// distinct f64 values.
    #[test]
    fn prop_temperature_change_changes_digest(
        prompt in "[a-z]{1,20}",
        a in 0u32..100,
        b in 0u32..100,
    ) {
        prop_assume!(a != b);

        let first = InferenceRequest::new(&prompt, "openai")
            .with_temperature(f64::from(a) / 100.0)
            .fingerprint();
        let second = InferenceRequest::new(&prompt, "openai")
            .with_temperature(f64::from(b) / 100.0)
            .fingerprint();
        prop_assert_ne!(first, second);
    }

    /// Property: any token-budget change changes the digest
    #[test]
    fn prop_max_tokens_change_changes_digest(
        prompt in "[a-z]{1,20}",
        a in 1u32..10_000,
        b in 1u32..10_000,
    ) {
        prop_assume!(a != b);

        let first = InferenceRequest::new(&prompt, "openai")
            .with_max_tokens(a)
            .fingerprint();
        let second = InferenceRequest::new(&prompt, "openai")
            .with_max_tokens(b)
            .fingerprint();
        prop_assert_ne!(first, second);
    }

    /// Property: the digest is always 64 lowercase hex characters
    #[test]
    fn prop_digest_shape_stable(
        theme in ".{0,40}",
        characters in prop::collection::vec("[A-Za-z]{1,10}", 0..5),
    ) {
        let mut request = StoryRequest::new(theme);
        for character in characters {
            request = request.with_character(character);
        }

        let digest = request.fingerprint();
        prop_assert_eq!(digest.len(), 64);
        prop_assert!(digest
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
