use criterion::{black_box, criterion_group, criterion_main, Criterion};
use inference_cache::domain::fingerprint::{
    Fingerprintable, InferenceRequest, MealPlanRequest, StoryRequest,
};

const PROMPT: &str = "Suggest a balanced weekly meal plan for two adults who \
    prefer Mediterranean cuisine, avoid shellfish, and cook at most forty \
    minutes per evening.";

fn bench_inference_fingerprint(c: &mut Criterion) {
    let request = InferenceRequest::new(PROMPT, "OpenAI")
        .with_model("gpt-4")
        .with_temperature(0.4)
        .with_max_tokens(2000);

    c.bench_function("fingerprint/inference", |b| {
        b.iter(|| black_box(&request).fingerprint());
    });
}

fn bench_meal_plan_fingerprint(c: &mut Criterion) {
    let request = MealPlanRequest::new(
        vec!["vegetarian".to_string(), "gluten-free".to_string()],
        vec![
            "chickpeas".to_string(),
            "spinach".to_string(),
            "rice".to_string(),
            "tomatoes".to_string(),
            "feta".to_string(),
            "olive oil".to_string(),
            "lentils".to_string(),
            "zucchini".to_string(),
        ],
    )
    .with_days_count(7)
    .with_meals_per_day(3);

    c.bench_function("fingerprint/meal_plan", |b| {
        b.iter(|| black_box(&request).fingerprint());
    });
}

fn bench_story_fingerprint(c: &mut Criterion) {
    let request = StoryRequest::new("  A Lighthouse at the Edge of the World  ")
        .with_age_group("5-7")
        .with_character("Luna")
        .with_character("Captain Oso")
        .with_character("Max");

    c.bench_function("fingerprint/story", |b| {
        b.iter(|| black_box(&request).fingerprint());
    });
}

fn bench_canonicalize_only(c: &mut Criterion) {
    let request = InferenceRequest::new(PROMPT, "openai");

    c.bench_function("fingerprint/canonicalize", |b| {
        b.iter(|| black_box(&request).canonicalize());
    });
}

criterion_group!(
    benches,
    bench_inference_fingerprint,
    bench_meal_plan_fingerprint,
    bench_story_fingerprint,
    bench_canonicalize_only
);
criterion_main!(benches);
