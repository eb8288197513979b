//! Widget site journeys against the in-memory pages.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use storefront::pages::{ElementsPage, PracticeFormPage, StudentForm};
use storefront::{catalog, PageObject, ScenarioRunner};
use support::FakeSite;

#[tokio::test]
async fn test_widget_scenarios_pass() {
    let site = FakeSite::new();
    let report = ScenarioRunner::new()
        .with_tag(Some("widgets".into()))
        .run(&site.session, &catalog())
        .await;

    assert_eq!(report.total(), 5);
    for result in &report.results {
        assert!(result.passed, "{}: {:?}", result.name, result.error);
    }
}

#[tokio::test]
async fn test_text_box_output_echoes_email() {
    let site = FakeSite::new();
    let elements = ElementsPage::new(site.session.clone());
    elements.open().await.unwrap();
    elements.verify_loaded().await.unwrap();
    elements.open_section("Text Box").await.unwrap();
    assert!(!elements.is_output_visible().await);

    elements
        .fill_text_box("Ada", "ada@example.com", "1 Loop", "2 Loop")
        .await
        .unwrap();
    elements.submit_text_box().await.unwrap();

    assert!(elements.is_output_visible().await);
    assert_eq!(elements.output_email().await.unwrap(), "Email:ada@example.com");
}

#[tokio::test]
async fn test_practice_form_rejects_short_mobile() {
    let site = FakeSite::new();
    let form = PracticeFormPage::new(site.session.clone());
    form.open().await.unwrap();

    form.fill_student_form(&StudentForm {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        gender: "Female".into(),
        mobile: "12345".into(),
    })
    .await
    .unwrap();
    form.submit().await.unwrap();

    assert!(!form.is_confirmation_visible().await);
    form.verify_validation_triggered().await.unwrap();
}
