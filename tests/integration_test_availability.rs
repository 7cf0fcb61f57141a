mod common;

use axum::http::StatusCode;
use common::{at, monday, t, windows, TestApp, TRAINER};

#[tokio::test]
async fn test_monday_template_yields_two_hourly_slots() {
    let app = TestApp::new().await;
    app.seed_monday_trainer().await;

    let slots = app.slots("2030-01-07").await;

    assert_eq!(windows(&slots), vec![
        ("08:00".to_string(), "09:00".to_string(), true),
        ("09:00".to_string(), "10:00".to_string(), true),
    ]);
    assert_eq!(slots[0]["date"], "2030-01-07");
}

#[tokio::test]
async fn test_facade_candidates_ignore_bookings_and_clock() {
    let app = TestApp::new().await;
    app.seed_monday_trainer().await;
    app.clock.set(at(monday(), 9, 30));

    let candidates = app.state.scheduling.resolve_candidates(TRAINER, monday()).await.unwrap();
    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().all(|s| s.available));
}

#[tokio::test]
async fn test_inactive_and_missing_weekdays_are_empty() {
    let app = TestApp::new().await;
    app.seed_monday_trainer().await;
    app.seed_day(TRAINER, 2, false, t(8, 0), t(12, 0), 30).await;

    // Tuesday: inactive row
    assert!(app.slots("2030-01-08").await.is_empty());
    // Wednesday: no row
    assert!(app.slots("2030-01-09").await.is_empty());
    // Following Monday still works
    assert_eq!(app.slots("2030-01-14").await.len(), 2);
}

#[tokio::test]
async fn test_unknown_trainer_has_no_slots() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/v1/trainers/nobody/slots?date=2030-01-07", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["slots"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_past_date_short_circuits_to_empty() {
    let app = TestApp::new().await;
    app.seed_monday_trainer().await;
    app.clock.set(at(monday() + chrono::Duration::days(1), 7, 0));

    assert!(app.slots("2030-01-07").await.is_empty());
}

#[tokio::test]
async fn test_elapsed_slots_today_are_unavailable() {
    let app = TestApp::new().await;
    app.seed_monday_trainer().await;
    app.clock.set(at(monday(), 8, 30));

    let slots = app.slots("2030-01-07").await;
    assert_eq!(windows(&slots), vec![
        ("08:00".to_string(), "09:00".to_string(), false),
        ("09:00".to_string(), "10:00".to_string(), true),
    ]);
}

#[tokio::test]
async fn test_cached_slots_still_respect_the_clock() {
    let app = TestApp::new().await;
    app.seed_monday_trainer().await;
    app.clock.set(at(monday(), 7, 0));

    assert!(windows(&app.slots("2030-01-07").await).iter().all(|(_, _, available)| *available));
    assert_eq!(app.state.scheduling.cache().len(), 1);

    app.clock.set(at(monday(), 9, 15));
    let slots = app.slots("2030-01-07").await;
    assert!(slots.iter().all(|s| !s["available"].as_bool().unwrap()));
}

#[tokio::test]
async fn test_partial_interval_is_not_offered() {
    let app = TestApp::new().await;
    app.seed_day(TRAINER, 1, true, t(8, 0), t(9, 40), 45).await;

    let slots = app.slots("2030-01-07").await;
    assert_eq!(windows(&slots), vec![
        ("08:00".to_string(), "08:45".to_string(), true),
        ("08:45".to_string(), "09:30".to_string(), true),
    ]);
}

#[tokio::test]
async fn test_slots_require_a_valid_date() {
    let app = TestApp::new().await;

    let (status, _) = app.get(&format!("/api/v1/trainers/{}/slots", TRAINER), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get(&format!("/api/v1/trainers/{}/slots?date=07-01-2030", TRAINER), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid date"));
}

#[tokio::test]
async fn test_weekly_availability_read_model() {
    let app = TestApp::new().await;
    app.seed_monday_trainer().await;
    app.seed_day(TRAINER, 5, false, t(14, 0), t(18, 0), 30).await;
    // upsert replaces the Monday row
    app.seed_day(TRAINER, 1, true, t(7, 0), t(10, 0), 90).await;

    let (status, body) = app.get(&format!("/api/v1/trainers/{}/availability", TRAINER), None).await;
    assert_eq!(status, StatusCode::OK);

    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["day_of_week"], 1);
    assert_eq!(days[0]["start_time"], "07:00");
    assert_eq!(days[0]["slot_duration_minutes"], 90);
    assert_eq!(days[1]["active"], false);

    assert_eq!(app.slots("2030-01-07").await.len(), 2);
}
