use std::sync::Arc;

use chrono::{DateTime, Utc};
use quiz_core::forms::LoginForm;
use quiz_core::model::{NotificationKind, Quiz, QuizId};
use quiz_core::time::fixed_clock;
use services::{AppServices, IdentityProvider, LocalIdentityProvider};
use storage::repository::{QuizRepository, Storage, StorageError};

use super::test_harness::{
    ViewKind, sample_quiz, setup_view_harness, setup_view_harness_with_identity,
    setup_view_harness_with_storage,
};
use crate::vm::SessionIntent;
use dioxus::prelude::ReadableExt;

fn catalog() -> Vec<Quiz> {
    vec![
        sample_quiz("rust", "Rust Basics", "Programming", 3),
        sample_quiz("space", "Solar System", "Science", 2),
    ]
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_recommends_quizzes_not_yet_mastered() {
    let mut harness = setup_view_harness(ViewKind::Home, catalog()).await;
    let sessions = harness.services.sessions();
    let mut session = sessions
        .start(&QuizId::new("space").unwrap())
        .await
        .expect("start");
    for _ in 0..2 {
        session.select_current(0).unwrap();
        sessions.advance_and_record(&mut session).await.unwrap();
    }

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Welcome!"), "missing greeting in {html}");
    assert!(html.contains("Rust Basics"), "missing recommendation in {html}");
    assert!(!html.contains("Solar System"), "mastered quiz recommended in {html}");
    assert!(html.contains("100%"), "missing average in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_list_view_renders_cards_and_categories() {
    let mut harness = setup_view_harness(ViewKind::Quizzes, catalog()).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("All Quizzes"), "missing title in {html}");
    assert!(html.contains("Solar System"), "missing card in {html}");
    assert!(html.contains("3 questions"), "missing question count in {html}");
    assert!(html.contains("Programming"), "missing category chip in {html}");
    assert!(html.contains("Intermediate"), "missing difficulty in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_runs_to_the_result_screen() {
    let mut harness = setup_view_harness(
        ViewKind::Quiz("single".into()),
        vec![sample_quiz("single", "One Shot", "Trivia", 1)],
    )
    .await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Question 1 of 1"), "missing progress in {html}");
    assert!(html.contains("Finish"), "missing finish button in {html}");
    assert!(html.contains("Exit Quiz"), "missing exit button in {html}");
    assert!(
        html.contains("Trivia · Intermediate · Estimated Time: 10 min"),
        "missing quiz info in {html}"
    );

    let handles = harness.quiz_handles.clone().expect("quiz handles");
    handles.dispatch().call(SessionIntent::Select(0));
    harness.drive();
    let selected = harness.dom.in_runtime(|| {
        handles
            .session()
            .read()
            .as_ref()
            .and_then(|s| s.current_selection())
    });
    assert_eq!(selected, Some(0));

    handles.dispatch().call(SessionIntent::Next);
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Perfect Score!"), "missing headline in {html}");
    assert!(html.contains("1/1"), "missing score in {html}");
    assert!(html.contains("Try Again"), "missing restart in {html}");
    assert_eq!(harness.services.progress().list().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_ignores_a_second_next_in_the_same_tick() {
    let mut harness = setup_view_harness(
        ViewKind::Quiz("single".into()),
        vec![sample_quiz("single", "One Shot", "Trivia", 1)],
    )
    .await;
    harness.rebuild();
    harness.drive_async().await;

    let handles = harness.quiz_handles.clone().expect("quiz handles");
    handles.dispatch().call(SessionIntent::Select(0));
    harness.drive();
    handles.dispatch().call(SessionIntent::Next);
    handles.dispatch().call(SessionIntent::Next);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Perfect Score!"), "missing headline in {html}");
    assert!(!html.contains("Something went wrong"), "spurious error in {html}");
    assert_eq!(harness.services.progress().list().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_reports_unknown_quiz() {
    let mut harness = setup_view_harness(ViewKind::Quiz("missing".into()), catalog()).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Quiz not found"), "missing not-found in {html}");
    assert!(html.contains("Back to Quizzes"), "missing back link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_rejects_quiz_without_questions() {
    let mut harness = setup_view_harness(
        ViewKind::Quiz("empty".into()),
        vec![sample_quiz("empty", "Empty", "Trivia", 0)],
    )
    .await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("no questions yet"), "missing empty message in {html}");
}

struct FailingQuizRepo;

#[async_trait::async_trait]
impl QuizRepository for FailingQuizRepo {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        Err(StorageError::Connection("offline".to_string()))
    }

    async fn get_quiz(&self, _id: &QuizId) -> Result<Quiz, StorageError> {
        Err(StorageError::Connection("offline".to_string()))
    }

    async fn upsert_quiz(&self, _quiz: &Quiz, _at: DateTime<Utc>) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".to_string()))
    }

    async fn count_quizzes(&self) -> Result<usize, StorageError> {
        Err(StorageError::Connection("offline".to_string()))
    }

    async fn delete_all_quizzes(&self) -> Result<usize, StorageError> {
        Err(StorageError::Connection("offline".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_list_view_offers_retry_when_catalog_fails() {
    let mut storage = Storage::in_memory();
    storage.quizzes = Arc::new(FailingQuizRepo);
    let mut harness = setup_view_harness_with_storage(ViewKind::Quizzes, storage).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Could not load data"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn settings_view_renders_all_sections() {
    let mut harness = setup_view_harness(ViewKind::Settings, catalog()).await;
    harness.rebuild();
    let html = harness.render();
    for text in ["Display", "Dark Mode", "About QuizApp", "Privacy Policy", "Clear Quiz Progress"] {
        assert!(html.contains(text), "missing {text} in {html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn profile_view_prompts_sign_in_when_signed_out() {
    let mut harness = setup_view_harness(ViewKind::Profile, catalog()).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Sign in to see your profile"), "missing prompt in {html}");
}

fn ada_provider() -> Arc<dyn IdentityProvider> {
    Arc::new(
        LocalIdentityProvider::new()
            .with_account("Ada Lovelace", "ada@example.com", "secret1")
            .expect("account"),
    )
}

fn ada_login() -> LoginForm {
    LoginForm {
        email: "ada@example.com".into(),
        password: "secret1".into(),
    }
}

async fn signed_in_services(storage: Storage) -> AppServices {
    let services = AppServices::from_storage(storage, fixed_clock(), ada_provider()).await;
    services.auth().sign_in(&ada_login()).await.expect("sign in");
    services
}

async fn signed_in_harness(view: ViewKind) -> super::test_harness::ViewHarness {
    let harness =
        setup_view_harness_with_identity(view, Storage::in_memory_with(catalog()), ada_provider())
            .await;
    harness
        .services
        .auth()
        .sign_in(&ada_login())
        .await
        .expect("sign in");
    harness
}

#[tokio::test(flavor = "current_thread")]
async fn profile_view_shows_signed_in_user() {
    let mut harness = signed_in_harness(ViewKind::Profile).await;
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Ada Lovelace"), "missing name in {html}");
    assert!(html.contains("ada@example.com"), "missing email in {html}");
    assert!(html.contains("No quizzes taken yet."), "missing empty history in {html}");
    assert!(html.contains("Delete Account"), "missing delete button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn profile_view_ignores_cached_user_without_session() {
    let storage = Storage::in_memory_with(catalog());
    let previous = signed_in_services(storage.clone()).await;
    assert!(previous.auth().current_user().is_some());

    let identity: Arc<dyn IdentityProvider> = Arc::new(LocalIdentityProvider::new());
    let mut harness =
        setup_view_harness_with_identity(ViewKind::Profile, storage, identity).await;
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Sign in to see your profile"), "missing prompt in {html}");
    assert!(!html.contains("Ada Lovelace"), "cached user leaked into {html}");
    assert!(harness.services.auth().current_user().is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn notifications_view_lists_unread_items() {
    let mut harness = signed_in_harness(ViewKind::Notifications).await;
    let user = harness.services.auth().current_user().expect("user");
    harness
        .services
        .notifications()
        .notify(&user.id, NotificationKind::Achievement, "New badge", "You finished a quiz")
        .await
        .expect("notify");

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("New badge"), "missing title in {html}");
    assert!(html.contains("1 unread"), "missing badge in {html}");
    assert!(html.contains("Just now"), "missing time label in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn callback_view_shows_provider_error() {
    let mut harness = setup_view_harness(
        ViewKind::Callback("error=access_denied&error_description=User+cancelled".into()),
        catalog(),
    )
    .await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Sign in failed"), "missing heading in {html}");
    assert!(html.contains("User cancelled"), "missing message in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn callback_view_shows_progress_without_error() {
    let mut harness = setup_view_harness(ViewKind::Callback(String::new()), catalog()).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Completing sign in..."), "missing progress text in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Login, catalog()).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Welcome Back"), "missing title in {html}");
    assert!(html.contains("Forgot password?"), "missing reset link in {html}");
}
