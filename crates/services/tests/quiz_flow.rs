use std::sync::Arc;

use quiz_core::forms::LoginForm;
use quiz_core::model::{QuestionDraft, Quiz, QuizDraft, QuizId};
use quiz_core::time::fixed_now;
use services::local_state::LOCAL_STATE_KEY;
use services::{
    Advance, AppServices, AuthError, Clock, IdentityProvider, LocalIdentityProvider, SessionError,
};
use storage::repository::{KeyValueStore, Storage};

fn quiz(id: &str, correct: &[i64]) -> Quiz {
    QuizDraft {
        id: id.into(),
        title: format!("Quiz {id}"),
        description: String::new(),
        category: "Smoke".into(),
        difficulty: "Intermediate".into(),
        duration: 10,
        questions: correct
            .iter()
            .enumerate()
            .map(|(i, c)| QuestionDraft {
                id: format!("q{}", i + 1),
                question: format!("Question {}", i + 1),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct_answer: *c,
                explanation: format!("Because {c}"),
            })
            .collect(),
        created_at: None,
        updated_at: None,
    }
    .validate()
    .unwrap()
}

async fn services(storage: Storage) -> AppServices {
    AppServices::from_storage(
        storage,
        Clock::fixed(fixed_now()),
        Arc::new(LocalIdentityProvider::new()),
    )
    .await
}

#[tokio::test]
async fn completed_attempt_is_scored_and_survives_reload() {
    let storage = Storage::in_memory_with(vec![quiz("four", &[1, 0, 2, 3])]);
    let app = services(storage.clone()).await;
    let quiz_id = QuizId::new("four").unwrap();

    let mut session = app.sessions().start(&quiz_id).await.unwrap();
    let mut last = None;
    for option in [1, 0, 0, 3] {
        session.select_current(option).unwrap();
        last = Some(app.sessions().advance_and_record(&mut session).await.unwrap());
    }

    let Some(Advance::Completed(result)) = last else {
        panic!("quiz should be completed");
    };
    assert_eq!(result.score, 3);
    assert_eq!(result.total, 4);
    assert_eq!(result.percentage, 75);
    assert!(result.passed());
    assert!(!result.is_perfect());

    let review = session.review().unwrap();
    assert_eq!(review.len(), 4);
    assert!(!review[2].is_correct);
    assert_eq!(review[2].selected_text(), Some("A"));
    assert_eq!(review[2].correct_text(), Some("C"));

    let raw = storage.kv.get(LOCAL_STATE_KEY).await.unwrap();
    assert!(raw.is_some_and(|r| r.contains("\"quizProgress\"")));

    let reloaded = services(storage).await;
    let history = reloaded.progress().list();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].quiz_id, quiz_id);
    assert_eq!(history[0].score, 3);
    assert_eq!(history[0].percentage(), 75);
    assert_eq!(history[0].answer_sheet().len(), 4);
}

#[tokio::test]
async fn empty_answer_sheet_scores_zero() {
    let storage = Storage::in_memory_with(vec![quiz("one", &[2])]);
    let app = services(storage).await;
    let session = app
        .sessions()
        .start(&QuizId::new("one").unwrap())
        .await
        .unwrap();
    let result = quiz_core::scoring::score(session.quiz(), session.answers());
    assert_eq!(result.score, 0);
    assert_eq!(result.percentage, 0);
}

#[tokio::test]
async fn restart_allows_a_second_recorded_attempt() {
    let storage = Storage::in_memory_with(vec![quiz("retry", &[0, 1])]);
    let app = services(storage).await;
    let quiz_id = QuizId::new("retry").unwrap();
    let mut session = app.sessions().start(&quiz_id).await.unwrap();

    for attempt in [[1, 0], [0, 1]] {
        for option in attempt {
            session.select_current(option).unwrap();
            app.sessions()
                .advance_and_record(&mut session)
                .await
                .unwrap();
        }
        if !session.result().is_some_and(|r| r.is_perfect()) {
            session.restart().unwrap();
        }
    }

    let history = app.progress().list();
    assert_eq!(history.len(), 2);
    assert!(history[0].is_perfect());
    assert_eq!(history[1].score, 0);
    assert!(
        app.catalog()
            .recommended(&history, 2)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn quiz_without_questions_cannot_start() {
    let storage = Storage::in_memory_with(vec![quiz("empty", &[])]);
    let app = services(storage).await;
    let id = QuizId::new("empty").unwrap();
    assert!(app.catalog().get_by_id(&id).await.unwrap().is_some());
    assert!(matches!(
        app.sessions().start(&id).await,
        Err(SessionError::EmptyQuiz(_))
    ));
}

#[tokio::test]
async fn reload_with_fresh_provider_is_signed_out() {
    let storage = Storage::in_memory_with(vec![quiz("one", &[2])]);
    let provider: Arc<dyn IdentityProvider> = Arc::new(
        LocalIdentityProvider::new()
            .with_account("Ada", "ada@example.com", "secret1")
            .unwrap(),
    );
    let app = AppServices::from_storage(storage.clone(), Clock::fixed(fixed_now()), provider).await;
    let user = app
        .auth()
        .sign_in(&LoginForm {
            email: "ada@example.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap();
    let profile_key = format!("users/{}", user.id);
    assert!(storage.kv.get(&profile_key).await.unwrap().is_some());

    let reloaded = services(storage.clone()).await;
    assert_eq!(reloaded.auth().current_user(), Some(user));
    assert!(!reloaded.auth().is_signed_in().await);
    assert!(matches!(
        reloaded.auth().delete_account().await,
        Err(AuthError::NotSignedIn)
    ));
    assert!(storage.kv.get(&profile_key).await.unwrap().is_some());

    assert!(reloaded.auth().session_user().await.is_none());
    assert!(reloaded.auth().current_user().is_none());
}
