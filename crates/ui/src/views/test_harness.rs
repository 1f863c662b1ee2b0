use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{QuestionDraft, Quiz, QuizDraft};
use quiz_core::time::fixed_clock;
use services::{
    AppServices, AuthService, CatalogService, Clock, IdentityProvider, LocalIdentityProvider,
    NotificationService, PreferencesService, ProgressStore, QuizSessionService,
};
use storage::repository::Storage;

use crate::app::use_app_signals_provider;
use crate::context::{UiApp, build_app_context};
use crate::views::quiz::QuizTestHandles;
use crate::views::{
    CallbackView, HomeView, LoginView, NotificationsView, ProfileView, QuizListView, QuizView,
    SettingsView,
};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn sessions(&self) -> Arc<QuizSessionService> {
        self.services.sessions()
    }

    fn progress(&self) -> Arc<ProgressStore> {
        self.services.progress()
    }

    fn preferences(&self) -> Arc<PreferencesService> {
        self.services.preferences()
    }

    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn notifications(&self) -> Arc<NotificationService> {
        self.services.notifications()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Quizzes,
    Quiz(String),
    Profile,
    Notifications,
    Settings,
    Login,
    Callback(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    quiz_handles: Option<QuizTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_app_signals_provider();
    use_context_provider(|| props.view.clone());
    if let Some(handles) = props.quiz_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Quizzes => rsx! { QuizListView {} },
        ViewKind::Quiz(id) => rsx! { QuizView { id } },
        ViewKind::Profile => rsx! { ProfileView {} },
        ViewKind::Notifications => rsx! { NotificationsView {} },
        ViewKind::Settings => rsx! { SettingsView {} },
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Callback(query) => rsx! { CallbackView { query } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: AppServices,
    pub quiz_handles: Option<QuizTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive async work through several rounds, for chained resources.
    pub async fn settle(&mut self) {
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn drive(&mut self) {
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// A quiz whose every question has option 0 as the correct answer.
pub fn sample_quiz(id: &str, title: &str, category: &str, questions: usize) -> Quiz {
    QuizDraft {
        id: id.into(),
        title: title.into(),
        description: format!("About {title}"),
        category: category.into(),
        difficulty: "Intermediate".into(),
        duration: 10,
        questions: (0..questions)
            .map(|i| QuestionDraft {
                id: format!("{id}-q{i}"),
                question: format!("{title} question {}", i + 1),
                options: vec!["Right".into(), "Wrong".into(), "Also wrong".into()],
                correct_answer: 0,
                explanation: "Right is right.".into(),
            })
            .collect(),
        created_at: None,
        updated_at: None,
    }
    .validate()
    .expect("valid sample quiz")
}

pub async fn setup_view_harness(view: ViewKind, quizzes: Vec<Quiz>) -> ViewHarness {
    setup_view_harness_with_storage(view, Storage::in_memory_with(quizzes)).await
}

pub async fn setup_view_harness_with_storage(view: ViewKind, storage: Storage) -> ViewHarness {
    let identity: Arc<dyn IdentityProvider> = Arc::new(LocalIdentityProvider::new());
    setup_view_harness_with_identity(view, storage, identity).await
}

pub async fn setup_view_harness_with_identity(
    view: ViewKind,
    storage: Storage,
    identity: Arc<dyn IdentityProvider>,
) -> ViewHarness {
    let services = AppServices::from_storage(storage, fixed_clock(), identity).await;
    let quiz_handles = match view {
        ViewKind::Quiz(_) => Some(QuizTestHandles::default()),
        _ => None,
    };
    let app = Arc::new(TestApp {
        services: services.clone(),
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        services,
        quiz_handles,
    }
}
