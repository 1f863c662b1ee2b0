use std::collections::HashSet;
use std::env;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, warn};

use quiz_core::model::{Quiz, QuizDraft, QuizId};
use storage::repository::{QuizRepository, StorageError};

#[derive(Clone, Debug)]
pub struct RemoteCatalogConfig {
    pub base_url: String,
}

impl RemoteCatalogConfig {
    /// Reads `QUIZ_CATALOG_URL`; unset or blank disables the remote catalog.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("QUIZ_CATALOG_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        Some(Self { base_url })
    }

    fn quizzes_url(&self) -> String {
        format!("{}/quizzes", self.base_url.trim().trim_end_matches('/'))
    }
}

/// Read-only catalog served over HTTP in the dataset JSON shape.
#[derive(Clone)]
pub struct HttpQuizRepository {
    client: Client,
    config: RemoteCatalogConfig,
}

impl HttpQuizRepository {
    #[must_use]
    pub fn new(config: RemoteCatalogConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// # Errors
    ///
    /// Returns the underlying `reqwest::Error` if the HTTP client cannot be built.
    pub fn with_timeout(
        config: RemoteCatalogConfig,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    async fn fetch(&self) -> Result<Vec<Quiz>, StorageError> {
        let url = self.config.quizzes_url();
        debug!(%url, "fetching remote catalog");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Connection(format!(
                "catalog request failed with status {}",
                response.status()
            )));
        }

        let documents: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(keep_valid(documents))
    }
}

/// Validate each document on its own; invalid or repeated quizzes are
/// logged and skipped so the rest of the catalog stays usable.
fn keep_valid(documents: Vec<serde_json::Value>) -> Vec<Quiz> {
    let mut seen = HashSet::with_capacity(documents.len());
    let mut quizzes = Vec::with_capacity(documents.len());
    for (index, document) in documents.into_iter().enumerate() {
        let draft: QuizDraft = match serde_json::from_value(document) {
            Ok(draft) => draft,
            Err(err) => {
                warn!(index, error = %err, "skipping malformed remote quiz");
                continue;
            }
        };
        let id = draft.id.clone();
        let quiz = match draft.validate() {
            Ok(quiz) => quiz,
            Err(err) => {
                warn!(index, %id, error = %err, "skipping invalid remote quiz");
                continue;
            }
        };
        if !seen.insert(quiz.id().clone()) {
            warn!(index, %id, "skipping duplicate remote quiz");
            continue;
        }
        quizzes.push(quiz);
    }
    quizzes
}

#[async_trait]
impl QuizRepository for HttpQuizRepository {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        self.fetch().await
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError> {
        self.fetch()
            .await?
            .into_iter()
            .find(|q| q.id() == id)
            .ok_or(StorageError::NotFound)
    }

    async fn upsert_quiz(&self, _quiz: &Quiz, _at: DateTime<Utc>) -> Result<(), StorageError> {
        Err(StorageError::Unsupported("remote catalog is read-only"))
    }

    async fn count_quizzes(&self) -> Result<usize, StorageError> {
        Ok(self.fetch().await?.len())
    }

    async fn delete_all_quizzes(&self) -> Result<usize, StorageError> {
        Err(StorageError::Unsupported("remote catalog is read-only"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const BODY: &str = r#"[
        {"id":"remote-1","title":"Remote Quiz","description":"","category":"Net","difficulty":"Beginner","duration":3,
         "questions":[{"id":"q1","question":"?","options":["a","b"],"correctAnswer":1,"explanation":""}]}
    ]"#;

    /// Serves `status` and `body` to every connection.
    async fn serve(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = vec![0_u8; 4096];
                let mut read = 0;
                while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf[read..]).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => read += n,
                    }
                }
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetches_and_validates_remote_catalog() {
        let base_url = serve("200 OK", BODY).await;
        let repo = HttpQuizRepository::new(RemoteCatalogConfig { base_url });

        let quizzes = repo.list_quizzes().await.unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].title(), "Remote Quiz");

        let found = repo.get_quiz(&QuizId::new("remote-1").unwrap()).await.unwrap();
        assert_eq!(found.question(0).unwrap().correct_option(), 1);
        assert!(matches!(
            repo.get_quiz(&QuizId::new("other").unwrap()).await,
            Err(StorageError::NotFound)
        ));
    }

    const MIXED_BODY: &str = r#"[
        {"id":"good","title":"Good Quiz","description":"","category":"Net","difficulty":"Beginner","duration":3,
         "questions":[{"id":"q1","question":"?","options":["a","b"],"correctAnswer":0,"explanation":""}]},
        {"id":"odd","title":"Odd Difficulty","description":"","category":"Net","difficulty":"Expert","duration":3,
         "questions":[{"id":"q1","question":"?","options":["a","b"],"correctAnswer":0,"explanation":""}]},
        {"id":"broken","title":"Bad Answer","description":"","category":"Net","difficulty":"Beginner","duration":3,
         "questions":[{"id":"q1","question":"?","options":["a","b"],"correctAnswer":7,"explanation":""}]},
        {"title":"No Id"},
        {"id":"good","title":"Good Again","description":"","category":"Net","difficulty":"Beginner","duration":3,
         "questions":[]}
    ]"#;

    #[tokio::test]
    async fn invalid_remote_quizzes_are_skipped() {
        let base_url = serve("200 OK", MIXED_BODY).await;
        let repo = HttpQuizRepository::new(RemoteCatalogConfig { base_url });

        let quizzes = repo.list_quizzes().await.unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].title(), "Good Quiz");
        assert_eq!(repo.count_quizzes().await.unwrap(), 1);

        let found = repo.get_quiz(&QuizId::new("good").unwrap()).await.unwrap();
        assert_eq!(found.title(), "Good Quiz");
        assert!(matches!(
            repo.get_quiz(&QuizId::new("odd").unwrap()).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn http_errors_surface_as_connection_errors() {
        let base_url = serve("503 Service Unavailable", "[]").await;
        let repo = HttpQuizRepository::new(RemoteCatalogConfig { base_url });
        assert!(matches!(
            repo.list_quizzes().await,
            Err(StorageError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn remote_catalog_is_read_only() {
        let repo = HttpQuizRepository::new(RemoteCatalogConfig {
            base_url: "http://127.0.0.1:9".into(),
        });
        assert!(matches!(
            repo.delete_all_quizzes().await,
            Err(StorageError::Unsupported(_))
        ));
    }

    #[test]
    fn quizzes_url_trims_trailing_slash() {
        let config = RemoteCatalogConfig {
            base_url: "https://example.com/api/".into(),
        };
        assert_eq!(config.quizzes_url(), "https://example.com/api/quizzes");
    }
}
