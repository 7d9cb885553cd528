//! HTTP API
//!
//! JSON over HTTP/1.1. Every route except the health check, the question
//! catalog and the preview needs an `x-user-id` header, set by the identity
//! gateway in front of this service.
//!
//! ## Survey & compass
//! - `GET /survey/questions` - question catalog
//! - `POST /survey/preview` - score answers without saving
//! - `POST /survey` - submit answers, returns the stored compass
//! - `GET /compass/latest`, `GET /compass/history`
//! - `GET /survey/{id}/answers` - answers behind a stored compass
//!
//! ## Drafts
//! - `GET|PUT|DELETE /drafts/{survey|journal}`
//! - `POST /drafts/survey/answers` - `{"question": 5, "value": "ngebanding"}`,
//!   toggles multi-select tokens
//!
//! ## Challenges
//! - `GET /challenges` - tracks with the caller's status
//! - `GET /challenges/active`
//! - `GET /challenges/history` - every record, newest first
//! - `GET /challenges/{track}`
//! - `POST /challenges/{track}/start`
//! - `POST /progress/{id}/days/{n}/complete` - `{"reflection": "..."}`
//! - `PUT /progress/{id}/days/{n}/reflection` - `{"reflection": "..."}`
//! - `POST /progress/{id}/feedback` - `{"feedback": "love-it"}`
//! - `POST /progress/{id}/quit`
//!
//! ## Journal
//! - `GET /journal?limit=N`, `POST /journal` - `{"content": "..."}`
//! - `GET /journal/streak`
//! - `GET|PUT|DELETE /journal/{id}`
//!
//! ## Profile & admin
//! - `GET|PUT /profile/settings`, `GET /profile/stats`, `GET /dashboard`
//! - `DELETE /account`
//! - `GET /admin/metrics?days=N`
//!
//! ## Example Usage
//!
//! ```bash
//! curl -X POST -H "x-user-id: u1" -H "Content-Type: application/json" \
//!      -d '{"reflection": "Sketching ternyata seru"}' \
//!      http://localhost:8095/progress/<id>/days/1/complete
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::body::Body;
use hyper::header::HeaderMap;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::challenge::ChallengeFeedback;
use crate::db::models::current_timestamp;
use crate::drafts::{Draft, DraftKind};
use crate::error::GenmaveError;
use crate::services::profile_service::SettingsPatch;
use crate::services::response::{
    bad_request, created, error_response, from_delete_bool_result, from_option, json_response,
    method_not_allowed, no_content, not_found, ok, HandlerResult, HttpResponse,
};
use crate::services::Services;
use crate::survey::{AnswerValue, SurveyAnswers};

/// Trusted principal header
pub const USER_HEADER: &str = "x-user-id";

/// Request bodies larger than this are rejected
pub const MAX_BODY_BYTES: usize = 64 * 1024;

const MAX_USER_ID_LEN: usize = 128;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Deserialize)]
struct ReflectionBody {
    reflection: String,
}

#[derive(Debug, Deserialize)]
struct DraftAnswerBody {
    question: u8,
    value: AnswerValue,
    #[serde(default)]
    current_question: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct FeedbackBody {
    feedback: String,
}

#[derive(Debug, Deserialize)]
struct JournalBody {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct MetricsQuery {
    days: Option<u32>,
}

/// HTTP server state
pub struct HttpServer {
    services: Arc<Services>,
    bind_addr: SocketAddr,
}

impl HttpServer {
    pub fn new(services: Arc<Services>, bind_addr: SocketAddr) -> Self {
        Self { services, bind_addr }
    }

    /// Run the HTTP server
    pub async fn run(self: Arc<Self>) -> Result<(), GenmaveError> {
        let listener = TcpListener::bind(self.bind_addr).await?;
        info!(addr = %self.bind_addr, "HTTP server listening");

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let server = self.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let server = server.clone();
                    async move { Ok::<_, hyper::Error>(server.handle_request(req).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    warn!(addr = %remote_addr, error = %err, "Connection error");
                }
            });
        }
    }

    /// Route a request and turn any error into a JSON error response
    pub async fn handle_request<B>(&self, req: Request<B>) -> HttpResponse
    where
        B: Body,
        B::Error: Into<BoxError>,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        debug!(method = %method, path = %path, "Incoming request");

        match self.route(req).await {
            Ok(response) => response,
            Err(e) => {
                debug!(method = %method, path = %path, error = %e, "Request rejected");
                error_response(e)
            }
        }
    }

    async fn route<B>(&self, req: Request<B>) -> HandlerResult
    where
        B: Body,
        B::Error: Into<BoxError>,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let query = req.uri().query().unwrap_or("").to_string();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let user = principal(req.headers());
        let s = &self.services;

        match (&method, segments.as_slice()) {
            (&Method::GET, ["health"]) => Ok(self.handle_health()),

            // Survey & compass
            (&Method::GET, ["survey", "questions"]) => Ok(ok(&s.compass.questions())),
            (&Method::POST, ["survey", "preview"]) => {
                let answers: SurveyAnswers = read_json(req).await?;
                Ok(ok(&s.compass.preview(&answers)))
            }
            (&Method::POST, ["survey"]) => {
                let user = user?;
                let answers: SurveyAnswers = read_json(req).await?;
                Ok(created(&s.compass.submit(&user, answers)?))
            }
            (&Method::GET, ["compass", "latest"]) => Ok(from_option(s.compass.latest(&user?), "No compass yet")),
            (&Method::GET, ["compass", "history"]) => Ok(ok(&s.compass.history(&user?)?)),
            (&Method::GET, ["survey", id, "answers"]) => {
                Ok(from_option(s.compass.answers(&user?, id), "Survey not found"))
            }

            // Drafts
            (&Method::POST, ["drafts", "survey", "answers"]) => {
                let user = user?;
                let body: DraftAnswerBody = read_json(req).await?;
                Ok(ok(&s.compass.answer_draft(&user, body.question, body.value, body.current_question)?))
            }
            (_, ["drafts", kind]) => {
                let user = user?;
                let kind = DraftKind::parse(kind)
                    .ok_or_else(|| GenmaveError::NotFound(format!("draft kind {}", kind)))?;
                self.handle_draft(&method, &user, kind, req).await
            }

            // Challenges
            (&Method::GET, ["challenges"]) => Ok(ok(&s.challenge.catalog(&user?)?)),
            (&Method::GET, ["challenges", "active"]) => {
                Ok(from_option(s.challenge.active(&user?), "No active challenge"))
            }
            (&Method::GET, ["challenges", "history"]) => Ok(ok(&s.challenge.history(&user?)?)),
            (&Method::GET, ["challenges", track]) => Ok(ok(&s.challenge.track_detail(&user?, track)?)),
            (&Method::POST, ["challenges", track, "start"]) => Ok(created(&s.challenge.start(&user?, track)?)),
            (&Method::POST, ["progress", id, "days", day, "complete"]) => {
                let user = user?;
                let day = parse_day(day)?;
                let body: ReflectionBody = read_json(req).await?;
                Ok(ok(&s.challenge.complete_day(&user, id, day, &body.reflection)?))
            }
            (&Method::PUT, ["progress", id, "days", day, "reflection"]) => {
                let user = user?;
                let day = parse_day(day)?;
                let body: ReflectionBody = read_json(req).await?;
                Ok(ok(&s.challenge.save_reflection(&user, id, day, &body.reflection)?))
            }
            (&Method::POST, ["progress", id, "feedback"]) => {
                let user = user?;
                let body: FeedbackBody = read_json(req).await?;
                let feedback = ChallengeFeedback::parse(&body.feedback)
                    .ok_or_else(|| GenmaveError::InvalidInput(format!("unknown feedback {:?}", body.feedback)))?;
                Ok(ok(&s.challenge.submit_feedback(&user, id, feedback)?))
            }
            (&Method::POST, ["progress", id, "quit"]) => Ok(ok(&s.challenge.quit(&user?, id)?)),

            // Journal
            (&Method::GET, ["journal"]) => {
                let q: ListQuery = parse_query(&query)?;
                Ok(ok(&s.journal.list(&user?, q.limit)?))
            }
            (&Method::POST, ["journal"]) => {
                let user = user?;
                let body: JournalBody = read_json(req).await?;
                Ok(created(&s.journal.create(&user, &body.content)?))
            }
            (&Method::GET, ["journal", "streak"]) => Ok(ok(&s.journal.streak(&user?)?)),
            (&Method::GET, ["journal", id]) => Ok(from_option(s.journal.get(&user?, id), "Journal entry not found")),
            (&Method::PUT, ["journal", id]) => {
                let user = user?;
                let body: JournalBody = read_json(req).await?;
                Ok(ok(&s.journal.update(&user, id, &body.content)?))
            }
            (&Method::DELETE, ["journal", id]) => Ok(from_delete_bool_result(
                s.journal.delete(&user?, id),
                "Journal entry not found",
            )),

            // Profile
            (&Method::GET, ["profile", "settings"]) => Ok(ok(&s.profile.settings(&user?)?)),
            (&Method::PUT, ["profile", "settings"]) => {
                let user = user?;
                let patch: SettingsPatch = read_json(req).await?;
                Ok(ok(&s.profile.update_settings(&user, patch)?))
            }
            (&Method::GET, ["profile", "stats"]) => Ok(ok(&s.profile.stats(&user?)?)),
            (&Method::GET, ["dashboard"]) => Ok(ok(&s.profile.dashboard(&user?)?)),
            (&Method::DELETE, ["account"]) => Ok(ok(&s.profile.erase_account(&user?)?)),

            // Admin
            (&Method::GET, ["admin", "metrics"]) => {
                let q: MetricsQuery = parse_query(&query)?;
                Ok(ok(&s.admin.metrics(&user?, q.days)?))
            }

            _ => Ok(not_found("Not found")),
        }
    }

    fn handle_health(&self) -> HttpResponse {
        match self.services.database().ping() {
            Ok(()) => ok(&serde_json::json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            })),
            Err(e) => {
                warn!(error = %e, "Health check failed");
                json_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    &serde_json::json!({ "status": "unavailable", "error": e.to_string() }),
                )
            }
        }
    }

    async fn handle_draft<B>(&self, method: &Method, user: &str, kind: DraftKind, req: Request<B>) -> HandlerResult
    where
        B: Body,
        B::Error: Into<BoxError>,
    {
        let drafts = &self.services.drafts;
        match *method {
            Method::GET => Ok(match drafts.load(user, kind) {
                Some(draft) => ok(&draft),
                None => not_found("No draft"),
            }),
            Method::PUT => {
                let mut draft: Draft = read_json(req).await?;
                if draft.kind() != kind {
                    return Ok(bad_request(&format!("draft kind does not match path ({})", kind)));
                }
                if let Draft::Journal { saved_at, .. } = &mut draft {
                    saved_at.get_or_insert_with(current_timestamp);
                }
                drafts.save(user, draft.clone());
                Ok(ok(&draft))
            }
            Method::DELETE => {
                drafts.clear(user, kind);
                Ok(no_content())
            }
            _ => Ok(method_not_allowed()),
        }
    }
}

/// Principal from the trusted gateway header
fn principal(headers: &HeaderMap) -> Result<String, GenmaveError> {
    let value = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or("");
    if value.is_empty() || value.len() > MAX_USER_ID_LEN {
        return Err(GenmaveError::Unauthorized);
    }
    Ok(value.to_string())
}

fn parse_day(raw: &str) -> Result<u8, GenmaveError> {
    raw.parse::<u8>()
        .map_err(|_| GenmaveError::InvalidInput(format!("invalid day {:?}", raw)))
}

fn parse_query<T: DeserializeOwned + Default>(query: &str) -> Result<T, GenmaveError> {
    if query.is_empty() {
        return Ok(T::default());
    }
    serde_urlencoded::from_str(query).map_err(|e| GenmaveError::InvalidInput(format!("invalid query: {}", e)))
}

async fn read_json<T, B>(req: Request<B>) -> Result<T, GenmaveError>
where
    T: DeserializeOwned,
    B: Body,
    B::Error: Into<BoxError>,
{
    let body = Limited::new(req.into_body(), MAX_BODY_BYTES)
        .collect()
        .await
        .map_err(|e| GenmaveError::InvalidInput(format!("Failed to read body: {}", e)))?;
    let bytes: Bytes = body.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::Database;
    use http_body_util::Full;

    fn server() -> HttpServer {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let config = Config {
            admin_user_ids: vec!["root".into()],
            ..Config::default()
        };
        let services = Arc::new(Services::new(db, &config).unwrap());
        HttpServer::new(services, "127.0.0.1:0".parse().unwrap())
    }

    fn request(method: Method, uri: &str, user: Option<&str>, body: &str) -> Request<Full<Bytes>> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_HEADER, user);
        }
        builder.body(Full::new(Bytes::from(body.to_string()))).unwrap()
    }

    async fn json(resp: HttpResponse) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_public_routes() {
        let srv = server();
        let resp = srv.handle_request(request(Method::GET, "/health", None, "")).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = srv.handle_request(request(Method::GET, "/survey/questions", None, "")).await;
        assert_eq!(json(resp).await.as_array().unwrap().len(), 15);

        let resp = srv
            .handle_request(request(Method::POST, "/survey/preview", None, r#"{"10": "Visual"}"#))
            .await;
        let body = json(resp).await;
        assert_eq!(body["recommended_skills"][0]["slug"], "uiux");
        assert_eq!(body["recommended_skills"][0]["match"], 87);
    }

    #[tokio::test]
    async fn test_preview_tolerates_malformed_answers() {
        let srv = server();
        for body in [
            r#"{"3": "Jarang", "4": null}"#,
            r#"{"3": "Jarang", "4": 3.5}"#,
            r#"{"3": "Jarang", "5": [1, 2]}"#,
            r#"{"3": "Jarang", "4": true}"#,
            r#"{"3": "Jarang", "999": "x"}"#,
        ] {
            let resp = srv.handle_request(request(Method::POST, "/survey/preview", None, body)).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", body);
            assert_eq!(json(resp).await["clarity_score"], 70, "{}", body);
        }
    }

    #[tokio::test]
    async fn test_survey_draft_round_trip() {
        let srv = server();
        let draft = r#"{"kind": "survey", "answers": {"3": "Jarang", "5": ["ekspektasi"]}, "current_question": 3}"#;
        let resp = srv.handle_request(request(Method::PUT, "/drafts/survey", Some("u1"), draft)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = srv.handle_request(request(Method::GET, "/drafts/survey", Some("u1"), "")).await;
        let body = json(resp).await;
        assert_eq!(body["answers"]["3"], "Jarang");
        assert_eq!(body["answers"]["5"][0], "ekspektasi");
        assert_eq!(body["current_question"], 3);
    }

    #[tokio::test]
    async fn test_missing_principal_is_unauthorized() {
        let srv = server();
        let resp = srv.handle_request(request(Method::GET, "/dashboard", None, "")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let resp = srv.handle_request(request(Method::GET, "/journal", Some("  "), "")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_challenge_routes() {
        let srv = server();
        let resp = srv
            .handle_request(request(Method::POST, "/challenges/uiux-design/start", Some("u1"), ""))
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let id = json(resp).await["id"].as_str().unwrap().to_string();

        let uri = format!("/progress/{}/days/1/complete", id);
        let resp = srv
            .handle_request(request(Method::POST, &uri, Some("u1"), r#"{"reflection": ""}"#))
            .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(json(resp).await["code"], "empty_reflection");

        let resp = srv
            .handle_request(request(Method::POST, &uri, Some("u1"), r#"{"reflection": "seru"}"#))
            .await;
        let body = json(resp).await;
        assert_eq!(body["current_day"], 2);
        assert_eq!(body["reflections"]["day1"], "seru");
        assert_eq!(body["days"][1]["status"], "active");

        let resp = srv.handle_request(request(Method::GET, "/challenges/active", Some("u1"), "")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = srv.handle_request(request(Method::GET, "/challenges/active", Some("u2"), "")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = srv
            .handle_request(request(Method::POST, &format!("/progress/{}/feedback", id), Some("u1"), r#"{"feedback": "meh"}"#))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_drafts_routes() {
        let srv = server();
        let resp = srv
            .handle_request(request(Method::PUT, "/drafts/journal", Some("u1"), r#"{"kind": "journal", "content": "belum selesai"}"#))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(json(resp).await["saved_at"].is_string());

        let resp = srv
            .handle_request(request(Method::PUT, "/drafts/survey", Some("u1"), r#"{"kind": "journal", "content": "x"}"#))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = srv.handle_request(request(Method::GET, "/drafts/journal", Some("u1"), "")).await;
        assert_eq!(json(resp).await["content"], "belum selesai");

        let resp = srv
            .handle_request(request(Method::POST, "/drafts/survey/answers", Some("u1"), r#"{"question": 7, "value": "guilty"}"#))
            .await;
        let body = json(resp).await;
        assert_eq!(body["answers"]["7"][0], "guilty");
        assert_eq!(body["progress_percent"], 7);

        let resp = srv.handle_request(request(Method::DELETE, "/drafts/journal", Some("u1"), "")).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let resp = srv.handle_request(request(Method::GET, "/drafts/notes", Some("u1"), "")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_metrics_access() {
        let srv = server();
        let resp = srv.handle_request(request(Method::GET, "/admin/metrics", Some("u1"), "")).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let resp = srv
            .handle_request(request(Method::GET, "/admin/metrics?days=30", Some("root"), ""))
            .await;
        assert_eq!(json(resp).await["window_days"], 30);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let srv = server();
        let resp = srv.handle_request(request(Method::GET, "/nope", Some("u1"), "")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
