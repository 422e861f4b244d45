//! HTTP service wiring
//!
//! A small axum app exposing the filing agent: `POST /search` runs the
//! agent loop, the rest is liveness and static metadata.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::agent::{
    prompts, run_filing_loop, types::Message, AgentLoopInput, LlmClient, LoopConfig, LoopOutcome,
};
use crate::agent::parse_company_filing;
use crate::config::Config;
use crate::models::{FilingRequest, FilingResponse};
use crate::tools::{
    FilingSearchTool, GeneralWebSearchTool, Jurisdiction, ReadDocumentTool, SerperClient,
    ToolRegistry,
};
use crate::{Error, Result};

// ---- App State ----

/// Shared, read-only state for the service. Built once at startup from
/// configuration; no per-request mutation.
#[derive(Clone)]
pub struct AppState {
    llm: Arc<LlmClient>,
    tools: Arc<ToolRegistry>,
    loop_config: LoopConfig,
}

impl AppState {
    /// Build the service state: LLM client, Serper client, and the five
    /// fixed tools.
    pub fn from_config(config: &Config) -> Result<Self> {
        let llm = Arc::new(LlmClient::new(config.llm.clone())?);
        let serper = Arc::new(SerperClient::new(config.search.clone())?);

        let mut registry = ToolRegistry::new();
        registry.register(FilingSearchTool::new(
            Jurisdiction::UnitedStates,
            serper.clone(),
        )?);
        registry.register(FilingSearchTool::new(Jurisdiction::Canada, serper.clone())?);
        registry.register(FilingSearchTool::new(Jurisdiction::Brazil, serper.clone())?);
        registry.register(GeneralWebSearchTool::new(serper));
        registry.register(ReadDocumentTool::new(config.fetch.clone())?);

        info!("Registered {} tools: {:?}", registry.count(), registry.names());

        Ok(AppState {
            llm,
            tools: Arc::new(registry),
            loop_config: LoopConfig::server(&config.limits),
        })
    }

    /// Run the agent loop for one query and coerce the result. Shared by
    /// the HTTP handler and the CLI.
    pub async fn search_filing(&self, query: &str) -> Result<FilingResponse> {
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("Query must not be empty".to_string()));
        }

        let request_id = Uuid::new_v4();
        info!("Processing search request {}: {}", request_id, query);

        let system_prompt = prompts::filing_system_prompt()?;
        let messages = vec![Message::system(system_prompt), Message::user(query)];

        let output = run_filing_loop(AgentLoopInput {
            messages,
            llm_client: &self.llm,
            tools: &self.tools,
            config: self.loop_config.clone(),
        })
        .await?;

        info!(
            "Request {} finished: outcome={:?}, {} steps, {}ms",
            request_id,
            output.trace.outcome,
            output.trace.steps.len(),
            output.trace.total_duration_ms
        );

        let response = match &output.trace.outcome {
            outcome if outcome.is_answer() => match parse_company_filing(&output.response) {
                Ok(filing) => FilingResponse::ok(filing),
                Err(e) => {
                    error!(
                        "Request {}: structured output parse failed: {}",
                        request_id, e
                    );
                    FilingResponse::fail(e.to_string())
                }
            },
            LoopOutcome::LlmError(e) => {
                error!("Request {}: reasoning service error: {}", request_id, e);
                FilingResponse::fail(format!("Reasoning service error: {}", e))
            }
            _ => FilingResponse::fail(output.response.clone()),
        };

        Ok(response)
    }
}

// ---- Error Handling ----

struct AppError(Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = Json(FilingResponse::fail(self.0.to_string()));
        (status, body).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError(err)
    }
}

// ---- Response Types ----

#[derive(Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
    description: &'static str,
    endpoints: ServiceEndpoints,
}

#[derive(Serialize)]
struct ServiceEndpoints {
    search: &'static str,
    health: &'static str,
    examples: &'static str,
}

#[derive(Serialize)]
struct HealthInfo {
    status: &'static str,
    service: &'static str,
}

#[derive(Serialize)]
struct ExampleQuery {
    description: &'static str,
    query: &'static str,
}

#[derive(Serialize)]
struct ExamplesInfo {
    examples: Vec<ExampleQuery>,
}

// ---- Handlers ----

async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "FilingAgent",
        version: crate::VERSION,
        description: "Search and extract structured data from official company filings",
        endpoints: ServiceEndpoints {
            search: "POST /search - Search for company filings",
            health: "GET /health - Health check",
            examples: "GET /examples - Example queries",
        },
    })
}

/// Liveness probe. Never touches credentials or external services.
async fn health() -> Json<HealthInfo> {
    Json(HealthInfo {
        status: "healthy",
        service: "FilingAgent",
    })
}

async fn examples() -> Json<ExamplesInfo> {
    Json(ExamplesInfo {
        examples: vec![
            ExampleQuery {
                description: "Search for Microsoft's latest 10-K filing",
                query: "Find Microsoft's most recent 10-K annual report",
            },
            ExampleQuery {
                description: "Search for a Brazilian company's reference form",
                query: "Find Petrobras Formulário de Referência",
            },
            ExampleQuery {
                description: "Search for a Canadian company's annual report",
                query: "Find Shopify's latest annual report on SEDAR",
            },
            ExampleQuery {
                description: "Search for Apple's risk factors",
                query: "Find Apple's risk factors in their latest 10-K",
            },
        ],
    })
}

/// Run the agent loop for one filing query.
async fn search(
    State(state): State<AppState>,
    Json(request): Json<FilingRequest>,
) -> std::result::Result<Json<FilingResponse>, AppError> {
    let response = state.search_filing(&request.query).await?;
    Ok(Json(response))
}

// ---- Router ----

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/examples", get(examples))
        .route("/search", post(search))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_is_static() {
        let body = health().await;
        assert_eq!(body.0.status, "healthy");
    }

    #[tokio::test]
    async fn test_examples_cover_all_jurisdictions() {
        let body = examples().await;
        let queries: Vec<&str> = body.0.examples.iter().map(|e| e.query).collect();
        assert!(queries.iter().any(|q| q.contains("10-K")));
        assert!(queries.iter().any(|q| q.contains("Petrobras")));
        assert!(queries.iter().any(|q| q.contains("SEDAR")));
    }

    #[test]
    fn test_state_builds_five_tools() {
        let state = AppState::from_config(&Config::minimal()).unwrap();
        assert_eq!(state.tools.count(), 5);
        let mut names = state.tools.names();
        names.sort();
        assert_eq!(
            names,
            vec![
                "general_web_search",
                "read_document_from_url",
                "search_cvm_empresas_net",
                "search_sec_edgar",
                "search_sedar_plus",
            ]
        );
    }
}
