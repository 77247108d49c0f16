#![deny(missing_docs)]

//! # Serve Command
//!
//! HTTP surface over the merge and reporting operations:
//!
//! - `POST /combine`: rule set in, merged document out as
//!   `application/octet-stream`; the artifact locator and viewer link ride
//!   in response headers.
//! - `POST /methods`: list of source URLs in, operations report out.
//! - `POST /validate`: list of source URLs in, validation report out.
//!
//! Each request owns its entire pipeline state; requests never share
//! collision sets or server lists.

use crate::error::CliResult;
use crate::fetch::SourceFetcher;
use crate::store::DirStore;
use actix_web::http::StatusCode;
use actix_web::{middleware, post, web, App, HttpResponse, HttpServer};
use oasmerge_core::{
    run_combine, run_methods_report, run_validation_report, AppError, AppResult, RuleSet,
};
use std::path::PathBuf;

/// Arguments for the serve command.
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind.
    #[clap(long, default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Directory published artifacts are stored in.
    #[clap(long, default_value = "artifacts")]
    pub artifact_dir: PathBuf,

    /// Base URL of a viewer UI used to build viewer links.
    #[clap(long, env = "OASMERGE_VIEWER_BASE")]
    pub viewer_base: Option<String>,
}

/// Shared per-process configuration handed to every handler.
#[derive(Debug, Clone)]
struct ServeContext {
    artifact_dir: PathBuf,
    viewer_base: Option<String>,
}

/// Runs the HTTP server until interrupted.
pub fn execute(args: &ServeArgs) -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let context = ServeContext {
        artifact_dir: args.artifact_dir.clone(),
        viewer_base: args.viewer_base.clone(),
    };
    let bind = args.bind.clone();
    tracing::info!(%bind, "starting merge service");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(context.clone()))
                .wrap(middleware::Logger::default())
                .service(combine)
                .service(methods)
                .service(validate)
        })
        .bind(bind)?
        .run()
        .await
    })?;

    Ok(())
}

/// Maps core errors onto the HTTP taxonomy: bad rules are the caller's
/// fault, unreachable sources are upstream failures, unparseable sources
/// are unprocessable.
fn error_response(err: &AppError) -> HttpResponse {
    let status = match err {
        AppError::Configuration(_) => StatusCode::BAD_REQUEST,
        AppError::SourceUnavailable { .. } => StatusCode::BAD_GATEWAY,
        AppError::SourceParse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    HttpResponse::build(status).json(serde_json::json!({ "error": err.to_string() }))
}

/// Unwraps the double-layered `web::block` result into one response.
fn respond<T>(
    result: Result<AppResult<T>, actix_web::error::BlockingError>,
    render: impl FnOnce(T) -> HttpResponse,
) -> HttpResponse {
    match result {
        Ok(Ok(value)) => render(value),
        Ok(Err(err)) => error_response(&err),
        Err(e) => HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[post("/combine")]
async fn combine(context: web::Data<ServeContext>, rules: web::Json<RuleSet>) -> HttpResponse {
    let rules = rules.into_inner();
    let context = context.get_ref().clone();

    let result = web::block(move || {
        let store = DirStore::new(&context.artifact_dir);
        run_combine(&SourceFetcher, &store, &rules, context.viewer_base.as_deref())
    })
    .await;

    respond(result, |response| {
        let mut builder = HttpResponse::Ok();
        builder.content_type("application/octet-stream");
        builder.insert_header(("artifact-name", response.artifact_name.clone()));
        builder.insert_header((
            "content-disposition",
            format!("attachment; filename=openapi.{}", response.format.extension()),
        ));
        if let Some(locator) = &response.locator {
            builder.insert_header(("artifact-locator", locator.clone()));
        }
        if let Some(link) = &response.viewer_link {
            builder.insert_header(("viewer-link", link.clone()));
        }
        if let Some(error) = &response.storage_error {
            tracing::warn!(%error, "artifact storage failed; returning text inline only");
        }
        builder.body(response.text)
    })
}

#[post("/methods")]
async fn methods(sources: web::Json<Vec<String>>) -> HttpResponse {
    let sources = sources.into_inner();
    let result = web::block(move || run_methods_report(&SourceFetcher, &sources)).await;
    respond(result, |reports| HttpResponse::Ok().json(reports))
}

#[post("/validate")]
async fn validate(sources: web::Json<Vec<String>>) -> HttpResponse {
    let sources = sources.into_inner();
    let result = web::block(move || run_validation_report(&SourceFetcher, &sources)).await;
    respond(result, |reports| HttpResponse::Ok().json(reports))
}
