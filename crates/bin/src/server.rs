//! Web form: enter a ticker, get its earnings chart.

use crate::error::{Result, ServerError};
use axum::Router;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use earnviz::PipelineError;
use earnviz::pipeline::chart_for_ticker;
use earnviz_data::Provider;
use earnviz_output::{ChartFormat, Destination, escape_markup};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// State shared by all requests.
#[derive(Debug)]
pub struct AppState {
    provider: Provider,
}

impl AppState {
    /// Serve charts from `provider`.
    pub const fn new(provider: Provider) -> Self {
        Self { provider }
    }

    /// The statement provider.
    pub const fn provider(&self) -> &Provider {
        &self.provider
    }
}

/// Submitted form fields.
#[derive(Debug, Deserialize)]
pub struct TickerForm {
    /// Ticker as typed.
    pub ticker: String,
}

/// Routes of the web form.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process stops.
///
/// # Errors
///
/// Fails if the address cannot be bound.
pub async fn serve(addr: SocketAddr, provider: Provider) -> Result<()> {
    let router = app_router(Arc::new(AppState::new(provider)));
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

async fn index() -> Html<String> {
    Html(page("", ""))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TickerForm>,
) -> std::result::Result<Html<String>, FormError> {
    let destination = Destination::Memory(ChartFormat::Svg);
    let chart = chart_for_ticker(state.provider(), &form.ticker, &destination)
        .await
        .map_err(|source| FormError {
            ticker: form.ticker.clone(),
            source: source.into(),
        })?;

    let body = format!(
        r#"<h2>{title}</h2>
<img src="{uri}" alt="{title}">"#,
        title = escape_markup(&chart.title),
        uri = chart.artifact.to_data_uri(),
    );
    Ok(Html(page(&chart.statement.symbol, &body)))
}

/// A failed submission, rendered as the form with a message.
#[derive(Debug)]
struct FormError {
    ticker: String,
    source: ServerError,
}

impl FormError {
    fn status(&self) -> StatusCode {
        match &self.source {
            ServerError::Pipeline(e) if e.is_invalid_input() => StatusCode::BAD_REQUEST,
            ServerError::Pipeline(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ServerError::Pipeline(PipelineError::Data(_)) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(ticker = %self.ticker, error = %self.source, "chart request failed");
        } else {
            tracing::info!(ticker = %self.ticker, error = %self.source, "chart request rejected");
        }
        let body = format!(
            r#"<p class="error">{}</p>"#,
            escape_markup(&self.source.to_string())
        );
        (status, Html(page(&self.ticker, &body))).into_response()
    }
}

fn page(ticker: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>earnviz</title>
</head>
<body>
<form method="post" action="/">
<label for="ticker">Ticker</label>
<input id="ticker" name="ticker" value="{ticker}" autofocus>
<button type="submit">Chart</button>
</form>
{body}
</body>
</html>
"#,
        ticker = escape_markup(ticker),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use earnviz_data::DataError;
    use earnviz_output::RenderError;

    fn status_for(source: ServerError) -> StatusCode {
        FormError {
            ticker: "X".to_string(),
            source,
        }
        .status()
    }

    #[test]
    fn test_status_mapping() {
        let invalid = PipelineError::Data(DataError::InvalidSymbol(String::new()));
        assert_eq!(status_for(invalid.into()), StatusCode::BAD_REQUEST);

        let missing = PipelineError::Data(DataError::MissingData {
            symbol: "X".to_string(),
            reason: "no statement".to_string(),
        });
        assert_eq!(status_for(missing.into()), StatusCode::NOT_FOUND);

        let upstream = PipelineError::Data(DataError::Parse("bad json".to_string()));
        assert_eq!(status_for(upstream.into()), StatusCode::BAD_GATEWAY);

        let render = PipelineError::Render(RenderError::EmptyGraph);
        assert_eq!(status_for(render.into()), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_page_escapes_ticker() {
        let html = page("\"><script>", "");
        assert!(html.contains(r#"value="&quot;&gt;&lt;script&gt;""#));
        assert!(!html.contains("<script>"));
    }
}
