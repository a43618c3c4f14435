//! Topic form served over HTTP
//!
//! `GET /` renders the form, `POST /` runs one submission and renders the
//! summary followed by the run steps. Submissions are handled one at a time.

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    response::Html,
    routing::get,
    Router,
};
use html_escape::encode_text;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::services::{Briefing, NewsAssistant};

const TITLE: &str = "News Summarizer";

#[derive(Debug, Deserialize)]
pub struct TopicForm {
    #[serde(default)]
    pub topic: String,
}

pub struct FormState {
    assistant: Mutex<NewsAssistant>,
}

pub fn router(assistant: NewsAssistant) -> Router {
    let state = Arc::new(FormState {
        assistant: Mutex::new(assistant),
    });
    Router::new()
        .route("/", get(index).post(submit))
        .with_state(state)
}

/// Bind `addr` and serve the form until the process exits.
pub async fn serve(addr: &str, assistant: NewsAssistant) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Form server listening on http://{}/", addr);
    axum::serve(listener, router(assistant)).await?;
    Ok(())
}

async fn index() -> Html<String> {
    Html(page("", None))
}

async fn submit(State(state): State<Arc<FormState>>, Form(form): Form<TopicForm>) -> Html<String> {
    let mut assistant = state.assistant.lock().await;
    let body = match assistant.summarize(&form.topic).await {
        Ok(briefing) => render_briefing(&briefing),
        Err(e) => {
            error!(topic = %form.topic, error = %e, "Submission failed");
            format!("<p class=\"error\">{}</p>", encode_text(&e.to_string()))
        }
    };
    Html(page(&form.topic, Some(&body)))
}

fn render_briefing(briefing: &Briefing) -> String {
    format!(
        "<div class=\"summary\">{}</div>\n<p>Run Steps: </p>\n<pre><code>{}</code></pre>",
        encode_text(briefing.summary_text()).replace('\n', "<br>"),
        encode_text(&briefing.render_steps()),
    )
}

fn page(topic: &str, result: Option<&str>) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n\
<h1>{title}</h1>\n\
<form method=\"post\" action=\"/\">\n\
<label for=\"topic\">Enter topic:</label>\n\
<input id=\"topic\" name=\"topic\" type=\"text\" value=\"{topic}\">\n\
<button type=\"submit\">Run Assistant</button>\n\
</form>\n{result}\n</body>\n</html>\n",
        title = TITLE,
        topic = html_escape::encode_double_quoted_attribute(topic),
        result = result.unwrap_or(""),
    )
}
