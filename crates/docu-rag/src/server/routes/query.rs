//! Question answering endpoint with streamed responses

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::StreamExt;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::Error;
use crate::generation::PromptBuilder;
use crate::server::state::AppState;
use crate::types::{Citation, QueryRequest};

/// Handle POST /api/query
///
/// Retrieves the most relevant chunks for the question, then streams
/// the model's answer as server-sent events. The first event is a
/// `sources` event carrying the citations; answer text follows as
/// `{"delta": ...}` data frames, terminated by `[DONE]`.
///
/// Retrieval and chat request setup happen before the stream opens, so
/// a missing index or an unreachable provider surfaces as a regular
/// error response rather than a broken stream.
pub async fn query_documents(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Sse<ReceiverStream<Result<Event, Infallible>>>, Error> {
    let index = state.require_index()?;
    let top_k = request.top_k.unwrap_or(state.config().retrieval.top_k);

    tracing::info!(
        question_len = request.question.len(),
        history_len = request.history.len(),
        top_k,
        "Processing query"
    );

    let results = index.search(&request.question, top_k).await?;
    tracing::debug!(matches = results.len(), "Retrieved context chunks");

    let citations: Vec<Citation> = results
        .iter()
        .map(|result| Citation::from_chunk(&result.chunk, result.similarity))
        .collect();

    let messages = PromptBuilder::build_messages(&request, &results);
    let answer_stream = state.chat().stream_answer(&messages).await?;

    let (tx, rx) = tokio::sync::mpsc::channel::<Result<Event, Infallible>>(32);

    tokio::spawn(async move {
        let mut answer_stream = Box::pin(answer_stream);

        let sources = Event::default()
            .event("sources")
            .data(serde_json::to_string(&citations).unwrap_or_else(|_| "[]".to_string()));
        if tx.send(Ok(sources)).await.is_err() {
            return;
        }

        while let Some(fragment) = answer_stream.next().await {
            match fragment {
                Ok(delta) if delta.is_empty() => {}
                Ok(delta) => {
                    let event =
                        Event::default().data(serde_json::json!({ "delta": delta }).to_string());
                    if tx.send(Ok(event)).await.is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::error!("Answer stream failed: {}", e);
                    let event = Event::default().event("error").data(e.to_string());
                    let _ = tx.send(Ok(event)).await;
                    return;
                }
            }
        }

        let _ = tx.send(Ok(Event::default().data("[DONE]"))).await;
    });

    Ok(Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::default()))
}
