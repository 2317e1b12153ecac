//! SSE streaming for `streamGenerateContent`.
//!
//! The endpoint returns a server-sent event stream where each `data:` line
//! carries a JSON chunk shaped like the non-streaming response. The HTTP
//! byte stream gives no line-boundary guarantees, so bytes are buffered
//! and drained one complete line at a time.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use tandem_types::llm::ProviderError;

use super::client::{extract_error_message, map_error_status};
use super::types::{GeminiErrorBody, GeminiRequest, GeminiResponse};

/// Open the SSE stream and normalize it into text fragments.
///
/// Chunks without renderable text (safety metadata, usage-only trailers)
/// are dropped rather than surfaced as empty fragments.
pub(crate) fn create_gemini_stream(
    client: &reqwest::Client,
    url: &str,
    body: GeminiRequest,
    api_key: &SecretString,
) -> Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send + 'static>> {
    let client = client.clone();
    let url = url.to_string();
    let api_key = api_key.expose_secret().to_string();

    Box::pin(async_stream::try_stream! {
        let response = client
            .post(&url)
            .header("x-goog-api-key", &api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Provider {
                message: e.to_string(),
            })?;

        let status = response.status();
        let response = if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = %status, body = %error_body, "Gemini stream API error response");
            Err(map_error_status(
                status.as_u16(),
                &extract_error_message(&error_body),
            ))?;
            unreachable!()
        } else {
            response
        };

        let mut byte_stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk.map_err(|e| ProviderError::Stream(e.to_string()))?;
            buffer.extend_from_slice(&chunk);

            // Splitting only at newlines keeps multi-byte characters intact
            // even when the transport slices them across chunks.
            while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
                let line_bytes: Vec<u8> = buffer.drain(..=newline).collect();
                let line = String::from_utf8_lossy(&line_bytes);
                if let Some(text) = process_sse_line(line.trim_end())? {
                    yield text;
                }
            }
        }

        // Trailing data without a final newline.
        if !buffer.is_empty() {
            let line = String::from_utf8_lossy(&buffer).to_string();
            if let Some(text) = process_sse_line(line.trim_end())? {
                yield text;
            }
        }
    })
}

/// Parse one SSE line into an optional text fragment.
///
/// Returns `Ok(None)` for blank lines, comments, non-data fields, and
/// data chunks that contain no text. An in-stream error payload turns
/// into a [`ProviderError`].
fn process_sse_line(line: &str) -> Result<Option<String>, ProviderError> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let data = data.trim_start();
    if data.is_empty() {
        return Ok(None);
    }

    // The error envelope would also parse as an (empty) response chunk,
    // so it has to be checked first.
    if let Ok(envelope) = serde_json::from_str::<GeminiErrorBody>(data) {
        let message = match envelope.error.code {
            Some(code) => format!("{code}: {}", envelope.error.message),
            None => envelope.error.message,
        };
        return Err(ProviderError::Stream(message));
    }

    let chunk: GeminiResponse = serde_json::from_str(data)
        .map_err(|e| ProviderError::Deserialization(format!("invalid stream chunk: {e}")))?;

    let text: String = chunk
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}
