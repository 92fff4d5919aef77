//! Adapter layer: Convert Gemini DTOs to domain models
//!
//! This is the ONLY place where Gemini response types are turned into
//! domain types. If the response format changes, only this file and
//! dto.rs need to change.

use super::dto;
use crate::enrichment::domain::{EnrichmentError, IdentifiedTrack, clamp_energy};

/// Concatenated text of the first candidate.
///
/// An empty candidate list is an error; an empty text is not.
pub fn response_text(response: dto::GenerateContentResponse) -> Result<String, EnrichmentError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked: {}", r))
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(EnrichmentError::InvalidResponse(reason));
    };

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| match part {
                    dto::Part::Text { text } => Some(text),
                    dto::Part::InlineData { .. } => None,
                })
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text)
}

/// Parse a structured answer, treating an empty body as `{}`.
fn parse_answer<T: serde::de::DeserializeOwned + Default>(text: &str) -> Result<T, EnrichmentError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(text).map_err(|e| EnrichmentError::Parse(e.to_string()))
}

/// Energy from the energy prompt's answer, clamped into 1..=10.
pub fn to_energy(response: dto::GenerateContentResponse) -> Result<u8, EnrichmentError> {
    let answer: dto::EnergyAnswer = parse_answer(&response_text(response)?)?;
    if let Some(ref reasoning) = answer.reasoning {
        tracing::debug!(target: "enrichment::gemini", %reasoning, "Energy reasoning");
    }
    Ok(clamp_energy(answer.energy.unwrap_or(0)))
}

/// Free-text narration, trimmed.
pub fn to_narration(response: dto::GenerateContentResponse) -> Result<String, EnrichmentError> {
    Ok(response_text(response)?.trim().to_string())
}

/// Identification from the audio prompt's answer.
///
/// `None` unless both title and artist were recognised.
pub fn to_identified(
    response: dto::GenerateContentResponse,
) -> Result<Option<IdentifiedTrack>, EnrichmentError> {
    let answer: dto::IdentifyAnswer = parse_answer(&response_text(response)?)?;
    let identified = IdentifiedTrack {
        title: answer.title,
        artist: answer.artist,
        bpm: answer.bpm,
        key: answer.key,
        energy: answer.energy.filter(|&e| e != 0).map(clamp_energy),
    };
    Ok(identified.is_identified().then_some(identified))
}

/// Map a non-success HTTP response to an error, preferring the API's message.
pub fn to_api_error(status: u16, body: &str) -> EnrichmentError {
    match serde_json::from_str::<dto::ErrorResponse>(body) {
        Ok(envelope) => EnrichmentError::ApiError(format!(
            "{} ({})",
            envelope.error.message,
            envelope.error.status.unwrap_or_else(|| envelope.error.code.to_string())
        )),
        Err(_) => EnrichmentError::Network(format!(
            "HTTP {}: {}",
            status,
            body.chars().take(200).collect::<String>()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> dto::GenerateContentResponse {
        serde_json::from_str(body).unwrap()
    }

    fn answer(text: &str) -> dto::GenerateContentResponse {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        });
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_response_text_joins_parts() {
        let r = response(r#"{"candidates": [{"content": {"parts": [{"text": "a"}, {"text": "b"}]}}]}"#);
        assert_eq!(response_text(r).unwrap(), "ab");
    }

    #[test]
    fn test_no_candidates_is_invalid() {
        let r = response(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
        let err = response_text(r).unwrap_err();
        assert!(matches!(err, EnrichmentError::InvalidResponse(ref m) if m.contains("SAFETY")));
    }

    #[test]
    fn test_to_energy() {
        assert_eq!(to_energy(answer(r#"{"energy": 7, "reasoning": "driving"}"#)).unwrap(), 7);
        assert_eq!(to_energy(answer(r#"{"energy": 14}"#)).unwrap(), 10);
        // Missing or zero falls back to neutral
        assert_eq!(to_energy(answer("{}")).unwrap(), 5);
        assert_eq!(to_energy(answer("")).unwrap(), 5);
        assert_eq!(to_energy(answer(r#"{"energy": 0}"#)).unwrap(), 5);
    }

    #[test]
    fn test_to_energy_rejects_garbage() {
        assert!(matches!(to_energy(answer("seven")), Err(EnrichmentError::Parse(_))));
    }

    #[test]
    fn test_to_identified() {
        let r = answer(r#"{"title": "Cola", "artist": "CamelPhat", "bpm": 122.5, "key": "8A", "energy": 6}"#);
        let identified = to_identified(r).unwrap().unwrap();
        assert_eq!(identified.title.as_deref(), Some("Cola"));
        assert_eq!(identified.bpm, Some(122.5));
        assert_eq!(identified.energy, Some(6));
    }

    #[test]
    fn test_to_identified_needs_title_and_artist() {
        assert!(to_identified(answer(r#"{"title": "Cola"}"#)).unwrap().is_none());
        assert!(to_identified(answer(r#"{"title": "", "artist": "X"}"#)).unwrap().is_none());
        assert!(to_identified(answer("")).unwrap().is_none());
    }

    #[test]
    fn test_to_api_error() {
        let err = to_api_error(400, r#"{"error": {"code": 400, "message": "bad key", "status": "INVALID_ARGUMENT"}}"#);
        assert!(matches!(err, EnrichmentError::ApiError(ref m) if m.contains("bad key")));

        let err = to_api_error(502, "<html>gateway</html>");
        assert!(matches!(err, EnrichmentError::Network(ref m) if m.starts_with("HTTP 502")));
    }
}
