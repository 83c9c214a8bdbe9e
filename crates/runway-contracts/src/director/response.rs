use super::failure::ParseFailure;

/// Strips surrounding whitespace and an optional markdown code fence from model output.
pub fn extract_json_payload(content: &str) -> Result<&str, ParseFailure> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ParseFailure::EmptyContent);
    }
    let unfenced = if let Some(rest) = trimmed.split_once("```json").map(|(_, rest)| rest) {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some(rest) = trimmed.split_once("```").map(|(_, rest)| rest) {
        rest.split("```").next().unwrap_or(rest)
    } else {
        trimmed
    };
    let payload = unfenced.trim();
    if payload.is_empty() {
        return Err(ParseFailure::EmptyContent);
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_passes_through() {
        assert_eq!(extract_json_payload("  {\"a\": 1}\n"), Ok("{\"a\": 1}"));
    }

    #[test]
    fn json_fence_is_unwrapped() {
        let content = "Here you go:\n```json\n{\"preset\": \"minimal\"}\n```\nEnjoy";
        assert_eq!(extract_json_payload(content), Ok("{\"preset\": \"minimal\"}"));
    }

    #[test]
    fn bare_fence_is_unwrapped() {
        let content = "```\n{}\n```";
        assert_eq!(extract_json_payload(content), Ok("{}"));
    }

    #[test]
    fn blank_content_is_rejected() {
        assert_eq!(extract_json_payload("   "), Err(ParseFailure::EmptyContent));
        assert_eq!(
            extract_json_payload("```json\n```"),
            Err(ParseFailure::EmptyContent)
        );
    }
}
