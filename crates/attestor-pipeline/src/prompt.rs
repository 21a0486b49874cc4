//! Oracle prompt construction
//!
//! One fixed, versioned instruction template. The excerpt text is the only
//! variable part; nothing from previous excerpts or previous runs leaks in.

/// Version tag of the extraction instruction template.
pub const PROMPT_VERSION: &str = "v1";

/// Builds the extraction prompt for one excerpt.
pub struct ExtractionPrompt {
    excerpt_text: String,
}

impl ExtractionPrompt {
    /// Create a prompt builder for one excerpt's text.
    pub fn new(excerpt_text: impl Into<String>) -> Self {
        Self {
            excerpt_text: excerpt_text.into(),
        }
    }

    /// Build the complete prompt.
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Report excerpt:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.excerpt_text);
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a compliance analyst AI. The text below is one excerpt of a SOC 2 audit report. Extract the following, using only content actually present in the excerpt:

1. Auditor name and firm
2. Audit time period
3. Report scope
4. Control exceptions, each with the control identifier, the exception noted, and management's response
5. Short tags for control areas touched on (e.g. access control, encryption, backups)
6. System description bullet points
7. A tally of control test statuses

Return ONE JSON object with exactly these keys:

{
  "Auditor": "string, empty if not in this excerpt",
  "Time Period": "string, empty if not in this excerpt",
  "Scope": "string, empty if not in this excerpt",
  "Exceptions": [{"Control": "...", "Exception": "...", "Response": "..."}],
  "Tags": ["..."],
  "System Description": ["..."],
  "Status Counts": {"Passed": 0, "Passed with Exception": 0, "Excluded": 0}
}

Rules:
- Leave a field empty (or the list empty, or the count zero) when the excerpt says nothing about it
- Do not guess or infer facts that are not stated
- Counts must be non-negative integers"#;

const OUTPUT_FORMAT_REMINDER: &str =
    "Return ONLY the JSON object. No markdown code fences, no explanations.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_excerpt_text() {
        let prompt = ExtractionPrompt::new("Audit fieldwork covered January through June.").build();
        assert!(prompt.contains("Audit fieldwork covered January through June."));
    }

    #[test]
    fn test_prompt_requests_every_schema_key() {
        let prompt = ExtractionPrompt::new("text").build();
        for key in [
            "Auditor",
            "Time Period",
            "Scope",
            "Exceptions",
            "Tags",
            "System Description",
            "Status Counts",
            "Passed with Exception",
            "Excluded",
        ] {
            assert!(prompt.contains(key), "prompt missing key {}", key);
        }
    }

    #[test]
    fn test_prompt_demands_bare_json() {
        let prompt = ExtractionPrompt::new("text").build();
        assert!(prompt.contains("ONLY the JSON object"));
    }
}
