use crate::domain::RetrievedDocument;

/// Heading placed before retrieved context in the outbound prompt.
pub const CONTEXT_HEADER: &str = "Relevant previous conversation:";

/// Separates retrieved context from the user's message.
pub const PROMPT_SEPARATOR: &str = "\n\n---\n\n";

/// Build the prompt sent to the model.
///
/// Without context the user text is sent verbatim. Otherwise the context
/// documents are listed one per line in the order given (most relevant first),
/// followed by [`PROMPT_SEPARATOR`] and the user text.
pub fn compose_prompt(context: &[RetrievedDocument], user_text: &str) -> String {
    if context.is_empty() {
        return user_text.to_string();
    }

    let mut prompt = String::from(CONTEXT_HEADER);
    for document in context {
        prompt.push('\n');
        prompt.push_str(document.content());
    }
    prompt.push_str(PROMPT_SEPARATOR);
    prompt.push_str(user_text);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentMetadata;

    fn doc(content: &str, score: f32) -> RetrievedDocument {
        RetrievedDocument::new(content, DocumentMetadata::new("2024-01-01T00:00:00Z"), score)
    }

    #[test]
    fn test_no_context_passes_user_text_through() {
        assert_eq!(compose_prompt(&[], "  hello  "), "  hello  ");
    }

    #[test]
    fn test_context_precedes_user_text_in_given_order() {
        let context = vec![doc("best match", 0.9), doc("second match", 0.4)];

        let prompt = compose_prompt(&context, "What now?");

        assert_eq!(
            prompt,
            "Relevant previous conversation:\nbest match\nsecond match\n\n---\n\nWhat now?"
        );
    }

    #[test]
    fn test_composition_is_deterministic() {
        let context = vec![doc("a", 0.5)];
        assert_eq!(compose_prompt(&context, "q"), compose_prompt(&context, "q"));
    }
}
