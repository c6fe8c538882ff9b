//! Prompt templates for the generation collaborator.

/// Question-answering prompt over retrieved document context.
#[must_use]
pub fn answer_prompt(question: &str, context: &str) -> String {
    format!(
        "Based on the following context from a financial document, answer the question.\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question: {question}\n\
         \n\
         Provide a detailed answer with:\n\
         - Direct answer to the question\n\
         - Supporting evidence from the context\n\
         - Relevant metrics or data points\n\
         \n\
         Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_prompt_embeds_question_and_context() {
        let prompt = answer_prompt("What was revenue?", "[Source 1] Revenue was $10B.");
        assert!(prompt.contains("Question: What was revenue?"));
        assert!(prompt.contains("[Source 1] Revenue was $10B."));
    }
}
