//! Prompt rendering for generative backends.

use docchat_core::Personality;
use minijinja::{context, Environment};

const ANSWER_TEMPLATE_NAME: &str = "answer";

const ANSWER_TEMPLATE: &str = "\
You are a helpful assistant with a {{ personality }} personality, answering questions about the user's documents.
{{ instruction }}
Use only the context below. If the answer is not in the context, say you don't know.

Context:
{{ context }}

Question: {{ question }}
Answer:";

/// Holds the compiled answer template.
///
/// The template name has no `.html` suffix, so document text is rendered
/// without auto-escaping.
#[derive(Debug)]
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl PromptBuilder {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(ANSWER_TEMPLATE_NAME, ANSWER_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render(
        &self,
        personality: Personality,
        context: &str,
        question: &str,
    ) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(ANSWER_TEMPLATE_NAME)?;
        template.render(context! {
            personality => personality.as_str(),
            instruction => personality.instruction(),
            context => context,
            question => question,
        })
    }
}
