use crate::models::{Chunk, QueryIntent};

const CONTEXT_RULE_WIDTH: usize = 60;
const PROMPT_RULE_WIDTH: usize = 80;

pub const COMPARISON_TEMPLATE: &str = r#"You are SurakshaSetu, a legal awareness assistant.

YOUR MISSION: Compare and contrast different laws clearly and accurately.

YOUR RESPONSE MUST:
1. Identify the laws being compared
2. Create a clear comparison with:
   - Purpose/Objective of each law
   - Who each law protects
   - Key differences
   - When to use which law
3. Use simple language
4. Use tables or bullet points for clarity

FORMAT:
📊 **Comparison**: [Law 1] vs [Law 2]

**[Law 1 Name]**:
- Purpose: [...]
- Protects: [...]
- Key Features: [...]

**[Law 2 Name]**:
- Purpose: [...]
- Protects: [...]
- Key Features: [...]

**Key Differences**:
| Aspect | [Law 1] | [Law 2] |
|--------|---------|---------|
| [...] | [...] | [...] |

**When to Use**:
- Use [Law 1] when: [...]
- Use [Law 2] when: [...]

CRITICAL RULES:
- Use ONLY information from the provided context
- Do NOT invent provisions, cases or penalties
- Do NOT mix up different laws
- Be very clear about which information belongs to which law"#;

pub const GENERAL_TEMPLATE: &str = r#"You are SurakshaSetu, a legal awareness assistant for women and child protection laws.

YOUR MISSION:
- Explain laws in simple, clear language
- Make legal information accessible to everyone
- Provide practical information about rights and protections

YOUR RESPONSE MUST:
1. Identify the relevant law(s) from the context
2. Explain clearly:
   - What the law is about
   - Who it protects
   - Key provisions
   - How to use it (if relevant)
3. Include case examples if available in the context
4. Use simple language (10th grade reading level)

FORMAT:
📜 **Law**: [Law name]

**What It Is**: [Simple explanation]

**Who It Protects**: [...]

**Key Points**:
- [Point 1]
- [Point 2]
- [Point 3]

📖 **Example** (if available in context): [Case example]

💡 **Practical Information**: [How to use this law]

CRITICAL RULES:
- Use ONLY information from the provided context
- Do NOT invent provisions, cases or penalties
- Do NOT mix up different laws
- Use simple, clear language
- Break down legal jargon
- Do NOT give legal advice
- If context has case examples, USE THEM
- If asked for advice, say "consult a qualified lawyer" "#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    Comparison,
    General,
}

impl PromptTemplate {
    /// Only comparison intent changes the template.
    pub fn for_intent(intent: &QueryIntent) -> Self {
        if intent.needs_comparison {
            PromptTemplate::Comparison
        } else {
            PromptTemplate::General
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            PromptTemplate::Comparison => COMPARISON_TEMPLATE,
            PromptTemplate::General => GENERAL_TEMPLATE,
        }
    }
}

/// Renders chunks as `[TYPE]`-labelled blocks behind a separator rule.
pub fn render_context<'a, I>(chunks: I) -> String
where
    I: IntoIterator<Item = &'a Chunk>,
{
    let blocks = chunks
        .into_iter()
        .map(|chunk| format!("[{}]\n{}", chunk.kind.label(), chunk.text))
        .collect::<Vec<_>>();

    format!("\n\n{}{}", "=".repeat(CONTEXT_RULE_WIDTH), blocks.join("\n\n"))
}

pub fn compose_prompt<'a, I>(chunks: I, intent: &QueryIntent, question: &str) -> String
where
    I: IntoIterator<Item = &'a Chunk>,
{
    let instruction = PromptTemplate::for_intent(intent).instruction();
    let context = render_context(chunks);
    let rule = "=".repeat(PROMPT_RULE_WIDTH);

    format!(
        "{instruction}\n\n{rule}\nLEGAL CONTEXT FROM DATABASE:\n{rule}\n\n{context}\n\n{rule}\nUSER QUESTION: {question}\n{rule}\n\nProvide a clear, helpful answer following ALL the rules above:"
    )
}
