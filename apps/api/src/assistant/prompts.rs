// Prompt text for DoubtGPT. Prompts are plain string concatenation over the
// run output; nothing else about the user's session is sent.

/// Instruction block placed before the output on the first explanation.
pub const EXPLAIN_INSTRUCTIONS: &str = "\
You are a helpful coding assistant. Always respond based on the code or error provided below, unless the user clearly refers to a different context.

Answer **concisely** (4–6 lines max), use **markdown formatting**, and explain with bullet points or numbered steps if needed. Avoid unnecessary fluff.

If user asks for more detailed answers or explanation give answers upto 10 lines max";

/// Instruction block placed after the user's question on follow-ups.
pub const FOLLOW_UP_INSTRUCTIONS: &str = "\
Instructions:
- Only refer to the code/output above unless user specifies otherwise.
- Answer in 4–6 lines max.
- Format clearly with bullet points or steps.";

/// The user-side message shown for the first explanation.
pub const EXPLAIN_REQUEST_MESSAGE: &str = "Can you explain this clearly in 4–6 lines?";

const CONTEXT_HEADER: &str = "--- Code or Output ---";
const QUESTION_HEADER: &str = "--- User Question ---";

pub fn explain_prompt(context: &str) -> String {
    format!("\n{EXPLAIN_INSTRUCTIONS}\n\n{CONTEXT_HEADER}\n{context}\n")
}

pub fn follow_up_prompt(context: &str, question: &str) -> String {
    format!(
        "\n{CONTEXT_HEADER}\n{context}\n\n{QUESTION_HEADER}\n{question}\n\n{FOLLOW_UP_INSTRUCTIONS}\n"
    )
}
