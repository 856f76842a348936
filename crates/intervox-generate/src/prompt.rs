//! Prompt templates for the interview assistant. Kept apart from the HTTP
//! client so wording changes never touch transport code.

/// Short acknowledgement spoken while the candidate is still answering.
pub fn filler(question: &str, partial_answer: &str) -> String {
    format!(
        "You are a friendly interviewer listening to a candidate's answer.\n\
         Question asked: \"{question}\"\n\
         What the candidate has said so far: \"{partial_answer}\"\n\n\
         Respond with ONE short, natural acknowledgement (under 10 words) that \
         shows you are listening. Examples: \"I see, go on...\", \
         \"That's interesting, tell me more.\"\n\
         Do not answer the question yourself. Do not ask a new question. \
         Reply with the acknowledgement only, no quotes."
    )
}

/// Per-answer assessment, requested as strict JSON.
pub fn qa_summary(question: &str, answer: &str) -> String {
    format!(
        "You are evaluating one answer from a practice interview.\n\
         Question: \"{question}\"\n\
         Answer: \"{answer}\"\n\n\
         Respond with ONLY a JSON object, no other text, in this exact shape:\n\
         {{\n\
           \"summary\": \"one or two sentence summary of the answer\",\n\
           \"keyPoints\": [\"up to three key points the candidate made\"],\n\
           \"clarity\": \"good\" | \"fair\" | \"poor\",\n\
           \"completeness\": \"good\" | \"fair\" | \"poor\"\n\
         }}"
    )
}

/// Whole-interview report, requested as strict JSON.
pub fn final_summary(qa_block: &str) -> String {
    format!(
        "You are writing the final report for a practice interview. Here are \
         the questions and the candidate's answers:\n\n{qa_block}\n\n\
         Respond with ONLY a JSON object, no other text, in this exact shape:\n\
         {{\n\
           \"overallSummary\": \"two or three sentence overall assessment\",\n\
           \"strengths\": [\"up to three strengths\"],\n\
           \"areasForImprovement\": [\"up to three areas to improve\"],\n\
           \"improvementPlan\": {{\n\
             \"shortTerm\": [\"one or two concrete short-term actions\"],\n\
             \"longTerm\": [\"one or two longer-term actions\"]\n\
           }},\n\
           \"overallScore\": \"excellent\" | \"good\" | \"fair\" | \"needs improvement\"\n\
         }}"
    )
}

/// Renders question/answer pairs into the block embedded in the final
/// report prompt, with the per-answer assessment attached where one exists.
pub fn qa_block(pairs: &[intervox_core::QaPair], assessments: &[intervox_core::QaSummary]) -> String {
    pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| {
            let mut entry = format!(
                "Q{n}: {q}\nA{n}: {a}",
                n = i + 1,
                q = pair.question,
                a = pair.answer
            );
            if let Some(assessment) = assessments.get(i) {
                entry.push_str(&format!("\nAssessment: {}", assessment.summary));
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
