//! Prompt builders for the two analysis phases.

const PREAMBLE: &str = "You are an assistant helping a student understand a Moodle quiz question.";

fn push_question(lines: &mut Vec<String>, question: &str, answers: &[String]) {
    lines.push(String::new());
    lines.push(format!("Question: {}", question));
    lines.push("Answers:".to_string());
    lines.extend(
        answers
            .iter()
            .enumerate()
            .map(|(index, answer)| format!("{}. {}", index, answer)),
    );
}

/// Choice and confidence only.
pub fn fast_prompt(question: &str, answers: &[String]) -> String {
    let mut lines: Vec<String> = [
        PREAMBLE,
        "Pick the most likely correct answer.",
        "Return ONLY JSON with this shape:",
        r#"{ "choiceIndex": number, "confidence": number }"#,
        "Rules:",
        "- choiceIndex is 0-based.",
        "- confidence is between 0 and 1.",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect();
    push_question(&mut lines, question, answers);
    lines.join("\n")
}

/// Explanation of an already chosen answer plus a reason per other answer.
pub fn deep_prompt(question: &str, answers: &[String], choice_index: usize, confidence: f64) -> String {
    let mut lines: Vec<String> = [
        PREAMBLE,
        "Explain the suggested answer and why the other options are likely incorrect.",
        "Return ONLY JSON with this shape:",
        r#"{ "choiceIndex": number, "confidence": number, "explanation": string, "wrongAnswers": { "index": "reason" } }"#,
        "Rules:",
        "- choiceIndex is 0-based.",
        "- wrongAnswers must include every index except the chosen one.",
        "- keep explanations concise and practical.",
        "- if unsure, still provide a best-effort short reason.",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect();
    push_question(&mut lines, question, answers);
    lines.push(String::new());
    lines.push(format!("Chosen: {}", choice_index));
    lines.push(format!("Confidence: {}", confidence));
    lines.join("\n")
}
