use crate::models::{ConversationTurn, Slot, TripCriteria};
use crate::services::ai::{LlmProvider, Message};
use crate::services::tracker::question_for;

const SYSTEM_PROMPT: &str = r#"You are the assistant of a flight search chat. The traveller did not answer your last question, so you need to ask for the same piece of information again in different words.

Rules:
- Reply with ONE short question and nothing else (no greeting, no markdown, no lists).
- Do not repeat your previous question word for word.
- Do not invent flights, prices or dates.
- If the traveller seemed confused, give a brief example answer in the question itself.
"#;

/// Recent turns kept in the prompt.
const HISTORY_LIMIT: usize = 10;

/// Asks the LLM to re-word the question for `slot`.
pub async fn rephrase_question(
    llm: &dyn LlmProvider,
    slot: Slot,
    criteria: &TripCriteria,
    transcript: &[ConversationTurn],
) -> anyhow::Result<String> {
    let system = format!(
        "{SYSTEM_PROMPT}\nInformation still needed: {} (your previous question was: \"{}\").\nKnown so far: {}.",
        slot.as_str().replace('_', " "),
        question_for(slot),
        criteria.summary(),
    );

    let response = llm.chat(&system, &to_messages(transcript)).await?;
    Ok(clean_reply(&response))
}

/// Maps the transcript to chat messages that start with a user turn and
/// alternate roles; consecutive turns from the same side are joined.
pub fn to_messages(transcript: &[ConversationTurn]) -> Vec<Message> {
    let start = transcript.len().saturating_sub(HISTORY_LIMIT);
    let mut messages: Vec<Message> = Vec::new();

    for turn in &transcript[start..] {
        let role = turn.role.as_str();
        if messages.is_empty() && role != "user" {
            continue;
        }
        match messages.last_mut() {
            Some(last) if last.role == role => {
                last.content.push('\n');
                last.content.push_str(&turn.text);
            }
            _ => messages.push(Message {
                role: role.to_string(),
                content: turn.text.clone(),
            }),
        }
    }
    messages
}

fn clean_reply(response: &str) -> String {
    response
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_to_messages_merges_and_starts_with_user() {
        let transcript = vec![
            ConversationTurn::new(Role::Assistant, "Welcome!"),
            ConversationTurn::new(Role::User, "hi"),
            ConversationTurn::new(Role::User, "anyone?"),
            ConversationTurn::new(Role::Assistant, "Where are you flying from?"),
        ];
        let messages = to_messages(&transcript);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content, "hi\nanyone?");
        assert_eq!(messages[1].role, "assistant");
    }

    #[test]
    fn test_to_messages_keeps_recent_history() {
        let transcript: Vec<ConversationTurn> = (0..30)
            .map(|i| {
                let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
                ConversationTurn::new(role, format!("turn {i}"))
            })
            .collect();
        let messages = to_messages(&transcript);
        assert_eq!(messages.len(), HISTORY_LIMIT);
        assert_eq!(messages[0].content, "turn 20");
    }

    #[test]
    fn test_clean_reply() {
        assert_eq!(
            clean_reply("  \"Which city are you leaving from?\"\n"),
            "Which city are you leaving from?"
        );
    }
}
