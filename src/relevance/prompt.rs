use crate::preferences::UserProfile;
use crate::relevance::snippet::EmailSnippet;

const NOT_SPECIFIED: &str = "not specified";

/// One prompt covering the whole batch.
pub fn build_prompt(snippets: &[EmailSnippet], profile: &UserProfile) -> String {
    let mut prompt = String::from(
        "You are screening newsletter emails for one reader.\n\
         Decide for each email whether it is worth the reader's time given what they do and care about.\n\n",
    );

    prompt.push_str("## Reader\n\n");
    prompt.push_str(&format!("- Occupation: {}\n", or_unspecified(&profile.occupation)));
    prompt.push_str(&format!("- Current work: {}\n", or_unspecified(&profile.current_work)));
    let topics: Vec<&str> = profile
        .topics
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    prompt.push_str(&format!(
        "- Topics: {}\n\n",
        if topics.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            topics.join(", ")
        }
    ));

    prompt.push_str("## Emails\n\n");
    for snippet in snippets {
        prompt.push_str(&format!("[{}] {}\n", snippet.id, snippet.snippet));
    }

    prompt.push_str(
        "\n## Rules\n\n\
         - Include emails about the reader's topics, occupation or current work.\n\
         - Exclude promotions, receipts, account notices and anything off-topic.\n\
         - Give exactly one decision per email id, using the id in brackets.\n\n\
         ## Response Format\n\n\
         Respond with a JSON object only:\n\
         {\"decisions\": [{\"id\": \"<email id>\", \"include\": true, \"reason\": \"<under 20 words>\"}]}\n",
    );

    prompt
}

fn or_unspecified(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() { NOT_SPECIFIED } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(id: &str, text: &str) -> EmailSnippet {
        EmailSnippet {
            id: id.to_string(),
            snippet: text.to_string(),
        }
    }

    #[test]
    fn test_prompt_lists_profile_and_every_email() {
        let profile = UserProfile {
            occupation: "Hardware analyst".to_string(),
            current_work: "Export controls report".to_string(),
            topics: vec!["semiconductors".to_string(), " ".to_string(), "trade".to_string()],
        };
        let prompt = build_prompt(
            &[
                snippet("m1", "Subject: Chips | Exports rose"),
                snippet("m2", "Subject: Sale | 50% off"),
            ],
            &profile,
        );

        assert!(prompt.contains("- Occupation: Hardware analyst"));
        assert!(prompt.contains("- Current work: Export controls report"));
        assert!(prompt.contains("- Topics: semiconductors, trade"));
        assert!(prompt.contains("[m1] Subject: Chips | Exports rose"));
        assert!(prompt.contains("[m2] Subject: Sale | 50% off"));
        assert!(prompt.contains(r#"{"decisions": [{"id""#));
    }

    #[test]
    fn test_empty_profile_is_marked_unspecified() {
        let prompt = build_prompt(&[snippet("m1", "Subject: x | y")], &UserProfile::default());
        assert!(prompt.contains("- Occupation: not specified"));
        assert!(prompt.contains("- Current work: not specified"));
        assert!(prompt.contains("- Topics: not specified"));
    }
}
