//! A rule-based training assistant.
//!
//! Questions are matched against a fixed list of patterns; the first match wins.

use std::sync::LazyLock;

use regex::Regex;

/// Reply when no rule matches.
pub const FALLBACK: &str = "Sorry, I'm a demo assistant. Try: \"improve 100m\" or \"archery eye\".";

static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (
            r"100m|100 m|sprint",
            "To improve 100m: work on reaction time, explosive starts, stride length, and strength. Do short sprints + plyometrics.",
        ),
        (
            r"archery|eye|aim",
            "Archery tips: consistent anchor point, focus on the target with your dominant eye, breathing control, and steady release.",
        ),
        (
            r"diet|nutrition",
            "General sports nutrition: balance carbs around training, include lean protein for recovery, stay hydrated.",
        ),
    ]
    .into_iter()
    .filter_map(|(pattern, reply)| Regex::new(pattern).ok().map(|re| (re, reply)))
    .collect()
});

/// Answer a question. Blank input gets no reply.
#[must_use]
pub fn reply(question: &str) -> Option<&'static str> {
    let question = question.trim().to_lowercase();
    if question.is_empty() {
        return None;
    }
    let answer = RULES
        .iter()
        .find(|(re, _)| re.is_match(&question))
        .map_or(FALLBACK, |(_, reply)| *reply);
    Some(answer)
}
