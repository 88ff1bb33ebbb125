//! `${VAR}` placeholders in raw config text.
//!
//! Supported forms:
//! - `${VAR}`: the variable's value, or the placeholder unchanged when unset.
//! - `${VAR:-fallback}`: the value, or `fallback` when unset or blank.
//! - `$${`: a literal `${`.
//!
//! Blank values count as unset, the same rule the environment overrides use,
//! so `DISCORD_BOT_TOKEN=` in a `.env` file does not wipe a configured token.

/// Expand placeholders from the process environment.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

pub(crate) fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        if rest[..start].ends_with('$') {
            out.push_str(&rest[..start - 1]);
            out.push_str("${");
            rest = &rest[start + 2..];
            continue;
        }
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let body = &after[..end];
        let (name, fallback) = match body.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (body, None),
        };

        let value = (!name.is_empty())
            .then(|| lookup(name))
            .flatten()
            .filter(|v| !v.trim().is_empty());
        match (value, fallback) {
            (Some(value), _) => out.push_str(&value),
            (None, Some(fallback)) if !name.is_empty() => out.push_str(fallback),
            _ => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn env(name: &str) -> Option<String> {
        match name {
            "FEEDWATCH_TOKEN" => Some("abc.def".into()),
            "BLANK" => Some("  ".into()),
            "A" => Some("a".into()),
            "B" => Some("b".into()),
            _ => None,
        }
    }

    #[rstest]
    #[case("token = \"${FEEDWATCH_TOKEN}\"", "token = \"abc.def\"")]
    #[case("${FEEDWATCH_MISSING}", "${FEEDWATCH_MISSING}")]
    #[case("${A}:${B}/$C", "a:b/$C")]
    #[case("path = \"${FILENAME:-data/subreddits.json}\"", "path = \"data/subreddits.json\"")]
    #[case("${A:-fallback}", "a")]
    #[case("${BLANK}", "${BLANK}")]
    #[case("${BLANK:-x}", "x")]
    #[case("${MISSING:-}", "")]
    #[case("${}", "${}")]
    #[case("$${A}", "${A}")]
    #[case("a ${OPEN", "a ${OPEN")]
    #[case("plain text", "plain text")]
    #[case("héllo ${A} wörld", "héllo a wörld")]
    fn expands(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(substitute_env_with(input, env), expected);
    }

    #[test]
    fn process_environment_passthrough() {
        assert_eq!(substitute_env("no placeholders here"), "no placeholders here");
    }
}
