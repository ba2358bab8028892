//! Message resolution
//!
//! Precedence, highest first:
//! 1. literal message returned by a failing predicate
//! 2. the rule set's override for the code
//! 3. the selected language table or caller catalog

use super::catalog::MessageSource;
use crate::errors::{ErrorCode, FormResult};
use crate::schema::RuleSet;

/// Produces the user-facing message for a failed rule.
pub fn resolve_message(
    rules: &RuleSet,
    code: ErrorCode,
    source: &MessageSource,
    literal: Option<String>,
) -> FormResult<String> {
    if let Some(literal) = literal {
        return Ok(literal);
    }
    if let Some(message) = rules.messages.get(&code) {
        return Ok(message.clone());
    }
    source.lookup(code).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Language;

    #[test]
    fn test_literal_wins_over_override() {
        let rules = RuleSet::new().message(ErrorCode::Test, "configured");
        let message = resolve_message(
            &rules,
            ErrorCode::Test,
            &MessageSource::default(),
            Some("literal".into()),
        )
        .unwrap();
        assert_eq!(message, "literal");
    }

    #[test]
    fn test_override_wins_over_catalog() {
        let rules = RuleSet::new().message(ErrorCode::Min, "Too small");
        let message =
            resolve_message(&rules, ErrorCode::Min, &MessageSource::default(), None).unwrap();
        assert_eq!(message, "Too small");
    }

    #[test]
    fn test_falls_back_to_language() {
        let rules = RuleSet::new().message(ErrorCode::Min, "Too small");
        let message = resolve_message(
            &rules,
            ErrorCode::Max,
            &MessageSource::Language(Language::Fr),
            None,
        )
        .unwrap();
        assert_eq!(message, "La valeur dépasse le maximum autorisé.");
    }
}
