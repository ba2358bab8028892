//! Per-field rule evaluation
//!
//! Fixed step order, each step either continuing with a value or stopping
//! with a rejection:
//!
//! 1. normalize (trim text unless `untrimmed`)
//! 2. required policy
//! 3. `onBefore` transforms
//! 4. `checked`
//! 5. `equal` (against the other field's raw input)
//! 6. `min`, `max`, `minLength`, `maxLength`, `regexp` (strings and numbers only)
//! 7. `test` predicates
//! 8. `onAfter` transforms
//!
//! Only the first failing step is reported.

use super::required::{resolve_required, RequiredOutcome};
use crate::errors::{ErrorCode, FormError, FormResult, HookStage};
use crate::schema::{lookup, parse_leading_float, FieldValue, Record, RuleSet, TestOutcome, Transform};

/// A failed step
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Rejection {
    pub code: ErrorCode,
    /// Message returned verbatim by a predicate
    pub literal: Option<String>,
}

impl Rejection {
    fn new(code: ErrorCode) -> Self {
        Self {
            code,
            literal: None,
        }
    }

    fn literal(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            literal: Some(message),
        }
    }
}

/// Terminal state of one field
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Verdict {
    Accept(FieldValue),
    Reject(Rejection),
}

/// Evaluates one field's rule set against the immutable input record.
pub(crate) struct FieldPipeline<'a> {
    field: &'a str,
    rules: &'a RuleSet,
    data: &'a Record,
}

impl<'a> FieldPipeline<'a> {
    pub(crate) fn new(field: &'a str, rules: &'a RuleSet, data: &'a Record) -> Self {
        Self { field, rules, data }
    }

    pub(crate) async fn run(&self) -> FormResult<Verdict> {
        let raw = lookup(self.data, self.field);
        let value = if self.rules.untrimmed {
            raw.clone()
        } else {
            raw.trimmed()
        };

        match resolve_required(self.field, &self.rules.required, &value, self.data).await? {
            RequiredOutcome::Proceed => {}
            RequiredOutcome::Missing => {
                return Ok(Verdict::Reject(Rejection::new(ErrorCode::Required)))
            }
            RequiredOutcome::Defaulted(default) => return Ok(Verdict::Accept(default)),
        }

        let value = self
            .transform(value, &self.rules.on_before, HookStage::OnBefore)
            .await?;

        if let Err(rejection) = self.check(&value) {
            return Ok(Verdict::Reject(rejection));
        }
        if let Some(rejection) = self.run_tests(&value).await? {
            return Ok(Verdict::Reject(rejection));
        }

        let value = self
            .transform(value, &self.rules.on_after, HookStage::OnAfter)
            .await?;

        Ok(Verdict::Accept(value))
    }

    /// Applies transforms in order, each receiving the previous output.
    async fn transform(
        &self,
        mut value: FieldValue,
        transforms: &[Transform],
        stage: HookStage,
    ) -> FormResult<FieldValue> {
        for transform in transforms {
            value = transform
                .apply(value)
                .await
                .map_err(|e| FormError::hook(self.field, stage, e))?;
        }
        Ok(value)
    }

    /// Synchronous checks, steps 4 to 6.
    fn check(&self, value: &FieldValue) -> Result<(), Rejection> {
        let rules = self.rules;

        if rules.checked && !value.is_truthy() {
            return Err(Rejection::new(ErrorCode::Checked));
        }

        if let Some(other) = &rules.equal {
            if lookup(self.data, other) != value {
                return Err(Rejection::new(ErrorCode::Equal));
            }
        }

        let Some(text) = value.text() else {
            return Ok(());
        };

        // Unparseable text violates any bound present; min is checked first.
        let number = parse_leading_float(&text);
        if let Some(min) = rules.min {
            if !number.is_some_and(|n| n >= min) {
                return Err(Rejection::new(ErrorCode::Min));
            }
        }
        if let Some(max) = rules.max {
            if !number.is_some_and(|n| n <= max) {
                return Err(Rejection::new(ErrorCode::Max));
            }
        }

        let length = text.chars().count();
        if rules.min_length.is_some_and(|min| length < min) {
            return Err(Rejection::new(ErrorCode::MinLength));
        }
        if rules.max_length.is_some_and(|max| length > max) {
            return Err(Rejection::new(ErrorCode::MaxLength));
        }

        if rules.regexp.iter().any(|pattern| !pattern.is_match(&text)) {
            return Err(Rejection::new(ErrorCode::Regexp));
        }

        Ok(())
    }

    /// Runs predicates in order; the first non-pass stops the field.
    async fn run_tests(&self, value: &FieldValue) -> FormResult<Option<Rejection>> {
        for predicate in &self.rules.test {
            let outcome = predicate
                .check(value.clone())
                .await
                .map_err(|e| FormError::hook(self.field, HookStage::Test, e))?;
            match outcome {
                TestOutcome::Pass => {}
                TestOutcome::Fail => return Ok(Some(Rejection::new(ErrorCode::Test))),
                TestOutcome::Message(message) => {
                    return Ok(Some(Rejection::literal(ErrorCode::Test, message)))
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HookError;
    use crate::schema::{Predicate, Required};
    use regex::Regex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn record(pairs: &[(&str, FieldValue)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    async fn run(field: &str, rules: &RuleSet, data: &Record) -> Verdict {
        FieldPipeline::new(field, rules, data).run().await.unwrap()
    }

    fn rejected(code: ErrorCode) -> Verdict {
        Verdict::Reject(Rejection::new(code))
    }

    #[tokio::test]
    async fn test_trims_text_by_default() {
        let data = record(&[("name", FieldValue::from("  Ana "))]);
        assert_eq!(
            run("name", &RuleSet::new(), &data).await,
            Verdict::Accept(FieldValue::from("Ana"))
        );

        let untrimmed = RuleSet::new().untrimmed(true);
        assert_eq!(
            run("name", &untrimmed, &data).await,
            Verdict::Accept(FieldValue::from("  Ana "))
        );
    }

    #[tokio::test]
    async fn test_min_fails_before_min_length() {
        let rules = RuleSet::new().min(10.0).min_length(5);
        let data = record(&[("n", FieldValue::from("3"))]);
        assert_eq!(run("n", &rules, &data).await, rejected(ErrorCode::Min));
    }

    #[tokio::test]
    async fn test_unparseable_number_fails_min_first() {
        let rules = RuleSet::new().min(1.0).max(5.0);
        let data = record(&[("n", FieldValue::from("abc"))]);
        assert_eq!(run("n", &rules, &data).await, rejected(ErrorCode::Min));

        let max_only = RuleSet::new().max(5.0);
        assert_eq!(run("n", &max_only, &data).await, rejected(ErrorCode::Max));
    }

    #[tokio::test]
    async fn test_bounds_are_inclusive() {
        let rules = RuleSet::new().min(1.0).max(5.0).min_length(1).max_length(1);
        for n in [1, 5] {
            let data = record(&[("n", FieldValue::from(n))]);
            assert_eq!(run("n", &rules, &data).await, Verdict::Accept(FieldValue::from(n)));
        }
        let data = record(&[("n", FieldValue::from(6))]);
        assert_eq!(run("n", &rules, &data).await, rejected(ErrorCode::Max));
    }

    #[tokio::test]
    async fn test_zero_bound_is_enforced() {
        let rules = RuleSet::new().min(0.0);
        let data = record(&[("n", FieldValue::from(-1))]);
        assert_eq!(run("n", &rules, &data).await, rejected(ErrorCode::Min));
    }

    #[tokio::test]
    async fn test_length_counts_characters() {
        let rules = RuleSet::new().max_length(3);
        let data = record(&[("s", FieldValue::from("日本語"))]);
        assert_eq!(
            run("s", &rules, &data).await,
            Verdict::Accept(FieldValue::from("日本語"))
        );
    }

    #[tokio::test]
    async fn test_booleans_skip_text_checks() {
        let rules = RuleSet::new().min_length(5).regexp(Regex::new("^x$").unwrap());
        let data = record(&[("flag", FieldValue::from(true))]);
        assert_eq!(
            run("flag", &rules, &data).await,
            Verdict::Accept(FieldValue::from(true))
        );
    }

    #[tokio::test]
    async fn test_checked_rejects_falsy() {
        let rules = RuleSet::new().checked(true);
        let data = record(&[("terms", FieldValue::from(false))]);
        assert_eq!(run("terms", &rules, &data).await, rejected(ErrorCode::Checked));
    }

    #[tokio::test]
    async fn test_checked_runs_before_equal() {
        let rules = RuleSet::new().checked(true).equal("other");
        let data = record(&[("f", FieldValue::from(0)), ("other", FieldValue::from(1))]);
        assert_eq!(run("f", &rules, &data).await, rejected(ErrorCode::Checked));
    }

    #[tokio::test]
    async fn test_equal_is_strict() {
        let rules = RuleSet::new().equal("a");
        let data = record(&[("a", FieldValue::from(1)), ("b", FieldValue::from("1"))]);
        assert_eq!(run("b", &rules, &data).await, rejected(ErrorCode::Equal));
    }

    #[tokio::test]
    async fn test_regexp_all_must_match() {
        let rules = RuleSet::new()
            .regexp(Regex::new("[a-z]").unwrap())
            .regexp(Regex::new("[0-9]").unwrap());
        let weak = record(&[("p", FieldValue::from("abcdef"))]);
        assert_eq!(run("p", &rules, &weak).await, rejected(ErrorCode::Regexp));
        let strong = record(&[("p", FieldValue::from("abc123"))]);
        assert!(matches!(run("p", &rules, &strong).await, Verdict::Accept(_)));
    }

    #[tokio::test]
    async fn test_predicate_literal_message() {
        let rules = RuleSet::new()
            .test(Predicate::sync(|_: &FieldValue| true))
            .test(Predicate::sync(|_: &FieldValue| "already taken"))
            .test(Predicate::sync(|_: &FieldValue| false));
        let data = record(&[("user", FieldValue::from("ana"))]);
        assert_eq!(
            run("user", &rules, &data).await,
            Verdict::Reject(Rejection::literal(ErrorCode::Test, "already taken".into()))
        );
    }

    #[tokio::test]
    async fn test_transforms_run_in_order_around_checks() {
        let rules = RuleSet::new()
            .on_before(Transform::sync(|v| FieldValue::from(format!("{}1", v))))
            .on_before(Transform::sync(|v| FieldValue::from(format!("{}2", v))))
            .min_length(3)
            .on_after(Transform::sync(|v| FieldValue::from(format!("[{}]", v))));
        let data = record(&[("s", FieldValue::from("a"))]);
        assert_eq!(
            run("s", &rules, &data).await,
            Verdict::Accept(FieldValue::from("[a12]"))
        );
    }

    #[tokio::test]
    async fn test_on_after_skipped_for_rejected_field() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let rules = RuleSet::new().min_length(10).on_after(Transform::sync(move |v| {
            counter.fetch_add(1, Ordering::SeqCst);
            v
        }));
        let data = record(&[("s", FieldValue::from("short"))]);
        assert_eq!(run("s", &rules, &data).await, rejected(ErrorCode::MinLength));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_default_skips_all_steps() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let rules = RuleSet::new()
            .required(Required::default_value("n/a"))
            .min_length(10)
            .on_before(Transform::sync(move |v| {
                counter.fetch_add(1, Ordering::SeqCst);
                v
            }));
        let data = record(&[]);
        assert_eq!(
            run("s", &rules, &data).await,
            Verdict::Accept(FieldValue::from("n/a"))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_optional_empty_field_passes_through() {
        let rules = RuleSet::new().min_length(3).min(1.0);
        let data = record(&[("s", FieldValue::from("   "))]);
        // Empty text still runs the bound checks and fails min.
        assert_eq!(run("s", &rules, &data).await, rejected(ErrorCode::Min));

        let data = record(&[]);
        assert_eq!(run("s", &rules, &data).await, Verdict::Accept(FieldValue::Undefined));
    }

    #[tokio::test]
    async fn test_number_text_uses_exponent_form() {
        let short = RuleSet::new().max_length(6);
        let data = record(&[("big", FieldValue::from(1e21))]);
        assert_eq!(
            run("big", &short, &data).await,
            Verdict::Accept(FieldValue::from(1e21))
        );

        let decimal = RuleSet::new().regexp(Regex::new(r"^0\.").unwrap());
        let data = record(&[("tiny", FieldValue::from(1e-7))]);
        assert_eq!(run("tiny", &decimal, &data).await, rejected(ErrorCode::Regexp));
    }

    #[tokio::test]
    async fn test_async_on_before_runs_before_checks() {
        let rules = RuleSet::new()
            .on_before(Transform::future(|v: FieldValue| async move {
                tokio::task::yield_now().await;
                Ok::<_, HookError>(FieldValue::from(format!("{}-padded", v)))
            }))
            .on_before(Transform::sync(|v| FieldValue::from(format!("{}!", v))))
            .min_length(8)
            .regexp(Regex::new("-padded!$").unwrap());
        let data = record(&[("s", FieldValue::from("ab"))]);
        assert_eq!(
            run("s", &rules, &data).await,
            Verdict::Accept(FieldValue::from("ab-padded!"))
        );
    }

    #[tokio::test]
    async fn test_async_on_before_output_is_what_fails() {
        let rules = RuleSet::new()
            .on_before(Transform::future(|_: FieldValue| async {
                Ok::<_, HookError>(FieldValue::from("x"))
            }))
            .min_length(3);
        let data = record(&[("s", FieldValue::from("long enough"))]);
        assert_eq!(run("s", &rules, &data).await, rejected(ErrorCode::MinLength));
    }

    #[tokio::test]
    async fn test_failing_transforms_abort_with_their_stage() {
        let data = record(&[("s", FieldValue::from("value"))]);

        let before = RuleSet::new().on_before(Transform::fallible(|_| {
            Err(HookError::new("cannot normalize"))
        }));
        let err = FieldPipeline::new("s", &before, &data).run().await.unwrap_err();
        assert!(matches!(
            err,
            FormError::Hook { ref field, stage: HookStage::OnBefore, .. } if field == "s"
        ));

        let after = RuleSet::new().on_after(Transform::future(|_: FieldValue| async {
            Err::<FieldValue, _>(HookError::new("storage offline"))
        }));
        let err = FieldPipeline::new("s", &after, &data).run().await.unwrap_err();
        assert!(matches!(err, FormError::Hook { stage: HookStage::OnAfter, .. }));
    }

    #[tokio::test]
    async fn test_on_after_not_reached_when_on_before_fails() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let rules = RuleSet::new()
            .on_before(Transform::fallible(|_| Err(HookError::new("boom"))))
            .on_after(Transform::sync(move |v| {
                counter.fetch_add(1, Ordering::SeqCst);
                v
            }));
        let data = record(&[("s", FieldValue::from("value"))]);

        assert!(FieldPipeline::new("s", &rules, &data).run().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
