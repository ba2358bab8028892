//! Caller-supplied callables: transforms, predicates and default suppliers
//!
//! Each callable may be synchronous or asynchronous. Both kinds are stored
//! behind the same boxed-future signature so the pipeline awaits every step
//! uniformly and never branches on how a hook was written.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};

use super::value::FieldValue;
use crate::errors::HookResult;

type TransformFn = dyn Fn(FieldValue) -> BoxFuture<'static, HookResult<FieldValue>> + Send + Sync;
type PredicateFn = dyn Fn(FieldValue) -> BoxFuture<'static, HookResult<TestOutcome>> + Send + Sync;
type SupplierFn = dyn Fn() -> BoxFuture<'static, HookResult<FieldValue>> + Send + Sync;

/// Verdict of a custom predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// Value accepted
    Pass,
    /// Value rejected; message comes from the rule set or catalog
    Fail,
    /// Value rejected with this literal message
    Message(String),
}

impl From<bool> for TestOutcome {
    fn from(passed: bool) -> Self {
        if passed {
            TestOutcome::Pass
        } else {
            TestOutcome::Fail
        }
    }
}

impl From<&str> for TestOutcome {
    fn from(message: &str) -> Self {
        TestOutcome::Message(message.to_string())
    }
}

impl From<String> for TestOutcome {
    fn from(message: String) -> Self {
        TestOutcome::Message(message)
    }
}

/// Maps a value to a new value. Used by `onBefore` and `onAfter`.
#[derive(Clone)]
pub struct Transform(Arc<TransformFn>);

impl Transform {
    /// Wraps an infallible synchronous function.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(FieldValue) -> FieldValue + Send + Sync + 'static,
    {
        Self(Arc::new(
            move |value: FieldValue| -> BoxFuture<'static, HookResult<FieldValue>> {
                future::ready(Ok(f(value))).boxed()
            },
        ))
    }

    /// Wraps a synchronous function that may fail.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(FieldValue) -> HookResult<FieldValue> + Send + Sync + 'static,
    {
        Self(Arc::new(
            move |value: FieldValue| -> BoxFuture<'static, HookResult<FieldValue>> {
                future::ready(f(value)).boxed()
            },
        ))
    }

    /// Wraps an asynchronous function.
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(FieldValue) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult<FieldValue>> + Send + 'static,
    {
        Self(Arc::new(
            move |value: FieldValue| -> BoxFuture<'static, HookResult<FieldValue>> {
                f(value).boxed()
            },
        ))
    }

    pub(crate) fn apply(&self, value: FieldValue) -> BoxFuture<'static, HookResult<FieldValue>> {
        (self.0)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// Custom check run by the `test` rule.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    /// Wraps a synchronous check. The return may be a `bool`, a `&str`/`String`
    /// literal message, or a `TestOutcome`.
    pub fn sync<F, O>(f: F) -> Self
    where
        F: Fn(&FieldValue) -> O + Send + Sync + 'static,
        O: Into<TestOutcome>,
    {
        Self(Arc::new(
            move |value: FieldValue| -> BoxFuture<'static, HookResult<TestOutcome>> {
                future::ready(Ok(f(&value).into())).boxed()
            },
        ))
    }

    /// Wraps an asynchronous check.
    pub fn future<F, Fut, O>(f: F) -> Self
    where
        F: Fn(FieldValue) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult<O>> + Send + 'static,
        O: Into<TestOutcome>,
    {
        Self(Arc::new(
            move |value: FieldValue| -> BoxFuture<'static, HookResult<TestOutcome>> {
                f(value).map(|r| r.map(Into::into)).boxed()
            },
        ))
    }

    pub(crate) fn check(&self, value: FieldValue) -> BoxFuture<'static, HookResult<TestOutcome>> {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Zero-argument producer of a default value.
#[derive(Clone)]
pub struct Supplier(Arc<SupplierFn>);

impl Supplier {
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn() -> FieldValue + Send + Sync + 'static,
    {
        Self(Arc::new(move || -> BoxFuture<'static, HookResult<FieldValue>> {
            future::ready(Ok(f())).boxed()
        }))
    }

    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult<FieldValue>> + Send + 'static,
    {
        Self(Arc::new(move || -> BoxFuture<'static, HookResult<FieldValue>> {
            f().boxed()
        }))
    }

    pub(crate) fn supply(&self) -> BoxFuture<'static, HookResult<FieldValue>> {
        (self.0)()
    }
}

impl fmt::Debug for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Supplier(..)")
    }
}
