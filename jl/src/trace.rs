//! Call tracing for arbitrary callables.
//!
//! [`Traced`] wraps a function or closure and logs every invocation through
//! the shared [`LoggerHandle`]:
//!
//! ```text
//! INFO:Entering: add
//! DEBUG:Args: (2, 3)
//! INFO:add completed in 0.0000s
//! DEBUG:Return: 5
//! DEBUG:Exiting: add
//! ```
//!
//! On failure the `completed`/`Return` pair is replaced by an error line
//! (`add failed in …s: <message>`) and a debug `Exception: <kind>: <message>`
//! line. The error value, or the panic payload, reaches the caller unchanged.
//!
//! Arguments are passed as a tuple: `traced.call((2, 3))` invokes `f(2, 3)`.

use std::any::{Any, type_name};
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::logging::{self, LoggerHandle};

/// A callable taking its arguments as a tuple.
///
/// Implemented for every `FnMut` of arity 0 to 4.
pub trait Invoke<Args> {
    type Output;

    fn invoke(&mut self, args: Args) -> Self::Output;
}

macro_rules! impl_invoke {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg),*> Invoke<($($arg,)*)> for Func
        where
            Func: FnMut($($arg),*) -> Out,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn invoke(&mut self, ($($arg,)*): ($($arg,)*)) -> Out {
                self($($arg),*)
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A);
impl_invoke!(A, B);
impl_invoke!(A, B, C);
impl_invoke!(A, B, C, D);

/// Wrap `func` so each call is logged under `name`.
pub fn trace<F>(name: impl Into<Cow<'static, str>>, func: F) -> Traced<F> {
    Traced::new(name, func)
}

/// Wrap a function path, naming it after the path's last segment.
///
/// ```ignore
/// let mut divide = traced!(calculator::divide);
/// assert_eq!(divide.name(), "divide");
/// ```
#[macro_export]
macro_rules! traced {
    ($func:path) => {
        $crate::trace::Traced::new($crate::trace::last_segment(stringify!($func)), $func)
    };
}

#[doc(hidden)]
pub fn last_segment(path: &'static str) -> &'static str {
    path.rsplit("::").next().unwrap_or(path).trim()
}

/// A callable plus the identity it is logged under.
///
/// The wrapper keeps no per-call state; the logger is resolved on every call.
#[derive(Clone)]
pub struct Traced<F> {
    func: F,
    name: Cow<'static, str>,
    owner: Option<Cow<'static, str>>,
    doc: Option<Cow<'static, str>>,
}

impl<F> fmt::Debug for Traced<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traced")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

impl<F> Traced<F> {
    pub fn new(name: impl Into<Cow<'static, str>>, func: F) -> Self {
        Self {
            func,
            name: name.into(),
            owner: None,
            doc: None,
        }
    }

    /// Label calls as `Owner.name`, for callables standing in for a method.
    pub fn method_of(mut self, owner: impl Into<Cow<'static, str>>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<Cow<'static, str>>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// The label used in log lines.
    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}.{}", self.name),
            None => self.name.to_string(),
        }
    }

    pub fn inner(&self) -> &F {
        &self.func
    }

    pub fn into_inner(self) -> F {
        self.func
    }

    /// Invoke through the shared logger. Every return value counts as success.
    pub fn call<A>(&mut self, args: A) -> F::Output
    where
        F: Invoke<A>,
        A: fmt::Debug,
        F::Output: fmt::Debug,
    {
        self.call_with(&logging::logger(), args)
    }

    pub fn call_with<A>(&mut self, logger: &LoggerHandle, args: A) -> F::Output
    where
        F: Invoke<A>,
        A: fmt::Debug,
        F::Output: fmt::Debug,
    {
        let record = TraceRecord::enter(logger, self.qualified_name(), &args);
        let value = record.run(|| self.func.invoke(args));
        record.finish(Outcome::Success(&value));
        value
    }

    /// Invoke through the shared logger; `Err` is logged as a failure and
    /// returned unchanged.
    pub fn try_call<A, T, E>(&mut self, args: A) -> Result<T, E>
    where
        F: Invoke<A, Output = Result<T, E>>,
        A: fmt::Debug,
        T: fmt::Debug,
        E: fmt::Display,
    {
        self.try_call_with(&logging::logger(), args)
    }

    pub fn try_call_with<A, T, E>(&mut self, logger: &LoggerHandle, args: A) -> Result<T, E>
    where
        F: Invoke<A, Output = Result<T, E>>,
        A: fmt::Debug,
        T: fmt::Debug,
        E: fmt::Display,
    {
        let record = TraceRecord::enter(logger, self.qualified_name(), &args);
        let result = record.run(|| self.func.invoke(args));
        match &result {
            Ok(value) => record.finish(Outcome::Success(value)),
            Err(err) => record.finish(Outcome::Failure {
                kind: kind_name::<E>(),
                message: err.to_string(),
            }),
        }
        result
    }
}

/// How a traced invocation ended.
#[derive(Debug)]
enum Outcome<'a> {
    Success(&'a dyn fmt::Debug),
    Failure { kind: &'a str, message: String },
}

/// One invocation in flight. Logs `Exiting` when dropped, on every path
/// including unwinding.
struct TraceRecord<'a> {
    logger: &'a LoggerHandle,
    label: String,
    started: Instant,
}

impl<'a> TraceRecord<'a> {
    fn enter(logger: &'a LoggerHandle, label: String, args: &dyn fmt::Debug) -> Self {
        logger.info(format_args!("Entering: {label}"));
        logger.debug(format_args!("Args: {args:?}"));
        Self {
            logger,
            label,
            started: Instant::now(),
        }
    }

    /// Run the wrapped call, logging and resuming any panic it raises.
    fn run<R>(&self, body: impl FnOnce() -> R) -> R {
        match panic::catch_unwind(AssertUnwindSafe(body)) {
            Ok(value) => value,
            Err(payload) => {
                self.finish(Outcome::Failure {
                    kind: "panic",
                    message: panic_message(payload.as_ref()),
                });
                panic::resume_unwind(payload)
            }
        }
    }

    fn finish(&self, outcome: Outcome<'_>) {
        let label = &self.label;
        let duration = elapsed_secs(self.started);
        match outcome {
            Outcome::Success(value) => {
                self.logger.info(format_args!("{label} completed in {duration:.4}s"));
                self.logger.debug(format_args!("Return: {value:?}"));
            }
            Outcome::Failure { kind, message } => {
                self.logger.error(format_args!("{label} failed in {duration:.4}s: {message}"));
                self.logger.debug(format_args!("Exception: {kind}: {message}"));
            }
        }
    }
}

impl Drop for TraceRecord<'_> {
    fn drop(&mut self) {
        self.logger.debug(format_args!("Exiting: {}", self.label));
    }
}

/// Seconds since `started`; never negative.
pub fn elapsed_secs(started: Instant) -> f64 {
    Instant::now()
        .saturating_duration_since(started)
        .as_secs_f64()
}

/// Best-effort short type name: `jl::error::CalculatorError` → `CalculatorError`.
fn kind_name<E>() -> &'static str {
    let full = type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
