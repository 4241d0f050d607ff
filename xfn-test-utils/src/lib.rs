//! xfn Test Utilities
//!
//! This crate provides shared testing helpers for the xfn workspace.

use serde_json::Value;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard};

/// Records the argument lists observed by the targets it hands out
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Vec<Value>>>>,
}

impl Recorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    fn calls(&self) -> MutexGuard<'_, Vec<Vec<Value>>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, args: &[Value]) {
        self.calls().push(args.to_vec());
    }

    /// Target that records its arguments and returns the one at `index`
    ///
    /// Missing arguments are returned as `null`.
    pub fn echo_arg(
        &self,
        index: usize,
    ) -> impl Fn(Vec<Value>) -> Result<Value, Infallible> + Send + Sync + 'static {
        let recorder = self.clone();
        move |args| {
            recorder.record(&args);
            Ok(args.get(index).cloned().unwrap_or(Value::Null))
        }
    }

    /// Target that records its arguments and returns them as an array
    pub fn echo_all(&self) -> impl Fn(Vec<Value>) -> Result<Value, Infallible> + Send + Sync + 'static {
        let recorder = self.clone();
        move |args| {
            recorder.record(&args);
            Ok(Value::Array(args))
        }
    }

    /// Target that records its arguments and returns `null`
    pub fn sink(&self) -> impl Fn(Vec<Value>) -> Result<Value, Infallible> + Send + Sync + 'static {
        let recorder = self.clone();
        move |args| {
            recorder.record(&args);
            Ok(Value::Null)
        }
    }

    /// Target that records its arguments and fails with `message`
    pub fn failing(
        &self,
        message: &'static str,
    ) -> impl Fn(Vec<Value>) -> Result<Value, String> + Send + Sync + 'static {
        let recorder = self.clone();
        move |args| {
            recorder.record(&args);
            Err(message.to_string())
        }
    }

    /// Number of recorded calls
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Arguments of the most recent call
    pub fn last(&self) -> Option<Vec<Value>> {
        self.calls().last().cloned()
    }

    /// Argument `index` of the most recent call, `null` if missing
    pub fn arg(&self, index: usize) -> Value {
        self.last()
            .and_then(|args| args.get(index).cloned())
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recorder_tracks_calls() {
        let recorder = Recorder::new();
        let target = recorder.echo_arg(1);

        assert_eq!(recorder.last(), None);
        assert_eq!(target(vec![json!("a"), json!("b")]), Ok(json!("b")));
        assert_eq!(target(vec![json!("c")]), Ok(Value::Null));

        assert_eq!(recorder.call_count(), 2);
        assert_eq!(recorder.last(), Some(vec![json!("c")]));
        assert_eq!(recorder.arg(0), json!("c"));
        assert_eq!(recorder.arg(5), Value::Null);
    }

    #[test]
    fn test_failing_target_records_before_failing() {
        let recorder = Recorder::new();
        let target = recorder.failing("boom");
        assert_eq!(target(vec![json!(1)]), Err("boom".to_string()));
        assert_eq!(recorder.arg(0), json!(1));
    }
}
