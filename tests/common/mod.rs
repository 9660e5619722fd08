//! Scripted gateway for driving lifecycle clients without the AWS CLI

use iot_provision::{Gateway, IotError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Canned gateway responses, consumed in invocation order
pub enum Scripted {
    Json(Value),
    Empty,
    NotFound(&'static str),
    Fail(&'static str),
}

/// Gateway that replays scripted responses and records every invocation
pub struct ScriptedGateway {
    responses: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedGateway {
    pub fn new(responses: Vec<Scripted>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Recorded `(verb, args)` pairs in invocation order
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded verbs only
    pub fn verbs(&self) -> Vec<String> {
        self.calls().into_iter().map(|(verb, _)| verb).collect()
    }

    fn record(&self, verb: &str, args: &[&str]) {
        self.calls.lock().unwrap().push((
            verb.to_string(),
            args.iter().map(|s| s.to_string()).collect(),
        ));
    }

    fn next_response(&self, verb: &str) -> Result<Option<Value>, IotError> {
        match self.responses.lock().unwrap().pop_front() {
            Some(Scripted::Json(value)) => Ok(Some(value)),
            Some(Scripted::Empty) | None => Ok(None),
            Some(Scripted::NotFound(diagnostic)) => Err(IotError::NotFound {
                diagnostic: diagnostic.to_string(),
            }),
            Some(Scripted::Fail(diagnostic)) => Err(IotError::Command {
                verb: verb.to_string(),
                diagnostic: diagnostic.to_string(),
            }),
        }
    }
}

impl Gateway for ScriptedGateway {
    async fn invoke(&self, verb: &str, args: &[&str]) -> Result<Option<Value>, IotError> {
        self.record(verb, args);
        self.next_response(verb)
    }

    async fn query_text(
        &self,
        _service: &str,
        verb: &str,
        args: &[&str],
    ) -> Result<String, IotError> {
        self.record(verb, args);
        Ok("123456789012".to_string())
    }
}

/// Find the value following a flag in a recorded argument list.
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
