use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::{Map, Value};
use webgpt_shared::{Callable, Parameter, ToolRegistry};

use super::Orchestrator;
use crate::completion::{CompletionChoice, CompletionRequest, CompletionService};
use crate::config::Settings;
use crate::error::CompletionError;

pub(crate) fn settings() -> Settings {
    Settings {
        model_name: "test-model".to_string(),
        temperature: 0.2,
        function_caller_llm_system_prompt: "function caller prompt".to_string(),
        llm_system_prompt: "final answer prompt".to_string(),
        base_url: "http://localhost".to_string(),
        request_timeout_secs: 5,
    }
}

pub(crate) fn build_orchestrator(registry: Arc<ToolRegistry>, service: Arc<ScriptedService>) -> Orchestrator {
    Orchestrator::new(Arc::new(settings()), registry, service)
}

/// Completion service that replays canned choices and records every request.
pub(crate) struct ScriptedService {
    script: Mutex<VecDeque<Result<CompletionChoice, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedService {
    pub(crate) fn new(script: Vec<Result<CompletionChoice, CompletionError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(vec![]),
        })
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionChoice, CompletionError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Service("script exhausted".to_string())))
    }
}

/// Search-shaped tool returning a fixed value (or failing) and recording
/// the arguments of every call.
pub(crate) struct FakeTool {
    name: &'static str,
    outcome: std::result::Result<Value, &'static str>,
    calls: Mutex<Vec<Map<String, Value>>>,
}

impl FakeTool {
    pub(crate) fn returning(name: &'static str, value: Value) -> Arc<Self> {
        Arc::new(Self {
            name,
            outcome: Ok(value),
            calls: Mutex::new(vec![]),
        })
    }

    pub(crate) fn failing(name: &'static str, message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            outcome: Err(message),
            calls: Mutex::new(vec![]),
        })
    }

    pub(crate) fn calls(&self) -> Vec<Map<String, Value>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Callable for FakeTool {
    fn name(&self) -> &str {
        self.name
    }

    fn doc(&self) -> Option<&str> {
        Some("Performs a fake search.")
    }

    fn parameters(&self) -> Option<Vec<Parameter>> {
        Some(vec![
            Parameter::new("query", "str"),
            Parameter::new("max_results", "Optional[int]"),
        ])
    }

    async fn call(&self, arguments: Map<String, Value>) -> Result<Value> {
        self.calls.lock().unwrap().push(arguments);
        self.outcome.clone().map_err(|message| anyhow!(message))
    }
}
