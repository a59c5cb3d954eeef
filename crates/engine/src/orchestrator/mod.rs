//! Two-phase completion protocol.
//!
//! Phase one sends the conversation with the tool catalogue attached. If the
//! model answers directly the turn ends there. Otherwise every requested tool
//! runs, the results are folded into a private copy of the conversation and
//! phase two asks again, this time without tools, for the final answer. Only
//! one round of tool dispatch happens per turn.

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::try_join_all;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use webgpt_shared::{Message, ToolCall, ToolRegistry};

use crate::completion::{CompletionChoice, CompletionRequest, CompletionService};
use crate::config::Settings;
use crate::error::TurnError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingToolDecision,
    AwaitingFinalAnswer,
}

pub struct Orchestrator {
    settings: Arc<Settings>,
    registry: Arc<ToolRegistry>,
    service: Arc<dyn CompletionService>,
}

impl Orchestrator {
    pub fn new(
        settings: Arc<Settings>,
        registry: Arc<ToolRegistry>,
        service: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            settings,
            registry,
            service,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Runs one turn and returns the assistant's final text.
    ///
    /// `conversation` is only read. Tool-phase messages accumulate in a copy
    /// owned by this call.
    ///
    /// However many calls the model requested, the copy gets one assistant
    /// message carrying all of them, followed by one `tool` message per call
    /// in request order. Repeating the assistant message per call would yield
    /// a transcript chat-completions endpoints reject.
    #[instrument(skip_all, fields(messages = conversation.len()))]
    pub async fn get_response(&self, conversation: &[Message]) -> Result<String, TurnError> {
        let choice = self.ask(Phase::AwaitingToolDecision, conversation).await?;
        if choice.requested_tools().is_empty() {
            debug!("no tools requested, answering directly");
            return Ok(choice.content.unwrap_or_default());
        }

        let results = self.dispatch(choice.requested_tools()).await?;

        let mut working = conversation.to_vec();
        working.push(choice.into_message());
        working.extend(
            results
                .into_iter()
                .map(|(call_id, content)| Message::tool_result(call_id, content)),
        );

        let answer = self.ask(Phase::AwaitingFinalAnswer, &working).await?;
        Ok(answer.content.unwrap_or_default())
    }

    fn request(&self, phase: Phase, conversation: &[Message]) -> CompletionRequest {
        let (system_prompt, tools) = match phase {
            Phase::AwaitingToolDecision => (
                &self.settings.function_caller_llm_system_prompt,
                Some(self.registry.get_tools()).filter(|tools| !tools.is_empty()),
            ),
            Phase::AwaitingFinalAnswer => (&self.settings.llm_system_prompt, None),
        };

        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(Message::system(system_prompt.clone()));
        messages.extend_from_slice(conversation);

        CompletionRequest {
            model: self.settings.model_name.clone(),
            temperature: self.settings.temperature,
            messages,
            tools,
        }
    }

    async fn ask(&self, phase: Phase, conversation: &[Message]) -> Result<CompletionChoice, TurnError> {
        debug!(?phase, "requesting completion");
        Ok(self.service.complete(self.request(phase, conversation)).await?)
    }

    /// Validates every call, then runs them concurrently. Results come back
    /// in request order as `(call id, serialized result)`.
    async fn dispatch(&self, calls: &[ToolCall]) -> Result<Vec<(String, String)>, TurnError> {
        let mut seen = HashSet::new();
        let mut prepared = Vec::with_capacity(calls.len());

        for call in calls {
            if call.id.is_empty() {
                return Err(TurnError::ProtocolViolation(format!(
                    "call to '{}' has no id",
                    call.name()
                )));
            }
            if !seen.insert(call.id.as_str()) {
                return Err(TurnError::ProtocolViolation(format!(
                    "duplicate tool call id '{}'",
                    call.id
                )));
            }
            if !self.registry.contains(call.name()) {
                return Err(TurnError::UnknownTool(call.name().to_string()));
            }

            let arguments: Map<String, Value> =
                serde_json::from_str(call.raw_arguments()).map_err(|source| TurnError::ArgumentParse {
                    tool: call.name().to_string(),
                    call_id: call.id.clone(),
                    source,
                })?;
            prepared.push((call, arguments));
        }

        let invocations = prepared.into_iter().map(|(call, arguments)| async move {
            info!(tool = call.name(), call_id = %call.id, "invoking tool");
            let result = self.registry.invoke(call.name(), arguments).await?;
            Ok::<_, TurnError>((call.id.clone(), render_result(&result)))
        });

        try_join_all(invocations).await
    }
}

/// Pretty-prints a tool result with four-space indentation.
fn render_result(value: &Value) -> String {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
