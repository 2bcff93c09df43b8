//! Fake Ports
//!
//! In-process implementations of [`PolicyRetriever`] and
//! [`CoverageInterpreter`] that return scripted answers, fail on demand,
//! or stall past a timeout. They record what they were asked so tests can
//! assert on queries and prompts.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use core_kernel::{DomainPort, PortError};
use domain_claims::CoverageInterpreter;
use domain_policy::{PolicyPassage, PolicyRetriever};

/// Retriever returning the same passages for every query
#[derive(Debug, Default)]
pub struct ScriptedRetriever {
    passages: Vec<PolicyPassage>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedRetriever {
    pub fn returning(passages: Vec<PolicyPassage>) -> Self {
        Self {
            passages,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// A retriever that never finds anything
    pub fn empty() -> Self {
        Self::default()
    }

    /// Queries received so far, in order
    pub async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

impl DomainPort for ScriptedRetriever {}

#[async_trait]
impl PolicyRetriever for ScriptedRetriever {
    async fn search_policy(
        &self,
        query: &str,
        _policy_id: &str,
        top_k: usize,
    ) -> Result<Vec<PolicyPassage>, PortError> {
        self.queries.lock().await.push(query.to_string());
        Ok(self.passages.iter().take(top_k).cloned().collect())
    }
}

/// Retriever whose every call fails with a connection error
#[derive(Debug, Default)]
pub struct FailingRetriever;

impl DomainPort for FailingRetriever {}

#[async_trait]
impl PolicyRetriever for FailingRetriever {
    async fn search_policy(&self, _: &str, _: &str, _: usize) -> Result<Vec<PolicyPassage>, PortError> {
        Err(PortError::connection("vector store unreachable"))
    }
}

/// Interpreter returning scripted replies
///
/// Replies are consumed in order; the last one repeats once the script
/// runs out.
#[derive(Debug)]
pub struct ScriptedInterpreter {
    replies: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedInterpreter {
    /// Always answers with `reply`
    pub fn always(reply: impl Into<String>) -> Self {
        Self::sequence(vec![reply.into()])
    }

    /// Answers with `replies` in order
    pub fn sequence(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(String::new()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in order
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

impl DomainPort for ScriptedInterpreter {}

#[async_trait]
impl CoverageInterpreter for ScriptedInterpreter {
    async fn interpret(&self, prompt: &str) -> Result<String, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.to_string());

        let mut last = self.last.lock().await;
        if let Some(reply) = self.replies.lock().await.pop_front() {
            *last = reply;
        }
        Ok(last.clone())
    }
}

/// Interpreter whose every call fails with the given error factory
pub struct FailingInterpreter {
    error: fn() -> PortError,
}

impl FailingInterpreter {
    /// Fails as if the provider rejected the credentials
    pub fn unauthorized() -> Self {
        Self {
            error: || PortError::Unauthorized {
                message: "invalid API key".to_string(),
            },
        }
    }

    /// Fails as if the provider were over quota
    pub fn rate_limited() -> Self {
        Self {
            error: || PortError::RateLimited { retry_after_secs: 30 },
        }
    }

    /// Fails with an adapter-reported timeout
    pub fn timed_out() -> Self {
        Self {
            error: || PortError::timeout("chat completion", Duration::from_secs(30)),
        }
    }
}

impl DomainPort for FailingInterpreter {}

#[async_trait]
impl CoverageInterpreter for FailingInterpreter {
    async fn interpret(&self, _prompt: &str) -> Result<String, PortError> {
        Err((self.error)())
    }
}

/// Interpreter that answers only after a delay
#[derive(Debug)]
pub struct SlowInterpreter {
    delay: Duration,
    reply: String,
}

impl SlowInterpreter {
    pub fn new(delay: Duration, reply: impl Into<String>) -> Self {
        Self {
            delay,
            reply: reply.into(),
        }
    }
}

impl DomainPort for SlowInterpreter {}

#[async_trait]
impl CoverageInterpreter for SlowInterpreter {
    async fn interpret(&self, _prompt: &str) -> Result<String, PortError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }
}
