use async_trait::async_trait;
use edge_core::{ProviderError, ProviderId, Request};
use edge_dispatch::{Completion, ProviderInvoker};
use edge_router::ProviderDescriptor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Script {
    /// Answer with the model name and word-count token usage.
    Echo,
    Fail(ProviderError),
    /// Fail only for the listed provider, echo otherwise.
    FailFor(ProviderId, ProviderError),
    Sleep(Duration),
    /// Never completes.
    Hang,
    /// Yield to the scheduler a few times, then echo.
    Yield(usize),
}

pub struct ScriptedInvoker {
    label: &'static str,
    script: Script,
    calls: AtomicUsize,
    seen: Mutex<Vec<ProviderId>>,
}

#[allow(dead_code)]
impl ScriptedInvoker {
    pub fn new(label: &'static str, script: Script) -> Self {
        Self { label, script, calls: AtomicUsize::new(0), seen: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<ProviderId> {
        self.seen.lock().unwrap().clone()
    }
}

fn echo(descriptor: &ProviderDescriptor, request: &Request) -> Completion {
    let words = request.prompt.split_whitespace().count() as u32;
    Completion::new(format!("[{}] ok", descriptor.model), words, 5)
}

#[async_trait]
impl ProviderInvoker for ScriptedInvoker {
    fn name(&self) -> &str {
        self.label
    }

    async fn invoke(
        &self,
        descriptor: &ProviderDescriptor,
        request: &Request,
    ) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(descriptor.id);
        match &self.script {
            Script::Echo => Ok(echo(descriptor, request)),
            Script::Fail(e) => Err(e.clone()),
            Script::FailFor(id, e) if *id == descriptor.id => Err(e.clone()),
            Script::FailFor(..) => Ok(echo(descriptor, request)),
            Script::Sleep(d) => {
                tokio::time::sleep(*d).await;
                Ok(echo(descriptor, request))
            }
            Script::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            Script::Yield(n) => {
                for _ in 0..*n {
                    tokio::task::yield_now().await;
                }
                Ok(echo(descriptor, request))
            }
        }
    }
}

#[allow(dead_code)]
pub fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
}
