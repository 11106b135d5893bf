//! Scripted in-memory transport shared by the unit tests.

use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::{
    error::FetchError,
    request::RequestDescriptor,
    transport::{HttpResponse, HttpTransport},
};

pub(crate) enum Scripted {
    Respond(Result<HttpResponse, FetchError>),
    /// Never completes; used to hold an exchange outstanding.
    Hang,
}

impl Scripted {
    pub(crate) fn json(body: &str) -> Self {
        Self::status_with_body(200, body)
    }

    pub(crate) fn status(status: u16) -> Self {
        Self::status_with_body(status, "")
    }

    pub(crate) fn status_with_body(status: u16, body: &str) -> Self {
        Scripted::Respond(Ok(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }))
    }

    pub(crate) fn fail(err: FetchError) -> Self {
        Scripted::Respond(Err(err))
    }
}

#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<(Instant, RequestDescriptor)>>>,
}

impl ScriptedTransport {
    pub(crate) fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            calls: Arc::default(),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub(crate) fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().iter().map(|(at, _)| *at).collect()
    }

    pub(crate) fn requested(&self) -> Vec<RequestDescriptor> {
        self.calls.lock().iter().map(|(_, d)| d.clone()).collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse, FetchError> {
        self.calls.lock().push((Instant::now(), descriptor.clone()));
        let next = self.script.lock().pop_front();
        match next {
            Some(Scripted::Respond(result)) => result,
            Some(Scripted::Hang) => std::future::pending().await,
            None => Err(FetchError::Transport("script exhausted".to_string())),
        }
    }
}
