//! In-memory upstream: every dial yields a duplex stream whose far end
//! behaves as scripted.

use super::builders::answer_for;
use async_trait::async_trait;
use autobgp_domain::DomainError;
use autobgp_infrastructure::dns::transport::tcp::{
    read_with_length_prefix, send_with_length_prefix,
};
use autobgp_infrastructure::dns::{wire, StreamConnector};
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::DuplexStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Dial fails.
    RefuseDial,
    /// Connection accepted then closed before answering.
    Hangup,
    /// Reads queries and never answers.
    Silent,
    /// Answers with the wrong message ID.
    WrongId,
    /// Answers every query on the connection.
    Answer,
}

#[derive(Clone)]
pub struct ScriptedConnector {
    script: Arc<Mutex<VecDeque<Behavior>>>,
    fallback: Behavior,
    answers: Vec<Ipv4Addr>,
    dials: Arc<AtomicUsize>,
    served: Arc<AtomicUsize>,
}

impl ScriptedConnector {
    pub fn new(script: impl IntoIterator<Item = Behavior>, fallback: Behavior) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            fallback,
            answers: vec![Ipv4Addr::new(203, 0, 113, 5)],
            dials: Arc::new(AtomicUsize::new(0)),
            served: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn answering() -> Self {
        Self::new([], Behavior::Answer)
    }

    pub fn with_answers(mut self, answers: Vec<Ipv4Addr>) -> Self {
        self.answers = answers;
        self
    }

    pub fn dials(&self) -> usize {
        self.dials.load(Ordering::SeqCst)
    }

    /// Queries answered across all connections.
    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }

    fn next_behavior(&self) -> Behavior {
        self.script.lock().unwrap().pop_front().unwrap_or(self.fallback)
    }

    async fn serve(
        mut far_end: DuplexStream,
        behavior: Behavior,
        answers: Vec<Ipv4Addr>,
        served: Arc<AtomicUsize>,
    ) {
        while let Ok(bytes) = read_with_length_prefix(&mut far_end).await {
            if behavior == Behavior::Silent {
                continue;
            }

            let Ok(query) = wire::decode(&bytes) else {
                return;
            };

            let mut response = answer_for(&query, &answers);
            if behavior == Behavior::WrongId {
                let mut header = *response.header();
                header.set_id(query.id().wrapping_add(1));
                response.set_header(header);
            }

            let Ok(encoded) = wire::encode(&response) else {
                return;
            };
            if send_with_length_prefix(&mut far_end, &encoded).await.is_err() {
                return;
            }
            served.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl StreamConnector for ScriptedConnector {
    type Stream = DuplexStream;

    async fn connect(&self, _timeout: Duration) -> Result<Self::Stream, DomainError> {
        self.dials.fetch_add(1, Ordering::SeqCst);

        let behavior = self.next_behavior();
        if behavior == Behavior::RefuseDial {
            return Err(DomainError::TransportConnectionRefused {
                server: self.server().to_string(),
            });
        }

        let (near_end, far_end) = tokio::io::duplex(64 * 1024);

        if behavior == Behavior::Hangup {
            drop(far_end);
        } else {
            tokio::spawn(Self::serve(
                far_end,
                behavior,
                self.answers.clone(),
                self.served.clone(),
            ));
        }

        Ok(near_end)
    }

    fn server(&self) -> &str {
        "mock-upstream:853"
    }
}
