use async_trait::async_trait;
use autobgp_application::ports::{Exchange, PathInjector, UpstreamExchanger};
use autobgp_domain::{AddPathRequest, DomainError};
use hickory_proto::op::Message;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
pub struct MockUpstreamExchanger {
    response: Arc<Mutex<Option<Message>>>,
    error: Arc<Mutex<Option<DomainError>>>,
    calls: Arc<AtomicUsize>,
}

impl MockUpstreamExchanger {
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(None)),
            error: Arc::new(Mutex::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_response(&self, response: Message) {
        *self.response.lock().unwrap() = Some(response);
    }

    pub fn set_error(&self, error: DomainError) {
        *self.error.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockUpstreamExchanger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamExchanger for MockUpstreamExchanger {
    async fn exchange(&self, query: &Message) -> Result<Exchange, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.error.lock().unwrap().clone() {
            return Err(error);
        }

        let response = self.response.lock().unwrap().clone().ok_or_else(|| {
            DomainError::InvalidDnsResponse(format!("no canned response for id {}", query.id()))
        })?;

        Ok(Exchange {
            response,
            rtt: Duration::from_millis(3),
        })
    }
}

/// Records every submission; can be told to reject specific prefixes.
#[derive(Clone)]
pub struct MockPathInjector {
    submitted: Arc<Mutex<Vec<AddPathRequest>>>,
    reject: Arc<Mutex<Vec<Ipv4Addr>>>,
}

impl MockPathInjector {
    pub fn new() -> Self {
        Self {
            submitted: Arc::new(Mutex::new(Vec::new())),
            reject: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn reject(&self, addr: &str) {
        self.reject.lock().unwrap().push(addr.parse().unwrap());
    }

    pub fn submitted(&self) -> Vec<AddPathRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submitted_prefixes(&self) -> Vec<String> {
        self.submitted()
            .iter()
            .map(|r| r.path.nlri.to_string())
            .collect()
    }
}

impl Default for MockPathInjector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PathInjector for MockPathInjector {
    async fn add_path(&self, request: &AddPathRequest) -> Result<(), DomainError> {
        if self.reject.lock().unwrap().contains(&request.path.nlri.prefix) {
            return Err(DomainError::InjectionFailed {
                prefix: request.path.nlri.to_string(),
                reason: "speaker unavailable".to_string(),
            });
        }

        self.submitted.lock().unwrap().push(request.clone());
        Ok(())
    }
}
