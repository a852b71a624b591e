use crate::domain::SubmissionRecord;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Endpoint the recruitment form posts completed records to.
pub const FORM_ENDPOINT: &str =
    "https://form.reyansh7447.workers.dev/postSubmit?fid=1FAIpQLSfxOun5tvPPIToe3JR3w4jj8V-su3e6kYmHlmrByQoTtqoTpQ";

#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    Network(String),
    Status(u16),
    Serialization(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Network(reason) => write!(f, "Network error: {}", reason),
            TransportError::Status(code) => write!(f, "Server responded with status {}", code),
            TransportError::Serialization(reason) => {
                write!(f, "Could not serialize the record: {}", reason)
            }
        }
    }
}

impl std::error::Error for TransportError {}

/// Channel that delivers a completed record to the remote system.
///
/// Implementations block until the record is delivered or refused; the
/// wizard runs them off the UI thread through [`SubmissionWorker`]. Every
/// non-success outcome is reported uniformly as a [`TransportError`].
pub trait SubmissionTransport: Send + Sync {
    fn deliver(&self, record: &SubmissionRecord) -> Result<(), TransportError>;
}

/// Posts records as JSON to a fixed HTTP endpoint.
pub struct HttpSubmitter {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl SubmissionTransport for HttpSubmitter {
    fn deliver(&self, record: &SubmissionRecord) -> Result<(), TransportError> {
        let body = serde_json::to_string(record)
            .map_err(|e| TransportError::Serialization(e.to_string()))?;
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(TransportError::Status(response.status().as_u16()))
        }
    }
}

/// Runs at most one delivery at a time on a background thread.
///
/// `dispatch` hands a record to the transport on a fresh thread and keeps
/// the receiving end of a one-shot channel; `poll` drains that channel
/// without blocking so the event loop can keep rendering while the request
/// is in flight. The completion arrives exactly once per dispatch.
pub struct SubmissionWorker {
    transport: Arc<dyn SubmissionTransport>,
    pending: Option<Receiver<Result<(), TransportError>>>,
}

impl SubmissionWorker {
    pub fn new(transport: Arc<dyn SubmissionTransport>) -> Self {
        Self {
            transport,
            pending: None,
        }
    }

    /// Whether a dispatched delivery has not completed yet.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts delivering `record` in the background.
    ///
    /// Ignored while an earlier delivery is still pending; the controller's
    /// submitting phase already prevents this, so the guard here only
    /// protects against a miswired caller.
    pub fn dispatch(&mut self, record: SubmissionRecord) {
        if self.pending.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        let transport = Arc::clone(&self.transport);
        thread::spawn(move || {
            let _ = tx.send(transport.deliver(&record));
        });
        self.pending = Some(rx);
    }

    /// Returns the outcome of the pending delivery, if it has arrived.
    ///
    /// A worker thread that died without reporting (a panicking transport)
    /// surfaces as a network-class failure rather than hanging the wizard.
    pub fn poll(&mut self) -> Option<Result<(), TransportError>> {
        let outcome = match &self.pending {
            Some(rx) => match rx.try_recv() {
                Ok(result) => Some(result),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Err(TransportError::Network(
                    "submission worker stopped unexpectedly".to_string(),
                ))),
            },
            None => None,
        };
        if outcome.is_some() {
            self.pending = None;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{App, FAILURE_MESSAGE, Phase, SUCCESS_MESSAGE};
    use crate::domain::{FormRecord, FormTemplate, RecordAssembler};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubTransport {
        outcome: Result<(), TransportError>,
        calls: AtomicUsize,
    }

    impl StubTransport {
        fn new(outcome: Result<(), TransportError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl SubmissionTransport for StubTransport {
        fn deliver(&self, _record: &SubmissionRecord) -> Result<(), TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    /// Blocks each delivery until the test releases it.
    struct GatedTransport {
        gate: Mutex<Receiver<()>>,
        calls: AtomicUsize,
    }

    impl SubmissionTransport for GatedTransport {
        fn deliver(&self, _record: &SubmissionRecord) -> Result<(), TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _ = self.gate.lock().unwrap().recv();
            Ok(())
        }
    }

    struct PanickingTransport;

    impl SubmissionTransport for PanickingTransport {
        fn deliver(&self, _record: &SubmissionRecord) -> Result<(), TransportError> {
            panic!("transport blew up");
        }
    }

    fn sample_record() -> SubmissionRecord {
        let template = FormTemplate::recruitment();
        let mut record = FormRecord::new(&template);
        record.set_scalar("Name", "Asha Rao".to_string());
        record.toggle("Department", "Technical", true);
        RecordAssembler::new(&template).assemble(&record)
    }

    fn wait_for_outcome(worker: &mut SubmissionWorker) -> Result<(), TransportError> {
        for _ in 0..200 {
            if let Some(outcome) = worker.poll() {
                return outcome;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("worker never produced an outcome");
    }

    /// Minimal single-request HTTP endpoint answering with `status_line`.
    fn spawn_http_stub(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            // Read until the headers end, then drain the announced body
            let body_len = loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break 0;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text
                        .lines()
                        .find_map(|line| {
                            line.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    break content_length.saturating_sub(request.len() - header_end - 4);
                }
            };
            let mut remaining = body_len;
            while remaining > 0 {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                remaining = remaining.saturating_sub(n);
            }
            let response = format!("{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/postSubmit")
    }

    #[test]
    fn test_transport_error_display() {
        assert_eq!(
            TransportError::Network("connection refused".to_string()).to_string(),
            "Network error: connection refused"
        );
        assert_eq!(
            TransportError::Status(500).to_string(),
            "Server responded with status 500"
        );
        assert_eq!(
            TransportError::Serialization("bad value".to_string()).to_string(),
            "Could not serialize the record: bad value"
        );
    }

    #[test]
    fn test_worker_delivers_exactly_once() {
        let transport = StubTransport::new(Ok(()));
        let mut worker = SubmissionWorker::new(transport.clone());

        worker.dispatch(sample_record());
        assert!(worker.is_pending());

        assert_eq!(wait_for_outcome(&mut worker), Ok(()));
        assert!(!worker.is_pending());
        assert!(worker.poll().is_none());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_while_pending_is_ignored() {
        let (release, gate) = mpsc::channel();
        let transport = Arc::new(GatedTransport {
            gate: Mutex::new(gate),
            calls: AtomicUsize::new(0),
        });
        let mut worker = SubmissionWorker::new(transport.clone());

        worker.dispatch(sample_record());
        worker.dispatch(sample_record());
        assert!(worker.is_pending());

        release.send(()).unwrap();
        assert_eq!(wait_for_outcome(&mut worker), Ok(()));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dead_worker_reports_network_failure() {
        let mut worker = SubmissionWorker::new(Arc::new(PanickingTransport));

        worker.dispatch(sample_record());
        match wait_for_outcome(&mut worker) {
            Err(TransportError::Network(reason)) => {
                assert!(reason.contains("stopped unexpectedly"));
            }
            other => panic!("expected a network failure, got {:?}", other),
        }
    }

    #[test]
    fn test_http_submitter_success() {
        let endpoint = spawn_http_stub("HTTP/1.1 200 OK");
        let submitter = HttpSubmitter::new(endpoint);

        assert_eq!(submitter.deliver(&sample_record()), Ok(()));
    }

    #[test]
    fn test_http_submitter_non_success_status() {
        let endpoint = spawn_http_stub("HTTP/1.1 500 Internal Server Error");
        let submitter = HttpSubmitter::new(endpoint);

        assert_eq!(
            submitter.deliver(&sample_record()),
            Err(TransportError::Status(500))
        );
    }

    #[test]
    fn test_http_submitter_unreachable_endpoint() {
        // Bind and drop immediately so the port is very likely closed
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let submitter = HttpSubmitter::new(format!("http://{addr}/postSubmit"));

        match submitter.deliver(&sample_record()) {
            Err(TransportError::Network(_)) => {}
            other => panic!("expected a network failure, got {:?}", other),
        }
    }

    fn submit_ready_app() -> App {
        let mut app = App::default();
        for (step, value) in [
            "Asha Rao",
            "1st",
            "9999999999",
            "21CS001",
            "asha@example.com",
        ]
        .iter()
        .enumerate()
        {
            if matches!(
                app.active_field().kind,
                crate::domain::FieldKind::Select { .. }
            ) {
                app.choose_option();
            } else {
                app.input = value.to_string();
                app.commit_input();
            }
            assert!(app.advance(), "step {} should advance", step);
        }
        app.toggle_current_option(); // Creativity
        app.move_option_down();
        app.move_option_down();
        app.toggle_current_option(); // Technical
        app
    }

    #[test]
    fn test_full_submission_success_path() {
        let transport = StubTransport::new(Ok(()));
        let mut worker = SubmissionWorker::new(transport.clone());
        let mut app = submit_ready_app();

        let record = app.begin_submit().expect("submission should start");
        assert_eq!(record.get("Department"), Some("Creativity, Technical"));
        worker.dispatch(record);

        // A second submit while in flight reaches neither phase nor wire
        assert!(app.begin_submit().is_none());

        let outcome = wait_for_outcome(&mut worker);
        app.set_submit_result(outcome.map_err(|e| e.to_string()));

        assert_eq!(app.phase(), Phase::Succeeded);
        assert_eq!(app.result_message(), Some(SUCCESS_MESSAGE));
        assert!(app.celebrate());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_full_submission_failure_path() {
        let transport = StubTransport::new(Err(TransportError::Status(502)));
        let mut worker = SubmissionWorker::new(transport);
        let mut app = submit_ready_app();

        let record = app.begin_submit().unwrap();
        worker.dispatch(record);
        let outcome = wait_for_outcome(&mut worker);
        app.set_submit_result(outcome.map_err(|e| e.to_string()));

        assert_eq!(app.phase(), Phase::Failed);
        assert_eq!(app.result_message(), Some(FAILURE_MESSAGE));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Server responded with status 502")
        );
        // Entered data survives the failed attempt
        assert_eq!(app.record().scalar("Name"), Some("Asha Rao"));
        assert!(app.record().selection("Department").contains("Technical"));
    }
}
