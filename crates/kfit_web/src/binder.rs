//! Form submission binder, kept free of web-sys so it can be tested on the host.
//!
//! The browser wiring in `web` supplies a [`Page`] backed by the DOM and a
//! [`Transport`] backed by `fetch`; tests supply fakes.

use std::cell::Cell;

pub const FORM_SELECTOR: &str = "#draw";
pub const TARGET_SELECTOR: &str = "#svg_img";
pub const BUTTON_SELECTOR: &str = "#fitplot";
pub const DRAW_URL: &str = "/draw";

/// Status text handed to the success callback, as jQuery reports it.
pub const SUCCESS_STATUS_TEXT: &str = "success";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Post => "POST",
        }
    }
}

/// What to do when the POST does not succeed.
///
/// The page this replaces had no failure handler at all: the button simply
/// never got enabled. `Silent` keeps that behaviour; `Log` reports the failure
/// to the console and otherwise changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Silent,
    Log,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinderConfig {
    pub form: &'static str,
    pub target: &'static str,
    pub url: &'static str,
    pub method: Method,
    pub button: &'static str,
    pub on_failure: FailurePolicy,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            form: FORM_SELECTOR,
            target: TARGET_SELECTOR,
            url: DRAW_URL,
            method: Method::Post,
            button: BUTTON_SELECTOR,
            on_failure: FailurePolicy::Silent,
        }
    }
}

/// One outgoing form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest<B> {
    /// 1-based submission counter; every submit gets a fresh one.
    pub seq: u64,
    pub url: &'static str,
    pub method: Method,
    pub body: B,
}

/// What came back from the server, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The request never produced a response (offline, CORS, aborted).
    Network(String),
    Status { status: u16, status_text: String },
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Network(msg) => write!(f, "network error: {msg}"),
            SubmitError::Status {
                status,
                status_text,
            } => write!(f, "HTTP {status} {status_text}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success(Reply),
    Failed(SubmitError),
}

impl SubmitOutcome {
    pub fn from_result(result: Result<Reply, SubmitError>) -> Self {
        match result {
            Ok(reply) if reply.is_success() => SubmitOutcome::Success(reply),
            Ok(reply) => SubmitOutcome::Failed(SubmitError::Status {
                status: reply.status,
                status_text: reply.status_text,
            }),
            Err(e) => SubmitOutcome::Failed(e),
        }
    }
}

/// Arguments of the success callback: response text, status text, the
/// transport's reply and the submitting form.
pub struct SuccessArgs<'a, F> {
    pub response_text: &'a str,
    pub status_text: &'a str,
    pub reply: &'a Reply,
    pub form: &'a F,
}

/// The DOM operations the binder needs.
pub trait Page {
    fn set_inner_html(&self, selector: &str, html: &str) -> Result<(), String>;
    fn set_disabled(&self, selector: &str, disabled: bool) -> Result<(), String>;
}

/// Sends a submission and resolves once the server has answered.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Body;

    async fn send(&self, req: &SubmitRequest<Self::Body>) -> Result<Reply, SubmitError>;
}

/// The success callback: clear `disabled` on the target button.
pub fn enable_button<P: Page, F>(
    page: &P,
    cfg: &BinderConfig,
    _args: &SuccessArgs<'_, F>,
) -> Result<(), String> {
    page.set_disabled(cfg.button, false)
}

pub struct FormBinder {
    cfg: BinderConfig,
    submissions: Cell<u64>,
}

impl FormBinder {
    pub fn new(cfg: BinderConfig) -> Self {
        Self {
            cfg,
            submissions: Cell::new(0),
        }
    }

    pub fn config(&self) -> &BinderConfig {
        &self.cfg
    }

    pub fn submissions(&self) -> u64 {
        self.submissions.get()
    }

    pub fn request<B>(&self, body: B) -> SubmitRequest<B> {
        let seq = self.submissions.get() + 1;
        self.submissions.set(seq);
        SubmitRequest {
            seq,
            url: self.cfg.url,
            method: self.cfg.method,
            body,
        }
    }

    /// Submit `body` and apply the outcome to the page.
    ///
    /// No retry and no in-flight guard: every call is an independent POST.
    pub async fn submit<P, T, F>(
        &self,
        page: &P,
        transport: &T,
        form: &F,
        body: T::Body,
    ) -> SubmitOutcome
    where
        P: Page,
        T: Transport,
    {
        let req = self.request(body);
        log::debug!(
            "submit #{}: {} {}",
            req.seq,
            req.method.as_str(),
            req.url
        );

        let outcome = SubmitOutcome::from_result(transport.send(&req).await);
        match &outcome {
            SubmitOutcome::Success(reply) => {
                if let Err(e) = page.set_inner_html(self.cfg.target, &reply.body) {
                    log::warn!("submit #{}: {}", req.seq, e);
                }
                let args = SuccessArgs {
                    response_text: &reply.body,
                    status_text: SUCCESS_STATUS_TEXT,
                    reply,
                    form,
                };
                if let Err(e) = enable_button(page, &self.cfg, &args) {
                    log::warn!("submit #{}: {}", req.seq, e);
                }
            }
            SubmitOutcome::Failed(err) => match self.cfg.on_failure {
                FailurePolicy::Silent => {}
                FailurePolicy::Log => log::warn!("submit #{} failed: {}", req.seq, err),
            },
        }
        outcome
    }
}

/// Start-up order: the greeter runs immediately, the binder once the DOM is
/// ready. `defer` receives `bind` when the document is still loading.
pub fn startup<G, B, D>(greet: G, document_ready: bool, bind: B, defer: D)
where
    G: FnOnce(),
    B: FnOnce() + 'static,
    D: FnOnce(Box<dyn FnOnce()>),
{
    greet();
    if document_ready {
        bind();
    } else {
        defer(Box::new(bind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakePage {
        disabled: RefCell<HashMap<String, bool>>,
        html: RefCell<HashMap<String, String>>,
        writes: Cell<usize>,
    }

    impl FakePage {
        fn with_button_disabled(disabled: bool) -> Self {
            let page = FakePage::default();
            page.disabled
                .borrow_mut()
                .insert(BUTTON_SELECTOR.to_string(), disabled);
            page
        }

        fn button_disabled(&self) -> Option<bool> {
            self.disabled.borrow().get(BUTTON_SELECTOR).copied()
        }
    }

    impl Page for FakePage {
        fn set_inner_html(&self, selector: &str, html: &str) -> Result<(), String> {
            self.writes.set(self.writes.get() + 1);
            self.html
                .borrow_mut()
                .insert(selector.to_string(), html.to_string());
            Ok(())
        }

        fn set_disabled(&self, selector: &str, disabled: bool) -> Result<(), String> {
            self.writes.set(self.writes.get() + 1);
            self.disabled
                .borrow_mut()
                .insert(selector.to_string(), disabled);
            Ok(())
        }
    }

    type Fields = Vec<(&'static str, &'static str)>;

    #[derive(Default)]
    struct FakeTransport {
        replies: RefCell<VecDeque<Result<Reply, SubmitError>>>,
        sent: RefCell<Vec<SubmitRequest<Fields>>>,
    }

    impl FakeTransport {
        fn replying(replies: Vec<Result<Reply, SubmitError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                sent: RefCell::default(),
            }
        }
    }

    impl Transport for FakeTransport {
        type Body = Fields;

        async fn send(&self, req: &SubmitRequest<Fields>) -> Result<Reply, SubmitError> {
            self.sent.borrow_mut().push(req.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(SubmitError::Network("no reply queued".into())))
        }
    }

    fn ok_svg() -> Result<Reply, SubmitError> {
        Ok(Reply {
            status: 200,
            status_text: "OK".into(),
            body: "<svg>...</svg>".into(),
        })
    }

    fn fields() -> Fields {
        vec![("title", "Iris"), ("clusters", "3")]
    }

    #[test]
    fn greeter_runs_once_before_binding() {
        let log: Rc<RefCell<Vec<&str>>> = Rc::default();
        let deferred: RefCell<Option<Box<dyn FnOnce()>>> = RefCell::new(None);

        let l1 = Rc::clone(&log);
        let l2 = Rc::clone(&log);
        startup(
            move || l1.borrow_mut().push("greet"),
            false,
            move || l2.borrow_mut().push("bind"),
            |f| *deferred.borrow_mut() = Some(f),
        );
        assert_eq!(*log.borrow(), vec!["greet"]);

        // DOMContentLoaded fires later.
        let bind = deferred.borrow_mut().take().expect("bind deferred");
        bind();
        assert_eq!(*log.borrow(), vec!["greet", "bind"]);
    }

    #[test]
    fn startup_binds_immediately_when_document_is_parsed() {
        let log: Rc<RefCell<Vec<&str>>> = Rc::default();
        let l1 = Rc::clone(&log);
        let l2 = Rc::clone(&log);
        startup(
            move || l1.borrow_mut().push("greet"),
            true,
            move || l2.borrow_mut().push("bind"),
            |_| panic!("should not defer"),
        );
        assert_eq!(*log.borrow(), vec!["greet", "bind"]);
    }

    #[test]
    fn binding_does_not_touch_the_button() {
        let page = FakePage::with_button_disabled(true);
        let binder = FormBinder::new(BinderConfig::default());
        assert_eq!(binder.submissions(), 0);
        assert_eq!(page.writes.get(), 0);
        assert_eq!(page.button_disabled(), Some(true));
    }

    #[test]
    fn submit_posts_form_fields_to_draw_once() {
        let page = FakePage::with_button_disabled(true);
        let transport = FakeTransport::replying(vec![ok_svg()]);
        let binder = FormBinder::new(BinderConfig::default());

        pollster::block_on(binder.submit(&page, &transport, &(), fields()));

        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "/draw");
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].method.as_str(), "POST");
        assert_eq!(sent[0].body, fields());
    }

    #[test]
    fn success_injects_markup_and_enables_button() {
        let page = FakePage::with_button_disabled(true);
        let transport = FakeTransport::replying(vec![ok_svg()]);
        let binder = FormBinder::new(BinderConfig::default());

        let outcome = pollster::block_on(binder.submit(&page, &transport, &(), fields()));

        assert!(matches!(outcome, SubmitOutcome::Success(_)));
        assert_eq!(page.button_disabled(), Some(false));
        assert_eq!(
            page.html.borrow().get(TARGET_SELECTOR).map(String::as_str),
            Some("<svg>...</svg>")
        );
    }

    #[test]
    fn server_error_leaves_button_unchanged() {
        let page = FakePage::with_button_disabled(true);
        let transport = FakeTransport::replying(vec![Ok(Reply {
            status: 500,
            status_text: "Internal Server Error".into(),
            body: "boom".into(),
        })]);
        let binder = FormBinder::new(BinderConfig::default());

        let outcome = pollster::block_on(binder.submit(&page, &transport, &(), fields()));

        assert_eq!(
            outcome,
            SubmitOutcome::Failed(SubmitError::Status {
                status: 500,
                status_text: "Internal Server Error".into()
            })
        );
        assert_eq!(page.button_disabled(), Some(true));
        assert_eq!(page.writes.get(), 0);
        assert!(page.html.borrow().is_empty());
    }

    /// Global `log` sink shared by every test in this binary; assertions
    /// filter on a message unique to the test.
    struct CaptureLog;

    static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static CAPTURE: CaptureLog = CaptureLog;

    impl log::Log for CaptureLog {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                WARNINGS.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    fn warnings_mentioning(needle: &str) -> usize {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Warn);
        WARNINGS
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.contains(needle))
            .count()
    }

    #[test]
    fn failure_policy_decides_whether_failures_are_logged() {
        warnings_mentioning("");
        for (policy, reason, expected) in [
            (FailurePolicy::Silent, "dns lookup failed (silent)", 0),
            (FailurePolicy::Log, "dns lookup failed (logged)", 1),
        ] {
            let page = FakePage::with_button_disabled(true);
            let transport = FakeTransport::replying(vec![Err(SubmitError::Network(reason.into()))]);
            let binder = FormBinder::new(BinderConfig {
                on_failure: policy,
                ..BinderConfig::default()
            });

            pollster::block_on(binder.submit(&page, &transport, &(), fields()));

            assert_eq!(warnings_mentioning(reason), expected, "{policy:?}");
            assert_eq!(page.writes.get(), 0);
        }
    }

    #[test]
    fn network_error_leaves_button_unchanged() {
        for policy in [FailurePolicy::Silent, FailurePolicy::Log] {
            let page = FakePage::with_button_disabled(true);
            let transport =
                FakeTransport::replying(vec![Err(SubmitError::Network("offline".into()))]);
            let binder = FormBinder::new(BinderConfig {
                on_failure: policy,
                ..BinderConfig::default()
            });

            let outcome = pollster::block_on(binder.submit(&page, &transport, &(), fields()));

            assert!(matches!(
                outcome,
                SubmitOutcome::Failed(SubmitError::Network(_))
            ));
            assert_eq!(page.button_disabled(), Some(true));
        }
    }

    #[test]
    fn resubmitting_sends_a_second_independent_post() {
        let page = FakePage::with_button_disabled(true);
        let transport = FakeTransport::replying(vec![ok_svg(), ok_svg()]);
        let binder = FormBinder::new(BinderConfig::default());

        pollster::block_on(binder.submit(&page, &transport, &(), fields()));
        pollster::block_on(binder.submit(&page, &transport, &(), fields()));

        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].seq, 1);
        assert_eq!(sent[1].seq, 2);
        assert_eq!(binder.submissions(), 2);
        assert_eq!(page.button_disabled(), Some(false));
    }

    #[test]
    fn redirect_class_statuses_are_failures() {
        let outcome = SubmitOutcome::from_result(Ok(Reply {
            status: 304,
            status_text: "Not Modified".into(),
            body: String::new(),
        }));
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    }
}
