//! In-memory fakes for the core ports, shared by unit tests.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use portal_types::error::{NotifyError, SessionError};
use portal_types::notifier::Channel;
use portal_types::session::SessionResult;
use tokio::sync::{Notify, Semaphore};

use crate::cache::CacheFs;
use crate::notify::Notifier;
use crate::session::{BoundPortal, PortalContext, PortalLauncher};

// ---------------------------------------------------------------------------
// MemoryFs
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FsState {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    fail_writes: HashSet<String>,
    fail_removals: HashSet<String>,
    fail_listing: bool,
    listing_gate: Option<ListingGate>,
}

/// Holds `list_dir` calls until opened.
#[derive(Clone)]
pub struct ListingGate {
    entered: Arc<Notify>,
    release: Arc<Semaphore>,
}

impl ListingGate {
    /// Resolves once a `list_dir` call is parked on the gate.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let one parked `list_dir` call continue.
    pub fn open(&self) {
        self.release.add_permits(1);
    }
}

/// In-memory `CacheFs` with per-name failure injection.
#[derive(Clone, Default)]
pub struct MemoryFs {
    state: Arc<Mutex<FsState>>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes_named(&self, name: &str) {
        self.state.lock().unwrap().fail_writes.insert(name.to_string());
    }

    pub fn fail_removal_named(&self, name: &str) {
        self.state.lock().unwrap().fail_removals.insert(name.to_string());
    }

    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_listing = true;
    }

    /// Park every later `list_dir` call until the returned gate is opened.
    pub fn gate_listing(&self) -> ListingGate {
        let gate = ListingGate {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Semaphore::new(0)),
        };
        self.state.lock().unwrap().listing_gate = Some(gate.clone());
        gate
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.state.lock().unwrap().dirs.contains(path)
    }

    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    /// Sorted names of the direct children of `path`.
    pub fn list(&self, path: &Path) -> Vec<String> {
        let state = self.state.lock().unwrap();
        Self::children(&state, path)
    }

    fn children(state: &FsState, path: &Path) -> Vec<String> {
        let dirs = state.dirs.iter().filter(|d| d.parent() == Some(path));
        let files = state.files.keys().filter(|f| f.parent() == Some(path));
        dirs.chain(files)
            .map(|p| file_name(p))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn remove_tree(state: &mut FsState, path: &Path) {
        state.dirs.retain(|d| !d.starts_with(path));
        state.files.retain(|f, _| !f.starts_with(path));
    }
}

impl CacheFs for MemoryFs {
    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                state.dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes.contains(&file_name(path)) {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "no space left on device"));
        }
        let parent_exists = path.parent().is_some_and(|p| state.dirs.contains(p));
        if !parent_exists {
            return Err(io::Error::new(io::ErrorKind::NotFound, "parent directory missing"));
        }
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    async fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let gate = self.state.lock().unwrap().listing_gate.clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            let _permit = gate.release.acquire().await;
        }

        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        if !state.dirs.contains(path) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
        }
        Ok(Self::children(&state, path))
    }

    async fn remove_entry(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_removals.contains(&file_name(path)) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "operation not permitted"));
        }
        if state.files.remove(path).is_some() {
            return Ok(());
        }
        if state.dirs.contains(path) {
            Self::remove_tree(&mut state, path);
            return Ok(());
        }
        Err(io::Error::new(io::ErrorKind::NotFound, "no such entry"))
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.dirs.contains(path) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
        }
        Self::remove_tree(&mut state, path);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FakeNotifier
// ---------------------------------------------------------------------------

/// Records every call as `verify` or `notify:{title or -}:{message}`.
#[derive(Clone)]
pub struct FakeNotifier {
    channel: Channel,
    fail_verify: bool,
    fail_notify: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeNotifier {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            fail_verify: false,
            fail_notify: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_verify(mut self) -> Self {
        self.fail_verify = true;
        self
    }

    pub fn failing_notify(mut self) -> Self {
        self.fail_notify = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Notifier for FakeNotifier {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn portal_link(&self, url: &str) -> String {
        format!("<{url}>")
    }

    async fn verify(&self) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push("verify".to_string());
        if self.fail_verify {
            return Err(NotifyError::InvalidCredentialProvided {
                channel: self.channel,
            });
        }
        Ok(())
    }

    async fn notify(&self, title: Option<&str>, message: &str) -> Result<Option<String>, NotifyError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("notify:{}:{message}", title.unwrap_or("-")));
        if self.fail_notify {
            return Err(NotifyError::FailedToSendMessage {
                channel: self.channel,
                reason: "channel_not_found".to_string(),
            });
        }
        Ok(Some("1700000000.000100".to_string()))
    }
}

// ---------------------------------------------------------------------------
// FakeLauncher
// ---------------------------------------------------------------------------

pub enum LaunchBehavior {
    /// Serve until the session signals shutdown.
    ServeUntilShutdown,
    /// Binding fails outright.
    FailBind,
    /// Serving fails right after binding.
    ServeError(String),
    /// A user action arrives after `after` and schedules `result`.
    Act {
        after: Duration,
        result: SessionResult,
        grace: Duration,
    },
}

#[derive(Clone, Default)]
pub struct BindCounter(Arc<AtomicUsize>);

impl BindCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct FakeLauncher {
    behavior: LaunchBehavior,
    binds: BindCounter,
}

impl FakeLauncher {
    pub const URL: &'static str = "http://localhost:8080";

    pub fn new(behavior: LaunchBehavior) -> Self {
        Self {
            behavior,
            binds: BindCounter::default(),
        }
    }

    pub fn bind_counter(&self) -> BindCounter {
        self.binds.clone()
    }
}

impl PortalLauncher<MemoryFs> for FakeLauncher {
    async fn launch(self, context: PortalContext<MemoryFs>) -> Result<BoundPortal, SessionError> {
        self.binds.0.fetch_add(1, Ordering::SeqCst);
        let control = context.control;
        let token = control.shutdown_token();

        let serve: crate::session::ServeFuture = match self.behavior {
            LaunchBehavior::FailBind => {
                return Err(SessionError::Listener("address already in use".to_string()));
            }
            LaunchBehavior::ServeError(reason) => Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err(reason)
            }),
            LaunchBehavior::ServeUntilShutdown => Box::pin(async move {
                token.cancelled().await;
                Ok(())
            }),
            LaunchBehavior::Act {
                after,
                result,
                grace,
            } => Box::pin(async move {
                let act = async {
                    tokio::time::sleep(after).await;
                    if control.begin_closing() {
                        control.schedule_finish(result, grace);
                    }
                    std::future::pending::<()>().await
                };
                tokio::select! {
                    _ = token.cancelled() => {}
                    _ = act => {}
                }
                Ok(())
            }),
        };

        Ok(BoundPortal {
            url: Self::URL.to_string(),
            serve,
        })
    }
}
