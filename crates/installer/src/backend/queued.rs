//! Queue-driven staging and commit shared by session-based backends

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use aurora_errors::{Error, InstallerError};
use aurora_events::EventEmitter;
use aurora_platform::session::session_channel;
use aurora_platform::{SessionEvent, SessionEventReceiver, SessionEventSender};
use aurora_types::{Download, DownloadFile, InstallerKind, SessionInfo};
use tracing::{debug, error, info, warn};

use super::InstallerBackend;
use crate::base::InstallerBase;
use crate::queue::{Completion, InstallQueue, Reservation};

/// How a commit resolved
#[derive(Debug)]
pub enum CommitOutcome {
    /// The OS reports back through a session callback
    Pending,
    /// The transport finished the install itself
    Completed(Result<(), Error>),
}

/// Session primitives of one privilege mechanism
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Refuse the whole request before anything is staged
    async fn preflight(&self, _download: &Download) -> Result<(), Error> {
        Ok(())
    }

    /// Open a session for `package_name` and return its id
    async fn create(&self, package_name: &str) -> Result<i32, Error>;

    async fn write(&self, session_id: i32, name: &str, path: &Path) -> Result<(), Error>;

    async fn abandon(&self, session_id: i32) -> Result<(), Error>;

    async fn is_valid(&self, session_id: i32) -> Result<bool, Error>;

    async fn commit(&self, session: &SessionInfo) -> Result<CommitOutcome, Error>;

    /// Subscribe `sender` to session callbacks
    async fn register(&self, sender: SessionEventSender) -> Result<(), Error>;
}

/// Backend that stages one session per package and commits them in order
pub struct QueuedInstaller {
    kind: InstallerKind,
    base: InstallerBase,
    transport: Box<dyn SessionTransport>,
    queue: Mutex<InstallQueue>,
    events_tx: SessionEventSender,
    events_rx: Mutex<Option<SessionEventReceiver>>,
    registered: tokio::sync::Mutex<bool>,
}

impl std::fmt::Debug for QueuedInstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedInstaller")
            .field("kind", &self.kind)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

enum Step {
    Next(SessionInfo),
    Done,
}

/// Staging claim on a package, released on drop unless handed to the queue
struct StagingReservation<'a> {
    queue: &'a Mutex<InstallQueue>,
    package: Option<String>,
}

impl<'a> StagingReservation<'a> {
    fn new(queue: &'a Mutex<InstallQueue>, package: &str) -> Self {
        Self {
            queue,
            package: Some(package.to_string()),
        }
    }

    /// Hand the staged sessions to the queue, returning the head to commit
    fn enqueue(mut self, sessions: Vec<SessionInfo>) -> Option<SessionInfo> {
        let package = self.package.take()?;
        lock(self.queue).enqueue(&package, sessions)
    }
}

impl Drop for StagingReservation<'_> {
    fn drop(&mut self) {
        if let Some(package) = self.package.take() {
            debug!(package = %package, "releasing staging reservation");
            lock(self.queue).release(&package);
        }
    }
}

fn lock(queue: &Mutex<InstallQueue>) -> MutexGuard<'_, InstallQueue> {
    queue
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl QueuedInstaller {
    pub fn new(
        kind: InstallerKind,
        base: InstallerBase,
        transport: Box<dyn SessionTransport>,
    ) -> Self {
        let (events_tx, events_rx) = session_channel();
        Self {
            kind,
            base,
            transport,
            queue: Mutex::new(InstallQueue::new()),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            registered: tokio::sync::Mutex::new(false),
        }
    }

    fn queue(&self) -> MutexGuard<'_, InstallQueue> {
        lock(&self.queue)
    }

    /// Packages with a queued session set, in queue order
    #[must_use]
    pub fn queued_packages(&self) -> Vec<String> {
        self.queue().owners().map(str::to_string).collect()
    }

    /// Session ids queued for `package_name`, head first
    #[must_use]
    pub fn queued_sessions(&self, package_name: &str) -> Vec<i32> {
        self.queue()
            .get(package_name)
            .map(|set| set.sessions.iter().map(|s| s.session_id).collect())
            .unwrap_or_default()
    }

    async fn stage(
        &self,
        package_name: &str,
        version_code: i64,
        display_name: Option<&str>,
        files: &[DownloadFile],
    ) -> Result<SessionInfo, Error> {
        if files.is_empty() {
            return Err(InstallerError::NoFiles {
                package: package_name.to_string(),
            }
            .into());
        }

        let session_id = self.transport.create(package_name).await?;
        debug!(kind = %self.kind, session_id, package = package_name, "session created");

        for file in files {
            let entry = format!("{package_name}_{}", file.name);
            if let Err(e) = self.transport.write(session_id, &entry, &file.path).await {
                self.abandon_quietly(session_id).await;
                return Err(e);
            }
        }

        let mut session = SessionInfo::new(session_id, package_name, version_code);
        if let Some(name) = display_name {
            session = session.with_display_name(name);
        }
        Ok(session)
    }

    async fn stage_all(
        &self,
        download: &Download,
        staged: &mut Vec<SessionInfo>,
    ) -> Result<(), Error> {
        let pm = self.base.platform().package_manager();
        for lib in &download.shared_libs {
            let present = pm
                .is_shared_library_installed(&lib.package_name, lib.version_code)
                .await
                .unwrap_or_else(|e| {
                    debug!(library = %lib.package_name, error = %e, "shared library lookup failed");
                    false
                });
            if present {
                debug!(library = %lib.package_name, "shared library already installed");
                continue;
            }
            staged.push(
                self.stage(&lib.package_name, lib.version_code, None, &lib.files)
                    .await?,
            );
        }

        staged.push(
            self.stage(
                &download.package_name,
                download.version_code,
                Some(&download.display_name),
                &download.files,
            )
            .await?,
        );
        Ok(())
    }

    async fn abandon_quietly(&self, session_id: i32) {
        if let Err(e) = self.transport.abandon(session_id).await {
            debug!(session_id, error = %e, "abandon failed");
        }
    }

    async fn abandon_all(&self, sessions: &[SessionInfo]) {
        for session in sessions {
            self.abandon_quietly(session.session_id).await;
        }
    }

    async fn ensure_registered(&self) {
        let mut registered = self.registered.lock().await;
        if *registered {
            return;
        }
        match self.transport.register(self.events_tx.clone()).await {
            Ok(()) => {
                *registered = true;
                debug!(kind = %self.kind, "session callback registered");
            }
            Err(e) => warn!(kind = %self.kind, error = %e, "session callback registration failed"),
        }
    }

    /// Commit `session` and keep committing while the transport completes synchronously
    async fn commit_chain(&self, mut session: SessionInfo) {
        loop {
            match self.commit_one(&session).await {
                Step::Next(next) => session = next,
                Step::Done => return,
            }
        }
    }

    async fn commit_one(&self, session: &SessionInfo) -> Step {
        let result: Result<CommitOutcome, Error> = async {
            if !self.transport.is_valid(session.session_id).await? {
                return Err(InstallerError::SessionInvalid {
                    package: session.package_name.clone(),
                    session_id: session.session_id,
                }
                .into());
            }
            self.transport.commit(session).await
        }
        .await;

        match result {
            Ok(CommitOutcome::Pending) => {
                info!(
                    kind = %self.kind,
                    session_id = session.session_id,
                    package = %session.package_name,
                    "session committed"
                );
                self.queue().mark_committed(session.session_id);
                Step::Done
            }
            Ok(CommitOutcome::Completed(Ok(()))) => {
                info!(kind = %self.kind, package = %session.package_name, "installed");
                self.base.emit_installed(&session.package_name);
                self.on_finished(session.session_id, true).await
            }
            Ok(CommitOutcome::Completed(Err(e))) => {
                error!(kind = %self.kind, package = %session.package_name, error = %e, "install failed");
                self.base.emit_install_error(&session.package_name, &e);
                self.on_finished(session.session_id, false).await
            }
            Err(e) => {
                self.fail_commit(session, &e).await;
                Step::Done
            }
        }
    }

    /// Re-commit a head that already went to the OS. The set stays queued
    /// whatever happens; its callback settles it.
    async fn recommit(&self, head: &SessionInfo) {
        match self.transport.is_valid(head.session_id).await {
            Ok(true) => match self.transport.commit(head).await {
                Ok(_) => debug!(session_id = head.session_id, "head re-committed"),
                Err(e) => debug!(session_id = head.session_id, error = %e, "re-commit ignored"),
            },
            Ok(false) => debug!(session_id = head.session_id, "head awaiting callback"),
            Err(e) => debug!(session_id = head.session_id, error = %e, "head lookup failed"),
        }
    }

    async fn fail_commit(&self, session: &SessionInfo, e: &Error) {
        error!(
            kind = %self.kind,
            session_id = session.session_id,
            package = %session.package_name,
            error = %e,
            "commit failed"
        );
        let released = self.queue().release_containing(session.session_id);
        let (owner, sessions) =
            released.unwrap_or_else(|| (session.package_name.clone(), Vec::new()));
        let remaining: Vec<_> = sessions
            .into_iter()
            .filter(|s| s.session_id != session.session_id)
            .collect();
        self.abandon_quietly(session.session_id).await;
        self.abandon_all(&remaining).await;
        self.base.emit_install_error(owner, e);
    }

    async fn on_finished(&self, session_id: i32, success: bool) -> Step {
        let completion = self.queue().on_finished(session_id, success);
        match completion {
            Completion::CommitNext(next) => Step::Next(next),
            Completion::Completed { owner } => {
                debug!(kind = %self.kind, package = %owner, "session set completed");
                Step::Done
            }
            Completion::Aborted {
                owner,
                failed,
                remaining,
            } => {
                warn!(
                    kind = %self.kind,
                    package = %owner,
                    failed = %failed.package_name,
                    "session set aborted"
                );
                self.abandon_all(&remaining).await;
                if !remaining.is_empty() {
                    let e: Error = InstallerError::DependencyFailed {
                        package: owner.clone(),
                        dependency: failed.package_name,
                    }
                    .into();
                    self.base.emit_install_error(owner, &e);
                }
                Step::Done
            }
            Completion::NotTracked => {
                debug!(kind = %self.kind, session_id, "finished session not tracked");
                Step::Done
            }
        }
    }
}

#[async_trait]
impl InstallerBackend for QueuedInstaller {
    fn kind(&self) -> InstallerKind {
        self.kind
    }

    async fn install(&self, download: &Download) {
        let package = download.package_name.as_str();
        info!(kind = %self.kind, package, version_code = download.version_code, "install requested");
        self.ensure_registered().await;

        let reservation = self.queue().reserve(package);
        match reservation {
            Reservation::New => {}
            Reservation::Staging => {
                debug!(package, "already staging");
                return;
            }
            Reservation::Pending(head) => {
                debug!(package, session_id = head.session_id, "already queued, committing head");
                self.commit_chain(head).await;
                return;
            }
            Reservation::Committed(head) => {
                debug!(package, session_id = head.session_id, "already committed, re-triggering");
                self.recommit(&head).await;
                return;
            }
        }
        let reservation = StagingReservation::new(&self.queue, package);

        if let Err(e) = self.transport.preflight(download).await {
            warn!(kind = %self.kind, package, error = %e, "install refused");
            drop(reservation);
            self.base.emit_install_error(package, &e);
            return;
        }

        let mut staged = Vec::new();
        if let Err(e) = self.stage_all(download, &mut staged).await {
            error!(kind = %self.kind, package, error = %e, "staging failed");
            self.abandon_all(&staged).await;
            drop(reservation);
            self.base.emit_install_error(package, &e);
            return;
        }

        if let Some(head) = reservation.enqueue(staged) {
            self.commit_chain(head).await;
        }
    }

    fn take_session_events(&self) -> Option<SessionEventReceiver> {
        self.events_rx
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
    }

    async fn register_callbacks(&self) {
        self.ensure_registered().await;
    }

    async fn handle_session_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::Created { .. } => {}
            SessionEvent::Progress {
                session_id,
                progress,
            } => {
                if progress <= 0.0 {
                    return;
                }
                let owner = self.queue().owner_of(session_id).map(str::to_string);
                if let Some(owner) = owner {
                    self.base.emit_installing(owner, progress);
                }
            }
            SessionEvent::Finished {
                session_id,
                success,
            } => {
                if let Step::Next(next) = self.on_finished(session_id, success).await {
                    self.commit_chain(next).await;
                }
            }
        }
    }
}
