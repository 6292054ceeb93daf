//! Per-backend install queue
//!
//! A queue of session sets, one per requesting package. Each set holds its
//! sessions in commit order (shared libraries first, main package last). The
//! queue only decides what happens next; callers perform the OS calls.

use std::collections::VecDeque;

use aurora_types::SessionInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetState {
    /// Reserved while sessions are being created and written
    Staging,
    /// Head session about to be committed
    Committing,
    /// Head session committed; waiting for its callback
    AwaitingCallback(i32),
}

/// Ordered sessions belonging to one install request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSet {
    pub owner: String,
    pub state: SetState,
    pub sessions: VecDeque<SessionInfo>,
}

impl SessionSet {
    fn contains(&self, session_id: i32) -> bool {
        self.sessions.iter().any(|s| s.session_id == session_id)
    }
}

/// Outcome of reserving a package for staging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// Nothing queued for the package; the caller stages it
    New,
    /// Another request is still staging the package
    Staging,
    /// A set is queued; the caller re-commits its head
    Pending(SessionInfo),
    /// The head was committed and its callback has not arrived yet
    Committed(SessionInfo),
}

/// What the caller must do after a session finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Commit the next member of the same set
    CommitNext(SessionInfo),
    /// Last member succeeded; the set is gone
    Completed { owner: String },
    /// A member failed; the set is gone and `remaining` must be abandoned
    Aborted {
        owner: String,
        failed: SessionInfo,
        remaining: Vec<SessionInfo>,
    },
    /// Session does not belong to any queued set
    NotTracked,
}

#[derive(Debug, Default)]
pub struct InstallQueue {
    sets: Vec<SessionSet>,
}

impl InstallQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    #[must_use]
    pub fn contains(&self, owner: &str) -> bool {
        self.sets.iter().any(|set| set.owner == owner)
    }

    #[must_use]
    pub fn get(&self, owner: &str) -> Option<&SessionSet> {
        self.sets.iter().find(|set| set.owner == owner)
    }

    /// Owners in queue order
    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|set| set.owner.as_str())
    }

    /// Owner of the set that contains `session_id`
    #[must_use]
    pub fn owner_of(&self, session_id: i32) -> Option<&str> {
        self.sets
            .iter()
            .find(|set| set.contains(session_id))
            .map(|set| set.owner.as_str())
    }

    /// Claim `owner` for staging unless a set for it already exists
    pub fn reserve(&mut self, owner: &str) -> Reservation {
        match self.get(owner) {
            Some(set) => match (set.state, set.sessions.front().cloned()) {
                (SetState::Staging, _) | (_, None) => Reservation::Staging,
                (SetState::AwaitingCallback(_), Some(head)) => Reservation::Committed(head),
                (SetState::Committing, Some(head)) => Reservation::Pending(head),
            },
            None => {
                self.sets.push(SessionSet {
                    owner: owner.to_string(),
                    state: SetState::Staging,
                    sessions: VecDeque::new(),
                });
                Reservation::New
            }
        }
    }

    /// Store the staged sessions of a reserved set and return the head to commit.
    /// An empty set is dropped.
    pub fn enqueue(&mut self, owner: &str, sessions: Vec<SessionInfo>) -> Option<SessionInfo> {
        if sessions.is_empty() {
            self.release(owner);
            return None;
        }
        let head = sessions.first().cloned();
        match self.sets.iter_mut().find(|set| set.owner == owner) {
            Some(set) => {
                set.state = SetState::Committing;
                set.sessions = sessions.into();
            }
            None => self.sets.push(SessionSet {
                owner: owner.to_string(),
                state: SetState::Committing,
                sessions: sessions.into(),
            }),
        }
        head
    }

    /// Record that `session_id` was handed to the OS and awaits its callback
    pub fn mark_committed(&mut self, session_id: i32) {
        if let Some(set) = self
            .sets
            .iter_mut()
            .find(|set| set.sessions.front().is_some_and(|s| s.session_id == session_id))
        {
            set.state = SetState::AwaitingCallback(session_id);
        }
    }

    /// Drop the set for `owner`, returning the sessions it still held
    pub fn release(&mut self, owner: &str) -> Vec<SessionInfo> {
        match self.sets.iter().position(|set| set.owner == owner) {
            Some(index) => self.sets.remove(index).sessions.into(),
            None => Vec::new(),
        }
    }

    /// Drop the set containing `session_id`, returning its owner and sessions
    pub fn release_containing(&mut self, session_id: i32) -> Option<(String, Vec<SessionInfo>)> {
        let index = self.sets.iter().position(|set| set.contains(session_id))?;
        let set = self.sets.remove(index);
        Some((set.owner, set.sessions.into()))
    }

    /// Apply the OS result for `session_id`
    pub fn on_finished(&mut self, session_id: i32, success: bool) -> Completion {
        let Some(index) = self.sets.iter().position(|set| set.contains(session_id)) else {
            return Completion::NotTracked;
        };

        if !success {
            let set = self.sets.remove(index);
            let (failed, remaining): (Vec<_>, Vec<_>) = set
                .sessions
                .into_iter()
                .partition(|s| s.session_id == session_id);
            return match failed.into_iter().next() {
                Some(failed) => Completion::Aborted {
                    owner: set.owner,
                    failed,
                    remaining,
                },
                None => Completion::NotTracked,
            };
        }

        let set = &mut self.sets[index];
        set.sessions.retain(|s| s.session_id != session_id);
        match set.sessions.front().cloned() {
            Some(next) => {
                set.state = SetState::Committing;
                Completion::CommitNext(next)
            }
            None => {
                let set = self.sets.remove(index);
                Completion::Completed { owner: set.owner }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn session(id: i32, package: &str) -> SessionInfo {
        SessionInfo::new(id, package, 1)
    }

    #[test]
    fn duplicate_reservation_does_not_create_second_set() {
        let mut queue = InstallQueue::new();
        assert_eq!(queue.reserve("app"), Reservation::New);
        assert_eq!(queue.reserve("app"), Reservation::Staging);
        assert_eq!(queue.len(), 1);

        queue.enqueue("app", vec![session(1, "lib"), session(2, "app")]);
        assert_eq!(queue.reserve("app"), Reservation::Pending(session(1, "lib")));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn committed_head_is_reported_until_its_callback_arrives() {
        let mut queue = InstallQueue::new();
        queue.reserve("app");
        queue.enqueue("app", vec![session(1, "lib"), session(2, "app")]);
        queue.mark_committed(1);

        assert_eq!(queue.get("app").unwrap().state, SetState::AwaitingCallback(1));
        assert_eq!(queue.reserve("app"), Reservation::Committed(session(1, "lib")));

        assert_eq!(
            queue.on_finished(1, true),
            Completion::CommitNext(session(2, "app"))
        );
        assert_eq!(queue.get("app").unwrap().state, SetState::Committing);
        assert_eq!(queue.reserve("app"), Reservation::Pending(session(2, "app")));
    }

    #[test]
    fn marking_a_non_head_session_changes_nothing() {
        let mut queue = InstallQueue::new();
        queue.reserve("app");
        queue.enqueue("app", vec![session(1, "lib"), session(2, "app")]);
        queue.mark_committed(2);
        assert_eq!(queue.get("app").unwrap().state, SetState::Committing);
    }

    #[test]
    fn success_advances_then_completes() {
        let mut queue = InstallQueue::new();
        queue.reserve("app");
        let head = queue.enqueue("app", vec![session(1, "lib"), session(2, "app")]);
        assert_eq!(head, Some(session(1, "lib")));

        assert_eq!(
            queue.on_finished(1, true),
            Completion::CommitNext(session(2, "app"))
        );
        assert_eq!(
            queue.on_finished(2, true),
            Completion::Completed {
                owner: "app".to_string()
            }
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn failure_drops_set_and_returns_remaining() {
        let mut queue = InstallQueue::new();
        queue.reserve("app");
        queue.enqueue(
            "app",
            vec![session(1, "lib1"), session(2, "lib2"), session(3, "app")],
        );
        queue.on_finished(1, true);

        match queue.on_finished(2, false) {
            Completion::Aborted {
                owner,
                failed,
                remaining,
            } => {
                assert_eq!(owner, "app");
                assert_eq!(failed.session_id, 2);
                assert_eq!(remaining, vec![session(3, "app")]);
            }
            other => panic!("unexpected completion: {other:?}"),
        }
        assert!(!queue.contains("app"));
    }

    #[test]
    fn finishing_one_set_leaves_others_untouched() {
        let mut queue = InstallQueue::new();
        queue.reserve("a");
        queue.enqueue("a", vec![session(1, "a")]);
        queue.reserve("b");
        queue.enqueue("b", vec![session(2, "b")]);

        assert_eq!(
            queue.on_finished(1, true),
            Completion::Completed {
                owner: "a".to_string()
            }
        );
        assert_eq!(queue.owners().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(queue.get("b").unwrap().sessions.len(), 1);
    }

    #[test]
    fn unknown_sessions_are_not_tracked() {
        let mut queue = InstallQueue::new();
        assert_eq!(queue.on_finished(42, true), Completion::NotTracked);
        assert_eq!(queue.on_finished(42, false), Completion::NotTracked);
    }

    #[test]
    fn empty_enqueue_releases_reservation() {
        let mut queue = InstallQueue::new();
        queue.reserve("app");
        assert_eq!(queue.enqueue("app", Vec::new()), None);
        assert!(queue.is_empty());
    }

    proptest! {
        #[test]
        fn commit_order_follows_staging_order(libs in 0usize..8) {
            let mut queue = InstallQueue::new();
            let mut sessions: Vec<SessionInfo> = (0..libs)
                .map(|i| session(i32::try_from(i).unwrap() + 100, &format!("lib{i}")))
                .collect();
            sessions.push(session(999, "app"));
            let expected: Vec<i32> = sessions.iter().map(|s| s.session_id).collect();

            prop_assert_eq!(queue.reserve("app"), Reservation::New);
            let mut next = queue.enqueue("app", sessions);
            let mut committed = Vec::new();
            while let Some(current) = next.take() {
                committed.push(current.session_id);
                match queue.on_finished(current.session_id, true) {
                    Completion::CommitNext(s) => next = Some(s),
                    Completion::Completed { owner } => prop_assert_eq!(owner, "app"),
                    other => prop_assert!(false, "unexpected {:?}", other),
                }
            }
            prop_assert_eq!(committed, expected);
            prop_assert!(queue.is_empty());
        }

        #[test]
        fn repeated_requests_keep_one_set(requests in 1usize..10) {
            let mut queue = InstallQueue::new();
            for _ in 0..requests {
                queue.reserve("app");
            }
            prop_assert_eq!(queue.len(), 1);
            queue.enqueue("app", vec![session(1, "app")]);
            for _ in 0..requests {
                queue.reserve("app");
            }
            prop_assert_eq!(queue.len(), 1);
        }
    }
}
