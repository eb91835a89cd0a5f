//! Voting session: the ballot, the masternodes, the cursor, and the
//! `Loading → Ready → Submitting → Done` lifecycle.
//!
//! Choices can only change while `Ready`. Submission happens at most once
//! per session and always ends in `Done`.

use mnvote_crypto::EntropySource;
use mnvote_governance::{Ballot, CycleDirection};
use mnvote_masternode::IdentitySet;

use crate::error::{EngineError, Result};
use crate::orchestrator::{Orchestrator, SubmissionObserver, SubmissionReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready,
    Submitting,
    Done,
}

/// What the operator asked for, independent of how it was typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserIntent {
    /// Move the cursor up one row
    CycleUp,
    /// Move the cursor down one row
    CycleDown,
    IncreaseChoice,
    DecreaseChoice,
    Confirm,
    Quit,
}

/// What the caller should do after an intent was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Redraw,
    Submit,
    Quit,
    Ignored,
}

#[derive(Debug)]
pub struct Session {
    state: SessionState,
    ballot: Ballot,
    identities: IdentitySet,
    /// Ballot row, or `ballot.len()` for the confirm row
    cursor: usize,
    report: Option<SubmissionReport>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Loading,
            ballot: Ballot::default(),
            identities: IdentitySet::default(),
            cursor: 0,
            report: None,
        }
    }

    /// Install the loaded ballot and identities and become editable
    pub fn finish_loading(&mut self, ballot: Ballot, identities: IdentitySet) -> Result<()> {
        self.expect_state(SessionState::Loading)?;
        self.ballot = ballot;
        self.identities = identities;
        self.cursor = 0;
        self.state = SessionState::Ready;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn ballot(&self) -> &Ballot {
        &self.ballot
    }

    pub fn identities(&self) -> &IdentitySet {
        &self.identities
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn on_confirm_row(&self) -> bool {
        self.cursor == self.ballot.len()
    }

    pub fn report(&self) -> Option<&SubmissionReport> {
        self.report.as_ref()
    }

    fn rows(&self) -> usize {
        self.ballot.len() + 1
    }

    fn expect_state(&self, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    /// Apply one intent. Only quitting is honoured outside `Ready`.
    pub fn apply(&mut self, intent: UserIntent) -> Action {
        if intent == UserIntent::Quit {
            return Action::Quit;
        }
        if self.state != SessionState::Ready {
            return Action::Ignored;
        }

        match intent {
            UserIntent::CycleUp => {
                self.cursor = (self.cursor + self.rows() - 1) % self.rows();
                Action::Redraw
            }
            UserIntent::CycleDown => {
                self.cursor = (self.cursor + 1) % self.rows();
                Action::Redraw
            }
            UserIntent::IncreaseChoice => self.cycle_current(CycleDirection::Forward),
            UserIntent::DecreaseChoice => self.cycle_current(CycleDirection::Backward),
            UserIntent::Confirm if self.on_confirm_row() => Action::Submit,
            UserIntent::Confirm => Action::Ignored,
            UserIntent::Quit => Action::Quit,
        }
    }

    fn cycle_current(&mut self, direction: CycleDirection) -> Action {
        match self.ballot.cycle_vote_at(self.cursor, direction) {
            Ok(_) => Action::Redraw,
            Err(_) => Action::Ignored,
        }
    }

    /// Run the batch. The session ends in `Done` whether or not it succeeds,
    /// and keeps the report of an aborted batch.
    pub fn submit(
        &mut self,
        orchestrator: &Orchestrator<'_>,
        entropy: &mut dyn EntropySource,
        observer: &mut dyn SubmissionObserver,
    ) -> Result<&SubmissionReport> {
        self.expect_state(SessionState::Ready)?;
        self.state = SessionState::Submitting;

        let result = orchestrator.submit_all(&self.ballot, &self.identities, entropy, observer);
        self.state = SessionState::Done;

        match result {
            Ok(report) => Ok(&*self.report.insert(report)),
            Err(EngineError::EntropyUnavailable {
                attempted,
                report,
                source,
            }) => {
                self.report = Some((*report).clone());
                Err(EngineError::EntropyUnavailable {
                    attempted,
                    report,
                    source,
                })
            }
            Err(e) => Err(e),
        }
    }
}
