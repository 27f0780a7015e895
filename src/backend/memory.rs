//! An in-memory stand-in for the hosted backend, used by tests.
//!
//! Counts provider calls and database writes so tests can assert that
//! invalid input never reaches the backend, and can be switched into a
//! failing mode to exercise error paths.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use crate::{
    backend::{AuthSession, BackendError, IdentityProvider, TransactionDatabase, UserProfile},
    transaction::{TransactionKind, TransactionRecord},
};

#[derive(Default)]
pub(crate) struct MemoryBackend {
    /// email -> (password, user id)
    accounts: Mutex<HashMap<String, (String, String)>>,
    profiles: Mutex<HashMap<String, UserProfile>>,
    /// (user id, partition) -> id -> record
    partitions: Mutex<HashMap<(String, &'static str), HashMap<String, TransactionRecord>>>,
    next_id: AtomicUsize,
    auth_calls: AtomicUsize,
    writes: AtomicUsize,
    writes_fail: AtomicBool,
    reads_fail: AtomicBool,
}

impl MemoryBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A session for a pre-registered test user.
    pub(crate) fn test_session(&self) -> AuthSession {
        let session = AuthSession {
            user_id: "user-test".to_owned(),
            email: "test@example.com".to_owned(),
            id_token: "token-1".to_owned(),
        };

        self.accounts.lock().unwrap().insert(
            session.email.clone(),
            ("hunter2".to_owned(), session.user_id.clone()),
        );

        session
    }

    /// Insert a record directly, bypassing the write counter.
    pub(crate) fn seed(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
        amount: f64,
        description: &str,
    ) -> String {
        let id = format!("-Seed{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.seed_with_id(session, kind, &id, amount, description);
        id
    }

    /// Insert a record with a fixed id, bypassing the write counter.
    pub(crate) fn seed_with_id(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
        id: &str,
        amount: f64,
        description: &str,
    ) {
        let record = TransactionRecord {
            amount,
            description: description.to_owned(),
            date: time::OffsetDateTime::now_utc(),
            user_id: session.user_id.clone(),
        };

        self.partitions
            .lock()
            .unwrap()
            .entry((session.user_id.clone(), kind.partition()))
            .or_default()
            .insert(id.to_owned(), record);
    }

    /// How many times the identity provider has been called.
    pub(crate) fn auth_call_count(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    /// How many database writes (profile writes, pushes and deletes) have
    /// been attempted.
    pub(crate) fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make all subsequent database writes fail.
    pub(crate) fn fail_writes(&self) {
        self.writes_fail.store(true, Ordering::SeqCst);
    }

    /// Make all subsequent database reads fail.
    pub(crate) fn fail_reads(&self) {
        self.reads_fail.store(true, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), BackendError> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        if self.writes_fail.load(Ordering::SeqCst) {
            Err(BackendError::Transport("simulated write failure".to_owned()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityProvider for MemoryBackend {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(BackendError::Rejected("EMAIL_EXISTS".to_owned()));
        }

        let user_id = format!("user-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        accounts.insert(email.to_owned(), (password.to_owned(), user_id.clone()));

        Ok(AuthSession {
            user_id: user_id.clone(),
            email: email.to_owned(),
            id_token: format!("token-{user_id}"),
        })
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);

        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some((stored_password, user_id)) if stored_password == password => Ok(AuthSession {
                user_id: user_id.clone(),
                email: email.to_owned(),
                id_token: format!("token-{user_id}"),
            }),
            _ => Err(BackendError::Rejected("INVALID_LOGIN_CREDENTIALS".to_owned())),
        }
    }

    async fn sign_out(&self, _session: &AuthSession) -> Result<(), BackendError> {
        Ok(())
    }
}

#[async_trait]
impl TransactionDatabase for MemoryBackend {
    async fn write_profile(
        &self,
        session: &AuthSession,
        profile: &UserProfile,
    ) -> Result<(), BackendError> {
        self.check_write()?;

        self.profiles
            .lock()
            .unwrap()
            .insert(session.user_id.clone(), profile.clone());

        Ok(())
    }

    async fn read_partition(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
    ) -> Result<Vec<(String, TransactionRecord)>, BackendError> {
        if self.reads_fail.load(Ordering::SeqCst) {
            return Err(BackendError::Transport("simulated read failure".to_owned()));
        }

        let partitions = self.partitions.lock().unwrap();
        let records = partitions
            .get(&(session.user_id.clone(), kind.partition()))
            .map(|partition| {
                partition
                    .iter()
                    .map(|(id, record)| (id.clone(), record.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(records)
    }

    async fn push(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
        record: &TransactionRecord,
    ) -> Result<String, BackendError> {
        self.check_write()?;

        let id = format!("-Push{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.partitions
            .lock()
            .unwrap()
            .entry((session.user_id.clone(), kind.partition()))
            .or_default()
            .insert(id.clone(), record.clone());

        Ok(id)
    }

    async fn delete(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
        id: &str,
    ) -> Result<(), BackendError> {
        self.check_write()?;

        // Removing a missing id is a no-op success, like the real backend.
        if let Some(partition) = self
            .partitions
            .lock()
            .unwrap()
            .get_mut(&(session.user_id.clone(), kind.partition()))
        {
            partition.remove(id);
        }

        Ok(())
    }
}

impl MemoryBackend {
    /// The stored profile for a user, if one has been written.
    pub(crate) fn profile(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.lock().unwrap().get(user_id).cloned()
    }
}
