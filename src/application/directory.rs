use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::ServiceAccount;

use super::AppError;

pub type SessionId = Uuid;

/// In-memory service accounts, one ordered list per signed-in session.
///
/// Insertion order is display order. Nothing is deduplicated or reordered.
#[derive(Debug, Default)]
pub struct LedgerDirectory {
    sessions: HashMap<SessionId, Vec<ServiceAccount>>,
}

impl LedgerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty session.
    pub fn open(&mut self) -> SessionId {
        self.open_with(Vec::new())
    }

    /// Open a session pre-populated from a snapshot, keeping its order.
    pub fn open_with(&mut self, accounts: Vec<ServiceAccount>) -> SessionId {
        let id = Uuid::new_v4();
        self.sessions.insert(id, accounts);
        id
    }

    pub fn is_open(&self, session: SessionId) -> bool {
        self.sessions.contains_key(&session)
    }

    /// Drop everything held for the session. Returns false if it was not open.
    pub fn close(&mut self, session: SessionId) -> bool {
        self.sessions.remove(&session).is_some()
    }

    pub fn add(&mut self, session: SessionId, account: ServiceAccount) -> Result<(), AppError> {
        self.sessions
            .get_mut(&session)
            .ok_or(AppError::SessionNotOpen(session))?
            .push(account);
        Ok(())
    }

    pub fn list(&self, session: SessionId) -> Result<&[ServiceAccount], AppError> {
        self.sessions
            .get(&session)
            .map(Vec::as_slice)
            .ok_or(AppError::SessionNotOpen(session))
    }

    pub fn len(&self, session: SessionId) -> Result<usize, AppError> {
        self.list(session).map(<[ServiceAccount]>::len)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountNumber, Provider};

    fn account(number: &str) -> ServiceAccount {
        ServiceAccount::new(Provider::Aysam, AccountNumber::parse(number).unwrap())
    }

    fn numbers(accounts: &[ServiceAccount]) -> Vec<&str> {
        accounts.iter().map(|a| a.account_number.as_str()).collect()
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut directory = LedgerDirectory::new();
        let session = directory.open();

        directory.add(session, account("3")).unwrap();
        directory.add(session, account("1")).unwrap();
        directory.add(session, account("2")).unwrap();

        assert_eq!(numbers(directory.list(session).unwrap()), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_list_is_stable_without_adds() {
        let mut directory = LedgerDirectory::new();
        let session = directory.open();
        directory.add(session, account("1")).unwrap();

        let first = directory.list(session).unwrap().to_vec();
        let second = directory.list(session).unwrap().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_dedup() {
        let mut directory = LedgerDirectory::new();
        let session = directory.open();
        let duplicate = account("7");
        directory.add(session, duplicate.clone()).unwrap();
        directory.add(session, duplicate).unwrap();
        assert_eq!(directory.len(session).unwrap(), 2);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut directory = LedgerDirectory::new();
        let alice = directory.open();
        let bob = directory.open_with(vec![account("9")]);

        directory.add(alice, account("1")).unwrap();

        assert_eq!(numbers(directory.list(alice).unwrap()), vec!["1"]);
        assert_eq!(numbers(directory.list(bob).unwrap()), vec!["9"]);
        assert_eq!(directory.session_count(), 2);
    }

    #[test]
    fn test_close_clears_session() {
        let mut directory = LedgerDirectory::new();
        let session = directory.open_with(vec![account("1")]);

        assert!(directory.close(session));
        assert!(!directory.is_open(session));
        assert!(!directory.close(session));
        assert!(matches!(
            directory.list(session),
            Err(AppError::SessionNotOpen(id)) if id == session
        ));
        assert!(matches!(
            directory.add(session, account("2")),
            Err(AppError::SessionNotOpen(_))
        ));
    }
}
