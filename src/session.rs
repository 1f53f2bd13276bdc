//! Toy supervisor session.
//!
//! Two built-in accounts, plain-text password comparison, and an optional
//! JSON file holding the logged-in user between runs. This gates the views
//! and names the acting supervisor on event resolutions; it is not an
//! authentication system.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::logging::{self, Component};
use crate::model::HelmetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Supervisor,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

struct Account {
    user: User,
    password: String,
}

fn account(id: &str, name: &str, email: &str, password: &str, role: Role) -> Account {
    Account {
        user: User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
        },
        password: password.to_string(),
    }
}

pub struct SessionStore {
    accounts: Vec<Account>,
    current: Option<User>,
    session_file: Option<PathBuf>,
}

impl SessionStore {
    /// Built-in accounts; restores a previous session from `session_file`
    /// when one exists and parses.
    pub fn new(session_file: Option<&str>) -> Self {
        let accounts = vec![
            account("1", "John Supervisor", "supervisor@example.com", "password123", Role::Supervisor),
            account("2", "Admin User", "admin@example.com", "admin123", Role::Admin),
        ];
        let session_file = session_file.map(PathBuf::from);
        let current = session_file.as_deref().and_then(restore);

        SessionStore {
            accounts,
            current,
            session_file,
        }
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<User, HelmetError> {
        let user = self
            .accounts
            .iter()
            .find(|a| a.user.email == email && a.password == password)
            .map(|a| a.user.clone())
            .ok_or(HelmetError::InvalidCredentials)?;

        self.current = Some(user.clone());
        self.persist()?;
        logging::info(Component::Session, None, &format!("{} logged in", user.name));
        Ok(user)
    }

    /// Creates a supervisor account and logs it in.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<User, HelmetError> {
        if self.accounts.iter().any(|a| a.user.email == email) {
            return Err(HelmetError::UserExists(email.to_string()));
        }
        let id = (self.accounts.len() + 1).to_string();
        let new_account = account(&id, name, email, password, Role::Supervisor);
        let user = new_account.user.clone();
        self.accounts.push(new_account);

        self.current = Some(user.clone());
        self.persist()?;
        Ok(user)
    }

    pub fn current_session(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn logout(&mut self) -> Result<(), HelmetError> {
        self.current = None;
        if let Some(path) = &self.session_file {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(HelmetError::SessionStorage(e.to_string())),
            }
        }
        Ok(())
    }

    /// Name recorded as resolver: the logged-in user, else `fallback`.
    pub fn acting_supervisor(&self, fallback: &str) -> String {
        self.current
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    fn persist(&self) -> Result<(), HelmetError> {
        let (Some(path), Some(user)) = (&self.session_file, &self.current) else {
            return Ok(());
        };
        let json = serde_json::to_string(user).map_err(|e| HelmetError::SessionStorage(e.to_string()))?;
        fs::write(path, json).map_err(|e| HelmetError::SessionStorage(format!("{}: {}", path.display(), e)))
    }
}

fn restore(path: &Path) -> Option<User> {
    let text = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(user) => Some(user),
        Err(e) => {
            logging::warn(
                Component::Session,
                None,
                &format!("Ignoring unreadable session file {}: {}", path.display(), e),
            );
            None
        }
    }
}
