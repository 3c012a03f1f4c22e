//! Local user-list state for the administration commands.
//!
//! Every mutation goes to the backend first; the local list only changes once
//! the server has answered, and then takes the server's record verbatim.

use tracing::warn;

use crate::api::{ApiError, NewUser, OeuvreApi, User};

pub struct UserDirectory<'a, A: OeuvreApi + ?Sized> {
    api: &'a A,
    users: Vec<User>,
}

impl<'a, A: OeuvreApi + ?Sized> UserDirectory<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            users: Vec::new(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Replace the local list with the server's collection.
    pub async fn load(&mut self) -> Result<&[User], ApiError> {
        match self.api.list_users().await {
            Ok(users) => {
                self.users = users;
                Ok(&self.users)
            }
            Err(e) => {
                warn!(error = %e, "failed to load users");
                Err(e)
            }
        }
    }

    /// Create a user; the server-assigned record is appended.
    pub async fn create(&mut self, user: NewUser) -> Result<&User, ApiError> {
        let created = self.api.create_user(&user).await.inspect_err(|e| {
            warn!(error = %e, email = %user.email, "failed to create user");
        })?;
        self.users.push(created);
        Ok(&self.users[self.users.len() - 1])
    }

    /// Update a user; the entry with the returned id is replaced, never inserted.
    pub async fn update(&mut self, user: &User) -> Result<User, ApiError> {
        let updated = self.api.update_user(user).await.inspect_err(|e| {
            warn!(error = %e, id = user.id, "failed to update user");
        })?;
        for slot in self.users.iter_mut().filter(|u| u.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Delete a user; every local entry with that id is dropped.
    pub async fn remove(&mut self, id: i64) -> Result<(), ApiError> {
        self.api.delete_user(id).await.inspect_err(|e| {
            warn!(error = %e, id, "failed to delete user");
        })?;
        self.users.retain(|u| u.id != id);
        Ok(())
    }
}
