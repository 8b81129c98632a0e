//! Login state of the person using the app.
//!
//! A [`Session`] is created once by the shell and handed to every screen.
//! Only the user id is persisted (in the `app_session` slot of the same
//! store); the user record is always read back from `users`, so a profile
//! edit can not leave a stale copy behind.

use log::{info, warn};

use crate::{
    error::{AppError, AppResult},
    models::user::{NewUser, User, UserChanges},
    repo, utils,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated(User),
}

pub struct Session {
    repo: repo::ImplAppRepo,
    state: SessionState,
}

impl Session {
    pub fn new(repo: repo::ImplAppRepo) -> Self {
        Self {
            repo,
            state: SessionState::Anonymous,
        }
    }

    /// Picks up the user stored by a previous run. A slot pointing to a
    /// user that no longer exists is cleared.
    #[tracing::instrument(skip_all)]
    pub async fn restore(repo: repo::ImplAppRepo) -> AppResult<Self> {
        let mut session = Self::new(repo);

        if let Some(user_id) = session.repo.load_session().await? {
            match session.repo.get_user(user_id).await? {
                Some(user) => session.state = SessionState::Authenticated(user),
                None => {
                    warn!("session slot points to missing user {user_id}");
                    session.repo.clear_session().await?;
                }
            }
        }

        Ok(session)
    }

    pub fn repo(&self) -> &repo::ImplAppRepo {
        &self.repo
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Anonymous => None,
            SessionState::Authenticated(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn require_user(&self) -> AppResult<&User> {
        self.current_user().ok_or(AppError::NotAuthenticated)
    }

    /// Credentials are matched exactly as given, the same way `register`
    /// stored them.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> AppResult<&User> {
        let user = self
            .repo
            .find_user_by_email(email)
            .await?
            .filter(|user| utils::verify_password(password, &user.password_hash))
            .ok_or_else(|| {
                warn!("failed login attempt");
                AppError::InvalidCredentials
            })?;

        self.repo.save_session(user.id).await?;
        info!("user {} logged in", user.id);

        self.authenticate(user)
    }

    /// Creates the account and logs it in.
    #[tracing::instrument(skip_all)]
    pub async fn register(&mut self, new_user: NewUser) -> AppResult<&User> {
        if !new_user.fields_are_valid() {
            return Err(AppError::Validation(
                "nombre, email, telefono and password are required".into(),
            ));
        }

        if self
            .repo
            .find_user_by_email(&new_user.email)
            .await?
            .is_some()
        {
            return Err(AppError::EmailAlreadyExists);
        }

        let user_id = self.repo.insert_user(&new_user).await?;
        let user = self
            .repo
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user", user_id))?;

        self.repo.save_session(user.id).await?;
        info!("user {} registered as {}", user.id, user.kind());

        self.authenticate(user)
    }

    #[tracing::instrument(skip_all)]
    pub async fn logout(&mut self) -> AppResult<()> {
        self.repo.clear_session().await?;
        self.state = SessionState::Anonymous;
        Ok(())
    }

    /// Writes the profile edit to the store and keeps the merged row.
    #[tracing::instrument(skip_all)]
    pub async fn update_current_user(&mut self, changes: UserChanges) -> AppResult<&User> {
        let user_id = self.require_user()?.id;
        let user = self.repo.update_user(user_id, &changes).await?;

        self.authenticate(user)
    }

    /// Reloads the logged user from the store.
    pub async fn refresh(&mut self) -> AppResult<()> {
        let user_id = self.require_user()?.id;

        match self.repo.get_user(user_id).await? {
            Some(user) => {
                self.authenticate(user)?;
            }
            None => self.logout().await?,
        }
        Ok(())
    }

    fn authenticate(&mut self, user: User) -> AppResult<&User> {
        self.state = SessionState::Authenticated(user);
        self.require_user()
    }
}
