use std::sync::Arc;

use common::auth::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::storage::{Session, SessionStorage};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<UserResponse>,
    pub token: Option<String>,
}

impl AuthState {
    /// A token is enough; the user may still be loading.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

pub struct AuthStore {
    api: ApiClient,
    storage: Arc<dyn SessionStorage>,
    state: watch::Sender<AuthState>,
}

impl AuthStore {
    /// Build the store, restoring any session left in `storage`.
    pub fn new(api: ApiClient, storage: Arc<dyn SessionStorage>) -> Self {
        let initial = match storage.load() {
            Ok(Some(session)) => AuthState {
                user: session.user,
                token: Some(session.token),
            },
            Ok(None) => AuthState::default(),
            Err(e) => {
                warn!("Ignoring unreadable session: {}", e);
                AuthState::default()
            }
        };
        api.set_token(initial.token.clone());

        Self {
            api,
            storage,
            state: watch::Sender::new(initial),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn user(&self) -> Option<UserResponse> {
        self.state.borrow().user.clone()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserResponse> {
        let res: AuthResponse = self
            .api
            .post(
                "/auth/login",
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        Ok(self.start_session(res))
    }

    pub async fn register(&self, payload: &RegisterRequest) -> Result<UserResponse> {
        let res: AuthResponse = self.api.post("/auth/register", payload).await?;
        Ok(self.start_session(res))
    }

    /// Forget the token and user locally. The server keeps no session to end.
    pub fn logout(&self) {
        self.api.set_token(None);
        if let Err(e) = self.storage.clear() {
            warn!("Failed to clear stored session: {}", e);
        }
        self.state.send_replace(AuthState::default());
    }

    /// Refresh the user behind the stored token; any failure logs out.
    ///
    /// Returns [`ClientError::NotAuthenticated`] when there is no session.
    pub async fn check_auth(&self) -> Result<UserResponse> {
        let Some(token) = self.state.borrow().token.clone() else {
            return Err(ClientError::NotAuthenticated);
        };

        match self.api.get::<UserResponse>("/auth/me").await {
            Ok(user) => {
                self.persist(&token, Some(&user));
                self.state.send_modify(|s| s.user = Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                info!("Stored session rejected, logging out: {}", e);
                self.logout();
                Err(e)
            }
        }
    }

    fn start_session(&self, res: AuthResponse) -> UserResponse {
        self.api.set_token(Some(res.token.clone()));
        self.persist(&res.token, Some(&res.user));
        self.state.send_replace(AuthState {
            user: Some(res.user.clone()),
            token: Some(res.token),
        });
        res.user
    }

    fn persist(&self, token: &str, user: Option<&UserResponse>) {
        let session = Session {
            token: token.to_string(),
            user: user.cloned(),
        };
        if let Err(e) = self.storage.save(&session) {
            warn!("Failed to persist session: {}", e);
        }
    }
}
