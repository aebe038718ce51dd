//! Account endpoints under `/api/usuarios`.

use anyhow::{Context, Result};
use tracing::info;

use super::ApiClient;
use crate::models::user::{EmailRequest, PasswordResetRequest};
use crate::models::{
    ApiMessage, GoogleLoginRequest, LoginRequest, LoginResponse, PasswordUpdateRequest,
    ProfileUpdateRequest, RegisterRequest, UserProfile,
};

impl ApiClient {
    /// Log in with email and password. The token is stored; saving the user
    /// is left to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest { email, password };
        let response = self
            .post_for_session("/api/usuarios/login", &body)
            .await
            .context("Login failed")?;
        info!(user_id = response.id, "Logged in");
        Ok(response)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse> {
        let response = self
            .post_for_session("/api/usuarios/register", request)
            .await
            .context("Registration failed")?;
        info!(user_id = response.id, "Registered new account");
        Ok(response)
    }

    /// Exchange a Google ID token for a session.
    pub async fn login_with_google(&self, id_token: &str) -> Result<LoginResponse> {
        let body = GoogleLoginRequest { id_token };
        let response = self
            .post_for_session("/api/usuarios/oauth/google", &body)
            .await
            .context("Google sign-in failed")?;
        info!(user_id = response.id, "Logged in with Google");
        Ok(response)
    }

    pub async fn verify_email(&self, token: &str) -> Result<ApiMessage> {
        self.get_with_query("/api/usuarios/verify-email", &[("token", token.to_string())])
            .await
            .context("Failed to verify email")
    }

    pub async fn resend_verification(&self, email: &str) -> Result<ApiMessage> {
        self.post("/api/usuarios/resend-verification", &EmailRequest { email })
            .await
            .context("Failed to resend verification email")
    }

    pub async fn forgot_password(&self, email: &str) -> Result<ApiMessage> {
        self.post("/api/usuarios/password/forgot", &EmailRequest { email })
            .await
            .context("Failed to request password reset")
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<ApiMessage> {
        let body = PasswordResetRequest { token, new_password };
        self.post("/api/usuarios/password/reset", &body)
            .await
            .context("Failed to reset password")
    }

    /// Update the profile and publish the new user to the session.
    pub async fn update_profile(&self, request: &ProfileUpdateRequest) -> Result<UserProfile> {
        let profile: UserProfile = self
            .put("/api/usuarios/me", request)
            .await
            .context("Failed to update profile")?;
        self.session().set_user(profile.clone())?;
        Ok(profile)
    }

    pub async fn update_password(&self, request: &PasswordUpdateRequest) -> Result<ApiMessage> {
        self.put("/api/usuarios/me/password", request)
            .await
            .context("Failed to update password")
    }
}
