use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The signed-in user as kept by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: String,
    /// Older stored profiles have no family name; it loads as `""`.
    #[serde(rename = "apellido", default, deserialize_with = "null_as_default")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "creadoEn", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl From<&LoginResponse> for UserProfile {
    fn from(response: &LoginResponse) -> Self {
        Self {
            id: response.id,
            first_name: response.first_name.clone(),
            last_name: response.last_name.clone(),
            email: response.email.clone(),
            phone: response.phone.clone(),
            created_at: None,
        }
    }
}

/// Body returned by login, register and Google sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido", default, deserialize_with = "null_as_default")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "mensaje", default, deserialize_with = "null_as_default")]
    pub message: String,
    /// Some backends send the token in the `Authorization` header instead.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoogleLoginRequest<'a> {
    #[serde(rename = "idToken")]
    pub id_token: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordUpdateRequest {
    #[serde(rename = "passwordActual")]
    pub current_password: String,
    #[serde(rename = "passwordNueva")]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct EmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PasswordResetRequest<'a> {
    pub token: &'a str,
    #[serde(rename = "newPassword")]
    pub new_password: &'a str,
}

/// Generic `{mensaje, ...}` response. Extra fields vary by endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(rename = "mensaje", default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
