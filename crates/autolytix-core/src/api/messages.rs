//! Spanish, user-facing messages for failed API calls.

use super::ApiError;

pub const DEFAULT_ERROR_MESSAGE: &str = "Ha ocurrido un error";
pub const SESSION_EXPIRED_MESSAGE: &str = "Sesión expirada. Por favor, inicia sesión nuevamente";
pub const ACCESS_DENIED_MESSAGE: &str = "No tienes permisos para realizar esta acción";
pub const NOT_FOUND_MESSAGE: &str = "Recurso no encontrado";
pub const SERVER_ERROR_MESSAGE: &str = "Error del servidor. Por favor, intenta más tarde";
pub const OFFLINE_MESSAGE: &str = "Sin conexión a internet. Verifica tu conexión";

/// First `ApiError` anywhere in the context chain.
pub fn api_error(err: &anyhow::Error) -> Option<&ApiError> {
    err.chain().find_map(|e| e.downcast_ref::<ApiError>())
}

/// Message to show for `err`. A `mensaje` sent by the backend wins; then the
/// status decides; anything unrecognized gets `default`.
pub fn user_message(err: &anyhow::Error, default: &str) -> String {
    let Some(api) = api_error(err) else {
        return default.to_string();
    };

    if let Some(message) = api.server_message() {
        return message;
    }

    match api {
        _ if api.is_auth_failure() => SESSION_EXPIRED_MESSAGE,
        ApiError::AccessDenied(_) => ACCESS_DENIED_MESSAGE,
        ApiError::NotFound(_) => NOT_FOUND_MESSAGE,
        ApiError::ServerError(_) => SERVER_ERROR_MESSAGE,
        ApiError::Offline(_) => OFFLINE_MESSAGE,
        _ => default,
    }
    .to_string()
}

pub fn vehicle_list_message(err: &anyhow::Error) -> String {
    user_message(err, "No se pudo cargar la lista de vehículos")
}

pub fn maintenance_history_message(err: &anyhow::Error) -> String {
    user_message(err, "No se pudo cargar el historial de servicios")
}

pub fn dashboard_message(err: &anyhow::Error) -> String {
    user_message(err, "No se pudo cargar el dashboard. Por favor, intenta de nuevo.")
}
