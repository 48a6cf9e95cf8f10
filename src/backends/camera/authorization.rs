// SPDX-License-Identifier: GPL-3.0-only

//! Camera authorization
//!
//! Outside a sandbox the camera is always available. Inside Flatpak, access is
//! granted per request by the XDG desktop portal (`org.freedesktop.portal.Camera`).
//! The portal answers through a `Request` object whose `Response` signal
//! carries 0 when the user allowed access.

use crate::errors::CameraError;
use futures::StreamExt;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DESTINATION: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Whether the app may use the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    /// Access granted, set up immediately
    Authorized,
    /// The user refused access
    Denied,
    /// Access cannot be requested (no portal in the sandbox)
    Restricted,
    /// Ask the user first
    NotDetermined,
}

/// What camera setup does next for a given authorization status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupAction {
    /// Enumerate devices and build a session
    Enumerate,
    /// Ask the user, then decide again with the answer
    RequestAccess,
    /// No session is built and the preview stays blank
    Blocked(CameraError),
}

impl AuthorizationStatus {
    pub fn setup_action(self) -> SetupAction {
        match self {
            AuthorizationStatus::Authorized => SetupAction::Enumerate,
            AuthorizationStatus::NotDetermined => SetupAction::RequestAccess,
            AuthorizationStatus::Denied | AuthorizationStatus::Restricted => {
                SetupAction::Blocked(CameraError::AccessDenied)
            }
        }
    }

    /// Status after the user answered an access request
    pub fn from_access_response(granted: bool) -> Self {
        if granted {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        }
    }
}

impl std::fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorizationStatus::Authorized => write!(f, "authorized"),
            AuthorizationStatus::Denied => write!(f, "denied"),
            AuthorizationStatus::Restricted => write!(f, "restricted"),
            AuthorizationStatus::NotDetermined => write!(f, "not determined"),
        }
    }
}

pub fn is_sandboxed() -> bool {
    Path::new("/.flatpak-info").exists()
}

/// Query the current authorization status
pub async fn authorization_status() -> AuthorizationStatus {
    if !is_sandboxed() {
        return AuthorizationStatus::Authorized;
    }

    match camera_portal().await {
        Ok(portal) => {
            let present: zbus::Result<bool> = portal.get_property("IsCameraPresent").await;
            debug!(?present, "Camera portal reachable");
            AuthorizationStatus::NotDetermined
        }
        Err(e) => {
            warn!(error = %e, "Camera portal unavailable inside sandbox");
            AuthorizationStatus::Restricted
        }
    }
}

/// Ask the portal for camera access. Resolves to whether access was granted.
pub async fn request_access() -> bool {
    match access_camera().await {
        Ok(granted) => {
            info!(granted, "Camera access request answered");
            granted
        }
        Err(e) => {
            warn!(error = %e, "Camera access request failed");
            false
        }
    }
}

async fn camera_portal() -> zbus::Result<zbus::Proxy<'static>> {
    let connection = zbus::Connection::session().await?;
    zbus::Proxy::new(&connection, PORTAL_DESTINATION, PORTAL_PATH, CAMERA_INTERFACE).await
}

async fn access_camera() -> zbus::Result<bool> {
    let connection = zbus::Connection::session().await?;

    // Subscribe before calling so the Response cannot be missed
    let token = format!("rotissomat_{}", std::process::id());
    let sender = connection
        .unique_name()
        .map(|name| name.as_str().trim_start_matches(':').replace('.', "_"))
        .unwrap_or_default();
    let expected_path = format!("{PORTAL_PATH}/request/{sender}/{token}");

    let request = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        expected_path.clone(),
        REQUEST_INTERFACE,
    )
    .await?;
    let mut responses = request.receive_signal("Response").await?;

    let portal = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        PORTAL_PATH,
        CAMERA_INTERFACE,
    )
    .await?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::new(token.as_str()));
    let handle: OwnedObjectPath = portal.call("AccessCamera", &(options,)).await?;

    if handle.as_str() != expected_path {
        // Old portals pick their own request path
        debug!(handle = %handle, "Portal returned a different request handle");
        let request = zbus::Proxy::new(
            &connection,
            PORTAL_DESTINATION,
            handle.as_str().to_string(),
            REQUEST_INTERFACE,
        )
        .await?;
        responses = request.receive_signal("Response").await?;
    }

    let Some(message) = responses.next().await else {
        return Ok(false);
    };
    let (response, _results): (u32, HashMap<String, OwnedValue>) = message.body().deserialize()?;

    Ok(response == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_action_per_status() {
        assert_eq!(AuthorizationStatus::Authorized.setup_action(), SetupAction::Enumerate);
        assert_eq!(AuthorizationStatus::NotDetermined.setup_action(), SetupAction::RequestAccess);
        assert_eq!(
            AuthorizationStatus::Denied.setup_action(),
            SetupAction::Blocked(CameraError::AccessDenied)
        );
        assert_eq!(
            AuthorizationStatus::Restricted.setup_action(),
            SetupAction::Blocked(CameraError::AccessDenied)
        );
    }

    #[test]
    fn access_answer_never_asks_again() {
        let granted = AuthorizationStatus::from_access_response(true);
        assert_eq!(granted.setup_action(), SetupAction::Enumerate);

        let refused = AuthorizationStatus::from_access_response(false);
        assert_eq!(refused, AuthorizationStatus::Denied);
        assert!(matches!(refused.setup_action(), SetupAction::Blocked(_)));
    }
}
