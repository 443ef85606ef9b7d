//! Client-side routes and the navigation hook used when the backend rejects a session.

use log::info;
use std::sync::Mutex;

pub const HOME: &str = "/";
pub const SIGNIN: &str = "/(auth)/signin";
pub const SIGNUP: &str = "/(auth)/signup";
pub const DASHBOARD: &str = "/dashboard";

/// Moves the user to another view. The browser implementation would set the
/// window location; headless callers log or record the request.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: &str);
}

/// Logs redirects instead of performing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, route: &str) {
        info!("Redirecting to {}", route);
    }
}

/// Remembers every redirect, for assertions.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: &str) {
        self.redirects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(route.to_string());
    }
}
