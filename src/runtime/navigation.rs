use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical destinations; how they map to real routes is the gateway's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Login,
    Signup,
    Forgot,
    Verify,
    Reset,
    PostAuthLanding,
}

impl Route {
    /// Where a failed redirect falls back to.
    pub const FALLBACK: Route = Route::Login;

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Forgot => "forgot",
            Self::Verify => "verify",
            Self::Reset => "reset",
            Self::PostAuthLanding => "post-auth-landing",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("navigation to {route} failed: {reason}")]
pub struct NavigationError {
    pub route: Route,
    pub reason: String,
}

impl NavigationError {
    pub fn new(route: Route, reason: impl Into<String>) -> Self {
        Self {
            route,
            reason: reason.into(),
        }
    }
}

pub trait NavigationGateway: Send {
    fn go_to(&mut self, route: Route) -> Result<(), NavigationError>;
}

/// Gateway that only records the transition in the log.
#[derive(Debug, Default)]
pub struct TracingGateway;

impl NavigationGateway for TracingGateway {
    fn go_to(&mut self, route: Route) -> Result<(), NavigationError> {
        tracing::info!(%route, "navigating");
        Ok(())
    }
}
