//! Route guard. Pure decision over a state snapshot; callers act on the result.
//! This is a UX gate only, the backend still authorizes every call.

use super::AuthState;
use crate::store::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Login,
    Unauthorized,
}

impl RedirectTarget {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Unauthorized => "/unauthorized",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Placeholder,
    Redirect(RedirectTarget),
}

/// Access requirements of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub public: bool,
    pub required_roles: Vec<Role>,
}

impl ViewConfig {
    #[must_use]
    pub fn public() -> Self {
        Self {
            public: true,
            required_roles: Vec::new(),
        }
    }

    /// Any signed-in user.
    #[must_use]
    pub fn authenticated() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn roles(roles: &[Role]) -> Self {
        Self {
            public: false,
            required_roles: roles.to_vec(),
        }
    }
}

#[must_use]
pub fn evaluate(state: &AuthState, view: &ViewConfig) -> GuardDecision {
    if state.loading {
        return GuardDecision::Placeholder;
    }
    if view.public {
        return GuardDecision::Render;
    }
    if !state.is_authenticated {
        return GuardDecision::Redirect(RedirectTarget::Login);
    }
    if !view.required_roles.is_empty()
        && !state
            .role()
            .is_some_and(|role| view.required_roles.contains(&role))
    {
        return GuardDecision::Redirect(RedirectTarget::Unauthorized);
    }
    GuardDecision::Render
}
