// ── Route-gating policy ──
//
// The access policy for every navigable surface, expressed over the
// web app's route paths so it stays testable in one place. The CLI
// maps it onto commands: anything past the guest allow-list needs a
// session, admin surfaces need the admin role.

use crate::model::Role;

/// Who may reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Anyone, authenticated or not.
    Public,
    /// Only unauthenticated sessions (login/registration surfaces).
    GuestOnly,
    /// Any authenticated session.
    Authenticated,
    /// Authenticated sessions holding the given role.
    RoleRestricted(Role),
}

/// Where a gated navigation ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Allow,
    /// Unauthenticated (or unauthorized) visits fall back to home.
    RedirectHome,
    /// Authenticated visits to guest-only routes land on the
    /// role-appropriate page.
    RedirectTo(&'static str),
}

/// Classify a route path. Unknown paths require authentication --
/// the allow-list is closed.
pub fn route_access(path: &str) -> RouteAccess {
    match path {
        "/" => RouteAccess::Public,
        "/login" | "/register" | "/verify-otp" | "/complete-registration" | "/admin-login" => {
            RouteAccess::GuestOnly
        }
        _ if path == "/admin" || path.starts_with("/admin/") => {
            RouteAccess::RoleRestricted(Role::Admin)
        }
        _ => RouteAccess::Authenticated,
    }
}

/// The landing route for a role, used after login and for redirects
/// away from guest-only routes.
pub fn landing_route(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::User => "/",
    }
}

/// Gate a navigation: `session_role` is `None` for an unauthenticated
/// session. Unauthorized role-restricted visits redirect home, not to
/// login -- the user is authenticated, just not allowed.
pub fn gate(path: &str, session_role: Option<Role>) -> Gate {
    match (route_access(path), session_role) {
        (RouteAccess::Public, _) => Gate::Allow,
        (RouteAccess::GuestOnly, None) => Gate::Allow,
        (RouteAccess::GuestOnly, Some(role)) => Gate::RedirectTo(landing_route(role)),
        (RouteAccess::Authenticated | RouteAccess::RoleRestricted(_), None) => Gate::RedirectHome,
        (RouteAccess::Authenticated, Some(_)) => Gate::Allow,
        (RouteAccess::RoleRestricted(required), Some(role)) => {
            if role == required {
                Gate::Allow
            } else {
                Gate::RedirectHome
            }
        }
    }
}
