//! Resolution of configured service names into canonical downstream base URLs.
//!
//! Operators may set `TRANSACTIONS_SERVICE_URL` / `MONERO_SERVICE_URL` to a
//! full URL, to a well-known compose service name, or leave them unset. The
//! resolver collapses all three cases into one absolute base URL per kind,
//! computed once at startup and never mutated afterwards.

use strum_macros::AsRefStr;

/// Which downstream service a configuration value or route refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ServiceKind {
    Transactions,
    Monero,
}

impl ServiceKind {
    /// Path segment appended when routing through the API manager.
    fn manager_path(self) -> &'static str {
        match self {
            ServiceKind::Transactions => "transactions",
            ServiceKind::Monero => "monero",
        }
    }

    /// Fallback base URL used for unset, blank, or unresolvable values.
    fn default_base(self) -> String {
        format!("http://api-manager:8000/{}", self.manager_path())
    }
}

/// Scope of an alias entry: which kinds it may resolve for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AliasScope {
    Any,
    Only(ServiceKind),
}

impl AliasScope {
    fn accepts(self, kind: ServiceKind) -> bool {
        match self {
            AliasScope::Any => true,
            AliasScope::Only(only) => only == kind,
        }
    }
}

/// One row of the alias table: a set of accepted service names plus the port
/// they listen on. Manager entries additionally carry the kind path suffix.
struct AliasRule {
    names: &'static [&'static str],
    scope: AliasScope,
    port: u16,
    with_manager_path: bool,
}

impl AliasRule {
    fn base_url(&self, name: &str, kind: ServiceKind) -> String {
        if self.with_manager_path {
            format!("http://{name}:{}/{}", self.port, kind.manager_path())
        } else {
            format!("http://{name}:{}", self.port)
        }
    }
}

/// Known short names. Name/kind mismatches fall through to the default on
/// purpose; misconfiguration is lenient here, never fatal.
const ALIASES: &[AliasRule] = &[
    AliasRule {
        names: &["api-manager", "pupero-api-manager"],
        scope: AliasScope::Any,
        port: 8000,
        with_manager_path: true,
    },
    AliasRule {
        names: &["transactions", "pupero-transactions"],
        scope: AliasScope::Only(ServiceKind::Transactions),
        port: 8003,
        with_manager_path: false,
    },
    AliasRule {
        names: &["monero", "pupero-WalletManager"],
        scope: AliasScope::Only(ServiceKind::Monero),
        port: 8004,
        with_manager_path: false,
    },
];

/// Resolves a configured value (or its absence) into the base URL for `kind`.
///
/// Pure and deterministic: unset/blank values and unknown names yield the
/// kind's default, values containing `://` are taken verbatim after trimming
/// whitespace and trailing slashes, and everything else goes through the
/// alias table above.
pub fn resolve_base_url(configured: Option<&str>, kind: ServiceKind) -> String {
    let Some(raw) = configured else {
        return kind.default_base();
    };
    let value = raw.trim().trim_end_matches('/');
    if value.is_empty() {
        return kind.default_base();
    }
    if value.contains("://") {
        return value.to_string();
    }

    ALIASES
        .iter()
        .find(|rule| rule.scope.accepts(kind) && rule.names.contains(&value))
        .map(|rule| rule.base_url(value, kind))
        .unwrap_or_else(|| kind.default_base())
}
