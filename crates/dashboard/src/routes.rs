//! Dashboard route table.

use std::fmt;

use painel_app::domain::products::records::ProductUuid;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Every screen the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    Dashboard,
    Products,
    EditProduct(ProductUuid),
    Affiliates,
    Finance,
    Sales,
    Members,
    Subscriptions,
    Reports,
    Collaborators,
    Apps,
    NotFound,
}

const STATIC_ROUTES: [(&str, Route); 12] = [
    ("/login", Route::Login),
    ("/signup", Route::Signup),
    ("/", Route::Dashboard),
    ("/products", Route::Products),
    ("/affiliates", Route::Affiliates),
    ("/finance", Route::Finance),
    ("/sales", Route::Sales),
    ("/members", Route::Members),
    ("/subscriptions", Route::Subscriptions),
    ("/reports", Route::Reports),
    ("/collaborators", Route::Collaborators),
    ("/apps", Route::Apps),
];

const EDIT_PREFIX: &str = "/products/edit/";

impl Route {
    /// Resolve a path. Query strings, fragments and a trailing slash are
    /// ignored; anything unknown, including an unparsable product id, is
    /// [`Route::NotFound`].
    #[must_use]
    pub fn resolve(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };

        if let Some(id) = path.strip_prefix(EDIT_PREFIX) {
            return id.parse().map_or(Self::NotFound, Self::EditProduct);
        }

        STATIC_ROUTES
            .iter()
            .find(|(candidate, _)| *candidate == path)
            .map_or(Self::NotFound, |(_, route)| *route)
    }

    /// Whether the route sits behind the access guard.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        !matches!(self, Self::Login | Self::Signup | Self::NotFound)
    }

    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::EditProduct(id) => format!("{EDIT_PREFIX}{id}"),
            Self::NotFound => "/404".to_string(),
            other => STATIC_ROUTES
                .iter()
                .find(|(_, route)| *route == other)
                .map_or_else(|| "/".to_string(), |(path, _)| (*path).to_string()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
