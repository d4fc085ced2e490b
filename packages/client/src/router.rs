//! Client-side routes and the navigation guard that gates them on login state.

use std::fmt;

use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Items,
    NewItem,
    ItemDetail(Uuid),
    EditItem(Uuid),
    Categories,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(Route),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::Dashboard => "/".into(),
            Route::Items => "/items".into(),
            Route::NewItem => "/items/new".into(),
            Route::ItemDetail(id) => format!("/items/{id}"),
            Route::EditItem(id) => format!("/items/{id}/edit"),
            Route::Categories => "/categories".into(),
        }
    }

    /// Resolve a path to a route. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::Dashboard),
            ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["items"] => Some(Route::Items),
            ["items", "new"] => Some(Route::NewItem),
            ["items", id] => id.parse().ok().map(Route::ItemDetail),
            ["items", id, "edit"] => id.parse().ok().map(Route::EditItem),
            ["categories"] => Some(Route::Categories),
            _ => None,
        }
    }

    pub fn requires_auth(&self) -> bool {
        !self.requires_guest()
    }

    /// Login and registration make no sense once signed in.
    pub fn requires_guest(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub fn guard(route: Route, authenticated: bool) -> Navigation {
    if route.requires_auth() && !authenticated {
        Navigation::Redirect(Route::Login)
    } else if route.requires_guest() && authenticated {
        Navigation::Redirect(Route::Dashboard)
    } else {
        Navigation::Proceed
    }
}
