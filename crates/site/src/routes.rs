use std::fmt;

pub const ADMIN_LOGIN_PATH: &str = "/admin/login";
pub const ADMIN_HOME_PATH: &str = "/admin";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Portfolio,
    Project(String),
    Blog,
    Post(String),
    About,
    Services,
    Contact,
    AdminLogin,
    AdminDashboard,
    AdminProjects,
    /// `None` is the "new project" form.
    AdminProjectEdit(Option<String>),
    AdminPosts,
    AdminPostEdit(Option<String>),
    AdminSettings,
    NotFound,
}

/// Path without query string, fragment, or trailing slash.
pub fn normalize_path(raw: &str) -> &str {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let path = raw[..end].trim_end_matches('/');
    if path.is_empty() { "/" } else { path }
}

/// Fragment of a URL without the leading `#`, if non-empty.
pub fn fragment(raw: &str) -> Option<&str> {
    raw.split_once('#')
        .map(|(_, f)| f)
        .filter(|f| !f.is_empty())
}

impl Route {
    pub fn parse(raw: &str) -> Route {
        let path = normalize_path(raw);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["portfolio"] => Route::Portfolio,
            ["portfolio", id] => Route::Project((*id).to_string()),
            ["blog"] => Route::Blog,
            ["blog", id] => Route::Post((*id).to_string()),
            ["about"] => Route::About,
            ["services"] => Route::Services,
            ["contact"] => Route::Contact,
            ["admin"] => Route::AdminDashboard,
            ["admin", "login"] => Route::AdminLogin,
            ["admin", "projects"] => Route::AdminProjects,
            ["admin", "projects", "new"] => Route::AdminProjectEdit(None),
            ["admin", "projects", id] => Route::AdminProjectEdit(Some((*id).to_string())),
            ["admin", "posts"] => Route::AdminPosts,
            ["admin", "posts", "new"] => Route::AdminPostEdit(None),
            ["admin", "posts", id] => Route::AdminPostEdit(Some((*id).to_string())),
            ["admin", "settings"] => Route::AdminSettings,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Portfolio => "/portfolio".to_string(),
            Route::Project(id) => format!("/portfolio/{id}"),
            Route::Blog => "/blog".to_string(),
            Route::Post(id) => format!("/blog/{id}"),
            Route::About => "/about".to_string(),
            Route::Services => "/services".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::AdminLogin => ADMIN_LOGIN_PATH.to_string(),
            Route::AdminDashboard => ADMIN_HOME_PATH.to_string(),
            Route::AdminProjects => "/admin/projects".to_string(),
            Route::AdminProjectEdit(None) => "/admin/projects/new".to_string(),
            Route::AdminProjectEdit(Some(id)) => format!("/admin/projects/{id}"),
            Route::AdminPosts => "/admin/posts".to_string(),
            Route::AdminPostEdit(None) => "/admin/posts/new".to_string(),
            Route::AdminPostEdit(Some(id)) => format!("/admin/posts/{id}"),
            Route::AdminSettings => "/admin/settings".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Route::AdminLogin
                | Route::AdminDashboard
                | Route::AdminProjects
                | Route::AdminProjectEdit(_)
                | Route::AdminPosts
                | Route::AdminPostEdit(_)
                | Route::AdminSettings
        )
    }

    /// Admin pages other than the login form.
    pub fn requires_auth(&self) -> bool {
        self.is_admin() && *self != Route::AdminLogin
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    /// Replace the current history entry with this path and resolve again.
    Redirect(String),
}

pub fn resolve(raw: &str, authenticated: bool) -> Resolution {
    let route = Route::parse(raw);
    if route.requires_auth() && !authenticated {
        return Resolution::Redirect(ADMIN_LOGIN_PATH.to_string());
    }
    if route == Route::AdminLogin && authenticated {
        return Resolution::Redirect(ADMIN_HOME_PATH.to_string());
    }
    Resolution::Render(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_public_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/#work"), Route::Home);
        assert_eq!(Route::parse("/portfolio/"), Route::Portfolio);
        assert_eq!(Route::parse("/portfolio/42?ref=x"), Route::Project("42".into()));
        assert_eq!(Route::parse("/blog/abc#top"), Route::Post("abc".into()));
        assert_eq!(Route::parse("/services"), Route::Services);
        assert_eq!(Route::parse("/portfolio/1/extra"), Route::NotFound);
        assert_eq!(Route::parse("/nope"), Route::NotFound);
    }

    #[test]
    fn parses_admin_paths() {
        assert_eq!(Route::parse("/admin"), Route::AdminDashboard);
        assert_eq!(Route::parse("/admin/projects/new"), Route::AdminProjectEdit(None));
        assert_eq!(
            Route::parse("/admin/posts/7"),
            Route::AdminPostEdit(Some("7".into()))
        );
        assert_eq!(Route::parse("/admin/settings/"), Route::AdminSettings);
    }

    #[test]
    fn path_is_inverse_of_parse() {
        let routes = [
            Route::Home,
            Route::Project("x1".into()),
            Route::Post("p".into()),
            Route::Contact,
            Route::AdminLogin,
            Route::AdminProjectEdit(None),
            Route::AdminPostEdit(Some("3".into())),
            Route::AdminSettings,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn fragments_and_normalization() {
        assert_eq!(normalize_path("/blog/?q=1"), "/blog");
        assert_eq!(fragment("/#contact"), Some("contact"));
        assert_eq!(fragment("/about#"), None);
        assert_eq!(fragment("/about"), None);
    }

    #[test]
    fn admin_routes_redirect_when_signed_out() {
        assert_eq!(
            resolve("/admin/projects", false),
            Resolution::Redirect(ADMIN_LOGIN_PATH.into())
        );
        assert_eq!(
            resolve("/admin/login", false),
            Resolution::Render(Route::AdminLogin)
        );
        assert_eq!(resolve("/blog", false), Resolution::Render(Route::Blog));
    }

    #[test]
    fn login_redirects_when_signed_in() {
        assert_eq!(
            resolve("/admin/login", true),
            Resolution::Redirect(ADMIN_HOME_PATH.into())
        );
        assert_eq!(
            resolve("/admin/posts/new", true),
            Resolution::Render(Route::AdminPostEdit(None))
        );
    }
}
