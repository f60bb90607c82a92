//! HTML views.

use std::fmt::Write;

use crate::accounts::User;
use crate::session::Flash;

/// Links shown in the navigation bar.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub home: String,
    pub register: String,
    pub login: String,
    pub dashboard: String,
    pub logout: String,
}

/// Data shared by every page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub title: &'static str,
    /// Absolute URL for `<link rel="canonical">`.
    pub canonical: Option<String>,
    pub nav: Nav,
    pub flashes: Vec<Flash>,
    pub user: Option<User>,
}

/// Escape HTML special characters.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub fn main_page(page: &Page) -> String {
    let body = match &page.user {
        Some(user) => format!(
            "<p>Welcome back, {}. Head to your <a href=\"{}\">dashboard</a>.</p>",
            escape_html(display_name(user)),
            escape_html(&page.nav.dashboard)
        ),
        None => format!(
            "<p>Please <a href=\"{}\">register</a> or <a href=\"{}\">log in</a>.</p>",
            escape_html(&page.nav.register),
            escape_html(&page.nav.login)
        ),
    };
    layout(page, &body)
}

pub fn register_page(page: &Page, action: &str) -> String {
    let body = format!(
        r#"<form method="post" action="{}">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<label>Email <input name="email" type="email"></label>
<label>Name <input name="name"></label>
<button type="submit">Register</button>
</form>"#,
        escape_html(action)
    );
    layout(page, &body)
}

pub fn login_page(page: &Page, action: &str) -> String {
    let body = format!(
        r#"<form method="post" action="{}">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>"#,
        escape_html(action)
    );
    layout(page, &body)
}

pub fn dashboard_page(page: &Page, user: &User) -> String {
    let body = format!(
        "<h2>Hello, {}</h2>\n<dl><dt>Username</dt><dd>{}</dd><dt>Email</dt><dd>{}</dd></dl>\n\
         <form method=\"post\" action=\"{}\"><button type=\"submit\">Log out</button></form>",
        escape_html(display_name(user)),
        escape_html(&user.username),
        escape_html(&user.email),
        escape_html(&page.nav.logout)
    );
    layout(page, &body)
}

fn display_name(user: &User) -> &str {
    if user.name.is_empty() {
        &user.username
    } else {
        &user.name
    }
}

fn layout(page: &Page, body: &str) -> String {
    let mut html = String::with_capacity(1024 + body.len());
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title>",
        escape_html(page.title)
    );
    if let Some(canonical) = &page.canonical {
        let _ = write!(html, "<link rel=\"canonical\" href=\"{}\">", escape_html(canonical));
    }
    html.push_str("</head>\n<body>\n<nav>");
    let _ = write!(html, "<a href=\"{}\">Home</a>", escape_html(&page.nav.home));
    if page.user.is_some() {
        let _ = write!(html, " <a href=\"{}\">Dashboard</a>", escape_html(&page.nav.dashboard));
    } else {
        let _ = write!(
            html,
            " <a href=\"{}\">Register</a> <a href=\"{}\">Login</a>",
            escape_html(&page.nav.register),
            escape_html(&page.nav.login)
        );
    }
    html.push_str("</nav>\n");

    for flash in &page.flashes {
        let _ = writeln!(
            html,
            "<div class=\"flash flash-{}\">{}</div>",
            escape_html(&flash.kind),
            escape_html(&flash.text)
        );
    }

    let _ = write!(html, "<h1>{}</h1>\n{}\n</body>\n</html>\n", escape_html(page.title), body);
    html
}
