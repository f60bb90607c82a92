//! Public pages.

use crate::app::controller::{ActionContext, Controller, Flow};
use crate::app::views::{self, Nav, Page};
use crate::routing::Params;

pub fn controller() -> Controller {
    Controller::new()
        .action("main", main)
        .action("register", register)
        .action("login", login)
}

/// Page data common to every view rendered for `ctx`. `helper` names the
/// route whose absolute URL becomes the page's canonical link.
pub fn page(ctx: &ActionContext, title: &'static str, helper: &str) -> Page {
    let canonical = match ctx.url_for(helper, &Params::new()) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::warn!(request_id = %ctx.request_id, error = %e, "No canonical link");
            None
        }
    };
    Page {
        title,
        canonical,
        nav: Nav {
            home: ctx.link("root"),
            register: ctx.link("register"),
            login: ctx.link("login"),
            dashboard: ctx.link("dashboard"),
            logout: ctx.link("authLogout"),
        },
        flashes: ctx.session.take_flashes(),
        user: ctx.current_user(),
    }
}

async fn main(ctx: ActionContext) -> Flow {
    let html = views::main_page(&page(&ctx, "Welcome", "root"));
    ctx.render(html)
}

async fn register(ctx: ActionContext) -> Flow {
    let html = views::register_page(&page(&ctx, "Register", "register"), &ctx.link("authRegister"));
    ctx.render(html)
}

async fn login(ctx: ActionContext) -> Flow {
    let html = views::login_page(&page(&ctx, "Login", "login"), &ctx.link("authLogin"));
    ctx.render(html)
}
