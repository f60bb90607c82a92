//! Member dashboard.

use crate::app::controller::{ActionContext, Controller, Flow};
use crate::app::pages::page;
use crate::app::views;
use crate::routing::Params;

pub fn controller() -> Controller {
    Controller::new()
        .before("*", require_login)
        .action("dashboard", dashboard)
}

async fn require_login(ctx: ActionContext) -> Flow {
    if ctx.current_user().is_some() {
        return ctx.next();
    }
    ctx.session.flash("info", "Please login before trying to access dashboard");
    ctx.redirect_to("pages", "login", &Params::new())
}

async fn dashboard(ctx: ActionContext) -> Flow {
    let Some(user) = ctx.current_user() else {
        return ctx.fail("dashboard reached without a user");
    };
    let html = views::dashboard_page(&page(&ctx, "Dashboard", "dashboard"), &user);
    ctx.render(html)
}
