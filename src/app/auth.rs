//! Registration, login and logout.

use crate::accounts::{authenticate, AuthOutcome, NewUser};
use crate::app::controller::{ActionContext, Controller, Flow};
use crate::routing::Params;

pub fn controller() -> Controller {
    Controller::new()
        .action("register", register)
        .action("login", login)
        .action("logout", logout)
}

async fn register(ctx: ActionContext) -> Flow {
    let form = NewUser {
        username: ctx.field("username"),
        password: ctx.field("password"),
        email: ctx.field("email"),
        name: ctx.field("name"),
    };

    // Hashing is CPU-bound; keep it off the reactor.
    let users = ctx.state.users.clone();
    let result = tokio::task::spawn_blocking(move || users.register_user(form)).await;

    match result {
        Ok(Ok(_)) => {
            ctx.session.flash("success", "success your account was created!");
            ctx.redirect_to("pages", "login", &Params::new())
        }
        Ok(Err(e)) => {
            tracing::info!(request_id = %ctx.request_id, error = %e, "Registration rejected");
            ctx.session.flash("error", "Oops! there was a problem!");
            ctx.redirect_to("pages", "register", &Params::new())
        }
        Err(e) => ctx.fail(e),
    }
}

async fn login(ctx: ActionContext) -> Flow {
    let username = ctx.field("username");
    let password = ctx.field("password");

    let users = ctx.state.users.clone();
    let outcome = tokio::task::spawn_blocking(move || authenticate(&users, &username, &password)).await;

    match outcome {
        Ok(AuthOutcome::Authenticated(user)) => {
            ctx.session.login(user.id);
            ctx.redirect_to("dashboard", "dashboard", &Params::new())
        }
        Ok(AuthOutcome::Rejected(message)) => {
            ctx.session.flash("error", message);
            ctx.redirect_to("pages", "login", &Params::new())
        }
        Err(e) => ctx.fail(e),
    }
}

async fn logout(ctx: ActionContext) -> Flow {
    ctx.session.logout();
    ctx.session.flash("info", "You have been logged out.");
    ctx.redirect_to("pages", "main", &Params::new())
}
