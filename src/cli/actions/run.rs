use crate::{
    cli::{
        actions::{admin, auth, books, borrow, Action},
        globals::GlobalArgs,
    },
    client::ApiError,
    library::Library,
    session::guard::{evaluate, GuardDecision, RedirectTarget},
};
use anyhow::{anyhow, bail, Result};
use tracing::debug;

const SESSION_EXPIRED: &str = "session expired, log in again";

/// Execute the provided action behind the route guard.
/// # Errors
/// Returns an error if the guard redirects or the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    let session = globals.session_manager()?;
    let state = session.initialize();

    let view = action.view();
    match evaluate(&state, &view) {
        GuardDecision::Render => {}
        GuardDecision::Placeholder => bail!("session state is not ready yet"),
        GuardDecision::Redirect(RedirectTarget::Login) => {
            bail!("not signed in, run `libris login` first")
        }
        GuardDecision::Redirect(target @ RedirectTarget::Unauthorized) => {
            debug!(redirect = target.path(), roles = ?view.required_roles, "guard refused");
            let required = view
                .required_roles
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" or ");
            bail!("unauthorized: this command requires a {required} account")
        }
    }

    let library = Library::new(session.client().clone());
    let result = match action {
        Action::Auth(command) => auth::execute(command, &session).await,
        Action::Books(command) => books::execute(command, &library).await,
        Action::Borrow(command) => borrow::execute(command, &library).await,
        Action::Admin(command) => admin::execute(command, &library).await,
    };

    result.map_err(|err| {
        if err
            .downcast_ref::<ApiError>()
            .is_some_and(ApiError::is_session_ended)
        {
            anyhow!(SESSION_EXPIRED)
        } else {
            err
        }
    })
}
