use std::{
    sync::{mpsc, Arc},
    time::Duration,
};

use anyhow::{Context, Result};

use crate::{
    cli::{Cli, Command},
    domain::{self, session::SessionContext, shell_state::ShellState, user_list_state::UserListState},
    infra,
    transport::{
        self,
        error::TransportError,
        history::TaskHistoryRequester,
        http::ChatHttpClient,
        roster::RosterPage,
        socket::{SocketConnection, SocketTarget},
    },
    ui::{self, CrosstermEventSource},
    usecases::{self, bootstrap, context::AppContext, shell::DefaultShellOrchestrator},
};

const STARTUP_TIMED_OUT: &str = "STARTUP_TIMED_OUT";

pub fn run(cli: Cli) -> Result<()> {
    match cli.command_or_default() {
        Command::Run => {
            let context = bootstrap::bootstrap(cli.config.as_deref(), cli.overrides())?;

            tracing::debug!(
                ui = ui::module_name(),
                domain = domain::module_name(),
                transport = transport::module_name(),
                usecases = usecases::module_name(),
                infra = infra::module_name(),
                "module boundaries loaded"
            );

            run_chat(&context)?;
        }
    }

    Ok(())
}

fn run_chat(context: &AppContext) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let server = &context.config.server;
    let http = Arc::new(ChatHttpClient::new(
        &server.base_url,
        Duration::from_millis(server.request_timeout_ms),
    )?);

    let startup_timeout = Duration::from_millis(context.config.startup.connect_timeout_ms);
    let page = runtime.block_on(sign_in(&http, context.username(), startup_timeout))?;

    let (event_tx, event_rx) = mpsc::channel();
    let target = SocketTarget {
        url: http.socket_url()?,
        cookie: http.session_cookie(),
    };
    let socket = SocketConnection::start(runtime.handle(), target, event_tx.clone());
    let history = TaskHistoryRequester::new(runtime.handle().clone(), http, event_tx);

    let state = ShellState::new(
        SessionContext::new(page.current_username),
        UserListState::new(page.usernames),
    );
    let mut orchestrator = DefaultShellOrchestrator::new(state, history, socket.handle());
    let mut event_source = CrosstermEventSource::new(event_rx);

    ui::shell::start(context, &mut event_source, &mut orchestrator)?;

    drop(orchestrator);
    drop(socket);
    runtime.shutdown_timeout(Duration::from_millis(500));
    Ok(())
}

/// Logs in and reads the roster, bounded by the startup timeout.
async fn sign_in(
    http: &ChatHttpClient,
    username: &str,
    timeout: Duration,
) -> Result<RosterPage> {
    match tokio::time::timeout(timeout, login_and_read_roster(http, username)).await {
        Ok(page) => page.with_context(|| format!("could not sign in to {}", http.base_url())),
        Err(_) => {
            tracing::warn!(
                code = STARTUP_TIMED_OUT,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                "server did not answer during startup"
            );
            anyhow::bail!(
                "{} did not answer within {} ms",
                http.base_url(),
                timeout.as_millis()
            )
        }
    }
}

async fn login_and_read_roster(
    http: &ChatHttpClient,
    username: &str,
) -> Result<RosterPage, TransportError> {
    http.login(username).await?;
    http.roster().await
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn sign_in_reports_unreachable_server() {
        // Bind then drop to get a port nothing listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .expect("ephemeral port should be available")
            .port();
        let http = ChatHttpClient::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2))
            .expect("client should build");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime should build");

        let error = runtime
            .block_on(sign_in(&http, "alice", Duration::from_secs(5)))
            .expect_err("sign in must fail");

        assert!(error.to_string().contains("could not sign in"));
    }
}
