//! Api command: resolve, validate and persist the targeted API
//!
//! A target is validated by probing its `/info` endpoint. The probe skips TLS
//! peer verification: on first contact the client has no trust anchor for the
//! server, so its certificate is accepted as-is (trust on first use). Only
//! the probe does this; secret requests verify certificates normally.

use std::sync::Arc;

use anyhow::Result;
use reqwest::{Method, Request, Url};
use tracing::debug;

use cm_runtime::config::{DEFAULT_SCHEME, INFO_PATH};
use cm_runtime::deps::{ConfigStore, HttpTransport, MessageStyle, UserInterface};
use cm_runtime::error::CmError;
use cm_runtime::models::{InfoResponse, TargetRecord};

/// Printed after successfully targeting a plain HTTP API
pub const INSECURE_HTTP_WARNING: &str = "Warning: Insecure HTTP API detected. Data sent to this API could be intercepted in transit by third parties. Secure HTTPS API endpoints are recommended.";

/// Printed when asked for the target before one was set
pub const NO_TARGET_MESSAGE: &str = "No API targeted.";

/// Dependencies for the api command
pub struct ApiDependencies {
    /// User interface for output
    pub ui: Arc<dyn UserInterface>,
    /// Store holding the active target
    pub config_store: Arc<dyn ConfigStore>,
    /// Transport used for the `/info` probe, without TLS peer verification
    pub probe_transport: Arc<dyn HttpTransport>,
}

/// Api command arguments (matches CLI parser)
#[derive(Debug, Clone, Default)]
pub struct ApiArgs {
    /// Positional server URL
    pub server_url: Option<String>,
    /// Server URL given through `--server`
    pub server_flag: Option<String>,
}

impl ApiArgs {
    /// The target to set; the positional argument wins over the flag
    pub fn requested_target(&self) -> Option<&str> {
        [self.server_url.as_deref(), self.server_flag.as_deref()]
            .into_iter()
            .flatten()
            .find(|raw| !raw.trim().is_empty())
    }
}

/// Execute the api command with injected dependencies
pub async fn execute_with_deps(deps: &Arc<ApiDependencies>, args: ApiArgs) -> Result<()> {
    match args.requested_target() {
        Some(raw) => set_target(deps, raw).await.map(|_| ()),
        None => {
            show_target(deps);
            Ok(())
        }
    }
}

/// Print the persisted target without touching the network
pub fn show_target(deps: &Arc<ApiDependencies>) {
    match deps.config_store.read() {
        Some(target) => deps.ui.print(&target.api_url),
        None => deps.ui.print(NO_TARGET_MESSAGE),
    }
}

/// Validate `raw` against its `/info` endpoint and persist it as the target.
///
/// On any validation failure the store is left untouched.
pub async fn set_target(deps: &Arc<ApiDependencies>, raw: &str) -> Result<TargetRecord> {
    let base_url = resolve_base_url(raw);
    let info = probe(deps.probe_transport.as_ref(), &base_url).await?;

    let record = TargetRecord {
        api_url: base_url,
        auth_url: info.auth_server.url,
        auth_client_id: info.auth_server.client,
    };
    deps.config_store.write(&record)?;

    deps.ui
        .print(&format!("Setting the target url: {}", record.api_url));
    if record.is_insecure() {
        deps.ui
            .print_styled(INSECURE_HTTP_WARNING, MessageStyle::Warning);
    }

    Ok(record)
}

/// Normalize a user-supplied host or URL into a base URL.
///
/// A target without a leading `<scheme>://` gets the `https` scheme; an
/// explicit scheme is kept verbatim. A `://` after the first `/` belongs to
/// the path or query and does not count. Trailing slashes are dropped.
pub fn resolve_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if has_explicit_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME}://{trimmed}")
    }
}

fn has_explicit_scheme(target: &str) -> bool {
    target
        .find("://")
        .is_some_and(|end| !target[..end].contains('/'))
}

/// Probe `<base_url>/info` and validate the advertised auth server
pub async fn probe(
    transport: &dyn HttpTransport,
    base_url: &str,
) -> std::result::Result<InfoResponse, CmError> {
    let info_url = format!("{base_url}{INFO_PATH}");
    let url = Url::parse(&info_url).map_err(|e| {
        debug!(url = %info_url, error = %e, "target is not a valid URL");
        CmError::InvalidTarget
    })?;

    let response = transport
        .execute(Request::new(Method::GET, url))
        .await
        .map_err(|e| {
            debug!(url = %info_url, error = %e, "target probe got no response");
            CmError::InvalidTarget
        })?;

    if response.status != 200 {
        debug!(url = %info_url, status = response.status, "target probe rejected");
        return Err(CmError::InvalidTarget);
    }

    let info: InfoResponse = serde_json::from_slice(&response.body).map_err(|e| {
        debug!(url = %info_url, error = %e, "target probe body is not an info response");
        CmError::InvalidTarget
    })?;

    let auth_url = info.auth_server.url.trim();
    if auth_url.is_empty() || Url::parse(auth_url).is_err() {
        debug!(url = %info_url, auth_url, "target advertises no usable auth server");
        return Err(CmError::InvalidTarget);
    }

    debug!(
        url = %info_url,
        name = %info.app.name,
        version = %info.app.version,
        "target validated"
    );
    Ok(info)
}

/// Execute the api command with default dependencies
pub async fn execute(args: ApiArgs) -> Result<()> {
    use cm_common::{FileConfigStore, RealUserInterface};
    use cm_runtime::deps::ReqwestTransport;

    let deps = Arc::new(ApiDependencies {
        ui: Arc::new(RealUserInterface),
        config_store: Arc::new(FileConfigStore::from_env()?),
        probe_transport: Arc::new(ReqwestTransport::insecure()?),
    });

    execute_with_deps(&deps, args).await
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
