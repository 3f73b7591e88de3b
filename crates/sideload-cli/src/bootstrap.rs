use anyhow::Context;
use sideload_client::SideloadClient;
use sideload_config::SideloadConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration, then apply `--url` / `--email`.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SideloadConfig> {
    let mut config = SideloadConfig::load_with_dotenv(flags.config.as_deref())
        .context("failed to load sideload configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn apply_overrides(config: &mut SideloadConfig, flags: &GlobalFlags) {
    if let Some(url) = &flags.url {
        config.server.url.clone_from(url);
    }
    if let Some(email) = &flags.email {
        config.server.email.clone_from(email);
    }
}

/// Build a client and log in.
pub async fn connect(config: &SideloadConfig) -> anyhow::Result<SideloadClient> {
    let server = config.require_server().context(
        "set server.url and server.email in sideload.toml, SIDELOAD_SERVER__URL / \
         SIDELOAD_SERVER__EMAIL, or pass --url / --email",
    )?;
    let client = SideloadClient::new(server)?;

    let password = if server.has_password() {
        server.password.clone()
    } else {
        let email = server.email.clone();
        tokio::task::spawn_blocking(move || prompt_password(&email))
            .await
            .context("password prompt panicked")??
    };

    client
        .login(&server.email, &password)
        .await
        .with_context(|| format!("login to {} as {} failed", server.url, server.email))?;
    Ok(client)
}

/// Read the password from the terminal without echoing it.
fn prompt_password(email: &str) -> anyhow::Result<String> {
    let password = rpassword::prompt_password(format!("password for {email}: "))
        .context("failed to read password from the terminal")?;
    if password.is_empty() {
        anyhow::bail!("no password given; set SIDELOAD_SERVER__PASSWORD or type one at the prompt");
    }
    Ok(password)
}
