use std::future::Future;
use std::pin::Pin;

use clc_plug::{CancelScope, Command, Declaration, Error, ExecContext, Result};
use clc_secrets::SecretStore;
use clc_viridian::Api;
use tracing::info;

/// `viridian:login`: exchange the API key and secret for a token and
/// store it for later commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct ViridianLoginCommand;

impl Command for ViridianLoginCommand {
    fn init(&self, decl: &mut Declaration) -> Result<()> {
        decl.set_positional_arg_count(0, 0).set_command_help(
            "Log in to Viridian using the API key and secret from --api-key and \
             --api-secret or their environment variables. The token is stored \
             under the CLC home directory.",
            "Log in to Viridian",
        );
        Ok(())
    }

    fn exec<'a>(
        &'a self,
        ec: &'a ExecContext,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let config = ec.api_config();
            let key = non_empty(config.api_key.as_deref())
                .ok_or_else(|| Error::Config("API key is not set".to_string()))?;
            let secret = non_empty(config.api_secret.as_deref())
                .ok_or_else(|| Error::Config("API secret is not set".to_string()))?;
            let secrets = ec.secrets()?;

            ec.execute_blocking("Logging in to Viridian", move |scope, status| async move {
                let token = Api::login(config, key, secret).await?;
                status.set_text("Saving the access token");
                store_token(&scope, secrets, &config.api_class, key, &token).await
            })
            .await?;

            info!(api_class = %config.api_class, "logged in to viridian");
            Ok(())
        })
    }
}

// The store only sees the interrupt token, so the deadline is checked here.
async fn store_token(
    scope: &CancelScope,
    secrets: &SecretStore,
    api_class: &str,
    key: &str,
    token: &str,
) -> Result<()> {
    scope.check()?;
    secrets
        .save(scope.token(), api_class, key, token.as_bytes())
        .await?;
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
