//! Sign-in, sign-out and health commands.

use crate::backend::BackendClient;
use crate::error::{ClientError, ClientResult};

/// Prints the URL that starts sign-in.
pub fn login_url(client: &BackendClient) -> ClientResult<()> {
    println!("{}", client.login_url()?);
    Ok(())
}

/// Ends the backend session.
pub async fn logout(client: &BackendClient) -> ClientResult<()> {
    if !client.has_session() {
        return Err(ClientError::Config(
            "no session cookie given; pass --session or set CALPROXY_SESSION".into(),
        ));
    }
    client.logout().await?;
    println!("Signed out.");
    Ok(())
}

pub async fn health(client: &BackendClient) -> ClientResult<()> {
    client.health().await?;
    println!("Backend is up.");
    Ok(())
}
