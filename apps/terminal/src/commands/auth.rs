//! # Auth Commands

use tracing::debug;

use rodeo_client::ApiClient;

use crate::error::ApiError;

pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<(), ApiError> {
    debug!(username, "login command");
    client.auth().login(username, password).await?;
    Ok(())
}

pub fn logout(client: &ApiClient) -> Result<(), ApiError> {
    debug!("logout command");
    client.auth().logout()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use rodeo_client::testing::{MockApi, TEST_PASSWORD, TEST_USERNAME};
    use rodeo_client::Session;

    #[tokio::test]
    async fn test_login_then_logout() {
        let mock = MockApi::start().await;
        let client = mock.client(Session::in_memory());

        login(&client, TEST_USERNAME, TEST_PASSWORD).await.unwrap();
        assert!(client.session().is_authenticated());

        logout(&client).unwrap();
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_bad_password() {
        let mock = MockApi::start().await;
        let client = mock.client(Session::in_memory());

        let err = login(&client, TEST_USERNAME, "nope").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert_eq!(err.message, "아이디 또는 비밀번호가 올바르지 않습니다.");
    }
}
