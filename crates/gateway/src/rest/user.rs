//! User search endpoint

use chatzen_users::User;

use super::RestClient;
use crate::error::GatewayResult;

impl RestClient {
    /// `GET /api/user?search=<query>`
    pub async fn find_users(&self, token: &str, query: &str) -> GatewayResult<Vec<User>> {
        let path = format!("/api/user?search={}", urlencoding::encode(query));
        self.get(token, &path).await
    }
}
