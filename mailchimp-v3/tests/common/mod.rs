#![allow(dead_code)]

use mailchimp_v3::Client;
use wiremock::MockServer;

pub const API_KEY: &str = "abc123-us6";
pub const LIST_ID: &str = "l1st";
pub const EMAIL: &str = "Jane.Doe@Example.com";
/// md5("jane.doe@example.com")
pub const EMAIL_HASH: &str = "0cba00ca3da1b283a57287bcceb17e35";

pub async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let client = Client::with_endpoint(server.uri(), API_KEY).unwrap();
    (server, client)
}

/// A client pointed at a port nothing listens on.
pub fn unreachable_client() -> Client {
    Client::with_endpoint("http://127.0.0.1:1", API_KEY).unwrap()
}

pub fn member_path() -> String {
    format!("/lists/{LIST_ID}/members/{EMAIL_HASH}")
}
