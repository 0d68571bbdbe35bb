//! A client for the MailChimp v3 marketing API: list members, subscriptions,
//! merge fields, interest categories and member tags.
//!
//! ## Example
//!
//! ```no_run
//! use mailchimp_v3::{Client, SubscribeOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("abcd1234-us2")?;
//!
//!     if !client.validate_api_key().await {
//!         eprintln!("Invalid API key");
//!         return Ok(());
//!     }
//!
//!     let subscribed = client
//!         .subscribe_to_list("list-id", "someone@example.org", SubscribeOptions::default())
//!         .await?;
//!     println!("Subscribed: {subscribed}");
//!
//!     client
//!         .add_member_tags("list-id", "someone@example.org", ["newsletter"], false)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod hash;
pub mod lists;
pub mod members;
pub mod method;
pub mod models;
pub mod response;

pub use client::{Client, Params};
pub use error::{Error, Result};
pub use hash::subscriber_hash;
pub use lists::Page;
pub use members::{MemberTagsQuery, SubscribeOptions};
pub use method::Method;
pub use models::MemberStatus;
pub use response::{ApiResponse, LastError};
