mod dropbox_store;
mod oauth_client;

pub use dropbox_store::{header_safe_json, DropboxStore};
pub use oauth_client::DropboxOAuthClient;
