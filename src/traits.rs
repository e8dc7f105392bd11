use crate::{
    client::ApiError,
    config::Config,
    types::{
        author::{Author, AuthorUpdate, NewAuthor},
        guid::Guid,
    },
};

/// Remote store of authors.
#[allow(async_fn_in_trait)]
pub trait AuthorApi {
    async fn list(&self) -> Result<Vec<Author>, ApiError>;

    /// Authors whose name matches `name`. A single match is still returned as a list.
    async fn search_by_name(&self, name: &str) -> Result<Vec<Author>, ApiError>;

    async fn create(&self, author: &NewAuthor) -> Result<(), ApiError>;

    async fn update(&self, guid: &Guid, author: &AuthorUpdate) -> Result<(), ApiError>;

    async fn delete(&self, guid: &Guid) -> Result<(), ApiError>;
}

/// Yes/no question put to the user before a destructive action.
#[allow(async_fn_in_trait)]
pub trait Confirm {
    async fn confirm(&self, message: &str) -> bool;
}

pub trait DisplayTerminal {
    fn fmt_terminal(&self, config: &Config) -> String;
}
