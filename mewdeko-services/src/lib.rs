/// Unit and currency conversion backed by a rate API.
pub mod converter;
/// Random reddit posts for the search commands.
pub mod reddit;

pub use converter::{ConvertError, ConvertUnit, ConverterService};
pub use reddit::{RedditClient, RedditPost};
