pub mod error;
pub mod report;
pub mod resource;
pub mod response;
pub mod tls;
pub mod transport;

pub mod base;
pub mod client;

// typed document clients
pub mod pres_content;
pub mod pres_rules;
pub mod resource_lists;
pub mod xcap_caps;

pub use base::{BaseHttpXCapClient, HttpXCapClient, DEFAULT_TIMEOUT};
pub use client::XCapClient;
pub use error::ClientError;
pub use pres_content::PresContentClient;
pub use pres_rules::PresRulesClient;
pub use resource::{XCapResource, XCapResourceId};
pub use resource_lists::ResourceListsClient;
pub use response::XCapHttpResponse;
pub use xcap_caps::XCapCapsClient;
