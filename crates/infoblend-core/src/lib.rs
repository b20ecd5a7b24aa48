pub mod error;
pub mod extract;
pub mod handler;
pub mod keywords;
pub mod lookup;
pub mod query;
pub mod store;
pub mod transport;
pub mod types;

pub use error::{LookupError, StoreError, TransportError};
pub use handler::LookupService;
pub use lookup::Resolver;
pub use query::QueryBuilder;
pub use store::SettingsStore;
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
pub use types::{Action, Answer, LookupMessage, LookupRequest, LookupResponse};
