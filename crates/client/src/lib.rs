mod auth;
pub mod center;
pub mod course;
pub mod crud;
mod de;
pub mod envelope;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod model;
pub mod product;
pub mod review;
pub mod storage;
pub mod taxonomy;

pub use auth::{AuthMode, Credentials, Secret};
use log::debug;
use model::{Model, Mutation};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// How many records to ask for per page when listing
const PAGE_SIZE: u32 = 1000;

/// A client for the course directory's GraphQL API
#[derive(Clone)]
pub struct Client {
    pub creds: Credentials,
    endpoint: String,
    http: reqwest::blocking::Client,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("not signed in: this call needs an id token")]
    MissingToken,

    #[error("the backend refused our credentials")]
    Unauthorized,

    #[error("unexpected status from backend: {}", .0)]
    Status(reqwest::StatusCode),

    #[error("http error: {}", .0)]
    HTTPError(#[from] reqwest::Error),

    #[error("request rejected: {}", .0)]
    Rejected(String),

    #[error("no {} with id {}", .0, .1)]
    NotFound(&'static str, String),

    #[error("backend returned no data")]
    EmptyResponse,

    #[error("serde error: {}", .0)]
    SerdeError(#[from] serde_json::Error),

    #[error("io error: {}", .0)]
    IOError(#[from] std::io::Error),
}

/// Broad category of an [`Error`], for callers that decide how to present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Network,
    Unauthorized,
    Rejected,
    NotFound,
    Decode,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingToken | Error::Unauthorized => ErrorKind::Unauthorized,
            Error::Status(_) | Error::HTTPError(_) | Error::IOError(_) => ErrorKind::Network,
            Error::Rejected(_) => ErrorKind::Rejected,
            Error::NotFound(..) => ErrorKind::NotFound,
            Error::EmptyResponse | Error::SerdeError(_) => ErrorKind::Decode,
        }
    }
}

/// The remote operations every model supports.
///
/// Records travel as JSON objects; [`crud::Repo`] layers typed access on top.
pub trait Api {
    /// All records of the model, optionally restricted by a filter object.
    fn list(&self, model: &Model, filter: Option<Value>) -> Result<Vec<Value>>;

    fn get(&self, model: &Model, id: &str) -> Result<Option<Value>>;

    fn create(&self, model: &Model, input: Value) -> Result<Value>;

    /// Partial update. `input` must carry the record's `id`.
    fn update(&self, model: &Model, input: Value) -> Result<Value>;

    fn delete(&self, model: &Model, id: &str) -> Result<Value>;
}

#[derive(Deserialize)]
struct GraphQLResp {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page {
    #[serde(default)]
    items: Vec<Value>,
    next_token: Option<String>,
}

impl Client {
    pub fn new(endpoint: impl Into<String>, creds: Credentials) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("coursedir-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Client {
            creds,
            endpoint: endpoint.into(),
            http,
        })
    }

    pub(crate) fn http(&self) -> &reqwest::blocking::Client {
        &self.http
    }

    /// Send a single GraphQL document, returning the `data` object.
    pub fn graphql(&self, auth: AuthMode, query: &str, variables: Value) -> Result<Value> {
        let (header, value) = self.creds.header(auth).ok_or(Error::MissingToken)?;

        let resp = self
            .http
            .post(&self.endpoint)
            .header(header, value)
            .json(&json!({ "query": query, "variables": variables }))
            .send()?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Unauthorized);
        }
        if !status.is_success() {
            return Err(Error::Status(status));
        }

        let body: GraphQLResp = if log::log_enabled!(log::Level::Debug) {
            let s = resp.text()?;
            debug!("response: {}", s);
            serde_json::from_str(&s)?
        } else {
            resp.json()?
        };

        if !body.errors.is_empty() {
            return Err(Error::Rejected(
                body.errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }

        body.data.ok_or(Error::EmptyResponse)
    }

    /// Run an operation and pull its named field out of `data`.
    fn operation(&self, auth: AuthMode, query: &str, field: &str, variables: Value) -> Result<Value> {
        let mut data = self.graphql(auth, query, variables)?;
        Ok(data
            .get_mut(field)
            .map(Value::take)
            .unwrap_or(Value::Null))
    }

    fn mutate(&self, model: &Model, mutation: Mutation, input: Value) -> Result<Value> {
        let field = model.mutation_field(mutation);
        debug!("{} {}", field, input);
        match self.operation(
            AuthMode::UserPool,
            &model.mutation_document(mutation),
            &field,
            json!({ "input": input }),
        )? {
            Value::Null => Err(Error::EmptyResponse),
            v => Ok(v),
        }
    }
}

impl Api for Client {
    fn list(&self, model: &Model, filter: Option<Value>) -> Result<Vec<Value>> {
        let query = model.list_document();
        let field = model.list_field();

        let mut items = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let page = self.operation(
                AuthMode::ApiKey,
                &query,
                &field,
                json!({
                    "filter": filter,
                    "limit": PAGE_SIZE,
                    "nextToken": next_token,
                }),
            )?;
            let page: Page = serde_json::from_value(page)?;
            items.extend(page.items.into_iter().filter(|v| !v.is_null()));

            match page.next_token {
                Some(t) => next_token = Some(t),
                None => break,
            }
        }

        debug!("listed {} {}", items.len(), model.plural);
        Ok(items)
    }

    fn get(&self, model: &Model, id: &str) -> Result<Option<Value>> {
        match self.operation(
            AuthMode::ApiKey,
            &model.get_document(),
            &model.get_field(),
            json!({ "id": id }),
        )? {
            Value::Null => Ok(None),
            v => Ok(Some(v)),
        }
    }

    fn create(&self, model: &Model, input: Value) -> Result<Value> {
        self.mutate(model, Mutation::Create, input)
    }

    fn update(&self, model: &Model, input: Value) -> Result<Value> {
        self.mutate(model, Mutation::Update, input)
    }

    fn delete(&self, model: &Model, id: &str) -> Result<Value> {
        self.mutate(model, Mutation::Delete, json!({ "id": id }))
    }
}
