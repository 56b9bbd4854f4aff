//! Beans for the remote service invocation capability.

use serde::{Deserialize, Serialize};

use super::KeyPair;
use crate::bridge_enum;
use crate::codec::{Bean, nullable};

bridge_enum! {
    /// HTTP method used to invoke a service endpoint.
    pub enum ServiceMethod {
        Post,
        Get,
    }
}

bridge_enum! {
    /// Character encoding of a request or response body.
    pub enum ServiceContentEncoding {
        Ascii,
        Utf8,
        IsoLatin1,
        Unicode,
    }
}

bridge_enum! {
    /// Non-fatal conditions reported alongside a service response.
    pub enum ServiceResultCallbackWarning {
        CertificateUntrusted,
        NotSecure,
        Redirected,
        WrongParams,
    }
}

bridge_enum! {
    /// Failures reported instead of a service response.
    pub enum ServiceResultCallbackError {
        TimeOut,
        NoResponse,
        Unreachable,
        MalformedUrl,
        NotRegisteredService,
    }
}

/// Identifies one registered service function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceToken {
    #[serde(default, deserialize_with = "nullable")]
    pub service_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub endpoint_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub function_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub invocation_method: Option<ServiceMethod>,
}

impl ServiceToken {
    /// Creates a token for `service/endpoint/function` invoked with `method`.
    pub fn new(
        service_name: impl Into<String>,
        endpoint_name: impl Into<String>,
        function_name: impl Into<String>,
        method: ServiceMethod,
    ) -> Self {
        Self {
            service_name: Some(service_name.into()),
            endpoint_name: Some(endpoint_name.into()),
            function_name: Some(function_name.into()),
            invocation_method: Some(method),
        }
    }
}

impl Bean for ServiceToken {}

/// An HTTP header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHeader {
    #[serde(default, deserialize_with = "nullable")]
    pub key_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub key_data: Option<String>,
}

impl ServiceHeader {
    pub fn new(key_name: impl Into<String>, key_data: impl Into<String>) -> Self {
        Self {
            key_name: Some(key_name.into()),
            key_data: Some(key_data.into()),
        }
    }
}

impl Bean for ServiceHeader {}

/// A query or body parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestParameter {
    #[serde(default, deserialize_with = "nullable")]
    pub key_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub key_data: Option<String>,
}

impl ServiceRequestParameter {
    pub fn new(key_name: impl Into<String>, key_data: impl Into<String>) -> Self {
        Self {
            key_name: Some(key_name.into()),
            key_data: Some(key_data.into()),
        }
    }
}

impl Bean for ServiceRequestParameter {}

/// A cookie carried in a service session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSessionCookie {
    #[serde(default, deserialize_with = "nullable")]
    pub cookie_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub cookie_value: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub scheme: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub secure: Option<bool>,
    /// Expiry, milliseconds since the Unix epoch.
    #[serde(default, deserialize_with = "nullable")]
    pub expiry: Option<i64>,
    /// Creation, milliseconds since the Unix epoch.
    #[serde(default, deserialize_with = "nullable")]
    pub creation: Option<i64>,
}

impl ServiceSessionCookie {
    pub fn new(cookie_name: impl Into<String>, cookie_value: impl Into<String>) -> Self {
        Self {
            cookie_name: Some(cookie_name.into()),
            cookie_value: Some(cookie_value.into()),
            ..Default::default()
        }
    }
}

impl Bean for ServiceSessionCookie {}

/// Cookies and attributes kept between service calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSession {
    #[serde(default, deserialize_with = "nullable")]
    pub cookies: Option<Vec<ServiceSessionCookie>>,
    #[serde(default, deserialize_with = "nullable")]
    pub attributes: Option<Vec<KeyPair>>,
}

impl ServiceSession {
    /// Builder: append a cookie.
    pub fn with_cookie(mut self, cookie: ServiceSessionCookie) -> Self {
        self.cookies.get_or_insert_with(Vec::new).push(cookie);
        self
    }

    /// Builder: append an attribute.
    pub fn with_attribute(mut self, attribute: KeyPair) -> Self {
        self.attributes.get_or_insert_with(Vec::new).push(attribute);
        self
    }
}

impl Bean for ServiceSession {}

/// A fully described outbound service call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub content_encoding: Option<ServiceContentEncoding>,
    #[serde(default, deserialize_with = "nullable")]
    pub content_length: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub service_headers: Option<Vec<ServiceHeader>>,
    #[serde(default, deserialize_with = "nullable")]
    pub service_session: Option<ServiceSession>,
    #[serde(default, deserialize_with = "nullable")]
    pub query_parameters: Option<Vec<ServiceRequestParameter>>,
    #[serde(default, deserialize_with = "nullable")]
    pub body_parameters: Option<Vec<ServiceRequestParameter>>,
    #[serde(default, deserialize_with = "nullable")]
    pub service_token: Option<ServiceToken>,
    #[serde(default, deserialize_with = "nullable")]
    pub user_agent: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub referer_host: Option<String>,
}

impl ServiceRequest {
    /// Creates a request for `token` with no body.
    pub fn new(token: ServiceToken) -> Self {
        Self {
            service_token: Some(token),
            ..Default::default()
        }
    }

    /// Builder: set body content, its MIME type and length.
    pub fn with_content(
        mut self,
        content: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        let content = content.into();
        self.content_length = i32::try_from(content.len()).ok();
        self.content = Some(content);
        self.content_type = Some(content_type.into());
        self
    }

    /// Builder: set body encoding.
    pub fn with_encoding(mut self, encoding: ServiceContentEncoding) -> Self {
        self.content_encoding = Some(encoding);
        self
    }

    /// Builder: append a header.
    pub fn with_header(mut self, header: ServiceHeader) -> Self {
        self.service_headers.get_or_insert_with(Vec::new).push(header);
        self
    }

    /// Builder: append a query parameter.
    pub fn with_query_parameter(mut self, parameter: ServiceRequestParameter) -> Self {
        self.query_parameters.get_or_insert_with(Vec::new).push(parameter);
        self
    }

    /// Builder: set the session.
    pub fn with_session(mut self, session: ServiceSession) -> Self {
        self.service_session = Some(session);
        self
    }
}

impl Bean for ServiceRequest {}

/// The result of a service call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub content_encoding: Option<ServiceContentEncoding>,
    #[serde(default, deserialize_with = "nullable")]
    pub content_length: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub service_headers: Option<Vec<ServiceHeader>>,
    #[serde(default, deserialize_with = "nullable")]
    pub service_session: Option<ServiceSession>,
    /// HTTP status returned by the remote endpoint.
    #[serde(default, deserialize_with = "nullable")]
    pub status_code: Option<i32>,
}

impl ServiceResponse {
    /// Creates a response with a status code and body.
    pub fn new(status_code: i32, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            content_length: i32::try_from(content.len()).ok(),
            content: Some(content),
            status_code: Some(status_code),
            ..Default::default()
        }
    }
}

impl Bean for ServiceResponse {}
