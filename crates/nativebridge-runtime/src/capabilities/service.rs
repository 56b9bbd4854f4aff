//! Service: registered remote service endpoints and their invocation.

use nativebridge_core::{
    ServiceMethod, ServiceRequest, ServiceResponse, ServiceResultCallbackError,
    ServiceResultCallbackWarning, ServiceToken,
};

use crate::call::MethodCall;
use crate::callback::Callback;
use crate::dispatcher::{Capability, Dispatcher, Reply};
use crate::error::{DecodeResult, DispatchResult};
use crate::registry::CallbackRegistry;

/// Callback type name of service invocations.
pub const SERVICE_RESULT_CALLBACK: &str = "ServiceResultCallback";

/// Single-shot callback receiving the [`ServiceResponse`].
pub type ServiceResultCallback =
    Callback<ServiceResponse, ServiceResultCallbackWarning, ServiceResultCallbackError>;

/// Native service implementation.
pub trait ServiceDelegate: Send + Sync {
    fn get_service_token(
        &self,
        service_name: &str,
        endpoint_name: &str,
        function_name: &str,
        method: ServiceMethod,
    ) -> ServiceToken;

    /// Token of the registered service matching `uri`, if any.
    fn get_service_token_by_uri(&self, uri: &str) -> Option<ServiceToken>;

    fn get_services_registered(&self) -> Vec<ServiceToken>;

    /// Request skeleton for `token`, with headers and session prefilled.
    fn get_service_request(&self, token: &ServiceToken) -> ServiceRequest;

    fn is_service_registered(
        &self,
        service_name: &str,
        endpoint_name: &str,
        function_name: &str,
        method: ServiceMethod,
    ) -> bool;

    /// Sends `request`; the outcome is reported exactly once through
    /// `callback`.
    fn invoke_service(&self, request: ServiceRequest, callback: ServiceResultCallback);
}

/// Service function coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLookup {
    pub service_name: String,
    pub endpoint_name: String,
    pub function_name: String,
    pub method: ServiceMethod,
}

impl ServiceLookup {
    fn decode(call: &MethodCall<'_>) -> DecodeResult<Self> {
        Ok(Self {
            service_name: call.string(0)?,
            endpoint_name: call.string(1)?,
            function_name: call.string(2)?,
            method: call.enumeration(3)?,
        })
    }
}

/// Service methods.
#[derive(Debug, Clone)]
pub enum ServiceCommand {
    GetServiceToken(ServiceLookup),
    GetServiceTokenByUri { uri: Option<String> },
    GetServicesRegistered,
    GetServiceRequest { token: ServiceToken },
    IsServiceRegistered(ServiceLookup),
    InvokeService {
        request: ServiceRequest,
        callback: ServiceResultCallback,
    },
}

impl Capability for ServiceCommand {
    type Delegate = dyn ServiceDelegate;
    const BRIDGE_TYPE: &'static str = "Service";

    fn decode(call: &MethodCall<'_>) -> DecodeResult<Option<Self>> {
        Ok(Some(match call.method() {
            "getServiceToken" => Self::GetServiceToken(ServiceLookup::decode(call)?),
            "getServiceTokenByUri" => Self::GetServiceTokenByUri {
                uri: call.optional(0)?,
            },
            "getServicesRegistered" => Self::GetServicesRegistered,
            "getServiceRequest" => Self::GetServiceRequest { token: call.bean(0)? },
            "isServiceRegistered" => Self::IsServiceRegistered(ServiceLookup::decode(call)?),
            "invokeService" => {
                let request = call.bean(0)?;
                Self::InvokeService {
                    request,
                    callback: call.callback(SERVICE_RESULT_CALLBACK)?,
                }
            }
            _ => return Ok(None),
        }))
    }

    fn method_name(&self) -> &'static str {
        match self {
            Self::GetServiceToken(_) => "getServiceToken",
            Self::GetServiceTokenByUri { .. } => "getServiceTokenByUri",
            Self::GetServicesRegistered => "getServicesRegistered",
            Self::GetServiceRequest { .. } => "getServiceRequest",
            Self::IsServiceRegistered(_) => "isServiceRegistered",
            Self::InvokeService { .. } => "invokeService",
        }
    }

    fn execute(
        self,
        delegate: &dyn ServiceDelegate,
        _registry: &CallbackRegistry,
    ) -> DispatchResult<Reply> {
        match self {
            Self::GetServiceToken(lookup) => Reply::encode(&delegate.get_service_token(
                &lookup.service_name,
                &lookup.endpoint_name,
                &lookup.function_name,
                lookup.method,
            )),
            // No uri matches no registered service.
            Self::GetServiceTokenByUri { uri } => Reply::encode(
                &uri.and_then(|uri| delegate.get_service_token_by_uri(&uri)),
            ),
            Self::GetServicesRegistered => Reply::encode(&delegate.get_services_registered()),
            Self::GetServiceRequest { token } => {
                Reply::encode(&delegate.get_service_request(&token))
            }
            Self::IsServiceRegistered(lookup) => Reply::encode(&delegate.is_service_registered(
                &lookup.service_name,
                &lookup.endpoint_name,
                &lookup.function_name,
                lookup.method,
            )),
            Self::InvokeService { request, callback } => {
                delegate.invoke_service(request, callback);
                Ok(Reply::Pending)
            }
        }
    }

    fn unimplemented(self, _registry: &CallbackRegistry) -> DispatchResult<Reply> {
        Ok(match self {
            Self::GetServicesRegistered => Reply::empty_list(),
            Self::IsServiceRegistered(_) => Reply::encode(&false)?,
            _ => Reply::null(),
        })
    }
}

/// Dispatcher for the `Service` bridge type.
pub type ServiceBridge = Dispatcher<ServiceCommand>;
