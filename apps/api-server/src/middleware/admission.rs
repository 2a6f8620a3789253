//! Admission middleware - runs an admission pipeline before the wrapped route.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use maas_core::{AdmissionPipeline, AdmissionRequest, Rejection};

use super::client_id::client_id_header;
use super::error::AppError;

/// Admission middleware factory.
pub struct AdmissionMiddleware {
    pipeline: Arc<AdmissionPipeline>,
}

impl AdmissionMiddleware {
    pub fn new(pipeline: Arc<AdmissionPipeline>) -> Self {
        Self { pipeline }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdmissionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AdmissionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdmissionMiddlewareService {
            service: Rc::new(service),
            pipeline: self.pipeline.clone(),
        }))
    }
}

pub struct AdmissionMiddlewareService<S> {
    service: Rc<S>,
    pipeline: Arc<AdmissionPipeline>,
}

impl<S, B> Service<ServiceRequest> for AdmissionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let pipeline = self.pipeline.clone();

        let request = AdmissionRequest::new(client_id_header(req.request()));

        Box::pin(async move {
            match pipeline.run(&request).await {
                Ok(()) => {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(rejection) => {
                    log_rejection(&rejection, req.path());

                    let response = AppError::from(rejection).error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

fn log_rejection(rejection: &Rejection, path: &str) {
    match rejection {
        Rejection::RateLimited { retry_after } => {
            tracing::warn!(
                path,
                retry_after_ms = retry_after.as_millis() as u64,
                "Rate limit exceeded"
            );
        }
        Rejection::Unauthorized => {
            tracing::debug!(path, "Request without client identity");
        }
        Rejection::InsufficientFunds { client_id } => {
            tracing::info!(path, client_id = %client_id, "Insufficient tokens");
        }
        // Logged at error level when the 500 is rendered.
        Rejection::StorageFault(_) => {}
    }
}
