//! Response-time header middleware.
//!
//! Adds `performance: <seconds>` to every response, measured from the moment
//! the request entered this middleware.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
    time::Instant,
};

pub const PERFORMANCE_HEADER: &str = "performance";

/// Response-time middleware factory
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseTime;

impl<S, B> Transform<S, ServiceRequest> for ResponseTime
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ResponseTimeMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ResponseTimeMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct ResponseTimeMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ResponseTimeMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let started = Instant::now();

        Box::pin(async move {
            let mut response = service.call(req).await?;
            let elapsed = format!("{:.6}", started.elapsed().as_secs_f64());
            if let Ok(value) = HeaderValue::from_str(&elapsed) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(PERFORMANCE_HEADER), value);
            }
            Ok(response)
        })
    }
}
