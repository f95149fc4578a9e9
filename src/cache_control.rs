use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::http::header::{CacheControl, CacheDirective, HeaderValue, TryIntoHeaderValue};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

/// Adds a `Cache-Control` header to every response that does not already carry one.
pub struct CacheController {
    cache_directive: Vec<CacheDirective>,
}

impl CacheController {
    pub fn default_no_store() -> Self {
        Self {
            cache_directive: vec![CacheDirective::NoCache, CacheDirective::NoStore],
        }
    }
}

impl<S> Transform<S, ServiceRequest> for CacheController
where
    S: Service<
            ServiceRequest,
            Response = ServiceResponse<actix_web::body::BoxBody>,
            Error = actix_web::Error,
        > + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = actix_web::Error;
    type Transform = CacheControlMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let cache_directive = CacheControl(self.cache_directive.clone()).try_into_value();
        ready(
            cache_directive
                .map(|cache_directive| CacheControlMiddleware {
                    service: Rc::new(service),
                    cache_directive,
                })
                .map_err(|e| {
                    tracing::error!("Invalid cache directive: {}", e);
                }),
        )
    }
}

pub struct CacheControlMiddleware<S> {
    service: Rc<S>,
    cache_directive: HeaderValue,
}

impl<S> Service<ServiceRequest> for CacheControlMiddleware<S>
where
    S: Service<
            ServiceRequest,
            Response = ServiceResponse<actix_web::body::BoxBody>,
            Error = actix_web::Error,
        > + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, actix_web::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);

        let cache_control = self.cache_directive.clone();
        Box::pin(async move {
            let mut res = fut.await?;
            if !res.headers().contains_key(header::CACHE_CONTROL) {
                res.headers_mut()
                    .insert(header::CACHE_CONTROL, cache_control);
            }
            Ok(res)
        })
    }
}
