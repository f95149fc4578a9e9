use crate::aulas::{AulaRepository, AulaService, InMemoryAulaRepository};
use crate::cache_control::CacheController;
use crate::config::Settings;
use actix_http::Request;

use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use actix_web::{test, web, App};

use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::sync::Arc;
pub struct BoxResponse;
impl<S, B> Transform<S, ServiceRequest> for BoxResponse
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = BoxResponseMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BoxResponseMiddleware { service }))
    }
}

pub struct BoxResponseMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for BoxResponseMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_boxed_body())
        })
    }
}

/// Full application over a fresh in-memory store, returned so tests can seed it.
pub async fn init_test_app() -> (
    impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
    Arc<InMemoryAulaRepository>,
) {
    use actix_web::middleware::NormalizePath;
    use tracing_actix_web::TracingLogger;

    let settings = Settings::default();
    let store = Arc::new(InMemoryAulaRepository::new());
    let repository: Arc<dyn AulaRepository> = store.clone();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(settings.clone()))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .wrap(crate::cors(&settings.cors_origins))
            .wrap(BoxResponse)
            .configure(crate::index::init_routes)
            .service(
                web::scope(&settings.api_v1_str)
                    .app_data(web::Data::new(AulaService::new(repository.clone())))
                    .app_data(web::Data::new(repository))
                    .wrap(CacheController::default_no_store())
                    .configure(crate::error_handler::init_extractors)
                    .configure(crate::aulas::init_routes)
                    .configure(crate::health::init_routes),
            )
            .service(crate::docs::rapidoc(&settings)),
    )
    .await;

    (app, store)
}
