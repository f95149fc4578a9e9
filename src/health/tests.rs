#[cfg(test)]
use {
    crate::{
        app_data::db::init_unreachable_db_state,
        aulas::{AulaRepository, PgAulaRepository},
        test_utils::init_test_app,
    },
    actix_web::{
        http::StatusCode,
        test::{self},
        web, App,
    },
    std::sync::Arc,
};

#[actix_web::test]
async fn health_ok() {
    let (app, _) = init_test_app().await;
    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn health_unavailable_when_storage_is_down() {
    let repository: Arc<dyn AulaRepository> =
        Arc::new(PgAulaRepository::new(init_unreachable_db_state()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repository))
            .configure(crate::health::init_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        resp.headers().get("X-Error-Code").unwrap(),
        "SERVICE_UNAVAILABLE"
    );
}
