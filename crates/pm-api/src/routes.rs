//! API routes

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::extractors::AppState;
use crate::handlers::{dashboard, documents, maintenance, properties, tenants, upload};

/// Create the complete API router; request bodies are capped at `body_limit`
pub fn router(body_limit: usize) -> Router<AppState> {
    Router::new()
        .nest("/api", api_router())
        .layer(DefaultBodyLimit::max(body_limit))
}

/// Serves stored uploads; mount under the storage base URL
pub fn files_router() -> Router<AppState> {
    Router::new().route("/*key", get(upload::serve_file))
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/upload", post(upload::upload_files))
        .nest("/properties", properties_router())
        .nest("/tenants", tenants_router())
        .nest("/maintenance", maintenance_router())
        .nest("/documents", documents_router())
}

fn properties_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(properties::list_properties).post(properties::create_property),
        )
        .route(
            "/:id",
            get(properties::get_property)
                .patch(properties::update_property)
                .delete(properties::delete_property),
        )
        .route("/:id/dashboard", get(properties::property_dashboard))
        .route(
            "/:id/units",
            get(properties::list_units).post(properties::create_unit),
        )
}

fn tenants_router() -> Router<AppState> {
    Router::new()
        .route("/", get(tenants::list_tenants).post(tenants::create_tenant))
        .route(
            "/:id",
            get(tenants::get_tenant)
                .patch(tenants::update_tenant)
                .delete(tenants::delete_tenant),
        )
        .route(
            "/:id/payments",
            get(tenants::list_payments).post(tenants::create_payment),
        )
}

fn maintenance_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(maintenance::list_requests).post(maintenance::create_request),
        )
        .route(
            "/:id",
            get(maintenance::get_request)
                .patch(maintenance::update_request)
                .delete(maintenance::delete_request),
        )
}

fn documents_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(documents::list_documents).post(documents::create_document),
        )
        .route("/:id", delete(documents::delete_document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{Body, Bytes};
    use axum::http::{header, Request, StatusCode};
    use chrono::{NaiveDate, Utc};
    use pm_auth::{Authenticator, JwtService};
    use pm_db::{Database, DatabaseConfig};
    use pm_models::{
        MaintenanceWithContext, PaymentWithTenant, Property, PropertySnapshot, PropertyStatus,
        PropertyType, Tenant, TenantStatus, Unit, UnitSnapshot, UnitStatus,
    };
    use pm_stats::{DashboardSource, DataFetchFailure};
    use pm_uploads::{MemoryStore, UploadPolicy, UploadService};
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &[u8] = b"router-test-secret-router-test-secret";
    const BOUNDARY: &str = "X-PM-BOUNDARY";

    /// One property with two units, one of them let at 950
    struct OneProperty;

    #[async_trait]
    impl DashboardSource for OneProperty {
        async fn list_properties_for_user(
            &self,
            user_id: &str,
        ) -> Result<Vec<PropertySnapshot>, DataFetchFailure> {
            let now = Utc::now();
            let mut snapshot = PropertySnapshot::new(Property {
                id: Uuid::new_v4(),
                user_id: user_id.into(),
                name: "Maple Court".into(),
                description: String::new(),
                address: "1 Maple Ct".into(),
                property_type: PropertyType::Apartment,
                price: 0.0,
                bedrooms: 0,
                bathrooms: 0.0,
                size: 0.0,
                features: vec![],
                images: vec![],
                status: PropertyStatus::Rented,
                created_at: now,
                updated_at: now,
            });

            let unit = |number: &str, status: UnitStatus| Unit {
                id: Uuid::new_v4(),
                property_id: snapshot.property.id,
                unit_number: number.into(),
                status,
                created_at: now,
                updated_at: now,
            };
            let let_unit = unit("1A", UnitStatus::Occupied);
            let tenant = Tenant {
                id: Uuid::new_v4(),
                unit_id: let_unit.id,
                first_name: "Ada".into(),
                last_name: "Byron".into(),
                email: "ada@example.com".into(),
                phone: String::new(),
                emergency_contact: None,
                lease_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                lease_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                rent_amount: 950.0,
                deposit_amount: 0.0,
                payment_due: 1,
                status: TenantStatus::Active,
                created_at: now,
                updated_at: now,
            };
            let vacant_unit = unit("1B", UnitStatus::Vacant);

            snapshot.units = vec![
                UnitSnapshot {
                    unit: let_unit,
                    tenant: Some(tenant),
                },
                UnitSnapshot {
                    unit: vacant_unit,
                    tenant: None,
                },
            ];
            Ok(vec![snapshot])
        }

        async fn list_recent_maintenance_requests(
            &self,
            _user_id: &str,
            _limit: i64,
        ) -> Result<Vec<MaintenanceWithContext>, DataFetchFailure> {
            Ok(Vec::new())
        }

        async fn list_recent_payments(
            &self,
            _user_id: &str,
            _limit: i64,
        ) -> Result<Vec<PaymentWithTenant>, DataFetchFailure> {
            Err(DataFetchFailure::new("payments", "connection reset"))
        }
    }

    fn test_state() -> AppState {
        let config = DatabaseConfig {
            url: "postgres://nobody@127.0.0.1:1/none".into(),
            min_connections: 0,
            acquire_timeout_secs: 1,
            ..Default::default()
        };
        let db = Database::connect_lazy(&config).unwrap();
        let uploads = UploadService::new(Arc::new(MemoryStore::default()), UploadPolicy::default());
        AppState::new(
            db.pool().clone(),
            Authenticator::new(JwtService::new(SECRET)),
            uploads,
        )
    }

    fn app(state: AppState) -> Router {
        router(16 * 1024 * 1024).with_state(state)
    }

    fn token(state: &AppState) -> String {
        state.auth.jwt().create_token("user_1", None, 3600).unwrap()
    }

    fn get_with(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn send_json(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart(token: &str, parts: &[(&str, &str, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (filename, content_type, data) in parts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_requests_without_token_are_unauthorized() {
        let response = app(test_state())
            .oneshot(get_with("/api/dashboard", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["errorIdentifier"], "unauthorized");
    }

    #[tokio::test]
    async fn test_forged_token_is_unauthorized() {
        let forged = JwtService::new(b"someone-elses-secret-someone-elses")
            .create_token("user_1", None, 3600)
            .unwrap();
        let response = app(test_state())
            .oneshot(get_with("/api/properties", Some(&forged)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_dashboard_survives_unreachable_database() {
        let state = test_state();
        let token = token(&state);
        let response = app(state)
            .oneshot(get_with("/api/dashboard", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["stats"]["totalProperties"], 0);
        assert_eq!(body["stats"]["occupancyRate"], 0);
        assert_eq!(body["recentActivity"], Value::Array(vec![]));
    }

    #[tokio::test]
    async fn test_dashboard_stats_from_source() {
        let state = test_state().with_dashboard_source(Arc::new(OneProperty));
        let token = token(&state);
        let response = app(state)
            .oneshot(get_with("/api/dashboard", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["stats"]["totalUnits"], 2);
        assert_eq!(body["stats"]["occupiedUnits"], 1);
        assert_eq!(body["stats"]["occupancyRate"], 50);
        assert_eq!(body["stats"]["monthlyRevenue"], 950.0);
        // Payments failed, so the whole feed is dropped
        assert_eq!(body["recentActivity"], Value::Array(vec![]));
    }

    #[tokio::test]
    async fn test_documents_require_property_id() {
        let state = test_state();
        let token = token(&state);
        let response = app(state)
            .oneshot(get_with("/api/documents", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Property ID is required");
    }

    #[tokio::test]
    async fn test_create_property_without_name_is_rejected() {
        let state = test_state();
        let token = token(&state);
        let request = send_json(
            "POST",
            "/api/properties",
            &token,
            serde_json::json!({ "address": "1 Elm St" }),
        );
        let response = app(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["errorIdentifier"], "validation_failed");
        assert!(body["errors"]["name"].is_array());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let state = test_state();
        let token = token(&state);
        let request = Request::builder()
            .method("POST")
            .uri("/api/tenants")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"firstName\":"))
            .unwrap();
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_maintenance_update_with_negative_cost_is_rejected() {
        let state = test_state();
        let token = token(&state);
        let uri = format!("/api/maintenance/{}", Uuid::new_v4());
        let request = send_json("PATCH", &uri, &token, serde_json::json!({ "cost": -5.0 }));
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_database_failure_is_internal_error() {
        let state = test_state();
        let token = token(&state);
        let response = app(state)
            .oneshot(get_with("/api/properties", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["errorIdentifier"], "internal_error");
    }

    #[tokio::test]
    async fn test_upload_returns_urls() {
        let state = test_state();
        let token = token(&state);
        let request = multipart(
            &token,
            &[
                ("lease.pdf", "application/pdf", b"%PDF-1.7".as_slice()),
                ("front door.jpg", "image/jpeg", b"\xff\xd8\xff".as_slice()),
            ],
        );
        let response = app(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let urls = body["urls"].as_array().unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls[0].as_str().unwrap().ends_with("/lease.pdf"));
        assert!(urls[1].as_str().unwrap().ends_with("/front_door.jpg"));
    }

    #[tokio::test]
    async fn test_uploaded_file_is_served() {
        let state = test_state();
        let token = token(&state);
        let app = router(16 * 1024 * 1024)
            .nest("/uploads", files_router())
            .with_state(state);

        let request = multipart(
            &token,
            &[("lease.pdf", "application/pdf", b"%PDF-1.7".as_slice())],
        );
        let body = json_body(app.clone().oneshot(request).await.unwrap()).await;
        let url = body["urls"][0].as_str().unwrap().to_string();

        let response = app.clone().oneshot(get_with(&url, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.7");

        let missing = app
            .oneshot(get_with("/uploads/nope/x.pdf", None))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_type() {
        let state = test_state();
        let token = token(&state);
        let request = multipart(&token, &[("notes.txt", "text/plain", b"hello".as_slice())]);
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_rejects_disguised_markup() {
        let state = test_state();
        let token = token(&state);
        let cases: [(&str, &str, &[u8]); 3] = [
            ("evil.html", "image/png", b"<script>alert(1)</script>"),
            ("logo.svg", "image/svg+xml", b"<svg onload=\"alert(1)\"/>"),
            ("scan.pdf", "text/html", b"<html></html>"),
        ];

        for case in cases {
            let request = multipart(&token, &[case]);
            let response = app(state.clone()).oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", case.0);
        }
    }

    #[tokio::test]
    async fn test_unexpected_stored_type_is_served_as_download() {
        let state = test_state();
        state
            .uploads
            .store()
            .put("abc/page.html", Bytes::from_static(b"<script>alert(1)</script>"))
            .await
            .unwrap();
        let app = files_router().with_state(state);

        let response = app.oneshot(get_with("/abc/page.html", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/octet-stream");
        assert_eq!(headers[header::CONTENT_DISPOSITION], "attachment");
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_image() {
        let state = test_state();
        let token = token(&state);
        let big = vec![0u8; 4 * 1024 * 1024 + 1];
        let request = multipart(&token, &[("huge.png", "image/png", big.as_slice())]);
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_upload_without_files_is_bad_request() {
        let state = test_state();
        let token = token(&state);
        let request = multipart(&token, &[]);
        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
