use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FleetParts API",
        version = "0.1.0",
        description = r#"
# Ferry Fleet Ship-Parts Inventory API

Tracks the ship-parts catalog, stock in/out transactions and staff part
requests for a ferry fleet.

## Authentication

All API endpoints require a JWT obtained from `POST /auth/login`:

```
Authorization: Bearer <your-jwt-token>
```

Capabilities are derived from the user's role; a missing capability yields
`403 Forbidden` even with a valid token.

## Error Handling

Errors use a consistent JSON shape with appropriate HTTP status codes:

```json
{
  "error": "Not Found",
  "message": "Part ZZ-0000 not found",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "parts", description = "Part catalog endpoints"),
        (name = "stock", description = "Stock transaction endpoints"),
        (name = "requests", description = "Staff request workflow endpoints"),
        (name = "users", description = "User directory endpoints"),
        (name = "auth", description = "Authentication endpoints")
    ),
    paths(
        crate::handlers::parts::list_parts,
        crate::handlers::parts::list_low_stock,
        crate::handlers::parts::get_part,
        crate::handlers::parts::create_part,
        crate::handlers::parts::update_part,
        crate::handlers::parts::delete_part,

        crate::handlers::stock::commit_transaction,
        crate::handlers::stock::resolve_scan,
        crate::handlers::stock::list_transactions,
        crate::handlers::stock::export_transactions,

        crate::handlers::requests::submit_request,
        crate::handlers::requests::list_requests,
        crate::handlers::requests::get_request,
        crate::handlers::requests::decide_request,
        crate::handlers::requests::resubmit_request,
        crate::handlers::requests::export_requests,

        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
        crate::handlers::users::create_user,
        crate::handlers::users::update_user,
        crate::handlers::users::deactivate_user,

        crate::auth::login_handler,
    ),
    components(
        schemas(
            crate::models::Part,
            crate::models::StaffRequest,
            crate::models::StockTransaction,
            crate::models::User,
            crate::models::Role,
            crate::models::UserStatus,
            crate::models::RequestStatus,
            crate::models::RequestPriority,
            crate::models::TransactionType,
            crate::models::TransactionStatus,
            crate::models::StockSource,
            crate::models::StockDestination,

            crate::services::catalog::CreatePartInput,
            crate::services::catalog::UpdatePartInput,
            crate::services::stock::StockCommitInput,
            crate::services::requests::SubmitRequestInput,
            crate::services::requests::DecideRequestInput,
            crate::services::requests::Decision,
            crate::services::users::CreateUserInput,
            crate::services::users::UpdateUserInput,
            crate::handlers::stock::ScanRequest,
            crate::auth::LoginCredentials,
            crate::auth::LoginResponse,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
