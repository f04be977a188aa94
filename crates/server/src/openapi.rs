use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub phone: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginResponseDoc {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `bearer`
    pub token_type: String,
    /// Whether the account has initialized its business config
    pub has_initialized: bool,
    /// Role codes: admin, waybill, booking, settlement
    pub permissions: Vec<String>,
}

#[derive(ToSchema)]
pub struct RefreshRequest { pub refresh_token: String }

#[derive(ToSchema)]
pub struct TokenPairDoc { pub access_token: String, pub refresh_token: String, pub token_type: String }

#[derive(ToSchema)]
pub struct DepartmentRefDoc { pub id: Uuid, pub name: String }

#[derive(ToSchema)]
pub struct AccountDoc {
    pub id: Uuid,
    pub phone: String,
    pub name: String,
    pub roles: Vec<String>,
    pub is_active: bool,
    pub departments: Vec<DepartmentRefDoc>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct CreateAccountDoc {
    /// 11-digit mobile number starting with 1
    pub phone: String,
    pub password: String,
    pub name: String,
    pub department_ids: Vec<Uuid>,
    pub roles: Vec<String>,
}

#[derive(ToSchema)]
pub struct UpdateAccountDoc {
    pub phone: Option<String>,
    pub name: Option<String>,
    pub department_ids: Option<Vec<Uuid>>,
    pub roles: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct OwnPasswordDoc { pub new_password: String }

#[derive(ToSchema)]
pub struct ChangePasswordDoc {
    /// Target account; defaults to the caller
    pub account_id: Option<Uuid>,
    pub new_password: String,
}

#[derive(ToSchema)]
pub struct BatchIdsDoc { pub ids: Vec<Uuid> }

#[derive(ToSchema)]
pub struct BatchStatusDoc { pub ids: Vec<Uuid>, pub is_active: bool }

#[derive(ToSchema)]
pub struct DepartmentDoc { pub name: String, pub owner_id: Option<Uuid> }

#[derive(ToSchema)]
pub struct DepartmentPatchDoc {
    pub name: Option<String>,
    /// `null` clears the owner
    pub owner_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct CustomerDoc {
    pub company_name: String,
    pub settlement_method: String,
    /// Yuan per kilogram, >= 0
    pub rate: f64,
    pub contact_person: String,
    pub contact_phone: String,
    pub department_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct CustomerPatchDoc {
    pub company_name: Option<String>,
    pub settlement_method: Option<String>,
    pub rate: Option<f64>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    /// `null` detaches the customer from its department
    pub department_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct ParameterDoc { pub value: String, pub description: Option<String> }

#[derive(ToSchema)]
pub struct ConfigDoc {
    /// airline -> business type -> parameter group -> items
    #[schema(value_type = Object)]
    pub config_data: serde_json::Value,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::user_center::info,
        crate::routes::user_center::change_password,
        crate::routes::users::create,
        crate::routes::users::list,
        crate::routes::users::update,
        crate::routes::users::set_status,
        crate::routes::users::batch_status,
        crate::routes::users::change_password,
        crate::routes::users::delete,
        crate::routes::users::batch_delete,
        crate::routes::departments::create,
        crate::routes::departments::list,
        crate::routes::departments::get,
        crate::routes::departments::update,
        crate::routes::departments::delete,
        crate::routes::customers::create,
        crate::routes::customers::search,
        crate::routes::customers::get,
        crate::routes::customers::update,
        crate::routes::customers::delete,
        crate::routes::parameters::list,
        crate::routes::parameters::get,
        crate::routes::parameters::set,
        crate::routes::parameters::delete,
        crate::routes::config::initialize,
        crate::routes::config::current,
        crate::routes::config::update,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            LoginResponseDoc,
            RefreshRequest,
            TokenPairDoc,
            DepartmentRefDoc,
            AccountDoc,
            CreateAccountDoc,
            UpdateAccountDoc,
            OwnPasswordDoc,
            ChangePasswordDoc,
            BatchIdsDoc,
            BatchStatusDoc,
            DepartmentDoc,
            DepartmentPatchDoc,
            CustomerDoc,
            CustomerPatchDoc,
            ParameterDoc,
            ConfigDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "user-center"),
        (name = "users"),
        (name = "departments"),
        (name = "customers"),
        (name = "parameters"),
        (name = "config")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_protected_paths_and_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/customers/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/config/initialize"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
