use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Artemis Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::users::list_users,
        crate::routes::users::create_user,
        crate::routes::users::read_me,
        crate::routes::users::update_me,
        crate::routes::users::register_user,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::items::list_items,
        crate::routes::items::create_item,
        crate::routes::items::get_item,
        crate::routes::items::update_item,
        crate::routes::items::delete_item,
        crate::routes::games::list_games,
        crate::routes::games::create_game,
        crate::routes::games::get_game,
        crate::routes::games::update_game,
        crate::routes::games::delete_game,
        crate::routes::kv_items::list_kv_items,
        crate::routes::kv_items::create_kv_item,
        crate::routes::kv_items::get_kv_item,
        crate::routes::kv_items::update_kv_item,
        crate::routes::kv_items::delete_kv_item,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::StoreHealth,
            crate::dto::user::UserCreate,
            crate::dto::user::UserRegister,
            crate::dto::user::UserUpdate,
            crate::dto::user::UserUpdateMe,
            crate::dto::user::UserResponse,
            crate::dto::item::ItemCreate,
            crate::dto::item::ItemUpdate,
            crate::dto::item::ItemResponse,
            crate::dto::game::GameCreate,
            crate::dto::game::GameUpdate,
            crate::dto::game::GameResponse,
            crate::dto::kv_item::KvItemCreate,
            crate::dto::kv_item::KvItemUpdate,
            crate::dto::kv_item::KvItemResponse,
        )
    ),
    modifiers(&BasicAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Account management"),
        (name = "items", description = "Items owned by a user"),
        (name = "games", description = "Game documents"),
        (name = "kv_items", description = "Items kept in the key-value store"),
    )
)]
pub struct ApiDoc;

/// Registers the HTTP Basic scheme referenced by protected routes.
struct BasicAuth;

impl Modify for BasicAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("basic", SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)));
    }
}
