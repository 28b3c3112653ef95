use auth::AuthService;
use storage::CatalogService;

/// Application state shared across all handlers. Constructed once at
/// startup and injected; nothing here is an ambient singleton.
pub struct AppState {
    pub auth_service: AuthService,
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(auth_service: AuthService, catalog: CatalogService) -> Self {
        Self {
            auth_service,
            catalog,
        }
    }
}
