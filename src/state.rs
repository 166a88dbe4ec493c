use std::sync::Arc;

use crate::config::Config;
use crate::service::EndpointService;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub endpoints: EndpointService,
}
