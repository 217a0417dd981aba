use std::sync::Arc;

use rentix_renting::RentService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RentService>,
}
