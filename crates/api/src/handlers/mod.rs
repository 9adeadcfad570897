pub mod assignment;
pub mod sessions;
pub mod time_slot;

use serde::Deserialize;

/// `?weeks_ahead=N` on the materialize, preview and generate endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct HorizonQuery {
    pub weeks_ahead: Option<u32>,
}
