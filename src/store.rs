pub mod erp_state;
pub mod erp_store;

pub use erp_state::{BatchRef, ErpState};
pub use erp_store::ErpStore;
