pub mod common;
pub mod health;
pub mod metrics;
pub mod quotes;

pub use health::health;
pub use metrics::get_metrics;
pub use quotes::{
	get_quote, get_saved_session, post_bind, post_compare, post_generate, post_save,
};
