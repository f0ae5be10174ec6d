pub mod error;
pub mod i18n;

pub use error::{ApiError, ApiResult};
pub use i18n::{DEFAULT_LOCALE, locale_for_language};
