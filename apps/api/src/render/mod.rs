pub mod admin;
pub mod public;

pub use admin::{render_admin_view, AdminView};
pub use public::{language_splash, render_public_page, LanguageSplash, PublicPage, SiteProfile};
