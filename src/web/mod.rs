//! Front-end state: preferences, translations, theme, API client and the
//! sign-up form. Rendering is left to whatever UI layer embeds these types.

pub mod api;
pub mod i18n;
pub mod register;
pub mod routes;
pub mod store;
pub mod theme;
