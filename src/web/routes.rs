//! Path builders for the HTTP API and the front-end pages.

const API_BASE: &str = "/api";

pub mod api {
    pub mod session {
        use super::super::API_BASE;

        pub fn new() -> String {
            format!("{API_BASE}/session")
        }

        pub fn current() -> String {
            format!("{API_BASE}/session")
        }

        pub fn delete() -> String {
            format!("{API_BASE}/session")
        }

        pub fn refresh() -> String {
            format!("{API_BASE}/session/refresh")
        }
    }

    pub mod users {
        use std::fmt::Display;

        use super::super::API_BASE;

        pub fn list() -> String {
            format!("{API_BASE}/users")
        }

        pub fn create() -> String {
            format!("{API_BASE}/users")
        }

        pub fn show(id: impl Display) -> String {
            format!("{API_BASE}/users/{id}")
        }

        pub fn edit(id: impl Display) -> String {
            format!("{API_BASE}/users/{id}/edit")
        }
    }

    pub mod painting_articles {
        use std::fmt::Display;

        use super::super::API_BASE;

        pub fn create() -> String {
            format!("{API_BASE}/painting-articles")
        }

        pub fn show(id: impl Display) -> String {
            format!("{API_BASE}/painting-articles/{id}")
        }
    }
}

pub mod app {
    pub fn home() -> String {
        "/".to_string()
    }

    pub mod session {
        pub fn new() -> String {
            "/session/new".to_string()
        }

        pub fn current() -> String {
            "/session".to_string()
        }
    }

    pub mod users {
        use std::fmt::Display;

        pub fn list() -> String {
            "/users".to_string()
        }

        pub fn create() -> String {
            "/users/new".to_string()
        }

        pub fn edit(id: impl Display) -> String {
            format!("/users/{id}/edit")
        }
    }
}
