//! Guarded dashboard pages.

use axum::{Json, Router, routing::get};
use ciris_session::SessionUser;
use serde::Serialize;
use std::sync::Arc;

use crate::auth::RequireSession;
use crate::lifecycle::AppState;

/// A protected dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub path: &'static str,
    pub slug: &'static str,
    pub title: &'static str,
}

/// Every page behind the route guard.
pub const PAGES: &[Page] = &[
    Page {
        path: "/",
        slug: "dashboard",
        title: "Crime Intelligence Dashboard",
    },
    Page {
        path: "/fir",
        slug: "fir",
        title: "FIR Management",
    },
    Page {
        path: "/analytics",
        slug: "analytics",
        title: "Crime Analytics",
    },
    Page {
        path: "/monitoring",
        slug: "monitoring",
        title: "Real-time Monitoring",
    },
    Page {
        path: "/evidence",
        slug: "evidence",
        title: "Evidence Management",
    },
    Page {
        path: "/enhancement",
        slug: "enhancement",
        title: "Image Enhancement",
    },
    Page {
        path: "/alerts",
        slug: "alerts",
        title: "Alerts & Notifications",
    },
    Page {
        path: "/settings",
        slug: "settings",
        title: "Settings",
    },
];

#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: &'static str,
    pub title: &'static str,
    pub user: SessionUser,
}

/// Routes for every guarded page.
pub fn routes() -> Router<Arc<AppState>> {
    PAGES.iter().fold(Router::new(), |router, page| {
        router.route(
            page.path,
            get(move |RequireSession(user): RequireSession| async move {
                Json(PageView {
                    page: page.slug,
                    title: page.title,
                    user,
                })
            }),
        )
    })
}
