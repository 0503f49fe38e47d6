//! Screen-level data: navigation, home page cards, the simulation page and
//! the form panels behind the flow screens.

mod panel;

use serde::Serialize;

pub use panel::{FlowPanel, Notification, Variant};

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationPage {
    pub title: &'static str,
    /// Hosted third-party model viewer shown by the embedded variant of the page.
    pub embed_url: &'static str,
    pub scene_endpoint: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Site {
    pub headline: &'static str,
    pub tagline: &'static str,
    pub nav: &'static [NavLink],
    pub features: &'static [Feature],
    pub simulation: SimulationPage,
}

pub static NAV: &[NavLink] = &[
    NavLink {
        href: "/",
        label: "Home",
    },
    NavLink {
        href: "/prediction",
        label: "AI Predictions",
    },
    NavLink {
        href: "/blog",
        label: "Blog",
    },
    NavLink {
        href: "/simulation",
        label: "Simulations",
    },
];

pub static FEATURES: &[Feature] = &[
    Feature {
        id: "feature-prediction",
        title: "AI Predictions",
        description: "Leverage machine learning to predict race outcomes with stunning accuracy.",
        href: "/prediction",
    },
    Feature {
        id: "feature-blog",
        title: "Blog",
        description: "Read the latest analysis, strategies, and engineering deep-dives from F1 experts.",
        href: "/blog",
    },
    Feature {
        id: "feature-simulation",
        title: "Aero Simulations",
        description: "Interact with a 3D model and visualize airflow dynamics in real-time.",
        href: "/simulation",
    },
];

pub fn site() -> Site {
    Site {
        headline: "The Ultimate F1 Technical Edge",
        tagline: "Dive deep into the world of Formula 1 with AI-powered predictions, \
                  interactive simulations, and expert blog content.",
        nav: NAV,
        features: FEATURES,
        simulation: SimulationPage {
            title: "Aerodynamics Simulation",
            embed_url: "https://sketchfab.com/models/bb6d1df708d945f6b12e506e0d39de97/embed",
            scene_endpoint: "/api/simulation/scene",
        },
    }
}
