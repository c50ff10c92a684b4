//! Page components for the application.
//!
//! Each page is a Leptos component that renders a specific route. Guarding
//! happens at the route table in [`crate::app`], not inside the pages.

pub mod blog;
pub mod dashboard;
pub mod home;
pub mod login;
pub mod manage;

pub use blog::{BlogPage, BlogPostPage};
pub use dashboard::DashboardPage;
pub use home::{HomePage, PortfolioPage};
pub use login::LoginPage;
pub use manage::{AnalyticsPage, BlogManagerPage, ContactFormsPage};
