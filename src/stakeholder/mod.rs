//! Stakeholder salience domain: request payload, category table, label text and
//! the chart built from them.

pub mod chart;
pub mod labels;
pub mod payload;
pub mod regions;

pub use chart::{build_figure, render_chart, ChartOptions};
pub use payload::{Categories, VennRequest};
pub use regions::{Category, Level, CATEGORIES};
